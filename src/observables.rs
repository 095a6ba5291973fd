// observables.rs - Whole-graph measurement snapshot taken before and after
// the simulation loops.

use std::fmt;

use crate::error::{PrestigeError, Result};
use crate::graph::Graph;

/// One measurement pass over a graph.
#[derive(Debug, Clone, Copy)]
pub struct Observables {
    pub nodes: usize,
    pub edges: usize,
    /// Mean shortest-path length over all pairs.
    pub geodesic: f64,
    /// Mean local clustering coefficient.
    pub clustering: f64,
    pub mean_degree: f64,
    /// Biased sample skewness (m3 / m2^1.5) of the degree sequence;
    /// 0 when every degree is equal.
    pub degree_skew: f64,
}

impl Observables {
    /// Measure all observables from the current graph state.
    ///
    /// Needs at least two nodes and a connected graph, since the geodesic
    /// is undefined otherwise.
    pub fn measure(g: &Graph) -> Result<Self> {
        let n = g.n();
        if n < 2 {
            return Err(PrestigeError::InvalidParameter(
                "observables need at least two nodes".into(),
            ));
        }
        let geodesic = g.average_shortest_path_length()?;
        Ok(Self {
            nodes: n,
            edges: g.m(),
            geodesic,
            clustering: g.average_clustering(),
            mean_degree: 2.0 * g.m() as f64 / n as f64,
            degree_skew: skewness(&g.degrees()),
        })
    }
}

impl fmt::Display for Observables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nodes {}  edges {}  geodesic {:.4}  clustering {:.4}  mean degree {:.3}  degree skew {:.3}",
            self.nodes, self.edges, self.geodesic, self.clustering, self.mean_degree, self.degree_skew
        )
    }
}

/// Biased sample skewness of the degree sequence.
fn skewness(xs: &[usize]) -> f64 {
    let n = xs.len() as f64;
    let mean = xs.iter().sum::<usize>() as f64 / n;
    let m2 = xs.iter().map(|&x| (x as f64 - mean).powi(2)).sum::<f64>() / n;
    if m2 == 0.0 {
        return 0.0;
    }
    let m3 = xs.iter().map(|&x| (x as f64 - mean).powi(3)).sum::<f64>() / n;
    m3 / m2.powf(1.5)
}
