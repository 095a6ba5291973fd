// centrality.rs - Eigenvector centrality, the prestige score behind partner
// selection. Power iteration is the workhorse; a dense eigensolver variant
// exists as an independent check.

use nalgebra::DMatrix;

use crate::error::{PrestigeError, Result};
use crate::graph::Graph;

/// Iteration cap for power iteration. The graphs here are small and well
/// connected, so hitting this means the input is pathological.
const MAX_ITER: usize = 100;

/// Per-node tolerance on the L1 change between successive iterates.
const TOL: f64 = 1e-6;

/// Eigenvector centrality of every node, normalized to unit Euclidean norm.
///
/// Runs power iteration on `A + I`; the identity shift keeps bipartite
/// graphs (the torus included) from oscillating between two half-vectors.
/// Scores are recomputed from scratch on every call, so they always reflect
/// the current adjacency.
pub fn eigenvector_centrality(g: &Graph) -> Result<Vec<f64>> {
    let n = g.n();
    if n == 0 {
        return Ok(Vec::new());
    }

    let mut x = vec![1.0 / (n as f64).sqrt(); n];
    let mut y = vec![0.0; n];

    for _ in 0..MAX_ITER {
        for u in 0..n {
            let mut acc = x[u];
            for &v in g.neighbors(u) {
                acc += x[v];
            }
            y[u] = acc;
        }

        let norm = y.iter().map(|v| v * v).sum::<f64>().sqrt();
        // x is strictly positive and y >= x entrywise, so norm > 0.
        for v in &mut y {
            *v /= norm;
        }

        let drift: f64 = x.iter().zip(&y).map(|(a, b)| (a - b).abs()).sum();
        std::mem::swap(&mut x, &mut y);
        if drift < n as f64 * TOL {
            return Ok(x);
        }
    }

    Err(PrestigeError::ConvergenceFailure {
        iterations: MAX_ITER,
    })
}

/// Same quantity via a full symmetric eigendecomposition of the adjacency
/// matrix. O(n^3) and allocation-heavy, but free of convergence concerns;
/// used to validate the iterative path.
pub fn eigenvector_centrality_dense(g: &Graph) -> Vec<f64> {
    let n = g.n();
    if n == 0 {
        return Vec::new();
    }

    let mut a = DMatrix::<f64>::zeros(n, n);
    for u in 0..n {
        for &v in g.neighbors(u) {
            a[(u, v)] = 1.0;
        }
    }

    let eig = a.symmetric_eigen();
    let mut lead = 0;
    for k in 1..n {
        if eig.eigenvalues[k] > eig.eigenvalues[lead] {
            lead = k;
        }
    }

    let col = eig.eigenvectors.column(lead);
    let sign = if col.sum() < 0.0 { -1.0 } else { 1.0 };
    // The dominant eigenvector of a nonnegative matrix has one sign; any
    // opposite-signed entries are numerical noise, so clamp them.
    let mut v: Vec<f64> = col.iter().map(|&x| (sign * x).max(0.0)).collect();
    let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}
