// equilibrium.rs - Perturb a grown network with prestige-biased edge
// additions and occasional resets of randomly chosen nodes, keeping the
// graph connected throughout.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::error::{PrestigeError, Result};
use crate::graph::Graph;
use crate::observables::Observables;
use crate::prestige::prestige_step;

/// Edges a reset node keeps when it had more neighbours than this.
const KEEP_EDGES: usize = 3;

/// Parameters of the equilibrium loop.
#[derive(Debug, Clone, Copy)]
pub struct EquilibriumParams {
    /// Iterations to run. Fixed count; there is no convergence detection.
    pub iterations: usize,
    /// Per-iteration probability of one prestige edge addition.
    pub p_add: f64,
    /// Per-iteration probability of one node reset.
    pub p_reset: f64,
    /// Distance decay passed to partner selection.
    pub decay: f64,
    /// Record a `RoundRecord` every this many iterations; `None` disables
    /// round logging.
    pub sample_every: Option<usize>,
}

impl Default for EquilibriumParams {
    fn default() -> Self {
        Self {
            iterations: 1000,
            p_add: 1.0,
            p_reset: 0.05,
            decay: 2.0,
            sample_every: None,
        }
    }
}

impl EquilibriumParams {
    fn validate(&self) -> Result<()> {
        for (name, p) in [("p_add", self.p_add), ("p_reset", self.p_reset)] {
            if !(0.0..=1.0).contains(&p) {
                return Err(PrestigeError::InvalidParameter(format!(
                    "{name} must be a probability in [0, 1], got {p}"
                )));
            }
        }
        if !self.decay.is_finite() || self.decay < 0.0 {
            return Err(PrestigeError::InvalidParameter(format!(
                "decay must be finite and non-negative, got {}",
                self.decay
            )));
        }
        if self.sample_every == Some(0) {
            return Err(PrestigeError::InvalidParameter(
                "sample_every must be at least 1 when set".into(),
            ));
        }
        Ok(())
    }
}

/// Returned by `reset_node`, allows O(1) book-keeping in the driver.
#[derive(Debug, Clone, Copy)]
pub struct ResetOutcome {
    /// Edges the node was given back.
    pub kept: usize,
    /// Whether a connectivity repair ran afterwards.
    pub repaired: bool,
}

/// Periodic measurement row written by the scan driver.
#[derive(Debug, Clone, Copy)]
pub struct RoundRecord {
    pub iterations: usize,
    pub edges: usize,
    pub geodesic: f64,
    pub clustering: f64,
    /// Geodesic change since the previous record (since the start for the
    /// first one).
    pub movement: f64,
    pub mean_degree: f64,
    pub degree_skew: f64,
}

/// Outcome of a full equilibrium run.
#[derive(Debug, Clone)]
pub struct EquilibriumReport {
    pub before: Observables,
    pub after: Observables,
    pub rounds: Vec<RoundRecord>,
    pub edges_added: usize,
    pub resets: usize,
    pub repairs: usize,
}

/// Reset one node: drop all of its edges and reconnect it to a few of its
/// former neighbours, preferring those it shared friends with.
///
/// Weights are `1 + common_neighbours(node, nbr)`, counted on the adjacency
/// as it stood before any removal. A node with at most three neighbours gets
/// all of them back; otherwise three are drawn by weighted sampling without
/// replacement. If the surgery leaves the graph disconnected, one
/// representative per component is picked and the representatives are joined
/// into a clique. The repair is deliberately blunt; the loop relies on it
/// only to restore connectivity, not to be minimal.
pub fn reset_node(g: &mut Graph, node: usize, rng: &mut impl Rng) -> Result<ResetOutcome> {
    if node >= g.n() {
        return Err(PrestigeError::InvalidParameter(format!(
            "reset node {node} out of range for {} nodes",
            g.n()
        )));
    }

    let former = g.neighbors(node).to_vec();
    let mut weights: Vec<f64> = former
        .iter()
        .map(|&nbr| 1.0 + g.common_neighbors(node, nbr) as f64)
        .collect();

    g.isolate(node);

    let kept = if former.len() <= KEEP_EDGES {
        for &nbr in &former {
            g.add_edge(node, nbr);
        }
        former.len()
    } else {
        let mut pool = former;
        for _ in 0..KEEP_EDGES {
            let draw = WeightedIndex::new(&weights)
                .map_err(|_| PrestigeError::DegenerateSelection)?;
            let idx = draw.sample(rng);
            g.add_edge(node, pool[idx]);
            pool.swap_remove(idx);
            weights.swap_remove(idx);
        }
        KEEP_EDGES
    };

    let mut repaired = false;
    if !g.is_connected() {
        let representatives: Vec<usize> =
            g.components().iter().map(|members| members[0]).collect();
        for i in 0..representatives.len() {
            for j in (i + 1)..representatives.len() {
                g.add_edge(representatives[i], representatives[j]);
            }
        }
        repaired = true;
    }

    Ok(ResetOutcome { kept, repaired })
}

/// Run the equilibrium loop for a fixed number of iterations.
///
/// Every iteration makes two independent Bernoulli decisions: with `p_add`
/// run one prestige step from a uniform random source, with `p_reset` reset
/// one uniform random node. The two are not mutually exclusive. Observables
/// are measured before the first iteration and after the last; round records
/// are taken along the way when `sample_every` is set.
pub fn run_equilibrium(
    g: &mut Graph,
    params: &EquilibriumParams,
    rng: &mut impl Rng,
) -> Result<EquilibriumReport> {
    params.validate()?;
    let before = Observables::measure(g)?;

    let mut report = EquilibriumReport {
        before,
        after: before,
        rounds: Vec::new(),
        edges_added: 0,
        resets: 0,
        repairs: 0,
    };
    let mut last_geodesic = before.geodesic;

    for it in 0..params.iterations {
        if rng.gen::<f64>() < params.p_add {
            let source = rng.gen_range(0..g.n());
            prestige_step(g, source, params.decay, rng)?;
            report.edges_added += 1;
        }
        if rng.gen::<f64>() < params.p_reset {
            let node = rng.gen_range(0..g.n());
            let outcome = reset_node(g, node, rng)?;
            report.resets += 1;
            if outcome.repaired {
                report.repairs += 1;
            }
        }

        if let Some(every) = params.sample_every {
            if (it + 1) % every == 0 {
                let obs = Observables::measure(g)?;
                report.rounds.push(RoundRecord {
                    iterations: it + 1,
                    edges: obs.edges,
                    geodesic: obs.geodesic,
                    clustering: obs.clustering,
                    movement: obs.geodesic - last_geodesic,
                    mean_degree: obs.mean_degree,
                    degree_skew: obs.degree_skew,
                });
                last_geodesic = obs.geodesic;
            }
        }
    }

    report.after = Observables::measure(g)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn params_validation() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let mut g = Graph::torus(3, 3).unwrap();
        for bad in [
            EquilibriumParams {
                p_add: 1.5,
                ..Default::default()
            },
            EquilibriumParams {
                p_reset: -0.1,
                ..Default::default()
            },
            EquilibriumParams {
                decay: f64::NAN,
                ..Default::default()
            },
            EquilibriumParams {
                sample_every: Some(0),
                ..Default::default()
            },
        ] {
            assert!(
                matches!(
                    run_equilibrium(&mut g, &bad, &mut rng),
                    Err(PrestigeError::InvalidParameter(_))
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn low_degree_reset_restores_everything() {
        // A ring: every node has degree 2, below the keep threshold.
        let mut g = Graph::torus(1, 8).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let outcome = reset_node(&mut g, 3, &mut rng).unwrap();
        assert_eq!(outcome.kept, 2);
        assert!(!outcome.repaired);
        assert_eq!(g.degree(3), 2);
        assert!(g.is_connected());
    }

    #[test]
    fn high_degree_reset_keeps_three() {
        let mut g = Graph::torus(4, 4).unwrap();
        // Raise node 0 to degree 6.
        g.add_edge(0, 5);
        g.add_edge(0, 10);
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let outcome = reset_node(&mut g, 0, &mut rng).unwrap();
        assert_eq!(outcome.kept, 3);
        assert!(!outcome.repaired, "torus minus one node stays connected");
        assert_eq!(g.degree(0), 3);
        assert!(g.is_connected());
    }

    #[test]
    fn star_reset_triggers_repair() {
        let mut g = Graph::with_nodes(7);
        for leaf in 1..7 {
            g.add_edge(0, leaf);
        }
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let outcome = reset_node(&mut g, 0, &mut rng).unwrap();
        assert_eq!(outcome.kept, 3);
        assert!(outcome.repaired, "orphaned leaves force a repair");
        assert!(g.is_connected());
    }

    #[test]
    fn zero_probabilities_leave_the_graph_alone() {
        let mut g = Graph::torus(4, 4).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let params = EquilibriumParams {
            iterations: 50,
            p_add: 0.0,
            p_reset: 0.0,
            ..Default::default()
        };
        let report = run_equilibrium(&mut g, &params, &mut rng).unwrap();
        assert_eq!(report.edges_added, 0);
        assert_eq!(report.resets, 0);
        assert_eq!(report.before.edges, report.after.edges);
        assert_eq!(g.m(), 32);
    }

    #[test]
    fn round_records_land_on_schedule() {
        let mut g = Graph::torus(5, 5).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let params = EquilibriumParams {
            iterations: 20,
            p_reset: 0.1,
            sample_every: Some(5),
            ..Default::default()
        };
        let report = run_equilibrium(&mut g, &params, &mut rng).unwrap();
        let marks: Vec<usize> = report.rounds.iter().map(|r| r.iterations).collect();
        assert_eq!(marks, vec![5, 10, 15, 20]);
        let total_movement: f64 = report.rounds.iter().map(|r| r.movement).sum();
        let drift = report.rounds.last().map(|r| r.geodesic).unwrap_or(0.0)
            - report.before.geodesic;
        assert!(
            (total_movement - drift).abs() < 1e-12,
            "movement entries must telescope"
        );
    }
}
