//! Parameter scan for the prestige-network equilibrium model
//! (see `Config` below for all run parameters).

use prestige::equilibrium::{run_equilibrium, EquilibriumParams, RoundRecord};
use prestige::graph::Graph;
use prestige::prestige::{grow_to_geodesic, GrowthParams};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use indicatif::{ProgressBar, ProgressStyle};
use csv::WriterBuilder;
use std::sync::Mutex;

/// Run-time configuration (single source of truth).
#[derive(Debug, Clone)]
struct Config {
    /// Torus dimensions to scan (rows, cols).
    sizes:           Vec<(usize, usize)>,
    /// Every network is first grown to this mean path length.
    target_geodesic: f64,
    /// Distance-decay values for equilibrium partner selection.
    decay_vals:      Vec<f64>,
    /// Per-iteration reset probabilities.
    p_reset_vals:    Vec<f64>,
    p_add:           f64,
    iterations:      usize,
    sample_every:    usize,
    n_rep:           usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sizes:           vec![(5, 6), (6, 6), (6, 7)],
            target_geodesic: 2.5,
            decay_vals:      (0..=6).map(|i| i as f64).collect(),
            p_reset_vals:    vec![0.1, 0.2, 0.3],
            p_add:           1.0,
            iterations:      2000,
            sample_every:    200,
            n_rep:           4,
        }
    }
}

/// Welford online stats.
#[derive(Default, Clone)]
struct OnlineStats {
    n:    u64,
    mean: f64,
    m2:   f64,
}
impl OnlineStats {
    fn push(&mut self, x: f64) {
        self.n += 1;
        let delta  = x - self.mean;
        self.mean += delta / self.n as f64;
        let delta2 = x - self.mean;
        self.m2   += delta * delta2;
    }
    fn mean(&self) -> f64 { self.mean }
    fn var(&self)  -> f64 { if self.n > 1 { self.m2 / (self.n - 1) as f64 } else { 0.0 } }
    fn std(&self)  -> f64 { self.var().sqrt() }
}

/// Per-parameter-combination summary row, aggregated over replicas.
#[derive(Debug)]
struct Row {
    nodes: usize,
    decay: f64,
    p_reset: f64,
    geodesic_mean: f64,
    geodesic_std: f64,
    clustering_mean: f64,
    clustering_std: f64,
    mean_degree: f64,
    degree_skew: f64,
    edges_added: f64,
    resets: f64,
    repairs: f64,
}

/// One periodic measurement from one replica, tagged with its parameters.
#[derive(Debug)]
struct RoundRow {
    nodes: usize,
    decay: f64,
    p_reset: f64,
    rep: usize,
    rec: RoundRecord,
}

fn main() {
    // ------------------------------------------------------------
    let cfg = Config::default();
    println!("Configuration:\n{cfg:#?}");

    // Flatten the (size, decay, p_reset) grid into one task list.
    let (n_decay, n_reset) = (cfg.decay_vals.len(), cfg.p_reset_vals.len());
    let combos: Vec<(usize, usize, usize)> = (0..cfg.sizes.len())
        .flat_map(|s| {
            (0..n_decay).flat_map(move |d| {
                (0..n_reset).map(move |p| (s, d, p))
            })
        })
        .collect();

    let bar = ProgressBar::new(combos.len() as u64);
    bar.set_style(ProgressStyle::with_template(
        " {bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}]",
    ).unwrap());

    let results: Mutex<Vec<Row>> = Mutex::new(Vec::new());
    let rounds:  Mutex<Vec<RoundRow>> = Mutex::new(Vec::new());

    // Parallel scan over parameter combinations. Replica loop stays serial
    // for determinism.
    combos.par_iter().for_each(|&(s_idx, d_idx, p_idx)| {
        // Separate master RNG per task to avoid contention; seed from OS.
        let mut master = ChaCha20Rng::from_entropy();

        let (rows, cols) = cfg.sizes[s_idx];
        let nodes = rows * cols;
        let decay = cfg.decay_vals[d_idx];
        let p_reset = cfg.p_reset_vals[p_idx];

        let mut stats_geo   = OnlineStats::default();
        let mut stats_clust = OnlineStats::default();
        let mut stats_deg   = OnlineStats::default();
        let mut stats_skew  = OnlineStats::default();
        let mut stats_added = OnlineStats::default();
        let mut stats_reset = OnlineStats::default();
        let mut stats_rep   = OnlineStats::default();

        for rep in 0..cfg.n_rep {
            // Derive a unique u64 seed from (size, decay, p_reset, replica).
            let seed = ((s_idx as u64) << 40)
                | ((d_idx as u64) << 20)
                | ((p_idx as u64) << 10)
                | rep as u64;
            let mut rng = ChaCha20Rng::seed_from_u64(seed ^ master.next_u64());

            let mut g = Graph::torus(rows, cols).expect("valid torus dimensions");
            grow_to_geodesic(
                &mut g,
                &GrowthParams { target_geodesic: cfg.target_geodesic },
                &mut rng,
            )
            .expect("growth phase failed");

            let params = EquilibriumParams {
                iterations:   cfg.iterations,
                p_add:        cfg.p_add,
                p_reset,
                decay,
                sample_every: Some(cfg.sample_every),
            };
            let report = run_equilibrium(&mut g, &params, &mut rng)
                .expect("equilibrium phase failed");

            stats_geo.push(report.after.geodesic);
            stats_clust.push(report.after.clustering);
            stats_deg.push(report.after.mean_degree);
            stats_skew.push(report.after.degree_skew);
            stats_added.push(report.edges_added as f64);
            stats_reset.push(report.resets as f64);
            stats_rep.push(report.repairs as f64);

            let mut log = rounds.lock().unwrap();
            for rec in report.rounds {
                log.push(RoundRow { nodes, decay, p_reset, rep, rec });
            }
        }

        results.lock().unwrap().push(Row {
            nodes, decay, p_reset,
            geodesic_mean:   stats_geo.mean(),   geodesic_std:   stats_geo.std(),
            clustering_mean: stats_clust.mean(), clustering_std: stats_clust.std(),
            mean_degree:     stats_deg.mean(),
            degree_skew:     stats_skew.mean(),
            edges_added:     stats_added.mean(),
            resets:          stats_reset.mean(),
            repairs:         stats_rep.mean(),
        });

        bar.inc(1);
    });
    bar.finish();

    // ------------------------------------------------------------
    // Sort for deterministic CSV order.
    let mut rows = results.into_inner().unwrap();
    rows.sort_by(|a, b| a.nodes.cmp(&b.nodes)
        .then(a.decay.partial_cmp(&b.decay).unwrap())
        .then(a.p_reset.partial_cmp(&b.p_reset).unwrap()));

    let mut wtr = WriterBuilder::new().from_path("equilibrium_scan.csv")
        .expect("cannot create equilibrium_scan.csv");
    wtr.write_record([
        "nodes","decay","p_reset",
        "geodesic_mean","geodesic_std","clustering_mean","clustering_std",
        "mean_degree","degree_skew","edges_added","resets","repairs",
    ]).unwrap();
    for r in &rows {
        wtr.write_record(&[
            r.nodes.to_string(), r.decay.to_string(), r.p_reset.to_string(),
            r.geodesic_mean.to_string(), r.geodesic_std.to_string(),
            r.clustering_mean.to_string(), r.clustering_std.to_string(),
            r.mean_degree.to_string(), r.degree_skew.to_string(),
            r.edges_added.to_string(), r.resets.to_string(), r.repairs.to_string(),
        ]).unwrap();
    }
    wtr.flush().unwrap();

    let mut round_rows = rounds.into_inner().unwrap();
    round_rows.sort_by(|a, b| a.nodes.cmp(&b.nodes)
        .then(a.decay.partial_cmp(&b.decay).unwrap())
        .then(a.p_reset.partial_cmp(&b.p_reset).unwrap())
        .then(a.rep.cmp(&b.rep))
        .then(a.rec.iterations.cmp(&b.rec.iterations)));

    let mut wtr = WriterBuilder::new().from_path("equilibrium_rounds.csv")
        .expect("cannot create equilibrium_rounds.csv");
    wtr.write_record([
        "nodes","decay","p_reset","rep",
        "iterations","edges","geodesic","clustering","movement",
        "mean_degree","degree_skew",
    ]).unwrap();
    for r in &round_rows {
        wtr.write_record(&[
            r.nodes.to_string(), r.decay.to_string(),
            r.p_reset.to_string(), r.rep.to_string(),
            r.rec.iterations.to_string(), r.rec.edges.to_string(),
            r.rec.geodesic.to_string(), r.rec.clustering.to_string(),
            r.rec.movement.to_string(), r.rec.mean_degree.to_string(),
            r.rec.degree_skew.to_string(),
        ]).unwrap();
    }
    wtr.flush().unwrap();

    println!("Scan complete → equilibrium_scan.csv, equilibrium_rounds.csv");
}
