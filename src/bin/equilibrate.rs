// src/bin/equilibrate.rs - Grow a torus, run one equilibrium pass, report

use clap::Parser;
use prestige::equilibrium::{run_equilibrium, EquilibriumParams};
use prestige::graph::Graph;
use prestige::prestige::{grow_to_geodesic, GrowthParams};
use rand::SeedableRng;
use rand_pcg::Pcg64;

#[derive(Parser)]
struct Cli {
    /// Torus rows
    #[arg(long, default_value = "10")]
    rows: usize,

    /// Torus columns
    #[arg(long, default_value = "10")]
    cols: usize,

    /// Target mean shortest-path length for the growth phase
    #[arg(long, default_value = "2.5")]
    geodesic: f64,

    /// Equilibrium iterations
    #[arg(long, default_value = "2000")]
    iterations: usize,

    /// Per-iteration probability of a prestige edge addition
    #[arg(long, default_value = "1.0")]
    p_add: f64,

    /// Per-iteration probability of a node reset
    #[arg(long, default_value = "0.1")]
    p_reset: f64,

    /// Distance decay for equilibrium partner selection
    #[arg(long, default_value = "2.0")]
    decay: f64,

    /// RNG seed (seeded from the OS when omitted)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let mut rng = match args.seed {
        Some(s) => Pcg64::seed_from_u64(s),
        None => Pcg64::from_entropy(),
    };

    let mut g = Graph::torus(args.rows, args.cols)?;
    grow_to_geodesic(
        &mut g,
        &GrowthParams {
            target_geodesic: args.geodesic,
        },
        &mut rng,
    )?;

    let params = EquilibriumParams {
        iterations: args.iterations,
        p_add: args.p_add,
        p_reset: args.p_reset,
        decay: args.decay,
        sample_every: None,
    };
    let report = run_equilibrium(&mut g, &params, &mut rng)?;

    println!("before: {}", report.before);
    println!("after:  {}", report.after);
    println!(
        "delta:  geodesic {:+.4}  clustering {:+.4}",
        report.after.geodesic - report.before.geodesic,
        report.after.clustering - report.before.clustering
    );
    println!(
        "{} iterations: {} edges added, {} resets, {} repairs",
        args.iterations, report.edges_added, report.resets, report.repairs
    );

    Ok(())
}
