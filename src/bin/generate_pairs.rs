// src/bin/generate_pairs.rs - Correlated Beta pairs on stdout

use clap::Parser;
use prestige::copula::{sample_correlated_beta_pairs, BetaMarginal};
use rand::SeedableRng;
use rand_pcg::Pcg64;

/// Draw correlated Beta pairs through a Gaussian copula and print them as a
/// row-numbered table.
#[derive(Parser)]
#[command(allow_negative_numbers = true)]
struct Cli {
    /// First marginal shape a
    a1: f64,

    /// First marginal shape b
    b1: f64,

    /// Second marginal shape a
    a2: f64,

    /// Second marginal shape b
    b2: f64,

    /// Copula correlation in [-1, 1]
    rho: f64,

    /// Number of pairs to draw
    count: usize,

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

    let m1 = BetaMarginal::new(args.a1, args.b1)?;
    let m2 = BetaMarginal::new(args.a2, args.b2)?;
    let pairs = sample_correlated_beta_pairs(m1, m2, args.rho, args.count, &mut rng)?;

    // Header line, then one numbered row per pair; downstream scripts split
    // on whitespace.
    println!("x1 x2");
    for (i, (x1, x2)) in pairs.iter().enumerate() {
        println!("{} {:.6} {:.6}", i + 1, x1, x2);
    }

    Ok(())
}
