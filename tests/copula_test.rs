//! Statistical sanity of the Gaussian-copula Beta sampler.

use prestige::copula::{sample_correlated_beta_pairs, BetaMarginal};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn pearson(pairs: &[(f64, f64)]) -> f64 {
    let n = pairs.len() as f64;
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for &(x, y) in pairs {
        sxy += (x - mx) * (y - my);
        sxx += (x - mx) * (x - mx);
        syy += (y - my) * (y - my);
    }
    sxy / (sxx * syy).sqrt()
}

#[test]
fn test_marginal_means_match_the_beta_parameters() {
    let mut rng = ChaCha20Rng::seed_from_u64(21);
    let m1 = BetaMarginal::new(2.0, 5.0).unwrap();
    let m2 = BetaMarginal::new(5.0, 2.0).unwrap();
    let pairs = sample_correlated_beta_pairs(m1, m2, 0.0, 2000, &mut rng).unwrap();

    let n = pairs.len() as f64;
    let mean1: f64 = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean2: f64 = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    assert!(
        (mean1 - m1.mean()).abs() < 0.03,
        "first marginal mean {mean1} vs {}",
        m1.mean()
    );
    assert!(
        (mean2 - m2.mean()).abs() < 0.03,
        "second marginal mean {mean2} vs {}",
        m2.mean()
    );
}

#[test]
fn test_sample_correlation_follows_rho() {
    let m = BetaMarginal::new(2.0, 3.0).unwrap();

    let mut rng = ChaCha20Rng::seed_from_u64(100);
    let positive = sample_correlated_beta_pairs(m, m, 0.8, 2000, &mut rng).unwrap();
    let r_pos = pearson(&positive);
    assert!(r_pos > 0.5, "rho 0.8 gave sample correlation {r_pos}");

    let mut rng = ChaCha20Rng::seed_from_u64(101);
    let negative = sample_correlated_beta_pairs(m, m, -0.8, 2000, &mut rng).unwrap();
    let r_neg = pearson(&negative);
    assert!(r_neg < -0.5, "rho -0.8 gave sample correlation {r_neg}");

    let mut rng = ChaCha20Rng::seed_from_u64(102);
    let independent = sample_correlated_beta_pairs(m, m, 0.0, 2000, &mut rng).unwrap();
    let r_zero = pearson(&independent);
    assert!(
        r_zero.abs() < 0.1,
        "rho 0 gave sample correlation {r_zero}"
    );
}
