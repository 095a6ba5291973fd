// copula.rs - Correlated Beta pairs through a Gaussian copula.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::error::{PrestigeError, Result};
use crate::special::{inv_betai, norm_cdf};

/// Beta(a, b) marginal for one side of a sampled pair.
#[derive(Debug, Clone, Copy)]
pub struct BetaMarginal {
    pub a: f64,
    pub b: f64,
}

impl BetaMarginal {
    pub fn new(a: f64, b: f64) -> Result<Self> {
        if !a.is_finite() || a <= 0.0 || !b.is_finite() || b <= 0.0 {
            return Err(PrestigeError::InvalidParameter(format!(
                "Beta shape parameters must be positive, got a={a} b={b}"
            )));
        }
        Ok(Self { a, b })
    }

    /// Beta quantile via the inverse regularized incomplete beta.
    pub fn quantile(&self, p: f64) -> f64 {
        inv_betai(self.a, self.b, p)
    }

    pub fn mean(&self) -> f64 {
        self.a / (self.a + self.b)
    }
}

/// Draw `count` pairs whose marginals are `m1` and `m2` and whose dependence
/// comes from a Gaussian copula with correlation `rho`.
///
/// Each pair starts as a correlated standard normal pair
/// `(z, rho z + sqrt(1 - rho^2) z')`, is mapped through the normal CDF to a
/// pair of correlated uniforms, and finishes through the two Beta quantiles.
/// The marginals come out exactly Beta; `rho` sets the dependence of the
/// underlying normals, so the correlation of the pairs themselves matches it
/// in sign and roughly in magnitude.
pub fn sample_correlated_beta_pairs(
    m1: BetaMarginal,
    m2: BetaMarginal,
    rho: f64,
    count: usize,
    rng: &mut impl Rng,
) -> Result<Vec<(f64, f64)>> {
    if !rho.is_finite() || !(-1.0..=1.0).contains(&rho) {
        return Err(PrestigeError::InvalidParameter(format!(
            "correlation must lie in [-1, 1], got {rho}"
        )));
    }
    if count == 0 {
        return Err(PrestigeError::InvalidParameter(
            "pair count must be positive".into(),
        ));
    }

    let spread = (1.0 - rho * rho).sqrt();
    let mut pairs = Vec::with_capacity(count);
    for _ in 0..count {
        let z1: f64 = rng.sample(StandardNormal);
        let z2: f64 = rng.sample(StandardNormal);
        let w = rho * z1 + spread * z2;
        pairs.push((m1.quantile(norm_cdf(z1)), m2.quantile(norm_cdf(w))));
    }
    Ok(pairs)
}
