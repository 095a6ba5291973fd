// powerlaw.rs - Degree-distribution analysis: single and broken power-law
// models, least-squares fits against the empirical CDF, and a two-sample
// Kolmogorov-Smirnov check of the result.

use std::collections::BTreeMap;

use rand::Rng;

use crate::error::{PrestigeError, Result};
use crate::graph::Graph;

/// Observed degrees in ascending order with the fraction of nodes at each.
pub fn degree_distribution(g: &Graph) -> Vec<(usize, f64)> {
    let n = g.n();
    if n == 0 {
        return Vec::new();
    }
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for d in g.degrees() {
        *counts.entry(d).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(d, c)| (d, c as f64 / n as f64))
        .collect()
}

/// Continuous power law: density proportional to x^(-alpha) for x >= x_min.
#[derive(Debug, Clone, Copy)]
pub struct PowerLaw {
    pub alpha: f64,
    pub x_min: f64,
}

impl PowerLaw {
    /// Exponent must exceed 1 (else the tail carries infinite mass) and
    /// `x_min` must be positive.
    pub fn new(alpha: f64, x_min: f64) -> Result<Self> {
        if !alpha.is_finite() || alpha <= 1.0 {
            return Err(PrestigeError::InvalidParameter(format!(
                "power-law exponent must exceed 1, got {alpha}"
            )));
        }
        if !x_min.is_finite() || x_min <= 0.0 {
            return Err(PrestigeError::InvalidParameter(format!(
                "x_min must be positive and finite, got {x_min}"
            )));
        }
        Ok(Self { alpha, x_min })
    }

    /// P(X <= x); zero at and below `x_min`.
    pub fn cdf(&self, x: f64) -> f64 {
        if x <= self.x_min {
            0.0
        } else {
            1.0 - (x / self.x_min).powf(1.0 - self.alpha)
        }
    }

    /// Inverse CDF for p in [0, 1); p = 1 has no finite preimage.
    pub fn quantile(&self, p: f64) -> f64 {
        self.x_min * (1.0 - p).powf(-1.0 / (self.alpha - 1.0))
    }

    /// Draw one value by inversion.
    pub fn sample(&self, rng: &mut impl Rng) -> f64 {
        self.quantile(rng.gen::<f64>())
    }

    /// Two-sample KS comparison of `data` (restricted to `x >= x_min`)
    /// against a quantile-stratified sample of the same size from this model.
    pub fn ks_test(&self, data: &[f64]) -> Result<KsTest> {
        let tail = tail_at_least(data, self.x_min)?;
        let model = stratified_sample(tail.len(), |p| self.quantile(p));
        ks_two_sample(&tail, &model)
    }
}

/// Broken power law: exponent `alpha1` from `x_min` up to `x_break`, then
/// `alpha2` beyond it, with the density continuous at the break.
#[derive(Debug, Clone, Copy)]
pub struct DoublePowerLaw {
    pub alpha1: f64,
    pub alpha2: f64,
    pub x_break: f64,
    pub x_min: f64,
}

impl DoublePowerLaw {
    /// Only the tail exponent needs to exceed 1; the head segment covers a
    /// finite interval and is integrable for any exponent.
    pub fn new(alpha1: f64, alpha2: f64, x_break: f64, x_min: f64) -> Result<Self> {
        if !alpha1.is_finite() {
            return Err(PrestigeError::InvalidParameter(format!(
                "head exponent must be finite, got {alpha1}"
            )));
        }
        if !alpha2.is_finite() || alpha2 <= 1.0 {
            return Err(PrestigeError::InvalidParameter(format!(
                "tail exponent must exceed 1, got {alpha2}"
            )));
        }
        if !x_min.is_finite() || x_min <= 0.0 {
            return Err(PrestigeError::InvalidParameter(format!(
                "x_min must be positive and finite, got {x_min}"
            )));
        }
        if !x_break.is_finite() || x_break <= x_min {
            return Err(PrestigeError::InvalidParameter(format!(
                "x_break must exceed x_min, got {x_break}"
            )));
        }
        Ok(Self {
            alpha1,
            alpha2,
            x_break,
            x_min,
        })
    }

    /// Unnormalized masses of the two segments. The tail density carries the
    /// factor `x_break^(alpha2 - alpha1)` so the two pieces meet at the break.
    fn masses(&self) -> (f64, f64) {
        let m1 = prim(self.x_break, self.alpha1) - prim(self.x_min, self.alpha1);
        let c = self.x_break.powf(self.alpha2 - self.alpha1);
        let m2 = -c * prim(self.x_break, self.alpha2);
        (m1, m2)
    }

    /// P(X <= x); zero at and below `x_min`.
    pub fn cdf(&self, x: f64) -> f64 {
        if x <= self.x_min {
            return 0.0;
        }
        let (m1, m2) = self.masses();
        let total = m1 + m2;
        if x < self.x_break {
            (prim(x, self.alpha1) - prim(self.x_min, self.alpha1)) / total
        } else {
            let c = self.x_break.powf(self.alpha2 - self.alpha1);
            (m1 + c * (prim(x, self.alpha2) - prim(self.x_break, self.alpha2))) / total
        }
    }

    /// Inverse CDF for p in [0, 1).
    pub fn quantile(&self, p: f64) -> f64 {
        let (m1, m2) = self.masses();
        let target = p * (m1 + m2);
        if target <= m1 {
            inv_prim(prim(self.x_min, self.alpha1) + target, self.alpha1)
        } else {
            let c = self.x_break.powf(self.alpha2 - self.alpha1);
            inv_prim(
                prim(self.x_break, self.alpha2) + (target - m1) / c,
                self.alpha2,
            )
        }
    }

    /// Same KS comparison as [`PowerLaw::ks_test`]. The resulting p-value is
    /// illustrative for this model, not a calibrated significance level: the
    /// break point was itself chosen from the data.
    pub fn ks_test(&self, data: &[f64]) -> Result<KsTest> {
        let tail = tail_at_least(data, self.x_min)?;
        let model = stratified_sample(tail.len(), |p| self.quantile(p));
        ks_two_sample(&tail, &model)
    }
}

/// Antiderivative of x^(-a), with the log branch at a = 1.
fn prim(x: f64, a: f64) -> f64 {
    if (a - 1.0).abs() < 1e-12 {
        x.ln()
    } else {
        x.powf(1.0 - a) / (1.0 - a)
    }
}

fn inv_prim(v: f64, a: f64) -> f64 {
    if (a - 1.0).abs() < 1e-12 {
        v.exp()
    } else {
        ((1.0 - a) * v).powf(1.0 / (1.0 - a))
    }
}

/// Fit a single power law to `data` by least squares in log-log space.
///
/// The empirical survival function P(X >= x) of a power law is linear in
/// log-log coordinates with slope `1 - alpha`, so the fit is one linear
/// regression over the distinct values at or above `x_min`.
pub fn fit_power_law(data: &[f64], x_min: f64) -> Result<PowerLaw> {
    let points = log_survival_points(data, x_min)?;
    let (slope, _) = linear_regression(&points);
    PowerLaw::new(1.0 - slope, x_min)
}

/// Fit a broken power law: try every admissible break position, regress the
/// two segments separately, keep the split with the smallest total squared
/// residual.
pub fn fit_double_power_law(data: &[f64], x_min: f64) -> Result<DoublePowerLaw> {
    let points = log_survival_points(data, x_min)?;
    let m = points.len();
    if m < 4 {
        return Err(PrestigeError::InvalidParameter(format!(
            "broken power-law fit needs at least 4 distinct values, got {m}"
        )));
    }

    let mut best: Option<(f64, DoublePowerLaw)> = None;
    for k in 2..=(m - 2) {
        let (head, tail) = points.split_at(k);
        let (s1, i1) = linear_regression(head);
        let (s2, i2) = linear_regression(tail);
        // Break at the geometric mean of the two boundary values.
        let x_break = (0.5 * (head[k - 1].0 + tail[0].0)).exp();
        let Ok(model) = DoublePowerLaw::new(1.0 - s1, 1.0 - s2, x_break, x_min) else {
            continue;
        };
        let sse = residual_sse(head, s1, i1) + residual_sse(tail, s2, i2);
        if best.as_ref().map_or(true, |&(b, _)| sse < b) {
            best = Some((sse, model));
        }
    }

    best.map(|(_, model)| model).ok_or_else(|| {
        PrestigeError::InvalidParameter(
            "no admissible break point for broken power-law fit".into(),
        )
    })
}

/// Distinct (ln x, ln P(X >= x)) pairs for the part of `data` at or above
/// `x_min`, ascending in x.
fn log_survival_points(data: &[f64], x_min: f64) -> Result<Vec<(f64, f64)>> {
    if !x_min.is_finite() || x_min <= 0.0 {
        return Err(PrestigeError::InvalidParameter(format!(
            "x_min must be positive and finite, got {x_min}"
        )));
    }

    let mut tail: Vec<f64> = data
        .iter()
        .copied()
        .filter(|x| x.is_finite() && *x >= x_min)
        .collect();
    tail.sort_by(f64::total_cmp);

    let n = tail.len();
    let mut points = Vec::new();
    let mut i = 0;
    while i < n {
        let x = tail[i];
        // Everything from index i upward is >= x.
        points.push((x.ln(), ((n - i) as f64 / n as f64).ln()));
        while i < n && tail[i] == x {
            i += 1;
        }
    }

    if points.len() < 2 {
        return Err(PrestigeError::InvalidParameter(format!(
            "power-law fit needs at least 2 distinct values at or above x_min, got {}",
            points.len()
        )));
    }
    Ok(points)
}

fn linear_regression(points: &[(f64, f64)]) -> (f64, f64) {
    let n = points.len() as f64;
    let sum_x: f64 = points.iter().map(|(x, _)| x).sum();
    let sum_y: f64 = points.iter().map(|(_, y)| y).sum();
    let sum_xx: f64 = points.iter().map(|(x, _)| x * x).sum();
    let sum_xy: f64 = points.iter().map(|(x, y)| x * y).sum();

    let slope = (n * sum_xy - sum_x * sum_y) / (n * sum_xx - sum_x * sum_x);
    let intercept = (sum_y - slope * sum_x) / n;

    (slope, intercept)
}

fn residual_sse(points: &[(f64, f64)], slope: f64, intercept: f64) -> f64 {
    points
        .iter()
        .map(|&(x, y)| {
            let r = y - (slope * x + intercept);
            r * r
        })
        .sum()
}

fn tail_at_least(data: &[f64], x_min: f64) -> Result<Vec<f64>> {
    let tail: Vec<f64> = data
        .iter()
        .copied()
        .filter(|x| x.is_finite() && *x >= x_min)
        .collect();
    if tail.len() < 2 {
        return Err(PrestigeError::InvalidParameter(
            "KS comparison needs at least 2 values at or above x_min".into(),
        ));
    }
    Ok(tail)
}

fn stratified_sample(n: usize, quantile: impl Fn(f64) -> f64) -> Vec<f64> {
    (0..n).map(|i| quantile((i as f64 + 0.5) / n as f64)).collect()
}

/// Result of a two-sample Kolmogorov-Smirnov comparison.
#[derive(Debug, Clone, Copy)]
pub struct KsTest {
    /// Largest gap between the two empirical CDFs.
    pub statistic: f64,
    /// Asymptotic significance of the gap; near 1 means indistinguishable.
    pub p_value: f64,
}

/// Two-sample KS statistic with the asymptotic Kolmogorov p-value.
pub fn ks_two_sample(xs: &[f64], ys: &[f64]) -> Result<KsTest> {
    if xs.is_empty() || ys.is_empty() {
        return Err(PrestigeError::InvalidParameter(
            "KS test needs two non-empty samples".into(),
        ));
    }

    let mut a = xs.to_vec();
    let mut b = ys.to_vec();
    a.sort_by(f64::total_cmp);
    b.sort_by(f64::total_cmp);

    let (n1, n2) = (a.len(), b.len());
    let (mut i, mut j) = (0usize, 0usize);
    let mut d = 0.0f64;
    while i < n1 && j < n2 {
        let (x1, x2) = (a[i], b[j]);
        if x1 <= x2 {
            i += 1;
        }
        if x2 <= x1 {
            j += 1;
        }
        let gap = (i as f64 / n1 as f64 - j as f64 / n2 as f64).abs();
        d = d.max(gap);
    }

    let en = ((n1 * n2) as f64 / (n1 + n2) as f64).sqrt();
    let p_value = kolmogorov_q((en + 0.12 + 0.11 / en) * d);
    Ok(KsTest {
        statistic: d,
        p_value,
    })
}

/// Kolmogorov tail probability Q(lambda) = 2 sum_j (-1)^(j-1) exp(-2 j^2 lambda^2).
fn kolmogorov_q(lambda: f64) -> f64 {
    const EPS1: f64 = 1e-3;
    const EPS2: f64 = 1e-8;

    let a2 = -2.0 * lambda * lambda;
    let mut fac = 2.0;
    let mut sum = 0.0;
    let mut prev_term = 0.0;
    for j in 1..=100 {
        let term = fac * (a2 * (j * j) as f64).exp();
        sum += term;
        if term.abs() <= EPS1 * prev_term || term.abs() <= EPS2 * sum {
            return sum.clamp(0.0, 1.0);
        }
        fac = -fac;
        prev_term = term.abs();
    }
    // The series only fails to settle for tiny lambda, where the answer is 1.
    1.0
}
