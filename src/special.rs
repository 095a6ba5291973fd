// special.rs - The handful of special functions the copula sampler needs:
// ln-gamma, the regularized incomplete beta with its inverse, and the
// standard normal CDF. Hand-rolled to standard recipes; accuracy targets
// are the ~1e-7 of the classic rational approximations, plenty for
// sampling work.

use std::f64::consts::PI;

/// Lanczos coefficients for g = 7, n = 9.
const LANCZOS: [f64; 9] = [
    0.999_999_999_999_809_93,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_13,
    -176.615_029_162_140_59,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_571_6e-6,
    1.505_632_735_149_311_6e-7,
];

/// Natural log of the gamma function, via the Lanczos approximation with
/// reflection for the left half-line.
pub fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        (PI / (PI * x).sin()).ln() - ln_gamma(1.0 - x)
    } else {
        let x = x - 1.0;
        let mut acc = LANCZOS[0];
        for (i, &c) in LANCZOS.iter().enumerate().skip(1) {
            acc += c / (x + i as f64);
        }
        let t = x + 7.5;
        0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + acc.ln()
    }
}

/// Regularized incomplete beta function I_x(a, b) for a, b > 0, 0 <= x <= 1.
///
/// This is the CDF of the Beta(a, b) distribution. Evaluated through the
/// continued fraction, switched at the symmetry point so the fraction always
/// converges quickly.
pub fn betai(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    // Front factor x^a (1-x)^b / (a B(a, b)), kept in log space; note it is
    // symmetric under (a, b, x) -> (b, a, 1-x) apart from the 1/a.
    let ln_front = ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b)
        + a * x.ln()
        + b * (1.0 - x).ln();
    let front = ln_front.exp();

    if x < (a + 1.0) / (a + b + 2.0) {
        front * betacf(a, b, x) / a
    } else {
        1.0 - front * betacf(b, a, 1.0 - x) / b
    }
}

/// Continued fraction for `betai`, modified Lentz iteration.
fn betacf(a: f64, b: f64, x: f64) -> f64 {
    const MAX_ITER: usize = 200;
    const EPS: f64 = 3.0e-14;
    const FPMIN: f64 = 1.0e-300;

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < FPMIN {
        d = FPMIN;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=MAX_ITER {
        let m = m as f64;
        let m2 = 2.0 * m;

        // Even step.
        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 + aa * d;
        if d.abs() < FPMIN {
            d = FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < FPMIN {
            c = FPMIN;
        }
        d = 1.0 / d;
        h *= d * c;

        // Odd step.
        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < FPMIN {
            d = FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < FPMIN {
            c = FPMIN;
        }
        d = 1.0 / d;
        let del = d * c;
        h *= del;

        if (del - 1.0).abs() < EPS {
            break;
        }
    }
    h
}

/// Inverse of `betai` in x: the Beta(a, b) quantile function.
///
/// Newton iteration on the CDF, bracketed by bisection so a wild Newton step
/// can never leave (0, 1).
pub fn inv_betai(a: f64, b: f64, p: f64) -> f64 {
    if p <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return 1.0;
    }

    let ln_beta = ln_gamma(a) + ln_gamma(b) - ln_gamma(a + b);
    let mut lo = 0.0f64;
    let mut hi = 1.0f64;
    let mut x = a / (a + b);

    for _ in 0..100 {
        let f = betai(a, b, x) - p;
        if f.abs() < 1e-13 {
            break;
        }
        if f > 0.0 {
            hi = x;
        } else {
            lo = x;
        }

        let ln_pdf = (a - 1.0) * x.ln() + (b - 1.0) * (1.0 - x).ln() - ln_beta;
        let next = x - f * (-ln_pdf).exp();
        x = if next > lo && next < hi {
            next
        } else {
            0.5 * (lo + hi)
        };

        if hi - lo < 1e-15 {
            break;
        }
    }
    x
}

/// Standard normal CDF via a rational erfc approximation (absolute error
/// below 1.2e-7 everywhere).
pub fn norm_cdf(z: f64) -> f64 {
    0.5 * erfc(-z / std::f64::consts::SQRT_2)
}

fn erfc(x: f64) -> f64 {
    let t = 1.0 / (1.0 + 0.5 * x.abs());
    let ans = t
        * (-x * x - 1.265_512_23
            + t * (1.000_023_68
                + t * (0.374_091_96
                    + t * (0.096_784_18
                        + t * (-0.186_288_06
                            + t * (0.278_868_07
                                + t * (-1.135_203_98
                                    + t * (1.488_515_87
                                        + t * (-0.822_152_23 + t * 0.170_872_77)))))))))
            .exp();
    if x >= 0.0 {
        ans
    } else {
        2.0 - ans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ln_gamma_known_values() {
        assert!(ln_gamma(1.0).abs() < 1e-12);
        assert!(ln_gamma(2.0).abs() < 1e-12);
        assert!((ln_gamma(5.0) - 24.0f64.ln()).abs() < 1e-10);
        assert!((ln_gamma(0.5) - PI.sqrt().ln()).abs() < 1e-10);
        assert!((ln_gamma(10.0) - 362_880.0f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn betai_closed_forms() {
        // I_x(1, 1) = x.
        assert!((betai(1.0, 1.0, 0.3) - 0.3).abs() < 1e-12);
        // I_x(1, b) = 1 - (1-x)^b.
        assert!((betai(1.0, 3.0, 0.2) - (1.0 - 0.8f64.powi(3))).abs() < 1e-12);
        // I_x(a, 1) = x^a.
        assert!((betai(2.5, 1.0, 0.7) - 0.7f64.powf(2.5)).abs() < 1e-12);
        // Symmetry: I_{1/2}(a, a) = 1/2.
        assert!((betai(4.2, 4.2, 0.5) - 0.5).abs() < 1e-12);
        // Endpoints.
        assert_eq!(betai(2.0, 3.0, 0.0), 0.0);
        assert_eq!(betai(2.0, 3.0, 1.0), 1.0);
    }

    #[test]
    fn inv_betai_round_trips() {
        for &(a, b) in &[(2.0, 2.0), (0.5, 0.5), (5.0, 1.5), (1.0, 3.0)] {
            for &x in &[0.05, 0.3, 0.5, 0.9] {
                let p = betai(a, b, x);
                let back = inv_betai(a, b, p);
                assert!(
                    (back - x).abs() < 1e-9,
                    "Beta({a},{b}) quantile round trip at {x}: got {back}"
                );
            }
        }
        assert!((inv_betai(2.0, 2.0, 0.5) - 0.5).abs() < 1e-12);
        assert_eq!(inv_betai(2.0, 2.0, 0.0), 0.0);
        assert_eq!(inv_betai(2.0, 2.0, 1.0), 1.0);
    }

    #[test]
    fn norm_cdf_known_values() {
        assert!((norm_cdf(0.0) - 0.5).abs() < 1e-7);
        assert!((norm_cdf(1.959_964) - 0.975).abs() < 1e-6);
        assert!((norm_cdf(-1.0) - 0.158_655_25).abs() < 1e-6);
        assert!(norm_cdf(8.0) > 1.0 - 1e-14);
        assert!(norm_cdf(-8.0) < 1e-14);
    }
}
