//! The standard normal distribution N(0, 1).
//!
//! Built on the error function from `statrs` so every function here is total on finite
//! input and never needs a fallible constructor.

use statrs::function::erf::{erfc, erfc_inv};
use std::f64::consts::{PI, SQRT_2};

/// Cumulative distribution function Φ(x).
pub fn cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Survival function 1 - Φ(x), computed without cancellation in the upper tail.
pub fn sf(x: f64) -> f64 {
    0.5 * erfc(x / SQRT_2)
}

/// Probability density function φ(x).
pub fn pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Quantile function Φ⁻¹(p). Returns ±infinity at p = 0 and p = 1.
pub fn quantile(p: f64) -> f64 {
    -SQRT_2 * erfc_inv(2.0 * p)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-7;

    #[test]
    fn test_cdf_known_values() {
        assert!((cdf(0.0) - 0.5).abs() < EPS);
        assert!((cdf(1.959963984540054) - 0.975).abs() < EPS);
        assert!((cdf(-1.0) - 0.15865525393145707).abs() < EPS);
    }

    #[test]
    fn test_sf_is_complement_of_cdf() {
        for x in [-3.0, -1.2, 0.0, 0.7, 2.5] {
            assert!((sf(x) - (1.0 - cdf(x))).abs() < 1e-12);
        }
    }

    #[test]
    fn test_pdf_peak() {
        assert!((pdf(0.0) - 0.3989422804014327).abs() < EPS);
        assert!((pdf(1.5) - pdf(-1.5)).abs() < 1e-15);
    }

    #[test]
    fn test_quantile_inverts_cdf() {
        assert!((quantile(0.975) - 1.959963984540054).abs() < 1e-6);
        assert!((quantile(0.95) - 1.6448536269514722).abs() < 1e-6);
        assert!(quantile(0.5).abs() < 1e-12);
        for p in [0.001, 0.05, 0.3, 0.9, 0.999] {
            assert!((cdf(quantile(p)) - p).abs() < 1e-9);
        }
    }
}
