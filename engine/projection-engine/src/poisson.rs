//! Poisson distribution helpers
//!
//! All functions build the mass function incrementally
//! (p₀ = e^{-λ}, pₖ = pₖ₋₁ · λ / k) so neither λ^k nor k! is ever
//! materialized. Above `LOG_SPACE_LAMBDA` e^{-λ} underflows, so the same
//! recurrence runs on ln pₖ instead. Callers are responsible for passing a
//! finite λ.

/// Rates above this are evaluated in log space
pub const LOG_SPACE_LAMBDA: f64 = 700.0;

fn use_log_space(lambda: f64) -> bool {
    lambda > LOG_SPACE_LAMBDA
}

/// ln(e^a + e^b) without leaving log space
fn log_add(a: f64, b: f64) -> f64 {
    if a == f64::NEG_INFINITY {
        return b;
    }
    let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
    hi + (lo - hi).exp().ln_1p()
}

/// Probability mass for k = 0..=max_k
pub fn poisson_pmf(lambda: f64, max_k: u64) -> Vec<f64> {
    let mut out = Vec::with_capacity(max_k as usize + 1);
    if use_log_space(lambda) {
        let ln_lambda = lambda.ln();
        let mut ln_term = -lambda;
        out.push(ln_term.exp());
        for k in 1..=max_k {
            ln_term += ln_lambda - (k as f64).ln();
            out.push(ln_term.exp());
        }
        return out;
    }

    let mut term = (-lambda).exp();
    out.push(term);
    for k in 1..=max_k {
        term *= lambda / k as f64;
        out.push(term);
    }
    out
}

/// P(X <= k) for X ~ Poisson(lambda)
///
/// Once past the mode the terms shrink geometrically, so the sum stops as
/// soon as a term can no longer move it. This keeps absurd lines (k in the
/// billions) from spinning.
pub fn poisson_cdf(lambda: f64, k: u64) -> f64 {
    if use_log_space(lambda) {
        return log_poisson_cdf(lambda, k).exp();
    }

    let mut term = (-lambda).exp();
    let mut sum = term;
    for i in 1..=k {
        term *= lambda / i as f64;
        sum += term;
        if i as f64 > lambda.abs() && term.abs() <= sum.abs() * f64::EPSILON {
            break;
        }
    }
    sum
}

/// ln P(X <= k) for a positive λ
fn log_poisson_cdf(lambda: f64, k: u64) -> f64 {
    let ln_lambda = lambda.ln();
    let ln_eps = f64::EPSILON.ln();
    let mut ln_term = -lambda;
    let mut ln_sum = ln_term;
    for i in 1..=k {
        ln_term += ln_lambda - (i as f64).ln();
        ln_sum = log_add(ln_sum, ln_term);
        if i as f64 > lambda && ln_term <= ln_sum + ln_eps {
            break;
        }
    }
    ln_sum
}

/// P(X > k) for X ~ Poisson(lambda), clamped to [0, 1]
///
/// Accumulated rounding can push the CDF marginally past 1 for small λ and
/// large k; the clamp removes that noise only and is never applied to λ.
/// A NaN CDF (λ far below zero) stays NaN.
pub fn poisson_survival(lambda: f64, k: u64) -> f64 {
    survival_from_cdf(poisson_cdf(lambda, k))
}

/// 1 - cdf clamped to [0, 1], NaN preserved
pub fn survival_from_cdf(cdf: f64) -> f64 {
    (1.0 - cdf).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_cdf_at_zero_is_exp_neg_lambda() {
        for lambda in [0.0_f64, 0.5, 2.9917, 10.0] {
            assert!((poisson_cdf(lambda, 0) - (-lambda).exp()).abs() < EPS);
        }
    }

    #[test]
    fn test_zero_rate_puts_all_mass_at_zero() {
        assert_eq!(poisson_cdf(0.0, 0), 1.0);
        assert_eq!(poisson_cdf(0.0, 25), 1.0);
        assert_eq!(poisson_survival(0.0, 7), 0.0);
    }

    #[test]
    fn test_cdf_matches_direct_formula() {
        let lambda: f64 = 3.2;
        let mut factorial = 1.0;
        let mut direct = 0.0;
        for k in 0..=6u32 {
            if k > 0 {
                factorial *= k as f64;
            }
            direct += (-lambda).exp() * lambda.powi(k as i32) / factorial;
        }
        assert!((poisson_cdf(lambda, 6) - direct).abs() < EPS);
    }

    #[test]
    fn test_pmf_sums_to_cdf() {
        let pmf = poisson_pmf(4.0, 9);
        assert_eq!(pmf.len(), 10);

        let total: f64 = pmf.iter().sum();
        assert!((total - poisson_cdf(4.0, 9)).abs() < EPS);
    }

    #[test]
    fn test_huge_line_terminates() {
        assert!((poisson_cdf(3.0, u64::MAX) - 1.0).abs() < 1e-12);
        assert!(poisson_survival(3.0, 1_000_000_000_000) < 1e-12);
    }

    #[test]
    fn test_large_rate_uses_log_space() {
        // e^{-5000} underflows, yet the tail must still depend on the line
        assert!(poisson_survival(5000.0, 4000) > 1.0 - 1e-9);
        assert!(poisson_survival(5000.0, 6000) < 1e-12);

        let at_mean = poisson_survival(5000.0, 5000);
        assert!(at_mean > 0.45 && at_mean < 0.55, "P(X > mean) = {}", at_mean);

        let pmf = poisson_pmf(5000.0, 5000);
        assert!(pmf[5000] > 0.005 && pmf[5000] < 0.006);
        assert_eq!(pmf[0], 0.0);
    }

    #[test]
    fn test_log_space_agrees_near_threshold() {
        // Both paths evaluated at rates straddling the switch-over
        let linear = poisson_cdf(LOG_SPACE_LAMBDA, 720);
        let logged = poisson_cdf(LOG_SPACE_LAMBDA + 1e-9, 720);
        assert!((linear - logged).abs() < 1e-9, "{} vs {}", linear, logged);
    }

    #[test]
    fn test_deeply_negative_rate_is_nan() {
        assert!(poisson_cdf(-900.0, 4).is_nan());
        assert!(poisson_survival(-900.0, 4).is_nan());
    }

    #[test]
    fn test_large_line_stays_finite() {
        let cdf = poisson_cdf(120.0, 150);
        assert!(cdf.is_finite());
        assert!(cdf > 0.99 && cdf <= 1.0 + 1e-9);

        let over = poisson_survival(120.0, 150);
        assert!(over.is_finite());
        assert!((0.0..=1.0).contains(&over));

        // Far past the mean the tail is effectively zero, never negative
        let tail = poisson_survival(2.0, 500);
        assert!((0.0..1e-12).contains(&tail));
    }
}
