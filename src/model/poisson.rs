//! Poisson count model.
//!
//! A line such as 3.5 is split at `k = floor(line)`: the under side wins on
//! at most `k` events, the over side on more than `k`. An integer line is
//! floored the same way, so `line = 4` and `line = 4.5` share the boundary
//! `k = 4` and a push is never modeled.

use serde::Serialize;

use crate::record::Side;

/// Complementary probabilities for one line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoissonSplit {
    /// P(X <= floor(line)).
    pub prob_at_or_below: f64,
    /// P(X > floor(line)).
    pub prob_above: f64,
}

/// Split the support of Poisson(`rate`) at `line`.
///
/// `rate` must be positive and `line` non-negative; the validator rejects
/// anything else before this is called.
pub fn poisson_split(rate: f64, line: f64) -> PoissonSplit {
    let k = line.floor().max(0.0) as u64;
    let prob_at_or_below = poisson_cdf(k, rate);

    PoissonSplit {
        prob_at_or_below,
        prob_above: 1.0 - prob_at_or_below,
    }
}

/// Standard deviations below the mean where summation starts for large
/// rates. Mass further down is below `exp(-800)`.
const TAIL_WIDTH: f64 = 40.0;

/// Below this `ln(k!)` is summed exactly; above it Stirling's series is used.
const STIRLING_FROM: u64 = 256;

/// P(X <= k) for X ~ Poisson(rate).
///
/// Work is bounded by the window of counts that carry mass, roughly
/// `80 * sqrt(rate)` terms, however large `k` is.
pub fn poisson_cdf(k: u64, rate: f64) -> f64 {
    if rate <= 0.0 {
        return 1.0;
    }

    let p0 = (-rate).exp();
    let cdf = if p0 >= f64::MIN_POSITIVE {
        cdf_direct(k, rate, p0)
    } else {
        // exp(-rate) is subnormal or zero for very large rates.
        cdf_log_space(k, rate)
    };

    cdf.clamp(0.0, 1.0)
}

/// P(X = k) for X ~ Poisson(rate).
pub fn poisson_pmf(k: u64, rate: f64) -> f64 {
    if rate <= 0.0 {
        return if k == 0 { 1.0 } else { 0.0 };
    }

    ln_pmf(k, rate).exp()
}

fn ln_pmf(k: u64, rate: f64) -> f64 {
    -rate + k as f64 * rate.ln() - ln_factorial(k)
}

fn cdf_direct(k: u64, rate: f64, p0: f64) -> f64 {
    let mut term = p0;
    let mut sum = p0;

    for i in 1..=k {
        term *= rate / i as f64;
        sum += term;

        // Past the mode the terms only shrink.
        if i as f64 > rate && term < sum * f64::EPSILON {
            break;
        }
    }

    sum
}

/// First count worth summing for `rate`.
fn tail_start(rate: f64) -> u64 {
    (rate - TAIL_WIDTH * rate.sqrt()).floor().max(0.0) as u64
}

fn cdf_log_space(k: u64, rate: f64) -> f64 {
    let start = tail_start(rate);
    if k < start {
        return 0.0;
    }

    let ln_rate = rate.ln();
    let mut ln_term = ln_pmf(start, rate);
    let mut ln_sum = ln_term;

    for i in start + 1..=k {
        ln_term += ln_rate - (i as f64).ln();
        ln_sum = ln_add_exp(ln_sum, ln_term);

        if i as f64 > rate && ln_term - ln_sum < f64::EPSILON.ln() {
            break;
        }
    }

    ln_sum.exp()
}

fn ln_add_exp(a: f64, b: f64) -> f64 {
    let (hi, lo) = if a > b { (a, b) } else { (b, a) };
    hi + (lo - hi).exp().ln_1p()
}

fn ln_factorial(k: u64) -> f64 {
    if k < STIRLING_FROM {
        return (2..=k).map(|i| (i as f64).ln()).sum();
    }

    let n = k as f64;
    let inv = 1.0 / n;
    let inv2 = inv * inv;
    n * n.ln() - n + 0.5 * (2.0 * std::f64::consts::PI * n).ln()
        + inv * (1.0 / 12.0 - inv2 * (1.0 / 360.0 - inv2 / 1260.0))
}

/// Probability mass at one count, tagged with the side it pays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistributionPoint {
    /// Event count.
    pub count: u64,
    /// P(X = count).
    pub probability: f64,
    /// Side of the line this count settles.
    pub side: Side,
}

/// Probability mass for counts `0..=max_k` against `line`.
pub fn distribution(rate: f64, line: f64, max_k: u64) -> Vec<DistributionPoint> {
    let boundary = line.floor().max(0.0) as u64;

    (0..=max_k)
        .map(|count| DistributionPoint {
            count,
            probability: poisson_pmf(count, rate),
            side: if count <= boundary {
                Side::AtOrBelow
            } else {
                Side::Above
            },
        })
        .collect()
}

/// Default upper count for a distribution view.
pub fn default_max_count(rate: f64) -> u64 {
    (rate * 3.0).ceil().max(0.0) as u64 + 4
}
