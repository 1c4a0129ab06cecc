//! Probability and pricing model.
//!
//! This module handles:
//! - Poisson probabilities for a count against a line
//! - Decimal odds to implied probability conversion
//! - Expected value of backing a side

pub mod odds;
pub mod poisson;

pub use odds::{edge, expected_value, implied_probability, overround};
pub use poisson::{
    default_max_count, distribution, poisson_cdf, poisson_pmf, poisson_split, DistributionPoint,
    PoissonSplit,
};
