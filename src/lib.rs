//! Poisson-based expected value analysis for over/under count lines.
//!
//! Given a subject's historical mean count (e.g. kills per game) and a
//! bookmaker's over/under line with decimal odds on both sides, this
//! library models the count as Poisson, prices both sides, and ranks the
//! batch by the expected value of the better side.
//!
//! # Model
//!
//! With rate λ and line L, the line splits at k = floor(L):
//!
//! ```text
//! P(at or below) = P(X <= k)
//! P(above)       = 1 - P(X <= k)
//! EV(side)       = P(side) * odds(side) - 1
//! ```
//!
//! A side is profitable when its EV is strictly positive.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`record`]: Input records, results and raw batches
//! - [`validation`]: The validation gate for input batches
//! - [`model`]: Poisson probabilities, odds conversion and expected value
//! - [`analysis`]: Scoring, ranking, statistics and filtering
//! - [`sheet`]: Delimited-text persistence and the rate/odds join
//! - [`output`]: Table and JSON rendering
//! - [`metrics`]: Engine metrics

pub mod analysis;
pub mod config;
pub mod error;
pub mod metrics;
pub mod model;
pub mod output;
pub mod record;
pub mod sheet;
pub mod validation;

pub use config::Config;
pub use error::{PropEvError, Result};
