//! Integration tests for the expected value engine.
//!
//! These drive the public API end to end: sheet text in, ranked results
//! and statistics out.

mod analysis;
mod persistence;
mod validation;
