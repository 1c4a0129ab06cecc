//! Record module for over/under count lines.
//!
//! This module handles:
//! - Typed input records and scored results
//! - The recommended side of a line
//! - Raw tabular batches as they arrive from a sheet

pub mod table;
pub mod types;

pub use table::{normalize_header, Column, RawTable};
pub use types::{AnalysisResult, BettingRecord, Side};
