//! Opportunity analysis.
//!
//! This module handles:
//! - Scoring a record and picking its better side
//! - Ranking a batch by expected value
//! - Batch statistics
//! - Filtering ranked results

pub mod engine;
pub mod filter;
pub mod ranker;
pub mod summary;

pub use engine::{analyze, analyze_records, AnalysisOptions, AnalysisReport, SkippedRecord};
pub use filter::ResultFilter;
pub use ranker::{choose_side, rank, score_record};
pub use summary::{summarize, BatchStatistics};
