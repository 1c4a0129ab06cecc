//! Sheet input and output.
//!
//! Reading and writing delimited batches and result sheets, joining a
//! rate sheet with an odds sheet, and the demonstration batch.

pub mod delimited;
pub mod join;
pub mod sample;

pub use delimited::{
    parse_results, parse_table, read_results, read_table, results_to_csv, write_results,
    write_table, RESULT_HEADERS,
};
pub use join::{
    join, load_odds_sheet, load_rate_sheet, JoinedBatch, OddsEntry, OddsLimits, RateEntry,
};
pub use sample::{sample_records, sample_table};
