//! Validation gate for input batches.
//!
//! Nothing is scored until a batch passes. Emptiness and missing columns
//! stop the check immediately; every other problem is collected so a
//! caller sees the whole list in one pass.

pub mod outcome;
pub mod validator;

pub use outcome::{Diagnostic, DiagnosticKind, ValidationOutcome};
pub use validator::{parse_number, validate, validate_with, ValidationRules};
