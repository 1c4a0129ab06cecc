//! Built-in demonstration batch.

use crate::record::{BettingRecord, RawTable};

/// Eight-player kill-line batch used for demos and smoke tests.
pub fn sample_records() -> Vec<BettingRecord> {
    vec![
        BettingRecord::new("Caps", 5.2, 4.5, 1.75, 2.05),
        BettingRecord::new("Rekkles", 4.1, 4.5, 2.10, 1.70),
        BettingRecord::new("Humanoid", 3.5, 3.5, 2.20, 1.65),
        BettingRecord::new("Hans Sama", 6.2, 5.5, 1.90, 1.85),
        BettingRecord::new("Carzzy", 3.8, 3.5, 1.85, 1.95),
        BettingRecord::new("Upset", 4.7, 4.5, 1.95, 1.80),
        BettingRecord::new("Jankos", 2.8, 2.5, 2.50, 1.50),
        BettingRecord::new("Razork", 3.2, 3.5, 2.15, 1.68),
    ]
}

/// The demonstration batch in the canonical schema.
pub fn sample_table() -> RawTable {
    RawTable::from_records(&sample_records())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate;

    #[test]
    fn sample_passes_validation() {
        let table = sample_table();
        assert_eq!(table.len(), 8);
        assert!(validate(&table).valid);
    }
}
