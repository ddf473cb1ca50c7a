//! Transaction number generation.
//!
//! Movement numbers are human-readable and sequential within an
//! organization-day: `TXN-YYYYMMDD-NNNN`. The sequence is derived from a
//! count of the day's movements, so two concurrent writers can observe the
//! same count; the unique constraint on (organization, transaction number)
//! is the safety net and callers retry with a fresh count.

use chrono::NaiveDate;

/// Prefix for all movement transaction numbers.
pub const TRANSACTION_NUMBER_PREFIX: &str = "TXN";

/// Maximum attempts when a generated number collides under concurrency.
pub const MAX_NUMBER_ATTEMPTS: u32 = 3;

/// Formats a transaction number for the given day and 1-based sequence.
#[must_use]
pub fn format_transaction_number(date: NaiveDate, sequence: u64) -> String {
    format!(
        "{TRANSACTION_NUMBER_PREFIX}-{}-{sequence:04}",
        date.format("%Y%m%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_pads_sequence() {
        assert_eq!(
            format_transaction_number(day(2024, 1, 1), 1),
            "TXN-20240101-0001"
        );
        assert_eq!(
            format_transaction_number(day(2024, 12, 31), 42),
            "TXN-20241231-0042"
        );
    }

    #[test]
    fn test_format_sequence_beyond_padding() {
        assert_eq!(
            format_transaction_number(day(2024, 6, 15), 12345),
            "TXN-20240615-12345"
        );
    }
}
