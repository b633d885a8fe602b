//! Error taxonomy for ledger and import operations.
//!
//! Store-level failures (duplicate date, bad index) and import-level failures
//! (unrecognized headers, unreadable payload) are distinct variants so that
//! callers can tell "no work was done because of a structural problem" apart
//! from "some rows were skipped but the rest succeeded".

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// An add (or a date-changing edit) targeted a date that already has an
    /// entry. The store is unchanged when this is returned.
    #[error("an entry already exists for date '{0}'")]
    DuplicateDate(String),

    /// An edit or delete named a position that does not exist.
    #[error("no entry at position {index}, the ledger has {len} entries")]
    IndexOutOfRange { index: usize, len: usize },

    /// Header resolution failed: fewer than the minimum number of expected
    /// columns could be matched, so no rows were processed.
    #[error(
        "could not recognize the schedule: only {matched} of {expected} \
        expected columns were found in the header row"
    )]
    UnrecognizedSchedule { matched: usize, expected: usize },

    /// The payload bytes could not be decoded into a grid at all, for
    /// example a workbook with no sheets.
    #[error("unreadable payload: {0}")]
    MalformedPayload(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_problem() {
        let e = Error::DuplicateDate("2024-01-01".to_string());
        assert!(e.to_string().contains("2024-01-01"));

        let e = Error::IndexOutOfRange { index: 9, len: 3 };
        assert!(e.to_string().contains('9'));
        assert!(e.to_string().contains('3'));

        let e = Error::UnrecognizedSchedule {
            matched: 2,
            expected: 6,
        };
        assert!(e.to_string().contains("2 of 6"));
    }
}
