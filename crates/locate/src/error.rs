//! Error types for the aeolus-locate crate.

use std::path::PathBuf;

/// Error type for all fallible operations in the aeolus-locate crate.
#[derive(Debug, thiserror::Error)]
pub enum LocateError {
    /// Returned when an expanded template is not a valid glob pattern.
    #[error("invalid glob pattern '{pattern}': {reason}")]
    Pattern {
        /// The expanded pattern that failed to parse.
        pattern: String,
        /// Description of the parse failure.
        reason: String,
    },

    /// Returned when a matched path cannot be read during glob iteration.
    #[error("glob iteration failed: {reason}")]
    Glob {
        /// Description of the underlying filesystem failure.
        reason: String,
    },

    /// Returned when a file name does not follow the expected naming
    /// convention and no initialization year can be extracted.
    #[error("cannot extract initialization year from '{file}': {reason}")]
    YearParse {
        /// The offending file name.
        file: String,
        /// Why extraction failed.
        reason: String,
    },

    /// Returned when two files map to the same initialization year under
    /// [`ConflictPolicy::Error`](crate::ConflictPolicy::Error).
    #[error(
        "two files map to initialization year {year}: '{}' and '{}'",
        kept.display(),
        duplicate.display()
    )]
    DuplicateYear {
        /// The colliding initialization year.
        year: i32,
        /// The path already indexed for this year.
        kept: PathBuf,
        /// The newly discovered path for the same year.
        duplicate: PathBuf,
    },

    /// Returned when the requested year range is empty.
    #[error("empty year range: first year {first} is after last year {last}")]
    EmptyYearRange {
        /// Requested first initialization year.
        first: i32,
        /// Requested last initialization year.
        last: i32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_year_parse() {
        let err = LocateError::YearParse {
            file: "run.bad.nc".to_string(),
            reason: "no 4-digit component".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "cannot extract initialization year from 'run.bad.nc': no 4-digit component"
        );
    }

    #[test]
    fn display_duplicate_year() {
        let err = LocateError::DuplicateYear {
            year: 1980,
            kept: PathBuf::from("a.nc"),
            duplicate: PathBuf::from("b.nc"),
        };
        assert_eq!(
            err.to_string(),
            "two files map to initialization year 1980: 'a.nc' and 'b.nc'"
        );
    }

    #[test]
    fn display_empty_year_range() {
        let err = LocateError::EmptyYearRange {
            first: 1990,
            last: 1980,
        };
        assert_eq!(
            err.to_string(),
            "empty year range: first year 1990 is after last year 1980"
        );
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<LocateError>();
    }
}
