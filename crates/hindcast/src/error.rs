//! Error types for the aeolus-hindcast crate.

use std::path::PathBuf;

/// Error type for all fallible operations in the aeolus-hindcast crate.
///
/// Covers the fatal ensemble-completeness check, NetCDF failures, data-model
/// mismatches between member files, and lead-time assignment problems.
#[derive(Debug, thiserror::Error)]
pub enum HindcastError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an error originating from the NetCDF library.
    #[error("netcdf error: {reason}")]
    Netcdf {
        /// Description of the underlying NetCDF failure.
        reason: String,
    },

    /// Returned when a required variable is not present in a file.
    #[error("variable '{name}' not found in {}", path.display())]
    MissingVariable {
        /// Name of the missing variable.
        name: String,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when a dimension has an unexpected size.
    #[error("dimension '{name}' mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Name of the dimension.
        name: String,
        /// Expected size.
        expected: usize,
        /// Actual size.
        got: usize,
    },

    /// Returned when initialization years carry differing file counts.
    ///
    /// This is the single fatal completeness check: no partial result is
    /// produced and nothing is opened.
    #[error("incomplete set of files: years {years:?} have file counts {counts:?}")]
    IncompleteFileSet {
        /// The retained initialization years.
        years: Vec<i32>,
        /// File count per year, parallel to `years`.
        counts: Vec<usize>,
    },

    /// Returned when an explicit lead list does not match the time axis.
    #[error("lead list has {got} entries but files carry {expected} months")]
    LeadLengthMismatch {
        /// Months in the file time axis.
        expected: usize,
        /// Entries in the supplied lead list.
        got: usize,
    },

    /// Returned when a time value or units attribute cannot be decoded.
    #[error("invalid time: {reason}")]
    InvalidTime {
        /// Description of the time decoding issue.
        reason: String,
    },

    /// Returned when discovery finds no files for any initialization year.
    #[error("no files found for any initialization year")]
    EmptyManifest,

    /// Wraps an array shape failure during stacking.
    #[error("array shape error: {reason}")]
    Shape {
        /// Description of the shape failure.
        reason: String,
    },

    /// File discovery error.
    #[error(transparent)]
    Locate(#[from] aeolus_locate::LocateError),

    /// Calendar error.
    #[error(transparent)]
    Calendar(#[from] aeolus_calendar::CalendarError),
}

impl From<netcdf::Error> for HindcastError {
    fn from(e: netcdf::Error) -> Self {
        HindcastError::Netcdf {
            reason: e.to_string(),
        }
    }
}

impl From<ndarray::ShapeError> for HindcastError {
    fn from(e: ndarray::ShapeError) -> Self {
        HindcastError::Shape {
            reason: e.to_string(),
        }
    }
}
