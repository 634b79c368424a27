//! Error types for the aeolus-drift crate.

/// Error type for all fallible operations in the aeolus-drift crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DriftError {
    /// Returned when the reference period is inverted.
    #[error("invalid reference period: {y1}..={y2}")]
    InvalidPeriod {
        /// First reference year.
        y1: i32,
        /// Last reference year.
        y2: i32,
    },

    /// Returned when the field and verification bounds disagree in shape.
    #[error("dimension '{name}' mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Name of the dimension.
        name: String,
        /// Expected size.
        expected: usize,
        /// Actual size.
        got: usize,
    },

    /// Returned when no cell's mean verification time falls inside the
    /// reference period, which would make the climatology all-NaN.
    #[error("no verification times fall inside reference period {y1}..={y2}")]
    EmptyReference {
        /// First reference year.
        y1: i32,
        /// Last reference year.
        y2: i32,
    },

    /// Calendar error.
    #[error(transparent)]
    Calendar(#[from] aeolus_calendar::CalendarError),
}
