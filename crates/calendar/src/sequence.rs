//! Monthly sequence generation for the no-leap calendar.

use crate::date::NoLeapDate;
use crate::error::CalendarError;

/// Generates `n_months` consecutive month-start dates beginning at
/// `(year, month)`.
///
/// Year boundaries are handled automatically (December wraps to January of
/// the following year).
///
/// # Errors
///
/// Returns [`CalendarError::InvalidMonth`] if `month` is outside 1..=12.
pub fn month_start_sequence(
    year: i32,
    month: u8,
    n_months: usize,
) -> Result<Vec<NoLeapDate>, CalendarError> {
    let start = NoLeapDate::new(year, month, 1)?;
    let mut dates = Vec::with_capacity(n_months);
    if n_months == 0 {
        return Ok(dates);
    }
    dates.push(start);
    let mut current = start;
    for _ in 1..n_months {
        current = current.next_month_start();
        dates.push(current);
    }
    Ok(dates)
}

/// Generates `n_months` month-start dates beginning January 1 of `year`.
///
/// This is the rebuilt hindcast time axis: the raw time metadata of model
/// output files is untrusted, and the axis is regenerated from the first
/// file's start year.
pub fn month_starts(year: i32, n_months: usize) -> Vec<NoLeapDate> {
    month_start_sequence(year, 1, n_months).expect("month 1 is always valid")
}
