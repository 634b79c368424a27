//! # aeolus-calendar
//!
//! Pure date arithmetic for the 365-day no-leap calendar used by CESM
//! hindcast output.
//!
//! Hindcast assembly rebuilds every file's time axis as a uniform monthly
//! sequence of month-start dates, and drift removal compares averaged
//! verification times against a reference window. Both operations work on
//! [`NoLeapDate`] values and their serial-day representation.
//!
//! ## Quick Start
//!
//! ```
//! use aeolus_calendar::{NoLeapDate, month_starts};
//!
//! let axis = month_starts(1980, 14);
//! assert_eq!(axis[0], NoLeapDate::new(1980, 1, 1).unwrap());
//! assert_eq!(axis[13], NoLeapDate::new(1981, 2, 1).unwrap());
//!
//! // Serial days are order-preserving, so averaged times can be compared
//! // numerically.
//! let d = NoLeapDate::new(1980, 3, 1).unwrap();
//! assert!(d.serial_days() > axis[0].serial_days());
//! ```

mod date;
mod error;
mod sequence;

pub use date::NoLeapDate;
pub use error::CalendarError;
pub use sequence::{month_start_sequence, month_starts};
