//! # aeolus-drift
//!
//! Lead-time-dependent drift removal for assembled hindcast ensembles.
//!
//! A hindcast model drifts from its initialized state toward its own
//! climatology, so the expected bias is a function of forecast lead time.
//! [`remove_drift`] estimates that bias over a reference period and
//! subtracts it:
//!
//! 1. each `(year, lead)` cell's verification bounds are averaged into a
//!    mean date-of-record,
//! 2. cells whose mean date falls strictly inside the reference window are
//!    selected,
//! 3. the field is averaged over ensemble members and initialization years
//!    within that selection (NaN-skipping), yielding the lead-indexed
//!    climatology,
//! 4. the climatology is subtracted from the full field, broadcasting over
//!    years and members, yielding the anomaly.
//!
//! [`linear_drift_remove`] is the same operation under its historical name.

mod error;
mod remove;

pub use error::DriftError;
pub use remove::{linear_drift_remove, remove_drift, DriftCorrection};
