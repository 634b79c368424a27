//! # aeolus-hindcast
//!
//! Assembles CESM hindcast output files into one labeled array keyed by
//! initialization year (Y), ensemble member (M), and lead time (L).
//!
//! For each initialization year the member files discovered by
//! `aeolus-locate` are opened and stacked along a new M axis. The raw time
//! metadata is untrusted: the time axis is rebuilt as a uniform monthly
//! sequence starting from the first file's decoded start year, and an
//! integer lead-time index becomes the primary temporal dimension, with
//! calendar time demoted to a plain per-cell variable. All per-year blocks
//! are then concatenated in ascending year order into a
//! [`HindcastDataset`].
//!
//! Assembly is all-or-nothing: initialization years with differing file
//! counts abort the whole operation with
//! [`HindcastError::IncompleteFileSet`] before anything is opened.
//!
//! Per-year opens are independent, so they can be spread over a worker
//! pool through the [`MapGather`] seam; ordering of the result never
//! depends on completion order.

mod assemble;
mod client;
mod config;
mod dataset;
mod error;
mod open;
mod time;
mod write;

pub use assemble::{get_monthly_data, get_monthly_data_with};
pub use client::{MapGather, Sequential, WorkerPool};
pub use config::{AssembleConfig, LeadMode, Preprocess};
pub use dataset::HindcastDataset;
pub use error::HindcastError;
pub use write::write_dataset;
