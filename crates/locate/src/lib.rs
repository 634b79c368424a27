//! # aeolus-locate
//!
//! Locates CESM hindcast output files by naming convention and groups them
//! into per-initialization-year manifests.
//!
//! A [`FileTemplate`] carries the `EEE` (ensemble member) and `MM` (start
//! month) placeholder tokens. [`file_dict`] expands the template for one
//! member, globs the filesystem, and extracts each file's initialization
//! year with a pluggable [`YearRule`]. [`nested_file_list_by_year`] merges
//! the per-member indices into a [`Manifest`] ordered by year.
//!
//! Year collisions inside one member's index are resolved by an explicit
//! [`ConflictPolicy`] rather than by directory iteration order.

mod error;
mod index;
mod manifest;
mod template;
mod year;

pub use error::LocateError;
pub use index::file_dict;
pub use manifest::{nested_file_list_by_year, Manifest};
pub use template::{FileTemplate, MEMBER_TOKEN, MONTH_TOKEN};
pub use year::{ConflictPolicy, YearRule};
