//! Per-member file index keyed by initialization year.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::LocateError;
use crate::template::FileTemplate;
use crate::year::{ConflictPolicy, YearRule};

/// Builds the initialization-year -> file-path index for one ensemble
/// member and start month.
///
/// The template is expanded for `member` and `start_month`, matching paths
/// are enumerated from the filesystem, and each file's year is extracted
/// with `rule`. Two files mapping to the same year are resolved by
/// `policy`. A pattern matching nothing yields an empty index.
///
/// # Errors
///
/// Returns [`LocateError::Pattern`] for an invalid glob pattern,
/// [`LocateError::Glob`] for unreadable matches, [`LocateError::YearParse`]
/// for names outside the convention, and [`LocateError::DuplicateYear`]
/// under [`ConflictPolicy::Error`].
pub fn file_dict(
    template: &FileTemplate,
    member: i32,
    start_month: u8,
    rule: YearRule,
    policy: ConflictPolicy,
) -> Result<BTreeMap<i32, PathBuf>, LocateError> {
    let pattern = template.expand(member, start_month);
    let tag = FileTemplate::member_tag(member);

    let matches = glob::glob(&pattern).map_err(|e| LocateError::Pattern {
        pattern: pattern.clone(),
        reason: e.to_string(),
    })?;

    let mut index = BTreeMap::new();
    for entry in matches {
        let path = entry.map_err(|e| LocateError::Glob {
            reason: e.to_string(),
        })?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| LocateError::YearParse {
                file: path.display().to_string(),
                reason: "path has no UTF-8 file name".to_string(),
            })?;
        let year = rule.extract(name, &tag)?;

        match index.entry(year) {
            Entry::Vacant(slot) => {
                slot.insert(path);
            }
            Entry::Occupied(mut slot) => match policy {
                ConflictPolicy::Error => {
                    return Err(LocateError::DuplicateYear {
                        year,
                        kept: slot.get().clone(),
                        duplicate: path,
                    });
                }
                ConflictPolicy::KeepFirst => {
                    warn!(
                        year,
                        kept = %slot.get().display(),
                        dropped = %path.display(),
                        "duplicate initialization year, keeping first file"
                    );
                }
                ConflictPolicy::KeepLast => {
                    warn!(
                        year,
                        replaced = %slot.get().display(),
                        kept = %path.display(),
                        "duplicate initialization year, keeping last file"
                    );
                    slot.insert(path);
                }
            },
        }
    }

    debug!(member, pattern = %pattern, n_years = index.len(), "indexed member files");
    Ok(index)
}
