//! Per-year manifests merged across ensemble members.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::debug;

use crate::error::LocateError;
use crate::index::file_dict;
use crate::template::FileTemplate;
use crate::year::{ConflictPolicy, YearRule};

/// Files for a set of initialization years, one inner list per year.
///
/// Years are ascending and only present when at least one ensemble member
/// contributed a file. Inner lists preserve member order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    years: Vec<i32>,
    files: Vec<Vec<PathBuf>>,
}

impl Manifest {
    /// Initialization years with at least one file, ascending.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Per-year file lists, parallel to [`Manifest::years`].
    pub fn files(&self) -> &[Vec<PathBuf>] {
        &self.files
    }

    /// Number of retained years.
    pub fn len(&self) -> usize {
        self.years.len()
    }

    /// True when no year has any file.
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Iterator over `(year, files)` pairs in year order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &[PathBuf])> {
        self.years
            .iter()
            .copied()
            .zip(self.files.iter().map(Vec::as_slice))
    }

    /// File count per retained year.
    pub fn file_counts(&self) -> Vec<usize> {
        self.files.iter().map(Vec::len).collect()
    }

    /// True when every retained year has the same file count.
    ///
    /// An empty manifest is vacuously complete.
    pub fn is_complete(&self) -> bool {
        match self.files.first() {
            Some(first) => self.files.iter().all(|ffs| ffs.len() == first.len()),
            None => true,
        }
    }
}

/// Builds the per-year manifest for a hindcast ensemble.
///
/// Invokes [`file_dict`] once per (1-based) ensemble member and merges the
/// indices over `first_year..=last_year`. Within a year, a file is only
/// appended when it differs from the previously appended one, a guard
/// against naming conventions where adjacent members alias the same file
/// rather than a general dedup. Years without any file are dropped.
///
/// # Errors
///
/// Returns [`LocateError::EmptyYearRange`] when `first_year > last_year`,
/// and propagates any [`file_dict`] failure.
pub fn nested_file_list_by_year(
    template: &FileTemplate,
    members: &[i32],
    first_year: i32,
    last_year: i32,
    start_month: u8,
    rule: YearRule,
    policy: ConflictPolicy,
) -> Result<Manifest, LocateError> {
    if first_year > last_year {
        return Err(LocateError::EmptyYearRange {
            first: first_year,
            last: last_year,
        });
    }

    let indices: Vec<BTreeMap<i32, PathBuf>> = members
        .iter()
        .map(|&m| file_dict(template, m, start_month, rule, policy))
        .collect::<Result<_, _>>()?;

    let mut years = Vec::new();
    let mut files = Vec::new();
    for year in first_year..=last_year {
        let mut ffs: Vec<PathBuf> = Vec::new();
        for index in &indices {
            if let Some(path) = index.get(&year) {
                if ffs.last().map(PathBuf::as_path) != Some(path.as_path()) {
                    ffs.push(path.clone());
                }
            }
        }
        if !ffs.is_empty() {
            years.push(year);
            files.push(ffs);
        }
    }

    debug!(
        n_members = members.len(),
        n_years = years.len(),
        first_year,
        last_year,
        "built hindcast file manifest"
    );
    Ok(Manifest { years, files })
}

#[cfg(test)]
impl Manifest {
    /// Test-only constructor for synthetic manifests.
    pub(crate) fn from_parts(years: Vec<i32>, files: Vec<Vec<PathBuf>>) -> Self {
        Self { years, files }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    #[test]
    fn counts_and_completeness() {
        let m = Manifest::from_parts(
            vec![1980, 1981],
            vec![vec![p("a"), p("b")], vec![p("c"), p("d")]],
        );
        assert_eq!(m.file_counts(), vec![2, 2]);
        assert!(m.is_complete());
        assert_eq!(m.len(), 2);
        assert!(!m.is_empty());
    }

    #[test]
    fn incomplete_when_counts_differ() {
        let m = Manifest::from_parts(vec![1980, 1981], vec![vec![p("a"), p("b")], vec![p("c")]]);
        assert!(!m.is_complete());
    }

    #[test]
    fn empty_manifest_is_complete() {
        let m = Manifest::from_parts(vec![], vec![]);
        assert!(m.is_complete());
        assert!(m.is_empty());
    }

    #[test]
    fn iter_pairs_years_with_files() {
        let m = Manifest::from_parts(vec![1980, 1990], vec![vec![p("a")], vec![p("b")]]);
        let pairs: Vec<(i32, &[PathBuf])> = m.iter().collect();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].0, 1980);
        assert_eq!(pairs[1].1[0], p("b"));
    }

    #[test]
    fn rejects_inverted_year_range() {
        let t = FileTemplate::new("nowhere.EEE.MM.*.nc");
        let err = nested_file_list_by_year(
            &t,
            &[1],
            1990,
            1980,
            1,
            YearRule::YearComponent,
            ConflictPolicy::Error,
        )
        .unwrap_err();
        assert!(matches!(err, LocateError::EmptyYearRange { .. }));
    }
}
