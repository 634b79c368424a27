//! Assembly of per-year blocks into the full hindcast ensemble.

use std::path::{Path, PathBuf};

use ndarray::{Array2, Array3, Axis};
use tracing::{debug, info};

use aeolus_locate::{nested_file_list_by_year, FileTemplate};

use crate::client::{MapGather, Sequential};
use crate::config::AssembleConfig;
use crate::dataset::HindcastDataset;
use crate::error::HindcastError;
use crate::open::{open_members, read_companions, YearSlab};

/// Assemble the hindcast ensemble sequentially in-process.
///
/// Equivalent to [`get_monthly_data_with`] with the [`Sequential`] client.
pub fn get_monthly_data(config: &AssembleConfig) -> Result<HindcastDataset, HindcastError> {
    get_monthly_data_with(config, &Sequential)
}

/// Assemble the hindcast ensemble, distributing per-year opens through
/// `client`.
///
/// Discovery runs first; if the per-year file counts differ, the whole
/// operation fails with [`HindcastError::IncompleteFileSet`] before any
/// file is opened. Per-year blocks are gathered, sorted by initialization
/// year, and concatenated along a new leading Y axis, so the result is
/// identical for any client.
///
/// # Errors
///
/// Propagates discovery, completeness, NetCDF, and shape failures; the
/// first per-year failure aborts assembly with no partial result.
pub fn get_monthly_data_with<C: MapGather>(
    config: &AssembleConfig,
    client: &C,
) -> Result<HindcastDataset, HindcastError> {
    config.validate()?;

    // Member numbers are 1-based on disk.
    let members: Vec<i32> = config.members.iter().map(|&m| m as i32 + 1).collect();
    let template = FileTemplate::new(&config.template);

    let manifest = nested_file_list_by_year(
        &template,
        &members,
        config.first_year,
        config.last_year,
        config.start_month,
        config.year_rule,
        config.conflict_policy,
    )?;
    if manifest.is_empty() {
        return Err(HindcastError::EmptyManifest);
    }
    if !manifest.is_complete() {
        return Err(HindcastError::IncompleteFileSet {
            years: manifest.years().to_vec(),
            counts: manifest.file_counts(),
        });
    }

    info!(
        field = %config.field_var,
        n_years = manifest.len(),
        n_members = members.len(),
        first_year = config.first_year,
        last_year = config.last_year,
        "assembling hindcast ensemble"
    );

    let jobs: Vec<(i32, Vec<PathBuf>)> = manifest
        .iter()
        .map(|(year, files)| (year, files.to_vec()))
        .collect();
    let first_file = jobs[0].1[0].clone();

    let gathered = client.map_gather(jobs, |(year, files)| open_members(year, &files, config));
    let mut slabs: Vec<YearSlab> = gathered.into_iter().collect::<Result<_, _>>()?;

    // Concatenation is by explicit year coordinate, not gather order.
    slabs.sort_by_key(|slab| slab.year);

    concat_years(config, slabs, &first_file)
}

/// Concatenate sorted per-year slabs along a new leading Y axis and attach
/// coordinates and companions.
fn concat_years(
    config: &AssembleConfig,
    slabs: Vec<YearSlab>,
    first_file: &Path,
) -> Result<HindcastDataset, HindcastError> {
    let first = slabs.first().ok_or(HindcastError::EmptyManifest)?;
    let n_leads = first.leads.len();
    let leads = first.leads.clone();

    for slab in &slabs[1..] {
        if slab.field.shape() != first.field.shape() {
            return Err(HindcastError::Shape {
                reason: format!(
                    "year {} block shape {:?} differs from year {} shape {:?}",
                    slab.year,
                    slab.field.shape(),
                    first.year,
                    first.field.shape()
                ),
            });
        }
    }

    let views: Vec<_> = slabs.iter().map(|slab| slab.field.view()).collect();
    let field = ndarray::stack(Axis(0), &views)?;

    let years: Vec<i32> = slabs.iter().map(|slab| slab.year).collect();
    let members: Vec<i32> = config.members.iter().map(|&m| m as i32 + 1).collect();

    let n_years = slabs.len();
    let flat_times: Vec<_> = slabs.iter().flat_map(|slab| slab.times.clone()).collect();
    let times = Array2::from_shape_vec((n_years, n_leads), flat_times)?;

    let mut bounds = Array3::zeros((n_years, n_leads, 2));
    for (y, slab) in slabs.iter().enumerate() {
        bounds
            .index_axis_mut(Axis(0), y)
            .assign(&slab.time_bounds);
    }

    let companions = read_companions(first_file, &config.companion_vars)?;
    debug!(
        n_companions = companions.len(),
        source = %first_file.display(),
        "copied companion variables"
    );

    HindcastDataset::new(
        config.field_var.clone(),
        field,
        years,
        members,
        leads,
        times,
        bounds,
        companions,
    )
}
