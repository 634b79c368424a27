//! Opening one initialization year's member files as a single block.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ndarray::{Array2, ArrayD, Axis, IxDyn};
use tracing::debug;

use aeolus_calendar::{month_starts, NoLeapDate};

use crate::config::{AssembleConfig, LeadMode};
use crate::error::HindcastError;
use crate::time;

/// One initialization year's assembled block.
///
/// The field carries `[M, L, spatial...]`; the time axis has already been
/// rebuilt and the lead index assigned.
pub(crate) struct YearSlab {
    pub(crate) year: i32,
    pub(crate) field: ArrayD<f64>,
    /// Rebuilt month-start dates, length L.
    pub(crate) times: Vec<NoLeapDate>,
    /// Per-step verification bounds in no-leap serial days, `[L, 2]`.
    pub(crate) time_bounds: Array2<f64>,
    /// Lead index, length L, starting at 1.
    pub(crate) leads: Vec<i64>,
}

/// Open a NetCDF file at `path`, returning [`HindcastError::FileNotFound`]
/// if the path does not exist on disk.
pub(crate) fn open_file(path: &Path) -> Result<netcdf::File, HindcastError> {
    if !path.exists() {
        return Err(HindcastError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(netcdf::open(path)?)
}

/// Read a variable of any rank as an `f64` array with its file shape.
fn read_array(
    file: &netcdf::File,
    name: &str,
    path: &Path,
) -> Result<ArrayD<f64>, HindcastError> {
    let var = file
        .variable(name)
        .ok_or_else(|| HindcastError::MissingVariable {
            name: name.to_string(),
            path: path.to_path_buf(),
        })?;
    let dims: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
    let data = var.get_values::<f64, _>(..)?;
    Ok(ArrayD::from_shape_vec(IxDyn(&dims), data)?)
}

/// Read a 1-D `f64` variable.
fn read_1d(file: &netcdf::File, name: &str, path: &Path) -> Result<Vec<f64>, HindcastError> {
    let var = file
        .variable(name)
        .ok_or_else(|| HindcastError::MissingVariable {
            name: name.to_string(),
            path: path.to_path_buf(),
        })?;
    Ok(var.get_values::<f64, _>(..)?)
}

/// Read the companion variables from one file.
pub(crate) fn read_companions(
    path: &Path,
    names: &[String],
) -> Result<BTreeMap<String, ArrayD<f64>>, HindcastError> {
    let file = open_file(path)?;
    let mut out = BTreeMap::new();
    for name in names {
        out.insert(name.clone(), read_array(&file, name, path)?);
    }
    Ok(out)
}

/// Open all of one year's member files as a `[M, L, spatial...]` block.
///
/// The field variable's leading axis must be time and must agree across
/// members. Time metadata follows the override-compatibility rule: the
/// first file wins, and the time axis is rebuilt as month starts from
/// January of the first file's first decoded year.
pub(crate) fn open_members(
    year: i32,
    files: &[PathBuf],
    config: &AssembleConfig,
) -> Result<YearSlab, HindcastError> {
    let n_members = config.members.len();
    if files.len() != n_members {
        return Err(HindcastError::DimensionMismatch {
            name: "ensemble members".into(),
            expected: n_members,
            got: files.len(),
        });
    }

    let mut blocks: Vec<ArrayD<f64>> = Vec::with_capacity(files.len());
    let mut time_meta: Option<(time::TimeUnits, Vec<f64>)> = None;
    let mut bounds_raw: Option<ArrayD<f64>> = None;

    for (i, path) in files.iter().enumerate() {
        let file = open_file(path)?;
        let mut block = read_array(&file, &config.field_var, path)?;
        if block.ndim() == 0 {
            return Err(HindcastError::Shape {
                reason: format!(
                    "field '{}' in {} is a scalar, expected a leading time axis",
                    config.field_var,
                    path.display()
                ),
            });
        }
        if let Some(hook) = &config.preprocess {
            block = hook(block);
        }

        if i == 0 {
            let units = time::decode_units(&file, &config.time_var, path)?;
            let offsets = read_1d(&file, &config.time_var, path)?;
            bounds_raw = Some(read_array(&file, &config.time_bounds_var, path)?);
            time_meta = Some((units, offsets));
        }

        blocks.push(block);
    }

    let (units, offsets) = time_meta.ok_or(HindcastError::EmptyManifest)?;
    let bounds_raw = bounds_raw.ok_or(HindcastError::EmptyManifest)?;
    let n_months = offsets.len();
    if n_months == 0 {
        return Err(HindcastError::InvalidTime {
            reason: format!("empty time axis in {}", files[0].display()),
        });
    }

    // Member blocks must agree exactly for the stack to be meaningful.
    let first_shape = blocks[0].shape().to_vec();
    for (path, block) in files.iter().zip(&blocks).skip(1) {
        if block.shape() != first_shape.as_slice() {
            return Err(HindcastError::Shape {
                reason: format!(
                    "field '{}' shape {:?} in {} differs from {:?} in {}",
                    config.field_var,
                    block.shape(),
                    path.display(),
                    first_shape,
                    files[0].display()
                ),
            });
        }
    }
    if first_shape[0] != n_months {
        return Err(HindcastError::DimensionMismatch {
            name: config.time_var.clone(),
            expected: n_months,
            got: first_shape[0],
        });
    }

    // Decode the verification bounds from the first file.
    if bounds_raw.ndim() != 2 || bounds_raw.shape()[1] != 2 {
        return Err(HindcastError::Shape {
            reason: format!(
                "'{}' in {} has shape {:?}, expected [time, 2]",
                config.time_bounds_var,
                files[0].display(),
                bounds_raw.shape()
            ),
        });
    }
    if bounds_raw.shape()[0] != n_months {
        return Err(HindcastError::DimensionMismatch {
            name: config.time_bounds_var.clone(),
            expected: n_months,
            got: bounds_raw.shape()[0],
        });
    }
    let serial: Vec<f64> = bounds_raw.iter().map(|&v| units.to_serial(v)).collect();
    let time_bounds = Array2::from_shape_vec((n_months, 2), serial)?;

    // The raw time metadata is untrusted beyond its first value: rebuild a
    // uniform monthly axis from January of the decoded start year.
    let start_year = units.year_of(offsets[0]);
    let times = month_starts(start_year, n_months);

    let leads: Vec<i64> = match &config.lead_mode {
        LeadMode::Auto => (1..=n_months as i64).collect(),
        LeadMode::Explicit(list) => {
            if list.len() != n_months {
                return Err(HindcastError::LeadLengthMismatch {
                    expected: n_months,
                    got: list.len(),
                });
            }
            list.iter().map(|&l| l + 1).collect()
        }
    };

    let views: Vec<_> = blocks.iter().map(|block| block.view()).collect();
    let field = ndarray::stack(Axis(0), &views)?;

    debug!(
        year,
        n_files = files.len(),
        n_months,
        start_year,
        "opened hindcast year"
    );

    Ok(YearSlab {
        year,
        field,
        times,
        time_bounds,
        leads,
    })
}
