//! Writing an assembled dataset back to NetCDF.

use std::path::Path;

use tracing::info;

use crate::dataset::HindcastDataset;
use crate::error::HindcastError;

/// Write an assembled dataset to a NetCDF file at `path`.
///
/// Dimensions are `Y`, `M`, `L`, the bounds pair `d2`, and one `s{i}` per
/// spatial axis. Calendar time and verification bounds are stored as
/// no-leap serial days with CF attributes; companion variables keep their
/// own dimensions, named `{var}_d{i}`.
///
/// # Errors
///
/// Returns [`HindcastError::Netcdf`] on any creation or write failure.
pub fn write_dataset(path: &Path, ds: &HindcastDataset) -> Result<(), HindcastError> {
    let mut file = netcdf::create(path)?;

    file.add_dimension("Y", ds.n_years())?;
    file.add_dimension("M", ds.n_members())?;
    file.add_dimension("L", ds.n_leads())?;
    file.add_dimension("d2", 2)?;

    let mut field_dims = vec!["Y".to_string(), "M".to_string(), "L".to_string()];
    for (i, &len) in ds.spatial_shape().iter().enumerate() {
        let name = format!("s{i}");
        file.add_dimension(&name, len)?;
        field_dims.push(name);
    }

    {
        let mut var = file.add_variable::<i32>("Y", &["Y"])?;
        var.put_attribute("long_name", "initialization year")?;
        var.put_values(ds.years(), ..)?;
    }
    {
        let mut var = file.add_variable::<i32>("M", &["M"])?;
        var.put_attribute("long_name", "ensemble member")?;
        var.put_values(ds.members(), ..)?;
    }
    {
        let mut var = file.add_variable::<i64>("L", &["L"])?;
        var.put_attribute("long_name", "lead time")?;
        var.put_attribute("units", "months")?;
        var.put_values(ds.leads(), ..)?;
    }
    {
        let mut var = file.add_variable::<f64>("time", &["Y", "L"])?;
        var.put_attribute("units", "days since 0000-01-01")?;
        var.put_attribute("calendar", "noleap")?;
        let serial: Vec<f64> = ds
            .times()
            .iter()
            .map(|d| d.serial_days() as f64)
            .collect();
        var.put_values(&serial, ..)?;
    }
    {
        let mut var = file.add_variable::<f64>("time_bound", &["Y", "L", "d2"])?;
        var.put_attribute("units", "days since 0000-01-01")?;
        var.put_attribute("calendar", "noleap")?;
        let flat: Vec<f64> = ds.time_bounds().iter().copied().collect();
        var.put_values(&flat, ..)?;
    }
    {
        let dim_refs: Vec<&str> = field_dims.iter().map(String::as_str).collect();
        let mut var = file.add_variable::<f64>(ds.field_name(), &dim_refs)?;
        let flat: Vec<f64> = ds.field().iter().copied().collect();
        var.put_values(&flat, ..)?;
    }

    for (name, values) in ds.companions() {
        let mut dims = Vec::new();
        for (i, &len) in values.shape().iter().enumerate() {
            let dim_name = format!("{name}_d{i}");
            file.add_dimension(&dim_name, len)?;
            dims.push(dim_name);
        }
        let dim_refs: Vec<&str> = dims.iter().map(String::as_str).collect();
        let mut var = file.add_variable::<f64>(name, &dim_refs)?;
        let flat: Vec<f64> = values.iter().copied().collect();
        var.put_values(&flat, ..)?;
    }

    info!(path = %path.display(), field = %ds.field_name(), "wrote assembled dataset");
    Ok(())
}
