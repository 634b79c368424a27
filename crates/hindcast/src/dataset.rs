//! The assembled hindcast ensemble.

use std::collections::BTreeMap;

use ndarray::{Array2, Array3, ArrayD};

use aeolus_calendar::NoLeapDate;

use crate::error::HindcastError;

/// A hindcast ensemble labeled by initialization year, ensemble member,
/// and lead time.
///
/// The field carries dimensions `[Y, M, L, spatial...]`. Lead time is the
/// primary temporal dimension; the rebuilt calendar time is demoted to a
/// plain per-`(Y, L)` variable. Verification bounds are kept in no-leap
/// serial days so drift removal can average and compare them numerically.
#[derive(Debug, Clone)]
pub struct HindcastDataset {
    field_name: String,
    field: ArrayD<f64>,
    years: Vec<i32>,
    members: Vec<i32>,
    leads: Vec<i64>,
    times: Array2<NoLeapDate>,
    time_bounds: Array3<f64>,
    companions: BTreeMap<String, ArrayD<f64>>,
}

impl HindcastDataset {
    /// Create a new `HindcastDataset` after validating coordinate lengths
    /// against the field shape.
    ///
    /// # Errors
    ///
    /// Returns [`HindcastError::Shape`] if the field has fewer than three
    /// dimensions, and [`HindcastError::DimensionMismatch`] when any
    /// coordinate or the time arrays disagree with the field shape.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        field_name: impl Into<String>,
        field: ArrayD<f64>,
        years: Vec<i32>,
        members: Vec<i32>,
        leads: Vec<i64>,
        times: Array2<NoLeapDate>,
        time_bounds: Array3<f64>,
        companions: BTreeMap<String, ArrayD<f64>>,
    ) -> Result<Self, HindcastError> {
        if field.ndim() < 3 {
            return Err(HindcastError::Shape {
                reason: format!(
                    "field has {} dimensions, expected at least [Y, M, L]",
                    field.ndim()
                ),
            });
        }
        let (ny, nm, nl) = (field.shape()[0], field.shape()[1], field.shape()[2]);

        for (name, expected, got) in [
            ("Y", ny, years.len()),
            ("M", nm, members.len()),
            ("L", nl, leads.len()),
        ] {
            if expected != got {
                return Err(HindcastError::DimensionMismatch {
                    name: name.into(),
                    expected,
                    got,
                });
            }
        }
        if times.dim() != (ny, nl) {
            return Err(HindcastError::DimensionMismatch {
                name: "time".into(),
                expected: ny * nl,
                got: times.len(),
            });
        }
        if time_bounds.dim() != (ny, nl, 2) {
            return Err(HindcastError::DimensionMismatch {
                name: "time_bound".into(),
                expected: ny * nl * 2,
                got: time_bounds.len(),
            });
        }

        Ok(Self {
            field_name: field_name.into(),
            field,
            years,
            members,
            leads,
            times,
            time_bounds,
            companions,
        })
    }

    /// Name of the assembled field variable.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// The assembled field, `[Y, M, L, spatial...]`.
    pub fn field(&self) -> &ArrayD<f64> {
        &self.field
    }

    /// Initialization years, ascending.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// 1-based ensemble member numbers.
    pub fn members(&self) -> &[i32] {
        &self.members
    }

    /// Lead indices, starting at 1.
    pub fn leads(&self) -> &[i64] {
        &self.leads
    }

    /// Rebuilt calendar time per `(year, lead)` cell.
    pub fn times(&self) -> &Array2<NoLeapDate> {
        &self.times
    }

    /// Verification bounds per `(year, lead)` cell in no-leap serial days.
    pub fn time_bounds(&self) -> &Array3<f64> {
        &self.time_bounds
    }

    /// Companion variables copied from the first contributing file.
    pub fn companions(&self) -> &BTreeMap<String, ArrayD<f64>> {
        &self.companions
    }

    /// Look up a companion variable by name.
    pub fn companion(&self, name: &str) -> Option<&ArrayD<f64>> {
        self.companions.get(name)
    }

    /// Number of initialization years.
    pub fn n_years(&self) -> usize {
        self.years.len()
    }

    /// Number of ensemble members.
    pub fn n_members(&self) -> usize {
        self.members.len()
    }

    /// Number of lead steps.
    pub fn n_leads(&self) -> usize {
        self.leads.len()
    }

    /// Shape of the spatial dimensions following `[Y, M, L]`.
    pub fn spatial_shape(&self) -> &[usize] {
        &self.field.shape()[3..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aeolus_calendar::month_starts;
    use ndarray::IxDyn;

    fn make(ny: usize, nm: usize, nl: usize) -> Result<HindcastDataset, HindcastError> {
        let field = ArrayD::zeros(IxDyn(&[ny, nm, nl, 2]));
        let years: Vec<i32> = (0..ny as i32).map(|y| 1980 + y).collect();
        let members: Vec<i32> = (1..=nm as i32).collect();
        let leads: Vec<i64> = (1..=nl as i64).collect();
        let mut flat_times = Vec::new();
        for _ in 0..ny {
            flat_times.extend(month_starts(1980, nl));
        }
        let times = Array2::from_shape_vec((ny, nl), flat_times).unwrap();
        let time_bounds = Array3::zeros((ny, nl, 2));
        HindcastDataset::new(
            "SST",
            field,
            years,
            members,
            leads,
            times,
            time_bounds,
            BTreeMap::new(),
        )
    }

    #[test]
    fn valid_construction() {
        let ds = make(3, 2, 4).unwrap();
        assert_eq!(ds.field_name(), "SST");
        assert_eq!(ds.n_years(), 3);
        assert_eq!(ds.n_members(), 2);
        assert_eq!(ds.n_leads(), 4);
        assert_eq!(ds.spatial_shape(), &[2]);
        assert_eq!(ds.years(), &[1980, 1981, 1982]);
        assert_eq!(ds.members(), &[1, 2]);
        assert_eq!(ds.leads(), &[1, 2, 3, 4]);
    }

    #[test]
    fn rejects_too_few_dimensions() {
        let field = ArrayD::zeros(IxDyn(&[2, 3]));
        let err = HindcastDataset::new(
            "SST",
            field,
            vec![1980, 1981],
            vec![1, 2, 3],
            vec![],
            Array2::from_shape_vec((0, 0), vec![]).unwrap(),
            Array3::zeros((0, 0, 2)),
            BTreeMap::new(),
        )
        .unwrap_err();
        assert!(matches!(err, HindcastError::Shape { .. }));
    }

    #[test]
    fn rejects_year_coordinate_mismatch() {
        let field = ArrayD::zeros(IxDyn(&[2, 1, 3]));
        let times = Array2::from_shape_vec(
            (2, 3),
            [month_starts(1980, 3), month_starts(1981, 3)].concat(),
        )
        .unwrap();
        let err = HindcastDataset::new(
            "SST",
            field,
            vec![1980],
            vec![1],
            vec![1, 2, 3],
            times,
            Array3::zeros((2, 3, 2)),
            BTreeMap::new(),
        )
        .unwrap_err();
        match err {
            HindcastError::DimensionMismatch { name, expected, got } => {
                assert_eq!(name, "Y");
                assert_eq!(expected, 2);
                assert_eq!(got, 1);
            }
            other => panic!("expected DimensionMismatch, got {other:?}"),
        }
    }

    #[test]
    fn rejects_time_bounds_mismatch() {
        let field = ArrayD::zeros(IxDyn(&[1, 1, 3, 2]));
        let times = Array2::from_shape_vec((1, 3), month_starts(1980, 3)).unwrap();
        let err = HindcastDataset::new(
            "SST",
            field,
            vec![1980],
            vec![1],
            vec![1, 2, 3],
            times,
            Array3::zeros((1, 2, 2)),
            BTreeMap::new(),
        )
        .unwrap_err();
        assert!(matches!(err, HindcastError::DimensionMismatch { .. }));
    }

    #[test]
    fn companion_lookup() {
        let mut ds = make(1, 1, 2).unwrap();
        ds.companions
            .insert("TAREA".into(), ArrayD::zeros(IxDyn(&[2])));
        assert!(ds.companion("TAREA").is_some());
        assert!(ds.companion("HT").is_none());
    }
}
