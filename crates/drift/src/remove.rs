//! Climatology estimation and anomaly computation.

use ndarray::{Array2, Array3, ArrayD, Axis, IxDyn, Zip};
use tracing::debug;

use aeolus_calendar::NoLeapDate;
use aeolus_stats::nanmean;

use crate::error::DriftError;

/// Seconds short of a full day; the upper window bound is the last second
/// of December 31.
const LAST_SECOND: f64 = 86_399.0 / 86_400.0;

/// Result of a drift removal: the anomaly field and the climatology that
/// was subtracted from it.
#[derive(Debug, Clone)]
pub struct DriftCorrection {
    /// Field minus broadcast climatology, same shape as the input field.
    pub anomaly: ArrayD<f64>,
    /// Lead-indexed climatology, `[L, spatial...]`.
    pub climatology: ArrayD<f64>,
}

/// Remove the lead-time-dependent drift from a hindcast field.
///
/// `field` carries `[Y, M, L, spatial...]`; `time_bounds` carries the
/// per-`(year, lead)` verification bounds `[Y, L, 2]` in no-leap serial
/// days. The reference period runs from the first instant of January 1
/// `y1` to the last second of December 31 `y2`, with strict comparisons on
/// both ends.
///
/// # Errors
///
/// Returns [`DriftError::InvalidPeriod`] for an inverted period,
/// [`DriftError::DimensionMismatch`] when the bounds disagree with the
/// field shape, and [`DriftError::EmptyReference`] when no cell falls
/// inside the period.
pub fn remove_drift(
    field: &ArrayD<f64>,
    time_bounds: &Array3<f64>,
    y1: i32,
    y2: i32,
) -> Result<DriftCorrection, DriftError> {
    if y1 > y2 {
        return Err(DriftError::InvalidPeriod { y1, y2 });
    }
    if field.ndim() < 3 {
        return Err(DriftError::DimensionMismatch {
            name: "field".into(),
            expected: 3,
            got: field.ndim(),
        });
    }
    let (ny, nm, nl) = (field.shape()[0], field.shape()[1], field.shape()[2]);
    if time_bounds.dim().0 != ny {
        return Err(DriftError::DimensionMismatch {
            name: "Y".into(),
            expected: ny,
            got: time_bounds.dim().0,
        });
    }
    if time_bounds.dim().1 != nl {
        return Err(DriftError::DimensionMismatch {
            name: "L".into(),
            expected: nl,
            got: time_bounds.dim().1,
        });
    }

    let lower = NoLeapDate::new(y1, 1, 1)?.serial_days() as f64;
    let upper = NoLeapDate::new(y2, 12, 31)?.serial_days() as f64 + LAST_SECOND;

    // Mean date-of-record per (year, lead) cell, then the strict window mask.
    let mask = reference_mask(time_bounds, lower, upper);
    let n_selected = mask.iter().filter(|&&m| m).count();
    if n_selected == 0 {
        return Err(DriftError::EmptyReference { y1, y2 });
    }
    debug!(y1, y2, n_selected, n_cells = ny * nl, "reference window selected");

    // NaN-skipping mean over members and years within the mask.
    let tail: Vec<usize> = field.shape()[2..].to_vec();
    let mut sum = ArrayD::<f64>::zeros(IxDyn(&tail));
    let mut count = ArrayD::<f64>::zeros(IxDyn(&tail));
    for y in 0..ny {
        for m in 0..nm {
            let slab = field.index_axis(Axis(0), y);
            let slab = slab.index_axis(Axis(0), m);
            for l in 0..nl {
                if !mask[[y, l]] {
                    continue;
                }
                let cell = slab.index_axis(Axis(0), l);
                let mut s = sum.index_axis_mut(Axis(0), l);
                let mut c = count.index_axis_mut(Axis(0), l);
                Zip::from(&mut s).and(&mut c).and(&cell).for_each(|s, c, &v| {
                    if v.is_finite() {
                        *s += v;
                        *c += 1.0;
                    }
                });
            }
        }
    }
    let climatology =
        Zip::from(&sum)
            .and(&count)
            .map_collect(|&s, &c| if c > 0.0 { s / c } else { f64::NAN });

    // Subtract the climatology, broadcasting over years and members.
    let mut anomaly = field.clone();
    for y in 0..ny {
        let mut year_slab = anomaly.index_axis_mut(Axis(0), y);
        for m in 0..nm {
            let mut slab = year_slab.index_axis_mut(Axis(0), m);
            Zip::from(&mut slab).and(&climatology).for_each(|a, &c| {
                *a -= c;
            });
        }
    }

    Ok(DriftCorrection {
        anomaly,
        climatology,
    })
}

/// Remove the lead-time-dependent drift from a hindcast field.
///
/// Identical to [`remove_drift`]; kept under its historical name so older
/// analysis scripts keep working.
pub fn linear_drift_remove(
    field: &ArrayD<f64>,
    time_bounds: &Array3<f64>,
    y1: i32,
    y2: i32,
) -> Result<DriftCorrection, DriftError> {
    remove_drift(field, time_bounds, y1, y2)
}

/// Mask of `(year, lead)` cells whose mean verification time lies strictly
/// inside `(lower, upper)`.
fn reference_mask(time_bounds: &Array3<f64>, lower: f64, upper: f64) -> Array2<bool> {
    time_bounds.map_axis(Axis(2), |pair| {
        let vals: Vec<f64> = pair.iter().copied().collect();
        let mid = nanmean(&vals);
        mid > lower && mid < upper
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array;

    /// Bounds for `ny` years of `nl` monthly leads, with year `y0 + y`
    /// initialized in January; lead `l` verifies in month `l` of that year.
    fn monthly_bounds(y0: i32, ny: usize, nl: usize) -> Array3<f64> {
        let mut bounds = Array3::zeros((ny, nl, 2));
        for y in 0..ny {
            for l in 0..nl {
                let start = NoLeapDate::new(y0 + y as i32, (l + 1) as u8, 1)
                    .unwrap()
                    .serial_days() as f64;
                bounds[[y, l, 0]] = start;
                bounds[[y, l, 1]] = start + 30.0;
            }
        }
        bounds
    }

    #[test]
    fn climatology_matches_reference_cells() {
        // Years 1978..=1981; reference period 1980..=1981 selects the last
        // two, which hold 10.0 while the rest hold 0.0.
        let mut field = ArrayD::zeros(IxDyn(&[4, 2, 3]));
        for y in 2..4 {
            field.index_axis_mut(Axis(0), y).fill(10.0);
        }
        let bounds = monthly_bounds(1978, 4, 3);

        let out = remove_drift(&field, &bounds, 1980, 1981).unwrap();
        assert_eq!(out.climatology.shape(), &[3]);
        for l in 0..3 {
            assert_eq!(out.climatology[[l]], 10.0);
        }
        // Anomaly is zero inside the window and -10 outside.
        for l in 0..3 {
            assert_eq!(out.anomaly[[2, 0, l]], 0.0);
            assert_eq!(out.anomaly[[3, 1, l]], 0.0);
            assert_eq!(out.anomaly[[0, 0, l]], -10.0);
        }
    }

    #[test]
    fn window_bounds_are_strict() {
        // A single cell whose mean date is exactly Jan 1 of y1 at 00:00
        // must be excluded.
        let field = ArrayD::ones(IxDyn(&[1, 1, 1]));
        let jan1 = NoLeapDate::new(1980, 1, 1).unwrap().serial_days() as f64;
        let mut bounds = Array3::zeros((1, 1, 2));
        bounds[[0, 0, 0]] = jan1;
        bounds[[0, 0, 1]] = jan1;

        let err = remove_drift(&field, &bounds, 1980, 1981).unwrap_err();
        assert_eq!(err, DriftError::EmptyReference { y1: 1980, y2: 1981 });
    }

    #[test]
    fn lead_dependent_membership() {
        // One year initialized in 1980; leads verify Jan..Dec 1980 plus
        // Jan..Mar 1981. A 1980-only window keeps the first 12 leads.
        let nl = 15;
        let mut bounds = Array3::zeros((1, nl, 2));
        for l in 0..nl {
            let year = 1980 + (l / 12) as i32;
            let month = (l % 12 + 1) as u8;
            let start = NoLeapDate::new(year, month, 1).unwrap().serial_days() as f64;
            bounds[[0, l, 0]] = start;
            bounds[[0, l, 1]] = start + 20.0;
        }
        let field = Array::from_shape_fn(IxDyn(&[1, 1, nl]), |ix| ix[2] as f64);

        let out = remove_drift(&field, &bounds, 1980, 1980).unwrap();
        for l in 0..12 {
            assert_eq!(out.climatology[[l]], l as f64);
        }
        for l in 12..nl {
            assert!(out.climatology[[l]].is_nan());
        }
    }

    #[test]
    fn nan_values_are_skipped_in_the_mean() {
        let mut field = ArrayD::zeros(IxDyn(&[2, 2, 1]));
        field[[0, 0, 0]] = 4.0;
        field[[0, 1, 0]] = f64::NAN;
        field[[1, 0, 0]] = 8.0;
        field[[1, 1, 0]] = 12.0;
        let bounds = monthly_bounds(1980, 2, 1);

        let out = remove_drift(&field, &bounds, 1980, 1981).unwrap();
        assert_eq!(out.climatology[[0]], 8.0);
        assert_eq!(out.anomaly[[1, 1, 0]], 4.0);
        assert!(out.anomaly[[0, 1, 0]].is_nan());
    }

    #[test]
    fn spatial_dimensions_broadcast() {
        let mut field = ArrayD::zeros(IxDyn(&[2, 1, 2, 2, 2]));
        field.fill(3.0);
        field[[0, 0, 1, 1, 0]] = 7.0;
        let bounds = monthly_bounds(1980, 2, 2);

        let out = remove_drift(&field, &bounds, 1980, 1981).unwrap();
        assert_eq!(out.climatology.shape(), &[2, 2, 2]);
        assert_eq!(out.climatology[[0, 0, 0]], 3.0);
        assert_eq!(out.climatology[[1, 1, 0]], 5.0);
        assert_eq!(out.anomaly[[0, 0, 1, 1, 0]], 2.0);
        assert_eq!(out.anomaly[[1, 0, 1, 1, 0]], -2.0);
    }

    #[test]
    fn inverted_period_is_rejected() {
        let field = ArrayD::zeros(IxDyn(&[1, 1, 1]));
        let bounds = Array3::zeros((1, 1, 2));
        let err = remove_drift(&field, &bounds, 1990, 1980).unwrap_err();
        assert_eq!(err, DriftError::InvalidPeriod { y1: 1990, y2: 1980 });
    }

    #[test]
    fn bounds_shape_must_match_field() {
        let field = ArrayD::zeros(IxDyn(&[2, 1, 3]));
        let bounds = Array3::zeros((2, 4, 2));
        let err = remove_drift(&field, &bounds, 1980, 1981).unwrap_err();
        assert!(matches!(err, DriftError::DimensionMismatch { .. }));
    }

    #[test]
    fn alias_delegates_to_the_same_operation() {
        let mut field = ArrayD::zeros(IxDyn(&[2, 1, 2]));
        field.fill(5.0);
        let bounds = monthly_bounds(1980, 2, 2);

        let a = remove_drift(&field, &bounds, 1980, 1981).unwrap();
        let b = linear_drift_remove(&field, &bounds, 1980, 1981).unwrap();
        assert_eq!(a.climatology, b.climatology);
        assert_eq!(a.anomaly, b.anomaly);
    }
}
