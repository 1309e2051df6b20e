//! Grid-alignment checks for the correction inputs.
//!
//! The correction core assumes its three inputs share latitude/longitude
//! axes and never checks coordinates itself, so this is where a mismatched
//! grid is rejected.

use qmbc_grid::GriddedSeries;

use crate::error::IoError;

/// Coordinates closer than this are considered equal.
pub const COORD_TOLERANCE: f64 = 1e-6;

/// Accumulates mismatch messages into a single [`IoError::Misaligned`].
struct MismatchCollector {
    errors: Vec<String>,
}

impl MismatchCollector {
    fn new() -> Self {
        Self { errors: Vec::new() }
    }

    fn push(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn finish(self) -> Result<(), IoError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(IoError::Misaligned {
                count: self.errors.len(),
                details: self.errors.join("; "),
            })
        }
    }
}

fn compare_axis(c: &mut MismatchCollector, name: &str, axis: &str, reference: &[f64], got: &[f64]) {
    if reference.len() != got.len() {
        c.push(format!(
            "{name} {axis} length {} != {}",
            got.len(),
            reference.len()
        ));
        return;
    }
    if let Some(k) = reference
        .iter()
        .zip(got)
        .position(|(a, b)| !((a - b).abs() <= COORD_TOLERANCE))
    {
        c.push(format!(
            "{name} {axis}[{k}] = {} differs from {}",
            got[k], reference[k]
        ));
    }
}

/// Checks that every named series has the latitude and longitude axes of
/// the first one, within [`COORD_TOLERANCE`].
///
/// # Errors
///
/// Returns [`IoError::Misaligned`] listing every mismatch found.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use qmbc_grid::GriddedSeries;
/// use qmbc_io::validate_alignment;
///
/// let t = vec![NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()];
/// let a = GriddedSeries::from_flat(t.clone(), vec![10.0], vec![70.0, 71.0], vec![0.0; 2]).unwrap();
/// let b = GriddedSeries::from_flat(t, vec![10.0], vec![70.0, 71.5], vec![0.0; 2]).unwrap();
/// assert!(validate_alignment(&[("hist", &a), ("obs", &a)]).is_ok());
/// assert!(validate_alignment(&[("hist", &a), ("obs", &b)]).is_err());
/// ```
pub fn validate_alignment(series: &[(&str, &GriddedSeries)]) -> Result<(), IoError> {
    let Some((_, reference)) = series.first() else {
        return Ok(());
    };
    let mut c = MismatchCollector::new();
    for (name, s) in &series[1..] {
        compare_axis(&mut c, name, "lat", reference.lats(), s.lats());
        compare_axis(&mut c, name, "lon", reference.lons(), s.lons());
    }
    c.finish()
}
