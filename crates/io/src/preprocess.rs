//! Preparation steps applied to loaded series before correction.
//!
//! Each step returns a new [`GriddedSeries`]; none of them touch the
//! correction core, they only bring the three inputs onto a common calendar,
//! period, window and grid.

use std::ops::Range;

use chrono::{Datelike, NaiveDate};
use ndarray::{Array3, s};
use qmbc_grid::GriddedSeries;
use tracing::{debug, warn};

use crate::error::IoError;

/// Removes every 29 February time step.
pub fn drop_leap_days(series: &GriddedSeries) -> GriddedSeries {
    let keep: Vec<usize> = series
        .times()
        .iter()
        .enumerate()
        .filter(|(_, d)| !(d.month() == 2 && d.day() == 29))
        .map(|(t, _)| t)
        .collect();
    debug!(removed = series.n_times() - keep.len(), "dropped leap days");
    series.select_times(&keep)
}

/// Keeps time steps with `start <= date <= end`.
///
/// # Errors
///
/// Returns [`IoError::InvalidConfig`] if `start` is after `end`.
pub fn slice_period(
    series: &GriddedSeries,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<GriddedSeries, IoError> {
    if start > end {
        return Err(IoError::InvalidConfig {
            reason: format!("period start {start} is after end {end}"),
        });
    }
    let keep: Vec<usize> = series
        .times()
        .iter()
        .enumerate()
        .filter(|(_, d)| (start..=end).contains(*d))
        .map(|(t, _)| t)
        .collect();
    if keep.is_empty() {
        warn!(%start, %end, "period selects no time steps");
    }
    Ok(series.select_times(&keep))
}

/// Keeps latitude indices `lat` and longitude indices `lon` (half-open).
///
/// # Errors
///
/// Returns [`IoError::InvalidConfig`] for an empty range or one reaching
/// past the grid.
pub fn subset_window(
    series: &GriddedSeries,
    lat: Range<usize>,
    lon: Range<usize>,
) -> Result<GriddedSeries, IoError> {
    let (ny, nx) = series.spatial_shape();
    for (axis, range, len) in [("lat", &lat, ny), ("lon", &lon, nx)] {
        if range.is_empty() || range.end > len {
            return Err(IoError::InvalidConfig {
                reason: format!(
                    "{axis} window {}..{} is empty or outside 0..{len}",
                    range.start, range.end
                ),
            });
        }
    }
    let values = series
        .values()
        .slice(s![.., lat.clone(), lon.clone()])
        .to_owned();
    Ok(GriddedSeries::new(
        series.times().to_vec(),
        series.lats()[lat].to_vec(),
        series.lons()[lon].to_vec(),
        values,
    )?)
}

/// Adds `offset` to every value (e.g. 273.15 to turn °C into K).
pub fn add_offset(series: &GriddedSeries, offset: f64) -> GriddedSeries {
    let mut out = series.clone();
    out.values_mut().mapv_inplace(|v| v + offset);
    out
}

/// Interpolates onto `new_lats` × `new_lons`, linearly along latitude then
/// longitude.
///
/// Target points outside the source axes become `NaN`, and a `NaN`
/// neighbour with non-zero weight makes the result `NaN`. Source axes may
/// be ascending or descending.
///
/// # Errors
///
/// Returns [`IoError::InvalidConfig`] if either target axis is empty or a
/// source axis is not strictly monotonic.
pub fn regrid_bilinear(
    series: &GriddedSeries,
    new_lats: &[f64],
    new_lons: &[f64],
) -> Result<GriddedSeries, IoError> {
    if new_lats.is_empty() || new_lons.is_empty() {
        return Err(IoError::InvalidConfig {
            reason: "target grid axes must not be empty".to_string(),
        });
    }
    let wy = axis_weights(series.lats(), new_lats, "lat")?;
    let wx = axis_weights(series.lons(), new_lons, "lon")?;

    let src = series.values();
    let nt = series.n_times();
    let mut values = Array3::from_elem((nt, new_lats.len(), new_lons.len()), f64::NAN);
    for (i, y) in wy.iter().enumerate() {
        let Some((y0, y1, fy)) = *y else { continue };
        for (j, x) in wx.iter().enumerate() {
            let Some((x0, x1, fx)) = *x else { continue };
            for t in 0..nt {
                let lower = lerp(src[[t, y0, x0]], src[[t, y0, x1]], fx);
                let upper = lerp(src[[t, y1, x0]], src[[t, y1, x1]], fx);
                values[[t, i, j]] = lerp(lower, upper, fy);
            }
        }
    }

    let n_outside = wy.iter().filter(|w| w.is_none()).count() * new_lons.len()
        + wx.iter().filter(|w| w.is_none()).count() * new_lats.len();
    debug!(
        from = ?series.spatial_shape(),
        to = ?(new_lats.len(), new_lons.len()),
        n_outside,
        "regridded"
    );
    Ok(GriddedSeries::new(
        series.times().to_vec(),
        new_lats.to_vec(),
        new_lons.to_vec(),
        values,
    )?)
}

/// `a` and `b` blended by `w`; an endpoint weight ignores the other side.
fn lerp(a: f64, b: f64, w: f64) -> f64 {
    if w == 0.0 {
        a
    } else if w == 1.0 {
        b
    } else {
        (1.0 - w) * a + w * b
    }
}

/// For each target coordinate, the bracketing source indices and the
/// weight of the second one, or `None` outside the source axis.
fn axis_weights(
    src: &[f64],
    dst: &[f64],
    axis: &str,
) -> Result<Vec<Option<(usize, usize, f64)>>, IoError> {
    let ascending = src.windows(2).all(|w| w[1] > w[0]);
    let descending = src.windows(2).all(|w| w[1] < w[0]);
    if src.is_empty() || !(ascending || descending) {
        return Err(IoError::InvalidConfig {
            reason: format!("source {axis} axis must be non-empty and strictly monotonic"),
        });
    }

    Ok(dst
        .iter()
        .map(|&x| {
            if src.len() == 1 {
                return ((x - src[0]).abs() <= 1e-9).then_some((0, 0, 0.0));
            }
            src.windows(2).enumerate().find_map(|(k, w)| {
                let (lo, hi) = if ascending { (w[0], w[1]) } else { (w[1], w[0]) };
                (lo..=hi)
                    .contains(&x)
                    .then(|| (k, k + 1, (x - w[0]) / (w[1] - w[0])))
            })
        })
        .collect())
}
