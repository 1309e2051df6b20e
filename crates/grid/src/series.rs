//! The `(time, lat, lon)` gridded series.

use chrono::{Datelike, NaiveDate};
use ndarray::{Array1, Array3, ArrayView3, Axis, s};
use qmbc_season::Month;

use crate::cell::{CellGrid, CellIndex};
use crate::error::GridError;

/// A gridded time series with its coordinate axes.
///
/// `values[[t, i, j]]` is the value at time `times[t]`, latitude `lats[i]`
/// and longitude `lons[j]`. Missing values are `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct GriddedSeries {
    times: Vec<NaiveDate>,
    lats: Vec<f64>,
    lons: Vec<f64>,
    values: Array3<f64>,
}

impl GriddedSeries {
    /// Creates a series after checking the axes against the array shape.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::DimensionMismatch`] naming the first axis whose
    /// length disagrees with `values`.
    pub fn new(
        times: Vec<NaiveDate>,
        lats: Vec<f64>,
        lons: Vec<f64>,
        values: Array3<f64>,
    ) -> Result<Self, GridError> {
        let (nt, ny, nx) = values.dim();
        for (axis, expected, got) in [
            ("time", nt, times.len()),
            ("lat", ny, lats.len()),
            ("lon", nx, lons.len()),
        ] {
            if expected != got {
                return Err(GridError::DimensionMismatch {
                    axis: axis.to_string(),
                    expected,
                    got,
                });
            }
        }
        Ok(Self {
            times,
            lats,
            lons,
            values,
        })
    }

    /// Creates a series from row-major `[t, lat, lon]` data.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::DimensionMismatch`] if `data.len()` is not
    /// `times.len() * lats.len() * lons.len()`.
    pub fn from_flat(
        times: Vec<NaiveDate>,
        lats: Vec<f64>,
        lons: Vec<f64>,
        data: Vec<f64>,
    ) -> Result<Self, GridError> {
        let shape = (times.len(), lats.len(), lons.len());
        let expected = shape.0 * shape.1 * shape.2;
        let got = data.len();
        let values = Array3::from_shape_vec(shape, data).map_err(|_| {
            GridError::DimensionMismatch {
                axis: "values".to_string(),
                expected,
                got,
            }
        })?;
        Self::new(times, lats, lons, values)
    }

    /// Same axes as `self`, every value set to `fill`.
    pub fn full_like(&self, fill: f64) -> Self {
        Self {
            times: self.times.clone(),
            lats: self.lats.clone(),
            lons: self.lons.clone(),
            values: Array3::from_elem(self.values.dim(), fill),
        }
    }

    /// Timestamps.
    pub fn times(&self) -> &[NaiveDate] {
        &self.times
    }

    /// Latitude axis.
    pub fn lats(&self) -> &[f64] {
        &self.lats
    }

    /// Longitude axis.
    pub fn lons(&self) -> &[f64] {
        &self.lons
    }

    /// The value array, `(time, lat, lon)`.
    pub fn values(&self) -> ArrayView3<'_, f64> {
        self.values.view()
    }

    /// Mutable access to the value array. The shape cannot be changed.
    pub fn values_mut(&mut self) -> ndarray::ArrayViewMut3<'_, f64> {
        self.values.view_mut()
    }

    /// Number of time steps.
    pub fn n_times(&self) -> usize {
        self.times.len()
    }

    /// `(n_lat, n_lon)`.
    pub fn spatial_shape(&self) -> (usize, usize) {
        (self.lats.len(), self.lons.len())
    }

    /// The cell arena for this series' spatial plane.
    pub fn cells(&self) -> CellGrid {
        CellGrid::new(self.lats.len(), self.lons.len())
    }

    /// Calendar month of time step `t`.
    ///
    /// # Panics
    ///
    /// Panics if `t >= self.n_times()`.
    pub fn month_at(&self, t: usize) -> Month {
        Month::try_from(self.times[t].month()).expect("chrono months are 1..=12")
    }

    /// Copies the time series of one cell.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::CellOutOfBounds`] if `cell` is outside the grid.
    pub fn cell_series(&self, cell: CellIndex) -> Result<Vec<f64>, GridError> {
        let cell = self.cells().check(cell)?;
        Ok(self.values.slice(s![.., cell.row, cell.col]).to_vec())
    }

    /// Overwrites the time series of one cell.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::CellOutOfBounds`] for a cell outside the grid and
    /// [`GridError::DimensionMismatch`] if `data` is not `n_times()` long.
    pub fn set_cell_series(&mut self, cell: CellIndex, data: &[f64]) -> Result<(), GridError> {
        let cell = self.cells().check(cell)?;
        if data.len() != self.n_times() {
            return Err(GridError::DimensionMismatch {
                axis: "time".to_string(),
                expected: self.n_times(),
                got: data.len(),
            });
        }
        self.values
            .slice_mut(s![.., cell.row, cell.col])
            .assign(&Array1::from(data.to_vec()));
        Ok(())
    }

    /// Returns `true` if every value of `cell` is missing (or there are no
    /// time steps).
    pub fn cell_all_missing(&self, cell: CellIndex) -> bool {
        self.values
            .slice(s![.., cell.row, cell.col])
            .iter()
            .all(|v| !v.is_finite())
    }

    /// Sub-series at the given time indices, in the order given.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of range.
    pub fn select_times(&self, indices: &[usize]) -> Self {
        Self {
            times: indices.iter().map(|&t| self.times[t]).collect(),
            lats: self.lats.clone(),
            lons: self.lons.clone(),
            values: self.values.select(Axis(0), indices),
        }
    }

    /// Joins series along the time axis, in slice order.
    ///
    /// Coordinates are taken from the first part; only the spatial shape of
    /// the others is checked.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::NothingToConcatenate`] for an empty slice and
    /// [`GridError::SpatialMismatch`] if shapes differ.
    pub fn concat_time(parts: &[GriddedSeries]) -> Result<Self, GridError> {
        let first = parts.first().ok_or(GridError::NothingToConcatenate)?;
        for part in &parts[1..] {
            if part.spatial_shape() != first.spatial_shape() {
                return Err(GridError::SpatialMismatch {
                    expected: first.spatial_shape(),
                    got: part.spatial_shape(),
                });
            }
        }

        let views: Vec<ArrayView3<'_, f64>> = parts.iter().map(|p| p.values.view()).collect();
        let values = ndarray::concatenate(Axis(0), &views).map_err(|_| {
            GridError::SpatialMismatch {
                expected: first.spatial_shape(),
                got: (0, 0),
            }
        })?;
        let times = parts.iter().flat_map(|p| p.times.iter().copied()).collect();

        Ok(Self {
            times,
            lats: first.lats.clone(),
            lons: first.lons.clone(),
            values,
        })
    }

    /// Copy with time steps in chronological order (stable for equal dates).
    pub fn sorted_by_time(&self) -> Self {
        let mut order: Vec<usize> = (0..self.n_times()).collect();
        order.sort_by_key(|&t| self.times[t]);
        self.select_times(&order)
    }

    /// Consumes the series, returning `(times, lats, lons, values)`.
    pub fn into_parts(self) -> (Vec<NaiveDate>, Vec<f64>, Vec<f64>, Array3<f64>) {
        (self.times, self.lats, self.lons, self.values)
    }
}
