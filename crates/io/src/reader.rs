//! NetCDF reader configuration and entry point.

use std::path::Path;

use qmbc_grid::GriddedSeries;
use tracing::{debug, info};

use crate::error::IoError;
use crate::netcdf_read;

/// Configuration for reading a gridded variable from NetCDF.
///
/// The [`Default`] implementation supplies CF-convention names suitable for
/// CMIP-style near-surface temperature (`tas`).
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// NetCDF variable name of the `(time, lat, lon)` field.
    variable: String,
    /// Aliases to try when looking up latitude coordinates.
    lat_aliases: Vec<String>,
    /// Aliases to try when looking up longitude coordinates.
    lon_aliases: Vec<String>,
    /// NetCDF variable name for the time axis.
    time_var: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            variable: "tas".into(),
            lat_aliases: vec!["lat".into(), "latitude".into(), "y".into()],
            lon_aliases: vec!["lon".into(), "longitude".into(), "x".into()],
            time_var: "time".into(),
        }
    }
}

impl ReaderConfig {
    /// Set the data variable name.
    pub fn with_variable(mut self, name: impl Into<String>) -> Self {
        self.variable = name.into();
        self
    }

    /// Replace the latitude aliases.
    pub fn with_lat_aliases(mut self, aliases: Vec<String>) -> Self {
        self.lat_aliases = aliases;
        self
    }

    /// Replace the longitude aliases.
    pub fn with_lon_aliases(mut self, aliases: Vec<String>) -> Self {
        self.lon_aliases = aliases;
        self
    }

    /// Set the time variable name.
    pub fn with_time_var(mut self, name: impl Into<String>) -> Self {
        self.time_var = name.into();
        self
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Validate that every name is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidConfig`] naming the first empty field.
    pub fn validate(&self) -> Result<(), IoError> {
        if self.variable.trim().is_empty() {
            return Err(IoError::InvalidConfig {
                reason: "variable name must not be empty".to_string(),
            });
        }
        if self.time_var.trim().is_empty() {
            return Err(IoError::InvalidConfig {
                reason: "time variable name must not be empty".to_string(),
            });
        }
        if self.lat_aliases.is_empty() || self.lon_aliases.is_empty() {
            return Err(IoError::InvalidConfig {
                reason: "coordinate alias lists must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Read one `(time, lat, lon)` variable from a NetCDF file.
///
/// Time offsets are decoded from the CF `units`/`calendar` attributes, and
/// values equal to `_FillValue` or `missing_value` become `NaN`.
///
/// # Errors
///
/// Returns [`IoError`] on missing files or variables, dimension mismatches
/// between the data and its coordinates, and undecodable time axes.
pub fn read_netcdf(path: &Path, config: &ReaderConfig) -> Result<GriddedSeries, IoError> {
    config.validate()?;

    let file = netcdf_read::open_file(path)?;

    let lat_refs: Vec<&str> = config.lat_aliases.iter().map(String::as_str).collect();
    let lon_refs: Vec<&str> = config.lon_aliases.iter().map(String::as_str).collect();
    let lats = netcdf_read::read_1d_f64(&file, &lat_refs, path)?;
    let lons = netcdf_read::read_1d_f64(&file, &lon_refs, path)?;

    let offsets = netcdf_read::read_1d_f64(&file, &[&config.time_var], path)?;
    let units = netcdf_read::read_time_units(&file, &config.time_var, path)?;
    let times = netcdf_read::offsets_to_dates(&units, &offsets)?;
    debug!(calendar = ?units.calendar, base = %units.base, "decoded time axis");

    let (data, [nt, ny, nx]) = netcdf_read::read_3d_f64(&file, &config.variable, path)?;
    for (name, expected, got) in [
        ("time", nt, times.len()),
        ("lat", ny, lats.len()),
        ("lon", nx, lons.len()),
    ] {
        if expected != got {
            return Err(IoError::DimensionMismatch {
                name: name.to_string(),
                expected,
                got,
            });
        }
    }

    let n_missing = data.iter().filter(|v| v.is_nan()).count();
    let series = GriddedSeries::from_flat(times, lats, lons, data)?;
    info!(
        path = %path.display(),
        variable = %config.variable,
        n_times = nt,
        n_lat = ny,
        n_lon = nx,
        n_missing,
        "read gridded series"
    );
    Ok(series)
}
