//! NetCDF output of gridded series.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use qmbc_correct::{ArtifactSink, CorrectError};
use qmbc_grid::GriddedSeries;
use tracing::info;

use crate::error::IoError;

/// Configuration for writing a gridded series to NetCDF.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Name of the data variable.
    variable: String,
    /// Optional `units` attribute of the data variable.
    units: Option<String>,
    /// Reference date of the `days since` time axis.
    time_base: NaiveDate,
    /// Value written in place of `NaN`, declared as `_FillValue`.
    fill_value: f64,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            variable: "tas".into(),
            units: None,
            time_base: NaiveDate::from_ymd_opt(1850, 1, 1).unwrap_or_default(),
            fill_value: 1.0e20,
        }
    }
}

impl WriterConfig {
    /// Sets the data variable name.
    pub fn with_variable(mut self, name: impl Into<String>) -> Self {
        self.variable = name.into();
        self
    }

    /// Sets the `units` attribute of the data variable.
    pub fn with_units(mut self, units: Option<impl Into<String>>) -> Self {
        self.units = units.map(Into::into);
        self
    }

    /// Sets the reference date of the time axis.
    pub fn with_time_base(mut self, base: NaiveDate) -> Self {
        self.time_base = base;
        self
    }

    /// Sets the fill value written for missing data.
    pub fn with_fill_value(mut self, value: f64) -> Self {
        self.fill_value = value;
        self
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidConfig`] for an empty variable name or a
    /// non-finite fill value.
    pub fn validate(&self) -> Result<(), IoError> {
        if self.variable.trim().is_empty() {
            return Err(IoError::InvalidConfig {
                reason: "variable name must not be empty".to_string(),
            });
        }
        if !self.fill_value.is_finite() {
            return Err(IoError::InvalidConfig {
                reason: format!("fill_value must be finite, got {}", self.fill_value),
            });
        }
        Ok(())
    }
}

/// Write `series` to a new NetCDF file at `path`.
///
/// The file holds `time`, `lat` and `lon` coordinate variables and one
/// `(time, lat, lon)` data variable. Time is stored as `days since` the
/// configured base date on the proleptic Gregorian calendar, and `NaN`
/// values are written as the fill value.
///
/// # Errors
///
/// Returns [`IoError`] if the configuration is invalid or the NetCDF
/// library fails.
pub fn write_netcdf(path: &Path, series: &GriddedSeries, config: &WriterConfig) -> Result<(), IoError> {
    config.validate()?;
    let (ny, nx) = series.spatial_shape();
    let nt = series.n_times();

    let mut file = netcdf::create(path)?;
    file.add_dimension("time", nt)?;
    file.add_dimension("lat", ny)?;
    file.add_dimension("lon", nx)?;

    {
        let mut var = file.add_variable::<f64>("lat", &["lat"])?;
        var.put_attribute("units", "degrees_north")?;
        var.put_values(series.lats(), ..)?;
    }
    {
        let mut var = file.add_variable::<f64>("lon", &["lon"])?;
        var.put_attribute("units", "degrees_east")?;
        var.put_values(series.lons(), ..)?;
    }
    {
        let offsets: Vec<f64> = series
            .times()
            .iter()
            .map(|d| (*d - config.time_base).num_days() as f64)
            .collect();
        let units = format!("days since {}", config.time_base.format("%Y-%m-%d"));
        let mut var = file.add_variable::<f64>("time", &["time"])?;
        var.put_attribute("units", units.as_str())?;
        var.put_attribute("calendar", "proleptic_gregorian")?;
        var.put_values(&offsets, ..)?;
    }
    {
        let data: Vec<f64> = series
            .values()
            .iter()
            .map(|&v| if v.is_nan() { config.fill_value } else { v })
            .collect();
        let mut var = file.add_variable::<f64>(&config.variable, &["time", "lat", "lon"])?;
        var.put_attribute("_FillValue", config.fill_value)?;
        if let Some(units) = &config.units {
            var.put_attribute("units", units.as_str())?;
        }
        var.put_values(&data, ..)?;
    }

    info!(path = %path.display(), n_times = nt, n_lat = ny, n_lon = nx, "wrote gridded series");
    Ok(())
}

/// An [`ArtifactSink`] writing `<dir>/<name>.nc`.
#[derive(Debug, Clone)]
pub struct NetcdfSink {
    dir: PathBuf,
    config: WriterConfig,
}

impl NetcdfSink {
    pub fn new(dir: impl Into<PathBuf>, config: WriterConfig) -> Self {
        Self {
            dir: dir.into(),
            config,
        }
    }

    /// Path an artifact called `name` is written to.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.nc"))
    }
}

impl ArtifactSink for NetcdfSink {
    fn write_artifact(&mut self, name: &str, series: &GriddedSeries) -> Result<(), CorrectError> {
        write_netcdf(&self.path_for(name), series, &self.config).map_err(|e| e.into_sink_error(name))
    }
}
