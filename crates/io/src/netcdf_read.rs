//! Low-level NetCDF extraction helpers.

use std::path::Path;

use chrono::NaiveDate;
use netcdf::AttributeValue;

use crate::error::IoError;

/// Days before the first of each month in a 365-day year.
const CUM_DAYS_NOLEAP: [u32; 13] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334, 365];

/// Open a NetCDF file at `path`, returning [`IoError::FileNotFound`] if the
/// path does not exist on disk.
pub(crate) fn open_file(path: &Path) -> Result<netcdf::File, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(netcdf::open(path)?)
}

/// Read a 1-D `f64` variable, trying each alias in order.
///
/// Returns the data from the first alias that matches. If none match,
/// returns [`IoError::MissingVariable`] with the first alias as the name.
pub(crate) fn read_1d_f64(
    file: &netcdf::File,
    aliases: &[&str],
    path: &Path,
) -> Result<Vec<f64>, IoError> {
    for &alias in aliases {
        if let Some(var) = file.variable(alias) {
            return Ok(var.get_values::<f64, _>(..)?);
        }
    }

    let name = aliases.first().copied().unwrap_or("unknown");
    Err(IoError::MissingVariable {
        name: name.to_string(),
        path: path.to_path_buf(),
    })
}

/// Read a 3-D `f64` variable, returning the flattened data with fill values
/// replaced by `NaN`, and the shape `[nt, ny, nx]`.
pub(crate) fn read_3d_f64(
    file: &netcdf::File,
    var_name: &str,
    path: &Path,
) -> Result<(Vec<f64>, [usize; 3]), IoError> {
    let var = file
        .variable(var_name)
        .ok_or_else(|| IoError::MissingVariable {
            name: var_name.to_string(),
            path: path.to_path_buf(),
        })?;

    let dims = var.dimensions();
    if dims.len() != 3 {
        return Err(IoError::DimensionMismatch {
            name: format!("{var_name} dimensions"),
            expected: 3,
            got: dims.len(),
        });
    }
    let shape = [dims[0].len(), dims[1].len(), dims[2].len()];

    let fills: Vec<f64> = ["_FillValue", "missing_value"]
        .iter()
        .filter_map(|name| var.attribute_value(name).and_then(|res| res.ok()))
        .filter_map(attribute_as_f64)
        .filter(|v| !v.is_nan())
        .collect();

    let mut data = var.get_values::<f64, _>(..)?;
    if !fills.is_empty() {
        for v in &mut data {
            if fills.contains(v) {
                *v = f64::NAN;
            }
        }
    }
    Ok((data, shape))
}

fn attribute_as_f64(value: AttributeValue) -> Option<f64> {
    match value {
        AttributeValue::Double(v) => Some(v),
        AttributeValue::Float(v) => Some(f64::from(v)),
        AttributeValue::Int(v) => Some(f64::from(v)),
        AttributeValue::Short(v) => Some(f64::from(v)),
        AttributeValue::Doubles(v) => v.first().copied(),
        AttributeValue::Floats(v) => v.first().map(|&x| f64::from(x)),
        _ => None,
    }
}

/// Unit of the time offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimeStep {
    Days,
    Hours,
}

impl TimeStep {
    fn per_day(self) -> f64 {
        match self {
            Self::Days => 1.0,
            Self::Hours => 24.0,
        }
    }
}

/// Calendar families the reader can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Calendar {
    /// `standard`, `gregorian` and `proleptic_gregorian`.
    Gregorian,
    /// `noleap` and `365_day`.
    NoLeap,
}

impl Calendar {
    pub(crate) fn parse(name: &str) -> Result<Self, IoError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "standard" | "gregorian" | "proleptic_gregorian" => Ok(Self::Gregorian),
            "noleap" | "no_leap" | "365_day" => Ok(Self::NoLeap),
            other => Err(IoError::InvalidTime {
                reason: format!("unsupported calendar '{other}'"),
            }),
        }
    }
}

/// Decoded CF time units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TimeUnits {
    pub(crate) step: TimeStep,
    pub(crate) base: NaiveDate,
    pub(crate) calendar: Calendar,
}

/// Parses `"<days|hours> since YYYY-MM-DD[ ...]"`.
pub(crate) fn parse_units(units: &str) -> Result<(TimeStep, NaiveDate), IoError> {
    let mut parts = units.split_whitespace();
    let step = match parts.next().map(str::to_ascii_lowercase).as_deref() {
        Some("days" | "day" | "d") => TimeStep::Days,
        Some("hours" | "hour" | "h") => TimeStep::Hours,
        _ => {
            return Err(IoError::InvalidTime {
                reason: format!("unsupported time units '{units}'"),
            });
        }
    };
    if parts.next() != Some("since") {
        return Err(IoError::InvalidTime {
            reason: format!("unexpected time units format: '{units}'"),
        });
    }
    let stamp = parts.next().ok_or_else(|| IoError::InvalidTime {
        reason: format!("time units '{units}' have no reference date"),
    })?;
    // "2000-01-01T00:00:00" carries the clock in the same token
    let date_str = stamp.split('T').next().unwrap_or(stamp);
    let base = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
        IoError::InvalidTime {
            reason: format!("failed to parse base date '{date_str}': {e}"),
        }
    })?;
    Ok((step, base))
}

/// Read the `units` and optional `calendar` attributes of the time variable.
///
/// A missing `calendar` attribute means `standard`.
pub(crate) fn read_time_units(
    file: &netcdf::File,
    time_var: &str,
    path: &Path,
) -> Result<TimeUnits, IoError> {
    let var = file
        .variable(time_var)
        .ok_or_else(|| IoError::MissingVariable {
            name: time_var.to_string(),
            path: path.to_path_buf(),
        })?;

    let units: String = var
        .attribute_value("units")
        .ok_or_else(|| IoError::InvalidTime {
            reason: format!("time variable '{time_var}' has no 'units' attribute"),
        })?
        .map_err(|e| IoError::InvalidTime {
            reason: format!("failed to read 'units' attribute: {e}"),
        })?
        .try_into()
        .map_err(|e: netcdf::Error| IoError::InvalidTime {
            reason: format!("'units' attribute is not a string: {e}"),
        })?;
    let (step, base) = parse_units(&units)?;

    let calendar = match var.attribute_value("calendar").and_then(|res| res.ok()) {
        Some(AttributeValue::Str(name)) => Calendar::parse(&name)?,
        _ => Calendar::Gregorian,
    };

    Ok(TimeUnits {
        step,
        base,
        calendar,
    })
}

/// Convert time offsets into dates.
///
/// Offsets are floored to whole days. Gregorian calendars use chrono date
/// arithmetic; 365-day calendars count every year as 365 days and never
/// produce 29 February.
pub(crate) fn offsets_to_dates(
    units: &TimeUnits,
    offsets: &[f64],
) -> Result<Vec<NaiveDate>, IoError> {
    let noleap_base = match units.calendar {
        Calendar::NoLeap => Some(noleap_ordinal(units.base)?),
        Calendar::Gregorian => None,
    };

    offsets
        .iter()
        .map(|&offset| {
            if !offset.is_finite() {
                return Err(IoError::InvalidTime {
                    reason: format!("non-finite time offset {offset}"),
                });
            }
            let days = (offset / units.step.per_day()).floor() as i64;
            match noleap_base {
                Some(ordinal) => noleap_date(ordinal.checked_add(days).ok_or_else(|| {
                    IoError::InvalidTime {
                        reason: format!("time offset of {days} days is out of range"),
                    }
                })?),
                None => units
                    .base
                    .checked_add_signed(chrono::TimeDelta::try_days(days).ok_or_else(|| {
                        IoError::InvalidTime {
                            reason: format!("time offset of {days} days is out of range"),
                        }
                    })?)
                    .ok_or_else(|| IoError::InvalidTime {
                        reason: format!("date overflow adding {days} days to {}", units.base),
                    }),
            }
        })
        .collect()
}

/// Days since year 0 in a 365-day calendar.
fn noleap_ordinal(date: NaiveDate) -> Result<i64, IoError> {
    use chrono::Datelike;
    if date.month() == 2 && date.day() == 29 {
        return Err(IoError::InvalidTime {
            reason: format!("reference date {date} does not exist in a 365-day calendar"),
        });
    }
    let doy = CUM_DAYS_NOLEAP[date.month0() as usize] + date.day0();
    Ok(i64::from(date.year()) * 365 + i64::from(doy))
}

fn noleap_date(ordinal: i64) -> Result<NaiveDate, IoError> {
    let year = i32::try_from(ordinal.div_euclid(365)).map_err(|_| IoError::InvalidTime {
        reason: format!("day {ordinal} is out of range"),
    })?;
    let doy = ordinal.rem_euclid(365) as u32;
    let month0 = CUM_DAYS_NOLEAP[1..]
        .iter()
        .position(|&end| doy < end)
        .unwrap_or(11);
    let day = doy - CUM_DAYS_NOLEAP[month0] + 1;
    NaiveDate::from_ymd_opt(year, month0 as u32 + 1, day).ok_or_else(|| IoError::InvalidTime {
        reason: format!("day {ordinal} is out of range"),
    })
}
