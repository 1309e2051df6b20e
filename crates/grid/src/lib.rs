//! # qmbc-grid
//!
//! In-memory gridded time series shaped `(time, lat, lon)` and the seasonal
//! stratification that splits one into per-season sub-series.
//!
//! Missing values are `NaN` throughout. The latitude/longitude plane is
//! addressed through [`CellIndex`] values handed out by a [`CellGrid`], and
//! per-cell results are stored in a [`CellMap`], so that cell logic never
//! does its own index arithmetic.
//!
//! ```
//! use chrono::NaiveDate;
//! use qmbc_grid::{GriddedSeries, stratify};
//! use qmbc_season::RegionCalendar;
//!
//! let start = NaiveDate::from_ymd_opt(2001, 1, 1).unwrap();
//! let times: Vec<NaiveDate> = (0..365).map(|d| start + chrono::Days::new(d)).collect();
//! let series = GriddedSeries::from_flat(times, vec![10.0], vec![75.0], vec![1.0; 365]).unwrap();
//!
//! let split = stratify(&series, &RegionCalendar::Global.catalog());
//! assert_eq!(split.total_times(), 365);
//! ```

mod cell;
mod error;
mod series;
mod stratify;

pub use cell::{CellGrid, CellIndex, CellMap};
pub use error::GridError;
pub use series::GriddedSeries;
pub use stratify::{SeasonSlice, SeasonalSplit, stratify};
