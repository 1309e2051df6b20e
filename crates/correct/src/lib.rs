//! # qmbc-correct
//!
//! Runs seasonal quantile mapping over whole grids.
//!
//! ```mermaid
//! graph LR
//!     SEL[RegionSelector] --> CAT[SeasonCatalog]
//!     H[hist] --> STR[stratify]
//!     F[fut] --> STR
//!     O[obs] --> STR
//!     CAT --> STR
//!     STR --> CELL["correct_cell (per season, per cell)"]
//!     CELL --> CAT2[concat along time]
//!     CAT2 --> OUT[BiasCorrection]
//!     OUT --> SINK[ArtifactSink]
//! ```
//!
//! A cell whose observation is entirely missing in a season, or whose
//! historical, future or observed sample cannot be fitted, is left `NaN` in
//! both outputs for that season. Each latitude row reports a
//! [`RowProgress`] event to a [`ProgressObserver`].
//!
//! ```
//! use chrono::NaiveDate;
//! use qmbc_correct::{CorrectionConfig, MemorySink, correct};
//! use qmbc_grid::GriddedSeries;
//!
//! let start = NaiveDate::from_ymd_opt(2001, 1, 1).unwrap();
//! let times: Vec<NaiveDate> = (0..365).map(|d| start + chrono::Days::new(d)).collect();
//! let values: Vec<f64> = (0..365).map(|d| 1.0 + (d % 17) as f64).collect();
//! let series = GriddedSeries::from_flat(times, vec![0.0], vec![0.0], values).unwrap();
//!
//! let result = correct(&series, &series, &series, &CorrectionConfig::default()).unwrap();
//! assert_eq!(result.hist().n_times(), 365);
//!
//! let mut sink = MemorySink::new();
//! result.persist(&mut sink).unwrap();
//! assert_eq!(sink.names(), ["hist_corrected", "fut_corrected"]);
//! ```

mod config;
mod error;
mod orchestrator;
mod progress;
mod report;
mod sink;

pub use config::{CorrectionConfig, TimeOrder};
pub use error::CorrectError;
pub use orchestrator::{BiasCorrection, correct, correct_with_observer};
pub use progress::{ProgressObserver, RowProgress, TracingObserver};
pub use report::{CorrectionReport, SeasonReport};
pub use sink::{ArtifactSink, FUT_CORRECTED, HIST_CORRECTED, MemorySink};
