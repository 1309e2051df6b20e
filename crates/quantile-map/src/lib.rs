//! Three-parameter Gamma fitting and trend-preserving quantile mapping.
//!
//! For one grid cell and one season, three samples are fitted: the
//! historical model (H), the future model (F) and the observation (O). The
//! historical sample is mapped onto the observed distribution at equal
//! percentile, and the future sample is mapped the same way with its
//! quantile-wise change relative to H added back.
//!
//! # Pipeline
//!
//! 1. **Skip** the cell if O has no finite value
//! 2. **Fit** a Gamma(shape, loc, scale) to H, O and F by maximum likelihood
//! 3. **Skip** the cell if any fit returns [`FitResult::NoFit`]
//! 4. **Map** with the CDF clipped below `cdf_ceiling`
//!
//! # Quick Start
//!
//! ```
//! use qmbc_quantile_map::{correct_cell, CellCorrection, QmConfig};
//!
//! let hist = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let fut = [2.0, 3.0, 4.0, 5.0, 6.0];
//! let obs = [5.0, 6.0, 7.0, 8.0, 9.0];
//!
//! match correct_cell(&hist, &fut, &obs, &QmConfig::default()) {
//!     CellCorrection::Corrected { hist, fut } => assert_eq!(hist.len(), fut.len()),
//!     CellCorrection::Skipped(reason) => panic!("skipped: {reason:?}"),
//! }
//! ```

mod config;
mod error;
mod fit;
mod gamma;
mod mapper;

pub use config::QmConfig;
pub use error::QuantileMapError;
pub use fit::{FitResult, FittedSample, NoFitReason, clip_probability, fit_gamma};
pub use gamma::{GammaParams, LocatedGamma};
pub use mapper::{CellCorrection, CellOutcome, SkipReason, correct_cell};
