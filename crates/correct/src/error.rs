//! Error types for the qmbc-correct crate.

use qmbc_grid::GridError;
use qmbc_quantile_map::QuantileMapError;

/// Error type for all fallible operations in the qmbc-correct crate.
///
/// Per-cell fit failures and missing observations are never errors; they
/// are counted in the [`crate::CorrectionReport`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum CorrectError {
    /// Returned when an input's lat/lon shape differs from the historical
    /// series.
    #[error("{dataset} has spatial shape {got:?}, expected {expected:?}")]
    ShapeMismatch {
        /// Which input disagrees (`future` or `observation`).
        dataset: String,
        /// `(n_lat, n_lon)` of the historical series.
        expected: (usize, usize),
        /// `(n_lat, n_lon)` of the offending series.
        got: (usize, usize),
    },

    /// Returned when a configuration parameter is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned by an [`crate::ArtifactSink`] that could not store an
    /// artifact.
    #[error("failed to persist '{artifact}': {message}")]
    Sink {
        /// Artifact name.
        artifact: String,
        /// Description of the failure.
        message: String,
    },

    /// Wrapped error from the grid crate.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Wrapped error from the quantile-map crate.
    #[error(transparent)]
    QuantileMap(#[from] QuantileMapError),
}
