//! Error types for the qmbc-grid crate.

/// Error type for all fallible operations in the qmbc-grid crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// Returned when an axis length disagrees with the value array.
    #[error("axis '{axis}' mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Name of the axis (`time`, `lat`, `lon` or `values`).
        axis: String,
        /// Length implied by the other inputs.
        expected: usize,
        /// Length actually supplied.
        got: usize,
    },

    /// Returned when series being joined have different spatial shapes.
    #[error("spatial shape mismatch: expected {expected:?}, got {got:?}")]
    SpatialMismatch {
        /// `(n_lat, n_lon)` of the first series.
        expected: (usize, usize),
        /// `(n_lat, n_lon)` of the offending series.
        got: (usize, usize),
    },

    /// Returned when a cell lies outside the grid.
    #[error("cell ({row}, {col}) outside a {n_rows}x{n_cols} grid")]
    CellOutOfBounds {
        /// Latitude row.
        row: usize,
        /// Longitude column.
        col: usize,
        /// Number of latitude rows.
        n_rows: usize,
        /// Number of longitude columns.
        n_cols: usize,
    },

    /// Returned when concatenating an empty list of series.
    #[error("nothing to concatenate")]
    NothingToConcatenate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_dimension_mismatch() {
        let e = GridError::DimensionMismatch {
            axis: "time".to_string(),
            expected: 365,
            got: 364,
        };
        assert_eq!(e.to_string(), "axis 'time' mismatch: expected 365, got 364");
    }

    #[test]
    fn error_spatial_mismatch() {
        let e = GridError::SpatialMismatch {
            expected: (3, 4),
            got: (3, 5),
        };
        assert_eq!(
            e.to_string(),
            "spatial shape mismatch: expected (3, 4), got (3, 5)"
        );
    }

    #[test]
    fn error_cell_out_of_bounds() {
        let e = GridError::CellOutOfBounds {
            row: 5,
            col: 0,
            n_rows: 2,
            n_cols: 2,
        };
        assert_eq!(e.to_string(), "cell (5, 0) outside a 2x2 grid");
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<GridError>();
    }
}
