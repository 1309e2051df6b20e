//! Error types for qmbc-io.

use std::path::PathBuf;

use qmbc_correct::CorrectError;
use qmbc_grid::GridError;

/// Error type for all fallible operations in the qmbc-io crate.
///
/// Covers NetCDF failures, time-axis decoding, preprocessing arguments and
/// grid-alignment checks performed before a correction run.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an error originating from the NetCDF library.
    #[error("netcdf error: {reason}")]
    Netcdf {
        /// Description of the underlying NetCDF failure.
        reason: String,
    },

    /// Returned when a required variable is not present in a file.
    #[error("variable '{name}' not found in {}", path.display())]
    MissingVariable {
        /// Name of the missing variable.
        name: String,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when a dimension has an unexpected size.
    #[error("dimension '{name}' mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Name of the dimension.
        name: String,
        /// Expected size.
        expected: usize,
        /// Actual size.
        got: usize,
    },

    /// Returned when a time value or its units cannot be decoded.
    #[error("invalid time: {reason}")]
    InvalidTime {
        /// Description of the time parsing issue.
        reason: String,
    },

    /// Returned when a reader, writer or preprocessing argument is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when input grids do not share latitude/longitude axes.
    #[error("{count} alignment error(s): {details}")]
    Misaligned {
        /// Number of mismatches found.
        count: usize,
        /// Human-readable summary of the mismatches.
        details: String,
    },

    /// Wrapped error from the grid crate.
    #[error(transparent)]
    Grid(#[from] GridError),
}

impl From<netcdf::Error> for IoError {
    fn from(e: netcdf::Error) -> Self {
        IoError::Netcdf {
            reason: e.to_string(),
        }
    }
}

impl IoError {
    /// Converts into the sink failure reported by the correction crate.
    pub(crate) fn into_sink_error(self, artifact: &str) -> CorrectError {
        CorrectError::Sink {
            artifact: artifact.to_string(),
            message: self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_file_not_found() {
        let err = IoError::FileNotFound {
            path: PathBuf::from("/tmp/missing.nc"),
        };
        assert_eq!(err.to_string(), "file not found: /tmp/missing.nc");
    }

    #[test]
    fn display_missing_variable() {
        let err = IoError::MissingVariable {
            name: "tas".to_string(),
            path: PathBuf::from("/data/obs.nc"),
        };
        assert_eq!(err.to_string(), "variable 'tas' not found in /data/obs.nc");
    }

    #[test]
    fn display_dimension_mismatch() {
        let err = IoError::DimensionMismatch {
            name: "tas dimensions".to_string(),
            expected: 3,
            got: 2,
        };
        assert_eq!(
            err.to_string(),
            "dimension 'tas dimensions' mismatch: expected 3, got 2"
        );
    }

    #[test]
    fn display_invalid_time() {
        let err = IoError::InvalidTime {
            reason: "unsupported calendar '360_day'".to_string(),
        };
        assert_eq!(err.to_string(), "invalid time: unsupported calendar '360_day'");
    }

    #[test]
    fn display_misaligned() {
        let err = IoError::Misaligned {
            count: 2,
            details: "observation lat length 3 != 4; future lon[1] differs".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "2 alignment error(s): observation lat length 3 != 4; future lon[1] differs"
        );
    }

    #[test]
    fn from_netcdf_error() {
        let nc_err = netcdf::Error::Str("test nc error".to_string());
        let err: IoError = nc_err.into();
        assert!(matches!(err, IoError::Netcdf { .. }));
        assert!(err.to_string().contains("test nc error"));
    }

    #[test]
    fn into_sink_error_keeps_message() {
        let err = IoError::Netcdf {
            reason: "permission denied".to_string(),
        };
        let sink = err.into_sink_error("fut_corrected");
        assert_eq!(
            sink.to_string(),
            "failed to persist 'fut_corrected': netcdf error: permission denied"
        );
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<IoError>();
    }
}
