//! Error types for the qmbc-quantile-map crate.
//!
//! A failed distribution fit is not an error: it is reported as
//! [`crate::FitResult::NoFit`].

/// Error type for all fallible operations in the qmbc-quantile-map crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum QuantileMapError {
    /// Returned when a configuration parameter is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a gamma distribution cannot be constructed.
    ///
    /// The `message` field is a `String` (not a statrs error type) because
    /// statrs errors do not implement `Clone`.
    #[error("gamma construction failed (shape={shape}, scale={scale}): {message}")]
    GammaConstruction {
        /// Shape parameter that caused the failure.
        shape: f64,
        /// Scale parameter that caused the failure.
        scale: f64,
        /// Description of the failure.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_config() {
        let e = QuantileMapError::InvalidConfig {
            reason: "cdf_ceiling must be in (0, 1)".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "invalid configuration: cdf_ceiling must be in (0, 1)"
        );
    }

    #[test]
    fn error_gamma_construction() {
        let e = QuantileMapError::GammaConstruction {
            shape: -1.0,
            scale: 2.0,
            message: "shape must be positive".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "gamma construction failed (shape=-1, scale=2): shape must be positive"
        );
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<QuantileMapError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<QuantileMapError>();
    }
}
