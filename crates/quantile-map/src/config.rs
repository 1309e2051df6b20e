//! Configuration for distribution fitting and quantile mapping.

use crate::error::QuantileMapError;

/// Configuration for Gamma fitting and the quantile-mapping transform.
///
/// Use the builder methods to customise parameters.
///
/// # Example
///
/// ```
/// use qmbc_quantile_map::QmConfig;
///
/// let config = QmConfig::new()
///     .with_cdf_ceiling(0.999)
///     .with_max_iters(500);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct QmConfig {
    cdf_ceiling: f64,
    min_unique: usize,
    max_iters: u64,
    sd_tolerance: f64,
}

impl QmConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `cdf_ceiling = 0.9999`, `min_unique = 3`,
    /// `max_iters = 2000`, `sd_tolerance = 1e-10`.
    pub fn new() -> Self {
        Self {
            cdf_ceiling: 0.9999,
            min_unique: 3,
            max_iters: 2000,
            sd_tolerance: 1e-10,
        }
    }

    // --- Builder methods ---

    /// Sets the exclusive upper bound for CDF values fed to an inverse CDF.
    pub fn with_cdf_ceiling(mut self, p: f64) -> Self {
        self.cdf_ceiling = p;
        self
    }

    /// Sets the minimum number of distinct finite values required to fit.
    pub fn with_min_unique(mut self, n: usize) -> Self {
        self.min_unique = n;
        self
    }

    /// Sets the Nelder-Mead iteration cap.
    pub fn with_max_iters(mut self, n: u64) -> Self {
        self.max_iters = n;
        self
    }

    /// Sets the simplex standard-deviation convergence tolerance.
    pub fn with_sd_tolerance(mut self, tol: f64) -> Self {
        self.sd_tolerance = tol;
        self
    }

    // --- Accessors ---

    /// Exclusive upper bound for clipped CDF values.
    pub fn cdf_ceiling(&self) -> f64 {
        self.cdf_ceiling
    }

    /// Minimum number of distinct finite values required to fit.
    pub fn min_unique(&self) -> usize {
        self.min_unique
    }

    /// Nelder-Mead iteration cap.
    pub fn max_iters(&self) -> u64 {
        self.max_iters
    }

    /// Simplex standard-deviation convergence tolerance.
    pub fn sd_tolerance(&self) -> f64 {
        self.sd_tolerance
    }

    /// Validates this configuration.
    ///
    /// Checks that `cdf_ceiling` is in the open interval (0, 1), that
    /// `min_unique` is at least 3 (three parameters are estimated), that
    /// `max_iters` is at least 1 and that `sd_tolerance` is finite and
    /// positive.
    pub fn validate(&self) -> Result<(), QuantileMapError> {
        if !self.cdf_ceiling.is_finite() || self.cdf_ceiling <= 0.0 || self.cdf_ceiling >= 1.0 {
            return Err(QuantileMapError::InvalidConfig {
                reason: format!(
                    "cdf_ceiling must be in (0, 1) and finite, got {}",
                    self.cdf_ceiling
                ),
            });
        }

        if self.min_unique < 3 {
            return Err(QuantileMapError::InvalidConfig {
                reason: format!("min_unique must be >= 3, got {}", self.min_unique),
            });
        }

        if self.max_iters < 1 {
            return Err(QuantileMapError::InvalidConfig {
                reason: "max_iters must be >= 1, got 0".to_string(),
            });
        }

        if !self.sd_tolerance.is_finite() || self.sd_tolerance <= 0.0 {
            return Err(QuantileMapError::InvalidConfig {
                reason: format!(
                    "sd_tolerance must be finite and > 0, got {}",
                    self.sd_tolerance
                ),
            });
        }

        Ok(())
    }
}

impl Default for QmConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = QmConfig::new();
        assert!((cfg.cdf_ceiling() - 0.9999).abs() < f64::EPSILON);
        assert_eq!(cfg.min_unique(), 3);
        assert_eq!(cfg.max_iters(), 2000);
        assert!((cfg.sd_tolerance() - 1e-10).abs() < f64::EPSILON);
    }

    #[test]
    fn builder_chaining() {
        let cfg = QmConfig::new()
            .with_cdf_ceiling(0.99)
            .with_min_unique(5)
            .with_max_iters(100)
            .with_sd_tolerance(1e-6);
        assert!((cfg.cdf_ceiling() - 0.99).abs() < f64::EPSILON);
        assert_eq!(cfg.min_unique(), 5);
        assert_eq!(cfg.max_iters(), 100);
        assert!((cfg.sd_tolerance() - 1e-6).abs() < f64::EPSILON);
    }

    #[test]
    fn validate_ok() {
        assert!(QmConfig::new().validate().is_ok());
    }

    #[test]
    fn validate_bad_ceiling() {
        assert!(QmConfig::new().with_cdf_ceiling(1.0).validate().is_err());
        assert!(QmConfig::new().with_cdf_ceiling(0.0).validate().is_err());
        assert!(QmConfig::new().with_cdf_ceiling(f64::NAN).validate().is_err());
    }

    #[test]
    fn validate_min_unique_below_parameter_count() {
        assert!(QmConfig::new().with_min_unique(2).validate().is_err());
    }

    #[test]
    fn validate_zero_iters() {
        assert!(QmConfig::new().with_max_iters(0).validate().is_err());
    }

    #[test]
    fn validate_bad_tolerance() {
        assert!(QmConfig::new().with_sd_tolerance(0.0).validate().is_err());
        assert!(QmConfig::new().with_sd_tolerance(f64::INFINITY).validate().is_err());
    }

    #[test]
    fn default_trait() {
        assert_eq!(QmConfig::default().min_unique(), QmConfig::new().min_unique());
    }
}
