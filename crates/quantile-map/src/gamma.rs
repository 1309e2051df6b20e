//! Three-parameter Gamma distribution and statrs bridge.

use statrs::distribution::{ContinuousCDF, Gamma};

use crate::error::QuantileMapError;

/// Validated parameters for a located Gamma distribution.
///
/// The density is that of a standard Gamma(`shape`, `scale`) shifted right
/// by `loc`, so the support is `(loc, ∞)`. `shape` and `scale` must be
/// finite and positive, `loc` finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaParams {
    shape: f64,
    loc: f64,
    scale: f64,
}

impl GammaParams {
    /// Create new parameters, or `None` if any is out of range.
    pub fn new(shape: f64, loc: f64, scale: f64) -> Option<Self> {
        if shape.is_finite() && shape > 0.0 && loc.is_finite() && scale.is_finite() && scale > 0.0
        {
            Some(Self { shape, loc, scale })
        } else {
            None
        }
    }

    /// Shape parameter (k).
    pub fn shape(&self) -> f64 {
        self.shape
    }

    /// Location parameter (lower bound of the support).
    pub fn loc(&self) -> f64 {
        self.loc
    }

    /// Scale parameter (theta).
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Distribution mean (loc + shape * scale).
    pub fn mean(&self) -> f64 {
        self.loc + self.shape * self.scale
    }

    /// Distribution variance (shape * scale²).
    pub fn var(&self) -> f64 {
        self.shape * self.scale * self.scale
    }

    /// Rate parameter (1 / scale); statrs parameterises Gamma by rate.
    pub(crate) fn rate(&self) -> f64 {
        1.0 / self.scale
    }
}

/// A Gamma distribution with location, ready for CDF and quantile calls.
#[derive(Debug, Clone)]
pub struct LocatedGamma {
    params: GammaParams,
    dist: Gamma,
}

impl LocatedGamma {
    /// Builds the distribution from validated parameters.
    ///
    /// # Errors
    ///
    /// Returns [`QuantileMapError::GammaConstruction`] if statrs rejects the
    /// shape/rate pair.
    pub fn new(params: GammaParams) -> Result<Self, QuantileMapError> {
        let dist = Gamma::new(params.shape(), params.rate()).map_err(|e| {
            QuantileMapError::GammaConstruction {
                shape: params.shape(),
                scale: params.scale(),
                message: e.to_string(),
            }
        })?;
        Ok(Self { params, dist })
    }

    /// The parameters this distribution was built from.
    pub fn params(&self) -> GammaParams {
        self.params
    }

    /// CDF at `x`; `NaN` for a non-finite `x`, 0 at or below `loc`.
    ///
    /// A standardised value `(x - loc) / scale` that underflows to zero or
    /// overflows to infinity maps to 0 or 1.
    pub fn cdf(&self, x: f64) -> f64 {
        if !x.is_finite() {
            return f64::NAN;
        }
        let z = x - self.params.loc;
        // statrs evaluates the regularised gamma at `z * rate` and panics
        // when that product is zero or infinite.
        let y = z * self.params.rate();
        if y <= 0.0 {
            0.0
        } else if y.is_infinite() {
            1.0
        } else {
            self.dist.cdf(z)
        }
    }

    /// Quantile (inverse CDF) at probability `p`; `NaN` propagates.
    pub fn inverse_cdf(&self, p: f64) -> f64 {
        if p.is_nan() {
            return f64::NAN;
        }
        if p <= 0.0 {
            return self.params.loc;
        }
        self.params.loc + self.dist.inverse_cdf(p.min(1.0))
    }
}
