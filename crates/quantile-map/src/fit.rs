//! Maximum-likelihood fitting of the three-parameter Gamma distribution.
//!
//! The fitter never fails with an error: a sample that cannot be fitted
//! yields [`FitResult::NoFit`] with the reason attached.

use std::fmt;

use argmin::core::{CostFunction, Executor};
use argmin::solver::neldermead::NelderMead;
use statrs::function::gamma::ln_gamma;
use tracing::trace;

use crate::config::QmConfig;
use crate::gamma::{GammaParams, LocatedGamma};

/// Largest shape the optimizer may visit; beyond it the Gamma is
/// indistinguishable from a normal and the CDF loses accuracy.
const MAX_SHAPE: f64 = 1.0e6;

/// Smallest shape the optimizer may visit.
const MIN_SHAPE: f64 = 1.0e-2;

/// Largest scale, in units of the sample standard deviation.
const MAX_SCALE: f64 = 1.0e4;

/// Smallest gap between the sample minimum and the location, in units of
/// the sample standard deviation.
const MIN_GAP: f64 = 1.0e-8;

/// An optimum closer than this factor to `MIN_SHAPE`, `MAX_SCALE` or
/// `MIN_GAP` sits on the likelihood pole at the sample minimum.
const POLE_MARGIN: f64 = 10.0;

/// Why a sample could not be fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoFitReason {
    /// No finite values in the sample.
    Empty,
    /// Fewer distinct finite values than the configured minimum.
    TooFewDistinct {
        /// Distinct values found.
        distinct: usize,
        /// Distinct values required.
        required: usize,
    },
    /// The finite values have zero standard deviation.
    ZeroSpread,
    /// The optimizer failed or ended at an unusable point.
    NotConverged,
}

impl fmt::Display for NoFitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "no finite values"),
            Self::TooFewDistinct { distinct, required } => {
                write!(f, "{distinct} distinct values, need {required}")
            }
            Self::ZeroSpread => write!(f, "zero spread"),
            Self::NotConverged => write!(f, "optimizer did not converge"),
        }
    }
}

/// A successful fit: the distribution and the clipped CDF of every input.
#[derive(Debug, Clone)]
pub struct FittedSample {
    dist: LocatedGamma,
    cdf: Vec<f64>,
}

impl FittedSample {
    /// Fitted parameters.
    pub fn params(&self) -> GammaParams {
        self.dist.params()
    }

    /// The fitted distribution.
    pub fn distribution(&self) -> &LocatedGamma {
        &self.dist
    }

    /// CDF value of each input value, in input order.
    ///
    /// Missing inputs map to `NaN`; all other values lie in
    /// `[0, cdf_ceiling)`.
    pub fn cdf(&self) -> &[f64] {
        &self.cdf
    }
}

/// Outcome of [`fit_gamma`].
#[derive(Debug, Clone)]
pub enum FitResult {
    /// The sample was fitted.
    Fitted(FittedSample),
    /// The sample could not be fitted.
    NoFit(NoFitReason),
}

impl FitResult {
    /// Returns `true` for [`FitResult::Fitted`].
    pub fn is_fitted(&self) -> bool {
        matches!(self, Self::Fitted(_))
    }

    /// The fitted sample, if any.
    pub fn fitted(&self) -> Option<&FittedSample> {
        match self {
            Self::Fitted(s) => Some(s),
            Self::NoFit(_) => None,
        }
    }

    /// Consumes the result, returning the fitted sample if any.
    pub fn into_fitted(self) -> Option<FittedSample> {
        match self {
            Self::Fitted(s) => Some(s),
            Self::NoFit(_) => None,
        }
    }

    /// The no-fit reason, if any.
    pub fn no_fit_reason(&self) -> Option<NoFitReason> {
        match self {
            Self::Fitted(_) => None,
            Self::NoFit(r) => Some(*r),
        }
    }
}

/// Clips a probability to `[0, ceiling)`; `NaN` passes through.
///
/// The upper bound is one machine epsilon below `ceiling`, so the result is
/// always strictly less than it.
pub fn clip_probability(p: f64, ceiling: f64) -> f64 {
    if p.is_nan() {
        p
    } else {
        p.clamp(0.0, ceiling - f64::EPSILON)
    }
}

/// Counts distinct values, treating values closer than 1e-10 as equal.
pub(crate) fn count_unique(values: &[f64]) -> usize {
    if values.is_empty() {
        return 0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    sorted
        .windows(2)
        .filter(|w| (w[1] - w[0]).abs() > 1e-10)
        .count()
        + 1
}

/// Fits a three-parameter Gamma to `sample` by maximum likelihood.
///
/// Non-finite values are ignored by the fit and receive a `NaN` CDF.
///
/// # Example
///
/// ```
/// use qmbc_quantile_map::{fit_gamma, QmConfig};
///
/// let result = fit_gamma(&[1.0, 2.0, 3.0, 4.0, 5.0], &QmConfig::default());
/// let fitted = result.fitted().unwrap();
/// assert!(fitted.params().loc() < 1.0);
/// assert!(fitted.cdf().iter().all(|&p| p < 0.9999));
/// ```
pub fn fit_gamma(sample: &[f64], config: &QmConfig) -> FitResult {
    let finite: Vec<f64> = sample.iter().copied().filter(|x| x.is_finite()).collect();
    if finite.is_empty() {
        return FitResult::NoFit(NoFitReason::Empty);
    }
    let distinct = count_unique(&finite);
    if distinct < config.min_unique() {
        return FitResult::NoFit(NoFitReason::TooFewDistinct {
            distinct,
            required: config.min_unique(),
        });
    }

    // Work on offsets from the minimum so a shifted sample follows the same
    // optimizer path.
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let offsets: Vec<f64> = finite.iter().map(|x| x - min).collect();
    let n = offsets.len() as f64;
    let mean = offsets.iter().sum::<f64>() / n;
    let m2 = offsets.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n;
    let sd = m2.sqrt();
    if !(sd.is_finite() && sd > 0.0) {
        return FitResult::NoFit(NoFitReason::ZeroSpread);
    }
    let m3 = offsets.iter().map(|d| (d - mean).powi(3)).sum::<f64>() / n;
    let skew = m3 / sd.powi(3);

    let start = start_point(mean, sd, skew);
    let Some(best) = minimise(&offsets, sd, start, config) else {
        return FitResult::NoFit(NoFitReason::NotConverged);
    };

    if near_pole(&best) {
        trace!(
            shape = best[0].exp(),
            scale_sd = best[1].exp(),
            gap_sd = best[2].exp(),
            "gamma fit collapsed onto the sample minimum"
        );
        return FitResult::NoFit(NoFitReason::NotConverged);
    }

    let shape = best[0].exp();
    let scale = sd * best[1].exp();
    let loc = min - sd * best[2].exp();
    let Some(params) = GammaParams::new(shape, loc, scale) else {
        return FitResult::NoFit(NoFitReason::NotConverged);
    };
    let Ok(dist) = LocatedGamma::new(params) else {
        return FitResult::NoFit(NoFitReason::NotConverged);
    };

    let cdf: Vec<f64> = sample
        .iter()
        .map(|&x| clip_probability(dist.cdf(x), config.cdf_ceiling()))
        .collect();
    let finite_cdf: Vec<f64> = sample
        .iter()
        .zip(&cdf)
        .filter(|(x, _)| x.is_finite())
        .map(|(_, &p)| p)
        .collect();
    if finite_cdf.iter().any(|p| !p.is_finite()) || count_unique(&finite_cdf) < config.min_unique()
    {
        trace!(shape, loc, scale, "gamma fit does not separate the sample");
        return FitResult::NoFit(NoFitReason::NotConverged);
    }
    trace!(shape, loc, scale, n = finite.len(), "gamma fitted");

    FitResult::Fitted(FittedSample { dist, cdf })
}

/// Whether an optimum in unconstrained coordinates lies against the
/// pole-side bounds of the search box.
fn near_pole(t: &[f64]) -> bool {
    let (shape, scale_sd, gap_sd) = (t[0].exp(), t[1].exp(), t[2].exp());
    shape < MIN_SHAPE * POLE_MARGIN
        || scale_sd > MAX_SCALE / POLE_MARGIN
        || gap_sd < MIN_GAP * POLE_MARGIN
}

/// Moment-based starting point in the unconstrained coordinates.
///
/// `mean` and `sd` are of the offsets from the sample minimum.
fn start_point(mean: f64, sd: f64, skew: f64) -> Vec<f64> {
    let shape0 = if skew.abs() > 0.0 {
        (4.0 / (skew * skew)).clamp(0.5, 100.0)
    } else {
        100.0
    };
    let scale0 = sd / shape0.sqrt();
    // gap between the sample minimum and the location
    let gap0 = (shape0 * scale0 - mean).max(0.1 * sd);
    vec![shape0.ln(), (scale0 / sd).ln(), (gap0 / sd).ln()]
}

fn minimise(offsets: &[f64], sd: f64, start: Vec<f64>, config: &QmConfig) -> Option<Vec<f64>> {
    let dim = start.len();
    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(dim + 1);
    simplex.push(start.clone());
    for i in 0..dim {
        let mut vertex = start.clone();
        vertex[i] += 0.5;
        simplex.push(vertex);
    }

    let cost = GammaNll { offsets, sd };
    let solver = NelderMead::new(simplex)
        .with_sd_tolerance(config.sd_tolerance())
        .ok()?;
    let result = Executor::new(cost, solver)
        .configure(|state| state.max_iters(config.max_iters()))
        .run()
        .ok()?;

    let state = result.state();
    if !(state.best_cost.is_finite() && state.best_cost < f64::MAX) {
        return None;
    }
    state.best_param.clone()
}

/// Negative log-likelihood of the located Gamma, in unconstrained
/// coordinates `(ln shape, ln(scale / sd), ln(gap / sd))`.
struct GammaNll<'a> {
    offsets: &'a [f64],
    sd: f64,
}

impl GammaNll<'_> {
    fn nll(&self, t: &[f64]) -> f64 {
        let (shape, scale_sd, gap_sd) = (t[0].exp(), t[1].exp(), t[2].exp());
        // The likelihood is unbounded as the location approaches the sample
        // minimum with shape < 1; the box keeps the search away from it.
        if !(MIN_SHAPE..=MAX_SHAPE).contains(&shape) || scale_sd > MAX_SCALE || gap_sd < MIN_GAP {
            return f64::INFINITY;
        }
        let scale = self.sd * scale_sd;
        let gap = self.sd * gap_sd;
        let n = self.offsets.len() as f64;

        let mut sum_ln = 0.0;
        let mut sum = 0.0;
        for &d in self.offsets {
            let z = d + gap;
            sum_ln += z.ln();
            sum += z;
        }
        n * ln_gamma(shape) + n * shape * scale.ln() - (shape - 1.0) * sum_ln + sum / scale
    }
}

impl CostFunction for GammaNll<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, params: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        let v = self.nll(params);
        if v.is_finite() { Ok(v) } else { Ok(f64::MAX) }
    }
}
