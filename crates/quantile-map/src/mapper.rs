//! Per-cell seasonal quantile mapping with trend preservation.

use tracing::trace;

use crate::config::QmConfig;
use crate::fit::{FitResult, NoFitReason, fit_gamma};

/// Why a cell was left uncorrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The observation sample holds no finite value.
    NoObservation,
    /// At least one of the three samples could not be fitted.
    FitFailure {
        /// Failure reason of the first sample that did not fit.
        reason: NoFitReason,
    },
}

/// Summary outcome of one cell in one season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellOutcome {
    /// Both outputs were populated.
    Corrected,
    /// Observation entirely missing; both outputs left as no-data.
    SkippedNoObservation,
    /// A fit failed; both outputs left as no-data.
    SkippedFitFailure,
}

/// Result of [`correct_cell`].
#[derive(Debug, Clone, PartialEq)]
pub enum CellCorrection {
    /// Corrected historical and future samples, aligned with the inputs.
    Corrected {
        /// Corrected historical-model values.
        hist: Vec<f64>,
        /// Corrected future-model values.
        fut: Vec<f64>,
    },
    /// Neither output is populated.
    Skipped(SkipReason),
}

impl CellCorrection {
    /// The summary outcome.
    pub fn outcome(&self) -> CellOutcome {
        match self {
            Self::Corrected { .. } => CellOutcome::Corrected,
            Self::Skipped(SkipReason::NoObservation) => CellOutcome::SkippedNoObservation,
            Self::Skipped(SkipReason::FitFailure { .. }) => CellOutcome::SkippedFitFailure,
        }
    }
}

/// Corrects one cell's historical and future samples against observations.
///
/// The cell is skipped for both outputs when `obs` has no finite value
/// (nothing is fitted in that case) or when any of the three fits fails.
/// Otherwise, with `P` the clipped CDF of each value under its own fit:
///
/// ```text
/// corrected_H = InvCDF_O(P_H(H))
/// shift       = F - InvCDF_H(P_F(F))
/// corrected_F = InvCDF_O(P_F(F)) + shift
/// ```
///
/// Missing input values yield `NaN` at the same position.
///
/// # Example
///
/// ```
/// use qmbc_quantile_map::{correct_cell, CellOutcome, QmConfig};
///
/// let hist = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let fut = [2.0, 3.0, 4.0, 5.0, 6.0];
/// let obs = [f64::NAN; 5];
/// let result = correct_cell(&hist, &fut, &obs, &QmConfig::default());
/// assert_eq!(result.outcome(), CellOutcome::SkippedNoObservation);
/// ```
pub fn correct_cell(hist: &[f64], fut: &[f64], obs: &[f64], config: &QmConfig) -> CellCorrection {
    if obs.iter().all(|x| !x.is_finite()) {
        return CellCorrection::Skipped(SkipReason::NoObservation);
    }

    let fit_h = fit_gamma(hist, config);
    let fit_o = fit_gamma(obs, config);
    let fit_f = fit_gamma(fut, config);
    let (h, o, f) = match (fit_h, fit_o, fit_f) {
        (FitResult::Fitted(h), FitResult::Fitted(o), FitResult::Fitted(f)) => (h, o, f),
        (h, o, f) => {
            let reason = [h, o, f]
                .iter()
                .find_map(FitResult::no_fit_reason)
                .unwrap_or(NoFitReason::NotConverged);
            trace!(%reason, "cell skipped");
            return CellCorrection::Skipped(SkipReason::FitFailure { reason });
        }
    };

    let obs_dist = o.distribution();
    let hist_dist = h.distribution();

    let hist_corrected = h.cdf().iter().map(|&p| obs_dist.inverse_cdf(p)).collect();
    let fut_corrected = fut
        .iter()
        .zip(f.cdf())
        .map(|(&x, &p)| {
            let shift = x - hist_dist.inverse_cdf(p);
            obs_dist.inverse_cdf(p) + shift
        })
        .collect();

    CellCorrection::Corrected {
        hist: hist_corrected,
        fut: fut_corrected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_observation_skips() {
        let r = correct_cell(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0], &[], &QmConfig::default());
        assert_eq!(r, CellCorrection::Skipped(SkipReason::NoObservation));
        assert_eq!(r.outcome(), CellOutcome::SkippedNoObservation);
    }

    #[test]
    fn hist_fit_failure_skips_both() {
        let r = correct_cell(
            &[1.0, 1.0, 1.0],
            &[2.0, 3.0, 4.0, 5.0],
            &[5.0, 6.0, 7.0, 8.0],
            &QmConfig::default(),
        );
        assert_eq!(r.outcome(), CellOutcome::SkippedFitFailure);
        assert!(matches!(
            r,
            CellCorrection::Skipped(SkipReason::FitFailure {
                reason: NoFitReason::TooFewDistinct { distinct: 1, .. }
            })
        ));
    }

    #[test]
    fn future_fit_failure_skips_both() {
        let r = correct_cell(
            &[1.0, 2.0, 3.0, 4.0, 5.0],
            &[f64::NAN; 5],
            &[5.0, 6.0, 7.0, 8.0, 9.0],
            &QmConfig::default(),
        );
        assert_eq!(
            r,
            CellCorrection::Skipped(SkipReason::FitFailure {
                reason: NoFitReason::Empty
            })
        );
    }

    #[test]
    fn outputs_align_with_inputs() {
        let hist = [1.0, 2.0, f64::NAN, 4.0, 5.0, 3.0];
        let fut = [2.0, 3.0, 4.0, 5.0, f64::NAN, 6.0];
        let obs = [5.0, 6.0, 7.0, 8.0, 9.0];
        let CellCorrection::Corrected { hist: ch, fut: cf } =
            correct_cell(&hist, &fut, &obs, &QmConfig::default())
        else {
            panic!("expected correction");
        };
        assert_eq!(ch.len(), hist.len());
        assert_eq!(cf.len(), fut.len());
        assert!(ch[2].is_nan());
        assert!(cf[4].is_nan());
        assert!(ch.iter().enumerate().all(|(i, v)| i == 2 || v.is_finite()));
    }

    #[test]
    fn degenerate_fit_never_collapses_the_cell() {
        let r = correct_cell(
            &[1.0, 2.0, 3.0],
            &[2.0, 3.0, 4.0],
            &[5.0, 6.0, 7.0],
            &QmConfig::default(),
        );
        assert_eq!(
            r,
            CellCorrection::Skipped(SkipReason::FitFailure {
                reason: NoFitReason::NotConverged
            })
        );
    }
}
