//! Summary of a correction run.

use serde::Serialize;

use qmbc_grid::CellMap;
use qmbc_quantile_map::CellOutcome;

use crate::config::TimeOrder;

/// Per-season counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonReport {
    /// Season name.
    pub season: String,
    /// Calendar months of the season.
    pub months: Vec<u8>,
    /// Historical time steps in the season.
    pub hist_times: usize,
    /// Future time steps in the season.
    pub fut_times: usize,
    /// Observation time steps in the season.
    pub obs_times: usize,
    /// Cells corrected.
    pub corrected: usize,
    /// Cells skipped because the observation was entirely missing.
    pub skipped_no_observation: usize,
    /// Cells skipped because a fit failed.
    pub skipped_fit_failure: usize,
}

impl SeasonReport {
    pub(crate) fn from_outcomes(
        season: &qmbc_season::Season,
        times: (usize, usize, usize),
        outcomes: &CellMap<CellOutcome>,
    ) -> Self {
        let count = |o: CellOutcome| outcomes.values().iter().filter(|&&v| v == o).count();
        Self {
            season: season.name().to_string(),
            months: season.months().iter().map(|m| m.get()).collect(),
            hist_times: times.0,
            fut_times: times.1,
            obs_times: times.2,
            corrected: count(CellOutcome::Corrected),
            skipped_no_observation: count(CellOutcome::SkippedNoObservation),
            skipped_fit_failure: count(CellOutcome::SkippedFitFailure),
        }
    }

    /// Cells processed in this season.
    pub fn cells(&self) -> usize {
        self.corrected + self.skipped_no_observation + self.skipped_fit_failure
    }
}

/// Summary of a whole run, serialisable for the JSON report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrectionReport {
    /// Label of the season catalog used.
    pub catalog: String,
    /// Grid shape `(n_lat, n_lon)`.
    pub grid: (usize, usize),
    /// Output time ordering.
    pub time_order: TimeOrder,
    /// One entry per season, in catalog order.
    pub seasons: Vec<SeasonReport>,
}

impl CorrectionReport {
    /// Corrected (cell, season) pairs.
    pub fn total_corrected(&self) -> usize {
        self.seasons.iter().map(|s| s.corrected).sum()
    }

    /// Skipped (cell, season) pairs, for either reason.
    pub fn total_skipped(&self) -> usize {
        self.seasons
            .iter()
            .map(|s| s.skipped_no_observation + s.skipped_fit_failure)
            .sum()
    }

    /// Report for one season.
    pub fn season(&self, name: &str) -> Option<&SeasonReport> {
        self.seasons.iter().find(|s| s.season == name)
    }
}
