//! Season-by-season, cell-by-cell correction of a whole grid.

use std::time::Instant;

use qmbc_grid::{CellMap, GriddedSeries, SeasonalSplit, stratify};
use qmbc_quantile_map::{CellCorrection, CellOutcome, QmConfig, correct_cell};
use qmbc_season::{Season, resolve_catalog};
use tracing::{debug, debug_span, info, info_span};

use crate::config::{CorrectionConfig, TimeOrder};
use crate::error::CorrectError;
use crate::progress::{ProgressObserver, RowProgress, TracingObserver};
use crate::report::{CorrectionReport, SeasonReport};
use crate::sink::{ArtifactSink, FUT_CORRECTED, HIST_CORRECTED};

/// The corrected historical and future series with a run summary.
#[derive(Debug, Clone)]
pub struct BiasCorrection {
    hist: GriddedSeries,
    fut: GriddedSeries,
    outcomes: Vec<CellMap<CellOutcome>>,
    report: CorrectionReport,
}

impl BiasCorrection {
    /// Corrected historical series.
    pub fn hist(&self) -> &GriddedSeries {
        &self.hist
    }

    /// Corrected future series.
    pub fn fut(&self) -> &GriddedSeries {
        &self.fut
    }

    /// Per-cell outcomes of each season, in catalog order.
    pub fn outcomes(&self) -> &[CellMap<CellOutcome>] {
        &self.outcomes
    }

    /// Run summary.
    pub fn report(&self) -> &CorrectionReport {
        &self.report
    }

    /// Consumes the result, returning `(hist, fut, report)`.
    pub fn into_parts(self) -> (GriddedSeries, GriddedSeries, CorrectionReport) {
        (self.hist, self.fut, self.report)
    }

    /// Writes both series to `sink` as `hist_corrected` and `fut_corrected`.
    ///
    /// # Errors
    ///
    /// Propagates the first sink failure.
    pub fn persist(&self, sink: &mut dyn ArtifactSink) -> Result<(), CorrectError> {
        sink.write_artifact(HIST_CORRECTED, &self.hist)?;
        sink.write_artifact(FUT_CORRECTED, &self.fut)?;
        info!(artifacts = 2, "corrected series persisted");
        Ok(())
    }
}

/// Bias-corrects `hist` and `fut` against `obs`, logging row progress.
///
/// See [`correct_with_observer`].
pub fn correct(
    hist: &GriddedSeries,
    fut: &GriddedSeries,
    obs: &GriddedSeries,
    config: &CorrectionConfig,
) -> Result<BiasCorrection, CorrectError> {
    correct_with_observer(hist, fut, obs, config, &mut TracingObserver)
}

/// Bias-corrects `hist` and `fut` against `obs`.
///
/// The season catalog is resolved from the configured selector, all three
/// inputs are stratified by season, and every cell of every season is
/// corrected with [`correct_cell`]. Skipped cells stay `NaN` in both
/// outputs. The per-season results are joined along time in catalog order
/// (or sorted, for [`TimeOrder::Chronological`]).
///
/// The inputs must share latitude/longitude axes; only their shapes are
/// compared here.
///
/// # Errors
///
/// Returns [`CorrectError::ShapeMismatch`] when the spatial shapes differ
/// and propagates configuration errors.
pub fn correct_with_observer(
    hist: &GriddedSeries,
    fut: &GriddedSeries,
    obs: &GriddedSeries,
    config: &CorrectionConfig,
    observer: &mut dyn ProgressObserver,
) -> Result<BiasCorrection, CorrectError> {
    config.validate()?;
    let expected = hist.spatial_shape();
    for (dataset, series) in [("future", fut), ("observation", obs)] {
        if series.spatial_shape() != expected {
            return Err(CorrectError::ShapeMismatch {
                dataset: dataset.to_string(),
                expected,
                got: series.spatial_shape(),
            });
        }
    }

    let catalog = resolve_catalog(config.selector());
    let _run = info_span!("correct", catalog = catalog.label()).entered();
    info!(
        n_lat = expected.0,
        n_lon = expected.1,
        hist_times = hist.n_times(),
        fut_times = fut.n_times(),
        obs_times = obs.n_times(),
        seasons = catalog.len(),
        "starting bias correction"
    );

    let splits = [
        stratify(hist, &catalog),
        stratify(fut, &catalog),
        stratify(obs, &catalog),
    ];

    let mut hist_parts = Vec::with_capacity(catalog.len());
    let mut fut_parts = Vec::with_capacity(catalog.len());
    let mut outcomes = Vec::with_capacity(catalog.len());
    let mut seasons = Vec::with_capacity(catalog.len());

    for (idx, season) in catalog.iter().enumerate() {
        let _season = debug_span!("season", name = season.name()).entered();
        let run = correct_season(season, idx, &splits, config.qm(), observer)?;
        seasons.push(run.report);
        hist_parts.push(run.hist);
        fut_parts.push(run.fut);
        outcomes.push(run.outcomes);
    }

    let mut hist_out = GriddedSeries::concat_time(&hist_parts)?;
    let mut fut_out = GriddedSeries::concat_time(&fut_parts)?;
    if config.time_order() == TimeOrder::Chronological {
        hist_out = hist_out.sorted_by_time();
        fut_out = fut_out.sorted_by_time();
    }

    let report = CorrectionReport {
        catalog: catalog.label().to_string(),
        grid: expected,
        time_order: config.time_order(),
        seasons,
    };
    info!(
        corrected = report.total_corrected(),
        skipped = report.total_skipped(),
        "bias correction complete"
    );

    Ok(BiasCorrection {
        hist: hist_out,
        fut: fut_out,
        outcomes,
        report,
    })
}

struct SeasonRun {
    hist: GriddedSeries,
    fut: GriddedSeries,
    outcomes: CellMap<CellOutcome>,
    report: SeasonReport,
}

/// Corrects every cell of season `idx`; `splits` is `[hist, fut, obs]`.
fn correct_season(
    season: &Season,
    idx: usize,
    splits: &[SeasonalSplit; 3],
    qm: &QmConfig,
    observer: &mut dyn ProgressObserver,
) -> Result<SeasonRun, CorrectError> {
    let [hist, fut, obs] = splits.each_ref().map(|s| s.slices()[idx].series());
    info!(
        season = season.name(),
        hist_times = hist.n_times(),
        fut_times = fut.n_times(),
        obs_times = obs.n_times(),
        "processing season"
    );

    let started = Instant::now();
    let cells = hist.cells();
    let mut hist_out = hist.full_like(f64::NAN);
    let mut fut_out = fut.full_like(f64::NAN);
    let mut outcomes = CellMap::filled(cells, CellOutcome::SkippedNoObservation);

    for row in 0..cells.n_rows() {
        let mut corrected = 0usize;
        for cell in cells.row(row) {
            let result = correct_cell(
                &hist.cell_series(cell)?,
                &fut.cell_series(cell)?,
                &obs.cell_series(cell)?,
                qm,
            );
            outcomes.set(cell, result.outcome())?;
            if let CellCorrection::Corrected { hist: h, fut: f } = result {
                hist_out.set_cell_series(cell, &h)?;
                fut_out.set_cell_series(cell, &f)?;
                corrected += 1;
            }
        }
        observer.on_row(&RowProgress {
            season: season.name().to_string(),
            row,
            lat: hist.lats()[row],
            n_rows: cells.n_rows(),
            cells_attempted: cells.n_cols(),
            cells_corrected: corrected,
            elapsed: started.elapsed(),
        });
    }

    let report = SeasonReport::from_outcomes(
        season,
        (hist.n_times(), fut.n_times(), obs.n_times()),
        &outcomes,
    );
    debug!(
        corrected = report.corrected,
        no_observation = report.skipped_no_observation,
        fit_failure = report.skipped_fit_failure,
        "season complete"
    );

    Ok(SeasonRun {
        hist: hist_out,
        fut: fut_out,
        outcomes,
        report,
    })
}
