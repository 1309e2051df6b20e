//! Whole-grid correction behaviour.

use approx::assert_relative_eq;
use chrono::{Datelike, Days, NaiveDate};
use qmbc_correct::{
    CorrectError, CorrectionConfig, MemorySink, RowProgress, TimeOrder, correct,
    correct_with_observer,
};
use qmbc_grid::{CellIndex, GriddedSeries};
use qmbc_quantile_map::CellOutcome;
use qmbc_season::RegionSelector;
use rand::SeedableRng;
use rand_distr::{Distribution, Gamma};

const LATS: [f64; 2] = [20.0, 21.0];
const LONS: [f64; 3] = [78.0, 79.0, 80.0];

fn daily(start_year: i32, n_years: i32) -> Vec<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(start_year, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(start_year + n_years, 1, 1).unwrap();
    let n = (end - start).num_days() as u64;
    (0..n)
        .map(|d| start + Days::new(d))
        .filter(|d| !(d.month() == 2 && d.day() == 29))
        .collect()
}

/// Historical grid of Gamma samples on a 1/8 lattice so that shifted copies
/// are exact in floating point.
fn hist_values(n_times: usize, seed: u64) -> Vec<f64> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let dist = Gamma::<f64>::new(4.0, 2.0).unwrap();
    (0..n_times * LATS.len() * LONS.len())
        .map(|_| 280.0 + (dist.sample(&mut rng) * 8.0).round() / 8.0)
        .collect()
}

struct Inputs {
    hist: GriddedSeries,
    fut: GriddedSeries,
    obs: GriddedSeries,
}

fn inputs() -> Inputs {
    let hist_times = daily(2001, 3);
    let n = hist_times.len();
    let h = hist_values(n, 42);
    let f: Vec<f64> = h.iter().map(|x| x + 1.0).collect();
    let o: Vec<f64> = h.iter().map(|x| x + 4.0).collect();
    let grid = |times, data| GriddedSeries::from_flat(times, LATS.to_vec(), LONS.to_vec(), data).unwrap();
    Inputs {
        hist: grid(hist_times.clone(), h),
        fut: grid(daily(2041, 3), f),
        obs: grid(hist_times, o),
    }
}

fn india() -> CorrectionConfig {
    CorrectionConfig::new().with_selector(RegionSelector::new().with_region("India"))
}

#[test]
fn outputs_keep_shape_and_length() {
    let inp = inputs();
    let result = correct(&inp.hist, &inp.fut, &inp.obs, &india()).unwrap();
    assert_eq!(result.hist().n_times(), inp.hist.n_times());
    assert_eq!(result.fut().n_times(), inp.fut.n_times());
    assert_eq!(result.hist().spatial_shape(), (2, 3));
    assert_eq!(result.hist().lats(), inp.hist.lats());
    assert_eq!(result.report().total_corrected(), 6 * 4);
    assert_eq!(result.report().total_skipped(), 0);
}

#[test]
fn season_blocks_follow_catalog_order() {
    let inp = inputs();
    let result = correct(&inp.hist, &inp.fut, &inp.obs, &india()).unwrap();
    let report = result.report();
    assert_eq!(report.catalog, "India");

    let times = result.hist().times();
    let mut offset = 0;
    for season in &report.seasons {
        let block = &times[offset..offset + season.hist_times];
        assert!(block.iter().all(|d| season.months.contains(&(d.month() as u8))));
        assert!(block.windows(2).all(|w| w[0] < w[1]), "block not chronological");
        offset += season.hist_times;
    }
    assert_eq!(offset, times.len());
    // Pre-Monsoon (March) comes before Winter (January).
    assert_eq!(times[0].month(), 3);
}

#[test]
fn chronological_order_restores_input_times() {
    let inp = inputs();
    let config = india().with_time_order(TimeOrder::Chronological);
    let result = correct(&inp.hist, &inp.fut, &inp.obs, &config).unwrap();
    assert_eq!(result.hist().times(), inp.hist.times());
    assert_eq!(result.fut().times(), inp.fut.times());
}

#[test]
fn bias_removed_and_trend_kept() {
    let inp = inputs();
    let result = correct(&inp.hist, &inp.fut, &inp.obs, &india()).unwrap();
    let config = india().with_time_order(TimeOrder::Chronological);
    let sorted = correct(&inp.hist, &inp.fut, &inp.obs, &config).unwrap();

    for cell in result.hist().cells().iter() {
        let raw = inp.hist.cell_series(cell).unwrap();
        let ch = sorted.hist().cell_series(cell).unwrap();
        let cf = sorted.fut().cell_series(cell).unwrap();
        let mean = |v: &[f64]| v.iter().sum::<f64>() / v.len() as f64;
        assert_relative_eq!(mean(&ch) - mean(&raw), 4.0, epsilon = 1e-2);

        let mut diffs: Vec<f64> = cf.iter().zip(&ch).map(|(f, h)| f - h).collect();
        diffs.sort_by(f64::total_cmp);
        assert_relative_eq!(diffs[diffs.len() / 2], 1.0, epsilon = 1e-6);
        assert!(diffs[0] > 1.0 - 1e-6);
    }
}

#[test]
fn missing_observation_cell_is_nan_in_both() {
    let mut inp = inputs();
    let dead = CellIndex::new(1, 2);
    let nan = vec![f64::NAN; inp.obs.n_times()];
    inp.obs.set_cell_series(dead, &nan).unwrap();

    let result = correct(&inp.hist, &inp.fut, &inp.obs, &india()).unwrap();
    assert!(result.hist().cell_series(dead).unwrap().iter().all(|v| v.is_nan()));
    assert!(result.fut().cell_series(dead).unwrap().iter().all(|v| v.is_nan()));
    let live = result.hist().cell_series(CellIndex::new(0, 0)).unwrap();
    assert!(live.iter().all(|v| v.is_finite()));

    for season in &result.report().seasons {
        assert_eq!(season.skipped_no_observation, 1);
        assert_eq!(season.corrected, 5);
        assert_eq!(season.cells(), 6);
    }
    for outcomes in result.outcomes() {
        assert_eq!(outcomes.get(dead), Some(&CellOutcome::SkippedNoObservation));
    }
}

#[test]
fn observation_missing_in_one_season_only() {
    let mut inp = inputs();
    let cell = CellIndex::new(0, 1);
    let mut series = inp.obs.cell_series(cell).unwrap();
    for (t, d) in inp.obs.times().iter().enumerate() {
        if (6..=9).contains(&d.month()) {
            series[t] = f64::NAN;
        }
    }
    inp.obs.set_cell_series(cell, &series).unwrap();

    let result = correct(&inp.hist, &inp.fut, &inp.obs, &india()).unwrap();
    let monsoon = result.report().season("Monsoon").unwrap();
    assert_eq!(monsoon.skipped_no_observation, 1);
    assert_eq!(result.report().season("Winter").unwrap().skipped_no_observation, 0);

    let out = result.hist().cell_series(cell).unwrap();
    for (t, d) in result.hist().times().iter().enumerate() {
        assert_eq!((6..=9).contains(&d.month()), out[t].is_nan(), "at {d}");
    }
}

#[test]
fn fit_failure_skips_both_outputs() {
    let mut inp = inputs();
    let cell = CellIndex::new(0, 0);
    let constant = vec![285.0; inp.fut.n_times()];
    inp.fut.set_cell_series(cell, &constant).unwrap();

    let result = correct(&inp.hist, &inp.fut, &inp.obs, &india()).unwrap();
    assert!(result.hist().cell_series(cell).unwrap().iter().all(|v| v.is_nan()));
    assert!(result.fut().cell_series(cell).unwrap().iter().all(|v| v.is_nan()));
    for season in &result.report().seasons {
        assert_eq!(season.skipped_fit_failure, 1);
    }
}

#[test]
fn zero_heavy_cell_is_skipped_cleanly() {
    let times = daily(2001, 1);
    let cycle = [0.0, 1.0, 0.0, 3.0, 7.0, 0.5, 2.0];
    let values: Vec<f64> = (0..times.len()).map(|i| cycle[i % cycle.len()]).collect();
    let series = GriddedSeries::from_flat(times, vec![20.0], vec![78.0], values).unwrap();

    let result = correct(&series, &series, &series, &CorrectionConfig::default()).unwrap();
    let report = result.report();
    assert_eq!(report.total_corrected() + report.total_skipped(), report.seasons.len());
    assert_eq!(
        report.seasons.iter().map(|s| s.skipped_fit_failure).sum::<usize>(),
        report.total_skipped()
    );
    let out = result.hist().cell_series(CellIndex::new(0, 0)).unwrap();
    assert!(out.iter().all(|v| v.is_nan() || v.is_finite()));
    if report.total_corrected() == 0 {
        assert!(out.iter().all(|v| v.is_nan()));
    }
}

#[test]
fn one_progress_event_per_row_and_season() {
    let inp = inputs();
    let mut events: Vec<RowProgress> = Vec::new();
    correct_with_observer(&inp.hist, &inp.fut, &inp.obs, &india(), &mut events).unwrap();

    assert_eq!(events.len(), 4 * LATS.len());
    assert_eq!(events[0].season, "Pre-Monsoon");
    assert_eq!(events[0].row, 0);
    assert_eq!(events[1].row, 1);
    assert_relative_eq!(events[1].lat, 21.0);
    assert!(events.iter().all(|e| e.n_rows == 2 && e.cells_attempted == 3));
    assert!(events.iter().all(|e| e.cells_corrected == 3));
    assert_eq!(events.last().unwrap().season, "Winter");
}

#[test]
fn mismatched_shape_is_rejected() {
    let inp = inputs();
    let times = inp.obs.times().to_vec();
    let n = times.len();
    let narrow = GriddedSeries::from_flat(times, vec![20.0], vec![78.0], vec![1.0; n]).unwrap();
    let err = correct(&inp.hist, &inp.fut, &narrow, &india()).unwrap_err();
    assert!(matches!(
        err,
        CorrectError::ShapeMismatch { ref dataset, expected: (2, 3), got: (1, 1) } if dataset == "observation"
    ));
}

#[test]
fn persist_writes_named_artifacts() {
    let inp = inputs();
    let result = correct(&inp.hist, &inp.fut, &inp.obs, &india()).unwrap();
    let mut sink = MemorySink::new();
    result.persist(&mut sink).unwrap();
    assert_eq!(sink.names(), ["hist_corrected", "fut_corrected"]);
    assert_eq!(sink.get("hist_corrected"), Some(result.hist()));
    assert_eq!(sink.get("fut_corrected"), Some(result.fut()));
}

#[test]
fn report_serialises_to_json() {
    let inp = inputs();
    let result = correct(&inp.hist, &inp.fut, &inp.obs, &CorrectionConfig::default()).unwrap();
    let json = serde_json::to_value(result.report()).unwrap();
    assert_eq!(json["catalog"], "Global");
    assert_eq!(json["time_order"], "season_blocks");
    assert_eq!(json["seasons"][2]["season"], "JJAS");
    assert_eq!(json["seasons"][0]["months"], serde_json::json!([12, 1, 2]));
}
