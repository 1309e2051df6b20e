//! Stratification completeness over daily series and every built-in calendar.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};
use qmbc_grid::{GriddedSeries, stratify};
use qmbc_season::{RegionCalendar, RegionSelector, resolve_catalog};

/// Daily 2x3 grid over `n_days` starting 1 Dec 1999, value = day index.
fn daily(n_days: u64) -> GriddedSeries {
    let start = NaiveDate::from_ymd_opt(1999, 12, 1).unwrap();
    let times: Vec<NaiveDate> = (0..n_days).map(|d| start + Days::new(d)).collect();
    let data: Vec<f64> = (0..n_days)
        .flat_map(|d| std::iter::repeat_n(d as f64, 6))
        .collect();
    GriddedSeries::from_flat(times, vec![20.0, 21.0], vec![78.0, 79.0, 80.0], data).unwrap()
}

#[test]
fn every_timestamp_in_exactly_one_season() {
    let series = daily(800);
    for cal in [
        RegionCalendar::India,
        RegionCalendar::Australia,
        RegionCalendar::Us,
        RegionCalendar::Global,
    ] {
        let split = stratify(&series, &cal.catalog());
        assert_eq!(split.total_times(), series.n_times(), "{cal}");

        let mut seen = BTreeSet::new();
        for slice in split.iter() {
            for &t in slice.time_indices() {
                assert!(seen.insert(t), "{cal}: time {t} in two seasons");
            }
        }
        assert_eq!(seen.len(), series.n_times());
    }
}

#[test]
fn slices_are_chronological_and_match_months() {
    let series = daily(400);
    let catalog = resolve_catalog(&RegionSelector::new().with_region("India"));
    let split = stratify(&series, &catalog);

    for (slice, season) in split.iter().zip(catalog.iter()) {
        assert_eq!(slice.season(), season.name());
        assert!(slice.time_indices().windows(2).all(|w| w[0] < w[1]));
        assert!(slice.series().times().windows(2).all(|w| w[0] < w[1]));
        for t in 0..slice.n_times() {
            assert!(season.contains(slice.series().month_at(t)));
        }
    }
}

#[test]
fn spatial_axes_untouched() {
    let series = daily(120);
    let split = stratify(&series, &RegionCalendar::Global.catalog());
    for slice in split.iter() {
        assert_eq!(slice.series().lats(), series.lats());
        assert_eq!(slice.series().lons(), series.lons());
    }
}

#[test]
fn concat_of_slices_is_a_permutation() {
    let series = daily(500);
    let split = stratify(&series, &RegionCalendar::Us.catalog());
    let parts: Vec<GriddedSeries> = split.iter().map(|s| s.series().clone()).collect();
    let joined = GriddedSeries::concat_time(&parts).unwrap();
    assert_eq!(joined.n_times(), series.n_times());
    assert_eq!(joined.sorted_by_time(), series);
}
