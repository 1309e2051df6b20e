//! Seasonal stratification of a gridded series.

use qmbc_season::SeasonCatalog;
use tracing::debug;

use crate::series::GriddedSeries;

/// The part of a series that falls in one season.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonSlice {
    season: String,
    time_indices: Vec<usize>,
    series: GriddedSeries,
}

impl SeasonSlice {
    /// Season name.
    pub fn season(&self) -> &str {
        &self.season
    }

    /// Positions of this slice's time steps in the source series, ascending.
    pub fn time_indices(&self) -> &[usize] {
        &self.time_indices
    }

    /// The restricted series.
    pub fn series(&self) -> &GriddedSeries {
        &self.series
    }

    /// Number of time steps in this season.
    pub fn n_times(&self) -> usize {
        self.time_indices.len()
    }
}

/// One [`SeasonSlice`] per catalog season, in catalog order.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalSplit {
    slices: Vec<SeasonSlice>,
}

impl SeasonalSplit {
    /// Slices in catalog order.
    pub fn slices(&self) -> &[SeasonSlice] {
        &self.slices
    }

    /// Slice for `season`, if the catalog has it.
    pub fn get(&self, season: &str) -> Option<&SeasonSlice> {
        self.slices.iter().find(|s| s.season == season)
    }

    /// Iterator over slices in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, SeasonSlice> {
        self.slices.iter()
    }

    /// Number of seasons.
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// Returns `true` if there are no slices.
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Sum of time steps over all slices; equals the source length.
    pub fn total_times(&self) -> usize {
        self.slices.iter().map(SeasonSlice::n_times).sum()
    }
}

/// Splits `series` into one sub-series per season of `catalog`.
///
/// This is a filter: each sub-series keeps the source's chronological order,
/// and because the catalog partitions the months every time step lands in
/// exactly one slice. Seasons with no time steps yield empty slices.
pub fn stratify(series: &GriddedSeries, catalog: &SeasonCatalog) -> SeasonalSplit {
    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); catalog.len()];
    for t in 0..series.n_times() {
        buckets[catalog.season_index_of(series.month_at(t))].push(t);
    }

    let slices: Vec<SeasonSlice> = catalog
        .iter()
        .zip(buckets)
        .map(|(season, time_indices)| {
            debug!(season = season.name(), n_times = time_indices.len(), "stratified season");
            SeasonSlice {
                season: season.name().to_string(),
                series: series.select_times(&time_indices),
                time_indices,
            }
        })
        .collect();

    SeasonalSplit { slices }
}
