//! Row-level progress events.

use std::time::Duration;

use tracing::info;

/// Emitted once per latitude row after all its cells have been processed.
#[derive(Debug, Clone, PartialEq)]
pub struct RowProgress {
    /// Season being processed.
    pub season: String,
    /// Latitude row index.
    pub row: usize,
    /// Latitude of the row.
    pub lat: f64,
    /// Number of rows in the grid.
    pub n_rows: usize,
    /// Cells of this row that were attempted.
    pub cells_attempted: usize,
    /// Cells of this row that were corrected.
    pub cells_corrected: usize,
    /// Time since the season started.
    pub elapsed: Duration,
}

/// Receives [`RowProgress`] events.
///
/// Rows are natural checkpoints; an observer that wants to track overall
/// progress can count events against `n_rows` times the number of seasons.
pub trait ProgressObserver {
    /// Called after a row completes.
    fn on_row(&mut self, event: &RowProgress);
}

/// Logs every row as a `tracing` info event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ProgressObserver for TracingObserver {
    fn on_row(&mut self, event: &RowProgress) {
        info!(
            season = %event.season,
            row = event.row,
            lat = event.lat,
            n_rows = event.n_rows,
            attempted = event.cells_attempted,
            corrected = event.cells_corrected,
            elapsed_ms = event.elapsed.as_millis() as u64,
            "row complete"
        );
    }
}

/// Collects events in memory.
impl ProgressObserver for Vec<RowProgress> {
    fn on_row(&mut self, event: &RowProgress) {
        self.push(event.clone());
    }
}
