//! Hand-off of the corrected series to storage.

use qmbc_grid::GriddedSeries;

use crate::error::CorrectError;

/// Artifact name of the corrected historical series.
pub const HIST_CORRECTED: &str = "hist_corrected";

/// Artifact name of the corrected future series.
pub const FUT_CORRECTED: &str = "fut_corrected";

/// Stores named gridded series. The format and location are up to the
/// implementation.
pub trait ArtifactSink {
    /// Stores `series` under `name`.
    fn write_artifact(&mut self, name: &str, series: &GriddedSeries) -> Result<(), CorrectError>;
}

/// Keeps artifacts in memory, in write order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    artifacts: Vec<(String, GriddedSeries)>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Artifact stored under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&GriddedSeries> {
        self.artifacts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }

    /// Stored artifact names, in write order.
    pub fn names(&self) -> Vec<&str> {
        self.artifacts.iter().map(|(n, _)| n.as_str()).collect()
    }
}

impl ArtifactSink for MemorySink {
    fn write_artifact(&mut self, name: &str, series: &GriddedSeries) -> Result<(), CorrectError> {
        self.artifacts.retain(|(n, _)| n != name);
        self.artifacts.push((name.to_string(), series.clone()));
        Ok(())
    }
}
