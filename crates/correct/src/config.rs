//! Configuration for a correction run.

use qmbc_quantile_map::QmConfig;
use qmbc_season::RegionSelector;
use serde::{Deserialize, Serialize};

use crate::error::CorrectError;

/// Time ordering of the corrected outputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOrder {
    /// One block per season in catalog order, each block chronological.
    #[default]
    SeasonBlocks,
    /// Globally chronological (stable sort of the season blocks).
    Chronological,
}

/// Configuration for [`crate::correct`].
///
/// # Example
///
/// ```
/// use qmbc_correct::{CorrectionConfig, TimeOrder};
/// use qmbc_season::RegionSelector;
///
/// let config = CorrectionConfig::new()
///     .with_selector(RegionSelector::new().with_region("India"))
///     .with_time_order(TimeOrder::Chronological);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CorrectionConfig {
    selector: RegionSelector,
    qm: QmConfig,
    time_order: TimeOrder,
}

impl CorrectionConfig {
    /// Global calendar, default fitting, season-block output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the region/latitude selector used to pick the season catalog.
    pub fn with_selector(mut self, selector: RegionSelector) -> Self {
        self.selector = selector;
        self
    }

    /// Sets the fitting and mapping configuration.
    pub fn with_qm(mut self, qm: QmConfig) -> Self {
        self.qm = qm;
        self
    }

    /// Sets the output time ordering.
    pub fn with_time_order(mut self, order: TimeOrder) -> Self {
        self.time_order = order;
        self
    }

    pub fn selector(&self) -> &RegionSelector {
        &self.selector
    }

    pub fn qm(&self) -> &QmConfig {
        &self.qm
    }

    pub fn time_order(&self) -> TimeOrder {
        self.time_order
    }

    /// Validates the fitting configuration and the region name.
    pub fn validate(&self) -> Result<(), CorrectError> {
        self.qm.validate()?;
        if let Some(region) = self.selector.region()
            && region.trim().is_empty()
        {
            return Err(CorrectError::InvalidConfig {
                reason: "region name must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
