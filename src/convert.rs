//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;

use crate::config::*;

use qmbc_correct::{CorrectionConfig, TimeOrder};
use qmbc_io::{ReaderConfig, WriterConfig};
use qmbc_quantile_map::QmConfig;
use qmbc_season::RegionSelector;

/// Parses an inclusive `["YYYY-MM-DD", "YYYY-MM-DD"]` period.
pub fn parse_period(period: &[String; 2]) -> Result<(NaiveDate, NaiveDate)> {
    let parse = |s: &str| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date {s:?}"))
    };
    let start = parse(&period[0])?;
    let end = parse(&period[1])?;
    if start > end {
        bail!("period start {start} is after end {end}");
    }
    Ok((start, end))
}

/// Expands `[start, stop, step]` into coordinates, stop exclusive.
pub fn axis_from_range(range: &[f64; 3]) -> Result<Vec<f64>> {
    let [start, stop, step] = *range;
    if !(start.is_finite() && stop.is_finite() && step.is_finite()) || step <= 0.0 {
        bail!("grid axis needs finite start/stop and a positive step, got {range:?}");
    }
    let n = ((stop - start) / step).ceil();
    if n < 1.0 {
        bail!("grid axis {range:?} is empty");
    }
    Ok((0..n as usize).map(|k| start + k as f64 * step).collect())
}

/// Builds a [`ReaderConfig`] for `variable` from the TOML input section.
pub fn build_reader_config(input: &InputToml, variable: &str) -> ReaderConfig {
    ReaderConfig::default()
        .with_variable(variable)
        .with_time_var(input.time_var.as_str())
}

/// Builds a [`QmConfig`] from the TOML fit section.
pub fn build_qm_config(fit: &FitToml) -> Result<QmConfig> {
    let cfg = QmConfig::new()
        .with_cdf_ceiling(fit.cdf_ceiling)
        .with_min_unique(fit.min_unique)
        .with_max_iters(fit.max_iters)
        .with_sd_tolerance(fit.sd_tolerance);
    cfg.validate().context("invalid [fit] section")?;
    Ok(cfg)
}

/// Builds a [`RegionSelector`], with `region_override` taking precedence
/// over the TOML region.
pub fn build_selector(seasons: &SeasonsToml, region_override: Option<&str>) -> RegionSelector {
    let mut selector = RegionSelector::new();
    if let Some(region) = region_override.or(seasons.region.as_deref()) {
        selector = selector.with_region(region);
    }
    if let Some([lo, hi]) = seasons.lat_range {
        selector = selector.with_lat_range(lo, hi);
    }
    selector
}

/// Builds the full [`CorrectionConfig`].
pub fn build_correction_config(
    config: &QmbcConfig,
    region_override: Option<&str>,
) -> Result<CorrectionConfig> {
    let time_order = if config.output.chronological {
        TimeOrder::Chronological
    } else {
        TimeOrder::SeasonBlocks
    };
    let cfg = CorrectionConfig::new()
        .with_selector(build_selector(&config.seasons, region_override))
        .with_qm(build_qm_config(&config.fit)?)
        .with_time_order(time_order);
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`WriterConfig`] from the TOML output section.
pub fn build_writer_config(output: &OutputToml, input: &InputToml) -> WriterConfig {
    let variable = output.variable.as_deref().unwrap_or(&input.variable);
    WriterConfig::default()
        .with_variable(variable)
        .with_units(output.units.as_deref())
}
