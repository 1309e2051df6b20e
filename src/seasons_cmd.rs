//! Seasons command: print the resolved season catalog.

use anyhow::{Result, bail};
use qmbc_season::{RegionSelector, RuleTable, SeasonRule};

use crate::cli::SeasonsArgs;

/// Resolve and print the catalog for the given region / latitude range.
pub fn run(args: SeasonsArgs) -> Result<()> {
    let mut selector = RegionSelector::new();
    if let Some(region) = &args.region {
        selector = selector.with_region(region.as_str());
    }
    if let Some(range) = &args.lat_range {
        let [lo, hi] = range.as_slice() else {
            bail!("--lat-range takes exactly two values, got {}", range.len());
        };
        selector = selector.with_lat_range(*lo, *hi);
    }

    let table = RuleTable::standard();
    let calendar = table.resolve(&selector);
    let rule = match table.matching_rule(&selector) {
        Some(SeasonRule::Region { label, .. }) => format!("region {label}"),
        Some(SeasonRule::LatitudeBand { min, max, .. }) => {
            format!("latitude band [{min}, {max}]")
        }
        None => "fallback".to_string(),
    };
    let catalog = calendar.catalog();

    println!("catalog: {} (matched {rule})", catalog.label());
    for season in catalog.iter() {
        let months: Vec<String> = season.months().iter().map(|m| m.to_string()).collect();
        println!("  {:<14} {}", season.name(), months.join(", "));
    }
    Ok(())
}
