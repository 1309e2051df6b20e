//! Region calendars and the ordered rule table that selects one.
//!
//! Rules are evaluated top-down and the first match wins: region-name rules
//! come before latitude-band rules, and the global calendar is the fallback.
//! Resolution never fails.

use crate::catalog::{Season, SeasonCatalog};

/// The fixed calendars a selector can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionCalendar {
    /// Pre-Monsoon / Monsoon / Post-Monsoon / Winter.
    India,
    /// Austral Summer / Autumn / Winter / Spring.
    Australia,
    /// Boreal Winter / Spring / Summer / Fall.
    Us,
    /// DJF / MAM / JJAS / ON.
    Global,
}

impl RegionCalendar {
    /// Label used for region-name matching and in logs.
    pub fn label(self) -> &'static str {
        match self {
            Self::India => "India",
            Self::Australia => "Australia",
            Self::Us => "US",
            Self::Global => "Global",
        }
    }

    fn seasons(self) -> &'static [(&'static str, &'static [u8])] {
        match self {
            Self::India => &[
                ("Pre-Monsoon", &[3, 4, 5]),
                ("Monsoon", &[6, 7, 8, 9]),
                ("Post-Monsoon", &[10, 11]),
                ("Winter", &[12, 1, 2]),
            ],
            Self::Australia => &[
                ("Summer", &[12, 1, 2]),
                ("Autumn", &[3, 4, 5]),
                ("Winter", &[6, 7, 8]),
                ("Spring", &[9, 10, 11]),
            ],
            Self::Us => &[
                ("Winter", &[12, 1, 2]),
                ("Spring", &[3, 4, 5]),
                ("Summer", &[6, 7, 8]),
                ("Fall", &[9, 10, 11]),
            ],
            Self::Global => &[
                ("DJF", &[12, 1, 2]),
                ("MAM", &[3, 4, 5]),
                ("JJAS", &[6, 7, 8, 9]),
                ("ON", &[10, 11]),
            ],
        }
    }

    /// Builds the season catalog for this calendar.
    pub fn catalog(self) -> SeasonCatalog {
        let seasons = self
            .seasons()
            .iter()
            .map(|&(name, months)| Season::new(name, months))
            .collect::<Result<Vec<_>, _>>()
            .expect("built-in calendars use months in 1..=12");
        SeasonCatalog::new(self.label(), seasons)
            .expect("built-in calendars partition the twelve months")
    }
}

impl std::fmt::Display for RegionCalendar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A latitude range in degrees north; only its midpoint is used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatRange {
    start: f64,
    end: f64,
}

impl LatRange {
    /// Creates a range from its two endpoints (either order).
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Arithmetic mean of the two endpoints.
    pub fn mean(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    /// First endpoint.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Second endpoint.
    pub fn end(&self) -> f64 {
        self.end
    }
}

/// What the caller knows about the area being corrected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionSelector {
    region: Option<String>,
    lat_range: Option<LatRange>,
}

impl RegionSelector {
    /// An empty selector; resolves to the global calendar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the region name.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Sets the latitude range.
    pub fn with_lat_range(mut self, start: f64, end: f64) -> Self {
        self.lat_range = Some(LatRange::new(start, end));
        self
    }

    /// Region name, if any.
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Latitude range, if any.
    pub fn lat_range(&self) -> Option<LatRange> {
        self.lat_range
    }
}

/// One row of the rule table.
#[derive(Debug, Clone, PartialEq)]
pub enum SeasonRule {
    /// Matches when the selector's region name equals `label` exactly.
    Region {
        /// Region name to match.
        label: &'static str,
        /// Calendar selected on match.
        calendar: RegionCalendar,
    },
    /// Matches when the latitude-range mean lies in `[min, max]`.
    LatitudeBand {
        /// Southern bound, inclusive.
        min: f64,
        /// Northern bound, inclusive.
        max: f64,
        /// Calendar selected on match.
        calendar: RegionCalendar,
    },
}

impl SeasonRule {
    /// Returns `true` if this rule accepts `selector`.
    pub fn matches(&self, selector: &RegionSelector) -> bool {
        match self {
            Self::Region { label, .. } => selector.region() == Some(*label),
            Self::LatitudeBand { min, max, .. } => selector
                .lat_range()
                .map(|r| r.mean())
                .is_some_and(|lat| lat >= *min && lat <= *max),
        }
    }

    /// Calendar selected by this rule.
    pub fn calendar(&self) -> RegionCalendar {
        match self {
            Self::Region { calendar, .. } | Self::LatitudeBand { calendar, .. } => *calendar,
        }
    }
}

/// Ordered list of [`SeasonRule`]s with a fallback calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTable {
    rules: Vec<SeasonRule>,
    fallback: RegionCalendar,
}

impl RuleTable {
    /// Region names first, then latitude bands, then the global fallback.
    ///
    /// The tropical band `[8, 35]` is listed before the mid-latitude band
    /// `[25, 50]`, so a mean latitude in `[25, 35]` selects the India calendar.
    pub fn standard() -> Self {
        Self {
            rules: vec![
                SeasonRule::Region {
                    label: "India",
                    calendar: RegionCalendar::India,
                },
                SeasonRule::Region {
                    label: "Australia",
                    calendar: RegionCalendar::Australia,
                },
                SeasonRule::Region {
                    label: "US",
                    calendar: RegionCalendar::Us,
                },
                SeasonRule::LatitudeBand {
                    min: 8.0,
                    max: 35.0,
                    calendar: RegionCalendar::India,
                },
                SeasonRule::LatitudeBand {
                    min: -40.0,
                    max: -10.0,
                    calendar: RegionCalendar::Australia,
                },
                SeasonRule::LatitudeBand {
                    min: 25.0,
                    max: 50.0,
                    calendar: RegionCalendar::Us,
                },
            ],
            fallback: RegionCalendar::Global,
        }
    }

    /// The rules, in evaluation order.
    pub fn rules(&self) -> &[SeasonRule] {
        &self.rules
    }

    /// Calendar used when no rule matches.
    pub fn fallback(&self) -> RegionCalendar {
        self.fallback
    }

    /// First rule that matches `selector`, if any.
    pub fn matching_rule(&self, selector: &RegionSelector) -> Option<&SeasonRule> {
        self.rules.iter().find(|r| r.matches(selector))
    }

    /// Calendar for `selector`: the first matching rule's, else the fallback.
    pub fn resolve(&self, selector: &RegionSelector) -> RegionCalendar {
        self.matching_rule(selector)
            .map_or(self.fallback, SeasonRule::calendar)
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Resolves `selector` against [`RuleTable::standard`] and builds the catalog.
pub fn resolve_catalog(selector: &RegionSelector) -> SeasonCatalog {
    RuleTable::standard().resolve(selector).catalog()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_name_wins_over_latitude() {
        let sel = RegionSelector::new()
            .with_region("Australia")
            .with_lat_range(10.0, 20.0);
        assert_eq!(RuleTable::standard().resolve(&sel), RegionCalendar::Australia);
    }

    #[test]
    fn us_region_label() {
        let sel = RegionSelector::new().with_region("US");
        assert_eq!(resolve_catalog(&sel).label(), "US");
    }

    #[test]
    fn region_match_is_exact() {
        let sel = RegionSelector::new().with_region("india");
        assert_eq!(RuleTable::standard().resolve(&sel), RegionCalendar::Global);
    }

    #[test]
    fn unknown_region_falls_through_to_latitude() {
        let sel = RegionSelector::new()
            .with_region("Atlantis")
            .with_lat_range(-35.0, -25.0);
        assert_eq!(RuleTable::standard().resolve(&sel), RegionCalendar::Australia);
    }

    #[test]
    fn tropical_band_wins_overlap() {
        // mean 30 lies in both [8, 35] and [25, 50]
        let sel = RegionSelector::new().with_lat_range(25.0, 35.0);
        assert_eq!(RuleTable::standard().resolve(&sel), RegionCalendar::India);
    }

    #[test]
    fn midlatitude_band() {
        let sel = RegionSelector::new().with_lat_range(40.0, 50.0);
        assert_eq!(RuleTable::standard().resolve(&sel), RegionCalendar::Us);
    }

    #[test]
    fn band_bounds_inclusive() {
        let table = RuleTable::standard();
        let at_8 = RegionSelector::new().with_lat_range(8.0, 8.0);
        let at_50 = RegionSelector::new().with_lat_range(50.0, 50.0);
        let at_minus_10 = RegionSelector::new().with_lat_range(-10.0, -10.0);
        assert_eq!(table.resolve(&at_8), RegionCalendar::India);
        assert_eq!(table.resolve(&at_50), RegionCalendar::Us);
        assert_eq!(table.resolve(&at_minus_10), RegionCalendar::Australia);
    }

    #[test]
    fn outside_all_bands_is_global() {
        let table = RuleTable::standard();
        for (lo, hi) in [(60.0, 70.0), (-5.0, 5.0), (-80.0, -60.0)] {
            let sel = RegionSelector::new().with_lat_range(lo, hi);
            assert_eq!(table.resolve(&sel), RegionCalendar::Global, "{lo}..{hi}");
        }
    }

    #[test]
    fn nan_latitude_is_global() {
        let sel = RegionSelector::new().with_lat_range(f64::NAN, 10.0);
        assert_eq!(RuleTable::standard().resolve(&sel), RegionCalendar::Global);
    }

    #[test]
    fn empty_selector_is_global() {
        let cat = resolve_catalog(&RegionSelector::new());
        let names: Vec<&str> = cat.iter().map(|s| s.name()).collect();
        assert_eq!(names, ["DJF", "MAM", "JJAS", "ON"]);
    }

    #[test]
    fn matching_rule_reports_band() {
        let sel = RegionSelector::new().with_lat_range(-30.0, -20.0);
        let table = RuleTable::standard();
        assert!(matches!(
            table.matching_rule(&sel),
            Some(SeasonRule::LatitudeBand {
                calendar: RegionCalendar::Australia,
                ..
            })
        ));
    }
}
