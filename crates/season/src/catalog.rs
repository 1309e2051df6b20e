//! Seasons and validated season catalogs.

use serde::Serialize;

use crate::error::SeasonError;
use crate::month::Month;

/// A named group of calendar months.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Season {
    name: String,
    months: Vec<Month>,
}

impl Season {
    /// Creates a season from a name and raw month numbers.
    ///
    /// Month order is kept as given (e.g. `[12, 1, 2]` for a winter season).
    ///
    /// # Errors
    ///
    /// Returns [`SeasonError::InvalidMonth`] for a number outside 1..=12.
    pub fn new(name: impl Into<String>, months: &[u8]) -> Result<Self, SeasonError> {
        let months = months
            .iter()
            .map(|&m| Month::new(m))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name: name.into(),
            months,
        })
    }

    /// Season name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Months of this season, in declaration order.
    pub fn months(&self) -> &[Month] {
        &self.months
    }

    /// Returns `true` if `month` belongs to this season.
    pub fn contains(&self, month: Month) -> bool {
        self.months.contains(&month)
    }
}

/// An ordered partition of the twelve calendar months into seasons.
///
/// Every month belongs to exactly one season; [`SeasonCatalog::new`] refuses
/// anything else. Iteration follows declaration order, which is also the
/// order in which corrected season blocks are concatenated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonCatalog {
    label: String,
    seasons: Vec<Season>,
    #[serde(skip)]
    lookup: [usize; 12],
}

impl SeasonCatalog {
    /// Builds a catalog, checking the exhaustive-disjoint partition.
    ///
    /// # Errors
    ///
    /// - [`SeasonError::EmptySeason`] if a season lists no months
    /// - [`SeasonError::DuplicateSeason`] if two seasons share a name
    /// - [`SeasonError::OverlappingMonth`] if a month is listed twice
    /// - [`SeasonError::UncoveredMonths`] if a month is not listed at all
    pub fn new(label: impl Into<String>, seasons: Vec<Season>) -> Result<Self, SeasonError> {
        let mut owner: [Option<usize>; 12] = [None; 12];

        for (idx, season) in seasons.iter().enumerate() {
            if season.months.is_empty() {
                return Err(SeasonError::EmptySeason {
                    season: season.name.clone(),
                });
            }
            if seasons[..idx].iter().any(|s| s.name == season.name) {
                return Err(SeasonError::DuplicateSeason {
                    season: season.name.clone(),
                });
            }
            for &month in &season.months {
                if let Some(prev) = owner[month.index()] {
                    return Err(SeasonError::OverlappingMonth {
                        month: month.get(),
                        first: seasons[prev].name.clone(),
                        second: season.name.clone(),
                    });
                }
                owner[month.index()] = Some(idx);
            }
        }

        let uncovered: Vec<u8> = Month::all()
            .filter(|m| owner[m.index()].is_none())
            .map(Month::get)
            .collect();
        if !uncovered.is_empty() {
            return Err(SeasonError::UncoveredMonths { months: uncovered });
        }

        let mut lookup = [0usize; 12];
        for (slot, o) in lookup.iter_mut().zip(owner) {
            // every slot is Some after the coverage check
            *slot = o.unwrap_or_default();
        }

        Ok(Self {
            label: label.into(),
            seasons,
            lookup,
        })
    }

    /// Short label of the calendar this catalog came from.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Seasons in iteration order.
    pub fn seasons(&self) -> &[Season] {
        &self.seasons
    }

    /// Number of seasons.
    pub fn len(&self) -> usize {
        self.seasons.len()
    }

    /// Always `false` for a validated catalog; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.seasons.is_empty()
    }

    /// The season that owns `month`.
    pub fn season_of(&self, month: Month) -> &Season {
        &self.seasons[self.lookup[month.index()]]
    }

    /// Position of the season that owns `month` in iteration order.
    pub fn season_index_of(&self, month: Month) -> usize {
        self.lookup[month.index()]
    }

    /// Looks up a season by name.
    pub fn get(&self, name: &str) -> Option<&Season> {
        self.seasons.iter().find(|s| s.name == name)
    }

    /// Iterator over seasons in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, Season> {
        self.seasons.iter()
    }
}

impl<'a> IntoIterator for &'a SeasonCatalog {
    type Item = &'a Season;
    type IntoIter = std::slice::Iter<'a, Season>;

    fn into_iter(self) -> Self::IntoIter {
        self.seasons.iter()
    }
}
