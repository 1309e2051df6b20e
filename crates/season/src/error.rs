//! Error types for the qmbc-season crate.

/// Error type for all fallible operations in the qmbc-season crate.
///
/// Covers invalid month numbers and catalogs that do not partition the
/// twelve calendar months.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeasonError {
    /// Returned when a month number is outside 1..=12.
    #[error("invalid month: {month} (must be 1..=12)")]
    InvalidMonth {
        /// The invalid month number.
        month: u8,
    },

    /// Returned when a season has no months.
    #[error("season '{season}' has no months")]
    EmptySeason {
        /// Name of the empty season.
        season: String,
    },

    /// Returned when two seasons share a name.
    #[error("duplicate season name '{season}'")]
    DuplicateSeason {
        /// The repeated season name.
        season: String,
    },

    /// Returned when a month is claimed by more than one season.
    #[error("month {month} appears in both '{first}' and '{second}'")]
    OverlappingMonth {
        /// The month listed twice.
        month: u8,
        /// Season that listed the month first.
        first: String,
        /// Season that listed it again.
        second: String,
    },

    /// Returned when some months belong to no season.
    #[error("months {months:?} are not covered by any season")]
    UncoveredMonths {
        /// The uncovered months, ascending.
        months: Vec<u8>,
    },
}
