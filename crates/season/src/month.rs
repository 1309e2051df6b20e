//! Calendar month newtype.

use serde::Serialize;

use crate::error::SeasonError;

/// A calendar month, guaranteed to be in 1..=12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Month(u8);

impl Month {
    /// Creates a `Month` after checking that `month` is in 1..=12.
    ///
    /// # Errors
    ///
    /// Returns [`SeasonError::InvalidMonth`] otherwise.
    pub fn new(month: u8) -> Result<Self, SeasonError> {
        if (1..=12).contains(&month) {
            Ok(Self(month))
        } else {
            Err(SeasonError::InvalidMonth { month })
        }
    }

    /// Returns the month number (1..=12).
    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based index (0..=11), for table lookups.
    pub(crate) fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// All twelve months in calendar order.
    pub fn all() -> impl Iterator<Item = Month> {
        (1u8..=12).map(Month)
    }
}

impl TryFrom<u32> for Month {
    type Error = SeasonError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        let month = u8::try_from(value).unwrap_or(u8::MAX);
        Self::new(month)
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
