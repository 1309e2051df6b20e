//! # qmbc-season
//!
//! Season catalogs: named partitions of the twelve calendar months, and the
//! ordered rule table that picks a catalog from a region name or a latitude
//! range.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["RegionSelector"] -->|"RuleTable::resolve()"| B["RegionCalendar"]
//!     B -->|".catalog()"| C["SeasonCatalog"]
//!     C -->|".season_of(month)"| D["&Season"]
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use qmbc_season::{Month, RegionSelector, resolve_catalog};
//!
//! let catalog = resolve_catalog(&RegionSelector::new().with_lat_range(10.0, 30.0));
//! assert_eq!(catalog.label(), "India");
//!
//! let july = Month::new(7).unwrap();
//! assert_eq!(catalog.season_of(july).name(), "Monsoon");
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `month` | Calendar month newtype |
//! | `catalog` | Season and validated season catalog |
//! | `rules` | Region calendars, selector and ordered rule table |
//! | `error` | Error types |

mod catalog;
mod error;
mod month;
mod rules;

pub use catalog::{Season, SeasonCatalog};
pub use error::SeasonError;
pub use month::Month;
pub use rules::{LatRange, RegionCalendar, RegionSelector, RuleTable, SeasonRule, resolve_catalog};
