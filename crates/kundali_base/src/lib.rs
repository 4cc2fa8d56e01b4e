//! Chart mathematics for sidereal (Vedic) astrology.
//!
//! Everything here is a pure function of longitudes, speeds and instants:
//! - Grahas, rashis, nakshatras and 20 ayanamsha systems
//! - House (bhava) systems, whole-sign by default
//! - Divisional charts (amshas) D1 through D60
//! - Vimshottari dasha with lazily expanded period trees
//! - Shadbala and ashtakavarga
//! - Rashi aspects, planetary relationships and dignity
//! - A data-driven yoga catalog
//!
//! No ephemeris access happens in this crate.

pub mod amsha;
pub mod ashtakavarga;
pub mod ayanamsha;
pub mod bhava;
pub mod dasha;
pub mod drishti;
pub mod error;
pub mod graha;
pub mod kala;
pub mod nakshatra;
pub mod rashi;
pub mod relationship;
pub mod shadbala;
pub mod util;
pub mod yoga;

pub use amsha::{ALL_AMSHAS, Amsha, AmshaChart, AmshaPlacement, amsha_chart, amsha_longitude, amsha_rashi};
pub use ashtakavarga::{Ashtakavarga, BhinnaAshtakavarga, SarvaAshtakavarga, ashtakavarga};
pub use ayanamsha::{AyanamshaSystem, Equinox, ayanamsha_deg, sidereal_longitude};
pub use bhava::{BhavaSet, BhavaSystem, MeridianAngles, compute_bhavas};
pub use dasha::{DashaLevel, DashaPeriod, DashaTree, dasha_snapshot, dasha_tree};
pub use drishti::{AspectClass, AspectRecord, AspectTarget, aspect_table, planet_aspect_matrix};
pub use error::BaseError;
pub use graha::{ALL_GRAHAS, Graha, SAPTA_GRAHAS, rashi_lord};
pub use nakshatra::{Nakshatra, NakshatraPosition, nakshatra_position};
pub use rashi::{ALL_RASHIS, Rashi, RashiPosition, rashi_of, rashi_position};
pub use relationship::{Dignity, PairRelation, dignity, relationship_table};
pub use shadbala::{KalaInputs, ShadbalaEntry, ShadbalaInputs, shadbala};
pub use util::normalize_360;
pub use yoga::{YOGA_CATALOG, YogaMatch, YogaSnapshot, YogaStrength, detect_yogas};
