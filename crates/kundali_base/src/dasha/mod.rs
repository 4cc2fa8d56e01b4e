//! Vimshottari dasha: the 120-year planetary period cycle keyed by the
//! Moon's birth nakshatra.

pub mod cycle;
pub mod tree;
pub mod types;

pub use cycle::{BirthBalance, VIMSHOTTARI_CYCLE, birth_balance};
pub use tree::{DashaNode, DashaTree, MahaSequence, dasha_snapshot, dasha_tree, sub_periods};
pub use types::{DAYS_PER_YEAR, DashaLevel, DashaPeriod, MAX_DASHA_DEPTH, MAX_PERIODS};
