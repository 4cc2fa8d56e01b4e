//! Dasha requests anchored on a birth instant.

use kundali_base::dasha::{self, DAYS_PER_YEAR, DashaPeriod, DashaTree};
use kundali_time::Instant;

use crate::error::ChartError;

/// Materialize the Vimshottari tree for `[window_start, window_end)` (UT
/// Julian Days) down to `max_depth` levels.
pub fn dasha_tree(
    moon_sidereal_deg: f64,
    birth: &Instant,
    max_depth: u8,
    window_start: f64,
    window_end: f64,
) -> Result<DashaTree, ChartError> {
    Ok(dasha::dasha_tree(moon_sidereal_deg, birth.jd_ut(), max_depth, window_start, window_end)?)
}

/// Tree covering `years` from birth.
pub fn dasha_from_birth(
    moon_sidereal_deg: f64,
    birth: &Instant,
    max_depth: u8,
    years: f64,
) -> Result<DashaTree, ChartError> {
    let start = birth.jd_ut();
    dasha_tree(moon_sidereal_deg, birth, max_depth, start, start + years * DAYS_PER_YEAR)
}

/// Periods running at `query_jd`, Maha first.
pub fn active_periods(
    moon_sidereal_deg: f64,
    birth: &Instant,
    query_jd: f64,
    depth: u8,
) -> Result<Vec<DashaPeriod>, ChartError> {
    Ok(dasha::dasha_snapshot(moon_sidereal_deg, birth.jd_ut(), query_jd, depth)?)
}
