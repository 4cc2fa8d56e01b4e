//! Validated chart request options.

use kundali_base::{Amsha, AyanamshaSystem, BhavaSystem};
use serde::Serialize;

use crate::error::ChartError;

/// What to compute for one chart.
///
/// Built through [`ChartOptions::parse`] (or the typed constructor), so an
/// unsupported ayanamsha, house system or division is rejected before any
/// ephemeris work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ChartOptions {
    pub ayanamsha: AyanamshaSystem,
    pub house_system: BhavaSystem,
    /// Requested divisional charts, ascending and deduplicated.
    pub divisions: Vec<Amsha>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self::new(AyanamshaSystem::Lahiri, BhavaSystem::WholeSign, vec![Amsha::D1, Amsha::D9])
    }
}

impl ChartOptions {
    pub fn new(ayanamsha: AyanamshaSystem, house_system: BhavaSystem, mut divisions: Vec<Amsha>) -> Self {
        divisions.sort_by_key(|a| a.division());
        divisions.dedup();
        Self {
            ayanamsha,
            house_system,
            divisions,
        }
    }

    /// Parse user-facing names and division numbers.
    pub fn parse(ayanamsha: &str, house_system: &str, divisions: &[u16]) -> Result<Self, ChartError> {
        let ayanamsha: AyanamshaSystem = ayanamsha.parse()?;
        let house_system: BhavaSystem = house_system.parse()?;
        let divisions = divisions
            .iter()
            .map(|&d| Amsha::from_division(d))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(ayanamsha, house_system, divisions))
    }

    pub fn division_numbers(&self) -> Vec<u16> {
        self.divisions.iter().map(|a| a.division()).collect()
    }
}
