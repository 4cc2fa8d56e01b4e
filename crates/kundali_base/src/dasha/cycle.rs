//! The Vimshottari cycle and the birth balance.

use crate::graha::Graha;
use crate::nakshatra::{Nakshatra, nakshatra_position};

use super::types::DAYS_PER_YEAR;

/// Rulers in cycle order with their allotments in years (sum 120).
pub const VIMSHOTTARI_CYCLE: [(Graha, f64); 9] = [
    (Graha::Ketu, 7.0),
    (Graha::Shukra, 20.0),
    (Graha::Surya, 6.0),
    (Graha::Chandra, 10.0),
    (Graha::Mangal, 7.0),
    (Graha::Rahu, 18.0),
    (Graha::Guru, 16.0),
    (Graha::Shani, 19.0),
    (Graha::Buddh, 17.0),
];

pub const CYCLE_YEARS: f64 = 120.0;

pub const CYCLE_DAYS: f64 = CYCLE_YEARS * DAYS_PER_YEAR;

/// Position of `graha` in the cycle. The nine grahas all appear exactly once.
pub fn cycle_position(graha: Graha) -> usize {
    VIMSHOTTARI_CYCLE
        .iter()
        .position(|&(g, _)| g == graha)
        .unwrap_or(0)
}

/// Full allotment of the cycle entry at `pos` (wrapping), in days.
pub fn allotment_days(pos: usize) -> f64 {
    VIMSHOTTARI_CYCLE[pos % 9].1 * DAYS_PER_YEAR
}

/// The Moon's nakshatra and how much of the first Mahadasha remains at birth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BirthBalance {
    pub nakshatra: Nakshatra,
    /// Fraction of the nakshatra already traversed, [0, 1).
    pub fraction_elapsed: f64,
    /// Cycle position of the first Mahadasha ruler.
    pub start_position: usize,
    /// Remaining length of the first Mahadasha.
    pub balance_days: f64,
}

impl BirthBalance {
    pub fn first_ruler(&self) -> Graha {
        VIMSHOTTARI_CYCLE[self.start_position].0
    }
}

pub fn birth_balance(moon_sidereal_lon: f64) -> BirthBalance {
    let pos = nakshatra_position(moon_sidereal_lon);
    let start_position = usize::from(pos.nakshatra.index()) % 9;
    BirthBalance {
        nakshatra: pos.nakshatra,
        fraction_elapsed: pos.fraction,
        start_position,
        balance_days: allotment_days(start_position) * (1.0 - pos.fraction),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nakshatra::NAKSHATRA_SPAN;

    #[test]
    fn cycle_totals_120_years() {
        let total: f64 = VIMSHOTTARI_CYCLE.iter().map(|&(_, y)| y).sum();
        assert_eq!(total, CYCLE_YEARS);
    }

    #[test]
    fn ashwini_start_is_full_ketu() {
        let b = birth_balance(0.0);
        assert_eq!(b.first_ruler(), Graha::Ketu);
        assert_eq!(b.balance_days, 7.0 * DAYS_PER_YEAR);
    }

    #[test]
    fn rohini_half_is_half_moon() {
        let b = birth_balance(NAKSHATRA_SPAN * 3.5);
        assert_eq!(b.nakshatra, Nakshatra::Rohini);
        assert_eq!(b.first_ruler(), Graha::Chandra);
        assert!((b.balance_days - 5.0 * DAYS_PER_YEAR).abs() < 1e-6);
    }

    #[test]
    fn rulers_repeat_every_nine_nakshatras() {
        let a = birth_balance(NAKSHATRA_SPAN * 1.2).first_ruler();
        let b = birth_balance(NAKSHATRA_SPAN * 10.2).first_ruler();
        let c = birth_balance(NAKSHATRA_SPAN * 19.2).first_ruler();
        assert_eq!((a, b, c), (Graha::Shukra, Graha::Shukra, Graha::Shukra));
    }

    #[test]
    fn positions_round_trip() {
        for (i, &(g, _)) in VIMSHOTTARI_CYCLE.iter().enumerate() {
            assert_eq!(cycle_position(g), i);
        }
    }
}
