//! Rashi (zodiac sign) classification and in-sign positions.

use serde::{Deserialize, Serialize};

use crate::util::normalize_360;

/// The 12 rashis starting from Mesha (Aries) at 0°.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rashi {
    Mesha,
    Vrishabha,
    Mithuna,
    Karka,
    Simha,
    Kanya,
    Tula,
    Vrischika,
    Dhanu,
    Makara,
    Kumbha,
    Meena,
}

pub const ALL_RASHIS: [Rashi; 12] = [
    Rashi::Mesha,
    Rashi::Vrishabha,
    Rashi::Mithuna,
    Rashi::Karka,
    Rashi::Simha,
    Rashi::Kanya,
    Rashi::Tula,
    Rashi::Vrischika,
    Rashi::Dhanu,
    Rashi::Makara,
    Rashi::Kumbha,
    Rashi::Meena,
];

/// Width of one rashi in degrees.
pub const RASHI_SPAN: f64 = 30.0;

/// Chara / sthira / dwiswabhava grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Movable,
    Fixed,
    Dual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

impl Rashi {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mesha => "Mesha",
            Self::Vrishabha => "Vrishabha",
            Self::Mithuna => "Mithuna",
            Self::Karka => "Karka",
            Self::Simha => "Simha",
            Self::Kanya => "Kanya",
            Self::Tula => "Tula",
            Self::Vrischika => "Vrischika",
            Self::Dhanu => "Dhanu",
            Self::Makara => "Makara",
            Self::Kumbha => "Kumbha",
            Self::Meena => "Meena",
        }
    }

    pub const fn english_name(self) -> &'static str {
        match self {
            Self::Mesha => "Aries",
            Self::Vrishabha => "Taurus",
            Self::Mithuna => "Gemini",
            Self::Karka => "Cancer",
            Self::Simha => "Leo",
            Self::Kanya => "Virgo",
            Self::Tula => "Libra",
            Self::Vrischika => "Scorpio",
            Self::Dhanu => "Sagittarius",
            Self::Makara => "Capricorn",
            Self::Kumbha => "Aquarius",
            Self::Meena => "Pisces",
        }
    }

    /// 0-based index (0 = Mesha).
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Rashi for any integer index, wrapping modulo 12.
    pub const fn from_index(i: i32) -> Self {
        ALL_RASHIS[i.rem_euclid(12) as usize]
    }

    /// The rashi `steps` signs ahead (negative counts backwards).
    pub const fn add(self, steps: i32) -> Self {
        Self::from_index(self.index() as i32 + steps)
    }

    /// Mesha, Mithuna, Simha ... are odd (masculine).
    pub const fn is_odd(self) -> bool {
        self.index() % 2 == 0
    }

    pub const fn modality(self) -> Modality {
        match self.index() % 3 {
            0 => Modality::Movable,
            1 => Modality::Fixed,
            _ => Modality::Dual,
        }
    }

    pub const fn element(self) -> Element {
        match self.index() % 4 {
            0 => Element::Fire,
            1 => Element::Earth,
            2 => Element::Air,
            _ => Element::Water,
        }
    }

    /// Longitude where this rashi begins.
    pub fn start_deg(self) -> f64 {
        f64::from(self.index()) * RASHI_SPAN
    }
}

impl std::fmt::Display for Rashi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Inclusive count from `from` to `to`: the same sign is 1, the next is 2.
pub const fn count_from(from: Rashi, to: Rashi) -> u8 {
    ((to.index() as i32 - from.index() as i32).rem_euclid(12) + 1) as u8
}

/// Degrees, minutes, seconds of an angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dms {
    pub degrees: u16,
    pub minutes: u8,
    pub seconds: f64,
}

pub fn deg_to_dms(deg: f64) -> Dms {
    let d = deg.abs();
    let degrees = d.floor();
    let min_total = (d - degrees) * 60.0;
    let minutes = min_total.floor();
    Dms {
        degrees: degrees as u16,
        minutes: minutes as u8,
        seconds: (min_total - minutes) * 60.0,
    }
}

/// A longitude expressed as rashi + offset within it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RashiPosition {
    pub rashi: Rashi,
    /// Degrees within the rashi, [0, 30).
    pub degrees_in_rashi: f64,
}

impl RashiPosition {
    pub fn dms(&self) -> Dms {
        deg_to_dms(self.degrees_in_rashi)
    }
}

pub fn rashi_of(lon_deg: f64) -> Rashi {
    rashi_position(lon_deg).rashi
}

pub fn rashi_position(lon_deg: f64) -> RashiPosition {
    let lon = normalize_360(lon_deg);
    let idx = ((lon / RASHI_SPAN).floor() as i32).min(11);
    let rashi = Rashi::from_index(idx);
    RashiPosition {
        rashi,
        degrees_in_rashi: lon - rashi.start_deg(),
    }
}
