//! Core dasha types.

use serde::Serialize;

use crate::graha::Graha;

/// Dasha years are Julian years.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Deepest supported level (Deha, 6 levels).
pub const MAX_DASHA_DEPTH: u8 = 6;

/// Hard cap on periods materialized by one tree request.
pub const MAX_PERIODS: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum DashaLevel {
    Maha = 0,
    Antar = 1,
    Pratyantar = 2,
    Sookshma = 3,
    Prana = 4,
    Deha = 5,
}

impl DashaLevel {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Maha),
            1 => Some(Self::Antar),
            2 => Some(Self::Pratyantar),
            3 => Some(Self::Sookshma),
            4 => Some(Self::Prana),
            5 => Some(Self::Deha),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Maha => "Mahadasha",
            Self::Antar => "Antardasha",
            Self::Pratyantar => "Pratyantardasha",
            Self::Sookshma => "Sookshmadasha",
            Self::Prana => "Pranadasha",
            Self::Deha => "Dehadasha",
        }
    }

    pub fn child_level(self) -> Option<Self> {
        Self::from_u8(self as u8 + 1)
    }
}

/// A single period: `[start_jd, end_jd)` in UT Julian Days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DashaPeriod {
    pub ruler: Graha,
    pub level: DashaLevel,
    pub start_jd: f64,
    pub end_jd: f64,
}

impl DashaPeriod {
    pub fn duration_days(&self) -> f64 {
        self.end_jd - self.start_jd
    }

    pub fn contains(&self, jd: f64) -> bool {
        jd >= self.start_jd && jd < self.end_jd
    }

    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        self.start_jd < end && self.end_jd > start
    }
}
