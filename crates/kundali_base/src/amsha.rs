//! Divisional (amsha / varga) charts.
//!
//! Every division splits a 30° rashi into `D` parts and maps each part to a
//! target rashi. The mapping is one row of [`AMSHA_RULES`]: either a start
//! rule (chosen by the source rashi's parity, modality or element) plus a
//! per-part step, or an explicit per-degree segment table. Supporting a new
//! division means adding a variant and a row, never new branching code.

use serde::{Deserialize, Serialize};

use crate::error::BaseError;
use crate::graha::Graha;
use crate::rashi::{Element, Modality, RASHI_SPAN, Rashi, rashi_position};
use crate::util::normalize_360;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Amsha {
    D1,
    D2,
    D3,
    D4,
    D7,
    D9,
    D10,
    D12,
    D16,
    D20,
    D24,
    D27,
    D30,
    D40,
    D45,
    D60,
}

pub const ALL_AMSHAS: [Amsha; 16] = [
    Amsha::D1,
    Amsha::D2,
    Amsha::D3,
    Amsha::D4,
    Amsha::D7,
    Amsha::D9,
    Amsha::D10,
    Amsha::D12,
    Amsha::D16,
    Amsha::D20,
    Amsha::D24,
    Amsha::D27,
    Amsha::D30,
    Amsha::D40,
    Amsha::D45,
    Amsha::D60,
];

/// Where counting starts for a source rashi.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// `n` signs ahead of the source rashi.
    Relative(i32),
    /// A fixed rashi index.
    Absolute(u8),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StartRule {
    Parity { odd: Anchor, even: Anchor },
    Modality { movable: Anchor, fixed: Anchor, dual: Anchor },
    Element([Anchor; 4]),
    /// Explicit unequal segments: `(end_deg, target rashi index)` for odd and
    /// even source rashis.
    Segments {
        odd: &'static [(f64, u8)],
        even: &'static [(f64, u8)],
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmshaRule {
    pub amsha: Amsha,
    pub division: u16,
    pub name: &'static str,
    pub start: StartRule,
    /// Rashis advanced per part; unused by segment rules.
    pub step: i32,
}

const SAME: Anchor = Anchor::Relative(0);

/// Keeps a scaled position inside its target rashi.
const MAX_WITHIN: f64 = RASHI_SPAN - 1e-9;

const fn same_start(amsha: Amsha, division: u16, name: &'static str, step: i32) -> AmshaRule {
    AmshaRule {
        amsha,
        division,
        name,
        start: StartRule::Parity {
            odd: SAME,
            even: SAME,
        },
        step,
    }
}

const fn ruled(amsha: Amsha, division: u16, name: &'static str, start: StartRule) -> AmshaRule {
    AmshaRule {
        amsha,
        division,
        name,
        start,
        step: 1,
    }
}

const HORA_ODD: [(f64, u8); 2] = [(15.0, 4), (30.0, 3)];
const HORA_EVEN: [(f64, u8); 2] = [(15.0, 3), (30.0, 4)];

const TRIMSHAMSHA_ODD: [(f64, u8); 5] = [(5.0, 0), (10.0, 10), (18.0, 8), (25.0, 2), (30.0, 6)];
const TRIMSHAMSHA_EVEN: [(f64, u8); 5] = [(5.0, 1), (12.0, 5), (20.0, 11), (25.0, 9), (30.0, 7)];

/// Parashari shodashavarga rules, in [`Amsha`] order.
pub static AMSHA_RULES: [AmshaRule; 16] = {
    use Anchor::{Absolute as Abs, Relative as Rel};
    [
        same_start(Amsha::D1, 1, "Rashi", 0),
        ruled(
            Amsha::D2,
            2,
            "Hora",
            StartRule::Segments {
                odd: &HORA_ODD,
                even: &HORA_EVEN,
            },
        ),
        same_start(Amsha::D3, 3, "Drekkana", 4),
        same_start(Amsha::D4, 4, "Chaturthamsha", 3),
        ruled(Amsha::D7, 7, "Saptamsha", StartRule::Parity { odd: Rel(0), even: Rel(6) }),
        ruled(
            Amsha::D9,
            9,
            "Navamsha",
            StartRule::Modality {
                movable: Rel(0),
                fixed: Rel(8),
                dual: Rel(4),
            },
        ),
        ruled(Amsha::D10, 10, "Dashamsha", StartRule::Parity { odd: Rel(0), even: Rel(8) }),
        same_start(Amsha::D12, 12, "Dwadashamsha", 1),
        ruled(
            Amsha::D16,
            16,
            "Shodashamsha",
            StartRule::Modality {
                movable: Abs(0),
                fixed: Abs(4),
                dual: Abs(8),
            },
        ),
        ruled(
            Amsha::D20,
            20,
            "Vimshamsha",
            StartRule::Modality {
                movable: Abs(0),
                fixed: Abs(8),
                dual: Abs(4),
            },
        ),
        ruled(Amsha::D24, 24, "Chaturvimshamsha", StartRule::Parity { odd: Abs(4), even: Abs(3) }),
        ruled(
            Amsha::D27,
            27,
            "Saptavimshamsha",
            StartRule::Element([Abs(0), Abs(3), Abs(6), Abs(9)]),
        ),
        ruled(
            Amsha::D30,
            30,
            "Trimshamsha",
            StartRule::Segments {
                odd: &TRIMSHAMSHA_ODD,
                even: &TRIMSHAMSHA_EVEN,
            },
        ),
        ruled(Amsha::D40, 40, "Khavedamsha", StartRule::Parity { odd: Abs(0), even: Abs(6) }),
        ruled(
            Amsha::D45,
            45,
            "Akshavedamsha",
            StartRule::Modality {
                movable: Abs(0),
                fixed: Abs(4),
                dual: Abs(8),
            },
        ),
        same_start(Amsha::D60, 60, "Shashtiamsha", 1),
    ]
};

impl Amsha {
    pub fn rule(self) -> &'static AmshaRule {
        &AMSHA_RULES[self as usize]
    }

    pub fn division(self) -> u16 {
        self.rule().division
    }

    pub fn from_division(division: u16) -> Result<Self, BaseError> {
        AMSHA_RULES
            .iter()
            .find(|r| r.division == division)
            .map(|r| r.amsha)
            .ok_or(BaseError::UnsupportedDivision(division))
    }
}

impl std::fmt::Display for Amsha {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "D{}", self.division())
    }
}

fn anchor_rashi(source: Rashi, anchor: Anchor) -> Rashi {
    match anchor {
        Anchor::Relative(n) => source.add(n),
        Anchor::Absolute(i) => Rashi::from_index(i32::from(i)),
    }
}

/// Target rashi and the degrees within it for a sidereal longitude.
fn map_longitude(lon_deg: f64, amsha: Amsha) -> (Rashi, f64) {
    let pos = rashi_position(lon_deg);
    let rule = amsha.rule();
    let source = pos.rashi;
    let deg = pos.degrees_in_rashi;

    let anchor = match rule.start {
        StartRule::Segments { odd, even } => {
            let table = if source.is_odd() { odd } else { even };
            let idx = table
                .iter()
                .position(|&(end, _)| deg < end)
                .unwrap_or(table.len() - 1);
            let seg_start = if idx == 0 { 0.0 } else { table[idx - 1].0 };
            let (end, target) = table[idx];
            let scaled = ((deg - seg_start) / (end - seg_start) * RASHI_SPAN).clamp(0.0, MAX_WITHIN);
            return (Rashi::from_index(i32::from(target)), scaled);
        }
        StartRule::Parity { odd, even } => {
            if source.is_odd() {
                odd
            } else {
                even
            }
        }
        StartRule::Modality {
            movable,
            fixed,
            dual,
        } => match source.modality() {
            Modality::Movable => movable,
            Modality::Fixed => fixed,
            Modality::Dual => dual,
        },
        StartRule::Element(anchors) => match source.element() {
            Element::Fire => anchors[0],
            Element::Earth => anchors[1],
            Element::Air => anchors[2],
            Element::Water => anchors[3],
        },
    };

    let d = f64::from(rule.division);
    let part_span = RASHI_SPAN / d;
    let part = ((deg / part_span).floor() as i32).min(i32::from(rule.division) - 1);
    let within = ((deg - f64::from(part) * part_span) * d).clamp(0.0, MAX_WITHIN);
    let start = anchor_rashi(source, anchor);
    (start.add(part * rule.step), within)
}

/// Divisional rashi of a sidereal longitude.
pub fn amsha_rashi(lon_deg: f64, amsha: Amsha) -> Rashi {
    map_longitude(lon_deg, amsha).0
}

/// Divisional longitude: target rashi start plus the scaled position in the part.
pub fn amsha_longitude(lon_deg: f64, amsha: Amsha) -> f64 {
    let (rashi, within) = map_longitude(lon_deg, amsha);
    normalize_360(rashi.start_deg() + within)
}

/// Same rashi in the rashi chart and the navamsha.
pub fn is_vargottama(lon_deg: f64) -> bool {
    amsha_rashi(lon_deg, Amsha::D1) == amsha_rashi(lon_deg, Amsha::D9)
}

/// One body in a divisional chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AmshaPlacement {
    pub graha: Graha,
    pub longitude_deg: f64,
    pub rashi: Rashi,
}

/// A complete divisional chart with its own Ascendant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmshaChart {
    pub amsha: Amsha,
    pub ascendant_deg: f64,
    pub ascendant_rashi: Rashi,
    pub placements: Vec<AmshaPlacement>,
}

/// Map the Ascendant and every `(graha, sidereal longitude)` through `amsha`.
pub fn amsha_chart(amsha: Amsha, ascendant_deg: f64, bodies: &[(Graha, f64)]) -> AmshaChart {
    let placements = bodies
        .iter()
        .map(|&(graha, lon)| AmshaPlacement {
            graha,
            longitude_deg: amsha_longitude(lon, amsha),
            rashi: amsha_rashi(lon, amsha),
        })
        .collect();
    AmshaChart {
        amsha,
        ascendant_deg: amsha_longitude(ascendant_deg, amsha),
        ascendant_rashi: amsha_rashi(ascendant_deg, amsha),
        placements,
    }
}
