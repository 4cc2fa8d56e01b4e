//! Planetary friendship and dignity.
//!
//! Natural (naisargika) friendship is a fixed table. Temporal (tatkalika)
//! friendship depends on the rashi distance between two planets in a chart.
//! The two combine into the five-level compound (panchadha) relation, which
//! in turn grades a planet's dignity in any rashi it does not own.

use serde::Serialize;

use crate::graha::{Graha, SAPTA_GRAHAS, rashi_lord};
use crate::rashi::{Rashi, count_from};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NaturalRelation {
    Friend,
    Neutral,
    Enemy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalRelation {
    Friend,
    Enemy,
}

/// Five-level compound relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompoundRelation {
    AdhiMitra,
    Mitra,
    Sama,
    Shatru,
    AdhiShatru,
}

/// Dignity of a planet in a rashi, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dignity {
    Exalted,
    Moolatrikona,
    OwnSign,
    AdhiMitra,
    Mitra,
    Sama,
    Shatru,
    AdhiShatru,
    Debilitated,
}

use Graha::{Buddh, Chandra, Guru, Mangal, Shani, Shukra, Surya};
use NaturalRelation::{Enemy as E, Friend as F, Neutral as N};

/// `NATURAL[a][b]`: how planet `a` regards planet `b` (7 planets).
const NATURAL: [[NaturalRelation; 7]; 7] = [
    // Su Mo Ma Me Ju Ve Sa
    [F, F, F, N, F, E, E], // Sun
    [F, F, N, F, N, N, N], // Moon
    [F, F, F, E, F, N, N], // Mars
    [F, E, N, F, N, F, N], // Mercury
    [F, F, F, E, F, E, N], // Jupiter
    [E, E, N, F, N, F, F], // Venus
    [E, E, E, F, N, F, F], // Saturn
];

/// Natural relation of `of` toward `toward`. The nodes are neutral to all.
pub fn natural_relation(of: Graha, toward: Graha) -> NaturalRelation {
    if of.is_node() || toward.is_node() {
        return NaturalRelation::Neutral;
    }
    NATURAL[of.index()][toward.index()]
}

/// Temporal relation by rashi count from `from` to `to` (same rashi = 1).
///
/// Counts 2, 3, 4, 10, 11 and 12 are temporary friends. Counts 1, 5, 6, 7, 8
/// and 9 are temporary enemies. There is no neutral count; the neutral
/// grade of the compound relation comes from the natural table.
pub fn temporal_relation(from: Rashi, to: Rashi) -> TemporalRelation {
    match count_from(from, to) {
        2 | 3 | 4 | 10 | 11 | 12 => TemporalRelation::Friend,
        _ => TemporalRelation::Enemy,
    }
}

pub fn compound_relation(natural: NaturalRelation, temporal: TemporalRelation) -> CompoundRelation {
    let score = match natural {
        NaturalRelation::Friend => 1,
        NaturalRelation::Neutral => 0,
        NaturalRelation::Enemy => -1,
    } + match temporal {
        TemporalRelation::Friend => 1,
        TemporalRelation::Enemy => -1,
    };
    match score {
        2 => CompoundRelation::AdhiMitra,
        1 => CompoundRelation::Mitra,
        0 => CompoundRelation::Sama,
        -1 => CompoundRelation::Shatru,
        _ => CompoundRelation::AdhiShatru,
    }
}

/// Exaltation longitude (sidereal degrees); debilitation is 180° opposite.
pub fn exaltation_deg(graha: Graha) -> Option<f64> {
    match graha {
        Surya => Some(10.0),
        Chandra => Some(33.0),
        Mangal => Some(298.0),
        Buddh => Some(165.0),
        Guru => Some(95.0),
        Shukra => Some(357.0),
        Shani => Some(200.0),
        _ => None,
    }
}

pub fn exaltation_rashi(graha: Graha) -> Option<Rashi> {
    exaltation_deg(graha).map(|d| Rashi::from_index((d / 30.0) as i32))
}

pub fn debilitation_rashi(graha: Graha) -> Option<Rashi> {
    exaltation_rashi(graha).map(|r| r.add(6))
}

/// Moolatrikona rashi and its degree range within the rashi.
pub fn moolatrikona(graha: Graha) -> Option<(Rashi, f64, f64)> {
    match graha {
        Surya => Some((Rashi::Simha, 0.0, 20.0)),
        Chandra => Some((Rashi::Vrishabha, 4.0, 30.0)),
        Mangal => Some((Rashi::Mesha, 0.0, 12.0)),
        Buddh => Some((Rashi::Kanya, 16.0, 20.0)),
        Guru => Some((Rashi::Dhanu, 0.0, 10.0)),
        Shukra => Some((Rashi::Tula, 0.0, 15.0)),
        Shani => Some((Rashi::Kumbha, 0.0, 20.0)),
        _ => None,
    }
}

pub fn own_rashis(graha: Graha) -> &'static [Rashi] {
    match graha {
        Surya => &[Rashi::Simha],
        Chandra => &[Rashi::Karka],
        Mangal => &[Rashi::Mesha, Rashi::Vrischika],
        Buddh => &[Rashi::Mithuna, Rashi::Kanya],
        Guru => &[Rashi::Dhanu, Rashi::Meena],
        Shukra => &[Rashi::Vrishabha, Rashi::Tula],
        Shani => &[Rashi::Makara, Rashi::Kumbha],
        _ => &[],
    }
}

/// Dignity of one of the 7 planets placed in `rashi`.
///
/// `degree_in_rashi` enables the moolatrikona degree check (rashi chart);
/// pass `None` for divisional charts, where only the rashi counts.
/// `positions` holds every planet's rashi in the same chart and supplies the
/// temporal half of the relation with the rashi lord.
pub fn dignity(
    graha: Graha,
    rashi: Rashi,
    degree_in_rashi: Option<f64>,
    positions: &[Rashi; 7],
) -> Dignity {
    if exaltation_rashi(graha) == Some(rashi) {
        return Dignity::Exalted;
    }
    if debilitation_rashi(graha) == Some(rashi) {
        return Dignity::Debilitated;
    }
    if let Some((mt, lo, hi)) = moolatrikona(graha) {
        let in_range = degree_in_rashi.is_none_or(|d| d >= lo && d < hi);
        if mt == rashi && in_range {
            return Dignity::Moolatrikona;
        }
    }
    if own_rashis(graha).contains(&rashi) {
        return Dignity::OwnSign;
    }
    let lord = rashi_lord(rashi);
    let temporal = temporal_relation(rashi, positions[lord.index()]);
    match compound_relation(natural_relation(graha, lord), temporal) {
        CompoundRelation::AdhiMitra => Dignity::AdhiMitra,
        CompoundRelation::Mitra => Dignity::Mitra,
        CompoundRelation::Sama => Dignity::Sama,
        CompoundRelation::Shatru => Dignity::Shatru,
        CompoundRelation::AdhiShatru => Dignity::AdhiShatru,
    }
}

/// How one of the 7 planets regards another in a particular chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PairRelation {
    pub of: Graha,
    pub toward: Graha,
    pub natural: NaturalRelation,
    pub temporal: TemporalRelation,
    pub compound: CompoundRelation,
}

/// The 7 x 7 relation table without its diagonal, row by row (`of` in
/// Sun..Saturn order, then `toward`). `positions` holds each planet's rashi.
pub fn relationship_table(positions: &[Rashi; 7]) -> Vec<PairRelation> {
    let mut out = Vec::with_capacity(42);
    for (i, &of) in SAPTA_GRAHAS.iter().enumerate() {
        for (j, &toward) in SAPTA_GRAHAS.iter().enumerate() {
            if i == j {
                continue;
            }
            let natural = natural_relation(of, toward);
            let temporal = temporal_relation(positions[i], positions[j]);
            out.push(PairRelation {
                of,
                toward,
                natural,
                temporal,
                compound: compound_relation(natural, temporal),
            });
        }
    }
    out
}
