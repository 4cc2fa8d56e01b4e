//! Rashi-based aspects (drishti).
//!
//! Every graha aspects the 7th rashi from itself in full. Mars, Jupiter and
//! Saturn cast additional partial aspects from a fixed table. An aspect on a
//! rashi reaches the house containing that rashi and every graha in it.

use serde::Serialize;

use crate::bhava::BhavaSet;
use crate::graha::Graha;
use crate::rashi::{Rashi, count_from};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectClass {
    Full,
    Partial,
}

/// An aspect `nth` rashis from the caster (1 = its own rashi).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectRule {
    pub nth: u8,
    pub strength: f64,
}

const fn rule(nth: u8, strength: f64) -> AspectRule {
    AspectRule { nth, strength }
}

const COMMON: [AspectRule; 1] = [rule(7, 1.0)];
const MANGAL: [AspectRule; 3] = [rule(4, 0.75), rule(7, 1.0), rule(8, 0.75)];
const GURU: [AspectRule; 3] = [rule(5, 0.5), rule(7, 1.0), rule(9, 0.5)];
const SHANI: [AspectRule; 3] = [rule(3, 0.25), rule(7, 1.0), rule(10, 0.25)];

pub fn aspect_rules(graha: Graha) -> &'static [AspectRule] {
    match graha {
        Graha::Mangal => &MANGAL,
        Graha::Guru => &GURU,
        Graha::Shani => &SHANI,
        _ => &COMMON,
    }
}

/// Strength with which `caster` in `from` aspects the rashi `to`.
pub fn rashi_aspect(caster: Graha, from: Rashi, to: Rashi) -> Option<(f64, AspectClass)> {
    let nth = count_from(from, to);
    aspect_rules(caster)
        .iter()
        .find(|r| r.nth == nth)
        .map(|r| {
            let class = if r.strength >= 1.0 {
                AspectClass::Full
            } else {
                AspectClass::Partial
            };
            (r.strength, class)
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum AspectTarget {
    House(u8),
    Graha(Graha),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AspectRecord {
    pub source: Graha,
    pub target: AspectTarget,
    pub strength: f64,
    pub class: AspectClass,
}

/// Every aspect cast in a chart, on houses and on grahas.
///
/// Aspects fall on rashis. The house target is the house holding the middle
/// (15°) of the aspected rashi, while graha targets are every graha in that
/// rashi. Under whole-sign houses the two agree; under quadrant systems a
/// graha near a rashi edge may sit in a neighbouring house.
///
/// Output order is caster order, then rule order, then house before grahas,
/// so the table is deterministic.
pub fn aspect_table(placements: &[(Graha, Rashi)], bhavas: &BhavaSet) -> Vec<AspectRecord> {
    let mut out = Vec::new();
    for &(source, from) in placements {
        for r in aspect_rules(source) {
            let to = from.add(i32::from(r.nth) - 1);
            let class = if r.strength >= 1.0 {
                AspectClass::Full
            } else {
                AspectClass::Partial
            };
            let house = bhavas.house_of(to.start_deg() + 15.0);
            out.push(AspectRecord {
                source,
                target: AspectTarget::House(house),
                strength: r.strength,
                class,
            });
            for &(target, rashi) in placements {
                if target != source && rashi == to {
                    out.push(AspectRecord {
                        source,
                        target: AspectTarget::Graha(target),
                        strength: r.strength,
                        class,
                    });
                }
            }
        }
    }
    out
}

/// Total aspect strength received by each of the 7 planets from the other
/// 7 planets: `received[target][source]`.
pub fn planet_aspect_matrix(rashis: &[Rashi; 7]) -> [[f64; 7]; 7] {
    let mut m = [[0.0; 7]; 7];
    for (t, &to) in rashis.iter().enumerate() {
        for (s, &from) in rashis.iter().enumerate() {
            if s == t {
                continue;
            }
            let caster = crate::graha::SAPTA_GRAHAS[s];
            if let Some((strength, _)) = rashi_aspect(caster, from, to) {
                m[t][s] = strength;
            }
        }
    }
    m
}
