//! Immutable view of a chart that yoga rules query.

use crate::bhava::{BhavaSet, house_index};
use crate::drishti::rashi_aspect;
use crate::graha::{ALL_GRAHAS, Graha, rashi_lord};
use crate::rashi::{Rashi, count_from, rashi_of};
use crate::relationship::{debilitation_rashi, exaltation_rashi, own_rashis};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrahaState {
    pub graha: Graha,
    pub longitude_deg: f64,
    pub rashi: Rashi,
    /// House number, 1..=12.
    pub bhava: u8,
    pub retrograde: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YogaSnapshot {
    pub lagna: Rashi,
    /// Indexed like [`ALL_GRAHAS`].
    pub grahas: [GrahaState; 9],
    /// Rashi holding each house cusp; its lord is the house lord.
    pub house_rashis: [Rashi; 12],
    /// Shadbala classification of Sun..Saturn.
    pub strong: [bool; 7],
}

impl YogaSnapshot {
    /// `bodies` holds (sidereal longitude, retrograde) per graha in
    /// [`ALL_GRAHAS`] order.
    pub fn new(bhavas: &BhavaSet, bodies: &[(f64, bool); 9], strong: [bool; 7]) -> Self {
        let grahas = std::array::from_fn(|i| {
            let (lon, retrograde) = bodies[i];
            GrahaState {
                graha: ALL_GRAHAS[i],
                longitude_deg: lon,
                rashi: rashi_of(lon),
                bhava: bhavas.house_of(lon),
                retrograde,
            }
        });
        let house_rashis = std::array::from_fn(|i| rashi_of(bhavas.cusp(i as u8 + 1)));
        Self {
            lagna: rashi_of(bhavas.ascendant_deg),
            grahas,
            house_rashis,
            strong,
        }
    }

    pub fn state(&self, g: Graha) -> &GrahaState {
        &self.grahas[g.index()]
    }

    pub fn rashi(&self, g: Graha) -> Rashi {
        self.state(g).rashi
    }

    pub fn bhava(&self, g: Graha) -> u8 {
        self.state(g).bhava
    }

    /// Lord of house `house` (1-based, cyclic).
    pub fn house_lord(&self, house: u8) -> Graha {
        rashi_lord(self.house_rashis[house_index(house)])
    }

    /// Sign count from `from` to `to`, the same sign being 1.
    pub fn count(&self, from: Graha, to: Graha) -> u8 {
        count_from(self.rashi(from), self.rashi(to))
    }

    pub fn conjoined(&self, a: Graha, b: Graha) -> bool {
        a != b && self.rashi(a) == self.rashi(b)
    }

    /// Whether `caster` throws any rashi aspect on `target`.
    pub fn aspects(&self, caster: Graha, target: Graha) -> bool {
        caster != target && rashi_aspect(caster, self.rashi(caster), self.rashi(target)).is_some()
    }

    pub fn in_kendra(&self, g: Graha) -> bool {
        matches!(self.bhava(g), 1 | 4 | 7 | 10)
    }

    pub fn in_dusthana(&self, g: Graha) -> bool {
        matches!(self.bhava(g), 6 | 8 | 12)
    }

    pub fn is_own_or_exalted(&self, g: Graha) -> bool {
        let r = self.rashi(g);
        exaltation_rashi(g) == Some(r) || own_rashis(g).contains(&r)
    }

    pub fn is_debilitated(&self, g: Graha) -> bool {
        debilitation_rashi(g) == Some(self.rashi(g))
    }

    /// Grahas other than `g` in the same sign.
    pub fn companions(&self, g: Graha) -> impl Iterator<Item = Graha> + '_ {
        ALL_GRAHAS.into_iter().filter(move |&o| self.conjoined(g, o))
    }

    pub fn is_strong(&self, g: Graha) -> Option<bool> {
        self.strong.get(g.index()).copied()
    }
}
