//! Ashtakavarga: benefic points (bindus) per rashi.
//!
//! Each of the 7 planets receives a bhinna (individual) chart to which the 7
//! planets and the Lagna contribute bindus by their offset from each rashi.
//! The sarva chart is the rashi-wise sum. Per-planet totals are fixed by the
//! rule table regardless of placements:
//! Sun 48, Moon 49, Mars 39, Mercury 54, Jupiter 56, Venus 52, Saturn 39 (337).

use serde::Serialize;

use crate::graha::{Graha, SAPTA_GRAHAS, rashi_lord};
use crate::rashi::{ALL_RASHIS, Rashi, count_from};

/// Bitmask of 1-based offsets.
const fn bits(offsets: &[u8]) -> u16 {
    let mut mask = 0u16;
    let mut i = 0;
    while i < offsets.len() {
        mask |= 1u16 << offsets[i];
        i += 1;
    }
    mask
}

/// `RULES[target][contributor]`; contributors are Sun..Saturn then Lagna.
const RULES: [[u16; 8]; 7] = [
    [
        bits(&[1, 2, 4, 7, 8, 9, 10, 11]),
        bits(&[3, 6, 10, 11]),
        bits(&[1, 2, 4, 7, 8, 9, 10, 11]),
        bits(&[3, 5, 6, 9, 10, 11, 12]),
        bits(&[5, 6, 9, 11]),
        bits(&[6, 7, 12]),
        bits(&[1, 2, 4, 7, 8, 9, 10, 11]),
        bits(&[3, 4, 6, 10, 11, 12]),
    ],
    [
        bits(&[3, 6, 7, 8, 10, 11]),
        bits(&[1, 3, 6, 7, 10, 11]),
        bits(&[2, 3, 5, 6, 9, 10, 11]),
        bits(&[1, 3, 4, 5, 7, 8, 10, 11]),
        bits(&[1, 4, 7, 8, 10, 11, 12]),
        bits(&[3, 4, 5, 7, 9, 10, 11]),
        bits(&[3, 5, 6, 11]),
        bits(&[3, 6, 10, 11]),
    ],
    [
        bits(&[3, 5, 6, 10, 11]),
        bits(&[3, 6, 11]),
        bits(&[1, 2, 4, 7, 8, 10, 11]),
        bits(&[3, 5, 6, 11]),
        bits(&[6, 10, 11, 12]),
        bits(&[6, 8, 11, 12]),
        bits(&[1, 4, 7, 8, 9, 10, 11]),
        bits(&[1, 3, 6, 10, 11]),
    ],
    [
        bits(&[5, 6, 9, 11, 12]),
        bits(&[2, 4, 6, 8, 10, 11]),
        bits(&[1, 2, 4, 7, 8, 9, 10, 11]),
        bits(&[1, 3, 5, 6, 9, 10, 11, 12]),
        bits(&[6, 8, 11, 12]),
        bits(&[1, 2, 3, 4, 5, 8, 9, 11]),
        bits(&[1, 2, 4, 7, 8, 9, 10, 11]),
        bits(&[1, 2, 4, 6, 8, 10, 11]),
    ],
    [
        bits(&[1, 2, 3, 4, 7, 8, 9, 10, 11]),
        bits(&[2, 5, 7, 9, 11]),
        bits(&[1, 2, 4, 7, 8, 10, 11]),
        bits(&[1, 2, 4, 5, 6, 9, 10, 11]),
        bits(&[1, 2, 3, 4, 7, 8, 10, 11]),
        bits(&[2, 5, 6, 9, 10, 11]),
        bits(&[3, 5, 6, 12]),
        bits(&[1, 2, 4, 5, 6, 7, 9, 10, 11]),
    ],
    [
        bits(&[8, 11, 12]),
        bits(&[1, 2, 3, 4, 5, 8, 9, 11, 12]),
        bits(&[3, 4, 6, 9, 11, 12]),
        bits(&[3, 5, 6, 9, 11]),
        bits(&[5, 8, 9, 10, 11]),
        bits(&[1, 2, 3, 4, 5, 8, 9, 10, 11]),
        bits(&[3, 4, 5, 8, 9, 10, 11]),
        bits(&[1, 2, 3, 4, 5, 8, 9, 11]),
    ],
    [
        bits(&[1, 2, 4, 7, 8, 10, 11]),
        bits(&[3, 6, 11]),
        bits(&[3, 5, 6, 10, 11, 12]),
        bits(&[6, 8, 9, 10, 11, 12]),
        bits(&[5, 6, 11, 12]),
        bits(&[6, 11, 12]),
        bits(&[3, 5, 6, 11]),
        bits(&[1, 3, 4, 6, 10, 11]),
    ],
];

pub const BHINNA_TOTALS: [u8; 7] = [48, 49, 39, 54, 56, 52, 39];
pub const SARVA_TOTAL: u16 = 337;

/// Rashis ruled by the same planet (Sun and Moon own one sign each).
const SAME_LORD_PAIRS: [(Rashi, Rashi); 5] = [
    (Rashi::Mesha, Rashi::Vrischika),
    (Rashi::Vrishabha, Rashi::Tula),
    (Rashi::Mithuna, Rashi::Kanya),
    (Rashi::Dhanu, Rashi::Meena),
    (Rashi::Makara, Rashi::Kumbha),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BhinnaAshtakavarga {
    pub graha: Graha,
    /// Bindus per rashi, Mesha..Meena, each 0..=8.
    pub bindus: [u8; 12],
    /// Bindus after trikona then ekadhipatya sodhana.
    pub reduced: [u8; 12],
}

impl BhinnaAshtakavarga {
    pub fn total(&self) -> u8 {
        self.bindus.iter().sum()
    }

    pub fn in_rashi(&self, rashi: Rashi) -> u8 {
        self.bindus[rashi.index() as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SarvaAshtakavarga {
    pub bindus: [u8; 12],
    /// Sum of the reduced bhinna charts.
    pub reduced: [u8; 12],
}

impl SarvaAshtakavarga {
    pub fn total(&self) -> u16 {
        self.bindus.iter().map(|&b| u16::from(b)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ashtakavarga {
    pub bhinna: [BhinnaAshtakavarga; 7],
    pub sarva: SarvaAshtakavarga,
}

/// Raw bindus for one target planet.
pub fn bhinna_bindus(target: Graha, planet_rashis: &[Rashi; 7], lagna: Rashi) -> [u8; 12] {
    let rules = &RULES[target.index()];
    let contributors = planet_rashis.iter().copied().chain(std::iter::once(lagna));
    let mut bindus = [0u8; 12];
    for (mask, from) in rules.iter().zip(contributors) {
        for rashi in ALL_RASHIS {
            if (*mask >> count_from(from, rashi)) & 1 == 1 {
                bindus[rashi.index() as usize] += 1;
            }
        }
    }
    bindus
}

/// Subtract the smallest value of each fire/earth/air/water triangle.
pub fn trikona_sodhana(bindus: &[u8; 12]) -> [u8; 12] {
    let mut out = *bindus;
    for start in 0..4 {
        let group = [start, start + 4, start + 8];
        let min = group.iter().map(|&i| out[i]).min().unwrap_or(0);
        for i in group {
            out[i] -= min;
        }
    }
    out
}

/// Reduce pairs of rashis sharing a lord.
///
/// Nothing happens when both rashis are occupied by planets. When neither
/// is occupied, both drop to the smaller value, or to zero when equal. When
/// one is occupied, the empty one drops to zero if it holds fewer bindus,
/// otherwise to the occupied one's count.
pub fn ekadhipatya_sodhana(bindus: &[u8; 12], planet_rashis: &[Rashi; 7]) -> [u8; 12] {
    let occupied = |r: Rashi| planet_rashis.contains(&r);
    let mut out = *bindus;
    for (a, b) in SAME_LORD_PAIRS {
        debug_assert_eq!(rashi_lord(a), rashi_lord(b));
        let (ia, ib) = (a.index() as usize, b.index() as usize);
        let (va, vb) = (out[ia], out[ib]);
        if va == 0 || vb == 0 {
            continue;
        }
        match (occupied(a), occupied(b)) {
            (true, true) => {}
            (false, false) => {
                let v = if va == vb { 0 } else { va.min(vb) };
                out[ia] = v;
                out[ib] = v;
            }
            (true, false) => out[ib] = if vb < va { 0 } else { va },
            (false, true) => out[ia] = if va < vb { 0 } else { vb },
        }
    }
    out
}

/// Bhinna and sarva ashtakavarga for a chart.
pub fn ashtakavarga(planet_rashis: &[Rashi; 7], lagna: Rashi) -> Ashtakavarga {
    let bhinna: [BhinnaAshtakavarga; 7] = std::array::from_fn(|i| {
        let graha = SAPTA_GRAHAS[i];
        let bindus = bhinna_bindus(graha, planet_rashis, lagna);
        let reduced = ekadhipatya_sodhana(&trikona_sodhana(&bindus), planet_rashis);
        BhinnaAshtakavarga { graha, bindus, reduced }
    });
    let mut sarva = SarvaAshtakavarga { bindus: [0; 12], reduced: [0; 12] };
    for b in &bhinna {
        for i in 0..12 {
            sarva.bindus[i] += b.bindus[i];
            sarva.reduced[i] += b.reduced[i];
        }
    }
    Ashtakavarga { bhinna, sarva }
}
