//! The built-in yoga rules.

use serde::Serialize;

use super::{YogaElement, YogaSnapshot};
use crate::graha::{Graha, SAPTA_GRAHAS, rashi_lord};
use crate::relationship::exaltation_rashi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum YogaCategory {
    Mahapurusha,
    Lunar,
    Solar,
    Raja,
    Dhana,
    Arishta,
    Other,
}

/// One catalog row. `detect` returns the elements that formed the yoga, or
/// `None` when the rule does not hold.
#[derive(Debug, Clone, Copy)]
pub struct YogaRule {
    pub id: &'static str,
    pub name: &'static str,
    pub category: YogaCategory,
    pub detect: fn(&YogaSnapshot) -> Option<Vec<YogaElement>>,
}

const fn rule(
    id: &'static str,
    name: &'static str,
    category: YogaCategory,
    detect: fn(&YogaSnapshot) -> Option<Vec<YogaElement>>,
) -> YogaRule {
    YogaRule { id, name, category, detect }
}

pub static YOGA_CATALOG: &[YogaRule] = &[
    rule("ruchaka", "Ruchaka", YogaCategory::Mahapurusha, ruchaka),
    rule("bhadra", "Bhadra", YogaCategory::Mahapurusha, bhadra),
    rule("hamsa", "Hamsa", YogaCategory::Mahapurusha, hamsa),
    rule("malavya", "Malavya", YogaCategory::Mahapurusha, malavya),
    rule("sasa", "Sasa", YogaCategory::Mahapurusha, sasa),
    rule("gaja_kesari", "Gaja Kesari", YogaCategory::Lunar, gaja_kesari),
    rule("chandra_mangala", "Chandra Mangala", YogaCategory::Lunar, chandra_mangala),
    rule("sunapha", "Sunapha", YogaCategory::Lunar, sunapha),
    rule("anapha", "Anapha", YogaCategory::Lunar, anapha),
    rule("durudhara", "Durudhara", YogaCategory::Lunar, durudhara),
    rule("adhi", "Adhi", YogaCategory::Lunar, adhi),
    rule("budha_aditya", "Budha Aditya", YogaCategory::Solar, budha_aditya),
    rule("vesi", "Vesi", YogaCategory::Solar, vesi),
    rule("vasi", "Vasi", YogaCategory::Solar, vasi),
    rule("ubhayachari", "Ubhayachari", YogaCategory::Solar, ubhayachari),
    rule("raja", "Raja", YogaCategory::Raja, raja),
    rule("yogakaraka", "Yogakaraka", YogaCategory::Raja, yogakaraka),
    rule("trikona_lord_in_kendra", "Trikona Lord in Kendra", YogaCategory::Raja, trikona_lord_in_kendra),
    rule("viparita_raja", "Viparita Raja", YogaCategory::Raja, viparita_raja),
    rule("neecha_bhanga", "Neecha Bhanga", YogaCategory::Raja, neecha_bhanga),
    rule("dhana", "Dhana", YogaCategory::Dhana, dhana),
    rule("amala", "Amala", YogaCategory::Other, amala),
    rule("parivartana", "Parivartana", YogaCategory::Other, parivartana),
    rule("kemadruma", "Kemadruma", YogaCategory::Arishta, kemadruma),
    rule("shakata", "Shakata", YogaCategory::Arishta, shakata),
];

/// The five true planets, which form the lunar and solar yogas.
const TARA: [Graha; 5] = [Graha::Mangal, Graha::Buddh, Graha::Guru, Graha::Shukra, Graha::Shani];
const BENEFICS: [Graha; 3] = [Graha::Buddh, Graha::Guru, Graha::Shukra];
const KENDRA_COUNTS: [u8; 4] = [1, 4, 7, 10];

fn grahas(list: impl IntoIterator<Item = Graha>) -> Vec<YogaElement> {
    list.into_iter().map(YogaElement::Graha).collect()
}

fn non_empty(v: Vec<YogaElement>) -> Option<Vec<YogaElement>> {
    (!v.is_empty()).then_some(v)
}

fn pair(a: Graha, b: Graha) -> Vec<YogaElement> {
    grahas([a, b])
}

/// Conjunction or mutual aspect.
fn associated(s: &YogaSnapshot, a: Graha, b: Graha) -> bool {
    s.conjoined(a, b) || (s.aspects(a, b) && s.aspects(b, a))
}

// ---------------------------------------------------------------------------
// Mahapurusha
// ---------------------------------------------------------------------------

fn mahapurusha(s: &YogaSnapshot, g: Graha) -> Option<Vec<YogaElement>> {
    (s.in_kendra(g) && s.is_own_or_exalted(g))
        .then(|| vec![YogaElement::Graha(g), YogaElement::House(s.bhava(g))])
}

fn ruchaka(s: &YogaSnapshot) -> Option<Vec<YogaElement>> {
    mahapurusha(s, Graha::Mangal)
}

fn bhadra(s: &YogaSnapshot) -> Option<Vec<YogaElement>> {
    mahapurusha(s, Graha::Buddh)
}

fn hamsa(s: &YogaSnapshot) -> Option<Vec<YogaElement>> {
    mahapurusha(s, Graha::Guru)
}

fn malavya(s: &YogaSnapshot) -> Option<Vec<YogaElement>> {
    mahapurusha(s, Graha::Shukra)
}

fn sasa(s: &YogaSnapshot) -> Option<Vec<YogaElement>> {
    mahapurusha(s, Graha::Shani)
}

// ---------------------------------------------------------------------------
// Lunar
// ---------------------------------------------------------------------------

fn tara_at(s: &YogaSnapshot, from: Graha, nth: u8) -> Vec<Graha> {
    TARA.into_iter().filter(|&g| s.count(from, g) == nth).collect()
}

fn gaja_kesari(s: &YogaSnapshot) -> Option<Vec<YogaElement>> {
    KENDRA_COUNTS
        .contains(&s.count(Graha::Chandra, Graha::Guru))
        .then(|| pair(Graha::Chandra, Graha::Guru))
}

fn chandra_mangala(s: &YogaSnapshot) -> Option<Vec<YogaElement>> {
    s.conjoined(Graha::Chandra, Graha::Mangal)
        .then(|| pair(Graha::Chandra, Graha::Mangal))
}

fn flanking(s: &YogaSnapshot, center: Graha, second: bool, twelfth: bool) -> Option<Vec<YogaElement>> {
    let after = tara_at(s, center, 2);
    let before = tara_at(s, center, 12);
    if after.is_empty() != !second || before.is_empty() != !twelfth {
        return None;
    }
    Some(grahas(std::iter::once(center).chain(after).chain(before)))
}

fn sunapha(s: &YogaSnapshot) -> Option<Vec<YogaElement>> {
    flanking(s, Graha::Chandra, true, false)
}

fn anapha(s: &YogaSnapshot) -> Option<Vec<YogaElement>> {
    flanking(s, Graha::Chandra, false, true)
}

fn durudhara(s: &YogaSnapshot) -> Option<Vec<YogaElement>> {
    flanking(s, Graha::Chandra, true, true)
}

/// At least two natural benefics in the 6th, 7th or 8th from the Moon.
fn adhi(s: &YogaSnapshot) -> Option<Vec<YogaElement>> {
    let hits: Vec<Graha> = BENEFICS
        .into_iter()
        .filter(|&g| matches!(s.count(Graha::Chandra, g), 6..=8))
        .collect();
    (hits.len() >= 2).then(|| grahas(std::iter::once(Graha::Chandra).chain(hits)))
}

// ---------------------------------------------------------------------------
// Solar
// ---------------------------------------------------------------------------

fn budha_aditya(s: &YogaSnapshot) -> Option<Vec<YogaElement>> {
    s.conjoined(Graha::Surya, Graha::Buddh)
        .then(|| pair(Graha::Surya, Graha::Buddh))
}

fn vesi(s: &YogaSnapshot) -> Option<Vec<YogaElement>> {
    flanking(s, Graha::Surya, true, false)
}

fn vasi(s: &YogaSnapshot) -> Option<Vec<YogaElement>> {
    flanking(s, Graha::Surya, false, true)
}

fn ubhayachari(s: &YogaSnapshot) -> Option<Vec<YogaElement>> {
    flanking(s, Graha::Surya, true, true)
}

// ---------------------------------------------------------------------------
// Raja and dhana
// ---------------------------------------------------------------------------

/// Lord of a kendra (4, 7, 10) associated with the lord of a trikona (5, 9).
fn raja(s: &YogaSnapshot) -> Option<Vec<YogaElement>> {
    let mut out = Vec::new();
    for k in [4u8, 7, 10] {
        for t in [5u8, 9] {
            let (lk, lt) = (s.house_lord(k), s.house_lord(t));
            if lk != lt && associated(s, lk, lt) {
                out.extend(pair(lk, lt));
                out.extend([YogaElement::House(k), YogaElement::House(t)]);
            }
        }
    }
    non_empty(out)
}

/// A single planet ruling both a kendra (4, 7, 10) and a trikona (5, 9).
fn yogakaraka(s: &YogaSnapshot) -> Option<Vec<YogaElement>> {
    let mut out = Vec::new();
    for k in [4u8, 7, 10] {
        for t in [5u8, 9] {
            let lord = s.house_lord(k);
            if lord == s.house_lord(t) {
                out.extend([YogaElement::Graha(lord), YogaElement::House(k), YogaElement::House(t)]);
            }
        }
    }
    non_empty(out)
}

fn trikona_lord_in_kendra(s: &YogaSnapshot) -> Option<Vec<YogaElement>> {
    let mut out = Vec::new();
    for t in [5u8, 9] {
        let lord = s.house_lord(t);
        if s.in_kendra(lord) {
            out.extend([
                YogaElement::Graha(lord),
                YogaElement::House(t),
                YogaElement::House(s.bhava(lord)),
            ]);
        }
    }
    non_empty(out)
}

/// Lord of a dusthana (6, 8, 12) placed in a dusthana.
fn viparita_raja(s: &YogaSnapshot) -> Option<Vec<YogaElement>> {
    let mut out = Vec::new();
    for h in [6u8, 8, 12] {
        let lord = s.house_lord(h);
        if s.in_dusthana(lord) {
            out.extend([YogaElement::Graha(lord), YogaElement::House(h)]);
        }
    }
    non_empty(out)
}

/// A debilitated planet whose dispositor or exaltation-sign lord stands in
/// a kendra from the Lagna or the Moon.
fn neecha_bhanga(s: &YogaSnapshot) -> Option<Vec<YogaElement>> {
    let angular = |g: Graha| s.in_kendra(g) || KENDRA_COUNTS.contains(&s.count(Graha::Chandra, g));
    let mut out = Vec::new();
    for g in SAPTA_GRAHAS {
        if !s.is_debilitated(g) {
            continue;
        }
        let dispositor = rashi_lord(s.rashi(g));
        let exalt_lord = exaltation_rashi(g).map(rashi_lord);
        for canceller in std::iter::once(dispositor).chain(exalt_lord) {
            if angular(canceller) {
                out.extend(pair(g, canceller));
            }
        }
    }
    non_empty(out)
}

/// Lords of the 2nd and 11th associated.
fn dhana(s: &YogaSnapshot) -> Option<Vec<YogaElement>> {
    let (l2, l11) = (s.house_lord(2), s.house_lord(11));
    (l2 != l11 && associated(s, l2, l11)).then(|| {
        let mut v = pair(l2, l11);
        v.extend([YogaElement::House(2), YogaElement::House(11)]);
        v
    })
}

// ---------------------------------------------------------------------------
// Other
// ---------------------------------------------------------------------------

/// A natural benefic in the 10th from the Lagna or from the Moon.
fn amala(s: &YogaSnapshot) -> Option<Vec<YogaElement>> {
    let hits = BENEFICS
        .into_iter()
        .filter(|&g| s.bhava(g) == 10 || s.count(Graha::Chandra, g) == 10);
    non_empty(grahas(hits))
}

/// Two planets each in a sign ruled by the other.
fn parivartana(s: &YogaSnapshot) -> Option<Vec<YogaElement>> {
    let mut out = Vec::new();
    for (i, &a) in SAPTA_GRAHAS.iter().enumerate() {
        for &b in &SAPTA_GRAHAS[i + 1..] {
            if rashi_lord(s.rashi(a)) == b && rashi_lord(s.rashi(b)) == a {
                out.extend(pair(a, b));
            }
        }
    }
    non_empty(out)
}

/// Moon isolated: nothing in the 2nd, 12th or with the Moon, and no aspect
/// on it from the five true planets.
fn kemadruma(s: &YogaSnapshot) -> Option<Vec<YogaElement>> {
    let m = Graha::Chandra;
    let isolated = TARA
        .into_iter()
        .all(|g| !matches!(s.count(m, g), 1 | 2 | 12) && !s.aspects(g, m));
    isolated.then(|| vec![YogaElement::Graha(m)])
}

/// Moon in the 6th or 8th from Jupiter, not in a kendra from the Lagna.
fn shakata(s: &YogaSnapshot) -> Option<Vec<YogaElement>> {
    (matches!(s.count(Graha::Guru, Graha::Chandra), 6 | 8) && !s.in_kendra(Graha::Chandra))
        .then(|| pair(Graha::Guru, Graha::Chandra))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bhava::{BhavaSystem, compute_bhavas};
    use crate::yoga::{YogaStrength, detect_yogas};

    /// Lagna in Mesha, whole-sign houses. Longitudes in ALL_GRAHAS order.
    fn snap(lons: [f64; 9]) -> YogaSnapshot {
        let bhavas = compute_bhavas(BhavaSystem::WholeSign, 5.0, None).unwrap();
        YogaSnapshot::new(&bhavas, &lons.map(|l| (l, false)), [false; 7])
    }

    fn ids(s: &YogaSnapshot) -> Vec<&'static str> {
        detect_yogas(s).into_iter().map(|m| m.id).collect()
    }

    //                 Sun    Moon   Mars   Merc   Jup    Ven    Sat    Rahu   Ketu
    const BASE: [f64; 9] = [40.0, 100.0, 160.0, 70.0, 220.0, 250.0, 130.0, 20.0, 200.0];

    #[test]
    fn catalog_ids_unique() {
        let mut ids: Vec<_> = YOGA_CATALOG.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        let n = ids.len();
        ids.dedup();
        assert_eq!(ids.len(), n);
    }

    #[test]
    fn house_lords_from_mesha_lagna() {
        let s = snap(BASE);
        assert_eq!(s.house_lord(1), Graha::Mangal);
        assert_eq!(s.house_lord(10), Graha::Shani);
        assert_eq!(s.house_lord(12), Graha::Guru);
        assert_eq!(s.house_lord(0), s.house_lord(12));
    }

    #[test]
    fn hamsa_for_jupiter_in_cancer_kendra() {
        let mut lons = BASE;
        lons[4] = 95.0; // Karka, 4th house, exalted
        let s = snap(lons);
        let hit = detect_yogas(&s).into_iter().find(|m| m.id == "hamsa").unwrap();
        assert_eq!(
            hit.elements,
            vec![YogaElement::Graha(Graha::Guru), YogaElement::House(4)]
        );
        assert_eq!(hit.strength, YogaStrength::Weak);
    }

    #[test]
    fn gaja_kesari_needs_kendra_from_moon() {
        let mut lons = BASE;
        lons[4] = 100.0 + 180.0; // 7th from the Moon
        assert!(ids(&snap(lons)).contains(&"gaja_kesari"));
        lons[4] = 100.0 + 30.0; // 2nd from the Moon
        assert!(!ids(&snap(lons)).contains(&"gaja_kesari"));
    }

    #[test]
    fn budha_aditya_on_conjunction() {
        let mut lons = BASE;
        lons[3] = 45.0;
        assert!(ids(&snap(lons)).contains(&"budha_aditya"));
        assert!(!ids(&snap(BASE)).contains(&"budha_aditya"));
    }

    #[test]
    fn kemadruma_when_moon_isolated() {
        // Moon in Karka throughout.
        // Everyone in Mesha: Mars's 4th aspect lands on Karka.
        let aspected = [0.0, 100.0, 10.0, 5.0, 15.0, 8.0, 12.0, 0.0, 180.0];
        assert!(!ids(&snap(aspected)).contains(&"kemadruma"));
        // Everyone in Vrishabha: Saturn's 3rd aspect lands on Karka.
        let saturn_aspect = [0.0, 100.0, 40.0, 35.0, 45.0, 38.0, 42.0, 0.0, 180.0];
        assert!(!ids(&snap(saturn_aspect)).contains(&"kemadruma"));
        // Mars in Simha, the 2nd from the Moon.
        let flanked = [0.0, 100.0, 130.0, 200.0, 200.0, 200.0, 200.0, 0.0, 180.0];
        assert!(!ids(&snap(flanked)).contains(&"kemadruma"));
        // Everyone in Kanya: no aspect from there reaches Karka.
        let isolated = [0.0, 100.0, 160.0, 165.0, 170.0, 175.0, 155.0, 0.0, 180.0];
        assert!(ids(&snap(isolated)).contains(&"kemadruma"));
    }

    #[test]
    fn parivartana_mars_venus_exchange() {
        let mut lons = BASE;
        lons[2] = 35.0; // Mars in Vrishabha (Venus's sign)
        lons[5] = 5.0; // Venus in Mesha (Mars's sign)
        let hit = detect_yogas(&snap(lons))
            .into_iter()
            .find(|m| m.id == "parivartana")
            .unwrap();
        assert_eq!(hit.elements, pair(Graha::Mangal, Graha::Shukra));
    }

    #[test]
    fn yogakaraka_for_saturn_from_vrishabha() {
        let bhavas = compute_bhavas(BhavaSystem::WholeSign, 35.0, None).unwrap();
        let s = YogaSnapshot::new(&bhavas, &BASE.map(|l| (l, false)), [false; 7]);
        let hit = detect_yogas(&s).into_iter().find(|m| m.id == "yogakaraka").unwrap();
        // Saturn rules the 9th (Makara) and 10th (Kumbha) from Vrishabha.
        assert!(hit.elements.contains(&YogaElement::Graha(Graha::Shani)));
        assert!(hit.elements.contains(&YogaElement::House(10)));
        assert!(hit.elements.contains(&YogaElement::House(9)));
    }
}
