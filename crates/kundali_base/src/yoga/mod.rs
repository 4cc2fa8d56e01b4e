//! Yoga detection over a static catalog of named rules.
//!
//! Each rule is a plain predicate over a [`YogaSnapshot`]; [`detect_yogas`]
//! runs the whole [`YOGA_CATALOG`] in one pass. Adding a rule means adding a
//! row to the catalog.

mod catalog;
mod snapshot;

pub use catalog::{YOGA_CATALOG, YogaCategory, YogaRule};
pub use snapshot::{GrahaState, YogaSnapshot};

use serde::Serialize;

use crate::graha::Graha;

/// A chart element that took part in a yoga.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum YogaElement {
    Graha(Graha),
    House(u8),
}

/// Qualitative strength of a yoga from the shadbala verdicts of the planets
/// involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum YogaStrength {
    Strong,
    Moderate,
    Weak,
}

impl YogaStrength {
    /// All involved planets strong -> strong; some -> moderate; none -> weak.
    /// Nodes carry no shadbala and are ignored; a yoga of nodes alone is weak.
    pub fn classify(snapshot: &YogaSnapshot, elements: &[YogaElement]) -> Self {
        let verdicts: Vec<bool> = elements
            .iter()
            .filter_map(|e| match e {
                YogaElement::Graha(g) => snapshot.is_strong(*g),
                YogaElement::House(_) => None,
            })
            .collect();
        let strong = verdicts.iter().filter(|&&s| s).count();
        if strong == 0 {
            Self::Weak
        } else if strong == verdicts.len() {
            Self::Strong
        } else {
            Self::Moderate
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YogaMatch {
    pub id: &'static str,
    pub name: &'static str,
    pub category: YogaCategory,
    pub elements: Vec<YogaElement>,
    pub strength: YogaStrength,
}

/// Evaluate every catalog rule; matches come out in catalog order.
pub fn detect_yogas(snapshot: &YogaSnapshot) -> Vec<YogaMatch> {
    detect_with(YOGA_CATALOG, snapshot)
}

/// Evaluate an arbitrary rule set.
pub fn detect_with(rules: &[YogaRule], snapshot: &YogaSnapshot) -> Vec<YogaMatch> {
    rules
        .iter()
        .filter_map(|rule| {
            let mut elements = (rule.detect)(snapshot)?;
            elements.sort();
            elements.dedup();
            Some(YogaMatch {
                id: rule.id,
                name: rule.name,
                category: rule.category,
                strength: YogaStrength::classify(snapshot, &elements),
                elements,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bhava::{BhavaSystem, compute_bhavas};

    /// Lagna Mesha, whole-sign houses.
    fn snapshot(lons: [f64; 9], strong: [bool; 7]) -> YogaSnapshot {
        let bhavas = compute_bhavas(BhavaSystem::WholeSign, 5.0, None).unwrap();
        let bodies = lons.map(|l| (l, false));
        YogaSnapshot::new(&bhavas, &bodies, strong)
    }

    #[test]
    fn custom_rule_set_runs_without_touching_loop() {
        fn always(_: &YogaSnapshot) -> Option<Vec<YogaElement>> {
            Some(vec![YogaElement::Graha(Graha::Guru), YogaElement::House(1)])
        }
        let rules = [YogaRule {
            id: "always",
            name: "Always",
            category: YogaCategory::Other,
            detect: always,
        }];
        let snap = snapshot([0.0; 9], [true; 7]);
        let hits = detect_with(&rules, &snap);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].strength, YogaStrength::Strong);
    }

    #[test]
    fn strength_tag_mixes() {
        let mut strong = [false; 7];
        strong[Graha::Guru.index()] = true;
        let snap = snapshot([0.0; 9], strong);
        let both = [YogaElement::Graha(Graha::Guru), YogaElement::Graha(Graha::Chandra)];
        assert_eq!(YogaStrength::classify(&snap, &both), YogaStrength::Moderate);
        assert_eq!(YogaStrength::classify(&snap, &both[..1]), YogaStrength::Strong);
        assert_eq!(YogaStrength::classify(&snap, &both[1..]), YogaStrength::Weak);
        let node = [YogaElement::Graha(Graha::Rahu)];
        assert_eq!(YogaStrength::classify(&snap, &node), YogaStrength::Weak);
    }
}
