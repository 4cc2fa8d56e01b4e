//! Serialized chart output.
//!
//! Every number carries its unit, and anything that depends on an unknown
//! birth time is tagged `"approximate": true`. Field order is fixed and no
//! maps are used, so identical inputs produce byte-identical JSON.

use kundali_base::amsha::is_vargottama;
use kundali_base::dasha::DashaTree;
use kundali_base::drishti::{AspectClass, AspectTarget};
use kundali_base::nakshatra::Nakshatra;
use kundali_base::rashi::Rashi;
use kundali_base::relationship::{CompoundRelation, NaturalRelation, TemporalRelation};
use kundali_base::shadbala::ShadbalaEntry;
use kundali_base::yoga::YogaMatch;
use kundali_base::{DashaLevel, Dignity, Graha, rashi_lord};
use serde::Serialize;

use crate::chart::{ChartResult, Motion};
use crate::error::ChartError;
use crate::strength::StrengthReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Degrees,
    DegreesPerDay,
    AstronomicalUnits,
    Days,
    JulianDay,
    Rupas,
    Shashtiamsas,
    Bindus,
    /// Dimensionless share of full strength, 0..=1.
    Fraction,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// A number with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Measure {
    pub value: f64,
    pub unit: Unit,
    #[serde(skip_serializing_if = "is_false")]
    pub approximate: bool,
}

impl Measure {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self {
            value,
            unit,
            approximate: false,
        }
    }

    pub fn deg(value: f64) -> Self {
        Self::new(value, Unit::Degrees)
    }

    pub fn tagged(mut self, approximate: bool) -> Self {
        self.approximate = approximate;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstantReport {
    pub civil: String,
    pub jd_ut: Measure,
    pub jd_tt: Measure,
    pub latitude: Measure,
    pub longitude: Measure,
    pub local_sidereal_time: Measure,
    pub time_unknown: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyReport {
    pub graha: Graha,
    pub longitude: Measure,
    pub tropical_longitude: Measure,
    pub latitude: Measure,
    pub distance: Measure,
    pub speed: Measure,
    pub motion: Motion,
    pub retrograde: bool,
    pub declination: Measure,
    pub rashi: Rashi,
    pub degrees_in_rashi: Measure,
    pub nakshatra: Nakshatra,
    pub pada: u8,
    /// Same rashi in D1 and D9.
    pub vargottama: bool,
    /// Rashi, nakshatra, pada, vargottama and dignity may be off.
    #[serde(skip_serializing_if = "is_false")]
    pub placement_approximate: bool,
    pub house: u8,
    #[serde(skip_serializing_if = "is_false")]
    pub house_approximate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dignity: Option<Dignity>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CuspReport {
    pub house: u8,
    pub longitude: Measure,
    pub rashi: Rashi,
    #[serde(skip_serializing_if = "is_false")]
    pub approximate: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VargaPlacementReport {
    pub graha: Graha,
    pub longitude: Measure,
    pub rashi: Rashi,
    #[serde(skip_serializing_if = "is_false")]
    pub approximate: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VargaReport {
    pub division: String,
    pub ascendant: Measure,
    pub ascendant_rashi: Rashi,
    pub placements: Vec<VargaPlacementReport>,
    /// The ascendant and its rashi may be off.
    #[serde(skip_serializing_if = "is_false")]
    pub approximate: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AspectReport {
    pub source: Graha,
    pub target: AspectTarget,
    pub strength: Measure,
    pub class: AspectClass,
    #[serde(skip_serializing_if = "is_false")]
    pub approximate: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationReport {
    pub of: Graha,
    pub toward: Graha,
    pub natural: NaturalRelation,
    pub temporal: TemporalRelation,
    pub compound: CompoundRelation,
    #[serde(skip_serializing_if = "is_false")]
    pub approximate: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashaPeriodReport {
    pub ruler: Graha,
    pub level: DashaLevel,
    pub start: Measure,
    pub end: Measure,
    pub duration: Measure,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DashaPeriodReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashaReport {
    pub system: &'static str,
    pub birth_nakshatra: Nakshatra,
    pub balance_at_birth: Measure,
    pub max_depth: u8,
    pub window_start: Measure,
    pub window_end: Measure,
    pub periods: Vec<DashaPeriodReport>,
    #[serde(skip_serializing_if = "is_false")]
    pub approximate: bool,
}

impl DashaReport {
    pub fn from_tree(tree: &DashaTree, approximate: bool) -> Self {
        fn node(tree: &DashaTree, id: usize, approx: bool) -> DashaPeriodReport {
            let n = tree.node(id);
            let p = n.period;
            DashaPeriodReport {
                ruler: p.ruler,
                level: p.level,
                start: Measure::new(p.start_jd, Unit::JulianDay).tagged(approx),
                end: Measure::new(p.end_jd, Unit::JulianDay).tagged(approx),
                duration: Measure::new(p.duration_days(), Unit::Days).tagged(approx),
                children: n.children.iter().map(|&c| node(tree, c, approx)).collect(),
            }
        }
        let balance = &tree.balance;
        Self {
            system: "vimshottari",
            birth_nakshatra: balance.nakshatra,
            balance_at_birth: Measure::new(balance.balance_days, Unit::Days).tagged(approximate),
            max_depth: tree.max_depth,
            window_start: Measure::new(tree.window_start, Unit::JulianDay),
            window_end: Measure::new(tree.window_end, Unit::JulianDay),
            periods: tree.root_ids().iter().map(|&id| node(tree, id, approximate)).collect(),
            approximate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SthanaReport {
    pub uchcha: Measure,
    pub saptavargaja: Measure,
    pub ojhayugma: Measure,
    pub kendradi: Measure,
    pub drekkana: Measure,
    pub total: Measure,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KalaReport {
    pub nathonnatha: Measure,
    pub paksha: Measure,
    pub tribhaga: Measure,
    pub abda: Measure,
    pub masa: Measure,
    pub vara: Measure,
    pub hora: Measure,
    pub ayana: Measure,
    pub yuddha: Measure,
    pub total: Measure,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShadbalaReport {
    pub graha: Graha,
    pub sthana: SthanaReport,
    pub dig: Measure,
    pub kala: KalaReport,
    pub cheshta: Measure,
    pub naisargika: Measure,
    pub drik: Measure,
    pub total: Measure,
    pub total_rupas: Measure,
    pub required_rupas: Measure,
    pub is_strong: bool,
}

impl ShadbalaReport {
    fn from_entry(e: &ShadbalaEntry, approx: bool) -> Self {
        let s = |v: f64| Measure::new(v, Unit::Shashtiamsas).tagged(approx);
        let r = |v: f64| Measure::new(v, Unit::Rupas).tagged(approx);
        Self {
            graha: e.graha,
            sthana: SthanaReport {
                uchcha: s(e.sthana.uchcha),
                saptavargaja: s(e.sthana.saptavargaja),
                ojhayugma: s(e.sthana.ojhayugma),
                kendradi: s(e.sthana.kendradi),
                drekkana: s(e.sthana.drekkana),
                total: s(e.sthana.total),
            },
            dig: s(e.dig),
            kala: KalaReport {
                nathonnatha: s(e.kala.nathonnatha),
                paksha: s(e.kala.paksha),
                tribhaga: s(e.kala.tribhaga),
                abda: s(e.kala.abda),
                masa: s(e.kala.masa),
                vara: s(e.kala.vara),
                hora: s(e.kala.hora),
                ayana: s(e.kala.ayana),
                yuddha: s(e.kala.yuddha),
                total: s(e.kala.total),
            },
            cheshta: s(e.cheshta),
            naisargika: Measure::new(e.naisargika, Unit::Shashtiamsas),
            drik: s(e.drik),
            total: s(e.total_shashtiamsas),
            total_rupas: r(e.total_rupas()),
            required_rupas: Measure::new(e.required_shashtiamsas / 60.0, Unit::Rupas),
            is_strong: e.is_strong,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinduGrid {
    pub unit: Unit,
    /// Mesha..Meena.
    pub cells: Vec<u8>,
    pub reduced: Vec<u8>,
    pub total: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BhinnaReport {
    pub graha: Graha,
    pub grid: BinduGrid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrengthSection {
    pub shadbala: Vec<ShadbalaReport>,
    pub bhinna_ashtakavarga: Vec<BhinnaReport>,
    pub sarva_ashtakavarga: BinduGrid,
    #[serde(skip_serializing_if = "is_false")]
    pub approximate: bool,
}

impl StrengthSection {
    pub fn new(strength: &StrengthReport, approximate: bool) -> Self {
        let a = &strength.ashtakavarga;
        Self {
            shadbala: strength
                .shadbala
                .iter()
                .map(|e| ShadbalaReport::from_entry(e, approximate))
                .collect(),
            bhinna_ashtakavarga: a
                .bhinna
                .iter()
                .map(|b| BhinnaReport {
                    graha: b.graha,
                    grid: BinduGrid {
                        unit: Unit::Bindus,
                        cells: b.bindus.to_vec(),
                        reduced: b.reduced.to_vec(),
                        total: u16::from(b.total()),
                    },
                })
                .collect(),
            sarva_ashtakavarga: BinduGrid {
                unit: Unit::Bindus,
                cells: a.sarva.bindus.to_vec(),
                reduced: a.sarva.reduced.to_vec(),
                total: a.sarva.total(),
            },
            approximate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YogaSection {
    pub matches: Vec<YogaMatch>,
    #[serde(skip_serializing_if = "is_false")]
    pub approximate: bool,
}

/// Everything about one chart in export form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartReport {
    pub instant: InstantReport,
    pub provider_version: String,
    pub ayanamsha: &'static str,
    pub ayanamsha_value: Measure,
    pub house_system: &'static str,
    pub ascendant: Measure,
    pub midheaven: Measure,
    pub bodies: Vec<BodyReport>,
    pub cusps: Vec<CuspReport>,
    pub divisional_charts: Vec<VargaReport>,
    pub aspects: Vec<AspectReport>,
    pub relationships: Vec<RelationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dasha: Option<DashaReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<StrengthSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yogas: Option<YogaSection>,
}

impl ChartReport {
    pub fn new(chart: &ChartResult) -> Self {
        let approx = chart.approximate;
        // Only the Moon moves far enough over an unknown half day (up to ~7
        // degrees) to change its rashi or nakshatra.
        let moving = |g: Graha| approx && g == Graha::Chandra;
        let inst = &chart.instant;
        let loc = inst.location();
        let bodies = chart
            .bodies
            .iter()
            .map(|b| {
                let moving = moving(b.graha);
                // Dignity also reads the temporal relation with the rashi lord.
                let placement = moving
                    || (approx && b.dignity.is_some() && rashi_lord(b.rashi) == Graha::Chandra);
                BodyReport {
                    graha: b.graha,
                    longitude: Measure::deg(b.sidereal_longitude_deg).tagged(moving),
                    tropical_longitude: Measure::deg(b.tropical_longitude_deg).tagged(moving),
                    latitude: Measure::deg(b.latitude_deg).tagged(moving),
                    distance: Measure::new(b.distance_au, Unit::AstronomicalUnits),
                    speed: Measure::new(b.speed_deg_per_day, Unit::DegreesPerDay),
                    motion: b.motion,
                    retrograde: b.is_retrograde(),
                    declination: Measure::deg(b.declination_deg).tagged(moving),
                    rashi: b.rashi,
                    degrees_in_rashi: Measure::deg(b.degrees_in_rashi).tagged(moving),
                    nakshatra: b.nakshatra,
                    pada: b.pada,
                    vargottama: is_vargottama(b.sidereal_longitude_deg),
                    placement_approximate: placement,
                    house: b.bhava,
                    house_approximate: approx,
                    dignity: b.dignity,
                }
            })
            .collect();
        let cusps = chart
            .bhavas
            .cusps
            .iter()
            .enumerate()
            .map(|(i, &c)| CuspReport {
                house: i as u8 + 1,
                longitude: Measure::deg(c).tagged(approx),
                rashi: kundali_base::rashi_of(c),
                approximate: approx,
            })
            .collect();
        let divisional_charts = chart
            .vargas
            .iter()
            .map(|v| VargaReport {
                division: v.amsha.to_string(),
                ascendant: Measure::deg(v.ascendant_deg).tagged(approx),
                ascendant_rashi: v.ascendant_rashi,
                placements: v
                    .placements
                    .iter()
                    .map(|p| VargaPlacementReport {
                        graha: p.graha,
                        longitude: Measure::deg(p.longitude_deg).tagged(moving(p.graha)),
                        rashi: p.rashi,
                        approximate: moving(p.graha),
                    })
                    .collect(),
                approximate: approx,
            })
            .collect();
        let aspects = chart
            .aspects
            .iter()
            .map(|a| {
                let shifts = match a.target {
                    AspectTarget::House(_) => approx,
                    AspectTarget::Graha(g) => moving(g),
                } || moving(a.source);
                AspectReport {
                    source: a.source,
                    target: a.target,
                    strength: Measure::new(a.strength, Unit::Fraction).tagged(shifts),
                    class: a.class,
                    approximate: shifts,
                }
            })
            .collect();
        let relationships = chart
            .relationships
            .iter()
            .map(|r| RelationReport {
                of: r.of,
                toward: r.toward,
                natural: r.natural,
                temporal: r.temporal,
                compound: r.compound,
                approximate: moving(r.of) || moving(r.toward),
            })
            .collect();
        Self {
            instant: InstantReport {
                civil: inst.to_string(),
                jd_ut: Measure::new(inst.jd_ut(), Unit::JulianDay).tagged(approx),
                jd_tt: Measure::new(inst.jd_tt(), Unit::JulianDay).tagged(approx),
                latitude: Measure::deg(loc.latitude_deg),
                longitude: Measure::deg(loc.longitude_deg),
                local_sidereal_time: Measure::deg(inst.local_sidereal_time_deg()).tagged(approx),
                time_unknown: approx,
            },
            provider_version: chart.provider_version.clone(),
            ayanamsha: chart.options.ayanamsha.key(),
            ayanamsha_value: Measure::deg(chart.ayanamsha_deg),
            house_system: chart.options.house_system.key(),
            ascendant: Measure::deg(chart.angles.ascendant_deg).tagged(approx),
            midheaven: Measure::deg(chart.angles.midheaven_deg).tagged(approx),
            bodies,
            cusps,
            divisional_charts,
            aspects,
            relationships,
            dasha: None,
            strength: None,
            yogas: None,
        }
    }

    pub fn with_dasha(mut self, tree: &DashaTree) -> Self {
        self.dasha = Some(DashaReport::from_tree(tree, self.instant.time_unknown));
        self
    }

    pub fn with_strength(mut self, strength: &StrengthReport) -> Self {
        self.strength = Some(StrengthSection::new(strength, self.instant.time_unknown));
        self
    }

    pub fn with_yogas(mut self, matches: Vec<YogaMatch>) -> Self {
        self.yogas = Some(YogaSection {
            matches,
            approximate: self.instant.time_unknown,
        });
        self
    }

    pub fn to_json(&self) -> Result<String, ChartError> {
        serde_json::to_string_pretty(self).map_err(|e| ChartError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_serializes_unit_and_hides_exact_tag() {
        let json = serde_json::to_string(&Measure::deg(12.5)).unwrap();
        assert_eq!(json, r#"{"value":12.5,"unit":"degrees"}"#);
        let json = serde_json::to_string(&Measure::new(3.0, Unit::Rupas).tagged(true)).unwrap();
        assert_eq!(json, r#"{"value":3.0,"unit":"rupas","approximate":true}"#);
    }

    #[test]
    fn unit_names() {
        let json = serde_json::to_string(&Unit::DegreesPerDay).unwrap();
        assert_eq!(json, r#""degrees_per_day""#);
    }
}
