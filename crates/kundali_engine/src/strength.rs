//! Strength pass: shadbala and ashtakavarga for a computed chart.

use kundali_base::ashtakavarga::{Ashtakavarga, ashtakavarga};
use kundali_base::drishti::planet_aspect_matrix;
use kundali_base::kala::{abda_lord, hora_lord, masa_lord, vara_lord};
use kundali_base::shadbala::{KalaInputs, ShadbalaEntry, ShadbalaInputs, shadbala};
use kundali_base::{Graha, normalize_360};
use serde::Serialize;

use crate::chart::ChartResult;

/// Apparent altitude of the Sun's centre at rise and set, degrees.
const SUNRISE_ALTITUDE_DEG: f64 = -0.833;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrengthReport {
    /// Sun..Saturn.
    pub shadbala: Vec<ShadbalaEntry>,
    pub ashtakavarga: Ashtakavarga,
    pub kala: KalaInputs,
}

impl StrengthReport {
    /// Shadbala verdict per planet, Sun..Saturn.
    pub fn strong_flags(&self) -> [bool; 7] {
        std::array::from_fn(|i| self.shadbala.get(i).is_some_and(|e| e.is_strong))
    }

    pub fn entry(&self, graha: Graha) -> Option<&ShadbalaEntry> {
        self.shadbala.iter().find(|e| e.graha == graha)
    }
}

/// Hour angle in (-180, 180].
fn signed(deg: f64) -> f64 {
    let d = normalize_360(deg);
    if d > 180.0 { d - 360.0 } else { d }
}

/// Semi-diurnal arc of the Sun in degrees of hour angle, 0 in polar night
/// and 180 under the midnight sun.
fn semi_diurnal_arc(latitude_deg: f64, declination_deg: f64) -> f64 {
    let (phi, dec) = (latitude_deg.to_radians(), declination_deg.to_radians());
    let denom = phi.cos() * dec.cos();
    if denom.abs() < 1e-12 {
        return 90.0;
    }
    let x = (SUNRISE_ALTITUDE_DEG.to_radians().sin() - phi.sin() * dec.sin()) / denom;
    x.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Day/night state and temporal lords at the birth instant.
pub fn kala_inputs(chart: &ChartResult) -> KalaInputs {
    let sun = chart.body(Graha::Surya);
    let instant = &chart.instant;
    let h = signed(instant.local_sidereal_time_deg() - sun.right_ascension_deg);
    let h0 = semi_diurnal_arc(instant.location().latitude_deg, sun.declination_deg);

    let is_day = h.abs() < h0;
    let part_elapsed = if is_day {
        (h + h0) / (2.0 * h0)
    } else {
        let night = 360.0 - 2.0 * h0;
        if night > 0.0 { normalize_360(h - h0) / night } else { 0.0 }
    };

    // Without a sunrise (polar day or night) the day starts at 6h apparent
    // solar time.
    let rise_arc = if h0 > 0.0 && h0 < 180.0 { h0 } else { 90.0 };
    let since_sunrise = normalize_360(h + rise_arc);
    let vara = vara_lord(instant.local_civil_jd(), since_sunrise / 360.0);
    KalaInputs {
        sun_hour_angle_deg: h,
        is_day,
        part_elapsed: part_elapsed.clamp(0.0, 1.0 - f64::EPSILON),
        abda_lord: abda_lord(instant.jd_ut()),
        masa_lord: masa_lord(instant.jd_ut()),
        vara_lord: vara,
        hora_lord: hora_lord(vara, (since_sunrise / 15.0).floor() as usize),
    }
}

/// Assemble the shadbala inputs from a chart.
pub fn shadbala_inputs(chart: &ChartResult) -> ShadbalaInputs {
    let rashis = chart.sapta_rashis();
    ShadbalaInputs {
        sidereal_lons: chart.sapta_longitudes(),
        speeds: std::array::from_fn(|i| chart.bodies[i].speed_deg_per_day),
        declinations: std::array::from_fn(|i| chart.bodies[i].declination_deg),
        bhavas: std::array::from_fn(|i| chart.bodies[i].bhava),
        ascendant_deg: chart.angles.ascendant_deg,
        mc_deg: chart.angles.midheaven_deg,
        aspects: planet_aspect_matrix(&rashis),
        kala: kala_inputs(chart),
    }
}

/// Shadbala per planet and the ashtakavarga grids.
pub fn strength(chart: &ChartResult) -> StrengthReport {
    let inputs = shadbala_inputs(chart);
    let lagna = kundali_base::rashi_of(chart.angles.ascendant_deg);
    StrengthReport {
        shadbala: shadbala(&inputs).to_vec(),
        ashtakavarga: ashtakavarga(&chart.sapta_rashis(), lagna),
        kala: inputs.kala,
    }
}
