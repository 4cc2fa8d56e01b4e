//! Sidereal reference systems (ayanamsha).
//!
//! Each system is one row of [`AYANAMSHA_TABLE`]: its value at J2000.0 and
//! whether it is measured from the mean or the true (nutated) equinox. The
//! value at any other epoch adds the IAU 2006 general precession accumulated
//! since J2000.0. Adding a system means adding a variant and a table row.

use std::str::FromStr;

use kundali_frames::{general_precession_deg, nutation};
use serde::{Deserialize, Serialize};

use crate::error::BaseError;
use crate::util::normalize_360;

const J2000_JD: f64 = 2_451_545.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AyanamshaSystem {
    #[default]
    Lahiri,
    TrueLahiri,
    Krishnamurti,
    Raman,
    FaganBradley,
    PushyaPaksha,
    RohiniPaksha,
    DeLuce,
    DjwalKhul,
    Hipparchos,
    Sassanian,
    DevaDutta,
    UshaShashi,
    Yukteshwar,
    JnBhasin,
    ChandraHari,
    Jagganatha,
    SuryaSiddhanta,
    GalacticCenter0Sag,
    Aldebaran15Tau,
}

/// Equinox the offset is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Equinox {
    Mean,
    True,
}

/// One row of the ayanamsha table.
#[derive(Debug, Clone, Copy)]
pub struct AyanamshaDef {
    pub system: AyanamshaSystem,
    /// Stable lookup key used in configuration and on the wire.
    pub key: &'static str,
    pub label: &'static str,
    pub j2000_deg: f64,
    pub equinox: Equinox,
}

const fn row(
    system: AyanamshaSystem,
    key: &'static str,
    label: &'static str,
    j2000_deg: f64,
    equinox: Equinox,
) -> AyanamshaDef {
    AyanamshaDef {
        system,
        key,
        label,
        j2000_deg,
        equinox,
    }
}

/// Every supported system, in enum order.
pub static AYANAMSHA_TABLE: [AyanamshaDef; 20] = {
    use AyanamshaSystem as S;
    use Equinox::{Mean, True};
    [
        row(S::Lahiri, "lahiri", "Lahiri (Chitrapaksha)", 23.853, Mean),
        row(S::TrueLahiri, "true_lahiri", "True Lahiri", 23.853, True),
        row(S::Krishnamurti, "kp", "Krishnamurti", 23.850, Mean),
        row(S::Raman, "raman", "B.V. Raman", 22.370, Mean),
        row(S::FaganBradley, "fagan_bradley", "Fagan-Bradley", 24.736, Mean),
        row(S::PushyaPaksha, "pushya_paksha", "Pushya Paksha", 21.000, Mean),
        row(S::RohiniPaksha, "rohini_paksha", "Rohini Paksha", 24.087, Mean),
        row(S::DeLuce, "deluce", "DeLuce", 21.619, Mean),
        row(S::DjwalKhul, "djwal_khul", "Djwal Khul", 22.883, Mean),
        row(S::Hipparchos, "hipparchos", "Hipparchos", 21.176, Mean),
        row(S::Sassanian, "sassanian", "Sassanian", 19.765, Mean),
        row(S::DevaDutta, "deva_dutta", "Deva-Dutta", 22.474, Mean),
        row(S::UshaShashi, "usha_shashi", "Usha-Shashi", 20.103, Mean),
        row(S::Yukteshwar, "yukteshwar", "Sri Yukteshwar", 22.376, Mean),
        row(S::JnBhasin, "jn_bhasin", "J.N. Bhasin", 22.376, Mean),
        row(S::ChandraHari, "chandra_hari", "Chandra Hari", 23.250, Mean),
        row(S::Jagganatha, "jagganatha", "Jagganatha", 23.250, Mean),
        row(S::SuryaSiddhanta, "surya_siddhanta", "Surya Siddhanta", 22.459, Mean),
        row(S::GalacticCenter0Sag, "galactic_center_0_sag", "Galactic Center 0° Sag", 26.860, Mean),
        row(S::Aldebaran15Tau, "aldebaran_15_tau", "Aldebaran 15° Tau", 24.870, Mean),
    ]
};

impl AyanamshaSystem {
    pub fn def(self) -> &'static AyanamshaDef {
        &AYANAMSHA_TABLE[self as usize]
    }

    pub fn key(self) -> &'static str {
        self.def().key
    }
}

impl FromStr for AyanamshaSystem {
    type Err = BaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        AYANAMSHA_TABLE
            .iter()
            .find(|d| d.key == wanted)
            .map(|d| d.system)
            .ok_or_else(|| BaseError::UnsupportedAyanamsha(s.to_string()))
    }
}

/// Ayanamsha in degrees at a TT Julian Day.
pub fn ayanamsha_deg(system: AyanamshaSystem, jd_tt: f64) -> f64 {
    let t = (jd_tt - J2000_JD) / 36_525.0;
    let def = system.def();
    let mean = def.j2000_deg + general_precession_deg(t);
    match def.equinox {
        Equinox::Mean => mean,
        Equinox::True => mean + nutation(t).longitude_deg(),
    }
}

/// Sidereal longitude from a tropical one: (tropical − ayanamsha) mod 360.
pub fn sidereal_longitude(tropical_deg: f64, ayanamsha_deg: f64) -> f64 {
    normalize_360(tropical_deg - ayanamsha_deg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_rows_match_variants() {
        for (i, d) in AYANAMSHA_TABLE.iter().enumerate() {
            assert_eq!(d.system as usize, i, "row {i} out of order");
        }
    }

    #[test]
    fn keys_are_unique() {
        for (i, a) in AYANAMSHA_TABLE.iter().enumerate() {
            for b in &AYANAMSHA_TABLE[i + 1..] {
                assert_ne!(a.key, b.key);
            }
        }
    }

    #[test]
    fn parse_known_and_unknown() {
        assert_eq!("Lahiri".parse::<AyanamshaSystem>(), Ok(AyanamshaSystem::Lahiri));
        assert_eq!("true-lahiri".parse::<AyanamshaSystem>(), Ok(AyanamshaSystem::TrueLahiri));
        assert_eq!(
            "tropical".parse::<AyanamshaSystem>(),
            Err(BaseError::UnsupportedAyanamsha("tropical".into()))
        );
    }

    #[test]
    fn lahiri_at_j2000() {
        assert!((ayanamsha_deg(AyanamshaSystem::Lahiri, J2000_JD) - 23.853).abs() < 1e-12);
    }

    #[test]
    fn lahiri_grows_with_precession() {
        // 50 years on, about 0.698° more
        let later = ayanamsha_deg(AyanamshaSystem::Lahiri, J2000_JD + 50.0 * 365.25);
        assert!((later - 23.853 - 0.6985).abs() < 0.001, "got {later}");
    }

    #[test]
    fn true_lahiri_differs_by_nutation_only() {
        let jd = 2_460_000.5;
        let diff = ayanamsha_deg(AyanamshaSystem::TrueLahiri, jd)
            - ayanamsha_deg(AyanamshaSystem::Lahiri, jd);
        assert!(diff.abs() < 20.0 / 3600.0);
    }

    #[test]
    fn sidereal_wraps() {
        assert!((sidereal_longitude(10.0, 24.0) - 346.0).abs() < 1e-12);
        assert!((sidereal_longitude(100.0, 24.0) - 76.0).abs() < 1e-12);
    }
}
