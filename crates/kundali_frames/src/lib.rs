//! Reference-frame helpers: precession, obliquity, nutation and the
//! ecliptic/equatorial conversions the house engine needs.

pub mod equatorial;
pub mod nutation;
pub mod precession;

pub use equatorial::{
    Equatorial, ascendant_deg, ecliptic_longitude_of_ra, ecliptic_point_declination_deg,
    ecliptic_to_equatorial, midheaven_deg,
};
pub use nutation::{Nutation, nutation};
pub use precession::{general_precession_deg, mean_obliquity_deg};
