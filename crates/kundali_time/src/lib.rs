//! Time scales for birth-chart computation.
//!
//! - [`julian`]: Gregorian calendar <-> Julian Day
//! - [`delta_t`]: TT − UT model
//! - [`sidereal`]: Earth rotation angle, GMST, local sidereal time
//! - [`civil`]: validated birth [`Instant`] and the timezone resolver seam

pub mod civil;
pub mod delta_t;
pub mod error;
pub mod julian;
pub mod sidereal;

pub use civil::{
    CivilDate, FixedOffsetResolver, GeoLocation, Instant, LocalMeanTimeResolver, TimeOfDay,
    TimezoneResolver, UtcOffset,
};
pub use delta_t::{delta_t_seconds, ut_to_tt};
pub use error::TimeError;
pub use julian::{J2000_JD, calendar_to_jd, jd_to_calendar, julian_centuries};
pub use sidereal::{gmst_deg, local_sidereal_time_deg};
