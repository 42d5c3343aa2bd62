//! Date-math core for the koyomi calendar.
//!
//! Everything the grid views and paging adapters need to agree on a day:
//! - [`civil::CivilCalendar`]: a point in time plus a timezone, with civil
//!   fields and Julian Day Numbers derived on demand
//! - [`week`]: weeks-since-epoch indexing relative to a configurable week
//!   start
//! - [`weekday::Weekday`]: a closed Sunday..Saturday enum used at every
//!   week-start boundary
//!
//! String codecs for the RFC 2445 / RFC 3339 boundary formats live in the
//! `koyomi-rfc` crate, which builds on this one.

pub mod civil;
pub mod config;
pub mod constants;
pub mod error;
pub mod week;
pub mod weekday;

pub use civil::{CivilCalendar, DateField};
pub use week::weeks_since_epoch_julian_day;
pub use weekday::Weekday;
