//! RFC 2445 / RFC 3339 date-time string codecs for koyomi.
//!
//! These are the two textual date encodings at the application boundary:
//! the RFC 2445 basic format (`20081013T160000Z`) used when dates travel
//! through intents and saved state, and RFC 3339
//! (`2008-10-13T16:00:00.000-07:00`) used by external data sources. The
//! codecs read and write [`koyomi_core::civil::CivilCalendar`] values;
//! parse failures report the byte position of the offending character so
//! callers can surface actionable validation errors.

pub mod error;
pub mod rfc;

pub use rfc::datetime::error::{ParseError, ParseErrorKind, ParseResult};
pub use rfc::datetime::{format_2445, parse, parse_3339};
