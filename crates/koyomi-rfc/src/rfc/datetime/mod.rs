//! Date-time string codecs (RFC 2445 basic and RFC 3339).
//!
//! Both parsers scan the entire string into a `DateTimeFields` value
//! first and only then touch the calendar, so a rejected string never
//! half-updates its target. Field application goes through the
//! calendar's normalizing `set`, which is what turns an offset-adjusted
//! hour like 27 back into a real wall time.

pub mod error;

mod build;
mod parse;
mod rfc3339;


pub use build::format_2445;
pub use parse::parse;
pub use rfc3339::parse_3339;

use chrono_tz::Tz;
use koyomi_core::civil::CivilCalendar;

use self::error::{ParseError, ParseResult};

/// Civil fields scanned out of a date-time string, before they are
/// applied to a calendar.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DateTimeFields {
    pub year: i32,
    pub month0: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
    pub all_day: bool,
    pub utc: bool,
}

impl DateTimeFields {
    /// Applies the fields to the calendar and returns the UTC flag. A
    /// UTC-flagged value is read as UTC wall time and leaves the calendar
    /// in UTC; otherwise the fields are read in the calendar's current
    /// zone.
    pub(crate) fn apply(self, calendar: &mut CivilCalendar) -> bool {
        if self.utc {
            calendar.switch_tz(Tz::UTC);
        }
        calendar.set(
            self.year,
            self.month0,
            self.day,
            self.hour,
            self.minute,
            self.second,
        );
        calendar.all_day = self.all_day;
        self.utc
    }
}

pub(crate) fn digit(bytes: &[u8], pos: usize) -> ParseResult<i32> {
    match bytes.get(pos) {
        Some(&b) if b.is_ascii_digit() => Ok(i32::from(b - b'0')),
        Some(&b) => Err(ParseError::expected_digit(pos, char::from(b))),
        None => Err(ParseError::too_short(bytes.len(), pos + 1)),
    }
}

pub(crate) fn two_digits(bytes: &[u8], pos: usize) -> ParseResult<i32> {
    Ok(digit(bytes, pos)? * 10 + digit(bytes, pos + 1)?)
}

pub(crate) fn four_digits(bytes: &[u8], pos: usize) -> ParseResult<i32> {
    Ok(two_digits(bytes, pos)? * 100 + two_digits(bytes, pos + 2)?)
}

pub(crate) fn literal(bytes: &[u8], pos: usize, expected: char) -> ParseResult<()> {
    match bytes.get(pos) {
        Some(&b) if char::from(b) == expected => Ok(()),
        Some(&b) => Err(ParseError::unexpected_char(pos, expected, char::from(b))),
        None => Err(ParseError::too_short(bytes.len(), pos + 1)),
    }
}
