//! RFC 2445 basic DATE / DATE-TIME parsing.

use koyomi_core::civil::CivilCalendar;

use super::error::{ParseError, ParseResult};
use super::{DateTimeFields, four_digits, literal, two_digits};

/// ## Summary
/// Parses an RFC 2445 basic date-time string into the calendar and
/// returns whether the resulting value is in UTC. Accepted forms:
///
/// - `YYYYMMDD` — date only; the calendar becomes an all-day value at
///   UTC midnight, since the string carries no zone information
/// - `YYYYMMDDTHHMMSS` — read in the calendar's current zone
/// - `YYYYMMDDTHHMMSSZ` — read as UTC; the calendar switches to UTC
///
/// ## Errors
/// Returns a [`ParseError`] citing the offending byte position for inputs
/// shorter than 8 characters, lengths between 9 and 14 (a date-time must
/// be complete), a missing `T` or `Z` literal, or a non-digit where a
/// digit belongs. The calendar is untouched on error.
pub fn parse(calendar: &mut CivilCalendar, s: &str) -> ParseResult<bool> {
    let fields = scan(s)?;
    Ok(fields.apply(calendar))
}

fn scan(s: &str) -> ParseResult<DateTimeFields> {
    let bytes = s.as_bytes();
    let len = bytes.len();
    if len < 8 {
        return Err(ParseError::too_short(len, 8));
    }

    let year = four_digits(bytes, 0)?;
    let month0 = two_digits(bytes, 4)? - 1;
    let day = two_digits(bytes, 6)?;

    if len == 8 {
        return Ok(DateTimeFields {
            year,
            month0,
            day,
            hour: 0,
            minute: 0,
            second: 0,
            all_day: true,
            utc: true,
        });
    }
    if len < 15 {
        return Err(ParseError::ambiguous_length(len));
    }

    literal(bytes, 8, 'T')?;
    let hour = two_digits(bytes, 9)?;
    let minute = two_digits(bytes, 11)?;
    let second = two_digits(bytes, 13)?;

    let utc = if len > 15 {
        literal(bytes, 15, 'Z')?;
        true
    } else {
        false
    };

    Ok(DateTimeFields {
        year,
        month0,
        day,
        hour,
        minute,
        second,
        all_day: false,
        utc,
    })
}

#[cfg(test)]
mod tests {
    use super::super::error::ParseErrorKind;
    use super::*;

    fn new_york() -> CivilCalendar {
        CivilCalendar::from_date("America/New_York", 2000, 0, 1).expect("known zone")
    }

    #[test]
    fn parse_utc_date_time() {
        let mut calendar = new_york();
        assert_eq!(parse(&mut calendar, "20081013T160000Z"), Ok(true));
        assert_eq!(calendar.timezone_id(), "UTC");
        assert_eq!(calendar.year(), 2008);
        assert_eq!(calendar.month(), 9);
        assert_eq!(calendar.day_of_month(), 13);
        assert_eq!(calendar.hour(), 16);
        assert!(!calendar.all_day);
    }

    #[test]
    fn parse_local_date_time_keeps_zone() {
        let mut calendar = new_york();
        assert_eq!(parse(&mut calendar, "20081013T160000"), Ok(false));
        assert_eq!(calendar.timezone_id(), "America/New_York");
        assert_eq!((calendar.hour(), calendar.minute(), calendar.second()), (16, 0, 0));
        assert!(!calendar.all_day);
    }

    #[test]
    fn parse_date_only_is_all_day_utc() {
        let mut calendar = new_york();
        assert_eq!(parse(&mut calendar, "20081013"), Ok(true));
        assert!(calendar.all_day);
        assert_eq!(calendar.timezone_id(), "UTC");
        assert_eq!((calendar.hour(), calendar.minute(), calendar.second()), (0, 0, 0));
        assert_eq!(calendar.day_of_month(), 13);
    }

    #[test]
    fn parse_replaces_stale_all_day_flag() {
        let mut calendar = new_york();
        calendar.all_day = true;
        assert_eq!(parse(&mut calendar, "20081013T160000"), Ok(false));
        assert!(!calendar.all_day);
    }

    #[test]
    fn rejects_short_input() {
        let mut calendar = new_york();
        let error = parse(&mut calendar, "2008101").expect_err("7 characters");
        assert_eq!(error.kind, ParseErrorKind::TooShort);
        assert_eq!(error.pos, 7);
    }

    #[test]
    fn rejects_ambiguous_lengths() {
        let mut calendar = new_york();
        for input in ["20081013T", "200810131600", "20081013T1600"] {
            let error = parse(&mut calendar, input).expect_err("incomplete date-time");
            assert_eq!(error.kind, ParseErrorKind::AmbiguousLength, "input {input}");
            assert_eq!(error.pos, input.len());
        }
    }

    #[test]
    fn rejects_wrong_separator() {
        let mut calendar = new_york();
        let error = parse(&mut calendar, "20081013X160000").expect_err("not a T");
        assert_eq!(error.kind, ParseErrorKind::UnexpectedChar);
        assert_eq!(error.pos, 8);
    }

    #[test]
    fn rejects_wrong_zone_suffix() {
        let mut calendar = new_york();
        let error = parse(&mut calendar, "20081013T160000X").expect_err("not a Z");
        assert_eq!(error.kind, ParseErrorKind::UnexpectedChar);
        assert_eq!(error.pos, 15);
    }

    #[test]
    fn rejects_non_digit() {
        let mut calendar = new_york();
        let error = parse(&mut calendar, "2008a013T160000").expect_err("letter in month");
        assert_eq!(error.kind, ParseErrorKind::ExpectedDigit);
        assert_eq!(error.pos, 4);
    }

    #[test]
    fn failed_parse_leaves_calendar_untouched() {
        let mut calendar = new_york();
        let before = calendar;
        assert!(parse(&mut calendar, "20081013T1600").is_err());
        assert_eq!(calendar, before);
    }
}
