//! RFC 3339 date-time parsing.

use koyomi_core::civil::CivilCalendar;

use super::error::{ParseError, ParseResult};
use super::{DateTimeFields, four_digits, literal, two_digits};

/// ## Summary
/// Parses an RFC 3339 date or date-time string into the calendar and
/// returns whether the resulting value is in UTC. Accepted forms:
///
/// - `YYYY-MM-DD` — all-day value, read in the calendar's current zone
/// - `YYYY-MM-DDTHH:MM:SS[.fraction](Z|+HH:MM|-HH:MM)` — any fractional
///   seconds are accepted and discarded; a zone offset of any kind
///   converts the value to UTC and switches the calendar there
///
/// A numeric offset is what must be subtracted from local time to reach
/// UTC, so a `-07:00` suffix adds seven hours to the parsed wall clock
/// and `+05:30` removes five and a half; the adjusted fields are then
/// renormalized (an adjusted hour of 27 lands on the next day).
///
/// ## Errors
/// Returns a [`ParseError`] citing the offending byte position for inputs
/// shorter than 10 characters, misplaced `-`, `:`, or `T` separators,
/// non-digits, an unrecognized character at the offset-sign position, or
/// an input that ends inside a numeric offset. The calendar is untouched
/// on error.
pub fn parse_3339(calendar: &mut CivilCalendar, s: &str) -> ParseResult<bool> {
    let fields = scan(s)?;
    Ok(fields.apply(calendar))
}

fn scan(s: &str) -> ParseResult<DateTimeFields> {
    let bytes = s.as_bytes();
    let len = bytes.len();
    if len < 10 {
        return Err(ParseError::too_short(len, 10));
    }

    let year = four_digits(bytes, 0)?;
    literal(bytes, 4, '-')?;
    let month0 = two_digits(bytes, 5)? - 1;
    literal(bytes, 7, '-')?;
    let day = two_digits(bytes, 8)?;

    if len < 19 {
        // No complete time component: a simple date.
        return Ok(DateTimeFields {
            year,
            month0,
            day,
            hour: 0,
            minute: 0,
            second: 0,
            all_day: true,
            utc: false,
        });
    }

    literal(bytes, 10, 'T')?;
    let mut hour = two_digits(bytes, 11)?;
    literal(bytes, 13, ':')?;
    let mut minute = two_digits(bytes, 14)?;
    literal(bytes, 16, ':')?;
    let second = two_digits(bytes, 17)?;

    // Skip fractional seconds; no sub-second precision is retained.
    let mut index = 19;
    if index < len && bytes[index] == b'.' {
        index += 1;
        while index < len && bytes[index].is_ascii_digit() {
            index += 1;
        }
    }

    let mut utc = false;
    if index < len {
        // The offset is subtracted from local time to reach UTC, hence
        // 1 for '-' and -1 for '+'.
        let sign = match bytes[index] {
            b'Z' => 0,
            b'-' => 1,
            b'+' => -1,
            other => return Err(ParseError::offset_sign(index, char::from(other))),
        };
        utc = true;

        if sign != 0 {
            if len < index + 6 {
                return Err(ParseError::unexpected_length(index, index + 6));
            }
            let offset_hour = two_digits(bytes, index + 1)?;
            literal(bytes, index + 3, ':')?;
            let offset_minute = two_digits(bytes, index + 4)?;
            hour += offset_hour * sign;
            minute += offset_minute * sign;
        }
    }

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
