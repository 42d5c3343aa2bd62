//! RFC 2445 DATE / DATE-TIME serialization.

use koyomi_core::civil::CivilCalendar;

/// Formats the calendar per the RFC 2445 DATE-TIME grammar: 8 characters
/// (`YYYYMMDD`) for an all-day value, `YYYYMMDDTHHMMSS` otherwise, with a
/// trailing `Z` appended exactly when the calendar's zone is UTC. All
/// fields are zero-padded. Left inverse of [`super::parse`] for canonical
/// inputs whose `Z`-presence matches the calendar's zone.
#[must_use]
pub fn format_2445(calendar: &CivilCalendar) -> String {
    let date = format!(
        "{:04}{:02}{:02}",
        calendar.year(),
        calendar.month() + 1,
        calendar.day_of_month()
    );
    if calendar.all_day {
        return date;
    }

    let mut formatted = format!(
        "{date}T{:02}{:02}{:02}",
        calendar.hour(),
        calendar.minute(),
        calendar.second()
    );
    if calendar.timezone_id() == "UTC" {
        formatted.push('Z');
    }
    formatted
}
