//! Week-index arithmetic over Julian Day Numbers.
//!
//! Week pagers address their pages by "weeks since the epoch week": week 0
//! is the week containing 1970-01-01, computed relative to whichever
//! weekday the user configured as the start of the week. The indexing is
//! a closed-form calculation over Julian Day Numbers, so every caller
//! agrees on page positions without sharing any state.

use crate::constants::EPOCH_JULIAN_DAY;
use crate::weekday::Weekday;

/// Returns the week index of `julian_day` counted from the week containing
/// 1970-01-01, relative to `first_day_of_week`.
///
/// 1970-01-01 fell on a Thursday, which anchors the reference day: the
/// start of epoch week 0 is the last `first_day_of_week` on or before that
/// Thursday. Days earlier than the reference day yield negative indices.
///
/// This is a paging index, not the ISO week number of the year.
#[must_use]
pub fn weeks_since_epoch_julian_day(julian_day: i32, first_day_of_week: Weekday) -> i32 {
    let mut diff = Weekday::Thursday.days_from_sunday() - first_day_of_week.days_from_sunday();
    if diff < 0 {
        diff += 7;
    }
    let ref_day = EPOCH_JULIAN_DAY - diff;
    (julian_day - ref_day).div_euclid(7)
}
