//! Civil calendar values and Julian Day arithmetic.
//!
//! [`CivilCalendar`] owns a point in time (epoch milliseconds) plus the
//! timezone used to read it as a civil date. Civil fields and the Julian
//! Day Number are derived on demand from the instant; there is no cached
//! field state to invalidate. The Julian Day Number is the day-granular
//! key the rest of the application pages and compares by: it is identical
//! across timezones for a given calendar date.

use std::str::FromStr;

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::constants::{
    BASE_DATE_MILLIS, EPOCH_JULIAN_DAY, MAX_INSTANT_MILLIS, MAX_JULIAN_DAY, MAX_YEAR,
    MILLIS_PER_DAY, MIN_INSTANT_MILLIS, MIN_JULIAN_DAY, MIN_YEAR,
};
use crate::error::{CoreError, CoreResult};
use crate::weekday::Weekday;

/// Wall-clock step used to walk out of a DST gap, and how many steps to
/// try before giving up (three days covers zones that skipped an entire
/// civil day).
const GAP_PROBE_STEP_MINUTES: i64 = 15;
const GAP_PROBE_LIMIT: u32 = 288;

/// Calendar fields with queryable bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateField {
    Year,
    Month,
    DayOfMonth,
    Hour,
    Minute,
    Second,
    JulianDay,
}

/// A point in time read through a timezone.
///
/// The value is three words: the absolute instant, the zone, and an
/// all-day marker that affects formatting only. Mutators replace the
/// instant atomically; clone (it is `Copy`) before handing a value to
/// another owner instead of sharing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilCalendar {
    epoch_millis: i64,
    tz: Tz,
    /// Marks a date without a meaningful time of day. Formatting-only;
    /// the instant still has a time component (local midnight).
    pub all_day: bool,
}

impl CivilCalendar {
    /// ## Summary
    /// Creates a calendar at the current instant in the named IANA zone.
    ///
    /// ## Errors
    /// Returns [`CoreError::InvalidInput`] for an empty zone id and
    /// [`CoreError::UnknownTimezone`] for one chrono-tz cannot resolve.
    pub fn new(timezone: &str) -> CoreResult<Self> {
        Ok(Self {
            epoch_millis: Utc::now().timestamp_millis(),
            tz: resolve_tz(timezone)?,
            all_day: false,
        })
    }

    /// Creates a calendar at the current instant in the current timezone
    /// (see [`Self::current_timezone`]).
    #[must_use]
    pub fn now() -> Self {
        let tz = Tz::from_str(&Self::current_timezone()).unwrap_or(Tz::UTC);
        Self {
            epoch_millis: Utc::now().timestamp_millis(),
            tz,
            all_day: false,
        }
    }

    /// ## Summary
    /// Creates a calendar at local midnight of the given civil date.
    ///
    /// `month0` is 0-based; out-of-range fields carry into neighboring
    /// months and years rather than failing.
    ///
    /// ## Errors
    /// Returns an error only for an unusable `timezone` string.
    pub fn from_date(timezone: &str, year: i32, month0: i32, day: i32) -> CoreResult<Self> {
        Self::from_fields(timezone, year, month0, day, 0, 0, 0)
    }

    /// ## Summary
    /// Creates a calendar from full civil fields.
    ///
    /// ## Errors
    /// Returns an error only for an unusable `timezone` string.
    pub fn from_fields(
        timezone: &str,
        year: i32,
        month0: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
    ) -> CoreResult<Self> {
        let mut calendar = Self {
            epoch_millis: 0,
            tz: resolve_tz(timezone)?,
            all_day: false,
        };
        calendar.set(year, month0, day, hour, minute, second);
        Ok(calendar)
    }

    /// Returns the timezone string for the running process: the `TZ`
    /// environment variable when it names a known zone, otherwise "UTC".
    #[must_use]
    pub fn current_timezone() -> String {
        if let Ok(name) = std::env::var("TZ") {
            if Tz::from_str(&name).is_ok() {
                return name;
            }
        }
        "UTC".to_string()
    }

    /// Computes the Julian Day Number for an instant and a UTC offset.
    /// The Julian Day for a given civil date is the same in every
    /// timezone; July 1, 2008 is 2454649 everywhere.
    #[must_use]
    pub fn julian_day_for(millis: i64, offset_millis: i64) -> i32 {
        let shifted = millis
            .saturating_add(offset_millis)
            .saturating_sub(BASE_DATE_MILLIS);
        let days = shifted.div_euclid(MILLIS_PER_DAY);
        match i32::try_from(days) {
            Ok(days) => days.saturating_add(MIN_JULIAN_DAY),
            Err(_) if days < 0 => i32::MIN,
            Err(_) => i32::MAX,
        }
    }

    /// Returns the first and last Julian Day touched by the half-open
    /// instant range `[begin_millis, end_millis)` under a fixed offset.
    /// An event ending exactly at midnight does not touch the next day.
    #[must_use]
    pub fn julian_day_span(begin_millis: i64, end_millis: i64, offset_millis: i64) -> (i32, i32) {
        let start_day = Self::julian_day_for(begin_millis, offset_millis);
        let end_day = Self::julian_day_for(end_millis.saturating_sub(1), offset_millis);
        (start_day, end_day.max(start_day))
    }

    /// The absolute instant in epoch milliseconds.
    #[must_use]
    pub fn epoch_millis(&self) -> i64 {
        self.epoch_millis
    }

    /// Replaces the instant, keeping zone and all-day flag.
    pub fn set_epoch_millis(&mut self, millis: i64) {
        self.epoch_millis = millis.clamp(MIN_INSTANT_MILLIS, MAX_INSTANT_MILLIS);
    }

    /// Sets the instant to the current time.
    pub fn set_to_now(&mut self) {
        self.epoch_millis = Utc::now().timestamp_millis();
    }

    /// Copies instant, zone, and all-day flag from another calendar.
    pub fn set_from(&mut self, other: &Self) {
        *self = *other;
    }

    /// The IANA identifier of the zone fields are derived in.
    #[must_use]
    pub fn timezone_id(&self) -> &'static str {
        self.tz.name()
    }

    /// ## Summary
    /// Re-interprets the same absolute instant under a new zone: the
    /// epoch milliseconds are unchanged, only field derivation moves.
    ///
    /// ## Errors
    /// Returns an error for an unusable `timezone` string; the calendar
    /// is left untouched in that case.
    pub fn switch_timezone(&mut self, timezone: &str) -> CoreResult<()> {
        self.tz = resolve_tz(timezone)?;
        Ok(())
    }

    /// Typed variant of [`Self::switch_timezone`].
    pub fn switch_tz(&mut self, tz: Tz) {
        self.tz = tz;
    }

    /// ## Summary
    /// Sets the calendar to the given civil fields, read in the current
    /// zone. `month0` is 0-based. Out-of-range values carry (month 12 is
    /// January of the next year, day 0 is the last day of the previous
    /// month, hour 24 is midnight of the next day); nothing is rejected.
    ///
    /// Wall times that fall in a DST gap resolve to the nearest later
    /// valid instant; ambiguous wall times in a DST fold resolve to the
    /// earlier instant.
    pub fn set(&mut self, year: i32, month0: i32, day: i32, hour: i32, minute: i32, second: i32) {
        let wall = normalized_wall_time(year, month0, day, hour, minute, second);
        let resolved = resolve_wall_time(self.tz, wall);
        self.epoch_millis = resolved.timestamp_millis();
    }

    /// Sets the calendar to local midnight of the given civil date.
    pub fn set_date(&mut self, year: i32, month0: i32, day: i32) {
        self.set(year, month0, day, 0, 0, 0);
    }

    /// ## Summary
    /// Sets the instant to local midnight of the given Julian Day in the
    /// calendar's current zone and returns the resulting epoch
    /// milliseconds.
    ///
    /// When midnight does not exist on that day (a forward DST change at
    /// 00:00, as Cairo did on 2008-04-25), the instant falls on the
    /// nearest later wall time instead, typically 1 AM. That is the only
    /// case where `set_julian_day` followed by [`Self::julian_day`] can
    /// disagree with a round trip at midnight; the Julian Day itself is
    /// still preserved.
    pub fn set_julian_day(&mut self, julian_day: i32) -> i64 {
        // The zone's offset on the target day is not known yet, so land
        // within a day of the target and correct with field arithmetic.
        let approx =
            (i64::from(julian_day) - i64::from(EPOCH_JULIAN_DAY)).saturating_mul(MILLIS_PER_DAY);
        let approx_day = Self::julian_day_for(approx, self.gmt_offset_at(approx));
        let diff = julian_day.saturating_sub(approx_day);

        self.set_epoch_millis(approx);
        let local_date = self.local().date_naive();
        let target_date = local_date
            .checked_add_signed(Duration::days(i64::from(diff)))
            .unwrap_or(local_date);

        let midnight = resolve_wall_time(self.tz, target_date.and_time(NaiveTime::MIN));
        if midnight.time() != NaiveTime::MIN {
            debug!(
                julian_day,
                zone = self.tz.name(),
                fell_back_to = %midnight.time(),
                "local midnight skipped by DST transition"
            );
        }
        self.epoch_millis = midnight.timestamp_millis();
        self.epoch_millis
    }

    /// The Julian Day Number of the stored instant, using the zone's UTC
    /// offset at that instant (DST-aware).
    #[must_use]
    pub fn julian_day(&self) -> i32 {
        Self::julian_day_for(self.epoch_millis, self.gmt_offset())
    }

    /// The zone's offset from UTC at the stored instant, in milliseconds,
    /// daylight savings included.
    #[must_use]
    pub fn gmt_offset(&self) -> i64 {
        self.gmt_offset_at(self.epoch_millis)
    }

    /// The zone's offset from UTC at an arbitrary instant, in
    /// milliseconds.
    #[must_use]
    pub fn gmt_offset_at(&self, millis: i64) -> i64 {
        let clamped = millis.clamp(MIN_INSTANT_MILLIS, MAX_INSTANT_MILLIS);
        let utc = DateTime::from_timestamp_millis(clamped).unwrap_or_default();
        i64::from(
            self.tz
                .offset_from_utc_datetime(&utc.naive_utc())
                .fix()
                .local_minus_utc(),
        ) * 1000
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.local().year()
    }

    /// The month, 0-based (January = 0).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.local().month0()
    }

    #[must_use]
    pub fn day_of_month(&self) -> u32 {
        self.local().day()
    }

    #[must_use]
    pub fn hour(&self) -> u32 {
        self.local().hour()
    }

    #[must_use]
    pub fn minute(&self) -> u32 {
        self.local().minute()
    }

    #[must_use]
    pub fn second(&self) -> u32 {
        self.local().second()
    }

    #[must_use]
    pub fn day_of_week(&self) -> Weekday {
        Weekday::from(self.local().weekday())
    }

    /// The ISO week of the year (weeks start Monday), independent of any
    /// configured first day of week.
    #[must_use]
    pub fn week_of_year(&self) -> u32 {
        self.local().iso_week().week()
    }

    /// True iff the two calendars show the same civil year, month, and
    /// day — each read in its own zone. This is civil-day equality, not
    /// instant equality.
    #[must_use]
    pub fn same_day(&self, other: &Self) -> bool {
        let (a, b) = (self.local(), other.local());
        a.year() == b.year() && a.month() == b.month() && a.day() == b.day()
    }

    /// Orders two calendars by absolute instant.
    #[must_use]
    pub fn compare(a: &Self, b: &Self) -> std::cmp::Ordering {
        a.epoch_millis.cmp(&b.epoch_millis)
    }

    /// ## Summary
    /// The smallest value `field` can take. Year and Julian Day bounds
    /// are pinned to the supported range ([1900, 2099] and its Julian
    /// Days) rather than whatever the underlying date engine supports.
    #[must_use]
    pub fn actual_minimum(&self, field: DateField) -> i32 {
        match field {
            DateField::Year => MIN_YEAR,
            DateField::JulianDay => MIN_JULIAN_DAY,
            DateField::DayOfMonth => 1,
            DateField::Month | DateField::Hour | DateField::Minute | DateField::Second => 0,
        }
    }

    /// ## Summary
    /// The largest value `field` can take at the currently stored date.
    /// Day-of-month follows Gregorian rules for the stored year and
    /// month, leap February included.
    #[must_use]
    pub fn actual_maximum(&self, field: DateField) -> i32 {
        match field {
            DateField::Year => MAX_YEAR,
            DateField::JulianDay => MAX_JULIAN_DAY,
            DateField::Month => 11,
            DateField::DayOfMonth => {
                i32::try_from(days_in_month(self.year(), self.month())).unwrap_or(31)
            }
            DateField::Hour => 23,
            DateField::Minute => 59,
            DateField::Second => 59,
        }
    }

    fn local(&self) -> DateTime<Tz> {
        let clamped = self.epoch_millis.clamp(MIN_INSTANT_MILLIS, MAX_INSTANT_MILLIS);
        DateTime::from_timestamp_millis(clamped)
            .unwrap_or_default()
            .with_timezone(&self.tz)
    }
}

/// True for Gregorian leap years (1900 is not one, 2000 is).
#[must_use]
pub const fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Days in the given 0-based month of the given year.
#[must_use]
pub const fn days_in_month(year: i32, month0: u32) -> u32 {
    match month0 {
        1 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        3 | 5 | 8 | 10 => 30,
        _ => 31,
    }
}

fn resolve_tz(timezone: &str) -> CoreResult<Tz> {
    if timezone.is_empty() {
        return Err(CoreError::InvalidInput("timezone is empty".to_string()));
    }
    Tz::from_str(timezone).map_err(|_| CoreError::UnknownTimezone(timezone.to_string()))
}

/// Normalizes possibly out-of-range civil fields into a wall-clock time.
/// Months carry into years, days into months, and the time of day into
/// neighboring days, in that order.
fn normalized_wall_time(
    year: i32,
    month0: i32,
    day: i32,
    hour: i32,
    minute: i32,
    second: i32,
) -> NaiveDateTime {
    // The year clamp sits far outside the supported window and keeps the
    // later day/time carry inside chrono's representable range.
    let year = year
        .saturating_add(month0.div_euclid(12))
        .clamp(1, 9998);
    let month = u32::try_from(month0.rem_euclid(12) + 1).unwrap_or(1);

    let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN);
    let date = first
        .checked_add_signed(Duration::days(i64::from(day) - 1))
        .unwrap_or(if day < 1 { NaiveDate::MIN } else { NaiveDate::MAX });

    let seconds_of_day =
        i64::from(hour) * 3600 + i64::from(minute) * 60 + i64::from(second);
    date.and_time(NaiveTime::MIN)
        .checked_add_signed(Duration::seconds(seconds_of_day))
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN))
}

/// Maps a wall-clock time in `tz` to an absolute instant.
///
/// A DST fold resolves to the earlier instant. A DST gap resolves to the
/// nearest later representable wall time, probing forward in 15-minute
/// steps; a whole-hour midnight skip therefore lands on 1 AM.
fn resolve_wall_time(tz: Tz, wall: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&wall) {
        LocalResult::Single(instant) => instant,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let mut probe = wall;
            for _ in 0..GAP_PROBE_LIMIT {
                let Some(next) = probe.checked_add_signed(Duration::minutes(GAP_PROBE_STEP_MINUTES))
                else {
                    break;
                };
                probe = next;
                match tz.from_local_datetime(&probe) {
                    LocalResult::Single(instant) => return instant,
                    LocalResult::Ambiguous(earliest, _) => return earliest,
                    LocalResult::None => {}
                }
            }
            warn!(%wall, zone = tz.name(), "wall time unresolvable, interpreting as UTC");
            tz.from_utc_datetime(&wall)
        }
    }
}
