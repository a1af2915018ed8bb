// Date utility functions
// Wall-clock arithmetic in the viewer's timezone on top of UTC instants

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;

pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Resolve a wall-clock time in `tz` to an instant.
///
/// Ambiguous times (DST fall-back) take the earlier instant; times inside a
/// DST gap move forward until they exist.
pub fn resolve_local(naive: NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    let mut candidate = naive;
    // Gaps are at most a few hours long; step in 15-minute increments.
    for _ in 0..16 {
        match tz.from_local_datetime(&candidate) {
            LocalResult::Single(dt) => return dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => return earliest.with_timezone(&Utc),
            LocalResult::None => candidate += Duration::minutes(15),
        }
    }
    Utc.from_utc_datetime(&naive)
}

/// Instant of local midnight starting `date` in `tz`
pub fn start_of_day(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    resolve_local(date.and_time(chrono::NaiveTime::MIN), tz)
}

/// Instant `minutes` of wall-clock time after local midnight of `date`.
/// `minutes == 1440` is midnight of the following day.
pub fn at_minutes(date: NaiveDate, minutes: i64, tz: Tz) -> DateTime<Utc> {
    resolve_local(date.and_time(chrono::NaiveTime::MIN) + Duration::minutes(minutes), tz)
}

/// Local calendar date of an instant
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Wall-clock minutes between local midnight of `date` and `instant`.
/// May be negative or exceed a day for instants outside `date`.
pub fn minutes_since(date: NaiveDate, instant: DateTime<Utc>, tz: Tz) -> i64 {
    let local = instant.with_timezone(&tz).naive_local();
    (local - date.and_time(chrono::NaiveTime::MIN)).num_minutes()
}

/// Minutes since local midnight on the instant's own local date
pub fn minute_of_day(instant: DateTime<Utc>, tz: Tz) -> i64 {
    minutes_since(local_date(instant, tz), instant, tz)
}

/// First day of the week containing `date`
pub fn week_start(date: NaiveDate, first_day: Weekday) -> NaiveDate {
    let offset = (7 + date.weekday().num_days_from_monday() as i64
        - first_day.num_days_from_monday() as i64)
        % 7;
    date - Duration::days(offset)
}

/// Parse a weekday name ("Monday", "mon", "Sun"); `None` when unknown
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    name.trim().parse::<Weekday>().ok()
}
