// Visible window module
// The range of local calendar days the calendar currently shows

use chrono::{DateTime, Duration, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;

use crate::utils::date::{start_of_day, week_start};

pub const DAYS_PER_WEEK: u32 = 7;

/// Consecutive local days rendered as day columns, interpreted in the
/// viewer's timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleWindow {
    first_day: NaiveDate,
    days: u32,
    tz: Tz,
}

impl VisibleWindow {
    pub fn new(first_day: NaiveDate, days: u32, tz: Tz) -> Self {
        Self {
            first_day,
            days: days.max(1),
            tz,
        }
    }

    /// The week containing `date`, starting on `first_weekday`
    pub fn week_of(date: NaiveDate, first_weekday: Weekday, tz: Tz) -> Self {
        Self::new(week_start(date, first_weekday), DAYS_PER_WEEK, tz)
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first_day + Duration::days(self.days as i64 - 1)
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day && date <= self.last_day()
    }

    /// Date of the `index`-th column, if it exists
    pub fn day(&self, index: usize) -> Option<NaiveDate> {
        (index < self.days as usize).then(|| self.first_day + Duration::days(index as i64))
    }

    /// Column index of `date`, if visible
    pub fn day_index(&self, date: NaiveDate) -> Option<usize> {
        self.contains(date)
            .then(|| (date - self.first_day).num_days() as usize)
    }

    /// All visible dates in column order
    pub fn dates(&self) -> Vec<NaiveDate> {
        (0..self.days as i64)
            .map(|offset| self.first_day + Duration::days(offset))
            .collect()
    }

    /// Instant of local midnight on the first day
    pub fn start_utc(&self) -> DateTime<Utc> {
        start_of_day(self.first_day, self.tz)
    }

    /// Exclusive end: local midnight after the last day
    pub fn end_utc(&self) -> DateTime<Utc> {
        start_of_day(self.last_day() + Duration::days(1), self.tz)
    }

    /// Same-length window moved by whole weeks
    pub fn shifted_weeks(&self, weeks: i64) -> Self {
        Self::new(self.first_day + Duration::weeks(weeks), self.days, self.tz)
    }
}
