// Stepper buttons of the date-time fields.
// Hours wrap within the day and minutes wrap within the hour; the date never
// changes.

use chrono::{DateTime, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;

use super::state::EventDialogState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeField {
    Start,
    End,
}

impl EventDialogState {
    fn time_mut(&mut self, field: TimeField) -> &mut NaiveTime {
        match field {
            TimeField::Start => &mut self.start_time,
            TimeField::End => &mut self.end_time,
        }
    }

    pub fn step_hours(&mut self, field: TimeField, delta: i32) {
        let time = self.time_mut(field);
        let hour = (time.hour() as i32 + delta).rem_euclid(24) as u32;
        if let Some(stepped) = time.with_hour(hour) {
            *time = stepped;
        }
    }

    /// Usually called with ±15
    pub fn step_minutes(&mut self, field: TimeField, delta: i32) {
        let time = self.time_mut(field);
        let minute = (time.minute() as i32 + delta).rem_euclid(60) as u32;
        if let Some(stepped) = time.with_minute(minute) {
            *time = stepped;
        }
    }

    /// Set a field to the current local date and minute
    pub fn set_to_now(&mut self, field: TimeField, now: DateTime<Utc>, tz: Tz) {
        let local = now.with_timezone(&tz);
        let time = NaiveTime::from_hms_opt(local.hour(), local.minute(), 0).unwrap_or(NaiveTime::MIN);
        match field {
            TimeField::Start => {
                self.date = local.date_naive();
                self.start_time = time;
            }
            TimeField::End => {
                self.end_date = local.date_naive();
                self.end_time = time;
            }
        }
    }
}
