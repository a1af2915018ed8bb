// Occurrence module
// One calendar appearance of a master event; computed, never stored

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::models::event::{Event, RepeatKind};
use crate::utils::date::local_date;

/// Identifies an occurrence inside one expansion. Generated instances share
/// their master's id, so the start instant disambiguates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OccurrenceKey {
    pub event_id: i64,
    pub start: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Occurrence {
    pub event_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub all_day: bool,
    pub repeat_kind: RepeatKind,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// False for the master's own first appearance
    pub is_generated_instance: bool,
}

impl Occurrence {
    /// The master's own appearance at its stored times
    pub fn master(event: &Event) -> Self {
        Self::at(event, event.start, false)
    }

    /// A generated appearance starting at `start` with the master's duration
    pub fn instance(event: &Event, start: DateTime<Utc>) -> Self {
        Self::at(event, start, true)
    }

    fn at(event: &Event, start: DateTime<Utc>, is_generated_instance: bool) -> Self {
        Self {
            event_id: event.id,
            title: event.title.clone(),
            description: event.description.clone(),
            all_day: event.all_day,
            repeat_kind: event.repeat_kind,
            start,
            end: start + event.duration(),
            is_generated_instance,
        }
    }

    pub fn key(&self) -> OccurrenceKey {
        OccurrenceKey {
            event_id: self.event_id,
            start: self.start,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Local date the occurrence is placed on
    pub fn date(&self, tz: Tz) -> NaiveDate {
        local_date(self.start, tz)
    }

    /// Only the master's own appearance may be dragged, resized or edited
    pub fn is_editable(&self) -> bool {
        !self.is_generated_instance
    }
}
