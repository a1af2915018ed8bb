use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::models::event::{Event, EventDraft, EventPatch, RepeatKind, ValidationError};
use crate::models::occurrence::{Occurrence, OccurrenceKey};
use crate::utils::date::{resolve_local, start_of_day};

/// What the editor was opened for
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogMode {
    Create,
    Edit { event_id: i64 },
    /// Details of a generated instance; nothing can be saved or deleted
    ReadOnly { occurrence: OccurrenceKey },
}

/// State for the event editing panel. Dates and times are wall-clock values
/// in the viewer's timezone; they become instants on submit.
#[derive(Clone, Debug, PartialEq)]
pub struct EventDialogState {
    pub mode: DialogMode,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_date: NaiveDate,
    pub end_time: NaiveTime,
    pub all_day: bool,
    pub repeat_kind: RepeatKind,
    pub until_date: Option<NaiveDate>,
    /// Inline validation or save error
    pub error_message: Option<String>,
    pub submitting: bool,
}

impl EventDialogState {
    /// Blank draft covering `[start, end)`
    pub fn new_event(start: DateTime<Utc>, end: DateTime<Utc>, tz: Tz) -> Self {
        let start = start.with_timezone(&tz);
        let end = end.with_timezone(&tz);
        Self {
            mode: DialogMode::Create,
            title: String::new(),
            description: String::new(),
            date: start.date_naive(),
            start_time: start.time(),
            end_date: end.date_naive(),
            end_time: end.time(),
            all_day: false,
            repeat_kind: RepeatKind::None,
            until_date: None,
            error_message: None,
            submitting: false,
        }
    }

    pub fn from_event(event: &Event, tz: Tz) -> Self {
        let mut state = Self::new_event(event.start, event.end, tz);
        state.mode = DialogMode::Edit { event_id: event.id };
        state.fill_details(&event.title, event.description.as_deref(), event.all_day, event.repeat_kind);
        state.until_date = event.repeat_until.map(|until| until.with_timezone(&tz).date_naive());
        state
    }

    /// Read-only view of an occurrence; `master` supplies the repeat bound
    pub fn read_only(occurrence: &Occurrence, master: Option<&Event>, tz: Tz) -> Self {
        let mut state = Self::new_event(occurrence.start, occurrence.end, tz);
        state.mode = DialogMode::ReadOnly {
            occurrence: occurrence.key(),
        };
        state.fill_details(
            &occurrence.title,
            occurrence.description.as_deref(),
            occurrence.all_day,
            occurrence.repeat_kind,
        );
        state.until_date = master
            .and_then(|event| event.repeat_until)
            .map(|until| until.with_timezone(&tz).date_naive());
        state
    }

    fn fill_details(&mut self, title: &str, description: Option<&str>, all_day: bool, repeat_kind: RepeatKind) {
        self.title = title.to_string();
        self.description = description.unwrap_or_default().to_string();
        self.all_day = all_day;
        self.repeat_kind = repeat_kind;

        // All-day events end at the following midnight; show the last day
        if all_day && self.end_time == NaiveTime::MIN && self.end_date > self.date {
            self.end_date -= Duration::days(1);
        }
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self.mode, DialogMode::ReadOnly { .. })
    }

    /// Master being edited, if any
    pub fn event_id(&self) -> Option<i64> {
        match self.mode {
            DialogMode::Edit { event_id } => Some(event_id),
            DialogMode::Create | DialogMode::ReadOnly { .. } => None,
        }
    }

    pub fn heading(&self) -> &'static str {
        match self.mode {
            DialogMode::Create => "New Event",
            DialogMode::Edit { .. } => "Edit Event",
            DialogMode::ReadOnly { .. } => "Repeating Event",
        }
    }

    /// Start and end instants. All-day drafts cover whole local days.
    pub fn times(&self, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
        if self.all_day {
            let last_day = self.end_date.max(self.date);
            return (
                start_of_day(self.date, tz),
                start_of_day(last_day + Duration::days(1), tz),
            );
        }
        (
            resolve_local(self.date.and_time(self.start_time), tz),
            resolve_local(self.end_date.and_time(self.end_time), tz),
        )
    }

    /// Repeat-until as the last second of the chosen local day
    pub fn repeat_until(&self, tz: Tz) -> Option<DateTime<Utc>> {
        if !self.repeat_kind.is_repeating() {
            return None;
        }
        let last_second = NaiveTime::from_hms_opt(23, 59, 59)?;
        self.until_date
            .map(|date| resolve_local(date.and_time(last_second), tz))
    }

    pub fn validate(&self, tz: Tz) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::BlankTitle.to_string());
        }

        let (start, end) = self.times(tz);
        if !self.all_day && end <= start {
            return Err(ValidationError::EndBeforeStart.to_string());
        }

        if self.repeat_kind.is_repeating() {
            if let Some(until) = self.until_date {
                if until < self.date {
                    return Err("Repeat end date cannot be before the start date".to_string());
                }
            }
        }

        Ok(())
    }

    fn description_value(&self) -> Option<String> {
        let trimmed = self.description.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    pub fn to_draft(&self, user_id: i64, tz: Tz) -> Result<EventDraft, String> {
        self.validate(tz)?;
        let (start, end) = self.times(tz);

        let mut draft = EventDraft::builder()
            .user_id(user_id)
            .title(self.title.trim())
            .start(start)
            .end(end)
            .all_day(self.all_day)
            .repeat(self.repeat_kind, self.repeat_until(tz));

        if let Some(description) = self.description_value() {
            draft = draft.description(description);
        }

        draft.build()
    }

    pub fn to_patch(&self, tz: Tz) -> Result<EventPatch, String> {
        self.validate(tz)?;
        let (start, end) = self.times(tz);

        Ok(EventPatch {
            title: Some(self.title.trim().to_string()),
            description: Some(self.description_value()),
            start: Some(start),
            end: Some(end),
            all_day: Some(self.all_day),
            repeat_kind: Some(self.repeat_kind),
            repeat_until: Some(self.repeat_until(tz)),
        })
    }
}
