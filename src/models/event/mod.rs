// Event module
// Master event records, creation drafts and partial updates

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a master event repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatKind {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RepeatKind {
    /// All kinds in the order the editor offers them
    pub const ALL: [RepeatKind; 5] = [
        RepeatKind::None,
        RepeatKind::Daily,
        RepeatKind::Weekly,
        RepeatKind::Monthly,
        RepeatKind::Yearly,
    ];

    pub fn is_repeating(&self) -> bool {
        !matches!(self, RepeatKind::None)
    }

    /// Stable string form used for storage
    pub fn as_str(&self) -> &'static str {
        match self {
            RepeatKind::None => "none",
            RepeatKind::Daily => "daily",
            RepeatKind::Weekly => "weekly",
            RepeatKind::Monthly => "monthly",
            RepeatKind::Yearly => "yearly",
        }
    }

    /// Parse the storage form; unknown values fall back to `None`
    pub fn from_str_lossy(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => RepeatKind::Daily,
            "weekly" => RepeatKind::Weekly,
            "monthly" => RepeatKind::Monthly,
            "yearly" => RepeatKind::Yearly,
            _ => RepeatKind::None,
        }
    }

    /// Human label shown by the editor
    pub fn label(&self) -> &'static str {
        match self {
            RepeatKind::None => "Does not repeat",
            RepeatKind::Daily => "Daily",
            RepeatKind::Weekly => "Weekly",
            RepeatKind::Monthly => "Monthly",
            RepeatKind::Yearly => "Yearly",
        }
    }
}

/// Reasons a draft is rejected before it reaches storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title is required")]
    BlankTitle,
    #[error("End time must be after start time")]
    EndBeforeStart,
}

fn check_fields(
    title: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    all_day: bool,
) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::BlankTitle);
    }
    // All-day events span whole days and skip the minute-level interval check.
    if !all_day && end <= start {
        return Err(ValidationError::EndBeforeStart);
    }
    Ok(())
}

/// Persisted master record for a (possibly recurring) calendar event.
///
/// Field names on the wire follow the dashboard API (`start_time`,
/// `end_time`, `repeat_type`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub user_id: i64,
    pub created_by: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "start_time")]
    pub start: DateTime<Utc>,
    #[serde(rename = "end_time")]
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(rename = "repeat_type", default)]
    pub repeat_kind: RepeatKind,
    #[serde(default)]
    pub repeat_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Validate the mutable fields of the event
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_fields(&self.title, self.start, self.end, self.all_day)
    }

    /// Check if this is a recurring event
    pub fn is_recurring(&self) -> bool {
        self.repeat_kind.is_repeating()
    }

    /// Get the duration of the event
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Apply a partial update in place.
    ///
    /// Keeps the `repeat_until` invariant: a non-repeating event never
    /// carries a repeat bound.
    pub fn apply_patch(&mut self, patch: &EventPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(start) = patch.start {
            self.start = start;
        }
        if let Some(end) = patch.end {
            self.end = end;
        }
        if let Some(all_day) = patch.all_day {
            self.all_day = all_day;
        }
        if let Some(kind) = patch.repeat_kind {
            self.repeat_kind = kind;
        }
        if let Some(until) = patch.repeat_until {
            self.repeat_until = until;
        }
        if !self.repeat_kind.is_repeating() {
            self.repeat_until = None;
        }
    }
}

/// Fields needed to create a new master event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "start_time")]
    pub start: DateTime<Utc>,
    #[serde(rename = "end_time")]
    pub end: DateTime<Utc>,
    pub all_day: bool,
    #[serde(rename = "repeat_type")]
    pub repeat_kind: RepeatKind,
    pub repeat_until: Option<DateTime<Utc>>,
}

impl EventDraft {
    /// Create a builder for constructing drafts with optional fields
    pub fn builder() -> EventDraftBuilder {
        EventDraftBuilder::new()
    }

    /// Validate the draft
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_fields(&self.title, self.start, self.end, self.all_day)
    }

    /// Drop the repeat bound when the draft does not repeat
    pub fn normalized(mut self) -> Self {
        if !self.repeat_kind.is_repeating() {
            self.repeat_until = None;
        }
        self
    }
}

/// Partial update of a master event; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(rename = "start_time", skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(rename = "end_time", skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_day: Option<bool>,
    #[serde(rename = "repeat_type", skip_serializing_if = "Option::is_none")]
    pub repeat_kind: Option<RepeatKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_until: Option<Option<DateTime<Utc>>>,
}

impl EventPatch {
    /// Patch that only moves the event in time (drag and resize commits)
    pub fn times(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Builder for creating drafts with optional fields
pub struct EventDraftBuilder {
    user_id: Option<i64>,
    title: Option<String>,
    description: Option<String>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    all_day: bool,
    repeat_kind: RepeatKind,
    repeat_until: Option<DateTime<Utc>>,
}

impl EventDraftBuilder {
    pub fn new() -> Self {
        Self {
            user_id: None,
            title: None,
            description: None,
            start: None,
            end: None,
            all_day: false,
            repeat_kind: RepeatKind::None,
            repeat_until: None,
        }
    }

    /// Set the owning user
    pub fn user_id(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn start(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    pub fn all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }

    /// Set the repeat kind and optional upper bound
    pub fn repeat(mut self, kind: RepeatKind, until: Option<DateTime<Utc>>) -> Self {
        self.repeat_kind = kind;
        self.repeat_until = until;
        self
    }

    /// Build the draft, returning a message for missing required fields
    pub fn build(self) -> Result<EventDraft, String> {
        let user_id = self.user_id.ok_or("Owning user is required")?;
        let title = self.title.ok_or("Event title is required")?;
        let start = self.start.ok_or("Event start time is required")?;
        let end = self.end.ok_or("Event end time is required")?;

        let draft = EventDraft {
            user_id,
            title,
            description: self.description,
            start,
            end,
            all_day: self.all_day,
            repeat_kind: self.repeat_kind,
            repeat_until: self.repeat_until,
        }
        .normalized();

        draft.validate().map_err(|e| e.to_string())?;
        Ok(draft)
    }
}

impl Default for EventDraftBuilder {
    fn default() -> Self {
        Self::new()
    }
}
