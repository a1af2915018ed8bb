// Test fixtures - reusable test data
// Provides consistent events, settings and grid placement across test files

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Monday of the week most scenarios run in
    pub fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    /// An instant in March 2025 (UTC)
    pub fn march(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, hour, minute, 0).unwrap()
    }
}

/// Sample drafts
pub mod events {
    use super::*;
    use coach_calendar::models::event::{EventDraft, RepeatKind};

    pub const COACHEE: i64 = 42;

    pub fn draft(title: &str, start: DateTime<Utc>, minutes: i64) -> EventDraft {
        EventDraft::builder()
            .user_id(COACHEE)
            .title(title)
            .start(start)
            .end(start + chrono::Duration::minutes(minutes))
            .build()
            .unwrap()
    }

    pub fn repeating(
        title: &str,
        start: DateTime<Utc>,
        minutes: i64,
        kind: RepeatKind,
        until: Option<DateTime<Utc>>,
    ) -> EventDraft {
        let mut draft = draft(title, start, minutes);
        draft.repeat_kind = kind;
        draft.repeat_until = until;
        draft
    }
}

/// Calendar mounted on a known grid placement
pub mod calendar {
    use super::*;
    use coach_calendar::models::settings::CalendarSettings;
    use coach_calendar::services::event::EventStore;
    use coach_calendar::ui_egui::{CalendarMount, GridViewport, WeekCalendar};
    use egui::Pos2;

    /// Columns start at x=0, y=0; each is 100px wide; 80px per hour
    pub fn viewport() -> GridViewport {
        GridViewport {
            origin: Pos2::ZERO,
            column_width: 100.0,
            scroll_offset: 0.0,
            columns: 7,
        }
    }

    pub async fn mounted<S: EventStore>(store: S, settings: CalendarSettings) -> WeekCalendar<S> {
        let mount = CalendarMount {
            user_id: super::events::COACHEE,
            is_admin: false,
        };
        let mut calendar = WeekCalendar::new(store, mount, settings, super::dates::monday()).unwrap();
        calendar.set_viewport(viewport());
        calendar.reload().await;
        calendar
    }
}
