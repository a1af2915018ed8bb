use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use egui::Pos2;

use super::gesture::PointerTravel;
use super::time_grid::GridFrame;
use crate::models::occurrence::Occurrence;
use crate::utils::date::{minute_of_day, MINUTES_PER_DAY};

/// An event being moved across the week grid.
#[derive(Clone, Debug)]
pub struct DragContext {
    pub event_id: i64,
    pub original_start: DateTime<Utc>,
    pub original_end: DateTime<Utc>,
    pub duration: Duration,
    /// Vertical distance between the pointer and the block's top edge at
    /// pointer-down, kept constant while moving
    pub grab_offset: f32,
    pub travel: PointerTravel,
    pub hovered_day: Option<usize>,
    pub current: (DateTime<Utc>, DateTime<Utc>),
}

impl DragContext {
    /// Start moving a master occurrence; generated instances are read-only.
    /// `block_top` is the screen y of the block's top edge.
    pub fn from_occurrence(
        occurrence: &Occurrence,
        pointer: Pos2,
        block_top: f32,
        threshold: f32,
    ) -> Option<Self> {
        if !occurrence.is_editable() {
            return None;
        }
        Some(Self {
            event_id: occurrence.event_id,
            original_start: occurrence.start,
            original_end: occurrence.end,
            duration: occurrence.duration(),
            grab_offset: pointer.y - block_top,
            travel: PointerTravel::new(pointer, threshold),
            hovered_day: None,
            current: (occurrence.start, occurrence.end),
        })
    }

    /// Track the pointer; returns the new times once the drag threshold has
    /// been crossed. The block follows the column under the pointer and its
    /// start is clamped so the event still ends by midnight.
    pub fn update(&mut self, frame: &GridFrame<'_>, pointer: Pos2) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        if !self.travel.record(pointer) {
            return None;
        }

        let day = frame.viewport.clamped_day_at(pointer.x);
        let date = frame.date(day)?;

        let top = frame.viewport.column_y(pointer.y - self.grab_offset);
        let latest = (MINUTES_PER_DAY - self.duration.num_minutes()).max(0);
        let minutes = frame
            .grid
            .clamp_to_day(frame.grid.offset_to_minutes(top))
            .min(latest);

        let start = frame.instant(date, minutes);
        self.hovered_day = Some(day);
        self.current = (start, start + self.duration);
        Some(self.current)
    }

    /// Wall-clock minute the block currently starts at
    pub fn hovered_minute(&self, tz: Tz) -> i64 {
        minute_of_day(self.current.0, tz)
    }

    pub fn is_dragging(&self) -> bool {
        self.travel.is_drag()
    }

    pub fn changed(&self) -> bool {
        self.current.0 != self.original_start
    }
}
