// Event Resize System
//
// Resizing a timed event by dragging its top or bottom edge.
// - Top handle: adjusts the start, never past end - one slot
// - Bottom handle: adjusts the end, never before start + one slot

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use egui::{Pos2, Rect, Vec2};

use super::gesture::PointerTravel;
use super::time_grid::GridFrame;
use crate::models::occurrence::Occurrence;
use crate::utils::date::{local_date, minutes_since};

/// Which edge of the event is being resized
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeHandle {
    /// Top edge - adjusts start time
    Top,
    /// Bottom edge - adjusts end time
    Bottom,
}

/// Height of the resize handle hit area
pub const HANDLE_SIZE: f32 = 8.0;

/// Context for an active resize operation
#[derive(Clone, Debug)]
pub struct ResizeContext {
    /// The master event being resized
    pub event_id: i64,
    /// Which handle is being dragged
    pub handle: ResizeHandle,
    /// Local date the block is drawn on
    pub date: NaiveDate,
    pub original_start: DateTime<Utc>,
    pub original_end: DateTime<Utc>,
    /// Wall-clock minutes of the original start/end relative to `date`
    start_minutes: i64,
    end_minutes: i64,
    pub travel: PointerTravel,
    /// Times shown while the gesture is live
    pub current: (DateTime<Utc>, DateTime<Utc>),
}

impl ResizeContext {
    /// Start resizing a master occurrence; generated instances are read-only
    pub fn new(
        occurrence: &Occurrence,
        handle: ResizeHandle,
        pointer: Pos2,
        threshold: f32,
        tz: Tz,
    ) -> Option<Self> {
        if !occurrence.is_editable() {
            return None;
        }
        let date = local_date(occurrence.start, tz);
        Some(Self {
            event_id: occurrence.event_id,
            handle,
            date,
            original_start: occurrence.start,
            original_end: occurrence.end,
            start_minutes: minutes_since(date, occurrence.start, tz),
            end_minutes: minutes_since(date, occurrence.end, tz),
            travel: PointerTravel::new(pointer, threshold),
            current: (occurrence.start, occurrence.end),
        })
    }

    /// Track the pointer; returns the new times once the drag threshold has
    /// been crossed
    pub fn update(&mut self, frame: &GridFrame<'_>, pointer: Pos2) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        if !self.travel.record(pointer) {
            return None;
        }

        let slot = frame.grid.slot_minutes();
        let min_duration = frame.grid.slot_duration();
        let snapped = frame.grid.edge_minutes(frame.viewport.column_y(pointer.y));

        // Floor re-applied after resolving: a DST gap can move the dragged
        // edge onto the fixed one
        self.current = match self.handle {
            ResizeHandle::Top => {
                let start = snapped.min(self.end_minutes - slot).max(0);
                let start = frame.instant(self.date, start).min(self.original_end - min_duration);
                (start, self.original_end)
            }
            ResizeHandle::Bottom => {
                let end = snapped.max(self.start_minutes + slot);
                let end = frame.instant(self.date, end).max(self.original_start + min_duration);
                (self.original_start, end)
            }
        };
        Some(self.current)
    }

    pub fn is_dragging(&self) -> bool {
        self.travel.is_drag()
    }

    /// True once the live times differ from the stored ones
    pub fn changed(&self) -> bool {
        self.current != (self.original_start, self.original_end)
    }
}

/// Calculate handle rects for an event
pub struct HandleRects {
    pub top: Rect,
    pub bottom: Rect,
}

impl HandleRects {
    /// Create handle rects for a timed event
    pub fn for_timed_event(event_rect: Rect) -> Self {
        // Short blocks keep their middle half for moving
        let zone_height = HANDLE_SIZE.min(event_rect.height() / 4.0);

        Self {
            top: Rect::from_min_size(
                Pos2::new(event_rect.left(), event_rect.top()),
                Vec2::new(event_rect.width(), zone_height),
            ),
            bottom: Rect::from_min_size(
                Pos2::new(event_rect.left(), event_rect.bottom() - zone_height),
                Vec2::new(event_rect.width(), zone_height),
            ),
        }
    }

    /// Check if a point hits any handle and return which one
    pub fn hit_test(&self, pos: Pos2) -> Option<ResizeHandle> {
        if self.top.contains(pos) {
            Some(ResizeHandle::Top)
        } else if self.bottom.contains(pos) {
            Some(ResizeHandle::Bottom)
        } else {
            None
        }
    }

    /// Get the rect for a specific handle
    pub fn get(&self, handle: ResizeHandle) -> Rect {
        match handle {
            ResizeHandle::Top => self.top,
            ResizeHandle::Bottom => self.bottom,
        }
    }
}
