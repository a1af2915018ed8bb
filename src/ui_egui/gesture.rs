//! Pointer gesture state for the week grid.
//!
//! At most one gesture is live at a time. Pointer-down picks the variant from
//! what was hit, pointer-move updates it, pointer-up consumes it into a
//! [`GestureOutcome`] the calendar acts on.

use chrono::{DateTime, NaiveDate, Utc};
use egui::Pos2;

use super::drag::DragContext;
use super::resize::{ResizeContext, ResizeHandle};
use super::time_grid::GridFrame;
use crate::models::occurrence::OccurrenceKey;

/// Latches once the pointer has travelled further than `threshold` from
/// where it went down. Below the threshold a press is a click.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerTravel {
    origin: Pos2,
    threshold: f32,
    crossed: bool,
}

impl PointerTravel {
    pub fn new(origin: Pos2, threshold: f32) -> Self {
        Self {
            origin,
            threshold,
            crossed: false,
        }
    }

    /// Record a pointer position; returns whether the press is now a drag
    pub fn record(&mut self, pointer: Pos2) -> bool {
        if !self.crossed && self.origin.distance(pointer) > self.threshold {
            self.crossed = true;
        }
        self.crossed
    }

    pub fn is_drag(&self) -> bool {
        self.crossed
    }
}

/// Drag-to-create on an empty slot. The start stays where the pointer went
/// down; the end follows the pointer within the same column.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateContext {
    pub day: usize,
    pub date: NaiveDate,
    pub start_minutes: i64,
    pub end_minutes: i64,
}

impl CreateContext {
    pub fn begin(frame: &GridFrame<'_>, day: usize, pointer: Pos2) -> Option<Self> {
        let date = frame.date(day)?;
        let start_minutes = frame
            .grid
            .clamp_to_day(frame.grid.offset_to_minutes(frame.viewport.column_y(pointer.y)));
        Some(Self {
            day,
            date,
            start_minutes,
            end_minutes: start_minutes + frame.grid.slot_minutes(),
        })
    }

    /// Extend the selection; moves over other columns are ignored
    pub fn update(&mut self, frame: &GridFrame<'_>, pointer: Pos2) -> bool {
        if frame.viewport.day_at(pointer.x) != Some(self.day) {
            return false;
        }
        let snapped = frame.grid.edge_minutes(frame.viewport.column_y(pointer.y));
        self.end_minutes = snapped.max(self.start_minutes + frame.grid.slot_minutes());
        true
    }

    /// Resolved start and end; never shorter than one slot, even when both
    /// edges fall in the same DST gap
    pub fn times(&self, frame: &GridFrame<'_>) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = frame.instant(self.date, self.start_minutes);
        let end = frame.instant(self.date, self.end_minutes);
        (start, end.max(start + frame.grid.slot_duration()))
    }
}

/// What a pointer-down landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Empty { day: usize },
    Block { index: usize },
    Handle { index: usize, handle: ResizeHandle },
}

#[derive(Debug, Clone, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Creating(CreateContext),
    Moving(DragContext),
    Resizing(ResizeContext),
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    /// Master being moved or resized, if any
    pub fn event_id(&self) -> Option<i64> {
        match self {
            Gesture::Moving(ctx) => Some(ctx.event_id),
            Gesture::Resizing(ctx) => Some(ctx.event_id),
            Gesture::Idle | Gesture::Creating(_) => None,
        }
    }

    /// Feed a pointer move. Returns the preview times of the moved or
    /// resized master when they changed.
    pub fn update(&mut self, frame: &GridFrame<'_>, pointer: Pos2) -> Option<(i64, DateTime<Utc>, DateTime<Utc>)> {
        match self {
            Gesture::Idle => None,
            Gesture::Creating(ctx) => {
                ctx.update(frame, pointer);
                None
            }
            Gesture::Moving(ctx) => ctx
                .update(frame, pointer)
                .map(|(start, end)| (ctx.event_id, start, end)),
            Gesture::Resizing(ctx) => ctx
                .update(frame, pointer)
                .map(|(start, end)| (ctx.event_id, start, end)),
        }
    }

    /// Consume the gesture at pointer-up
    pub fn finish(self, frame: &GridFrame<'_>) -> GestureOutcome {
        match self {
            Gesture::Idle => GestureOutcome::None,
            Gesture::Creating(ctx) => {
                let (start, end) = ctx.times(frame);
                GestureOutcome::OpenCreate { start, end }
            }
            Gesture::Moving(ctx) => {
                if !ctx.is_dragging() {
                    GestureOutcome::OpenEdit {
                        event_id: ctx.event_id,
                    }
                } else if ctx.changed() {
                    GestureOutcome::Commit(PendingCommit {
                        event_id: ctx.event_id,
                        start: ctx.current.0,
                        end: ctx.current.1,
                    })
                } else {
                    GestureOutcome::None
                }
            }
            Gesture::Resizing(ctx) => {
                if !ctx.is_dragging() {
                    GestureOutcome::OpenEdit {
                        event_id: ctx.event_id,
                    }
                } else if ctx.changed() {
                    GestureOutcome::Commit(PendingCommit {
                        event_id: ctx.event_id,
                        start: ctx.current.0,
                        end: ctx.current.1,
                    })
                } else {
                    GestureOutcome::None
                }
            }
        }
    }

    /// Live preview times once the drag threshold has been crossed
    pub fn preview_times(&self) -> Option<(i64, DateTime<Utc>, DateTime<Utc>)> {
        match self {
            Gesture::Moving(ctx) if ctx.is_dragging() => Some((ctx.event_id, ctx.current.0, ctx.current.1)),
            Gesture::Resizing(ctx) if ctx.is_dragging() => Some((ctx.event_id, ctx.current.0, ctx.current.1)),
            _ => None,
        }
    }

    /// Original times of the master, for rolling back a cancelled preview
    pub fn original_times(&self) -> Option<(i64, DateTime<Utc>, DateTime<Utc>)> {
        match self {
            Gesture::Moving(ctx) => Some((ctx.event_id, ctx.original_start, ctx.original_end)),
            Gesture::Resizing(ctx) => Some((ctx.event_id, ctx.original_start, ctx.original_end)),
            Gesture::Idle | Gesture::Creating(_) => None,
        }
    }
}

/// A time change awaiting its single store write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCommit {
    pub event_id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// Nothing to do (no gesture, or the block ended where it started)
    None,
    /// Open the editor prefilled with a new slot
    OpenCreate { start: DateTime<Utc>, end: DateTime<Utc> },
    /// A master was clicked without dragging
    OpenEdit { event_id: i64 },
    /// A generated instance was clicked
    OpenReadOnly(OccurrenceKey),
    /// Persist new times for a master
    Commit(PendingCommit),
}
