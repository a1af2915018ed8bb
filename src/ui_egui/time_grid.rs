//! Time grid geometry for the week view.
//!
//! Maps minutes since local midnight to vertical pixel offsets inside a day
//! column and back, snapping to the configured slot granularity. All inputs
//! are clamped, never rejected.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use egui::{Pos2, Rect, Vec2};

use crate::models::settings::CalendarSettings;
use crate::models::window::VisibleWindow;
use crate::utils::date::{at_minutes, MINUTES_PER_DAY};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeGrid {
    hour_height: f32,
    slot_minutes: i64,
}

impl TimeGrid {
    pub fn new(hour_height: f32, slot_minutes: u32) -> Self {
        Self {
            hour_height: hour_height.max(1.0),
            slot_minutes: (slot_minutes as i64).clamp(1, MINUTES_PER_DAY),
        }
    }

    pub fn from_settings(settings: &CalendarSettings) -> Self {
        Self::new(settings.hour_height, settings.slot_minutes)
    }

    pub fn hour_height(&self) -> f32 {
        self.hour_height
    }

    pub fn slot_minutes(&self) -> i64 {
        self.slot_minutes
    }

    /// One slot as elapsed time; the shortest interval a gesture produces
    pub fn slot_duration(&self) -> Duration {
        Duration::minutes(self.slot_minutes)
    }

    /// Pixel height of one slot
    pub fn slot_height(&self) -> f32 {
        self.minutes_to_offset(self.slot_minutes)
    }

    /// Pixel height of a whole day column
    pub fn day_height(&self) -> f32 {
        self.minutes_to_offset(MINUTES_PER_DAY)
    }

    pub fn minutes_to_offset(&self, minutes: i64) -> f32 {
        minutes as f32 / 60.0 * self.hour_height
    }

    /// Inverse of `minutes_to_offset`, rounded to the nearest slot boundary
    pub fn offset_to_minutes(&self, pixels: f32) -> i64 {
        let minutes = pixels / self.hour_height * 60.0;
        let slots = (minutes / self.slot_minutes as f32).round();
        slots as i64 * self.slot_minutes
    }

    /// Latest start that still leaves one slot before midnight
    pub fn clamp_to_day(&self, minutes: i64) -> i64 {
        minutes.clamp(0, MINUTES_PER_DAY - self.slot_minutes)
    }

    /// Snapped start minutes under a pointer, given the column's visible top
    /// edge and the scroll container's offset
    pub fn pointer_to_minutes(&self, pointer_y: f32, column_top: f32, scroll_offset: f32) -> i64 {
        self.clamp_to_day(self.offset_to_minutes(pointer_y - column_top + scroll_offset))
    }

    /// Snapped edge position in `[0, 1440]`; used for end times, which may
    /// sit on midnight
    pub fn edge_minutes(&self, column_y: f32) -> i64 {
        self.offset_to_minutes(column_y).clamp(0, MINUTES_PER_DAY)
    }

    /// Offset of the current-time line; unsnapped
    pub fn now_offset(&self, minutes: i64) -> f32 {
        self.minutes_to_offset(minutes.clamp(0, MINUTES_PER_DAY))
    }

    /// Top and height of a block covering `[start, end)` minutes, with a
    /// minimum visual height so short events stay clickable. Blocks padded
    /// up to that height near midnight are pushed up to stay in the column.
    pub fn block_span(&self, start_minutes: i64, end_minutes: i64, min_height: f32) -> (f32, f32) {
        let start = start_minutes.clamp(0, MINUTES_PER_DAY);
        let end = end_minutes.clamp(start, MINUTES_PER_DAY);
        let height = self.minutes_to_offset(end - start).max(min_height);
        let top = self
            .minutes_to_offset(start)
            .min(self.day_height() - height)
            .max(0.0);
        (top, height)
    }
}

/// Where the host toolkit placed the day columns on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridViewport {
    /// Top-left corner of the first day column's visible area
    pub origin: Pos2,
    pub column_width: f32,
    /// Vertical scroll of the grid container
    pub scroll_offset: f32,
    pub columns: usize,
}

impl Default for GridViewport {
    fn default() -> Self {
        Self {
            origin: Pos2::ZERO,
            column_width: 120.0,
            scroll_offset: 0.0,
            columns: 7,
        }
    }
}

impl GridViewport {
    /// Column under `x`, if any
    pub fn day_at(&self, x: f32) -> Option<usize> {
        if self.column_width <= 0.0 || x < self.origin.x {
            return None;
        }
        let index = ((x - self.origin.x) / self.column_width).floor() as usize;
        (index < self.columns).then_some(index)
    }

    /// Column under `x`, clamped to the first/last column while dragging
    /// outside the grid
    pub fn clamped_day_at(&self, x: f32) -> usize {
        if self.column_width <= 0.0 || self.columns == 0 {
            return 0;
        }
        let index = ((x - self.origin.x) / self.column_width).floor();
        index.clamp(0.0, (self.columns - 1) as f32) as usize
    }

    /// Pointer y relative to the top of the (scrolled) column content
    pub fn column_y(&self, pointer_y: f32) -> f32 {
        pointer_y - self.origin.y + self.scroll_offset
    }

    /// Screen-space rectangle of a block in a day column
    pub fn block_rect(&self, day: usize, top: f32, height: f32) -> Rect {
        Rect::from_min_size(
            Pos2::new(
                self.origin.x + day as f32 * self.column_width,
                self.origin.y - self.scroll_offset + top,
            ),
            Vec2::new(self.column_width, height),
        )
    }
}

/// Everything a gesture needs to turn a pointer position into times.
#[derive(Debug, Clone, Copy)]
pub struct GridFrame<'a> {
    pub grid: &'a TimeGrid,
    pub viewport: &'a GridViewport,
    pub window: &'a VisibleWindow,
}

impl<'a> GridFrame<'a> {
    pub fn tz(&self) -> Tz {
        self.window.timezone()
    }

    pub fn date(&self, day: usize) -> Option<NaiveDate> {
        self.window.day(day)
    }

    /// Instant `minutes` after local midnight of `date`
    pub fn instant(&self, date: NaiveDate, minutes: i64) -> DateTime<Utc> {
        at_minutes(date, minutes, self.tz())
    }
}
