pub mod calendar;
pub mod drag;
pub mod event_dialog;
pub mod gesture;
pub mod resize;
pub mod shortcuts;
pub mod time_grid;
pub mod toast;

pub use calendar::{CalendarMount, CommitStatus, OccurrenceBlock, WeekCalendar};
pub use gesture::{Gesture, GestureOutcome, PendingCommit};
pub use time_grid::{GridViewport, TimeGrid};
