//! Event editor panel state: the draft being created or edited, or the
//! read-only details of a generated instance.

mod state;
mod time_step;

pub use state::{DialogMode, EventDialogState};
pub use time_step::TimeField;
