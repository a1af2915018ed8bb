//! Recurrence expansion: master events to the occurrences visible in a
//! window.

use crate::models::event::Event;
use crate::models::occurrence::Occurrence;
use crate::models::window::VisibleWindow;
use crate::utils::date::{local_date, resolve_local};

mod utils;

use utils::{first_step_near, nth_repeat_date};

/// Expand masters into every occurrence whose local date lies inside
/// `window`, sorted by start.
pub fn expand_occurrences(masters: &[Event], window: &VisibleWindow) -> Vec<Occurrence> {
    let mut occurrences: Vec<Occurrence> = masters
        .iter()
        .flat_map(|event| expand_event(event, window))
        .collect();

    occurrences.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then(a.event_id.cmp(&b.event_id))
    });
    occurrences
}

/// Occurrences of a single master inside `window`.
///
/// The master's own appearance is emitted once (when in-window) and is not
/// marked as generated; repetitions keep the master's local time of day and
/// duration and stop at the earlier of the repeat-until date and the last
/// visible day.
pub fn expand_event(event: &Event, window: &VisibleWindow) -> Vec<Occurrence> {
    let tz = window.timezone();
    let local_start = event.start.with_timezone(&tz);
    let anchor = local_start.date_naive();

    let mut occurrences = Vec::new();
    if window.contains(anchor) {
        occurrences.push(Occurrence::master(event));
    }

    if !event.is_recurring() {
        return occurrences;
    }

    let mut last = window.last_day();
    if let Some(until) = event.repeat_until {
        last = last.min(local_date(until, tz));
    }
    if last <= anchor {
        return occurrences;
    }

    let time_of_day = local_start.time();
    let mut step = first_step_near(anchor, event.repeat_kind, window.first_day());

    while let Some(date) = nth_repeat_date(anchor, event.repeat_kind, step) {
        if date > last {
            break;
        }
        if date >= window.first_day() {
            let start = resolve_local(date.and_time(time_of_day), tz);
            occurrences.push(Occurrence::instance(event, start));
        }
        step += 1;
    }

    occurrences
}
