use chrono::{Datelike, Days, Months, NaiveDate};

use crate::models::event::RepeatKind;

/// Date of the `step`-th repetition after `anchor`.
///
/// Monthly and yearly steps are computed from the anchor each time, and a
/// day that does not exist in the target month clamps to that month's last
/// day (Jan 31 -> Feb 28 -> Mar 31; Feb 29 -> Feb 28 in common years).
pub(super) fn nth_repeat_date(anchor: NaiveDate, kind: RepeatKind, step: u32) -> Option<NaiveDate> {
    match kind {
        RepeatKind::None => None,
        RepeatKind::Daily => anchor.checked_add_days(Days::new(step as u64)),
        RepeatKind::Weekly => anchor.checked_add_days(Days::new(7 * step as u64)),
        RepeatKind::Monthly => anchor.checked_add_months(Months::new(step)),
        RepeatKind::Yearly => anchor.checked_add_months(Months::new(step.checked_mul(12)?)),
    }
}

/// Smallest step (at least 1) whose date can fall on or after `target`.
/// Lets expansion of long-running series skip straight to the window.
pub(super) fn first_step_near(anchor: NaiveDate, kind: RepeatKind, target: NaiveDate) -> u32 {
    if target <= anchor {
        return 1;
    }

    let step = match kind {
        RepeatKind::None => 1,
        RepeatKind::Daily => (target - anchor).num_days(),
        RepeatKind::Weekly => ((target - anchor).num_days() + 6) / 7,
        RepeatKind::Monthly => months_between(anchor, target),
        RepeatKind::Yearly => (target.year() - anchor.year()) as i64,
    };

    step.clamp(1, u32::MAX as i64) as u32
}

fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to.year() as i64 * 12 + to.month0() as i64) - (from.year() as i64 * 12 + from.month0() as i64)
}
