// Property-based tests for recurrence expansion
// Random anchors, bounds and windows; the expander must agree with plain
// calendar arithmetic

use chrono::{Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use proptest::prelude::*;

use coach_calendar::models::event::{Event, RepeatKind};
use coach_calendar::models::window::VisibleWindow;
use coach_calendar::services::event::recurrence::expand_occurrences;

fn weekly_master(anchor: NaiveDate, hour: u32, minutes: i64, until: NaiveDate) -> Event {
    let start = Utc
        .from_utc_datetime(&anchor.and_hms_opt(hour, 0, 0).unwrap());
    let until = Utc.from_utc_datetime(&until.and_hms_opt(23, 59, 59).unwrap());
    Event {
        id: 1,
        user_id: 1,
        created_by: 1,
        title: "Weekly".to_string(),
        description: None,
        start,
        end: start + Duration::minutes(minutes),
        all_day: false,
        repeat_kind: RepeatKind::Weekly,
        repeat_until: Some(until),
        created_at: start,
        updated_at: start,
    }
}

proptest! {
    /// Property: a weekly master bounded N weeks out yields N + 1
    /// occurrences, 7 days apart, N of them generated
    #[test]
    fn prop_weekly_series_has_n_plus_one_occurrences(
        offset in 0..365i64,
        hour in 0..23u32,
        minutes in 15..120i64,
        weeks in 0..8i64,
    ) {
        let anchor = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset);
        let until = anchor + Duration::weeks(weeks);
        let master = weekly_master(anchor, hour, minutes, until);
        // One window long enough to hold the whole series
        let window = VisibleWindow::new(anchor, (weeks as u32 + 1) * 7, chrono_tz::UTC);

        let occurrences = expand_occurrences(&[master], &window);

        prop_assert_eq!(occurrences.len() as i64, weeks + 1);
        prop_assert!(!occurrences[0].is_generated_instance);
        prop_assert_eq!(
            occurrences.iter().filter(|o| o.is_generated_instance).count() as i64,
            weeks
        );
        for pair in occurrences.windows(2) {
            prop_assert_eq!(pair[1].start - pair[0].start, Duration::days(7));
            prop_assert_eq!(pair[1].duration(), pair[0].duration());
        }
    }

    /// Property: every occurrence lands inside the window and on the
    /// master's weekday
    #[test]
    fn prop_weekly_occurrences_stay_in_window(
        offset in 0..365i64,
        window_offset in 0..400i64,
    ) {
        let anchor = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset);
        let master = weekly_master(anchor, 9, 30, anchor + Duration::weeks(200));
        let window = VisibleWindow::week_of(
            anchor + Duration::days(window_offset),
            Weekday::Mon,
            chrono_tz::UTC,
        );

        let occurrences = expand_occurrences(&[master], &window);

        prop_assert!(occurrences.len() <= 1);
        for occurrence in &occurrences {
            let date = occurrence.date(chrono_tz::UTC);
            prop_assert!(window.contains(date));
            prop_assert_eq!(date.weekday(), anchor.weekday());
        }
    }
}
