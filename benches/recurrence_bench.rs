// Benchmark for recurrence expansion
// Measures one visible week against old series and wide windows

use chrono::{Duration, NaiveDate, TimeZone, Utc, Weekday};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use coach_calendar::models::event::{Event, RepeatKind};
use coach_calendar::models::window::VisibleWindow;
use coach_calendar::services::event::recurrence::expand_occurrences;

fn masters(count: i64, kind: RepeatKind) -> Vec<Event> {
    let anchor = Utc.with_ymd_and_hms(2015, 1, 5, 9, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let start = anchor + Duration::minutes(15 * (i % 32));
            Event {
                id: i + 1,
                user_id: 1,
                created_by: 1,
                title: format!("Series {}", i),
                description: None,
                start,
                end: start + Duration::minutes(30),
                all_day: false,
                repeat_kind: kind,
                repeat_until: None,
                created_at: start,
                updated_at: start,
            }
        })
        .collect()
}

fn bench_week_of_old_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("week_of_old_series");
    let window = VisibleWindow::week_of(
        NaiveDate::from_ymd_opt(2025, 3, 12).unwrap(),
        Weekday::Mon,
        chrono_tz::UTC,
    );

    for kind in [RepeatKind::Daily, RepeatKind::Weekly, RepeatKind::Monthly] {
        let events = masters(50, kind);
        group.bench_with_input(
            BenchmarkId::from_parameter(kind.label()),
            &events,
            |b, events| {
                b.iter(|| expand_occurrences(black_box(events), black_box(&window)));
            },
        );
    }

    group.finish();
}

fn bench_window_width(c: &mut Criterion) {
    let mut group = c.benchmark_group("daily_window_width");
    let events = masters(20, RepeatKind::Daily);

    for days in [7u32, 31, 365].iter() {
        let window = VisibleWindow::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            *days,
            chrono_tz::UTC,
        );
        group.bench_with_input(BenchmarkId::from_parameter(days), &window, |b, window| {
            b.iter(|| expand_occurrences(black_box(&events), black_box(window)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_week_of_old_series, bench_window_width);
criterion_main!(benches);
