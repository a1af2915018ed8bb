use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{self, Result, Row};

use crate::models::event::{Event, RepeatKind};

pub(crate) const EVENT_COLUMNS: &str = "id, user_id, created_by, title, description, start_time, end_time,
        all_day, repeat_kind, repeat_until, created_at, updated_at";

/// Fixed-width UTC form; lexical order equals chronological order.
pub(crate) fn encode_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse the stored text of column `idx`
pub(crate) fn decode_instant(idx: usize, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn instant_at(row: &Row<'_>, idx: usize) -> Result<DateTime<Utc>> {
    decode_instant(idx, &row.get::<_, String>(idx)?)
}

pub(crate) fn map_event_row(row: &Row<'_>) -> Result<Event> {
    let repeat_until = row
        .get::<_, Option<String>>(9)?
        .map(|value| decode_instant(9, &value))
        .transpose()?;

    Ok(Event {
        id: row.get(0)?,
        user_id: row.get(1)?,
        created_by: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        start: instant_at(row, 5)?,
        end: instant_at(row, 6)?,
        all_day: row.get::<_, i32>(7)? != 0,
        repeat_kind: RepeatKind::from_str_lossy(&row.get::<_, String>(8)?),
        repeat_until,
        created_at: instant_at(row, 10)?,
        updated_at: instant_at(row, 11)?,
    })
}
