use super::shared::{encode_instant, map_event_row, EVENT_COLUMNS};
use super::{EventRepository, StoreError};
use crate::models::event::Event;
use chrono::{DateTime, Utc};
use rusqlite::params;

impl<'a> EventRepository<'a> {
    /// Masters of a user that overlap `[start, end)`, plus (optionally)
    /// recurring masters that began earlier and have not ended before
    /// `start`.
    pub fn find_by_range(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        include_repeating: bool,
    ) -> Result<Vec<Event>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {}
             FROM events
             WHERE user_id = ?1
               AND start_time < ?3
               AND (
                    end_time > ?2
                    OR (?4 AND repeat_kind != 'none'
                        AND (repeat_until IS NULL OR repeat_until >= ?2))
               )
             ORDER BY start_time ASC, id ASC",
            EVENT_COLUMNS
        ))?;

        let events = stmt
            .query_map(
                params![
                    user_id,
                    encode_instant(start),
                    encode_instant(end),
                    include_repeating
                ],
                map_event_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(events)
    }
}
