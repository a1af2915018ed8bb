use super::shared::{encode_instant, map_event_row, EVENT_COLUMNS};
use super::{EventRepository, StoreError};
use crate::models::event::{Event, EventDraft, EventPatch};
use chrono::{SubsecRound, Utc};
use rusqlite::{self, params};

impl<'a> EventRepository<'a> {
    /// Insert a new master event.
    pub fn create(&self, draft: EventDraft) -> Result<Event, StoreError> {
        let draft = draft.normalized();
        draft.validate()?;

        let now = encode_instant(Utc::now().trunc_subsecs(0));

        self.conn.execute(
            "INSERT INTO events (
                user_id, created_by, title, description, start_time, end_time,
                all_day, repeat_kind, repeat_until, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                draft.user_id,
                self.acting_user,
                draft.title,
                draft.description,
                encode_instant(draft.start),
                encode_instant(draft.end),
                draft.all_day as i32,
                draft.repeat_kind.as_str(),
                draft.repeat_until.map(encode_instant),
                &now,
                &now,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        log::debug!("Created event {} for user {}", id, draft.user_id);

        self.get(id)?.ok_or(StoreError::NotFound(id))
    }

    /// Retrieve an event by ID.
    pub fn get(&self, id: i64) -> Result<Option<Event>, StoreError> {
        let result = self.conn.query_row(
            &format!("SELECT {} FROM events WHERE id = ?", EVENT_COLUMNS),
            [id],
            map_event_row,
        );

        match result {
            Ok(event) => Ok(Some(event)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply a partial update and return the stored result.
    pub fn update(&self, id: i64, patch: &EventPatch) -> Result<Event, StoreError> {
        let mut event = self.get(id)?.ok_or(StoreError::NotFound(id))?;
        event.apply_patch(patch);
        event.validate()?;

        let rows_affected = self.conn.execute(
            "UPDATE events SET
                title = ?, description = ?, start_time = ?, end_time = ?,
                all_day = ?, repeat_kind = ?, repeat_until = ?, updated_at = ?
             WHERE id = ?",
            params![
                event.title,
                event.description,
                encode_instant(event.start),
                encode_instant(event.end),
                event.all_day as i32,
                event.repeat_kind.as_str(),
                event.repeat_until.map(encode_instant),
                encode_instant(Utc::now().trunc_subsecs(0)),
                id,
            ],
        )?;

        if rows_affected == 0 {
            return Err(StoreError::NotFound(id));
        }

        self.get(id)?.ok_or(StoreError::NotFound(id))
    }

    /// Delete an event by ID. Generated instances are never stored, so the
    /// whole series goes with the master.
    pub fn delete(&self, id: i64) -> Result<(), StoreError> {
        let rows_affected = self.conn.execute("DELETE FROM events WHERE id = ?", [id])?;

        if rows_affected == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }
}
