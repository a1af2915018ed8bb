use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_events_table(conn)?;
    create_event_indexes(conn)?;
    Ok(())
}

fn create_events_table(conn: &Connection) -> Result<()> {
    // Instants are stored as RFC 3339 UTC strings ("...Z") so that string
    // comparison matches chronological order.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            created_by INTEGER NOT NULL,
            title TEXT NOT NULL CHECK (length(trim(title)) > 0),
            description TEXT,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            all_day INTEGER NOT NULL DEFAULT 0,
            repeat_kind TEXT NOT NULL DEFAULT 'none'
                CHECK (repeat_kind IN ('none', 'daily', 'weekly', 'monthly', 'yearly')),
            repeat_until TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )
    .context("Failed to create events table")?;

    Ok(())
}

fn create_event_indexes(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_user_start ON events(user_id, start_time)",
        [],
    )
    .context("Failed to create events index")?;

    Ok(())
}
