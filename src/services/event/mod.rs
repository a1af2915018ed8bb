//! Calendar event service entry point.
//! Defines the event-storage contract the calendar consumes, a SQLite-backed
//! implementation, and recurrence expansion helpers organized across
//! focused submodules.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use thiserror::Error;

use crate::models::event::{Event, EventDraft, EventPatch, ValidationError};
use crate::services::database::Database;

pub mod crud;
pub mod queries;
pub mod recurrence;
mod shared;

/// Failures reported by an event store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid event: {0}")]
    Validation(#[from] ValidationError),
    #[error("Event with id {0} not found")]
    NotFound(i64),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Server error: {0}")]
    Server(String),
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// The event-storage service the calendar reads masters from and commits
/// changes to. All instants are absolute (UTC).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Masters of `user_id` whose occurrences could intersect `[start, end)`.
    /// With `include_repeating` set, recurring masters that start before
    /// `end` are returned even when their own interval lies earlier.
    async fn list(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        include_repeating: bool,
    ) -> Result<Vec<Event>, StoreError>;

    async fn create(&self, draft: EventDraft) -> Result<Event, StoreError>;

    async fn update(&self, event_id: i64, patch: EventPatch) -> Result<Event, StoreError>;

    /// Deletes the master and with it every generated instance.
    async fn delete(&self, event_id: i64) -> Result<(), StoreError>;
}

/// Synchronous event operations on a borrowed SQLite connection.
pub struct EventRepository<'a> {
    pub(crate) conn: &'a Connection,
    pub(crate) acting_user: i64,
}

impl<'a> EventRepository<'a> {
    /// `acting_user` is recorded as the creator of new events
    pub fn new(conn: &'a Connection, acting_user: i64) -> Self {
        Self { conn, acting_user }
    }
}

/// `EventStore` backed by a local SQLite database.
pub struct SqliteEventStore {
    db: Mutex<Database>,
    acting_user: i64,
}

impl SqliteEventStore {
    pub fn new(db: Database, acting_user: i64) -> Self {
        Self {
            db: Mutex::new(db),
            acting_user,
        }
    }

    /// Fresh in-memory store with the schema in place
    pub fn in_memory(acting_user: i64) -> anyhow::Result<Self> {
        let db = Database::new(":memory:")?;
        db.initialize_schema()?;
        Ok(Self::new(db, acting_user))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Database>, StoreError> {
        self.db
            .lock()
            .map_err(|_| StoreError::Server("event database lock poisoned".to_string()))
    }
}

#[async_trait]
impl EventStore for SqliteEventStore {
    async fn list(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        include_repeating: bool,
    ) -> Result<Vec<Event>, StoreError> {
        let db = self.lock()?;
        EventRepository::new(db.connection(), self.acting_user)
            .find_by_range(user_id, start, end, include_repeating)
    }

    async fn create(&self, draft: EventDraft) -> Result<Event, StoreError> {
        let db = self.lock()?;
        EventRepository::new(db.connection(), self.acting_user).create(draft)
    }

    async fn update(&self, event_id: i64, patch: EventPatch) -> Result<Event, StoreError> {
        let db = self.lock()?;
        EventRepository::new(db.connection(), self.acting_user).update(event_id, &patch)
    }

    async fn delete(&self, event_id: i64) -> Result<(), StoreError> {
        let db = self.lock()?;
        EventRepository::new(db.connection(), self.acting_user).delete(event_id)
    }
}
