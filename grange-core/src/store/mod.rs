//! Storage abstraction over the hosted database.
//!
//! Everything the backend persists goes through these traits, so the HTTP
//! layer and the rollover pass can run against an in-memory fake in tests.
//! Production wires in [`RestStore`], a passthrough to the hosted
//! database's REST interface; no query logic lives on this side of the
//! seam.

mod memory;
mod rest;

pub use memory::MemoryStore;
pub use rest::RestStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::GrangeResult;
use crate::event::{Event, NewEvent};
use crate::home::HomeSection;
use crate::ledger::{LedgerEntry, NewLedgerEntry};
use crate::note::{NewNote, Note};

/// Event rows. The rollover pass relies only on `list_events`,
/// `find_event` and `insert_event`; the rest serves the editing API.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Read every stored event.
    async fn list_events(&self) -> GrangeResult<Vec<Event>>;

    /// Find an event with exactly this title and start instant.
    async fn find_event(
        &self,
        title: &str,
        starts_at: DateTime<Utc>,
    ) -> GrangeResult<Option<Event>>;

    /// Insert a new row and return it with its assigned id.
    async fn insert_event(&self, event: NewEvent) -> GrangeResult<Event>;

    async fn get_event(&self, id: &str) -> GrangeResult<Option<Event>>;

    async fn update_event(&self, id: &str, event: NewEvent) -> GrangeResult<Event>;

    /// Returns `true` if a row was deleted.
    async fn delete_event(&self, id: &str) -> GrangeResult<bool>;
}

/// Finance ledger rows.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn list_entries(&self) -> GrangeResult<Vec<LedgerEntry>>;

    async fn insert_entry(&self, entry: NewLedgerEntry) -> GrangeResult<LedgerEntry>;

    async fn delete_entry(&self, id: &str) -> GrangeResult<bool>;
}

/// Knowledge-base notes.
#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn list_notes(&self) -> GrangeResult<Vec<Note>>;

    async fn get_note(&self, id: &str) -> GrangeResult<Option<Note>>;

    async fn insert_note(&self, note: NewNote) -> GrangeResult<Note>;

    async fn update_note(&self, id: &str, note: NewNote) -> GrangeResult<Note>;

    async fn delete_note(&self, id: &str) -> GrangeResult<bool>;
}

/// Homepage content sections, keyed by slug.
#[async_trait]
pub trait HomeStore: Send + Sync {
    async fn list_sections(&self) -> GrangeResult<Vec<HomeSection>>;

    /// Insert the section, or replace the one already stored under its
    /// slug.
    async fn upsert_section(&self, section: HomeSection) -> GrangeResult<HomeSection>;
}

/// The full storage surface the HTTP state holds.
pub trait Store: EventStore + LedgerStore + NoteStore + HomeStore {}

impl<T: EventStore + LedgerStore + NoteStore + HomeStore> Store for T {}
