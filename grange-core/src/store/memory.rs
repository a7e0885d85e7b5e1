//! In-memory store backing the test suites.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{GrangeError, GrangeResult};
use crate::event::{Event, NewEvent};
use crate::home::HomeSection;
use crate::ledger::{LedgerEntry, NewLedgerEntry};
use crate::note::{NewNote, Note};
use crate::store::{EventStore, HomeStore, LedgerStore, NoteStore};

#[derive(Default)]
struct Tables {
    events: Vec<Event>,
    ledger: Vec<LedgerEntry>,
    notes: Vec<Note>,
    sections: Vec<HomeSection>,
}

/// Keeps every table in process memory. Implements the whole store
/// surface; all collections start empty and ids are assigned locally.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn list_events(&self) -> GrangeResult<Vec<Event>> {
        Ok(self.tables.read().await.events.clone())
    }

    async fn find_event(
        &self,
        title: &str,
        starts_at: DateTime<Utc>,
    ) -> GrangeResult<Option<Event>> {
        let tables = self.tables.read().await;
        // Match on the parsed instant, so alternate spellings of the same
        // timestamp still count as duplicates. Rows that do not parse can
        // never match.
        Ok(tables
            .events
            .iter()
            .find(|e| e.title == title && e.start_time() == Some(starts_at))
            .cloned())
    }

    async fn insert_event(&self, event: NewEvent) -> GrangeResult<Event> {
        let stored = Event {
            id: Uuid::new_v4().to_string(),
            title: event.title,
            starts_at: event.starts_at,
            location: event.location,
            description: event.description,
            image_url: event.image_url,
            image_path: event.image_path,
            recurrence: event.recurrence,
        };
        self.tables.write().await.events.push(stored.clone());
        Ok(stored)
    }

    async fn get_event(&self, id: &str) -> GrangeResult<Option<Event>> {
        let tables = self.tables.read().await;
        Ok(tables.events.iter().find(|e| e.id == id).cloned())
    }

    async fn update_event(&self, id: &str, event: NewEvent) -> GrangeResult<Event> {
        let mut tables = self.tables.write().await;
        let row = tables
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| GrangeError::NotFound(format!("event {id}")))?;
        row.title = event.title;
        row.starts_at = event.starts_at;
        row.location = event.location;
        row.description = event.description;
        row.image_url = event.image_url;
        row.image_path = event.image_path;
        row.recurrence = event.recurrence;
        Ok(row.clone())
    }

    async fn delete_event(&self, id: &str) -> GrangeResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.events.len();
        tables.events.retain(|e| e.id != id);
        Ok(tables.events.len() < before)
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn list_entries(&self) -> GrangeResult<Vec<LedgerEntry>> {
        Ok(self.tables.read().await.ledger.clone())
    }

    async fn insert_entry(&self, entry: NewLedgerEntry) -> GrangeResult<LedgerEntry> {
        let stored = LedgerEntry {
            id: Uuid::new_v4().to_string(),
            label: entry.label,
            amount_cents: entry.amount_cents,
            kind: entry.kind,
            occurred_at: entry.occurred_at,
            note: entry.note,
        };
        self.tables.write().await.ledger.push(stored.clone());
        Ok(stored)
    }

    async fn delete_entry(&self, id: &str) -> GrangeResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.ledger.len();
        tables.ledger.retain(|e| e.id != id);
        Ok(tables.ledger.len() < before)
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn list_notes(&self) -> GrangeResult<Vec<Note>> {
        Ok(self.tables.read().await.notes.clone())
    }

    async fn get_note(&self, id: &str) -> GrangeResult<Option<Note>> {
        let tables = self.tables.read().await;
        Ok(tables.notes.iter().find(|n| n.id == id).cloned())
    }

    async fn insert_note(&self, note: NewNote) -> GrangeResult<Note> {
        let stored = Note {
            id: Uuid::new_v4().to_string(),
            title: note.title,
            body: note.body,
            tags: note.tags,
            updated_at: note.updated_at,
        };
        self.tables.write().await.notes.push(stored.clone());
        Ok(stored)
    }

    async fn update_note(&self, id: &str, note: NewNote) -> GrangeResult<Note> {
        let mut tables = self.tables.write().await;
        let row = tables
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| GrangeError::NotFound(format!("note {id}")))?;
        row.title = note.title;
        row.body = note.body;
        row.tags = note.tags;
        row.updated_at = note.updated_at;
        Ok(row.clone())
    }

    async fn delete_note(&self, id: &str) -> GrangeResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.notes.len();
        tables.notes.retain(|n| n.id != id);
        Ok(tables.notes.len() < before)
    }
}

#[async_trait]
impl HomeStore for MemoryStore {
    async fn list_sections(&self) -> GrangeResult<Vec<HomeSection>> {
        Ok(self.tables.read().await.sections.clone())
    }

    async fn upsert_section(&self, section: HomeSection) -> GrangeResult<HomeSection> {
        let mut tables = self.tables.write().await;
        match tables.sections.iter_mut().find(|s| s.slug == section.slug) {
            Some(existing) => *existing = section.clone(),
            None => tables.sections.push(section.clone()),
        }
        Ok(section)
    }
}
