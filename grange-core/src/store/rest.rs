//! Passthrough to the hosted database's REST interface.
//!
//! The database speaks a PostgREST dialect: tables are URL paths,
//! filters are `column=eq.value` query parameters, and writes return the
//! affected rows when asked with `Prefer: return=representation`. Nothing
//! here is smarter than building those requests and decoding the rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{GrangeError, GrangeResult};
use crate::event::{format_timestamp, Event, NewEvent};
use crate::home::HomeSection;
use crate::ledger::{LedgerEntry, NewLedgerEntry};
use crate::note::{NewNote, Note};
use crate::store::{EventStore, HomeStore, LedgerStore, NoteStore};

const EVENTS_TABLE: &str = "events";
const LEDGER_TABLE: &str = "ledger_entries";
const NOTES_TABLE: &str = "notes";
const HOME_TABLE: &str = "home_sections";

pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
}

impl RestStore {
    /// `base_url` is the REST root of the hosted database; `api_key` is
    /// sent on every request as both the service key header and a bearer
    /// token, which is how the service expects it.
    pub fn new(base_url: &str, api_key: &str) -> GrangeResult<Self> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| GrangeError::Config("API key is not a valid header value".into()))?;
        let key = HeaderValue::from_str(api_key)
            .map_err(|_| GrangeError::Config("API key is not a valid header value".into()))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert("apikey", key);

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(RestStore {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    async fn select_all<R: DeserializeOwned>(&self, table: &str) -> GrangeResult<Vec<R>> {
        let response = self
            .client
            .get(self.table_url(table))
            .query(&[("select", "*")])
            .send()
            .await?;
        decode_rows(response, table).await
    }

    /// POST one row and return it as stored (with its assigned id).
    async fn insert_row<B: Serialize, R: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
    ) -> GrangeResult<R> {
        let response = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        single_row(decode_rows(response, table).await?, table)
    }

    async fn delete_by_id(&self, table: &str, id: &str) -> GrangeResult<bool> {
        let response = self
            .client
            .delete(self.table_url(table))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .send()
            .await?;
        let deleted: Vec<serde_json::Value> = decode_rows(response, table).await?;
        Ok(!deleted.is_empty())
    }
}

async fn decode_rows<R: DeserializeOwned>(
    response: reqwest::Response,
    table: &str,
) -> GrangeResult<Vec<R>> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GrangeError::Store(format!(
            "{table}: database returned {status}: {body}"
        )));
    }
    response
        .json()
        .await
        .map_err(|e| GrangeError::Store(format!("{table}: could not decode rows: {e}")))
}

fn single_row<R>(mut rows: Vec<R>, table: &str) -> GrangeResult<R> {
    rows.pop()
        .ok_or_else(|| GrangeError::Store(format!("{table}: write returned no row")))
}

#[async_trait]
impl EventStore for RestStore {
    async fn list_events(&self) -> GrangeResult<Vec<Event>> {
        self.select_all(EVENTS_TABLE).await
    }

    async fn find_event(
        &self,
        title: &str,
        starts_at: DateTime<Utc>,
    ) -> GrangeResult<Option<Event>> {
        let response = self
            .client
            .get(self.table_url(EVENTS_TABLE))
            .query(&[
                ("select", "*".to_string()),
                ("title", format!("eq.{title}")),
                ("starts_at", format!("eq.{}", format_timestamp(starts_at))),
            ])
            .send()
            .await?;
        let mut rows: Vec<Event> = decode_rows(response, EVENTS_TABLE).await?;
        Ok(rows.pop())
    }

    async fn insert_event(&self, event: NewEvent) -> GrangeResult<Event> {
        self.insert_row(EVENTS_TABLE, &event).await
    }

    async fn get_event(&self, id: &str) -> GrangeResult<Option<Event>> {
        let response = self
            .client
            .get(self.table_url(EVENTS_TABLE))
            .query(&[("select", "*".to_string()), ("id", format!("eq.{id}"))])
            .send()
            .await?;
        let mut rows: Vec<Event> = decode_rows(response, EVENTS_TABLE).await?;
        Ok(rows.pop())
    }

    async fn update_event(&self, id: &str, event: NewEvent) -> GrangeResult<Event> {
        let response = self
            .client
            .patch(self.table_url(EVENTS_TABLE))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&event)
            .send()
            .await?;
        let rows: Vec<Event> = decode_rows(response, EVENTS_TABLE).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| GrangeError::NotFound(format!("event {id}")))
    }

    async fn delete_event(&self, id: &str) -> GrangeResult<bool> {
        self.delete_by_id(EVENTS_TABLE, id).await
    }
}

#[async_trait]
impl LedgerStore for RestStore {
    async fn list_entries(&self) -> GrangeResult<Vec<LedgerEntry>> {
        self.select_all(LEDGER_TABLE).await
    }

    async fn insert_entry(&self, entry: NewLedgerEntry) -> GrangeResult<LedgerEntry> {
        self.insert_row(LEDGER_TABLE, &entry).await
    }

    async fn delete_entry(&self, id: &str) -> GrangeResult<bool> {
        self.delete_by_id(LEDGER_TABLE, id).await
    }
}

#[async_trait]
impl NoteStore for RestStore {
    async fn list_notes(&self) -> GrangeResult<Vec<Note>> {
        self.select_all(NOTES_TABLE).await
    }

    async fn get_note(&self, id: &str) -> GrangeResult<Option<Note>> {
        let response = self
            .client
            .get(self.table_url(NOTES_TABLE))
            .query(&[("select", "*".to_string()), ("id", format!("eq.{id}"))])
            .send()
            .await?;
        let mut rows: Vec<Note> = decode_rows(response, NOTES_TABLE).await?;
        Ok(rows.pop())
    }

    async fn insert_note(&self, note: NewNote) -> GrangeResult<Note> {
        self.insert_row(NOTES_TABLE, &note).await
    }

    async fn update_note(&self, id: &str, note: NewNote) -> GrangeResult<Note> {
        let response = self
            .client
            .patch(self.table_url(NOTES_TABLE))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&note)
            .send()
            .await?;
        let rows: Vec<Note> = decode_rows(response, NOTES_TABLE).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| GrangeError::NotFound(format!("note {id}")))
    }

    async fn delete_note(&self, id: &str) -> GrangeResult<bool> {
        self.delete_by_id(NOTES_TABLE, id).await
    }
}

#[async_trait]
impl HomeStore for RestStore {
    async fn list_sections(&self) -> GrangeResult<Vec<HomeSection>> {
        self.select_all(HOME_TABLE).await
    }

    async fn upsert_section(&self, section: HomeSection) -> GrangeResult<HomeSection> {
        // merge-duplicates turns the insert into an upsert keyed on the
        // table's unique slug column.
        let response = self
            .client
            .post(self.table_url(HOME_TABLE))
            .query(&[("on_conflict", "slug")])
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&section)
            .send()
            .await?;
        single_row(decode_rows(response, HOME_TABLE).await?, HOME_TABLE)
    }
}
