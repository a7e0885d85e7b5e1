//! Event endpoints, including the rollover trigger.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::warn;

use grange_core::recurrence::{rollover, RolloverOutcome};
use grange_core::store::EventStore;
use grange_core::{Event, GrangeError, NewEvent};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_events))
        .route("/events/rollover", post(trigger_rollover))
        .route(
            "/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
}

/// POST /events/rollover - Advance overdue recurring events
///
/// Invoked by an external periodic job; takes no body and, like every
/// other endpoint here, requires no credentials.
async fn trigger_rollover(
    State(state): State<AppState>,
) -> Result<Json<RolloverOutcome>, AppError> {
    let store: &dyn EventStore = &*state.store;
    let outcome = rollover(store, Utc::now()).await?;
    Ok(Json(outcome))
}

/// GET /events - List all events
async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    Ok(Json(state.store.list_events().await?))
}

/// Body for POST /events: one event, or a batch (the editor's manual
/// recurrence preview creates many rows at once).
#[derive(Deserialize)]
#[serde(untagged)]
pub enum CreateEventsRequest {
    One(NewEvent),
    Many(Vec<NewEvent>),
}

/// POST /events - Create one or many events
async fn create_events(
    State(state): State<AppState>,
    Json(req): Json<CreateEventsRequest>,
) -> Result<Json<Vec<Event>>, AppError> {
    let events = match req {
        CreateEventsRequest::One(event) => vec![event],
        CreateEventsRequest::Many(events) => events,
    };

    let mut created = Vec::with_capacity(events.len());
    for event in events {
        created.push(state.store.insert_event(event).await?);
    }
    Ok(Json(created))
}

/// GET /events/:id - Fetch one event
async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Event>, AppError> {
    let event = state
        .store
        .get_event(&id)
        .await?
        .ok_or_else(|| GrangeError::NotFound(format!("event {id}")))?;
    Ok(Json(event))
}

/// PUT /events/:id - Replace one event
async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(event): Json<NewEvent>,
) -> Result<Json<Event>, AppError> {
    Ok(Json(state.store.update_event(&id, event).await?))
}

/// DELETE /events/:id - Delete one event
///
/// Best-effort deletes the associated image object; a storage failure is
/// logged and the row is deleted anyway.
async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let event = state
        .store
        .get_event(&id)
        .await?
        .ok_or_else(|| GrangeError::NotFound(format!("event {id}")))?;

    if let Some(path) = &event.image_path {
        if let Err(err) = state.media.delete(path).await {
            warn!(event = %id, path = %path, error = %err, "image cleanup failed");
        }
    }

    state.store.delete_event(&id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}
