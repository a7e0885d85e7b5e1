//! Knowledge-base note endpoints.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;

use grange_core::event::format_timestamp;
use grange_core::store::NoteStore;
use grange_core::{GrangeError, NewNote, Note};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/notes", get(list_notes).post(create_note))
        .route(
            "/notes/{id}",
            get(get_note).put(update_note).delete(delete_note),
        )
}

/// GET /notes - List all notes
async fn list_notes(State(state): State<AppState>) -> Result<Json<Vec<Note>>, AppError> {
    Ok(Json(state.store.list_notes().await?))
}

/// POST /notes - Create a note; the backend stamps `updated_at`
async fn create_note(
    State(state): State<AppState>,
    Json(mut note): Json<NewNote>,
) -> Result<Json<Note>, AppError> {
    note.updated_at = format_timestamp(Utc::now());
    Ok(Json(state.store.insert_note(note).await?))
}

/// GET /notes/:id - Fetch one note
async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Note>, AppError> {
    let note = state
        .store
        .get_note(&id)
        .await?
        .ok_or_else(|| GrangeError::NotFound(format!("note {id}")))?;
    Ok(Json(note))
}

/// PUT /notes/:id - Replace a note; the backend stamps `updated_at`
async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut note): Json<NewNote>,
) -> Result<Json<Note>, AppError> {
    note.updated_at = format_timestamp(Utc::now());
    Ok(Json(state.store.update_note(&id, note).await?))
}

/// DELETE /notes/:id - Delete a note
async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !state.store.delete_note(&id).await? {
        return Err(GrangeError::NotFound(format!("note {id}")).into());
    }
    Ok(Json(serde_json::json!({ "deleted": true })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testing::test_state;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app(state: AppState) -> Router {
        Router::new().merge(router()).with_state(state)
    }

    #[tokio::test]
    async fn test_create_stamps_updated_at() {
        let (state, store, _) = test_state();

        let response = app(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/notes")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"title":"Keys","body":"Spare key is in the shed.","tags":["facilities"]}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let notes = store.list_notes().await.unwrap();
        assert_eq!(notes.len(), 1);
        // Stamped by the backend, not taken from the request.
        assert!(notes[0].updated_at.ends_with('Z'));
    }

    #[tokio::test]
    async fn test_update_missing_note_is_404() {
        let (state, _, _) = test_state();

        let response = app(state)
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/notes/nope")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"title":"x","body":"y"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
