//! Chat assistant endpoint.

use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use grange_core::assistant::{answer, ChatMessage};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/chat", post(chat))
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Prior turns, oldest first; the assistant keeps no memory of its
    /// own between requests.
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// POST /chat - Answer one visitor message over the site's data
async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let reply = answer(
        &*state.store,
        &*state.model,
        &req.message,
        req.history,
        Utc::now(),
    )
    .await?;
    Ok(Json(ChatResponse { reply }))
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
    async fn test_chat_returns_model_reply() {
        let (state, _, _) = test_state();

        let response = app(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"message":"When is the next event?"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["reply"], "canned reply");
    }
}
