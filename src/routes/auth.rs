//! Admin login endpoint.
//!
//! Verifies the password against the configured argon2 hash and hands
//! back an opaque session token. Nothing else checks that token; the
//! public API, the rollover trigger included, is reachable without it.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use grange_core::GrangeError;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// POST /auth/login - Verify the admin password
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let Some(hash) = &state.admin_password_hash else {
        // No hash configured means there is no admin to log in as.
        return Err(GrangeError::Unauthorized.into());
    };

    let parsed = PasswordHash::new(hash)
        .map_err(|e| GrangeError::Config(format!("bad admin_password_hash: {e}")))?;

    if Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed)
        .is_err()
    {
        return Err(GrangeError::Unauthorized.into());
    }

    Ok(Json(LoginResponse {
        token: Uuid::new_v4().to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testing::test_state;
    use argon2::password_hash::{rand_core::OsRng, SaltString};
    use argon2::PasswordHasher;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app(state: AppState) -> Router {
        Router::new().merge(router()).with_state(state)
    }

    fn hash_of(password: &str) -> String {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_login_with_correct_password_issues_token() {
        let (mut state, _, _) = test_state();
        state.admin_password_hash = Some(hash_of("open sesame"));

        let response = app(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/login")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"password":"open sesame"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(!body["token"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_is_401() {
        let (mut state, _, _) = test_state();
        state.admin_password_hash = Some(hash_of("open sesame"));

        let response = app(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/login")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"password":"let me in"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_without_configured_hash_is_401() {
        let (state, _, _) = test_state();

        let response = app(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/login")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"password":"anything"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
