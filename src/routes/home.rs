//! Homepage content endpoints.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use grange_core::store::HomeStore;
use grange_core::HomeSection;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/home", get(list_sections))
        .route("/home/{slug}", axum::routing::put(upsert_section))
}

/// GET /home - List all homepage sections
async fn list_sections(State(state): State<AppState>) -> Result<Json<Vec<HomeSection>>, AppError> {
    Ok(Json(state.store.list_sections().await?))
}

/// Body for PUT /home/:slug; the slug comes from the path.
#[derive(Deserialize)]
pub struct UpsertSectionRequest {
    pub heading: String,
    pub body: String,
    pub image_url: Option<String>,
}

/// PUT /home/:slug - Create or replace one section
async fn upsert_section(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<UpsertSectionRequest>,
) -> Result<Json<HomeSection>, AppError> {
    let section = HomeSection {
        slug,
        heading: req.heading,
        body: req.body,
        image_url: req.image_url,
    };
    Ok(Json(state.store.upsert_section(section).await?))
}
