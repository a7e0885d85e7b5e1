//! Finance ledger endpoints.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use grange_core::ledger::monthly_summary;
use grange_core::store::LedgerStore;
use grange_core::{GrangeError, LedgerEntry, MonthSummary, NewLedgerEntry};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ledger", get(list_entries).post(create_entry))
        .route("/ledger/summary", get(summary))
        .route("/ledger/{id}", axum::routing::delete(delete_entry))
}

/// GET /ledger - List all ledger entries
async fn list_entries(State(state): State<AppState>) -> Result<Json<Vec<LedgerEntry>>, AppError> {
    Ok(Json(state.store.list_entries().await?))
}

/// POST /ledger - Record one entry
async fn create_entry(
    State(state): State<AppState>,
    Json(entry): Json<NewLedgerEntry>,
) -> Result<Json<LedgerEntry>, AppError> {
    Ok(Json(state.store.insert_entry(entry).await?))
}

/// GET /ledger/summary - Per-month income/expense/net totals
async fn summary(State(state): State<AppState>) -> Result<Json<Vec<MonthSummary>>, AppError> {
    let entries = state.store.list_entries().await?;
    Ok(Json(monthly_summary(&entries)))
}

/// DELETE /ledger/:id - Remove one entry
async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !state.store.delete_entry(&id).await? {
        return Err(GrangeError::NotFound(format!("ledger entry {id}")).into());
    }
    Ok(Json(serde_json::json!({ "deleted": true })))
}
