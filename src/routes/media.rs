//! Image upload endpoint.

use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;

use grange_core::media::object_key;
use grange_core::GrangeError;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/media", post(upload))
}

#[derive(Serialize)]
pub struct UploadResponse {
    /// Public URL of the stored object.
    pub url: String,
    /// Object path inside the bucket; stored on the event row so the
    /// object can be cleaned up when the event is deleted.
    pub path: String,
}

/// POST /media - Upload an image to the storage bucket
///
/// Takes the first file field of a multipart body.
async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| GrangeError::InvalidInput(format!("bad multipart body: {e}")))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| GrangeError::InvalidInput(format!("could not read upload: {e}")))?;

        let path = object_key(&filename);
        let url = state.media.upload(&path, bytes.to_vec(), &content_type).await?;
        return Ok(Json(UploadResponse { url, path }));
    }

    Err(GrangeError::InvalidInput("no file in upload".into()).into())
}
