use std::sync::Arc;

use grange_core::assistant::ChatModel;
use grange_core::media::MediaStore;
use grange_core::store::Store;

/// Shared application state: the injected collaborators every route
/// handler works through. Handlers never talk to the hosted services
/// directly, so tests swap in in-memory fakes here.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub media: Arc<dyn MediaStore>,
    pub model: Arc<dyn ChatModel>,
    pub admin_password_hash: Option<String>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        media: Arc<dyn MediaStore>,
        model: Arc<dyn ChatModel>,
        admin_password_hash: Option<String>,
    ) -> Self {
        AppState { store, media, model, admin_password_hash }
    }
}
