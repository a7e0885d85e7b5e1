mod routes;
mod state;

use anyhow::Result;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

use grange_core::assistant::HttpChatModel;
use grange_core::config::GrangeConfig;
use grange_core::media::RestMediaStore;
use grange_core::store::RestStore;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = GrangeConfig::load()?;

    // RUST_LOG wins over the configured filter.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.log.as_deref().unwrap_or("grange_server=info"))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let store = Arc::new(RestStore::new(
        &config.database.url,
        &config.database.api_key,
    )?);
    let media = Arc::new(RestMediaStore::new(
        &config.storage.url,
        &config.storage.bucket,
        &config.storage.api_key,
    ));
    let model = Arc::new(HttpChatModel::new(
        &config.assistant.url,
        &config.assistant.api_key,
        &config.assistant.model,
    ));

    let state = AppState::new(store, media, model, config.admin_password_hash.clone());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(routes::events::router())
        .merge(routes::ledger::router())
        .merge(routes::notes::router())
        .merge(routes::home::router())
        .merge(routes::chat::router())
        .merge(routes::media::router())
        .merge(routes::auth::router())
        .with_state(state)
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("grange-server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
