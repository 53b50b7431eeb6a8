//! HTTP surface for the configuration layer.
//!
//! One read-only route: `GET /api/providers/configured` reports which local
//! providers have environment-supplied connection details. The route always
//! answers `200` with one entry per local provider; detection failures
//! degrade per entry rather than producing an error status, so clients can
//! rely on a well-formed list.

use std::{collections::HashMap, sync::Arc};

use {
    axum::{Json, Router, extract::State, routing::get},
    banter_provider_settings::{EnvStack, detect_configured_providers},
    banter_providers::{ConfiguredProvider, ProviderRegistry},
    tracing::info,
};

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ProviderRegistry>,
    /// Static `[env]` overrides from the config file, probed after the
    /// process environment.
    pub env_overrides: HashMap<String, String>,
}

impl AppState {
    #[must_use]
    pub fn new(registry: Arc<ProviderRegistry>, env_overrides: HashMap<String, String>) -> Self {
        Self {
            registry,
            env_overrides,
        }
    }
}

#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/providers/configured", get(configured_providers))
        .with_state(state)
}

async fn configured_providers(State(state): State<AppState>) -> Json<Vec<ConfiguredProvider>> {
    let local_names = state.registry.local_provider_names();
    let env = EnvStack::new(HashMap::new(), state.env_overrides.clone());
    Json(detect_configured_providers(&state.registry, &local_names, &env))
}

/// Serve on an already-bound listener until the task is cancelled. Callers
/// bind the listener themselves so they can learn the address first.
pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> std::io::Result<()> {
    info!(addr = %listener.local_addr()?, "gateway listening");
    axum::serve(listener, router(state)).await
}
