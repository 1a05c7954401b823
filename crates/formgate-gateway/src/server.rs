//! HTTP/WebSocket server wiring: upgrade, health, and admin endpoints

use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use formgate_core::SubmitPolicy;
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::registry::{ConnectionId, ConnectionRegistry};
use crate::session;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub submit_policy: SubmitPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            submit_policy: SubmitPolicy::default(),
        }
    }
}

impl ServerConfig {
    /// Defaults with `FORMGATE_HOST` / `FORMGATE_PORT` overrides
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(host) = std::env::var("FORMGATE_HOST") {
            config.host = host;
        }
        if let Ok(port) = std::env::var("FORMGATE_PORT") {
            match port.parse() {
                Ok(port) => config.port = port,
                Err(_) => tracing::warn!(value = %port, "ignoring unparseable FORMGATE_PORT"),
            }
        }
        config
    }
}

/// Shared state handed to every axum handler
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ConnectionRegistry>,
    pub submit_policy: SubmitPolicy,
}

/// Build the router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health_handler))
        .route("/sessions", get(sessions_handler))
        .route("/form/status", get(form_status_handler))
        .route("/form/reset", post(form_reset_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// Bind and serve. Returns a handle carrying the bound port (bind to
/// port 0 for an ephemeral one) and the live registry.
pub async fn start(config: ServerConfig) -> std::io::Result<ServerHandle> {
    let registry = Arc::new(ConnectionRegistry::new());
    let state = AppState {
        registry: Arc::clone(&registry),
        submit_policy: config.submit_policy,
    };
    let router = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "formgate gateway listening");

    let server = tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    Ok(ServerHandle {
        port: local_addr.port(),
        registry,
        _server: server,
    })
}

/// Handle returned by [`start`]; keeps the accept loop alive
pub struct ServerHandle {
    pub port: u16,
    pub registry: Arc<ConnectionRegistry>,
    _server: tokio::task::JoinHandle<()>,
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| session::run(socket, state.registry, state.submit_policy))
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({"status": "healthy", "service": "formgate"}))
}

/// List live connection ids, for administrative discovery
async fn sessions_handler(State(state): State<AppState>) -> impl IntoResponse {
    let ids = state.registry.ids().await;
    Json(serde_json::json!({"count": ids.len(), "sessions": ids}))
}

#[derive(Debug, Deserialize)]
struct SessionQuery {
    session: String,
}

async fn form_status_handler(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> impl IntoResponse {
    let id = ConnectionId::from_raw(query.session);
    let Some(session) = state.registry.get(&id).await else {
        return Json(serde_json::json!({"status": "unknown_session"}));
    };
    let store = session.store();
    let store = store.read().await;
    match store.current_form() {
        Some(form) => Json(serde_json::json!({"status": "success", "form": form})),
        None => Json(serde_json::json!({"status": "no_active_form"})),
    }
}

async fn form_reset_handler(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> impl IntoResponse {
    let id = ConnectionId::from_raw(query.session);
    let Some(session) = state.registry.get(&id).await else {
        return Json(serde_json::json!({"status": "unknown_session"}));
    };
    session.store().write().await.clear_current_form();
    info!(connection_id = %id, "form reset");
    Json(serde_json::json!({"status": "success", "message": "Form reset"}))
}
