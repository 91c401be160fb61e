use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

/// GET / — service name and the documented endpoints.
pub async fn service_root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "Cheaterstats API",
        "message": "Cheaterstats backend is running",
        "endpoints": [
            { "GET": "/api/cheaters?subject_id=..." },
            { "POST": "/api/cheaters" },
            { "GET": "/test" },
        ],
    }))
}

/// GET /health — process liveness only; the store is probed by `/test`.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "cheaterstats-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Debug, Serialize)]
pub struct DiagnosticsResponse {
    pub backend: &'static str,
    pub database: String,
    pub database_url: &'static str,
    pub database_name: &'static str,
    pub connection_status: &'static str,
    pub collections: Vec<String>,
}

/// GET /test — store diagnostics. Never fails: every probe error is absorbed
/// into the `database` status string.
pub async fn diagnostics(State(state): State<Arc<AppState>>) -> Json<DiagnosticsResponse> {
    let set_flag = |value: &Option<String>| if value.is_some() { "set" } else { "not set" };

    let mut response = DiagnosticsResponse {
        backend: "running",
        database: "not configured".to_string(),
        database_url: set_flag(&state.config.database_url),
        database_name: set_flag(&state.config.database_name),
        connection_status: "not connected",
        collections: Vec::new(),
    };

    if let Some(store) = &state.store {
        match store.ping().await {
            Ok(()) => {
                response.connection_status = "connected";
                match store.collection_names(10).await {
                    Ok(names) => {
                        response.database = "connected".to_string();
                        response.collections = names;
                    }
                    Err(e) => {
                        response.database = format!("connected but introspection failed: {e}");
                    }
                }
            }
            Err(e) => {
                response.database = format!("unreachable: {e}");
            }
        }
    }

    Json(response)
}
