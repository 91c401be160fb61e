use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod errors;
mod models;
mod routes;
mod store;

use config::AppConfig;
use errors::{AppError, AppResult};
use store::CheaterStore;

pub struct AppState {
    pub config: AppConfig,
    pub store: Option<CheaterStore>,
}

impl AppState {
    /// The store handle, or the error every data endpoint surfaces while the
    /// connection is unconfigured.
    pub fn store(&self) -> AppResult<&CheaterStore> {
        self.store
            .as_ref()
            .ok_or_else(|| AppError::store("store connection is not configured"))
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cheaterstats_api=debug,tower_http=debug"));

    let is_production = std::env::var("CHEATERSTATS_ENV")
        .map(|v| v == "production")
        .unwrap_or(false);

    if is_production {
        let json_layer = tracing_subscriber::fmt::layer().json().with_target(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load()?;
    let port = config.port;

    let store = match (config.database_url.as_deref(), config.database_name.as_deref()) {
        (Some(url), Some(name)) => match CheaterStore::connect(url, name).await {
            Ok(store) => Some(store),
            Err(e) => {
                tracing::error!(error = %e, "failed to initialize store client");
                None
            }
        },
        _ => {
            tracing::warn!("store connection not configured; data endpoints will return errors");
            None
        }
    };

    let state = Arc::new(AppState { config, store });

    let app = Router::new()
        .route("/", get(routes::health::service_root))
        .route("/health", get(routes::health::health_check))
        .route("/test", get(routes::health::diagnostics))
        .route(
            "/api/cheaters",
            get(routes::cheaters::list_cheaters).post(routes::cheaters::create_cheater),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "cheaterstats-api starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
