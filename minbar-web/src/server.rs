//! HTTP server wiring: collaborator state, router, and listener.

use std::future::{Future, IntoFuture};
use std::sync::Arc;

use axum::Router;
use axum::response::Json;
use axum::routing::get;
use minbar_core::config::{DeliveryConfig, MinbarConfig};
use minbar_core::counters::CounterSink;
use minbar_core::lecture::LectureLookup;
use minbar_core::storage::FileStorage;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::handlers::{download_lecture, stream_info, stream_lecture};

/// Shared per-request dependencies.
///
/// Collaborators are injected explicitly (no process-global storage root),
/// so tests can run the full router against in-memory or tempdir-backed
/// implementations.
#[derive(Clone)]
pub struct AppState {
    pub lectures: Arc<dyn LectureLookup>,
    pub storage: Arc<dyn FileStorage>,
    pub counters: Arc<dyn CounterSink>,
    pub delivery: DeliveryConfig,
}

impl AppState {
    pub fn new(
        lectures: Arc<dyn LectureLookup>,
        storage: Arc<dyn FileStorage>,
        counters: Arc<dyn CounterSink>,
        delivery: DeliveryConfig,
    ) -> Self {
        Self {
            lectures,
            storage,
            counters,
            delivery,
        }
    }
}

/// Builds the delivery router over the given state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Audio delivery endpoints
        .route("/stream/{id}", get(stream_lecture))
        .route("/stream/{id}/info", get(stream_info))
        .route("/download/{id}", get(download_lecture))
        // Diagnostics
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

/// Binds the listener and serves until Ctrl+C, then drains in-flight
/// requests within the configured grace period.
///
/// # Errors
///
/// - `MinbarError::Io` - Bind failure or fatal serve error
pub async fn run_server(config: &MinbarConfig, state: AppState) -> minbar_core::Result<()> {
    run_server_until(config, state, async {
        let _ = tokio::signal::ctrl_c().await;
        info!("Shutdown signal received");
    })
    .await
}

/// Serves until `shutdown` resolves. Open connections get
/// `config.server.shutdown_grace` to finish before the listener is
/// dropped outright.
pub async fn run_server_until(
    config: &MinbarConfig,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> minbar_core::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        "Minbar audio delivery server running on http://{}",
        listener.local_addr()?
    );

    let grace = config.server.shutdown_grace;
    let (drain_tx, drain_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, build_router(state)).with_graceful_shutdown(async move {
        shutdown.await;
        let _ = drain_tx.send(());
    });

    let grace_elapsed = async {
        let _ = drain_rx.await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = server.into_future() => result?,
        _ = grace_elapsed => {
            warn!("Requests still in flight after {grace:?}; closing connections");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use minbar_core::config::DeliveryConfig;
    use minbar_core::counters::InMemoryCounterSink;
    use minbar_core::lecture::ManifestLectureStore;
    use minbar_core::storage::LocalFileStorage;

    use super::*;

    #[tokio::test]
    async fn test_server_stops_after_shutdown_within_grace() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(
            Arc::new(ManifestLectureStore::default()),
            Arc::new(LocalFileStorage::new(dir.path().to_path_buf())),
            Arc::new(InMemoryCounterSink::new()),
            DeliveryConfig::default(),
        );

        let mut config = MinbarConfig::for_testing();
        config.server.shutdown_grace = Duration::from_millis(100);

        let (trigger, armed) = tokio::sync::oneshot::channel::<()>();
        let server = tokio::spawn(async move {
            run_server_until(&config, state, async {
                let _ = armed.await;
            })
            .await
        });

        // Let the listener bind, then signal shutdown.
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.send(()).expect("server still running");

        let result = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .expect("server should stop once signalled")
            .expect("server task");
        assert!(result.is_ok());
    }
}
