use api_types::health::Health;
use axum::{Json, Router, middleware::from_fn, routing::get};
use chrono::{SecondsFormat, Utc};

use std::sync::Arc;

use crate::{
    expenses,
    middleware::{correlation_id, log_requests},
};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Builds the HTTP router.
///
/// Every route runs behind the correlation id layer (outermost) and the
/// request logging layer.
pub fn router(engine: Engine) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
    };

    Router::new()
        .route("/health", get(health))
        .route(
            "/api/v1/expenses",
            get(expenses::list).post(expenses::create),
        )
        .route(
            "/api/v1/expenses/{id}",
            get(expenses::get)
                .put(expenses::update)
                .delete(expenses::delete),
        )
        .layer(from_fn(log_requests))
        .layer(from_fn(correlation_id))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(engine))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
