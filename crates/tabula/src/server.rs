//! HTTP endpoint.
//!
//! `POST /execute_sql` accepts `{"data": {"model"?: string, "task": string}}`
//! and reads the caller's identity from the `X-Actor` header, which the
//! upstream authentication layer sets. `GET /health` reports liveness.

use crate::{Orchestrator, QueryResponse};
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tabula_core::TaskRequest;
use tabula_interface::{CompletionDriver, Connector};
use tracing::{info, instrument, warn};

/// Header carrying the authenticated actor identity.
pub const ACTOR_HEADER: &str = "x-actor";

/// Request body of `POST /execute_sql`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteSqlBody {
    /// The task
    pub data: ExecuteSqlData,
}

/// Task fields of the request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteSqlData {
    /// Optional model selector
    #[serde(default)]
    pub model: Option<String>,
    /// Natural-language task
    pub task: String,
}

/// Routes for the text-to-SQL service.
pub fn router<C, D>(orchestrator: Arc<Orchestrator<C, D>>) -> Router
where
    C: Connector + 'static,
    D: CompletionDriver + 'static,
{
    Router::new()
        .route("/execute_sql", post(execute_sql::<C, D>))
        .route("/health", get(health))
        .with_state(orchestrator)
}

/// Serve `router` on `addr` until Ctrl-C.
pub async fn serve<C, D>(orchestrator: Arc<Orchestrator<C, D>>, addr: SocketAddr) -> std::io::Result<()>
where
    C: Connector + 'static,
    D: CompletionDriver + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Listening");
    axum::serve(listener, router(orchestrator))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[instrument(skip_all)]
async fn execute_sql<C, D>(
    State(orchestrator): State<Arc<Orchestrator<C, D>>>,
    headers: HeaderMap,
    Json(body): Json<ExecuteSqlBody>,
) -> (StatusCode, Json<QueryResponse>)
where
    C: Connector + 'static,
    D: CompletionDriver + 'static,
{
    let actor = headers
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|actor| !actor.is_empty());
    let Some(actor) = actor else {
        warn!("Rejected request without actor identity");
        return (StatusCode::UNAUTHORIZED, Json(QueryResponse::failure()));
    };

    let request = TaskRequest::new(actor, body.data.model, body.data.task);
    (StatusCode::OK, Json(orchestrator.handle(&request).await))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
