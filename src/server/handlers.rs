//! HTTP handlers for the bridge endpoints.

use crate::db::{SchemaInspector, statement, with_connection};
use crate::error::BridgeError;
use crate::models::{HealthResponse, QueryRequest, QueryResponse, SchemaResponse};
use crate::server::state::SharedState;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use tracing::{error, warn};

/// `GET /health`. Never touches the database.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// `GET /schema`
pub async fn schema(State(state): State<SharedState>) -> Result<Json<SchemaResponse>, BridgeError> {
    let target = state.target().inspect_err(log_rejection)?;

    let schema = with_connection(target, state.connect_timeout, |conn| {
        Box::pin(async move { SchemaInspector::describe(conn).await })
    })
    .await
    .map_err(|e| {
        error!(error = %e, "Schema introspection failed");
        BridgeError::execution(e.detail())
    })?;

    Ok(Json(SchemaResponse { schema }))
}

/// `POST /query`
///
/// The configuration check runs before the body is looked at, so an
/// unconfigured bridge answers 500 even for a malformed body.
pub async fn query(
    State(state): State<SharedState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, BridgeError> {
    let target = state.target().inspect_err(log_rejection)?;

    let Json(request) = payload
        .map_err(|rejection| BridgeError::invalid_request(rejection.body_text()))
        .inspect_err(log_rejection)?;

    statement::inspect(&request.query, target.db_type());

    let executor = state.executor;
    let outcome = with_connection(target, state.connect_timeout, move |conn| {
        Box::pin(async move { executor.execute(conn, &request).await })
    })
    .await
    .map_err(|e| {
        error!(error = %e, "Query execution failed");
        BridgeError::query(e.detail())
    })?;

    Ok(Json(QueryResponse::from(outcome)))
}

fn log_rejection(err: &BridgeError) {
    warn!(kind = err.kind(), detail = %err, "Rejected request");
}
