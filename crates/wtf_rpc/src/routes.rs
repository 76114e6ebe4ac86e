//! HTTP routes for the lookup service.
//!
//! - `POST /RPC2`: JSON-RPC calls.
//! - `GET /RPC2`: redirect to the procedure catalog.
//! - `GET /api`: static procedure catalog.
//! - `GET /acronyms`: every stored (acronym, translation) pair.
//! - `GET /health`: liveness probe.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Redirect;
use axum::routing::get;
use axum::{Json, Router};
use log::{debug, error, info};
use serde::Serialize;
use serde_json::Value;
use wtf_core::{LookupService, ProcedureDoc, PROCEDURES};

use crate::rpc::{dispatch, RpcError, RpcRequest, RpcResponse};

#[derive(Clone)]
struct AppState {
    lookup: LookupService,
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
}

/// Acronym listing row, without the storage id.
#[derive(Debug, Serialize)]
struct AcronymEntry {
    acronym: String,
    translation: String,
}

/// Builds the application router around a lookup service.
pub fn build_router(lookup: LookupService) -> Router {
    Router::new()
        .route("/RPC2", get(rpc_redirect).post(rpc_call))
        .route("/api", get(api_catalog))
        .route("/acronyms", get(list_acronyms))
        .route("/health", get(health))
        .with_state(AppState { lookup })
}

async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn rpc_redirect() -> Redirect {
    Redirect::to("/api")
}

async fn api_catalog() -> Json<&'static [ProcedureDoc]> {
    Json(PROCEDURES)
}

async fn rpc_call(
    State(state): State<AppState>,
    payload: Result<Json<RpcRequest>, JsonRejection>,
) -> Json<RpcResponse> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let err = RpcError::Parse(rejection.body_text());
            info!("event=rpc_call module=rpc status=rejected error_code={}", err.code());
            return Json(RpcResponse::failure(Value::Null, &err));
        }
    };

    let id = request.id.clone();
    let method = request.method.clone();
    let lookup = state.lookup.clone();
    let outcome = tokio::task::spawn_blocking(move || dispatch(&lookup, &request))
        .await
        .unwrap_or_else(|join_err| {
            error!(
                "event=rpc_call module=rpc status=error error_code=worker_failed method={} error={}",
                method, join_err
            );
            Err(RpcError::Internal("lookup worker failed".to_string()))
        });

    match outcome {
        Ok(result) => {
            debug!(
                "event=rpc_call module=rpc status=ok method={} results={}",
                method,
                result.len()
            );
            Json(RpcResponse::success(id, result))
        }
        Err(err) => {
            info!(
                "event=rpc_call module=rpc status=rejected method={} error_code={}",
                method,
                err.code()
            );
            Json(RpcResponse::failure(id, &err))
        }
    }
}

async fn list_acronyms(State(state): State<AppState>) -> Json<Vec<AcronymEntry>> {
    let lookup = state.lookup.clone();
    let entries = tokio::task::spawn_blocking(move || lookup.entries())
        .await
        .unwrap_or_else(|join_err| {
            error!(
                "event=list_acronyms module=rpc status=error error_code=worker_failed error={}",
                join_err
            );
            Vec::new()
        });

    Json(
        entries
            .into_iter()
            .map(|record| AcronymEntry {
                acronym: record.acronym,
                translation: record.translation,
            })
            .collect(),
    )
}
