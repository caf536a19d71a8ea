use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

/// Configuration documents keyed by `(host_id, key)`.
pub type Store = Arc<RwLock<HashMap<(String, String), Value>>>;

type ApiError = (StatusCode, Json<Value>);

pub fn store() -> Store {
    Arc::new(RwLock::new(HashMap::new()))
}

/// Insert a document directly, bypassing auth.
pub async fn seed(store: &Store, host_id: &str, key: &str, document: Value) {
    store
        .write()
        .await
        .insert((host_id.to_string(), key.to_string()), document);
}

pub fn app() -> Router {
    app_with_store(store())
}

pub fn app_with_store(store: Store) -> Router {
    Router::new()
        .route("/api/v1/health", get(ping))
        .route(
            "/api/v1/host/{host_id}/config/{key}",
            get(get_config).put(put_config),
        )
        .with_state(store)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_store(listener, store()).await
}

pub async fn run_with_store(listener: TcpListener, store: Store) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock config service listening");
    }
    axum::serve(listener, app_with_store(store)).await
}

async fn ping() -> Json<Value> {
    Json(json!({"data": "pong"}))
}

async fn get_config(
    State(store): State<Store>,
    Path((host_id, key)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    authorize(&headers, &host_id)?;
    let documents = store.read().await;
    match documents.get(&(host_id, key)) {
        Some(document) => Ok(Json(document.clone())),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(json!({"error": "unable to retrieve configuration"})),
        )),
    }
}

async fn put_config(
    State(store): State<Store>,
    Path((host_id, key)): Path<(String, String)>,
    headers: HeaderMap,
    Json(document): Json<Value>,
) -> Result<StatusCode, ApiError> {
    authorize(&headers, &host_id)?;
    debug!(%host_id, %key, "storing configuration");
    store.write().await.insert((host_id, key), document);
    Ok(StatusCode::NO_CONTENT)
}

/// Require a non-empty bearer token and a `HostID` header naming the path host.
fn authorize(headers: &HeaderMap, host_id: &str) -> Result<(), ApiError> {
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token);
    let header_host = headers.get("hostid").and_then(|v| v.to_str().ok());

    match (bearer, header_host) {
        (Some(_), Some(h)) if h == host_id => Ok(()),
        _ => Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "unauthorized"})),
        )),
    }
}

fn bearer_token(value: &str) -> Option<&str> {
    match value.split_once(' ') {
        Some(("Bearer", token)) if !token.is_empty() && !token.contains(' ') => Some(token),
        _ => None,
    }
}
