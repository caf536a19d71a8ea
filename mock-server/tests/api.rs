use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_store, seed, store};
use serde_json::{json, Value};
use tower::ServiceExt;

const HOST_ID: &str = "9923d21c-dbac-421d-a31a-649a849d4c85";
const TOKEN: &str = "cfacd739-4a13-47ae-82c3-13d6d7ffeb2e";

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn config_uri(key: &str) -> String {
    format!("/api/v1/host/{HOST_ID}/config/{key}")
}

fn authed(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .header("HostID", HOST_ID)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- health ---

#[tokio::test]
async fn health_returns_pong() {
    let resp = app()
        .oneshot(Request::builder().uri("/api/v1/health").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({"data": "pong"}));
}

// --- get ---

#[tokio::test]
async fn get_config_returns_stored_document() {
    let store = store();
    seed(&store, HOST_ID, "kubernetes", json!({"replicas": 3})).await;

    let resp = app_with_store(store)
        .oneshot(authed("GET", &config_uri("kubernetes"), ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({"replicas": 3}));
}

#[tokio::test]
async fn get_config_unknown_key_returns_404() {
    let resp = app()
        .oneshot(authed("GET", &config_uri("missing"), ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(resp).await,
        json!({"error": "unable to retrieve configuration"})
    );
}

#[tokio::test]
async fn get_config_without_token_is_unauthorized() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri(config_uri("kubernetes"))
                .header("HostID", HOST_ID)
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await, json!({"error": "unauthorized"}));
}

#[tokio::test]
async fn get_config_for_other_host_is_unauthorized() {
    let resp = app()
        .oneshot(authed(
            "GET",
            "/api/v1/host/c2f0d0a2-af9b-4b40-96d8-86865eb958c2/config/kubernetes",
            "",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn documents_are_scoped_per_host() {
    let store = store();
    seed(&store, "another-host", "kubernetes", json!({"replicas": 1})).await;

    let resp = app_with_store(store)
        .oneshot(authed("GET", &config_uri("kubernetes"), ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- put ---

#[tokio::test]
async fn put_then_get_roundtrips_document() {
    let store = store();

    let resp = app_with_store(store.clone())
        .oneshot(authed("PUT", &config_uri("cron"), r#"{"enabled":"true"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app_with_store(store)
        .oneshot(authed("GET", &config_uri("cron"), ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({"enabled": "true"}));
}

#[tokio::test]
async fn put_malformed_json_is_rejected() {
    let resp = app()
        .oneshot(authed("PUT", &config_uri("cron"), "{not json"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn put_without_auth_is_unauthorized() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(config_uri("cron"))
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(r#"{"enabled":"true"}"#.to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let resp = app()
        .oneshot(Request::builder().uri("/api/v2/nothing").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
