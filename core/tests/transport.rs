//! Client behaviour through a recording in-memory transport.
//!
//! Each test queues the responses the "server" will give and inspects the
//! requests the client actually sent.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::json;
use stilla_client::{
    ClientConfig, ConfigClient, ConfigError, HttpRequest, HttpResponse, Transport, TransportError,
};

const API_KEY: &str = "a49da419-3899-46a0-b43a-5bf4a26d3cca";
const HOST_ID: &str = "c2f0d0a2-af9b-4b40-96d8-86865eb958c2";

#[derive(Default)]
struct Recording {
    queued: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    sent: Mutex<Vec<HttpRequest>>,
}

impl Recording {
    fn respond_json(&self, body: serde_json::Value) {
        self.queued.lock().unwrap().push_back(Ok(HttpResponse {
            status: 200,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: body.to_string(),
        }));
    }

    fn calls(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Transport for Recording {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.sent.lock().unwrap().push(request.clone());
        self.queued
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Other("no response queued".to_string())))
    }
}

fn client() -> (ConfigClient<Arc<Recording>>, Arc<Recording>) {
    let transport = Arc::new(Recording::default());
    let config = ClientConfig::parse("https://stilla.com", API_KEY, HOST_ID).unwrap();
    (ConfigClient::with_transport(config, transport.clone()), transport)
}

#[test]
fn empty_key_makes_no_calls() {
    let (client, transport) = client();
    transport.respond_json(json!({"gke:name": "test"}));

    let err = client.get_config("").unwrap_err();

    assert!(err.is_validation());
    assert_eq!(transport.calls(), 0);
}

#[test]
fn one_request_per_lookup_with_expected_headers() {
    let (client, transport) = client();
    transport.respond_json(json!({"enabled": "true"}));

    assert_eq!(client.get_config("cron").unwrap(), json!({"enabled": "true"}));

    let sent = transport.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].url,
        format!("https://stilla.com/api/v1/host/{HOST_ID}/config/cron")
    );
    assert_eq!(sent[0].header("authorization"), Some(format!("Bearer {API_KEY}").as_str()));
    assert_eq!(sent[0].header("hostid"), Some(HOST_ID));
}

#[test]
fn sequential_lookups_do_not_leak_state() {
    let (client, transport) = client();
    transport.respond_json(json!({"gke:name": "test", "gke:region": "us-central1"}));
    transport.respond_json(json!({"eks:name": "test", "eks:region": "us-east-1"}));

    let gke = client.get_config("gke").unwrap();
    let eks = client.get_config("eks").unwrap();

    assert_eq!(gke, json!({"gke:name": "test", "gke:region": "us-central1"}));
    assert_eq!(eks, json!({"eks:name": "test", "eks:region": "us-east-1"}));

    let urls: Vec<String> = transport.sent.lock().unwrap().iter().map(|r| r.url.clone()).collect();
    assert!(urls[0].ends_with("/config/gke"));
    assert!(urls[1].ends_with("/config/eks"));
}

#[test]
fn failures_are_not_retried() {
    let (client, transport) = client();
    transport
        .queued
        .lock()
        .unwrap()
        .push_back(Err(TransportError::Timeout));
    transport.respond_json(json!({"enabled": "true"}));

    assert_eq!(client.get_config("cron").unwrap_err(), ConfigError::Timeout);
    assert_eq!(transport.calls(), 1);
}

#[test]
fn get_config_value_issues_single_lookup() {
    let (client, transport) = client();
    transport.respond_json(json!({"enabled": "true", "schedule": "*/5 * * * *"}));

    assert_eq!(
        client.get_config_value("cron", "schedule").unwrap(),
        json!("*/5 * * * *")
    );
    assert_eq!(transport.calls(), 1);
}
