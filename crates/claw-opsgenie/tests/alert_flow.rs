//! End-to-end tests: tracing event -> layer -> adapter -> Opsgenie HTTP API.

use std::sync::{Arc, Mutex};
use std::thread;

use claw_opsgenie::{
    AdapterConfig, AlertAdapter, AlertClient, ClientError, CreateAlertRequest,
    CreateAlertResponse, LogEvent, OpsgenieLayer, Priority, Severity, OVERRIDE_TAGS,
};
use tracing_subscriber::prelude::*;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Default)]
struct RecordingClient {
    requests: Mutex<Vec<CreateAlertRequest>>,
}

impl AlertClient for RecordingClient {
    fn create(&self, request: &CreateAlertRequest) -> Result<CreateAlertResponse, ClientError> {
        self.requests
            .lock()
            .map_err(|e| ClientError::Other(e.to_string()))?
            .push(request.clone());
        Ok(CreateAlertResponse::default())
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn tracing_error_creates_opsgenie_alert() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/alerts"))
        .and(header("authorization", "GenieKey flow-key"))
        .and(body_partial_json(serde_json::json!({
            "message": "disk full",
            "description": "disk full\ndisk at 99%",
            "tags": ["infra", "urgent"],
            "source": "svc-a",
            "priority": "P2",
            "details": { "host": "db-1" },
            "responders": [{ "type": "team", "name": "sre" }],
        })))
        .respond_with(ResponseTemplate::new(202).set_body_json(serde_json::json!({
            "result": "Request will be processed",
            "took": 0.01,
            "requestId": "flow-1",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let failures = tokio::task::spawn_blocking(move || {
        let config = AdapterConfig::new()
            .team("sre")
            .tag("infra")
            .source("svc-a")
            .priority(Priority::P1);
        let adapter = AlertAdapter::new("flow-key", &uri, config).unwrap();

        let failures = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&failures);
        let layer = OpsgenieLayer::new(adapter).with_error_handler(move |err| {
            sink.lock().unwrap().push(err.to_string());
        });
        let subscriber = tracing_subscriber::registry().with(layer);

        let err = std::io::Error::other("disk at 99%");
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("not an alert");
            tracing::error!(
                "ogh:priority" = "P2",
                "ogh:tags" = "urgent",
                host = "db-1",
                error = &err as &dyn std::error::Error,
                "disk full"
            );
        });

        let failures = failures.lock().unwrap().clone();
        failures
    })
    .await
    .unwrap();

    assert!(failures.is_empty(), "unexpected failures: {failures:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_alert_is_reported_to_handler() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/alerts"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let uri = server.uri();
    let failures = tokio::task::spawn_blocking(move || {
        let adapter = AlertAdapter::new("flow-key", &uri, AdapterConfig::new()).unwrap();
        let failures = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&failures);
        let layer = OpsgenieLayer::new(adapter).with_error_handler(move |err| {
            sink.lock().unwrap().push(err.to_string());
        });

        tracing::subscriber::with_default(tracing_subscriber::registry().with(layer), || {
            tracing::error!("disk full");
        });

        let failures = failures.lock().unwrap().clone();
        failures
    })
    .await
    .unwrap();

    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("429"));
}

#[test]
fn concurrent_events_do_not_share_tags() {
    let adapter = Arc::new(
        AlertAdapter::with_client(RecordingClient::default(), AdapterConfig::new().tag("infra"))
            .unwrap(),
    );

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let adapter = Arc::clone(&adapter);
            thread::spawn(move || {
                let event = LogEvent::new(Severity::Error, format!("event {i}"))
                    .with_field(OVERRIDE_TAGS, vec![format!("t{i}")]);
                adapter.handle(&event).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let requests = adapter.client().requests.lock().unwrap();
    assert_eq!(requests.len(), 8);
    for request in requests.iter() {
        let suffix = request.message.trim_start_matches("event ");
        assert_eq!(request.tags, vec!["infra".to_string(), format!("t{suffix}")]);
    }
    assert_eq!(adapter.config().default_tags(), &["infra".to_string()]);
}

#[test]
fn identical_messages_share_alias() {
    let adapter =
        AlertAdapter::with_client(RecordingClient::default(), AdapterConfig::new()).unwrap();

    let first = adapter.build_request(&LogEvent::new(Severity::Error, "disk full"));
    let second = adapter.build_request(&LogEvent::new(Severity::Fatal, "disk full"));
    let other = adapter.build_request(&LogEvent::new(Severity::Error, "disk empty"));

    assert_eq!(first.alias, second.alias);
    assert_ne!(first.alias, other.alias);
}
