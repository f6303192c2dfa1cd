//! `ogh:` overrides recorded through `tracing` macros.

use std::sync::{Arc, Mutex};

use claw_opsgenie::{
    AdapterConfig, AlertAdapter, AlertClient, ClientError, CreateAlertRequest,
    CreateAlertResponse, OpsgenieLayer, Priority,
};
use tracing_subscriber::prelude::*;

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

fn shared_adapter(config: AdapterConfig) -> Arc<AlertAdapter<RecordingClient>> {
    Arc::new(AlertAdapter::with_client(RecordingClient::default(), config).unwrap())
}

fn captured(adapter: &AlertAdapter<RecordingClient>) -> Vec<CreateAlertRequest> {
    adapter.client().requests.lock().unwrap().clone()
}

fn capture(config: AdapterConfig, emit: impl FnOnce()) -> Vec<CreateAlertRequest> {
    let adapter = shared_adapter(config);
    let subscriber =
        tracing_subscriber::registry().with(OpsgenieLayer::from_shared(Arc::clone(&adapter)));
    tracing::subscriber::with_default(subscriber, emit);
    captured(&adapter)
}

#[test]
fn overrides_and_details_are_mapped() {
    let config = AdapterConfig::new().tag("infra").priority(Priority::P3);
    let requests = capture(config, || {
        tracing::error!(
            "ogh:priority" = "P1",
            "ogh:tags" = "urgent, disk",
            "ogh:alias" = "disk-db1",
            host = "db-1",
            usage = 99_u64,
            "disk full"
        );
    });

    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.priority, Priority::P1);
    assert_eq!(request.tags, vec!["infra", "urgent", "disk"]);
    assert_eq!(request.alias, "disk-db1");
    assert_eq!(request.details.len(), 2);
    assert_eq!(request.details.get("host").map(String::as_str), Some("db-1"));
    assert_eq!(request.details.get("usage").map(String::as_str), Some("99"));
}

#[test]
fn integer_priority_override_is_ignored() {
    let requests = capture(AdapterConfig::new().priority(Priority::P4), || {
        tracing::error!("ogh:priority" = 1_i64, "disk full");
    });

    assert_eq!(requests[0].priority, Priority::P4);
    assert!(requests[0].details.is_empty());
}

#[test]
fn display_formatted_overrides_are_applied() {
    let config = AdapterConfig::new().tag("infra").source("svc-a");
    let host = String::from("node-7");
    let requests = capture(config, || {
        tracing::error!(
            "ogh:source" = %host,
            "ogh:priority" = %Priority::P2,
            "ogh:tags" = %"urgent,disk",
            "disk full"
        );
    });

    let request = &requests[0];
    assert_eq!(request.source, "node-7");
    assert_eq!(request.priority, Priority::P2);
    assert_eq!(request.tags, vec!["infra", "urgent", "disk"]);
    assert!(request.details.is_empty());
}

#[test]
fn debug_formatted_detail_is_kept() {
    let requests = capture(AdapterConfig::new(), || {
        tracing::error!(attempts = ?vec![1, 2], "disk full");
    });

    assert_eq!(
        requests[0].details.get("attempts").map(String::as_str),
        Some("[1, 2]")
    );
}
