//! Tests for engine module

use super::*;
use crate::auth::Credentials;
use crate::error::Error;
use crate::http::Ec2ClientConfig;
use crate::operations::{DescribeInstances, DescribeVolumes, ModifyInstanceAttribute};
use crate::pagination::PageSizeBounds;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn volumes_page(ids: &[&str], next: Option<&str>) -> String {
    let items: String = ids
        .iter()
        .map(|id| format!("<item><volumeId>{id}</volumeId></item>"))
        .collect();
    let token = next
        .map(|t| format!("<nextToken>{t}</nextToken>"))
        .unwrap_or_default();
    format!("<DescribeVolumesResponse><volumeSet>{items}</volumeSet>{token}</DescribeVolumesResponse>")
}

fn engine_for(server: &MockServer, state: StateManager) -> OperationEngine {
    let config = Ec2ClientConfig::builder()
        .endpoint_url(server.uri())
        .no_rate_limit()
        .build();
    let client = Ec2Client::new(config, Credentials::new("AKIDEXAMPLE", "secret", None)).unwrap();
    OperationEngine::new(client, state)
}

fn record_ids(messages: &[Message]) -> Vec<String> {
    messages
        .iter()
        .filter_map(|m| match m {
            Message::Record { data, .. } => data["volumeId"].as_str().map(String::from),
            _ => None,
        })
        .collect()
}

/// Mounts `body` for requests whose form body contains `marker`
async fn mount_page(server: &MockServer, marker: &str, body: String) {
    Mock::given(method("POST"))
        .and(body_string_contains(marker))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

// ============================================================================
// Message Tests
// ============================================================================

#[test]
fn test_message_kinds() {
    let msg = Message::record("DescribeVolumes", Some(1), json!({"volumeId": "vol-1"}));
    assert!(msg.is_record());
    assert!(!msg.is_state());

    let msg = Message::state("DescribeVolumes", "T1");
    assert!(msg.is_state());
    assert_eq!(msg.to_json()["state"]["next_token"], "T1");

    let msg = Message::warn("careful");
    assert!(msg.is_log());

    let msg = Message::error("DescribeVolumes", Some(2), &Error::http_status(500, "boom"));
    assert!(msg.is_error());
    assert_eq!(msg.to_json()["error"]["code"], serde_json::Value::Null);
}

#[test]
fn test_summary_status() {
    let partial = Message::Summary(RunStats {
        records_emitted: 3,
        pages_fetched: 1,
        errors: 1,
        duration_ms: 0,
    });
    assert_eq!(partial.to_json()["summary"]["status"], "PARTIAL");

    let ok = Message::Summary(RunStats::default());
    assert_eq!(ok.to_json()["summary"]["status"], "SUCCEEDED");
}

// ============================================================================
// PagingConfig Tests
// ============================================================================

#[test]
fn test_paging_config_to_fetch_options() {
    let bounds = PageSizeBounds::new(5, 500);

    let options = PagingConfig::new()
        .with_max_items(Some(10))
        .with_page_size(Some(50))
        .fetch_options(bounds, None);
    assert_eq!(options.emit_limit, Some(10));
    assert_eq!(options.page_size, Some(50));
    assert!(!options.user_controls_paging());

    let manual = PagingConfig::new()
        .with_next_token(Some("T1".into()))
        .fetch_options(bounds, Some("saved".into()));
    assert_eq!(manual.start_token.as_deref(), Some("T1"));
    assert!(manual.user_controls_paging());

    let resumed = PagingConfig::new()
        .with_resume(true)
        .fetch_options(bounds, Some("saved".into()));
    assert_eq!(resumed.start_token.as_deref(), Some("saved"));
    assert!(!resumed.user_controls_paging());
}

// ============================================================================
// Paged run Tests
// ============================================================================

#[tokio::test]
async fn test_run_paged_emits_every_page() {
    let server = MockServer::start().await;
    mount_page(&server, "NextToken=T1", volumes_page(&["vol-3"], None)).await;
    mount_page(
        &server,
        "Action=DescribeVolumes",
        volumes_page(&["vol-1", "vol-2"], Some("T1")),
    )
    .await;

    let mut engine = engine_for(&server, StateManager::in_memory());
    let mut messages: Vec<Message> = Vec::new();
    engine
        .run_paged(&DescribeVolumes::default(), &PagingConfig::new(), &mut messages)
        .await
        .unwrap();

    assert_eq!(record_ids(&messages), vec!["vol-1", "vol-2", "vol-3"]);
    assert_eq!(messages.iter().filter(|m| m.is_page()).count(), 2);
    assert!(!messages.iter().any(Message::is_state));
    assert_eq!(engine.stats().pages_fetched, 2);
    assert_eq!(engine.stats().records_emitted, 3);
    assert!(matches!(messages.last(), Some(Message::Summary(_))));
}

#[tokio::test]
async fn test_run_paged_max_items_stops_early() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("MaxResults=5"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(volumes_page(&["vol-1", "vol-2"], Some("T1"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut engine = engine_for(&server, StateManager::in_memory());
    let mut messages: Vec<Message> = Vec::new();
    engine
        .run_paged(
            &DescribeVolumes::default(),
            &PagingConfig::new().with_max_items(Some(2)),
            &mut messages,
        )
        .await
        .unwrap();

    assert_eq!(record_ids(&messages), vec!["vol-1", "vol-2"]);
    assert!(messages
        .iter()
        .any(|m| matches!(m, Message::State { next_token, .. } if next_token == "T1")));
    assert_eq!(
        engine.state().get_token("DescribeVolumes").await.as_deref(),
        Some("T1")
    );
}

#[tokio::test]
async fn test_run_paged_manual_mode_logs_marker() {
    let server = MockServer::start().await;
    mount_page(&server, "NextToken=T1", volumes_page(&["vol-3"], Some("T2"))).await;

    let mut engine = engine_for(&server, StateManager::in_memory());
    let mut messages: Vec<Message> = Vec::new();
    engine
        .run_paged(
            &DescribeVolumes::default(),
            &PagingConfig::new().with_next_token(Some("T1".into())),
            &mut messages,
        )
        .await
        .unwrap();

    assert_eq!(record_ids(&messages), vec!["vol-3"]);
    assert!(messages.iter().any(|m| matches!(
        m,
        Message::Log { message, .. } if message == "Retrieved 1 records starting from marker 'T1'"
    )));
    assert!(messages.iter().any(Message::is_state));
}

#[tokio::test]
async fn test_run_paged_failure_keeps_earlier_pages() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("NextToken=T1"))
        .respond_with(ResponseTemplate::new(500).set_body_string(
            "<Response><Errors><Error><Code>InternalError</Code><Message>oops</Message></Error></Errors></Response>",
        ))
        .mount(&server)
        .await;
    mount_page(
        &server,
        "Action=DescribeVolumes",
        volumes_page(&["vol-1"], Some("T1")),
    )
    .await;

    let dir = tempdir().unwrap();
    let state_path = dir.path().join("state.json");
    let mut engine = engine_for(&server, StateManager::new(&state_path));
    let mut messages: Vec<Message> = Vec::new();

    let err = engine
        .run_paged(&DescribeVolumes::default(), &PagingConfig::new(), &mut messages)
        .await
        .unwrap_err();

    assert_eq!(err.service_code(), Some("InternalError"));
    assert_eq!(record_ids(&messages), vec!["vol-1"]);
    assert!(messages.iter().any(|m| matches!(
        m,
        Message::Error { page: Some(2), code: Some(code), .. } if code == "InternalError"
    )));
    assert_eq!(engine.stats().errors, 1);

    // The failed page's token is saved for --resume
    let reloaded = StateManager::from_file(&state_path).unwrap();
    assert_eq!(
        reloaded.get_token("DescribeVolumes").await.as_deref(),
        Some("T1")
    );
}

#[tokio::test]
async fn test_run_paged_resume_from_saved_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("NextToken=T1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(volumes_page(&["vol-3"], None)))
        .expect(1)
        .mount(&server)
        .await;

    let state = StateManager::in_memory();
    state
        .set_token("DescribeVolumes", Some("T1".to_string()))
        .await
        .unwrap();

    let mut engine = engine_for(&server, state);
    let mut messages: Vec<Message> = Vec::new();
    engine
        .run_paged(
            &DescribeVolumes::default(),
            &PagingConfig::new().with_resume(true),
            &mut messages,
        )
        .await
        .unwrap();

    assert_eq!(record_ids(&messages), vec!["vol-3"]);
    assert!(engine.state().get_token("DescribeVolumes").await.is_none());
}

#[tokio::test]
async fn test_run_paged_rejects_before_any_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut engine = engine_for(&server, StateManager::in_memory());
    let mut messages: Vec<Message> = Vec::new();

    let err = engine
        .run_paged(
            &DescribeVolumes::default(),
            &PagingConfig::new().with_page_size(Some(1000)),
            &mut messages,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::PageSizeOutOfRange { max: 500, .. }));

    let op = DescribeInstances {
        instance_ids: vec!["i-1".into()],
        ..Default::default()
    };
    let err = engine
        .run_paged(&op, &PagingConfig::new().with_page_size(Some(10)), &mut messages)
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(!messages.iter().any(Message::is_record));
}

// ============================================================================
// Single-call Tests
// ============================================================================

#[tokio::test]
async fn test_run_single_emits_result() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "Action=ModifyInstanceAttribute",
        "<ModifyInstanceAttributeResponse><return>true</return></ModifyInstanceAttributeResponse>"
            .to_string(),
    )
    .await;

    let mut engine = engine_for(&server, StateManager::in_memory());
    let mut messages: Vec<Message> = Vec::new();
    let op = ModifyInstanceAttribute {
        instance_id: "i-1".into(),
        ebs_optimized: Some(true),
        ..Default::default()
    };
    engine.run_single(&op, &mut messages).await.unwrap();

    assert!(matches!(
        &messages[0],
        Message::Record { page: None, data, .. } if data == &json!("true")
    ));
}

#[tokio::test]
async fn test_run_single_dry_run_is_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("DryRun=true"))
        .respond_with(ResponseTemplate::new(412).set_body_string(
            "<Response><Errors><Error><Code>DryRunOperation</Code><Message>Request would have succeeded, but DryRun flag is set.</Message></Error></Errors></Response>",
        ))
        .mount(&server)
        .await;

    let mut engine = engine_for(&server, StateManager::in_memory());
    let mut messages: Vec<Message> = Vec::new();
    let op = ModifyInstanceAttribute {
        instance_id: "i-1".into(),
        ebs_optimized: Some(true),
        dry_run: true,
        ..Default::default()
    };
    engine.run_single(&op, &mut messages).await.unwrap();

    assert!(messages.iter().any(|m| matches!(
        m,
        Message::Log { message, .. } if message.contains("DryRun flag is set")
    )));
    assert!(!messages.iter().any(Message::is_record));
}

#[tokio::test]
async fn test_run_single_service_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string(
            "<Response><Errors><Error><Code>InvalidInstanceID.NotFound</Code><Message>not found</Message></Error></Errors><RequestID>r-1</RequestID></Response>",
        ))
        .mount(&server)
        .await;

    let mut engine = engine_for(&server, StateManager::in_memory());
    let mut messages: Vec<Message> = Vec::new();
    let op = ModifyInstanceAttribute {
        instance_id: "i-missing".into(),
        source_dest_check: Some(true),
        ..Default::default()
    };

    let err = engine.run_single(&op, &mut messages).await.unwrap_err();
    assert_eq!(err.service_code(), Some("InvalidInstanceID.NotFound"));
    assert!(messages.iter().any(Message::is_error));
}

#[tokio::test]
async fn test_run_paged_token_save_failure_still_summarizes() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "Action=DescribeVolumes",
        volumes_page(&["vol-1"], Some("T1")),
    )
    .await;

    // The store's parent directory is a regular file, so saving fails
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();
    let state = StateManager::new(blocker.join("state.json"));

    let mut engine = engine_for(&server, state);
    let mut messages: Vec<Message> = Vec::new();
    let err = engine
        .run_paged(
            &DescribeVolumes::default(),
            &PagingConfig::new().with_no_auto_iteration(true),
            &mut messages,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::State { .. }));
    assert_eq!(record_ids(&messages), vec!["vol-1"]);
    assert!(messages.iter().any(Message::is_state));
    assert!(matches!(messages.last(), Some(Message::Summary(_))));
}
