use chrono::{FixedOffset, TimeZone};
use httpmock::prelude::*;
use serde_json::json;
use vreg_domain::config::RegistrationConfig;
use vreg_domain::model::RegistrationRequest;
use vreg_registration::{DuplicateCheck, HttpRegistrationClient, RegistrationClient};

const MARKER: &str = "The number of rows in the range must be at least 1";

fn client_for(server: &MockServer, timeout_seconds: u64) -> HttpRegistrationClient {
    HttpRegistrationClient::new(&RegistrationConfig {
        endpoint: server.url("/exec"),
        timeout_seconds,
        empty_dataset_marker: MARKER.to_owned(),
    })
    .unwrap()
}

fn request() -> RegistrationRequest {
    let kst = FixedOffset::east_opt(9 * 3600).unwrap();
    RegistrationRequest::new("홍길동", "12가3456", kst.with_ymd_and_hms(2024, 5, 6, 10, 0, 0).unwrap())
}

#[tokio::test]
async fn duplicate_check_sends_action_and_plate() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/exec")
                .query_param("action", "checkDuplicate")
                .query_param("carNumber", "12가3456");
            then.status(200).json_body(json!({ "isDuplicate": true }));
        })
        .await;

    let outcome = client_for(&server, 5).check_duplicate("12가3456").await.unwrap();
    assert_eq!(outcome, DuplicateCheck::Duplicate);
    mock.assert_async().await;
}

#[tokio::test]
async fn empty_dataset_text_is_not_a_duplicate() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/exec");
            then.status(500).body(format!("Exception: {MARKER}. (line 12, file \"Code\")"));
        })
        .await;

    let outcome = client_for(&server, 5).check_duplicate("12가3456").await.unwrap();
    assert_eq!(outcome, DuplicateCheck::EmptyDataset);
}

#[tokio::test]
async fn other_remote_errors_fail_the_check() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/exec");
            then.status(500).body("Exception: Service invoked too many times");
        })
        .await;

    let err = client_for(&server, 5).check_duplicate("12가3456").await.unwrap_err();
    assert_eq!(err.kind(), "remote");
    assert!(err.is_remote());
}

#[tokio::test]
async fn non_json_reply_is_a_decode_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/exec");
            then.status(200).body("<html>sign in</html>");
        })
        .await;

    let err = client_for(&server, 5).check_duplicate("12가3456").await.unwrap_err();
    assert_eq!(err.kind(), "decode");
}

#[tokio::test]
async fn submit_posts_the_wire_body() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/exec").json_body(json!({
                "name": "홍길동",
                "carNumber": "12가3456",
                "timestamp": "2024-05-06 10:00:00.000000"
            }));
            then.status(200).body("Success");
        })
        .await;

    let receipt = client_for(&server, 5).submit(&request()).await.unwrap();
    assert!(receipt.success);
    assert_eq!(receipt.raw_body, "Success");
    mock.assert_async().await;
}

#[tokio::test]
async fn error_text_in_ok_reply_is_a_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/exec");
            then.status(200).body("Error: sheet locked");
        })
        .await;

    let receipt = client_for(&server, 5).submit(&request()).await.unwrap();
    assert!(!receipt.success);
}

#[tokio::test]
async fn non_ok_status_is_a_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/exec");
            then.status(503).body("Unavailable");
        })
        .await;

    let receipt = client_for(&server, 5).submit(&request()).await.unwrap();
    assert!(!receipt.success);
}

#[tokio::test]
async fn slow_endpoint_times_out_once() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/exec");
            then.status(200)
                .delay(std::time::Duration::from_secs(3))
                .json_body(json!({ "isDuplicate": false }));
        })
        .await;

    let err = client_for(&server, 1).check_duplicate("12가3456").await.unwrap_err();
    assert_eq!(err.kind(), "transport");
    // Single attempt, no retry.
    assert_eq!(mock.hits_async().await, 1);
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let client = HttpRegistrationClient::new(&RegistrationConfig {
        endpoint: "http://127.0.0.1:9/exec".to_owned(),
        timeout_seconds: 2,
        ..RegistrationConfig::default()
    })
    .unwrap();

    let err = client.submit(&request()).await.unwrap_err();
    assert_eq!(err.kind(), "transport");
}
