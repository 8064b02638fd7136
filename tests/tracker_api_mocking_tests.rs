//! Jira API mocking tests
//!
//! These tests use wiremock to serve deterministic search pages, so the
//! client's paging, auth and error mapping run without network access.

use serde_json::{json, Value};
use sprint_metrics::config::TrackerConfig;
use sprint_metrics::{IssueSource, JiraClient, TrackerError};
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Jira search API mock server
struct JiraApiMock {
    server: MockServer,
}

impl JiraApiMock {
    async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    fn config(&self) -> TrackerConfig {
        TrackerConfig {
            base_url: format!("{}/rest/api/2", self.server.uri()),
            username: Some("bot@example.com".to_string()),
            api_token: Some("mock-token".to_string()),
            sprint: "sprint = 5".to_string(),
            page_size: 2,
            ..TrackerConfig::default()
        }
    }

    /// Serve one page of a search whose result set has `total` issues
    async fn mock_page(&self, start_at: u64, total: u64, keys: &[&str]) {
        let issues: Vec<Value> = keys
            .iter()
            .enumerate()
            .map(|(offset, key)| {
                json!({
                    "key": key,
                    "id": (10_000 + start_at + offset as u64).to_string(),
                    "fields": {"summary": format!("Issue {key}")}
                })
            })
            .collect();

        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .and(query_param("startAt", start_at.to_string()))
            .and(query_param("maxResults", "2"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "startAt": start_at,
                "maxResults": 2,
                "total": total,
                "issues": issues
            })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    async fn mock_status(&self, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }
}

#[tokio::test]
async fn test_search_follows_pages_until_total() {
    let mock = JiraApiMock::new().await;
    mock.mock_page(0, 3, &["PROJ-1", "PROJ-2"]).await;
    mock.mock_page(2, 3, &["PROJ-3"]).await;

    let client = JiraClient::new(&mock.config()).unwrap();
    let issues = client.search("sprint = 5 AND type = Story").await.unwrap();

    let keys: Vec<&str> = issues.iter().map(|issue| issue.key.as_str()).collect();
    assert_eq!(keys, vec!["PROJ-1", "PROJ-2", "PROJ-3"]);
    assert_eq!(issues[2].id, "10002");

    let stats = client.metrics().get_stats();
    assert_eq!(stats.total_requests, 2);
    assert_eq!(stats.pages, 2);
    assert_eq!(stats.issues, 3);
    assert_eq!(stats.errors, 0);
}

#[tokio::test]
async fn test_search_sends_jql_query() {
    let mock = JiraApiMock::new().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .and(query_param("jql", "sprint = 5 AND parent = 10001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "startAt": 0, "maxResults": 2, "total": 0, "issues": []
        })))
        .expect(1)
        .mount(&mock.server)
        .await;

    let client = JiraClient::new(&mock.config()).unwrap();
    let issues = client.search("sprint = 5 AND parent = 10001").await.unwrap();
    assert!(issues.is_empty());
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication_error() {
    let mock = JiraApiMock::new().await;
    mock.mock_status(401, "").await;

    let client = JiraClient::new(&mock.config()).unwrap();
    let result = client.search("sprint = 5").await;
    assert!(matches!(
        result,
        Err(TrackerError::AuthenticationFailed { status: 401 })
    ));
    assert_eq!(client.metrics().get_stats().errors, 1);
}

#[tokio::test]
async fn test_bad_query_keeps_body_excerpt() {
    let mock = JiraApiMock::new().await;
    mock.mock_status(400, "Field 'sprnt' does not exist").await;

    let client = JiraClient::new(&mock.config()).unwrap();
    match client.search("sprnt = 5").await {
        Err(TrackerError::Status { status, body }) => {
            assert_eq!(status, 400);
            assert!(body.contains("sprnt"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let mock = JiraApiMock::new().await;
    mock.mock_status(200, "<html>maintenance</html>").await;

    let client = JiraClient::new(&mock.config()).unwrap();
    assert!(matches!(
        client.search("sprint = 5").await,
        Err(TrackerError::InvalidResponse { .. })
    ));
}

/// Serve a page without the optional `startAt` echo
async fn mount_unechoed_page(server: &MockServer, start_at: u64, keys: &[&str]) {
    let issues: Vec<Value> = keys
        .iter()
        .map(|key| json!({"key": key, "id": "1", "fields": {}}))
        .collect();

    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .and(query_param("startAt", start_at.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 3,
            "issues": issues
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_paging_advances_without_start_at_echo() {
    let mock = JiraApiMock::new().await;
    mount_unechoed_page(&mock.server, 0, &["PROJ-1", "PROJ-2"]).await;
    mount_unechoed_page(&mock.server, 1, &["PROJ-2", "PROJ-3"]).await;
    mount_unechoed_page(&mock.server, 2, &["PROJ-3"]).await;

    let client = JiraClient::new(&mock.config()).unwrap();
    let issues = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        client.search("sprint = 5"),
    )
    .await
    .expect("search should terminate")
    .unwrap();

    let keys: Vec<&str> = issues.iter().map(|issue| issue.key.as_str()).collect();
    assert_eq!(keys, vec!["PROJ-1", "PROJ-2", "PROJ-3"]);
    assert_eq!(client.metrics().get_stats().total_requests, 2);
}

#[tokio::test]
async fn test_capped_page_size_still_collects_everything() {
    let mock = JiraApiMock::new().await;
    for (start_at, key) in ["PROJ-1", "PROJ-2", "PROJ-3"].iter().enumerate() {
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .and(query_param("startAt", start_at.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "startAt": start_at,
                "maxResults": 1,
                "total": 3,
                "issues": [{"key": key, "id": "1", "fields": {}}]
            })))
            .expect(1)
            .mount(&mock.server)
            .await;
    }

    let client = JiraClient::new(&mock.config()).unwrap();
    let issues = client.search("sprint = 5").await.unwrap();
    assert_eq!(issues.len(), 3);
    assert_eq!(client.metrics().get_stats().pages, 3);
}
