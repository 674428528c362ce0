use super::*;
use gitea_webhook::ApiError;
use std::sync::Mutex;

#[derive(Default)]
struct FakeUpdater {
    calls: Mutex<Vec<(String, String, CreateStatusOption)>>,
    fail_with: Option<u16>,
}

#[async_trait]
impl StatusUpdater for FakeUpdater {
    async fn update_commit_state(
        &self,
        repository: &str,
        commit_id: &str,
        status: &CreateStatusOption,
    ) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push((
            repository.to_string(),
            commit_id.to_string(),
            status.clone(),
        ));
        match self.fail_with {
            Some(status) => Err(ApiError::UnexpectedStatus {
                status,
                body: String::new(),
            }),
            None => Ok(()),
        }
    }
}

fn settings() -> StatusReportingConfig {
    StatusReportingConfig {
        enabled: true,
        context: "ci/intake".to_string(),
        target_url: "https://ci.example.com".to_string(),
    }
}

fn parts() -> Parts {
    axum::http::Request::builder()
        .method("POST")
        .uri("/webhook")
        .header(gitea_webhook::webhook::DELIVERY_HEADER, "delivery-1")
        .body(())
        .unwrap()
        .into_parts()
        .0
}

fn push_event(after: &str) -> Event {
    let mut event = Event::default();
    event.git_ref = "refs/heads/main".to_string();
    event.after = after.to_string();
    event.repository.full_name = "owner/repo".to_string();
    event
}

async fn json_body(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_logging_only_dispatcher_accepts() {
    let dispatcher = StatusReportingDispatcher::logging_only();
    assert!(!dispatcher.reports_status());

    let response = dispatcher
        .dispatch(EventType::Push, push_event("abc123"), parts())
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        serde_json::json!({"status": "accepted", "event_type": "push"})
    );
}

#[tokio::test]
async fn test_push_reports_pending_status_for_after_sha() {
    let updater = Arc::new(FakeUpdater::default());
    let dispatcher = StatusReportingDispatcher::new(updater.clone(), &settings());

    let response = dispatcher
        .dispatch(EventType::Push, push_event("abc123"), parts())
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let calls = updater.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (repository, sha, status) = &calls[0];
    assert_eq!(repository, "owner/repo");
    assert_eq!(sha, "abc123");
    assert_eq!(status.state, CommitStatusState::Pending);
    assert_eq!(status.context, "ci/intake");
    assert_eq!(status.description, "Received push event");
    assert_eq!(status.target_url, "https://ci.example.com");
}

#[tokio::test]
async fn test_pull_request_reports_head_sha() {
    let updater = Arc::new(FakeUpdater::default());
    let dispatcher = StatusReportingDispatcher::new(updater.clone(), &settings());

    let mut event = Event::default();
    event.action = "opened".to_string();
    event.number = 7;
    event.repository.full_name = "owner/repo".to_string();
    event.pull_request.head.sha = "feedface".to_string();

    let response = dispatcher
        .dispatch(EventType::PullRequest, event, parts())
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        serde_json::json!({"status": "accepted", "event_type": "pull_request"})
    );
    let calls = updater.calls.lock().unwrap();
    assert_eq!(calls[0].1, "feedface");
    assert_eq!(calls[0].2.description, "Received pull request event");
}

#[tokio::test]
async fn test_branch_deletion_is_not_reported() {
    let updater = Arc::new(FakeUpdater::default());
    let dispatcher = StatusReportingDispatcher::new(updater.clone(), &settings());

    let response = dispatcher
        .dispatch(
            EventType::Push,
            push_event("0000000000000000000000000000000000000000"),
            parts(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(updater.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_event_without_repository_or_commit_is_not_reported() {
    let updater = Arc::new(FakeUpdater::default());
    let dispatcher = StatusReportingDispatcher::new(updater.clone(), &settings());

    let response = dispatcher
        .dispatch(EventType::Push, Event::default(), parts())
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let mut no_repository = push_event("abc123");
    no_repository.repository.full_name.clear();
    let response = dispatcher
        .dispatch(EventType::Push, no_repository, parts())
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    assert!(updater.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_status_update_is_bad_gateway() {
    let updater = Arc::new(FakeUpdater {
        fail_with: Some(401),
        ..FakeUpdater::default()
    });
    let dispatcher = StatusReportingDispatcher::new(updater.clone(), &settings());

    let response = dispatcher
        .dispatch(EventType::Push, push_event("abc123"), parts())
        .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(
        body["message"],
        "Commit status update failed: Invalid status code returned: 401"
    );
}

#[test]
fn test_null_sha_detection() {
    assert!(is_null_sha("0000000000000000000000000000000000000000"));
    assert!(!is_null_sha("0000000000000000000000000000000000000001"));
}
