use super::*;

const ALL_STATES: [(CommitStatusState, &str); 5] = [
    (CommitStatusState::Pending, "pending"),
    (CommitStatusState::Success, "success"),
    (CommitStatusState::Error, "error"),
    (CommitStatusState::Failure, "failure"),
    (CommitStatusState::Warning, "warning"),
];

#[test]
fn test_state_wire_names() {
    for (state, name) in ALL_STATES {
        assert_eq!(state.to_string(), name);
        assert_eq!(name.parse::<CommitStatusState>().unwrap(), state);
        assert_eq!(serde_json::to_value(state).unwrap(), serde_json::json!(name));
    }
}

#[test]
fn test_state_rejects_unknown_names() {
    assert!("running".parse::<CommitStatusState>().is_err());
    assert!("Success".parse::<CommitStatusState>().is_err());
    assert!(serde_json::from_str::<CommitStatusState>(r#""cancelled""#).is_err());
}

#[test]
fn test_create_status_option_serializes_all_four_keys() {
    let option = CreateStatusOption::new(CommitStatusState::Failure, "ci/test")
        .with_description("2 tests failed")
        .with_target_url("https://ci.example.com/runs/7");

    let value = serde_json::to_value(&option).unwrap();

    assert_eq!(
        value,
        serde_json::json!({
            "context": "ci/test",
            "description": "2 tests failed",
            "state": "failure",
            "target_url": "https://ci.example.com/runs/7"
        })
    );
}

#[test]
fn test_create_status_option_defaults_to_empty_strings() {
    let option = CreateStatusOption::new(CommitStatusState::Pending, "ci/build");

    let value = serde_json::to_value(&option).unwrap();

    assert_eq!(value["description"], "");
    assert_eq!(value["target_url"], "");
}

#[test]
fn test_commit_status_decodes_server_reply() {
    let json = r#"{
        "id": 12,
        "status": "success",
        "target_url": "https://ci.example.com/runs/7",
        "description": "All good",
        "url": "https://gitea.example.com/api/v1/repos/owner/repo/statuses/abc",
        "context": "ci/build",
        "creator": {"id": 1, "login": "ci-bot"},
        "created_at": "2024-03-01T10:00:00Z",
        "updated_at": "2024-03-01T10:05:00Z"
    }"#;

    let status: CommitStatus = serde_json::from_str(json).unwrap();

    assert_eq!(status.id, 12);
    assert_eq!(status.state, CommitStatusState::Success);
    assert_eq!(status.context, "ci/build");
    assert_eq!(status.creator.unwrap().login, "ci-bot");
    assert!(status.created_at.is_some());
    assert_eq!(status.sha, "");
}
