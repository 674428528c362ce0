//! Event dispatcher used by the service.
//!
//! Every accepted event is logged. When a status updater is configured, a
//! `pending` commit status is posted for the event's head commit.

use async_trait::async_trait;
use axum::http::{request::Parts, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use gitea_webhook::{
    CommitStatusState, CreateStatusOption, Event, EventDispatcher, EventType, StatusUpdater,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::StatusReportingConfig;
use crate::responses::{ErrorResponse, WebhookResponse};

/// Logs events and reports a `pending` status for their head commit.
pub struct StatusReportingDispatcher {
    updater: Option<Arc<dyn StatusUpdater>>,
    context: String,
    target_url: String,
}

impl StatusReportingDispatcher {
    /// A dispatcher that only logs.
    pub fn logging_only() -> Self {
        Self {
            updater: None,
            context: String::new(),
            target_url: String::new(),
        }
    }

    /// A dispatcher posting statuses through `updater`.
    pub fn new(updater: Arc<dyn StatusUpdater>, settings: &StatusReportingConfig) -> Self {
        Self {
            updater: Some(updater),
            context: settings.context.clone(),
            target_url: settings.target_url.clone(),
        }
    }

    pub fn reports_status(&self) -> bool {
        self.updater.is_some()
    }

    fn pending_status(&self, event_type: EventType) -> CreateStatusOption {
        CreateStatusOption::new(CommitStatusState::Pending, self.context.clone())
            .with_description(format!("Received {} event", event_type))
            .with_target_url(self.target_url.clone())
    }
}

#[async_trait]
impl EventDispatcher for StatusReportingDispatcher {
    async fn dispatch(&self, event_type: EventType, event: Event, request: Parts) -> Response {
        let delivery_id = request
            .headers
            .get(gitea_webhook::webhook::DELIVERY_HEADER)
            .and_then(|v| v.to_str().ok());

        info!(
            event_type = %event_type,
            delivery_id = ?delivery_id,
            repository = %event.repository.full_name,
            action = %event.action,
            sender = %event.sender.login,
            "Accepted webhook event"
        );

        if let Some(updater) = &self.updater {
            match (report_target(&event), event.head_commit_sha(event_type)) {
                (Some(repository), Some(sha)) if !is_null_sha(sha) => {
                    let status = self.pending_status(event_type);
                    if let Err(e) = updater.update_commit_state(repository, sha, &status).await {
                        warn!(
                            error = %e,
                            repository = %repository,
                            sha = %sha,
                            "Failed to report commit status"
                        );
                        return (
                            StatusCode::BAD_GATEWAY,
                            Json(ErrorResponse {
                                status: "error".to_string(),
                                message: format!("Commit status update failed: {}", e),
                            }),
                        )
                            .into_response();
                    }
                    debug!(repository = %repository, sha = %sha, "Reported pending status");
                }
                _ => debug!("Event carries no commit to report a status for"),
            }
        }

        (
            StatusCode::OK,
            Json(WebhookResponse {
                status: "accepted".to_string(),
                event_type: event_type.wire_name().to_string(),
            }),
        )
            .into_response()
    }
}

/// Repository to report against, if the event names one.
fn report_target(event: &Event) -> Option<&str> {
    Some(event.repository.full_name.as_str()).filter(|name| !name.is_empty())
}

/// Branch deletions report the all-zero SHA as `after`.
fn is_null_sha(sha: &str) -> bool {
    sha.bytes().all(|b| b == b'0')
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
