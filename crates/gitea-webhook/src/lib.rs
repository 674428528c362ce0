//! # Gitea Webhook
//!
//! Receive, authenticate and decode Gitea webhook deliveries, and report
//! commit statuses back to the Gitea server.
//!
//! This crate provides:
//! - HMAC-SHA256 signature verification over the raw request body
//! - A validating webhook receiver that plugs into an `axum` router
//! - Typed event models for `push` and `pull_request` deliveries
//! - A client for the commit status endpoint of the Gitea REST API
//!
//! # Examples
//!
//! ## Serving a webhook endpoint
//!
//! ```rust,no_run
//! use gitea_webhook::webhook::{dispatcher_fn, router, WebhookReceiver, WebhookSecret};
//! use gitea_webhook::events::{Event, EventType};
//! use axum::http::request::Parts;
//! use axum::response::IntoResponse;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dispatcher = dispatcher_fn(|event_type: EventType, event: Event, _parts: Parts| async move {
//!     println!("{} on {}", event_type, event.repository.full_name);
//!     ().into_response()
//! });
//!
//! let receiver = WebhookReceiver::new(WebhookSecret::new("123456"), dispatcher);
//! let app = router(receiver, "/webhook");
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Reporting a commit status
//!
//! ```rust,no_run
//! use gitea_webhook::client::{ClientConfig, CommitStatusState, CreateStatusOption, StatusClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::new("https://gitea.example.com")?.with_token("s3cr3t");
//! let client = StatusClient::new(config)?;
//!
//! let status = CreateStatusOption::new(CommitStatusState::Success, "ci/build")
//!     .with_description("Build passed");
//! client
//!     .update_commit_state("owner/repo", "0123abcd", &status)
//!     .await?;
//! # Ok(())
//! # }
//! ```

// Public modules
pub mod client;
pub mod error;
pub mod events;
pub mod webhook;

// Re-export commonly used types at crate root for convenience
pub use error::{ApiError, EventError, WebhookError};

pub use client::{
    ClientConfig, CommitStatus, CommitStatusState, CreateStatusOption, StatusClient,
    StatusUpdater,
};
pub use events::{Event, EventType};
pub use webhook::{
    dispatcher_fn, router, verify_signature, EventDispatcher, SignatureValidator,
    WebhookReceiver, WebhookSecret,
};
