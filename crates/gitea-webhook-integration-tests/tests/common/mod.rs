//! Common test utilities for the integration tests
//!
//! This module provides:
//! - A recording dispatcher for observing which events reach the application
//! - Helpers to serve a router on an ephemeral port
//! - Signed delivery builders

use async_trait::async_trait;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Router;
use gitea_webhook::webhook::{compute_signature, EVENT_HEADER, SIGNATURE_HEADER};
use gitea_webhook::{Event, EventDispatcher, EventType};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

pub const SECRET: &str = "123456";

/// Known good delivery: body and signature for secret `123456`.
#[allow(dead_code)]
pub const KNOWN_BODY: &str = r#"{"secret": "123456", "number": 23}"#;
#[allow(dead_code)]
pub const KNOWN_SIGNATURE: &str =
    "cd2f9b218db846d088a6ed5d7cb0ec0ee8f6da141dab90c3fd826d3e7e7918fd";

// ============================================================================
// Recording dispatcher
// ============================================================================

/// A dispatched event as observed by [`RecordingDispatcher`].
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct Dispatched {
    pub event_type: EventType,
    pub event: Event,
    pub path: String,
}

/// Dispatcher that records every event and answers `204 No Content`.
#[derive(Clone, Default)]
#[allow(dead_code)]
pub struct RecordingDispatcher {
    calls: Arc<Mutex<Vec<Dispatched>>>,
}

impl RecordingDispatcher {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn calls(&self) -> Vec<Dispatched> {
        self.calls.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl EventDispatcher for RecordingDispatcher {
    async fn dispatch(&self, event_type: EventType, event: Event, request: Parts) -> Response {
        self.calls.lock().unwrap().push(Dispatched {
            event_type,
            event,
            path: request.uri.path().to_string(),
        });
        StatusCode::NO_CONTENT.into_response()
    }
}

// ============================================================================
// Server helpers
// ============================================================================

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn spawn_app(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Build a signed `POST` delivery for `event` with `body`.
pub fn signed_delivery(
    client: &reqwest::Client,
    url: &str,
    event: &str,
    body: &str,
) -> reqwest::RequestBuilder {
    client
        .post(url)
        .header("content-type", "application/json")
        .header(EVENT_HEADER, event)
        .header(SIGNATURE_HEADER, compute_signature(SECRET.as_bytes(), body.as_bytes()))
        .body(body.to_string())
}
