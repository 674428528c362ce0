//! Gitea webhook intake and validation.
//!
//! # Core Components
//!
//! - [`WebhookReceiver`] - validation chain from raw HTTP request to typed event
//! - [`EventDispatcher`] - trait for application-provided event handling
//! - [`SignatureValidator`] / [`verify_signature`] - HMAC-SHA256 verification
//! - [`router`] - `axum` router serving a receiver on a path
//!
//! # Security
//!
//! Signatures are verified over the exact body bytes with a constant-time
//! comparison, before the body is handed to the JSON decoder. Secrets and
//! signature values are never logged.
//!
//! # Usage
//!
//! ```rust,no_run
//! use gitea_webhook::webhook::{router, EventDispatcher, WebhookReceiver, WebhookSecret};
//! use gitea_webhook::events::{Event, EventType};
//! use async_trait::async_trait;
//! use axum::http::request::Parts;
//! use axum::response::{IntoResponse, Response};
//!
//! struct MyDispatcher;
//!
//! #[async_trait]
//! impl EventDispatcher for MyDispatcher {
//!     async fn dispatch(&self, event_type: EventType, event: Event, _request: Parts) -> Response {
//!         match event_type {
//!             EventType::Push => println!("push to {}", event.git_ref),
//!             EventType::PullRequest => println!("pull request #{} {}", event.number, event.action),
//!         }
//!         ().into_response()
//!     }
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let receiver = WebhookReceiver::new(WebhookSecret::new("123456"), MyDispatcher);
//! let app = router(receiver, "/webhook");
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod handler;
pub mod receiver;
pub mod validation;

// Re-export main types
pub use handler::{dispatcher_fn, handle_webhook, router, DispatchFn, EventDispatcher};
pub use receiver::{
    check_headers, DeliveryHeaders, ValidatedDelivery, WebhookReceiver, DEFAULT_MAX_BODY_SIZE,
    DELIVERY_HEADER, EVENT_HEADER, SIGNATURE_HEADER,
};
pub use validation::{compute_signature, verify_signature, SignatureValidator, WebhookSecret};
