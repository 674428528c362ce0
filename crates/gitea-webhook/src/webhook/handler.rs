//! Dispatcher trait and `axum` integration.
//!
//! Applications implement [`EventDispatcher`] (or wrap an async closure with
//! [`dispatcher_fn`]) to process validated events. The dispatcher owns the
//! HTTP response from that point on; returning `()` yields an empty
//! `200 OK`.

use async_trait::async_trait;
use axum::extract::{Request, State};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use std::future::Future;
use std::sync::Arc;

use crate::events::{Event, EventType};
use crate::webhook::receiver::WebhookReceiver;

/// Application-provided logic invoked for every validated webhook event.
///
/// # Examples
///
/// ```rust
/// use gitea_webhook::webhook::EventDispatcher;
/// use gitea_webhook::events::{Event, EventType};
/// use async_trait::async_trait;
/// use axum::http::{request::Parts, StatusCode};
/// use axum::response::{IntoResponse, Response};
///
/// struct PushLogger;
///
/// #[async_trait]
/// impl EventDispatcher for PushLogger {
///     async fn dispatch(&self, event_type: EventType, event: Event, _request: Parts) -> Response {
///         if event_type == EventType::Push {
///             println!("{} pushed to {}", event.pusher.login, event.git_ref);
///         }
///         StatusCode::NO_CONTENT.into_response()
///     }
/// }
/// ```
#[async_trait]
pub trait EventDispatcher: Send + Sync {
    /// Handle a validated event and produce the HTTP response.
    ///
    /// # Arguments
    ///
    /// * `event_type` - Event type named by the delivery headers
    /// * `event` - Decoded payload; read only the fields relevant to `event_type`
    /// * `request` - Method, URI and headers of the original request
    async fn dispatch(&self, event_type: EventType, event: Event, request: Parts) -> Response;
}

#[async_trait]
impl<D> EventDispatcher for Arc<D>
where
    D: EventDispatcher + ?Sized,
{
    async fn dispatch(&self, event_type: EventType, event: Event, request: Parts) -> Response {
        (**self).dispatch(event_type, event, request).await
    }
}

/// An [`EventDispatcher`] backed by an async closure. See [`dispatcher_fn`].
#[derive(Clone)]
pub struct DispatchFn<F> {
    f: F,
}

/// Wrap an async closure as an [`EventDispatcher`].
///
/// The closure's output may be anything implementing `IntoResponse`.
pub fn dispatcher_fn<F, Fut>(f: F) -> DispatchFn<F>
where
    F: Fn(EventType, Event, Parts) -> Fut + Send + Sync,
    Fut: Future + Send + 'static,
    Fut::Output: IntoResponse,
{
    DispatchFn { f }
}

#[async_trait]
impl<F, Fut> EventDispatcher for DispatchFn<F>
where
    F: Fn(EventType, Event, Parts) -> Fut + Send + Sync,
    Fut: Future + Send + 'static,
    Fut::Output: IntoResponse,
{
    async fn dispatch(&self, event_type: EventType, event: Event, request: Parts) -> Response {
        (self.f)(event_type, event, request).await.into_response()
    }
}

/// Build a router that serves `receiver` on `path` for every HTTP method.
///
/// All methods are routed so that non-`POST` requests are answered by the
/// receiver's own checks (`400`) instead of the router's `405`.
pub fn router<D>(receiver: WebhookReceiver<D>, path: &str) -> Router
where
    D: EventDispatcher + 'static,
{
    Router::new()
        .route(path, any(handle_webhook::<D>))
        .with_state(Arc::new(receiver))
}

/// `axum` handler delegating to [`WebhookReceiver::receive`].
pub async fn handle_webhook<D>(
    State(receiver): State<Arc<WebhookReceiver<D>>>,
    request: Request,
) -> Response
where
    D: EventDispatcher + 'static,
{
    receiver.receive(request).await
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
