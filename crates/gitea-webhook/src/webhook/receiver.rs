//! Webhook receiver: the per-request validation chain.
//!
//! A delivery is accepted only if every check passes, in this order:
//!
//! 1. method is `POST`
//! 2. `Content-Type` is `application/json` (case-insensitive)
//! 3. `X-Gitea-Event` is present
//! 4. the event name is a supported [`EventType`]
//! 5. `X-Gitea-Signature` is present
//! 6. the body can be read into memory
//! 7. the signature matches the body
//! 8. the body decodes into an [`Event`]
//!
//! Header checks come first so malformed requests are rejected before any
//! cryptographic work, and the signature is checked before the JSON decoder
//! ever sees the body. The first failing check ends the request with a
//! [`WebhookError`]; the dispatcher only ever sees fully validated events.

use axum::body::Body;
use axum::extract::Request;
use axum::http::{header, request::Parts, HeaderMap, Method};
use axum::response::{IntoResponse, Response};
use tracing::{debug, info, instrument, warn};

use crate::error::WebhookError;
use crate::events::{Event, EventType};
use crate::webhook::handler::EventDispatcher;
use crate::webhook::validation::{SignatureValidator, WebhookSecret};

/// Header carrying the wire event name.
pub const EVENT_HEADER: &str = "x-gitea-event";

/// Header carrying the hex HMAC-SHA256 signature of the body.
pub const SIGNATURE_HEADER: &str = "x-gitea-signature";

/// Header carrying the delivery UUID (logged only).
pub const DELIVERY_HEADER: &str = "x-gitea-delivery";

/// Default upper bound on the request body size (10MB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

const JSON_CONTENT_TYPE: &str = "application/json";

/// A delivery that passed every check.
#[derive(Debug)]
pub struct ValidatedDelivery {
    /// Event type named by the `X-Gitea-Event` header
    pub event_type: EventType,

    /// Decoded payload
    pub event: Event,

    /// Method, URI, headers and extensions of the original request
    pub parts: Parts,
}

/// Header values extracted by the cheap pre-checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryHeaders {
    pub event_type: EventType,
    pub signature: String,
    pub delivery_id: Option<String>,
}

/// Validates incoming Gitea webhook requests and hands accepted events to a
/// dispatcher.
///
/// The receiver holds only read-only state (secret, dispatcher, size limit)
/// and can be shared between concurrent requests behind an `Arc`.
pub struct WebhookReceiver<D> {
    validator: SignatureValidator,
    dispatcher: D,
    max_body_size: usize,
}

impl<D> WebhookReceiver<D>
where
    D: EventDispatcher,
{
    /// Create a new webhook receiver.
    ///
    /// # Arguments
    ///
    /// * `secret` - Shared secret configured on the Gitea webhook
    /// * `dispatcher` - Caller logic invoked for every validated event
    pub fn new(secret: WebhookSecret, dispatcher: D) -> Self {
        Self {
            validator: SignatureValidator::new(secret),
            dispatcher,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }

    /// Set the largest body, in bytes, that will be read into memory.
    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    /// The configured body size limit.
    pub fn max_body_size(&self) -> usize {
        self.max_body_size
    }

    /// The dispatcher receiving validated events.
    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Process a webhook request end to end.
    ///
    /// Returns a `400 Bad Request` for any failed check, otherwise whatever
    /// the dispatcher returns.
    #[instrument(skip(self, request), fields(method = %request.method(), uri = %request.uri()))]
    pub async fn receive(&self, request: Request) -> Response {
        match self.validate(request).await {
            Ok(delivery) => {
                info!(
                    event_type = %delivery.event_type,
                    repository = %delivery.event.repository.full_name,
                    "Webhook validated, dispatching event"
                );

                self.dispatcher
                    .dispatch(delivery.event_type, delivery.event, delivery.parts)
                    .await
            }
            Err(e) => {
                warn!(reason = e.reason(), error = %e, "Rejected webhook request");
                e.into_response()
            }
        }
    }

    /// Run the full validation chain without dispatching.
    pub async fn validate(&self, request: Request) -> Result<ValidatedDelivery, WebhookError> {
        let (parts, body) = request.into_parts();

        let headers = check_headers(&parts.method, &parts.headers)?;
        debug!(
            event_type = %headers.event_type,
            delivery_id = ?headers.delivery_id,
            "Webhook headers accepted"
        );

        let payload = self.read_body(body).await?;
        let event = self.authenticate(&payload, &headers.signature)?;

        Ok(ValidatedDelivery {
            event_type: headers.event_type,
            event,
            parts,
        })
    }

    /// Verify the signature of a raw payload and decode it.
    ///
    /// The payload must be the exact bytes received on the wire.
    pub fn authenticate(&self, payload: &[u8], signature: &str) -> Result<Event, WebhookError> {
        if !self.validator.validate(payload, signature) {
            return Err(WebhookError::InvalidSignature);
        }

        Ok(Event::from_slice(payload)?)
    }

    async fn read_body(&self, body: Body) -> Result<bytes::Bytes, WebhookError> {
        axum::body::to_bytes(body, self.max_body_size)
            .await
            .map_err(|e| WebhookError::BodyRead {
                message: e.to_string(),
            })
    }
}

/// Apply the header and method checks.
///
/// These checks are cheap and run before the body is read.
pub fn check_headers(method: &Method, headers: &HeaderMap) -> Result<DeliveryHeaders, WebhookError> {
    if *method != Method::POST {
        return Err(WebhookError::MethodNotAllowed {
            method: method.to_string(),
        });
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if !content_type.eq_ignore_ascii_case(JSON_CONTENT_TYPE) {
        return Err(WebhookError::InvalidContentType);
    }

    let event_name = header_value(headers, EVENT_HEADER).ok_or(WebhookError::MissingEventHeader)?;
    let event_type = EventType::from_wire(&event_name)?;

    let signature =
        header_value(headers, SIGNATURE_HEADER).ok_or(WebhookError::MissingSignatureHeader)?;

    Ok(DeliveryHeaders {
        event_type,
        signature,
        delivery_id: header_value(headers, DELIVERY_HEADER),
    })
}

/// Header value as text; absent and empty values are both `None`.
fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "receiver_tests.rs"]
mod tests;
