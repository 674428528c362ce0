//! # Gitea Webhook Service
//!
//! HTTP service that receives Gitea webhook deliveries, validates them with
//! the `gitea-webhook` crate and optionally reports a `pending` commit status
//! back to the Gitea server.
//!
//! Routes:
//! - `<webhook.endpoint_path>` (any method) - webhook intake
//! - `GET /health` - liveness probe

pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod responses;

use axum::routing::get;
use axum::{Json, Router};
use gitea_webhook::{ClientConfig, StatusClient, WebhookReceiver, WebhookSecret};
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

pub use crate::config::ServiceConfig;
pub use crate::dispatcher::StatusReportingDispatcher;
pub use errors::{ConfigError, ServiceError};
pub use responses::HealthResponse;

/// Path of the liveness route, reserved next to the webhook endpoint.
pub const HEALTH_PATH: &str = "/health";

/// Build the dispatcher described by the configuration.
///
/// Status reporting needs `gitea.url`; credentials are optional.
pub fn build_dispatcher(config: &ServiceConfig) -> Result<StatusReportingDispatcher, ServiceError> {
    if !config.status_reporting.enabled {
        return Ok(StatusReportingDispatcher::logging_only());
    }

    let url = config.gitea.url.as_deref().ok_or_else(|| ConfigError::Missing {
        key: "gitea.url".to_string(),
    })?;

    let mut client_config = ClientConfig::new(url)?;
    if let Some(token) = &config.gitea.token {
        client_config = client_config.with_token(token.clone());
    }
    if let Some(username) = &config.gitea.username {
        client_config = client_config.with_basic_auth(
            username.clone(),
            config.gitea.password.clone().unwrap_or_default(),
        );
    }

    info!(
        gitea_url = %client_config.base_url(),
        auth = client_config.auth_scheme(),
        context = %config.status_reporting.context,
        "Commit status reporting enabled"
    );

    let client = StatusClient::new(client_config)?;
    Ok(StatusReportingDispatcher::new(
        Arc::new(client),
        &config.status_reporting,
    ))
}

/// Create the HTTP router with the webhook endpoint and health route.
pub fn create_router(config: &ServiceConfig, dispatcher: StatusReportingDispatcher) -> Router {
    let receiver = WebhookReceiver::new(WebhookSecret::new(config.webhook.secret.clone()), dispatcher)
        .with_max_body_size(config.server.max_body_size);

    gitea_webhook::router(receiver, &config.webhook.endpoint_path)
        .route(HEALTH_PATH, get(handle_health_check))
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server and run until a shutdown signal arrives.
pub async fn start_server(config: ServiceConfig) -> Result<(), ServiceError> {
    let dispatcher = build_dispatcher(&config)?;
    let app = create_router(&config, dispatcher);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ServiceError::BindFailed {
            address: addr.clone(),
            message: e.to_string(),
        })?;

    info!(
        address = %addr,
        endpoint = %config.webhook.endpoint_path,
        "Starting HTTP server"
    );

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_seconds);
    let draining = Arc::new(Notify::new());
    let notify = draining.clone();

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal(shutdown_timeout).await;
        notify.notify_one();
    });

    // In-flight requests get `shutdown_timeout` to finish once the signal arrives
    tokio::select! {
        result = server.into_future() => {
            result.map_err(|e| ServiceError::ServerFailed {
                message: e.to_string(),
            })?;
        }
        _ = async {
            draining.notified().await;
            tokio::time::sleep(shutdown_timeout).await;
        } => {
            warn!(
                timeout_seconds = shutdown_timeout.as_secs(),
                "Graceful shutdown timed out, abandoning in-flight requests"
            );
        }
    }

    info!("HTTP server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
///
/// If a handler cannot be installed, that signal source is ignored.
async fn shutdown_signal(shutdown_timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), initiating graceful shutdown with {}s timeout", shutdown_timeout.as_secs());
        },
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown with {}s timeout", shutdown_timeout.as_secs());
        },
    }
}

#[instrument]
async fn handle_health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
