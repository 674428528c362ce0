//! Gitea API client for commit status reporting.
//!
//! The client performs a single authenticated call: creating a commit status
//! through `POST /api/v1/repos/{owner}/{repo}/statuses/{sha}`. There is no
//! retry and no custom timeout; callers that want either wrap a
//! [`StatusUpdater`].

mod status;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use std::fmt;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::ApiError;

pub use status::{CommitStatus, CommitStatusState, CreateStatusOption};

const DEFAULT_USER_AGENT: &str = concat!("gitea-webhook/", env!("CARGO_PKG_VERSION"));

/// Connection and credential settings for the Gitea API.
///
/// Authentication uses the token when one is set, otherwise HTTP Basic
/// when a username is set, otherwise no credentials at all.
///
/// # Examples
///
/// ```
/// use gitea_webhook::client::ClientConfig;
///
/// let config = ClientConfig::new("https://gitea.example.com")
///     .unwrap()
///     .with_token("s3cr3t")
///     .with_user_agent("my-ci/1.0");
///
/// assert_eq!(config.base_url().as_str(), "https://gitea.example.com/");
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    base_url: Url,
    token: Option<String>,
    username: Option<String>,
    password: Option<String>,
    user_agent: String,
}

impl ClientConfig {
    /// Create a configuration for the Gitea server at `base_url`.
    ///
    /// A path on the base URL (e.g. `https://example.com/gitea`) is kept as
    /// a prefix of every API path.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if the URL does not parse and
    /// `ApiError::CannotBeABase` if it cannot carry a path.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::CannotBeABase {
                url: base_url.to_string(),
            });
        }

        Ok(Self {
            base_url,
            token: None,
            username: None,
            password: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Authenticate with an access token. Takes precedence over Basic auth.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into()).filter(|t: &String| !t.is_empty());
        self
    }

    /// Authenticate with a username and password.
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into()).filter(|u: &String| !u.is_empty());
        self.password = Some(password.into());
        self
    }

    /// Set the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Name of the authentication scheme in use, for logging.
    pub fn auth_scheme(&self) -> &'static str {
        if self.token.is_some() {
            "token"
        } else if self.username.is_some() {
            "basic"
        } else {
            "none"
        }
    }

    /// URL of the status endpoint for a commit.
    ///
    /// `repository` must be exactly `owner/name` with both parts non-empty;
    /// each part becomes its own path segment.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRepository`] for any other shape, such as
    /// `repo`, `owner//repo` or `/owner/repo/`.
    pub fn status_url(&self, repository: &str, commit_id: &str) -> Result<Url, ApiError> {
        let (owner, name) = match repository.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                (owner, name)
            }
            _ => {
                return Err(ApiError::InvalidRepository {
                    repository: repository.to_string(),
                })
            }
        };

        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| ApiError::CannotBeABase {
                url: self.base_url.to_string(),
            })?;
            segments
                .pop_if_empty()
                .extend(["api", "v1", "repos"])
                .push(owner)
                .push(name)
                .push("statuses")
                .push(commit_id);
        }

        Ok(url)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("auth", &self.auth_scheme())
            .field("username", &self.username)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Anything that can publish a commit status.
///
/// [`StatusClient`] is the HTTP implementation. Decorators (retry, rate
/// limiting) and test doubles implement this trait too.
#[async_trait]
pub trait StatusUpdater: Send + Sync {
    /// Create a status for `commit_id` in `repository` (`owner/name`).
    async fn update_commit_state(
        &self,
        repository: &str,
        commit_id: &str,
        status: &CreateStatusOption,
    ) -> Result<(), ApiError>;
}

/// HTTP client for the Gitea commit status API.
#[derive(Debug, Clone)]
pub struct StatusClient {
    http_client: reqwest::Client,
    config: ClientConfig,
}

impl StatusClient {
    /// Create a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Create a commit status.
    ///
    /// # Arguments
    ///
    /// * `repository` - Repository full name, `owner/name`
    /// * `commit_id` - Commit SHA the status is attached to
    /// * `status` - State, context, description and target URL
    ///
    /// # Errors
    ///
    /// Returns `ApiError::UnexpectedStatus` unless the server answers 200
    /// or 201. Network failures are `ApiError::Transport`.
    #[instrument(skip(self, status), fields(state = %status.state, context = %status.context))]
    pub async fn update_commit_state(
        &self,
        repository: &str,
        commit_id: &str,
        status: &CreateStatusOption,
    ) -> Result<(), ApiError> {
        let url = self.config.status_url(repository, commit_id)?;
        let body = serde_json::to_vec(status)?;

        let mut request = self
            .http_client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        if let Some(token) = &self.config.token {
            request = request.header(AUTHORIZATION, format!("token {}", token));
        } else if let Some(username) = &self.config.username {
            request = request.basic_auth(username, self.config.password.as_deref());
        }

        let response = request.send().await?;
        let code = response.status();
        let text = response.text().await?;

        if code.as_u16() != 200 && code.as_u16() != 201 {
            warn!(status = code.as_u16(), "Commit status update rejected");
            return Err(ApiError::UnexpectedStatus {
                status: code.as_u16(),
                body: text,
            });
        }

        debug!(status = code.as_u16(), "Commit status updated");
        Ok(())
    }
}

#[async_trait]
impl StatusUpdater for StatusClient {
    async fn update_commit_state(
        &self,
        repository: &str,
        commit_id: &str,
        status: &CreateStatusOption,
    ) -> Result<(), ApiError> {
        StatusClient::update_commit_state(self, repository, commit_id, status).await
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
