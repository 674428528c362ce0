//! Commit status models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::events::User;

/// State of a single commit status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitStatusState {
    #[default]
    Pending,
    Success,
    Error,
    Failure,
    Warning,
}

impl CommitStatusState {
    /// Wire representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Error => "error",
            Self::Failure => "failure",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for CommitStatusState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommitStatusState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            "failure" => Ok(Self::Failure),
            "warning" => Ok(Self::Warning),
            other => Err(format!("Unknown commit status state: {}", other)),
        }
    }
}

/// Request body for creating a commit status.
///
/// # Examples
///
/// ```
/// use gitea_webhook::client::{CommitStatusState, CreateStatusOption};
///
/// let status = CreateStatusOption::new(CommitStatusState::Pending, "ci/build")
///     .with_description("Build queued")
///     .with_target_url("https://ci.example.com/builds/42");
///
/// assert_eq!(status.context, "ci/build");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateStatusOption {
    /// Label distinguishing this status from others on the same commit
    pub context: String,

    /// Short human-readable description
    pub description: String,

    pub state: CommitStatusState,

    /// Link from Gitea to the external system
    pub target_url: String,
}

impl CreateStatusOption {
    /// Create a status option with an empty description and target URL.
    pub fn new(state: CommitStatusState, context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            description: String::new(),
            state,
            target_url: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_target_url(mut self, target_url: impl Into<String>) -> Self {
        self.target_url = target_url.into();
        self
    }
}

/// A commit status as stored and returned by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitStatus {
    pub id: i64,

    /// Gitea reports the state under `status`
    #[serde(alias = "status")]
    pub state: CommitStatusState,

    pub sha: String,
    pub target_url: String,
    pub description: String,
    pub url: String,
    pub context: String,
    pub creator: Option<User>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
