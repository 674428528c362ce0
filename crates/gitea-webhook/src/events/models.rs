//! Payload structures for Gitea webhook deliveries.
//!
//! All records decode leniently: unknown JSON fields are ignored, and missing
//! fields or explicit `null`s take the zero value of their type. Gitea emits
//! `null` for empty lists (`"assignees": null`) and unset strings. Type
//! mismatches (a number where a string is expected, and so on) are decode
//! errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::EventType;
use crate::error::EventError;

/// Decode a field that may be `null`, substituting the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Event
// ============================================================================

/// A decoded Gitea webhook payload.
///
/// The record is deliberately undiscriminated: it carries the union of the
/// fields used by every supported [`EventType`], and which of them are
/// populated depends on the event type of the delivery.
///
/// | Event type | Relevant fields |
/// |------------|-----------------|
/// | `push` | `ref`, `before`, `after`, `compare_url`, `commits`, `repository`, `pusher`, `sender` |
/// | `pull_request` | `action`, `number`, `pull_request`, `repository`, `sender` |
///
/// See [`Event::relevant_fields`] for the same table in code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    /// Secret configured on the webhook (sent by older Gitea versions)
    #[serde(deserialize_with = "null_as_default")]
    pub secret: String,

    /// Action that triggered a pull request event (`opened`, `closed`, ...)
    #[serde(deserialize_with = "null_as_default")]
    pub action: String,

    /// Pull request number
    #[serde(deserialize_with = "null_as_default")]
    pub number: i64,

    /// Full git reference that was pushed (e.g. `refs/heads/main`)
    #[serde(rename = "ref", deserialize_with = "null_as_default")]
    pub git_ref: String,

    /// Commit SHA the reference pointed to before the push
    #[serde(deserialize_with = "null_as_default")]
    pub before: String,

    /// Commit SHA the reference points to after the push
    #[serde(deserialize_with = "null_as_default")]
    pub after: String,

    /// Link to the comparison between `before` and `after`
    #[serde(deserialize_with = "null_as_default")]
    pub compare_url: String,

    /// Commits included in the push
    #[serde(deserialize_with = "null_as_default")]
    pub commits: Vec<Commit>,

    /// Pull request details
    #[serde(deserialize_with = "null_as_default")]
    pub pull_request: PullRequest,

    /// Repository where the event occurred
    #[serde(deserialize_with = "null_as_default")]
    pub repository: Repository,

    /// User who pushed
    #[serde(deserialize_with = "null_as_default")]
    pub pusher: User,

    /// User who triggered the event
    #[serde(deserialize_with = "null_as_default")]
    pub sender: User,
}

impl Event {
    /// Decode an event from raw JSON bytes.
    ///
    /// The bytes should already be authenticated; see
    /// [`verify_signature`](crate::webhook::verify_signature).
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Decode`] for malformed JSON or type mismatches.
    pub fn from_slice(payload: &[u8]) -> Result<Self, EventError> {
        Ok(serde_json::from_slice(payload)?)
    }

    /// Names of the JSON fields that carry meaning for the given event type.
    pub fn relevant_fields(event_type: EventType) -> &'static [&'static str] {
        match event_type {
            EventType::Push => &[
                "ref",
                "before",
                "after",
                "compare_url",
                "commits",
                "repository",
                "pusher",
                "sender",
            ],
            EventType::PullRequest => &["action", "number", "pull_request", "repository", "sender"],
        }
    }

    /// The commit a status report for this event should be attached to.
    ///
    /// For pushes this is the new tip (`after`), for pull requests the head
    /// commit of the pull request. Returns `None` when that field is empty.
    pub fn head_commit_sha(&self, event_type: EventType) -> Option<&str> {
        let sha = match event_type {
            EventType::Push => self.after.as_str(),
            EventType::PullRequest => self.pull_request.head.sha.as_str(),
        };

        if sha.is_empty() {
            None
        } else {
            Some(sha)
        }
    }
}

// ============================================================================
// Commits
// ============================================================================

/// A single commit in a push event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Commit {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub author: GitUser,
    #[serde(deserialize_with = "null_as_default")]
    pub committer: GitUser,
    pub timestamp: Option<DateTime<Utc>>,
}

/// A git identity as recorded in a commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitUser {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
}

// ============================================================================
// Pull Requests
// ============================================================================

/// An open (or recently closed) pull request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub number: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub user: User,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(deserialize_with = "null_as_default")]
    pub labels: Vec<Label>,
    pub assignee: Option<User>,
    #[serde(deserialize_with = "null_as_default")]
    pub assignees: Vec<User>,

    /// `open` or `closed`
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,

    #[serde(deserialize_with = "null_as_default")]
    pub comments: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub html_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub diff_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub patch_url: String,

    /// Whether the pull request can be merged without conflicts
    #[serde(deserialize_with = "null_as_default")]
    pub mergeable: bool,

    /// Whether the pull request has been merged
    #[serde(deserialize_with = "null_as_default")]
    pub merged: bool,

    pub merged_at: Option<DateTime<Utc>>,
    pub merge_commit_sha: Option<String>,
    pub merged_by: Option<User>,
    #[serde(deserialize_with = "null_as_default")]
    pub base: Ref,
    #[serde(deserialize_with = "null_as_default")]
    pub head: Ref,
    #[serde(deserialize_with = "null_as_default")]
    pub merge_base: String,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
}

/// A label attached to a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Label {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub color: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

/// A reference to a specific commit in a repository (pull request head/base).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ref {
    #[serde(deserialize_with = "null_as_default")]
    pub label: String,
    #[serde(rename = "ref", deserialize_with = "null_as_default")]
    pub git_ref: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sha: String,
    #[serde(deserialize_with = "null_as_default")]
    pub repo_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub repo: Repository,
}

// ============================================================================
// Repositories and Users
// ============================================================================

/// A Gitea repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub owner: User,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,

    /// `owner/name`
    #[serde(deserialize_with = "null_as_default")]
    pub full_name: String,

    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub empty: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub private: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub fork: bool,
    pub parent: Option<Box<Repository>>,
    #[serde(deserialize_with = "null_as_default")]
    pub mirror: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub size: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub html_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ssh_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub clone_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub original_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub website: String,
    #[serde(deserialize_with = "null_as_default")]
    pub stars_count: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub forks_count: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub watchers_count: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub open_issues_count: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub default_branch: String,
    #[serde(deserialize_with = "null_as_default")]
    pub archived: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub permissions: RepositoryPermissions,
    #[serde(deserialize_with = "null_as_default")]
    pub has_issues: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub internal_tracker: RepositoryInternalTracker,
    #[serde(deserialize_with = "null_as_default")]
    pub has_wiki: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub has_pull_requests: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub ignore_whitespace_conflicts: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub allow_merge_commits: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub allow_rebase: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub allow_rebase_explicit: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub allow_squash_merge: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub avatar_url: String,
}

/// Permissions of the webhook's owner on a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryPermissions {
    #[serde(deserialize_with = "null_as_default")]
    pub admin: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub push: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub pull: bool,
}

/// Settings of the built-in issue tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryInternalTracker {
    #[serde(deserialize_with = "null_as_default")]
    pub enable_time_tracker: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub allow_only_contributors_to_track_time: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub enable_issue_dependencies: bool,
}

/// A Gitea user account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub login: String,
    #[serde(deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub avatar_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub language: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_admin: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
}

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;
