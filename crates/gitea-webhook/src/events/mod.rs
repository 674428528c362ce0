//! Gitea webhook event types and payload models.
//!
//! The event model has two halves:
//! - [`EventType`], the tag carried by the `X-Gitea-Event` header
//! - [`Event`], the decoded JSON body shared by all supported event types
//!
//! # Examples
//!
//! ```rust
//! use gitea_webhook::events::{Event, EventType};
//!
//! let event_type: EventType = "pull_request".parse().unwrap();
//! assert_eq!(event_type, EventType::PullRequest);
//! assert_eq!(event_type.to_string(), "pull request");
//!
//! let event = Event::from_slice(br#"{"number": 23}"#).unwrap();
//! assert_eq!(event.number, 23);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EventError;

pub mod models;

pub use models::{
    Commit, Event, GitUser, Label, PullRequest, Ref, Repository, RepositoryInternalTracker,
    RepositoryPermissions, User,
};

// ============================================================================
// Event Type
// ============================================================================

/// Wire name to event type table.
///
/// This is the single source of truth for which `X-Gitea-Event` values are
/// accepted. It is immutable and needs no synchronization.
const EVENT_TYPES: &[(&str, EventType)] = &[
    ("push", EventType::Push),
    ("pull_request", EventType::PullRequest),
];

/// The kind of webhook delivery, as named by the `X-Gitea-Event` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A branch or tag was pushed.
    Push,
    /// A pull request was opened, updated, closed, etc.
    PullRequest,
}

impl EventType {
    /// Resolve a wire event name.
    ///
    /// Names are matched exactly; anything outside the supported set is
    /// rejected rather than mapped to a default.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::UnsupportedEventType`] for unknown names.
    pub fn from_wire(name: &str) -> Result<Self, EventError> {
        EVENT_TYPES
            .iter()
            .find(|(wire, _)| *wire == name)
            .map(|(_, event_type)| *event_type)
            .ok_or_else(|| EventError::UnsupportedEventType {
                name: name.to_string(),
            })
    }

    /// The name used for this event type in the `X-Gitea-Event` header.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::PullRequest => "pull_request",
        }
    }

    /// All supported event types.
    pub fn all() -> impl Iterator<Item = EventType> {
        EVENT_TYPES.iter().map(|(_, event_type)| *event_type)
    }
}

impl FromStr for EventType {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire(s)
    }
}

/// Human-readable name, for logs and diagnostics only.
impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Push => "push",
            Self::PullRequest => "pull request",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
