// Moderation domain models - data structures for the event moderation run.
//
// These are pure domain types with no HTTP dependencies.
// The infra layer turns a `ModerationRequest` into an actual API call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of identifier characters shown in progress output.
pub const SHORT_ID_LEN: usize = 8;

/// What the remote API should do with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationAction {
    /// Publish the event on the calendar
    Approve,
    /// Archive the event (the API calls this "reject")
    Reject,
}

impl ModerationAction {
    /// Wire value sent in the `action` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationAction::Approve => "approve",
            ModerationAction::Reject => "reject",
        }
    }

    /// Present participle used while a request is in flight.
    pub fn verb(&self) -> &'static str {
        match self {
            ModerationAction::Approve => "Approving",
            ModerationAction::Reject => "Archiving",
        }
    }

    /// Label used once a request succeeded.
    pub fn outcome_label(&self) -> &'static str {
        match self {
            ModerationAction::Approve => "Approved",
            ModerationAction::Reject => "Archived",
        }
    }
}

impl std::fmt::Display for ModerationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// JSON body posted to the moderate-content endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModerationRequest<'a> {
    pub action: ModerationAction,
    #[serde(rename = "eventId")]
    pub event_id: &'a str,
}

/// Result of moderating a single event.
#[derive(Debug, Clone, PartialEq)]
pub struct ModerationOutcome {
    pub event_id: String,
    pub action: ModerationAction,
    pub succeeded: bool,
    /// Diagnostic for requests that errored. A 200 without `success: true` has none.
    pub error: Option<String>,
}

impl ModerationOutcome {
    pub fn succeeded(event_id: &str, action: ModerationAction) -> Self {
        Self {
            event_id: event_id.to_string(),
            action,
            succeeded: true,
            error: None,
        }
    }

    /// The API answered but did not report success.
    pub fn rejected(event_id: &str, action: ModerationAction) -> Self {
        Self {
            event_id: event_id.to_string(),
            action,
            succeeded: false,
            error: None,
        }
    }

    pub fn failed(event_id: &str, action: ModerationAction, reason: impl Into<String>) -> Self {
        Self {
            event_id: event_id.to_string(),
            action,
            succeeded: false,
            error: Some(reason.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.succeeded
    }
}

/// Totals for a whole run. Counts never exceed the size of their list.
#[derive(Debug, Clone)]
pub struct ModerationSummary {
    pub approved: usize,
    pub approve_total: usize,
    pub archived: usize,
    pub archive_total: usize,
    /// Every outcome that did not succeed, in the order it happened
    pub failures: Vec<ModerationOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ModerationSummary {
    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Shorten an identifier for display, cutting on a character boundary.
pub fn short_id(event_id: &str) -> &str {
    match event_id.char_indices().nth(SHORT_ID_LEN) {
        Some((idx, _)) => &event_id[..idx],
        None => event_id,
    }
}
