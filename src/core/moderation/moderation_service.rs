// Event moderation service - core business logic for a moderation run.
//
// This service handles:
// - Moderating a single event (approve or archive) through a `ModerationClient`
// - Running the approve list, then the archive list, one request at a time
// - Counting successes without ever stopping on a failed event
//
// NO HTTP dependencies here - the client is injected.

use super::moderation_models::{ModerationAction, ModerationOutcome, ModerationSummary};
use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("HTTP {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// ============================================================================
// CLIENT TRAIT (PORT)
// ============================================================================

/// Trait for talking to the remote moderation API.
#[async_trait]
pub trait ModerationClient: Send + Sync {
    /// Ask the API to apply `action` to `event_id`.
    ///
    /// `Ok(true)` only when the API accepted the request and reported success.
    async fn moderate(
        &self,
        event_id: &str,
        action: ModerationAction,
    ) -> Result<bool, ModerationError>;
}

/// Receives progress while a run is in flight.
///
/// All methods default to doing nothing.
pub trait ModerationReporter {
    fn section_started(&mut self, _action: ModerationAction, _total: usize) {}

    /// Called right before the request for `event_id` is sent.
    fn attempting(&mut self, _event_id: &str, _action: ModerationAction) {}

    fn finished(&mut self, _outcome: &ModerationOutcome) {}

    fn section_finished(&mut self, _action: ModerationAction, _succeeded: usize, _total: usize) {}
}

/// Reporter that drops every notification.
pub struct SilentReporter;

impl ModerationReporter for SilentReporter {}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct ModerationService<C: ModerationClient> {
    client: C,
}

impl<C: ModerationClient> ModerationService<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Moderate one event. Never fails: problems come back as a failed outcome.
    pub async fn moderate(&self, event_id: &str, action: ModerationAction) -> ModerationOutcome {
        if event_id.trim().is_empty() {
            let err = ModerationError::InvalidRequest("event id is empty".to_string());
            tracing::warn!(action = %action, "Skipping moderation: {}", err);
            return ModerationOutcome::failed(event_id, action, err.to_string());
        }

        match self.client.moderate(event_id, action).await {
            Ok(true) => {
                tracing::debug!(event_id, action = %action, "Moderation accepted");
                ModerationOutcome::succeeded(event_id, action)
            }
            Ok(false) => {
                tracing::warn!(event_id, action = %action, "API did not report success");
                ModerationOutcome::rejected(event_id, action)
            }
            Err(e) => {
                tracing::warn!(event_id, action = %action, "Moderation failed: {}", e);
                ModerationOutcome::failed(event_id, action, e.to_string())
            }
        }
    }

    /// Approve every id in `approve_ids`, then archive every id in `archive_ids`.
    ///
    /// Requests are strictly sequential and a failure never stops the run.
    pub async fn run_all<R>(
        &self,
        approve_ids: &[String],
        archive_ids: &[String],
        reporter: &mut R,
    ) -> ModerationSummary
    where
        R: ModerationReporter + ?Sized,
    {
        let started_at = Utc::now();
        tracing::info!(
            approve = approve_ids.len(),
            archive = archive_ids.len(),
            "Starting moderation run"
        );

        let mut failures = Vec::new();
        let approved = self
            .run_list(approve_ids, ModerationAction::Approve, reporter, &mut failures)
            .await;
        let archived = self
            .run_list(archive_ids, ModerationAction::Reject, reporter, &mut failures)
            .await;

        let summary = ModerationSummary {
            approved,
            approve_total: approve_ids.len(),
            archived,
            archive_total: archive_ids.len(),
            failures,
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            approved = summary.approved,
            archived = summary.archived,
            failed = summary.failed_count(),
            elapsed_ms = summary.elapsed().num_milliseconds(),
            "Moderation run finished"
        );

        summary
    }

    async fn run_list<R>(
        &self,
        ids: &[String],
        action: ModerationAction,
        reporter: &mut R,
        failures: &mut Vec<ModerationOutcome>,
    ) -> usize
    where
        R: ModerationReporter + ?Sized,
    {
        reporter.section_started(action, ids.len());

        let mut succeeded = 0;
        for event_id in ids {
            reporter.attempting(event_id, action);
            let outcome = self.moderate(event_id, action).await;
            reporter.finished(&outcome);

            if outcome.is_success() {
                succeeded += 1;
            } else {
                failures.push(outcome);
            }
        }

        reporter.section_finished(action, succeeded, ids.len());
        succeeded
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use dashmap::DashMap;
    use std::sync::Mutex;

    /// Scripted in-memory client for testing. Unknown ids succeed.
    struct MockModerationClient {
        responses: DashMap<String, Result<bool, u16>>,
        calls: Mutex<Vec<(String, ModerationAction)>>,
    }

    impl MockModerationClient {
        fn new() -> Self {
            Self {
                responses: DashMap::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn respond(self, event_id: &str, response: Result<bool, u16>) -> Self {
            self.responses.insert(event_id.to_string(), response);
            self
        }
    }

    #[async_trait]
    impl ModerationClient for MockModerationClient {
        async fn moderate(
            &self,
            event_id: &str,
            action: ModerationAction,
        ) -> Result<bool, ModerationError> {
            self.calls
                .lock()
                .unwrap()
                .push((event_id.to_string(), action));

            match self.responses.get(event_id).map(|r| *r) {
                None | Some(Ok(true)) => Ok(true),
                Some(Ok(false)) => Ok(false),
                Some(Err(0)) => Err(ModerationError::Transport("connection refused".to_string())),
                Some(Err(status)) => Err(ModerationError::Status {
                    status,
                    body: "boom".to_string(),
                }),
            }
        }
    }

    #[derive(Default)]
    struct RecordingReporter {
        events: Vec<String>,
    }

    impl ModerationReporter for RecordingReporter {
        fn section_started(&mut self, action: ModerationAction, total: usize) {
            self.events.push(format!("start {} {}", action, total));
        }

        fn attempting(&mut self, event_id: &str, action: ModerationAction) {
            self.events.push(format!("try {} {}", action, event_id));
        }

        fn finished(&mut self, outcome: &ModerationOutcome) {
            self.events
                .push(format!("done {} {}", outcome.event_id, outcome.is_success()));
        }

        fn section_finished(&mut self, action: ModerationAction, succeeded: usize, total: usize) {
            self.events
                .push(format!("end {} {}/{}", action, succeeded, total));
        }
    }

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_all_requests_succeed() {
        let service = ModerationService::new(MockModerationClient::new());

        let summary = service
            .run_all(&ids(&["a", "b", "c"]), &ids(&["x", "y"]), &mut SilentReporter)
            .await;

        assert_eq!(summary.approved, 3);
        assert_eq!(summary.approve_total, 3);
        assert_eq!(summary.archived, 2);
        assert_eq!(summary.archive_total, 2);
        assert!(summary.failures.is_empty());
    }

    #[tokio::test]
    async fn test_success_false_is_not_counted() {
        let client = MockModerationClient::new().respond("b", Ok(false));
        let service = ModerationService::new(client);

        let summary = service
            .run_all(&ids(&["a", "b"]), &[], &mut SilentReporter)
            .await;

        assert_eq!(summary.approved, 1);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].event_id, "b");
        assert_eq!(summary.failures[0].error, None);
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_run() {
        let client = MockModerationClient::new()
            .respond("a", Err(0))
            .respond("x", Err(500));
        let service = ModerationService::new(client);

        let summary = service
            .run_all(&ids(&["a", "b"]), &ids(&["x", "y", "z"]), &mut SilentReporter)
            .await;

        // Every id was attempted despite the early failures
        let calls = service.client.calls.lock().unwrap().len();
        assert_eq!(calls, 5);

        assert_eq!(summary.approved, 1);
        assert_eq!(summary.archived, 2);
        assert_eq!(summary.failed_count(), 2);
        assert_eq!(
            summary.failures[1].error.as_deref(),
            Some("HTTP 500 - boom")
        );
    }

    #[tokio::test]
    async fn test_approvals_run_before_archivals() {
        let service = ModerationService::new(MockModerationClient::new());

        service
            .run_all(&ids(&["a1", "a2"]), &ids(&["r1", "r2"]), &mut SilentReporter)
            .await;

        let calls = service.client.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                ("a1".to_string(), ModerationAction::Approve),
                ("a2".to_string(), ModerationAction::Approve),
                ("r1".to_string(), ModerationAction::Reject),
                ("r2".to_string(), ModerationAction::Reject),
            ]
        );
    }

    #[tokio::test]
    async fn test_reporter_sees_each_step_in_order() {
        let client = MockModerationClient::new().respond("r1", Ok(false));
        let service = ModerationService::new(client);
        let mut reporter = RecordingReporter::default();

        service
            .run_all(&ids(&["a1"]), &ids(&["r1"]), &mut reporter)
            .await;

        assert_eq!(
            reporter.events,
            vec![
                "start approve 1",
                "try approve a1",
                "done a1 true",
                "end approve 1/1",
                "start reject 1",
                "try reject r1",
                "done r1 false",
                "end reject 0/1",
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_id_is_rejected_without_a_request() {
        let service = ModerationService::new(MockModerationClient::new());

        let outcome = service.moderate("  ", ModerationAction::Approve).await;

        assert!(!outcome.is_success());
        assert!(service.client.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_counts_stay_within_list_bounds() {
        let client = MockModerationClient::new()
            .respond("a2", Err(404))
            .respond("a4", Ok(false))
            .respond("r1", Err(0))
            .respond("r3", Err(503));
        let service = ModerationService::new(client);
        let approve = ids(&["a1", "a2", "a3", "a4"]);
        let archive = ids(&["r1", "r2", "r3"]);

        let summary = service
            .run_all(&approve, &archive, &mut SilentReporter)
            .await;

        assert!(summary.approved <= approve.len());
        assert!(summary.archived <= archive.len());
        assert_eq!(summary.approved, 2);
        assert_eq!(summary.archived, 1);
        assert_eq!(
            summary.approved + summary.archived + summary.failed_count(),
            approve.len() + archive.len()
        );
    }

    #[tokio::test]
    async fn test_empty_lists_produce_zero_counts() {
        let service = ModerationService::new(MockModerationClient::new());

        let summary = service.run_all(&[], &[], &mut SilentReporter).await;

        assert_eq!(summary.approved, 0);
        assert_eq!(summary.archive_total, 0);
        assert!(summary.finished_at >= summary.started_at);
    }
}
