//! Remote password reset orchestrator
//!
//! Two-state flow:
//!
//! ```text
//! ATTEMPTING_BULK --ok--> DONE
//!        |
//!      error
//!        v
//! ATTEMPTING_PER_USER --> DONE
//! ```
//!
//! The bulk path asks the remote function to reset everything at once. Any
//! failure there (status, transport, timeout, bad body) triggers the per-user
//! fallback: list users, then update each one. Per-user updates are
//! best-effort; one failure never stops the others.

use futures_util::stream::{self, StreamExt};
use redact::Secret;
use std::io::Write;
use std::pin::pin;
use tracing::{debug, info, warn};

use crate::auth_admin::{AuthAdmin, BulkResetResponse, CallError, ListedUser};
use crate::utils::console::Console;
use crate::utils::constants::{EXIT_FAILURE, EXIT_PARTIAL, EXIT_SUCCESS, MISSING_EMAIL};

/// What to reset and how
#[derive(Debug, Clone)]
pub struct ResetPlan {
    /// Password every user is reset to
    pub new_password: Secret<String>,
    /// Per-user updates in flight at once (1 = strictly sequential)
    pub concurrency: usize,
}

/// Result of a single per-user update
#[derive(Debug)]
pub struct UserOutcome {
    pub user: ListedUser,
    pub error: Option<CallError>,
}

impl UserOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Tally of the per-user fallback
///
/// `succeeded + failed` always equals the number of outcomes recorded.
#[derive(Debug, Default)]
pub struct OperationResult {
    succeeded: usize,
    failed: usize,
    outcomes: Vec<UserOutcome>,
}

impl OperationResult {
    pub fn record(&mut self, user: ListedUser, result: Result<(), CallError>) {
        match result {
            Ok(()) => {
                self.succeeded += 1;
                self.outcomes.push(UserOutcome { user, error: None });
            }
            Err(error) => {
                self.failed += 1;
                self.outcomes.push(UserOutcome {
                    user,
                    error: Some(error),
                });
            }
        }
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn failed_emails(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| !o.succeeded())
            .map(|o| o.user.display_email())
            .collect()
    }
}

/// Overall status, mapped to the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    Partial,
    Failure,
}

impl RunStatus {
    pub fn from_counts(succeeded: u64, failed: u64) -> Self {
        match (succeeded, failed) {
            (_, 0) => RunStatus::Success,
            (0, _) => RunStatus::Failure,
            _ => RunStatus::Partial,
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            RunStatus::Success => EXIT_SUCCESS,
            RunStatus::Partial => EXIT_PARTIAL,
            RunStatus::Failure => EXIT_FAILURE,
        }
    }
}

/// How a run concluded
#[derive(Debug)]
pub enum RunOutcome {
    /// The bulk function answered with 200
    Bulk { response: BulkResetResponse },
    /// Bulk failed; users were listed and updated one by one
    PerUser {
        bulk_error: CallError,
        result: OperationResult,
    },
    /// Bulk failed and users could not be listed
    Failed {
        bulk_error: CallError,
        list_error: CallError,
    },
}

impl RunOutcome {
    pub fn status(&self) -> RunStatus {
        match self {
            RunOutcome::Bulk { response } => {
                let summary = &response.summary;
                match (summary.success, summary.failed) {
                    (Some(succeeded), Some(failed)) => RunStatus::from_counts(succeeded, failed),
                    _ => RunStatus::Success,
                }
            }
            RunOutcome::PerUser { result, .. } => {
                RunStatus::from_counts(result.succeeded() as u64, result.failed() as u64)
            }
            RunOutcome::Failed { .. } => RunStatus::Failure,
        }
    }
}

/// Drives the bulk attempt and the per-user fallback
pub struct Orchestrator<A> {
    admin: A,
    plan: ResetPlan,
}

impl<A: AuthAdmin> Orchestrator<A> {
    pub fn new(admin: A, plan: ResetPlan) -> Self {
        Self { admin, plan }
    }

    #[cfg(test)]
    pub fn admin(&self) -> &A {
        &self.admin
    }

    /// Run the whole reset, narrating progress on `console`
    pub async fn run<W: Write>(&self, console: &mut Console<W>) -> RunOutcome {
        let outcome = match self.try_bulk(console).await {
            Ok(response) => RunOutcome::Bulk { response },
            Err(bulk_error) => {
                console.blank();
                console.progress("Falling back to per-user updates...");
                match self.try_per_user(console).await {
                    Ok(result) => RunOutcome::PerUser { bulk_error, result },
                    Err(list_error) => RunOutcome::Failed {
                        bulk_error,
                        list_error,
                    },
                }
            }
        };

        report(&outcome, console);
        outcome
    }

    async fn try_bulk<W: Write>(
        &self,
        console: &mut Console<W>,
    ) -> Result<BulkResetResponse, CallError> {
        console.progress("Calling the bulk reset function...");

        match self.admin.bulk_reset().await {
            Ok(response) => {
                match &response.summary.message {
                    Some(message) => info!("Bulk reset succeeded: {}", message),
                    None => info!("Bulk reset succeeded"),
                }
                console.ok("Bulk reset succeeded:");
                let pretty = serde_json::to_string_pretty(&response.body)
                    .unwrap_or_else(|_| response.body.to_string());
                console.line(pretty);
                Ok(response)
            }
            Err(e) => {
                warn!(kind = e.kind(), "Bulk reset failed: {}", e);
                console.fail(format_args!("Bulk reset failed: {}", e));
                Err(e)
            }
        }
    }

    async fn try_per_user<W: Write>(
        &self,
        console: &mut Console<W>,
    ) -> Result<OperationResult, CallError> {
        let users = match self.admin.list_users().await {
            Ok(users) => users,
            Err(e) => {
                warn!(kind = e.kind(), "Failed to list users: {}", e);
                console.fail(format_args!("Failed to list users: {}", e));
                return Err(e);
            }
        };

        info!("Found {} users", users.len());
        console.ok(format_args!("Found {} users", users.len()));

        let admin = &self.admin;
        let password = self.plan.new_password.expose_secret().as_str();

        // `buffered` keeps list order even when several updates are in flight
        let mut updates = pin!(stream::iter(users)
            .map(|user| async move {
                let result = match &user {
                    ListedUser::Valid(valid) => admin.update_password(&valid.id, password).await,
                    // Nothing to address the update to
                    ListedUser::Malformed { reason, record, .. } => Err(CallError::Decode {
                        reason: reason.clone(),
                        body: record.clone(),
                    }),
                };
                (user, result)
            })
            .buffered(self.plan.concurrency.max(1)));

        let mut result = OperationResult::default();
        while let Some((user, outcome)) = updates.next().await {
            let user_id = user.id().unwrap_or("-");
            match &outcome {
                Ok(()) => {
                    info!(user_id, "Password updated");
                    console.ok(format_args!("Password updated for {}", user.display_email()));
                }
                Err(e) => {
                    warn!(user_id, kind = e.kind(), "Password update failed: {}", e);
                    console.fail(format_args!(
                        "Failed to update {}: {}",
                        user.display_email(),
                        e
                    ));
                }
            }
            result.record(user, outcome);
        }

        Ok(result)
    }
}

/// Final tally plus remediation on total failure
fn report<W: Write>(outcome: &RunOutcome, console: &mut Console<W>) {
    console.blank();

    match outcome {
        RunOutcome::Bulk { response } => {
            let summary = &response.summary;
            match (summary.success, summary.failed) {
                (Some(succeeded), Some(failed)) => console.tally(format_args!(
                    "Result: {} succeeded, {} failed of {} users (bulk reset)",
                    succeeded,
                    failed,
                    summary.total.unwrap_or_else(|| succeeded.saturating_add(failed))
                )),
                _ => console.tally("Result: bulk reset completed"),
            }
            if let Some(results) = &summary.results {
                debug!("Bulk reset reported {} updated users", results.success.len());
                for failure in &results.failed {
                    console.fail(format_args!(
                        "Failed to update {}: {}",
                        failure.email.as_deref().unwrap_or(MISSING_EMAIL),
                        failure.error.as_deref().unwrap_or("unknown error")
                    ));
                }
            }
        }
        RunOutcome::PerUser { bulk_error, result } => {
            debug!(bulk_error = %bulk_error, "Per-user fallback finished");
            console.tally(format_args!(
                "Result: {} succeeded, {} failed ({} users attempted)",
                result.succeeded(),
                result.failed(),
                result.attempted()
            ));
            let failed = result.failed_emails();
            if !failed.is_empty() {
                console.fail(format_args!("Failed users: {}", failed.join(", ")));
            }
        }
        RunOutcome::Failed {
            bulk_error,
            list_error,
        } => {
            console.tally("Result: 0 succeeded, 0 failed");
            console.fail(format_args!("Bulk reset: {}", bulk_error));
            console.fail(format_args!("List users: {}", list_error));
        }
    }

    if outcome.status() == RunStatus::Failure {
        console.blank();
        console.fail("Could not reset passwords with the available credentials.");
        console.remediation();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth_admin::{BulkResetSummary, User};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Scripted stand-in for the auth service
    struct FakeAdmin {
        bulk: Result<BulkResetResponse, CallError>,
        list: Result<Vec<ListedUser>, CallError>,
        failing: HashMap<String, CallError>,
        bulk_calls: AtomicUsize,
        list_calls: AtomicUsize,
        updates: Mutex<Vec<(String, String)>>,
    }

    impl FakeAdmin {
        fn new(
            bulk: Result<BulkResetResponse, CallError>,
            list: Result<Vec<ListedUser>, CallError>,
        ) -> Self {
            Self {
                bulk,
                list,
                failing: HashMap::new(),
                bulk_calls: AtomicUsize::new(0),
                list_calls: AtomicUsize::new(0),
                updates: Mutex::new(Vec::new()),
            }
        }

        fn failing(mut self, user_id: &str, error: CallError) -> Self {
            self.failing.insert(user_id.to_string(), error);
            self
        }

        fn bulk_calls(&self) -> usize {
            self.bulk_calls.load(Ordering::SeqCst)
        }

        fn list_calls(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }

        fn updated_ids(&self) -> Vec<String> {
            let mut ids: Vec<String> = self
                .updates
                .lock()
                .unwrap()
                .iter()
                .map(|(id, _)| id.clone())
                .collect();
            ids.sort();
            ids
        }
    }

    impl AuthAdmin for FakeAdmin {
        async fn bulk_reset(&self) -> Result<BulkResetResponse, CallError> {
            self.bulk_calls.fetch_add(1, Ordering::SeqCst);
            self.bulk.clone()
        }

        async fn list_users(&self) -> Result<Vec<ListedUser>, CallError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            self.list.clone()
        }

        async fn update_password(&self, user_id: &str, password: &str) -> Result<(), CallError> {
            self.updates
                .lock()
                .unwrap()
                .push((user_id.to_string(), password.to_string()));
            // Let other in-flight updates interleave
            tokio::task::yield_now().await;
            match self.failing.get(user_id) {
                Some(error) => Err(error.clone()),
                None => Ok(()),
            }
        }
    }

    fn plan(concurrency: usize) -> ResetPlan {
        ResetPlan {
            new_password: Secret::from("n3w-Passw0rd".to_string()),
            concurrency,
        }
    }

    fn user(id: &str, email: &str) -> ListedUser {
        ListedUser::Valid(User {
            id: id.to_string(),
            email: Some(email.to_string()),
        })
    }

    fn malformed(email: Option<&str>) -> ListedUser {
        let record = match email {
            Some(email) => json!({ "email": email }),
            None => json!({}),
        };
        ListedUser::Malformed {
            email: email.map(str::to_string),
            reason: "missing or non-string user id".to_string(),
            record: record.to_string(),
        }
    }

    fn users(n: usize) -> Vec<ListedUser> {
        (0..n)
            .map(|i| user(&format!("u{}", i), &format!("user{}@x.com", i)))
            .collect()
    }

    fn status(code: u16) -> CallError {
        CallError::Status {
            status: code,
            body: format!("{{\"code\":{}}}", code),
        }
    }

    async fn run(orchestrator: &Orchestrator<FakeAdmin>) -> (RunOutcome, String) {
        let mut console = Console::new(Vec::new());
        let outcome = orchestrator.run(&mut console).await;
        let output = String::from_utf8(console.into_inner()).unwrap();
        (outcome, output)
    }

    #[test]
    fn test_operation_result_counts() {
        let mut result = OperationResult::default();
        result.record(user("u1", "a@x.com"), Ok(()));
        result.record(user("u2", "b@x.com"), Err(status(403)));
        result.record(user("u3", "c@x.com"), Ok(()));

        assert_eq!(result.succeeded(), 2);
        assert_eq!(result.failed(), 1);
        assert_eq!(result.attempted(), 3);
        assert_eq!(result.succeeded() + result.failed(), result.attempted());
        assert_eq!(result.failed_emails(), vec!["b@x.com"]);
    }

    #[test]
    fn test_status_from_counts() {
        assert_eq!(RunStatus::from_counts(5, 0), RunStatus::Success);
        assert_eq!(RunStatus::from_counts(0, 0), RunStatus::Success);
        assert_eq!(RunStatus::from_counts(3, 2), RunStatus::Partial);
        assert_eq!(RunStatus::from_counts(0, 2), RunStatus::Failure);

        assert_eq!(RunStatus::Success.exit_code(), 0);
        assert_eq!(RunStatus::Partial.exit_code(), 1);
        assert_eq!(RunStatus::Failure.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_bulk_success_skips_fallback() {
        let admin = FakeAdmin::new(
            Ok(BulkResetResponse::from_body(json!({"reset": 42}))),
            Ok(users(3)),
        );
        let orchestrator = Orchestrator::new(admin, plan(1));

        let (outcome, output) = run(&orchestrator).await;

        assert!(matches!(outcome, RunOutcome::Bulk { .. }));
        assert_eq!(outcome.status(), RunStatus::Success);
        assert_eq!(orchestrator.admin().bulk_calls(), 1);
        assert_eq!(orchestrator.admin().list_calls(), 0);
        assert!(orchestrator.admin().updated_ids().is_empty());
        assert!(output.contains("\"reset\": 42"));
        assert!(!output.contains("Next steps"));
    }

    #[tokio::test]
    async fn test_bulk_failure_invokes_fallback_once() {
        let failures = vec![
            status(401),
            status(500),
            CallError::Transport("connection refused".to_string()),
            CallError::Timeout(Duration::from_secs(30)),
            CallError::Decode {
                reason: "expected value".to_string(),
                body: "oops".to_string(),
            },
        ];

        for failure in failures {
            let admin = FakeAdmin::new(Err(failure.clone()), Ok(users(2)));
            let orchestrator = Orchestrator::new(admin, plan(1));

            let (outcome, _) = run(&orchestrator).await;

            assert_eq!(orchestrator.admin().list_calls(), 1, "for {:?}", failure);
            match outcome {
                RunOutcome::PerUser { bulk_error, result } => {
                    assert_eq!(bulk_error, failure);
                    assert_eq!(result.succeeded(), 2);
                }
                other => panic!("expected per-user outcome, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_list_failure_is_total_failure() {
        let admin = FakeAdmin::new(Err(status(401)), Err(status(403)));
        let orchestrator = Orchestrator::new(admin, plan(1));

        let (outcome, output) = run(&orchestrator).await;

        assert!(matches!(outcome, RunOutcome::Failed { .. }));
        assert_eq!(outcome.status(), RunStatus::Failure);
        assert_eq!(outcome.status().exit_code(), 2);
        assert!(orchestrator.admin().updated_ids().is_empty());
        assert!(output.contains("Failed to list users: HTTP 403"));
        assert!(output.contains("Next steps:"));
    }

    #[tokio::test]
    async fn test_partial_failures_do_not_abort() {
        let admin = FakeAdmin::new(Err(status(401)), Ok(users(6)))
            .failing("u0", status(403))
            .failing("u3", CallError::Transport("reset by peer".to_string()))
            .failing("u5", CallError::Timeout(Duration::from_secs(30)));
        let orchestrator = Orchestrator::new(admin, plan(1));

        let (outcome, output) = run(&orchestrator).await;

        let RunOutcome::PerUser { result, .. } = &outcome else {
            panic!("expected per-user outcome, got {:?}", outcome);
        };
        assert_eq!(result.succeeded(), 3);
        assert_eq!(result.failed(), 3);
        assert_eq!(result.attempted(), 6);
        assert_eq!(orchestrator.admin().updated_ids().len(), 6);
        assert_eq!(outcome.status(), RunStatus::Partial);
        assert!(output.contains("Result: 3 succeeded, 3 failed"));
        assert!(!output.contains("Next steps"));
    }

    #[tokio::test]
    async fn test_fallback_scenario() {
        let admin = FakeAdmin::new(
            Err(status(401)),
            Ok(vec![user("u1", "a@x.com"), user("u2", "b@x.com")]),
        )
        .failing("u2", status(403));
        let orchestrator = Orchestrator::new(admin, plan(1));

        let (outcome, output) = run(&orchestrator).await;

        let RunOutcome::PerUser { result, .. } = &outcome else {
            panic!("expected per-user outcome, got {:?}", outcome);
        };
        assert_eq!(result.succeeded(), 1);
        assert_eq!(result.failed(), 1);
        assert_eq!(result.failed_emails(), vec!["b@x.com"]);
        assert!(output.contains("✅ Password updated for a@x.com"));
        assert!(output.contains("❌ Failed to update b@x.com: HTTP 403"));
        assert!(output.contains("Result: 1 succeeded, 1 failed"));
        assert!(output.contains("Failed users: b@x.com"));
    }

    #[tokio::test]
    async fn test_new_password_sent_to_every_user() {
        let admin = FakeAdmin::new(Err(status(500)), Ok(users(3)));
        let orchestrator = Orchestrator::new(admin, plan(1));

        run(&orchestrator).await;

        let updates = orchestrator.admin().updates.lock().unwrap();
        assert_eq!(updates.len(), 3);
        assert!(updates.iter().all(|(_, pw)| pw == "n3w-Passw0rd"));
    }

    #[tokio::test]
    async fn test_run_is_repeatable() {
        let admin = FakeAdmin::new(
            Ok(BulkResetResponse::from_body(json!({"reset": 42}))),
            Ok(users(2)),
        );
        let orchestrator = Orchestrator::new(admin, plan(1));

        let (first, first_output) = run(&orchestrator).await;
        let (second, second_output) = run(&orchestrator).await;

        assert_eq!(first.status(), RunStatus::Success);
        assert_eq!(second.status(), RunStatus::Success);
        assert_eq!(first_output, second_output);
        assert_eq!(orchestrator.admin().list_calls(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_updates_keep_order() {
        let admin = FakeAdmin::new(Err(status(401)), Ok(users(10)))
            .failing("u2", status(403))
            .failing("u7", status(500));
        let orchestrator = Orchestrator::new(admin, plan(4));

        let (outcome, _) = run(&orchestrator).await;

        let RunOutcome::PerUser { result, .. } = &outcome else {
            panic!("expected per-user outcome, got {:?}", outcome);
        };
        assert_eq!(result.attempted(), 10);
        assert_eq!(result.succeeded(), 8);
        assert_eq!(result.failed(), 2);

        let ids: Vec<&str> = result.outcomes.iter().filter_map(|o| o.user.id()).collect();
        let expected: Vec<String> = (0..10).map(|i| format!("u{}", i)).collect();
        assert_eq!(ids, expected.iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(result.failed_emails(), vec!["user2@x.com", "user7@x.com"]);
    }

    #[tokio::test]
    async fn test_every_update_failing_is_total_failure() {
        let admin = FakeAdmin::new(Err(status(401)), Ok(vec![user("u1", "a@x.com")]))
            .failing("u1", status(403));
        let orchestrator = Orchestrator::new(admin, plan(1));

        let (outcome, output) = run(&orchestrator).await;

        assert_eq!(outcome.status(), RunStatus::Failure);
        assert!(output.contains("Next steps:"));
    }

    #[tokio::test]
    async fn test_no_users_is_success() {
        let admin = FakeAdmin::new(Err(status(401)), Ok(Vec::new()));
        let orchestrator = Orchestrator::new(admin, plan(1));

        let (outcome, output) = run(&orchestrator).await;

        assert_eq!(outcome.status(), RunStatus::Success);
        assert!(output.contains("Found 0 users"));
        assert!(output.contains("Result: 0 succeeded, 0 failed"));
    }

    #[tokio::test]
    async fn test_bulk_summary_counts_drive_status() {
        let body = json!({
            "message": "Password reset completed",
            "total": 3,
            "success": 2,
            "failed": 1,
            "results": {
                "success": ["a@x.com", "b@x.com"],
                "failed": [{"email": "c@x.com", "error": "User not found"}]
            }
        });
        let admin = FakeAdmin::new(Ok(BulkResetResponse::from_body(body)), Ok(Vec::new()));
        let orchestrator = Orchestrator::new(admin, plan(1));

        let (outcome, output) = run(&orchestrator).await;

        assert_eq!(outcome.status(), RunStatus::Partial);
        assert_eq!(orchestrator.admin().list_calls(), 0);
        assert!(output.contains("Result: 2 succeeded, 1 failed of 3 users (bulk reset)"));
        assert!(output.contains("Failed to update c@x.com: User not found"));
    }

    #[tokio::test]
    async fn test_bad_list_records_count_as_failures() {
        let listed = vec![
            user("u1", "a@x.com"),
            malformed(Some("noid@x.com")),
            user("u2", "b@x.com"),
            malformed(None),
            user("u3", "c@x.com"),
        ];
        let admin = FakeAdmin::new(Err(status(401)), Ok(listed));
        let orchestrator = Orchestrator::new(admin, plan(2));

        let (outcome, output) = run(&orchestrator).await;

        let RunOutcome::PerUser { result, .. } = &outcome else {
            panic!("expected per-user outcome, got {:?}", outcome);
        };
        assert_eq!(result.attempted(), 5);
        assert_eq!(result.succeeded(), 3);
        assert_eq!(result.failed(), 2);
        assert_eq!(result.failed_emails(), vec!["noid@x.com", "N/A"]);
        assert!(matches!(
            result.outcomes[1].error,
            Some(CallError::Decode { .. })
        ));

        // Only records with an id reach the update endpoint
        assert_eq!(orchestrator.admin().updated_ids(), vec!["u1", "u2", "u3"]);
        assert_eq!(outcome.status(), RunStatus::Partial);
        assert!(output.contains("Found 5 users"));
        assert!(output.contains("❌ Failed to update noid@x.com: invalid response body"));
        assert!(output.contains("❌ Failed to update N/A: invalid response body"));
        assert!(output.contains("Result: 3 succeeded, 2 failed (5 users attempted)"));
        assert!(output.contains("Failed users: noid@x.com, N/A"));
    }

    #[tokio::test]
    async fn test_only_bad_list_records_is_total_failure() {
        let admin = FakeAdmin::new(Err(status(401)), Ok(vec![malformed(None)]));
        let orchestrator = Orchestrator::new(admin, plan(1));

        let (outcome, output) = run(&orchestrator).await;

        assert_eq!(outcome.status(), RunStatus::Failure);
        assert!(orchestrator.admin().updated_ids().is_empty());
        assert!(output.contains("Next steps:"));
    }

    #[test]
    fn test_bulk_report_with_huge_counts() {
        let outcome = RunOutcome::Bulk {
            response: BulkResetResponse::from_body(json!({
                "total": 3,
                "success": u64::MAX,
                "failed": 1
            })),
        };
        let mut console = Console::new(Vec::new());
        report(&outcome, &mut console);
        let output = String::from_utf8(console.into_inner()).unwrap();

        assert_eq!(outcome.status(), RunStatus::Partial);
        assert!(output.contains(&format!(
            "Result: {} succeeded, 1 failed of 3 users (bulk reset)",
            u64::MAX
        )));

        // Without a total the sum saturates instead of overflowing
        let outcome = RunOutcome::Bulk {
            response: BulkResetResponse::from_body(json!({
                "success": u64::MAX,
                "failed": 1
            })),
        };
        let mut console = Console::new(Vec::new());
        report(&outcome, &mut console);
        let output = String::from_utf8(console.into_inner()).unwrap();

        assert!(output.contains(&format!(
            "Result: {} succeeded, 1 failed of {} users (bulk reset)",
            u64::MAX,
            u64::MAX
        )));
    }

    #[test]
    fn test_bulk_without_counts_is_success() {
        let outcome = RunOutcome::Bulk {
            response: BulkResetResponse {
                body: json!({"ok": true}),
                summary: BulkResetSummary::default(),
            },
        };
        assert_eq!(outcome.status(), RunStatus::Success);
    }
}
