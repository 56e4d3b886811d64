//! Per-session submission state machine.
//!
//! ```text
//! Idle --submit--> Processing --ok--> Submitted (terminal)
//!                      |
//!                      +--any failure--> Idle
//! ```

use crate::admin::AdminGate;
use crate::client::RegistrationClient;
use crate::clock::Clock;
use crate::error::RegistrationError;
use crate::messages;
use crate::plate::PlateValidator;
use crate::policy::OperatingWindowPolicy;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};
use vreg_domain::model::{RegistrationRequest, SubmissionState};

/// Result of a submit call that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted { confirmation: String },
    /// Nothing happened: another submission is in flight or the session already submitted.
    Ignored { state: SubmissionState, notice: &'static str },
}

/// Owns the submission state and admin flag of one form session.
#[derive(Debug)]
pub struct SubmissionController<C, K> {
    client: Arc<C>,
    policy: Arc<OperatingWindowPolicy>,
    clock: K,
    admin: AdminGate,
    state: Mutex<SubmissionState>,
}

/// Returns the state to `Idle` on drop unless committed.
///
/// Covers early returns, errors and a dropped (cancelled) submit future alike.
struct ProcessingGuard<'a> {
    state: &'a Mutex<SubmissionState>,
    committed: bool,
}

impl<'a> ProcessingGuard<'a> {
    const fn new(state: &'a Mutex<SubmissionState>) -> Self {
        Self { state, committed: false }
    }

    fn commit(mut self) {
        *self.state.lock() = SubmissionState::Submitted;
        self.committed = true;
        debug!("Submission state: Processing -> Submitted");
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        if !self.committed {
            *self.state.lock() = SubmissionState::Idle;
            debug!("Submission state: Processing -> Idle");
        }
    }
}

impl<C: RegistrationClient, K: Clock> SubmissionController<C, K> {
    #[must_use]
    pub fn new(
        client: Arc<C>,
        policy: Arc<OperatingWindowPolicy>,
        clock: K,
        admin_secret: Arc<str>,
    ) -> Self {
        Self {
            client,
            policy,
            clock,
            admin: AdminGate::new(admin_secret),
            state: Mutex::new(SubmissionState::Idle),
        }
    }

    #[must_use]
    pub fn state(&self) -> SubmissionState {
        *self.state.lock()
    }

    #[must_use]
    pub const fn admin(&self) -> &AdminGate {
        &self.admin
    }

    #[must_use]
    pub fn policy(&self) -> &OperatingWindowPolicy {
        &self.policy
    }

    /// Whether the form fields may be shown right now.
    #[must_use]
    pub fn is_form_open(&self) -> bool {
        self.admin.is_active() || self.policy.is_open(&self.clock.now())
    }

    /// Runs one registration attempt.
    ///
    /// Checks, in order: session state (a busy or finished session ignores the call), both
    /// fields present, plate format, operating window. Only then is the duplicate check sent,
    /// followed by the submit call.
    ///
    /// Both fields are trimmed first: a whitespace-only name counts as missing, and the name
    /// is sent without surrounding whitespace.
    ///
    /// # Errors
    /// `Input`, `Policy` before any network call; `Duplicate`, `Remote`, `Transport` or
    /// `Decode` from the remote steps. The state is back to `Idle` after every error.
    pub async fn submit(
        &self,
        name: &str,
        car_number: &str,
    ) -> Result<SubmitOutcome, RegistrationError> {
        let (name, plate) = {
            let mut state = self.state.lock();
            match *state {
                SubmissionState::Idle => {},
                SubmissionState::Processing => {
                    debug!("Submit ignored, a submission is already in flight");
                    return Ok(SubmitOutcome::Ignored {
                        state: SubmissionState::Processing,
                        notice: messages::IN_PROGRESS,
                    });
                },
                SubmissionState::Submitted => {
                    debug!("Submit ignored, session already submitted");
                    return Ok(SubmitOutcome::Ignored {
                        state: SubmissionState::Submitted,
                        notice: messages::ALREADY_SUBMITTED,
                    });
                },
            }

            let name = name.trim();
            if name.is_empty() || car_number.trim().is_empty() {
                return Err(RegistrationError::input(messages::FILL_ALL_FIELDS));
            }

            let validation = PlateValidator::validate(car_number);
            if !validation.valid {
                return Err(RegistrationError::input(validation.message));
            }

            if !self.is_form_open() {
                return Err(RegistrationError::Policy {
                    message: self.policy.closed_message().into(),
                    context: None,
                });
            }

            *state = SubmissionState::Processing;
            debug!(plate = %validation.normalized_plate, "Submission state: Idle -> Processing");
            (name.to_owned(), validation.normalized_plate)
        };

        let guard = ProcessingGuard::new(&self.state);

        if self.client.check_duplicate(&plate).await?.is_duplicate() {
            warn!(plate = %plate, "Plate already registered");
            return Err(RegistrationError::Duplicate {
                message: messages::ALREADY_REGISTERED.into(),
                context: None,
            });
        }

        let timestamp = self.policy.local(&self.clock.now());
        let request = RegistrationRequest::new(name, plate, timestamp);
        let receipt = self.client.submit(&request).await?;
        if !receipt.success {
            return Err(RegistrationError::Remote {
                message: messages::SAVE_FAILED.into(),
                context: None,
            });
        }

        guard.commit();
        info!(plate = %request.car_number(), at = %request.formatted_timestamp(), "Vehicle registered");

        Ok(SubmitOutcome::Submitted { confirmation: self.policy.confirmation() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{DuplicateCheck, SubmitReceipt};
    use crate::clock::ManualClock;
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;
    use vreg_domain::config::PolicyConfig;

    #[derive(Debug)]
    struct StubClient {
        duplicate: Result<DuplicateCheck, &'static str>,
        success: bool,
        checks: AtomicUsize,
        submits: AtomicUsize,
        requests: Mutex<Vec<RegistrationRequest>>,
        gate: Option<Arc<Notify>>,
    }

    impl StubClient {
        fn new(duplicate: DuplicateCheck, success: bool) -> Self {
            Self {
                duplicate: Ok(duplicate),
                success,
                checks: AtomicUsize::new(0),
                submits: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
                gate: None,
            }
        }

        fn calls(&self) -> (usize, usize) {
            (self.checks.load(Ordering::SeqCst), self.submits.load(Ordering::SeqCst))
        }
    }

    impl RegistrationClient for StubClient {
        async fn check_duplicate(&self, _plate: &str) -> Result<DuplicateCheck, RegistrationError> {
            self.checks.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.duplicate.map_err(|message| RegistrationError::Remote {
                message: message.into(),
                context: None,
            })
        }

        async fn submit(
            &self,
            request: &RegistrationRequest,
        ) -> Result<SubmitReceipt, RegistrationError> {
            self.submits.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().push(request.clone());
            Ok(SubmitReceipt { success: self.success, raw_body: String::new() })
        }
    }

    /// Monday 2024-05-06 10:00 KST.
    fn open_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 6, 1, 0, 0).unwrap()
    }

    /// Monday 2024-05-06 20:00 KST.
    fn closed_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 6, 11, 0, 0).unwrap()
    }

    fn controller(
        client: StubClient,
        now: DateTime<Utc>,
    ) -> (SubmissionController<StubClient, ManualClock>, Arc<StubClient>) {
        let client = Arc::new(client);
        let policy = Arc::new(OperatingWindowPolicy::from_config(&PolicyConfig::default()).unwrap());
        let controller = SubmissionController::new(
            Arc::clone(&client),
            policy,
            ManualClock(now),
            Arc::from("admin1234"),
        );
        (controller, client)
    }

    #[tokio::test]
    async fn happy_path_reaches_submitted() {
        let (controller, client) =
            controller(StubClient::new(DuplicateCheck::Unique, true), open_instant());

        let outcome = controller.submit("홍길동", "12가 3456").await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Submitted { .. }));
        assert_eq!(controller.state(), SubmissionState::Submitted);
        assert_eq!(client.calls(), (1, 1));

        let sent = client.requests.lock()[0].clone();
        assert_eq!(sent.name(), "홍길동");
        assert_eq!(sent.car_number(), "12가3456");
        assert_eq!(sent.formatted_timestamp(), "2024-05-06 10:00:00.000000");
    }

    #[tokio::test]
    async fn submitted_session_ignores_further_submits() {
        let (controller, client) =
            controller(StubClient::new(DuplicateCheck::Unique, true), open_instant());
        controller.submit("홍길동", "12가3456").await.unwrap();

        let outcome = controller.submit("임꺽정", "34나5678").await.unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Ignored {
                state: SubmissionState::Submitted,
                notice: messages::ALREADY_SUBMITTED
            }
        );
        assert_eq!(client.calls(), (1, 1));
    }

    #[tokio::test]
    async fn empty_name_makes_no_network_call() {
        let (controller, client) =
            controller(StubClient::new(DuplicateCheck::Unique, true), open_instant());

        let err = controller.submit("", "12가3456").await.unwrap_err();
        assert_eq!(err.kind(), "input");
        assert_eq!(err.user_message(), messages::FILL_ALL_FIELDS);
        assert_eq!(client.calls(), (0, 0));
        assert_eq!(controller.state(), SubmissionState::Idle);
    }

    #[tokio::test]
    async fn name_is_trimmed_before_checks_and_sending() {
        let (controller, client) =
            controller(StubClient::new(DuplicateCheck::Unique, true), open_instant());

        let err = controller.submit("   ", "12가3456").await.unwrap_err();
        assert_eq!(err.user_message(), messages::FILL_ALL_FIELDS);
        assert_eq!(client.calls(), (0, 0));

        controller.submit("  홍길동 ", "12가3456").await.unwrap();
        assert_eq!(client.requests.lock()[0].name(), "홍길동");
    }

    #[tokio::test]
    async fn malformed_plate_makes_no_network_call() {
        let (controller, client) =
            controller(StubClient::new(DuplicateCheck::Unique, true), open_instant());

        let err = controller.submit("홍길동", "12-3456").await.unwrap_err();
        assert_eq!(err.kind(), "input");
        assert_eq!(client.calls(), (0, 0));
    }

    #[tokio::test]
    async fn duplicate_returns_to_idle_without_submit() {
        let (controller, client) =
            controller(StubClient::new(DuplicateCheck::Duplicate, true), open_instant());

        let err = controller.submit("홍길동", "12가3456").await.unwrap_err();
        assert_eq!(err.kind(), "duplicate");
        assert_eq!(err.user_message(), messages::ALREADY_REGISTERED);
        assert_eq!(controller.state(), SubmissionState::Idle);
        assert_eq!(client.calls(), (1, 0));
    }

    #[tokio::test]
    async fn empty_dataset_continues_to_submit() {
        let (controller, client) =
            controller(StubClient::new(DuplicateCheck::EmptyDataset, true), open_instant());

        controller.submit("홍길동", "12가3456").await.unwrap();
        assert_eq!(controller.state(), SubmissionState::Submitted);
        assert_eq!(client.calls(), (1, 1));
    }

    #[tokio::test]
    async fn duplicate_check_failure_returns_to_idle() {
        let mut stub = StubClient::new(DuplicateCheck::Unique, true);
        stub.duplicate = Err("boom");
        let (controller, client) = controller(stub, open_instant());

        let err = controller.submit("홍길동", "12가3456").await.unwrap_err();
        assert_eq!(err.kind(), "remote");
        assert_eq!(controller.state(), SubmissionState::Idle);
        assert_eq!(client.calls(), (1, 0));
    }

    #[tokio::test]
    async fn rejected_submit_is_retryable() {
        let (controller, client) =
            controller(StubClient::new(DuplicateCheck::Unique, false), open_instant());

        let err = controller.submit("홍길동", "12가3456").await.unwrap_err();
        assert_eq!(err.user_message(), messages::SAVE_FAILED);
        assert_eq!(controller.state(), SubmissionState::Idle);

        // The retry runs the whole flow again.
        let _ = controller.submit("홍길동", "12가3456").await;
        assert_eq!(client.calls(), (2, 2));
    }

    #[tokio::test]
    async fn closed_window_is_refused_unless_admin() {
        let (controller, client) =
            controller(StubClient::new(DuplicateCheck::Unique, true), closed_instant());
        assert!(!controller.is_form_open());

        let err = controller.submit("홍길동", "12가3456").await.unwrap_err();
        assert_eq!(err.kind(), "policy");
        assert_eq!(client.calls(), (0, 0));

        controller.admin().toggle("admin1234").unwrap();
        assert!(controller.is_form_open());
        controller.submit("홍길동", "12가3456").await.unwrap();
        assert_eq!(controller.state(), SubmissionState::Submitted);
    }

    #[tokio::test]
    async fn submit_while_processing_is_a_no_op() {
        let gate = Arc::new(Notify::new());
        let mut stub = StubClient::new(DuplicateCheck::Unique, true);
        stub.gate = Some(Arc::clone(&gate));
        let (controller, client) = controller(stub, open_instant());
        let controller = Arc::new(controller);

        let first = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.submit("홍길동", "12가3456").await }
        });

        while controller.state() != SubmissionState::Processing {
            tokio::task::yield_now().await;
        }

        // Even invalid input is ignored while busy.
        let outcome = controller.submit("", "").await.unwrap();
        assert!(matches!(
            outcome,
            SubmitOutcome::Ignored { state: SubmissionState::Processing, .. }
        ));

        gate.notify_one();
        let outcome = first.await.unwrap().unwrap();
        assert!(matches!(outcome, SubmitOutcome::Submitted { .. }));
        assert_eq!(client.calls(), (1, 1));
    }

    #[tokio::test]
    async fn cancelled_submit_releases_processing() {
        let gate = Arc::new(Notify::new());
        let mut stub = StubClient::new(DuplicateCheck::Unique, true);
        stub.gate = Some(gate);
        let (controller, _client) = controller(stub, open_instant());

        let attempt = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            controller.submit("홍길동", "12가3456"),
        )
        .await;
        assert!(attempt.is_err());
        assert_eq!(controller.state(), SubmissionState::Idle);
    }
}
