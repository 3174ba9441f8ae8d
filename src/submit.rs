//! Submission lifecycle: validation, single in-flight request, outcome.

use thiserror::Error;
use uuid::Uuid;

use crate::{
    download::DownloadTrigger,
    form::{FieldUpdate, FilterRequest, FormState, ValidationError},
};

#[cfg(test)]
use crate::service::FilterService;

/// Why a submission attempt did not produce a file.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// Rejected before anything was sent.
    #[error("{0}")]
    Validation(#[from] ValidationError),
    /// Backend answered with a non-2xx status.
    #[error("{message}")]
    Service { status: u16, message: String },
    /// Connection, file read or body decoding failure.
    #[error("Error while processing the file: {0}")]
    Transport(String),
    /// A request is already pending.
    #[error("A submission is already in progress.")]
    InFlight,
}

/// Request lifecycle phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// A validated request waiting for its response.
#[derive(Clone, Debug)]
pub struct Submission {
    /// Matches the completion back to this attempt.
    pub id: Uuid,
    pub request: FilterRequest,
}

/// Result of a finished round trip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// File handed to the saver under this name; the form was reset.
    Downloaded { filename: String },
    /// Message shown in the banner; the form was kept.
    Failed(String),
}

/// Owns the form and drives `Idle → Submitting → {Succeeded, Failed} → Idle`.
pub struct SubmissionController {
    form: FormState,
    phase: Phase,
    banner: Option<String>,
    /// `(submission id, trimmed driver name)` of the pending request.
    pending: Option<(Uuid, String)>,
    download: DownloadTrigger,
}

impl SubmissionController {
    pub fn new(download: DownloadTrigger) -> Self {
        Self {
            form: FormState::default(),
            phase: Phase::Idle,
            banner: None,
            pending: None,
            download,
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current error banner, if any.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn is_in_flight(&self) -> bool {
        self.phase == Phase::Submitting
    }

    /// Replace the form with an updated snapshot.
    pub fn update(&mut self, update: FieldUpdate) {
        self.form = self.form.with(update);
    }

    /// Validate the whole form and, if it passes, enter `Submitting`.
    pub fn begin(&mut self) -> Result<Submission, SubmitError> {
        if self.is_in_flight() {
            tracing::warn!("submit ignored: request already in flight");
            return Err(SubmitError::InFlight);
        }
        self.banner = None;

        let request = match FilterRequest::build(&self.form) {
            Ok(r) => r,
            Err(e) => {
                tracing::info!("validation failed: {e}");
                self.banner = Some(e.to_string());
                return Err(e.into());
            }
        };

        let id = Uuid::new_v4();
        self.pending = Some((id, request.driver_name.clone()));
        self.transition(Phase::Submitting);
        Ok(Submission { id, request })
    }

    /// Apply the result of submission `id`; stale ids are ignored.
    pub fn finish(
        &mut self,
        id: Uuid,
        result: Result<Vec<u8>, SubmitError>,
    ) -> Option<SubmitOutcome> {
        let driver_name = match &self.pending {
            Some((pending_id, name)) if *pending_id == id => name.clone(),
            _ => {
                tracing::warn!("ignoring completion for unknown submission {id}");
                return None;
            }
        };
        self.pending = None;

        let outcome = match result {
            Ok(bytes) => {
                self.transition(Phase::Succeeded);
                let filename = self.download.deliver(&bytes, &driver_name);
                self.form = FormState::default();
                SubmitOutcome::Downloaded { filename }
            }
            Err(e) => {
                self.transition(Phase::Failed);
                let message = e.to_string();
                tracing::error!("submission {id} failed: {message}");
                self.banner = Some(message.clone());
                SubmitOutcome::Failed(message)
            }
        };
        self.transition(Phase::Idle);
        Some(outcome)
    }

    /// Run one complete round trip against `service` without the worker.
    #[cfg(test)]
    pub async fn submit(
        &mut self,
        service: &dyn FilterService,
    ) -> Result<SubmitOutcome, SubmitError> {
        let Submission { id, request } = self.begin()?;
        let result = service.filter_driver(request).await;
        // The id is the one just issued, so finish always yields an outcome.
        self.finish(id, result).ok_or(SubmitError::InFlight)
    }

    fn transition(&mut self, next: Phase) {
        tracing::debug!("submission phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        download::tests::RecordingSaver,
        form::{SourceFile, TimeComponent, state::BreakBound},
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Canned backend that records the requests it receives.
    struct StubService {
        reply: Result<Vec<u8>, SubmitError>,
        seen: Mutex<Vec<FilterRequest>>,
    }

    impl StubService {
        fn replying(reply: Result<Vec<u8>, SubmitError>) -> Self {
            Self {
                reply,
                seen: Mutex::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl FilterService for StubService {
        async fn filter_driver(&self, request: FilterRequest) -> Result<Vec<u8>, SubmitError> {
            self.seen.lock().unwrap().push(request);
            self.reply.clone()
        }
    }

    fn controller() -> (SubmissionController, RecordingSaver) {
        let saver = RecordingSaver::default();
        let c = SubmissionController::new(DownloadTrigger::new(saver.clone()));
        (c, saver)
    }

    fn fill_jane(c: &mut SubmissionController) {
        c.update(FieldUpdate::SourceFile(Some(SourceFile::new("schedule.xlsx"))));
        c.update(FieldUpdate::DriverName("Jane Doe".into()));
        c.update(FieldUpdate::AddBreak(true));
        c.update(FieldUpdate::BreakDate("2024-03-01".into()));
        for (bound, hour) in [(BreakBound::Start, "13"), (BreakBound::End, "14")] {
            c.update(FieldUpdate::BreakTimeComponent {
                bound,
                component: TimeComponent::Hour,
                raw: hour.into(),
            });
        }
    }

    #[tokio::test]
    async fn test_successful_round_trip_downloads_and_resets() {
        let (mut c, saver) = controller();
        fill_jane(&mut c);
        let service = StubService::replying(Ok(b"XLSX".to_vec()));

        let outcome = c.submit(&service).await.unwrap();

        assert_eq!(
            outcome,
            SubmitOutcome::Downloaded {
                filename: "filtered_jane_doe.xlsx".into()
            }
        );
        let seen = service.seen.lock().unwrap();
        assert_eq!(
            seen[0].break_range,
            Some((
                "2024-03-01 13:00:00.000".to_string(),
                "2024-03-01 14:00:00.000".to_string()
            ))
        );
        assert_eq!(seen[0].off_date, None);
        assert_eq!(
            saver.saved.lock().unwrap().as_slice(),
            &[("filtered_jane_doe.xlsx".to_string(), b"XLSX".to_vec())]
        );
        assert_eq!(c.form(), &FormState::default());
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(c.banner(), None);
    }

    #[tokio::test]
    async fn test_service_failure_keeps_form_and_shows_message() {
        let (mut c, saver) = controller();
        fill_jane(&mut c);
        let before = c.form().clone();
        let service = StubService::replying(Err(SubmitError::Service {
            status: 500,
            message: "bad file".into(),
        }));

        let outcome = c.submit(&service).await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Failed("bad file".into()));
        assert_eq!(c.banner(), Some("bad file"));
        assert_eq!(c.form(), &before);
        assert_eq!(c.phase(), Phase::Idle);
        assert!(saver.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_includes_underlying_message() {
        let (mut c, _) = controller();
        fill_jane(&mut c);
        let service =
            StubService::replying(Err(SubmitError::Transport("connection refused".into())));

        c.submit(&service).await.unwrap();

        assert_eq!(
            c.banner(),
            Some("Error while processing the file: connection refused")
        );
        assert!(c.form().source_file.is_some());
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_the_service() {
        let (mut c, _) = controller();
        c.update(FieldUpdate::DriverName("Jane".into()));
        let service = StubService::replying(Ok(vec![]));

        let err = c.submit(&service).await.unwrap_err();

        assert_eq!(err, SubmitError::Validation(ValidationError::MissingFileOrDriver));
        assert_eq!(c.banner(), Some(ValidationError::MissingFileOrDriver.to_string().as_str()));
        assert!(service.seen.lock().unwrap().is_empty());
        assert_eq!(c.phase(), Phase::Idle);
    }

    #[test]
    fn test_second_submit_while_pending_is_rejected() {
        let (mut c, _) = controller();
        fill_jane(&mut c);
        let first = c.begin().unwrap();
        assert!(c.is_in_flight());
        assert_eq!(c.begin().unwrap_err(), SubmitError::InFlight);

        c.finish(first.id, Ok(vec![1])).unwrap();
        assert!(!c.is_in_flight());
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let (mut c, _) = controller();
        fill_jane(&mut c);
        let sub = c.begin().unwrap();
        assert_eq!(c.finish(Uuid::new_v4(), Ok(vec![])), None);
        assert!(c.is_in_flight());
        assert!(c.finish(sub.id, Ok(vec![])).is_some());
    }

    #[test]
    fn test_new_attempt_clears_previous_banner() {
        let (mut c, _) = controller();
        fill_jane(&mut c);
        let sub = c.begin().unwrap();
        c.finish(sub.id, Err(SubmitError::Transport("x".into())));
        assert!(c.banner().is_some());
        c.begin().unwrap();
        assert_eq!(c.banner(), None);
    }
}
