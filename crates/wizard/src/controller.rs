//! Five-step wizard state machine.
//!
//! The controller owns the draft form, the terms flag and the media
//! buckets. Forward navigation is gated by the current step's validators;
//! backward navigation never is. User-facing feedback is queued as
//! [`Notification`]s for the UI layer to drain.

use chrono::Utc;

use irs_core::error::CoreError;
use irs_core::schema::{validate_step, FieldErrors, IssueForm, WizardStep};

use crate::draft::{DraftSlot, DraftSnapshot};
use crate::error::{SubmitError, WizardError};
use crate::media::{AudioRecording, CapturedFile, MediaBuckets};
use crate::submit::{IssueSubmitter, SubmissionPayload, SubmitReceipt};

/// Field key used when the terms have not been accepted.
pub const FIELD_TERMS_ACCEPTED: &str = "terms_accepted";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Editing,
    /// A submission request is in flight.
    Submitting,
    Submitted {
        ticket_id: String,
    },
}

/// Outcome of [`StepController::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved(WizardStep),
    /// The current step failed validation; see `field_errors()`.
    Blocked,
    /// The review step passed; the wizard may now be submitted.
    ReadyToSubmit,
    /// Navigation is disabled while submitting or after submission.
    Locked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
}

impl Notification {
    fn info(title: &str, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            title: title.to_string(),
            message: message.into(),
        }
    }

    fn error(title: &str, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub struct StepController {
    step: WizardStep,
    form: IssueForm,
    terms_accepted: bool,
    media: MediaBuckets,
    field_errors: FieldErrors,
    phase: Phase,
    notifications: Vec<Notification>,
}

impl Default for StepController {
    fn default() -> Self {
        Self::new()
    }
}

impl StepController {
    pub fn new() -> Self {
        Self {
            step: WizardStep::IssueDetails,
            form: IssueForm::default(),
            terms_accepted: false,
            media: MediaBuckets::new(),
            field_errors: FieldErrors::default(),
            phase: Phase::Editing,
            notifications: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn form(&self) -> &IssueForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut IssueForm {
        &mut self.form
    }

    pub fn terms_accepted(&self) -> bool {
        self.terms_accepted
    }

    pub fn set_terms_accepted(&mut self, accepted: bool) {
        self.terms_accepted = accepted;
    }

    pub fn media(&self) -> &MediaBuckets {
        &self.media
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    /// Drain queued notifications, oldest first.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Validate the current step and move forward when it passes.
    pub fn advance(&mut self) -> Advance {
        if self.phase != Phase::Editing {
            return Advance::Locked;
        }

        let result = if self.step == WizardStep::Review {
            self.check_terms()
        } else {
            validate_step(self.step, &self.form)
        };

        if let Err(errors) = result {
            tracing::debug!(step = self.step.to_number(), errors = errors.len(), "Step blocked");
            self.notifications.push(Notification::error(
                "Validation failed",
                format!(
                    "Please fix {} field(s) on {}",
                    errors.len(),
                    self.step.label()
                ),
            ));
            self.field_errors = errors;
            return Advance::Blocked;
        }

        self.field_errors = FieldErrors::default();
        match self.step.next() {
            Some(next) => {
                tracing::debug!(from = self.step.to_number(), to = next.to_number(), "Step advanced");
                self.step = next;
                Advance::Moved(next)
            }
            None => Advance::ReadyToSubmit,
        }
    }

    /// Move back one step. All entered data is kept; step 1 stays put.
    pub fn retreat(&mut self) -> WizardStep {
        if self.phase == Phase::Editing {
            if let Some(previous) = self.step.previous() {
                self.step = previous;
                self.field_errors = FieldErrors::default();
            }
        }
        self.step
    }

    fn check_terms(&self) -> Result<(), FieldErrors> {
        if self.terms_accepted {
            return Ok(());
        }
        let mut errors = FieldErrors::default();
        errors.push(FIELD_TERMS_ACCEPTED, "You must accept the terms to submit");
        Err(errors)
    }

    // -----------------------------------------------------------------------
    // Submission
    // -----------------------------------------------------------------------

    /// Lock the wizard and build the request body.
    pub fn begin_submission(&mut self) -> Result<SubmissionPayload, WizardError> {
        match self.phase {
            Phase::Editing => {}
            Phase::Submitting => return Err(WizardError::AlreadySubmitting),
            Phase::Submitted { .. } => return Err(WizardError::AlreadySubmitted),
        }
        if self.step != WizardStep::Review {
            return Err(WizardError::NotOnReviewStep);
        }
        if !self.terms_accepted {
            return Err(WizardError::TermsNotAccepted);
        }

        let payload = SubmissionPayload::assemble(&self.form, &self.media)?;
        self.phase = Phase::Submitting;
        Ok(payload)
    }

    /// Record the outcome of the request started by [`begin_submission`].
    ///
    /// On failure the wizard returns to the review step with every field
    /// and file intact, so the user can simply try again.
    ///
    /// [`begin_submission`]: Self::begin_submission
    pub fn finish_submission(
        &mut self,
        result: Result<SubmitReceipt, SubmitError>,
    ) -> Result<String, WizardError> {
        if self.phase != Phase::Submitting {
            return Err(WizardError::NotSubmitting);
        }

        match result {
            Ok(receipt) => {
                self.notifications.push(Notification::info(
                    "Issue submitted",
                    format!("Your ticket number is {}", receipt.ticket_id),
                ));
                self.phase = Phase::Submitted {
                    ticket_id: receipt.ticket_id.clone(),
                };
                Ok(receipt.ticket_id)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Submission failed");
                self.notifications
                    .push(Notification::error("Submission failed", err.to_string()));
                self.phase = Phase::Editing;
                self.step = WizardStep::Review;
                Err(err.into())
            }
        }
    }

    /// Submit through `submitter`, wrapping one network call.
    pub async fn submit<S>(&mut self, submitter: &S) -> Result<String, WizardError>
    where
        S: IssueSubmitter + ?Sized,
    {
        let payload = self.begin_submission()?;
        let result = submitter.submit(payload).await;
        self.finish_submission(result)
    }

    // -----------------------------------------------------------------------
    // Drafts
    // -----------------------------------------------------------------------

    /// Snapshot every field into `slot`. The user is always told the draft
    /// was saved; write failures only reach the log.
    pub fn save_draft(&mut self, slot: &dyn DraftSlot) {
        let snapshot = DraftSnapshot {
            form: self.form.clone(),
            terms_accepted: self.terms_accepted,
            saved_at: Utc::now(),
        };
        if let Err(e) = slot.save(&snapshot) {
            tracing::warn!(error = %e, "Failed to persist draft");
        }
        self.notifications
            .push(Notification::info("Draft saved", "Your progress has been saved"));
    }

    /// Replace the fields with a saved draft and restart at step 1.
    pub fn restore_draft(&mut self, snapshot: DraftSnapshot) {
        if self.phase != Phase::Editing {
            return;
        }
        self.form = snapshot.form;
        self.terms_accepted = snapshot.terms_accepted;
        self.step = WizardStep::IssueDetails;
        self.field_errors = FieldErrors::default();
    }

    // -----------------------------------------------------------------------
    // Media
    // -----------------------------------------------------------------------

    pub fn add_photos(&mut self, batch: Vec<CapturedFile>) -> bool {
        let result = self.media.add_photos(batch);
        self.report_media(result)
    }

    pub fn add_files(&mut self, batch: Vec<CapturedFile>) -> bool {
        let result = self.media.add_files(batch);
        self.report_media(result)
    }

    /// Store a video, replacing any earlier one.
    pub fn set_video(&mut self, file: CapturedFile) -> bool {
        let result = self.media.set_video(file).map(drop);
        self.report_media(result)
    }

    /// Store an audio recording, replacing any earlier one.
    pub fn set_audio(&mut self, recording: AudioRecording) -> bool {
        let result = self.media.set_audio(recording).map(drop);
        self.report_media(result)
    }

    pub fn remove_photo(&mut self, index: usize) -> Option<CapturedFile> {
        self.media.remove_photo(index)
    }

    pub fn remove_file(&mut self, index: usize) -> Option<CapturedFile> {
        self.media.remove_file(index)
    }

    pub fn clear_video(&mut self) -> Option<CapturedFile> {
        self.media.clear_video()
    }

    pub fn clear_audio(&mut self) -> Option<AudioRecording> {
        self.media.clear_audio()
    }

    fn report_media(&mut self, result: Result<(), CoreError>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                let message = match e {
                    CoreError::Validation(msg) => msg,
                    other => other.to_string(),
                };
                self.notifications
                    .push(Notification::error("Files rejected", message));
                false
            }
        }
    }
}
