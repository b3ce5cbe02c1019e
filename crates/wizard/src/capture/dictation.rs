use irs_core::schema::IssueForm;

use super::PermissionGate;
use crate::error::CaptureError;

/// Identifies one dictation activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken(u64);

/// Speech-to-text backend. Each `listen` captures a single utterance and
/// later reports it to [`Dictation::apply_result`] or [`Dictation::fail`]
/// under the same token.
pub trait SpeechEngine {
    fn request_permission(&mut self) -> Result<(), CaptureError>;

    fn listen(&mut self, token: SessionToken) -> Result<(), CaptureError>;

    fn cancel(&mut self, token: SessionToken);
}

/// Free-text fields that accept dictation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictationField {
    Title,
    Description,
    StepsToReproduce,
    ExpectedBehavior,
    ActualBehavior,
    AdditionalEnvironment,
}

impl DictationField {
    /// Append `text` to the field, separated from existing text by a space.
    pub fn append(self, form: &mut IssueForm, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let target = match self {
            Self::Title => &mut form.title,
            Self::Description => &mut form.description,
            Self::StepsToReproduce => &mut form.steps_to_reproduce,
            Self::ActualBehavior => &mut form.actual_behavior,
            Self::ExpectedBehavior => form.expected_behavior.get_or_insert_with(String::new),
            Self::AdditionalEnvironment => {
                form.additional_environment.get_or_insert_with(String::new)
            }
        };
        if !target.is_empty() && !target.ends_with(' ') {
            target.push(' ');
        }
        target.push_str(text);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictationState {
    Idle,
    Listening {
        token: SessionToken,
        field: DictationField,
    },
    /// Dictation is unavailable until [`Dictation::retry`] succeeds.
    Error { message: String },
}

/// Speech-to-text for one field at a time.
pub struct Dictation<E: SpeechEngine> {
    engine: E,
    active: Option<(SessionToken, DictationField)>,
    gate: PermissionGate,
    next_token: u64,
}

impl<E: SpeechEngine> Dictation<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            active: None,
            gate: PermissionGate::default(),
            next_token: 1,
        }
    }

    pub fn state(&self) -> DictationState {
        if let Some(message) = self.gate.error() {
            return DictationState::Error {
                message: message.to_string(),
            };
        }
        match self.active {
            Some((token, field)) => DictationState::Listening { token, field },
            None => DictationState::Idle,
        }
    }

    /// Start listening for `field`. A session already running for another
    /// field is cancelled first, so its late result is discarded.
    pub fn start(&mut self, field: DictationField) -> Result<SessionToken, CaptureError> {
        self.gate.check()?;
        self.stop();

        if let Err(e) = self.engine.request_permission() {
            return Err(self.gate.record(e));
        }

        let token = SessionToken(self.next_token);
        self.next_token += 1;
        if let Err(e) = self.engine.listen(token) {
            return Err(self.gate.record(e));
        }
        self.active = Some((token, field));
        Ok(token)
    }

    /// Stop the running session, if any.
    pub fn stop(&mut self) {
        if let Some((token, _)) = self.active.take() {
            self.engine.cancel(token);
        }
    }

    /// Ask for permission again after an error.
    pub fn retry(&mut self) -> Result<(), CaptureError> {
        if self.gate.error().is_none() {
            return Ok(());
        }
        self.engine.request_permission()?;
        self.gate.clear();
        Ok(())
    }

    /// Apply a recognised utterance. Results for any session other than the
    /// active one are ignored; returns whether the form was changed.
    pub fn apply_result(&mut self, token: SessionToken, transcript: &str, form: &mut IssueForm) -> bool {
        match self.active {
            Some((active, field)) if active == token => {
                field.append(form, transcript);
                self.active = None;
                true
            }
            _ => {
                tracing::debug!(?token, "Discarding stale dictation result");
                false
            }
        }
    }

    /// Report an engine failure for `token`. Stale failures are ignored.
    pub fn fail(&mut self, token: SessionToken, err: CaptureError) {
        if self.active.is_some_and(|(active, _)| active == token) {
            self.active = None;
            self.gate.record(err);
        }
    }
}
