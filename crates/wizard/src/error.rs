use irs_core::error::CoreError;

/// Failures of a device-backed capture adapter.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Device unavailable: {0}")]
    Unavailable(String),

    /// The adapter is in its error state and needs an explicit retry.
    #[error("Capture is blocked until retried: {0}")]
    NeedsRetry(String),

    #[error("No active capture stream")]
    NotActive,

    #[error("Capture already in progress")]
    Busy,

    /// A batch violated its bucket's constraints.
    #[error("{0}")]
    Rejected(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CoreError> for CaptureError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => CaptureError::Rejected(msg),
            other => CaptureError::Rejected(other.to_string()),
        }
    }
}

/// Failures of the network submission.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The request never produced a response.
    #[error("Network error: {0}")]
    Transport(String),

    /// The request could not be built.
    #[error("Invalid request: {0}")]
    Request(String),

    /// The backend answered with a non-success status. `message` is the
    /// server's `error` field, or the status text when there is none.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

/// Failures of the wizard's submission lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Submission is only possible from the review step")]
    NotOnReviewStep,

    #[error("Terms must be accepted before submitting")]
    TermsNotAccepted,

    #[error("A submission is already in flight")]
    AlreadySubmitting,

    #[error("No submission is in flight")]
    NotSubmitting,

    #[error("The issue has already been submitted")]
    AlreadySubmitted,

    #[error("Failed to encode issue data: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Submit(#[from] SubmitError),
}

/// Failures of the local draft slot.
#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("Draft I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Draft is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
