//! Issue status constants and transition rules.
//!
//! An issue is stored as `submitted` and becomes `processed` once a ticket
//! id has been attached. That transition happens exactly once.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Initial status for a newly stored issue.
pub const STATUS_SUBMITTED: &str = "submitted";
/// A ticket id has been attached to the issue.
pub const STATUS_PROCESSED: &str = "processed";

/// Message returned alongside a successful submission.
pub const SUBMITTED_MESSAGE: &str = "Issue submitted successfully";

/// Multipart field carrying the JSON-encoded form.
pub const FIELD_ISSUE_DATA: &str = "issueData";
/// Repeated multipart field carrying uploaded files.
pub const FIELD_FILES: &str = "files";

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

/// Returns the set of statuses that `from_status` may transition to.
///
/// - `submitted` -> `processed`
/// - `processed` is terminal
pub fn valid_transitions(from_status: &str) -> &'static [&'static str] {
    match from_status {
        STATUS_SUBMITTED => &[STATUS_PROCESSED],
        _ => &[],
    }
}

/// Validate that a status transition from `current` to `next` is allowed.
pub fn validate_transition(current: &str, next: &str) -> Result<(), CoreError> {
    let allowed = valid_transitions(current);
    if allowed.contains(&next) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Cannot transition issue from '{current}' to '{next}'. Allowed transitions: {allowed:?}"
        )))
    }
}
