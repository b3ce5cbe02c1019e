//! Handlers for issue submission and retrieval.
//!
//! `POST /issues` accepts the wizard's multipart payload: one `issueData`
//! JSON field and any number of `files` parts.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use irs_core::error::CoreError;
use irs_core::issue::{FIELD_FILES, FIELD_ISSUE_DATA, SUBMITTED_MESSAGE};
use irs_core::schema::{self, IssueForm};
use irs_core::ticket;
use irs_core::types::DbId;
use irs_db::models::issue::Issue;
use irs_db::models::media::{CreateMedia, Media};
use irs_db::repositories::{IssueRepo, MediaRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::uploads::UploadBatch;

/// An issue together with its media, in upload order.
#[derive(Debug, Serialize)]
pub struct IssueDetail {
    pub issue: Issue,
    pub media: Vec<Media>,
}

/// Response body of a successful submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitIssueResponse {
    pub issue: Issue,
    pub message: &'static str,
    pub ticket_id: String,
}

// ---------------------------------------------------------------------------
// GET /issues
// ---------------------------------------------------------------------------

/// List all issues in creation order.
pub async fn list_issues(State(state): State<AppState>) -> AppResult<Json<Vec<Issue>>> {
    let issues = IssueRepo::list(&state.store).await?;
    Ok(Json(issues))
}

// ---------------------------------------------------------------------------
// GET /issues/{id}
// ---------------------------------------------------------------------------

/// Get a single issue and its media.
pub async fn get_issue(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<IssueDetail>> {
    let issue = IssueRepo::find_by_id(&state.store, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Issue",
            id,
        }))?;
    let media = MediaRepo::list_for_issue(&state.store, id).await?;

    Ok(Json(IssueDetail { issue, media }))
}

// ---------------------------------------------------------------------------
// POST /issues
// ---------------------------------------------------------------------------

/// Submit an issue with its attachments.
///
/// Files are written to the upload directory as they arrive. Unless the
/// submission completes, every file written for this request is removed,
/// including when the request is abandoned mid-stream.
pub async fn submit_issue(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<SubmitIssueResponse>)> {
    let mut uploads = UploadBatch::new(&state.config.upload_dir);
    let response = receive_submission(&state, multipart, &mut uploads).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn receive_submission(
    state: &AppState,
    mut multipart: Multipart,
    uploads: &mut UploadBatch,
) -> AppResult<SubmitIssueResponse> {
    let mut issue_data: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some(FIELD_ISSUE_DATA) => {
                issue_data = Some(field.text().await?);
            }
            Some(FIELD_FILES) => uploads.write_field(field).await?,
            _ => {} // Ignore unknown fields.
        }
    }

    let raw = issue_data
        .ok_or_else(|| AppError::BadRequest(format!("Missing '{FIELD_ISSUE_DATA}' field")))?;
    let form: IssueForm = serde_json::from_str(&raw)
        .map_err(|e| AppError::BadRequest(format!("Invalid issueData JSON: {e}")))?;
    schema::validate_issue_form(&form)?;

    let issue = IssueRepo::create(&state.store, &form).await?;

    for upload in uploads.files() {
        MediaRepo::create(
            &state.store,
            &CreateMedia {
                issue_id: issue.id,
                file_name: upload.original_name.clone(),
                file_path: upload.path.to_string_lossy().into_owned(),
                mime_type: upload.mime_type.clone(),
                size: upload.size,
            },
        )
        .await?;
    }

    let ticket_id = ticket::generate_ticket_id(&mut rand::rng());
    let issue = IssueRepo::attach_ticket(&state.store, issue.id, &ticket_id).await?;
    uploads.commit();

    tracing::info!(
        issue_id = issue.id,
        ticket_id = %ticket_id,
        media_count = uploads.files().len(),
        "Issue submitted",
    );

    Ok(SubmitIssueResponse {
        issue,
        message: SUBMITTED_MESSAGE,
        ticket_id,
    })
}
