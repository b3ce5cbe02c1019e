//! Packaging the finished wizard into one multipart request.

use async_trait::async_trait;
use serde::Deserialize;

use irs_core::issue::{FIELD_FILES, FIELD_ISSUE_DATA};
use irs_core::schema::IssueForm;

use crate::config::ClientConfig;
use crate::error::SubmitError;
use crate::media::{CapturedFile, MediaBuckets};

/// The request body: the form as JSON plus every file, in submission order.
#[derive(Debug, Clone)]
pub struct SubmissionPayload {
    pub issue_data: String,
    pub files: Vec<CapturedFile>,
}

impl SubmissionPayload {
    /// Files are ordered photos, video, audio, then supporting files.
    pub fn assemble(form: &IssueForm, media: &MediaBuckets) -> Result<Self, serde_json::Error> {
        Ok(Self {
            issue_data: serde_json::to_string(form)?,
            files: media.ordered().cloned().collect(),
        })
    }
}

/// What the backend returns for an accepted submission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReceipt {
    pub ticket_id: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub issue: serde_json::Value,
}

#[async_trait]
pub trait IssueSubmitter: Send + Sync {
    async fn submit(&self, payload: SubmissionPayload) -> Result<SubmitReceipt, SubmitError>;
}

/// Submits issues to the IRS backend over HTTP. Requests are never retried.
#[derive(Debug, Clone)]
pub struct HttpIssueClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl HttpIssueClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.api_url.clone())
    }

    fn issues_url(&self) -> String {
        format!("{}/api/issues", self.base_url)
    }
}

#[async_trait]
impl IssueSubmitter for HttpIssueClient {
    async fn submit(&self, payload: SubmissionPayload) -> Result<SubmitReceipt, SubmitError> {
        let file_count = payload.files.len();
        let mut form = reqwest::multipart::Form::new().text(FIELD_ISSUE_DATA, payload.issue_data);
        for file in payload.files {
            let part = reqwest::multipart::Part::bytes(file.data)
                .file_name(file.name)
                .mime_str(&file.mime_type)
                .map_err(|e| SubmitError::Request(e.to_string()))?;
            form = form.part(FIELD_FILES, part);
        }

        let url = self.issues_url();
        tracing::debug!(%url, file_count, "Submitting issue");

        let resp = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|b| b.error)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string()
                });
            tracing::warn!(status = status.as_u16(), %message, "Issue submission rejected");
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let receipt: SubmitReceipt = resp
            .json()
            .await
            .map_err(|e| SubmitError::InvalidResponse(e.to_string()))?;
        tracing::info!(ticket_id = %receipt.ticket_id, "Issue submitted");
        Ok(receipt)
    }
}
