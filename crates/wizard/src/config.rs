use std::path::PathBuf;

/// Client configuration loaded from environment variables.
///
/// | Env Var          | Default                  |
/// |------------------|--------------------------|
/// | `IRS_API_URL`    | `http://localhost:3000`  |
/// | `IRS_DRAFT_PATH` | `issue-draft.json`       |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the issue API, without a trailing slash.
    pub api_url: String,
    /// Where the draft slot is persisted.
    pub draft_path: PathBuf,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let api_url = std::env::var("IRS_API_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();
        let draft_path = PathBuf::from(
            std::env::var("IRS_DRAFT_PATH").unwrap_or_else(|_| "issue-draft.json".into()),
        );
        Self {
            api_url,
            draft_path,
        }
    }
}
