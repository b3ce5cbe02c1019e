//! Local persistence of an unfinished issue.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use irs_core::schema::IssueForm;

use crate::error::DraftError;

/// Everything the user has typed, as of `saved_at`. Media is not kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSnapshot {
    pub form: IssueForm,
    pub terms_accepted: bool,
    pub saved_at: DateTime<Utc>,
}

/// A single-slot store for the current draft. Each save overwrites the last.
pub trait DraftSlot {
    fn save(&self, snapshot: &DraftSnapshot) -> Result<(), DraftError>;

    /// The stored draft, or `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<DraftSnapshot>, DraftError>;
}

/// Draft slot backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileDraftSlot {
    path: PathBuf,
}

impl FileDraftSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DraftSlot for FileDraftSlot {
    fn save(&self, snapshot: &DraftSnapshot) -> Result<(), DraftError> {
        let json = serde_json::to_vec_pretty(snapshot)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<DraftSnapshot>, DraftError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
