//! Repository for the issues collection.

use irs_core::issue::{self, STATUS_PROCESSED, STATUS_SUBMITTED};
use irs_core::schema::IssueForm;
use irs_core::types::DbId;

use crate::error::DbError;
use crate::models::issue::Issue;
use crate::store::Store;

/// Provides create/read/update operations for issues.
pub struct IssueRepo;

impl IssueRepo {
    /// Store a new issue with status `submitted` and no ticket id.
    ///
    /// The form is expected to have passed `validate_issue_form` already.
    pub async fn create(store: &Store, form: &IssueForm) -> Result<Issue, DbError> {
        let now = chrono::Utc::now();
        let mut tables = store.write().await;
        Ok(tables
            .issues
            .insert_with(|id| Issue::from_form(id, form, STATUS_SUBMITTED, now)))
    }

    /// Find an issue by ID.
    pub async fn find_by_id(store: &Store, id: DbId) -> Result<Option<Issue>, DbError> {
        Ok(store.read().await.issues.get(id).cloned())
    }

    /// List all issues in creation order.
    pub async fn list(store: &Store) -> Result<Vec<Issue>, DbError> {
        Ok(store.read().await.issues.values().cloned().collect())
    }

    /// Attach a ticket id and move the issue to `processed`.
    ///
    /// Fails if the issue is missing or has already been processed.
    pub async fn attach_ticket(store: &Store, id: DbId, ticket_id: &str) -> Result<Issue, DbError> {
        let mut tables = store.write().await;
        let row = tables
            .issues
            .get_mut(id)
            .ok_or(DbError::NotFound { entity: "Issue", id })?;

        issue::validate_transition(&row.status, STATUS_PROCESSED)
            .map_err(|e| DbError::InvalidTransition(e.to_string()))?;

        row.ticket_id = Some(ticket_id.to_string());
        row.status = STATUS_PROCESSED.to_string();
        Ok(row.clone())
    }
}
