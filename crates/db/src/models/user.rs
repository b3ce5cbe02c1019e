//! User account model and DTO.
//!
//! Accounts are not part of the reporting flow.

use irs_core::types::{DbId, Timestamp};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: DbId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: Timestamp,
}

/// DTO for creating a user. The password is hashed before storage.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub password: String,
}
