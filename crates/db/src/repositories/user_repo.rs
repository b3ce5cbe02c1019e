//! Repository for the users collection.

use irs_core::password;
use irs_core::types::DbId;

use crate::error::DbError;
use crate::models::user::{CreateUser, User};
use crate::store::Store;

/// Provides create and lookup operations for user accounts.
pub struct UserRepo;

impl UserRepo {
    /// Create a user with a unique username. The password must meet the
    /// minimum strength and is stored hashed.
    pub async fn create(store: &Store, input: &CreateUser) -> Result<User, DbError> {
        password::validate_password_strength(&input.password).map_err(DbError::WeakPassword)?;
        let password_hash = password::hash_password(&input.password)
            .map_err(|e| DbError::PasswordHash(e.to_string()))?;
        let now = chrono::Utc::now();

        let mut tables = store.write().await;
        if tables.users.values().any(|u| u.username == input.username) {
            return Err(DbError::UniqueViolation(format!(
                "username '{}' is taken",
                input.username
            )));
        }
        let user = tables.users.insert_with(|id| User {
            id,
            username: input.username.clone(),
            password_hash,
            created_at: now,
        });
        tracing::debug!(user_id = user.id, "User created");
        Ok(user)
    }

    pub async fn find_by_id(store: &Store, id: DbId) -> Result<Option<User>, DbError> {
        Ok(store.read().await.users.get(id).cloned())
    }

    pub async fn find_by_username(store: &Store, username: &str) -> Result<Option<User>, DbError> {
        Ok(store
            .read()
            .await
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    /// Look up a user and check the password. `None` on unknown user or mismatch.
    pub async fn verify_credentials(
        store: &Store,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DbError> {
        let Some(user) = Self::find_by_username(store, username).await? else {
            return Ok(None);
        };
        let ok = password::verify_password(password, &user.password_hash)
            .map_err(|e| DbError::PasswordHash(e.to_string()))?;
        Ok(ok.then_some(user))
    }
}
