//! `SeaORM` implementation of the `AuthService` trait.

use crate::db::Store;
use crate::policy;
use crate::services::auth_service::{AuthError, AuthService, SessionUser};
use async_trait::async_trait;

pub struct SeaOrmAuthService {
    store: Store,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<SessionUser, AuthError> {
        // Verify credentials against database
        let is_valid = self.store.verify_user_password(username, password).await?;

        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(SessionUser {
            username: user.username,
            must_change_password: user.must_change_password,
        })
    }

    async fn change_password(
        &self,
        username: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        if let Some(message) = policy::strength_error(new_password) {
            return Err(AuthError::Validation(message.to_string()));
        }

        if current_password == new_password {
            return Err(AuthError::Validation(
                "New password must be different from current password".to_string(),
            ));
        }

        // Re-verify before touching the stored hash; a mismatch must leave
        // both the credential and the rotation flag unchanged.
        let is_valid = self
            .store
            .verify_user_password(username, current_password)
            .await?;

        if !is_valid {
            return Err(AuthError::CurrentPasswordMismatch);
        }

        self.store
            .update_user_password(username, new_password)
            .await?;

        Ok(())
    }
}
