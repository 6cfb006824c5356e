//! `SeaORM` implementation of the `UserAdminService` trait.

use crate::constants::{ADMIN_USERNAME, limits};
use crate::db::Store;
use crate::policy;
use crate::services::user_admin_service::{AdminError, UserAdminService, UserInfo};
use async_trait::async_trait;

pub struct SeaOrmUserAdminService {
    store: Store,
}

impl SeaOrmUserAdminService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

fn to_info(user: crate::db::User) -> UserInfo {
    UserInfo {
        id: user.id,
        username: user.username,
        must_change_password: user.must_change_password,
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

#[async_trait]
impl UserAdminService for SeaOrmUserAdminService {
    async fn list_users(&self) -> Result<Vec<UserInfo>, AdminError> {
        let users = self.store.list_users().await?;
        Ok(users.into_iter().map(to_info).collect())
    }

    async fn create_user(&self, username: &str, password: &str) -> Result<UserInfo, AdminError> {
        let username = username.trim();

        if username.is_empty() {
            return Err(AdminError::validation(
                "username",
                "Username cannot be empty",
            ));
        }

        if username.chars().count() > limits::MAX_USERNAME_LEN {
            return Err(AdminError::validation(
                "username",
                format!(
                    "Username must be {} characters or fewer",
                    limits::MAX_USERNAME_LEN
                ),
            ));
        }

        if let Some(message) = policy::strength_error(password) {
            return Err(AdminError::validation("password", message));
        }

        // The store enforces identity uniqueness; a rejected insert comes
        // back as None rather than an error.
        let user = self
            .store
            .create_user(username, password)
            .await?
            .ok_or(AdminError::DuplicateUsername)?;

        Ok(to_info(user))
    }

    async fn delete_user(&self, id: i32) -> Result<(), AdminError> {
        let user = self
            .store
            .get_user_by_id(id)
            .await?
            .ok_or(AdminError::UserNotFound)?;

        if user.username.eq_ignore_ascii_case(ADMIN_USERNAME) {
            return Err(AdminError::Forbidden(
                "Cannot delete the admin account".to_string(),
            ));
        }

        let deleted = self.store.delete_user(id).await?;
        if !deleted {
            return Err(AdminError::UserNotFound);
        }

        Ok(())
    }

    async fn reset_password(&self, id: i32, new_password: &str) -> Result<(), AdminError> {
        let user = self
            .store
            .get_user_by_id(id)
            .await?
            .ok_or(AdminError::UserNotFound)?;

        if user.username.eq_ignore_ascii_case(ADMIN_USERNAME) {
            return Err(AdminError::Forbidden(
                "Cannot reset the admin account's password".to_string(),
            ));
        }

        if let Some(message) = policy::strength_error(new_password) {
            return Err(AdminError::validation("password", message));
        }

        self.store.reset_user_password(id, new_password).await?;

        Ok(())
    }
}
