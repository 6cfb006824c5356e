use anyhow::{Context, Result};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::sea_query::{Expr, Func, OnConflict};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tokio::task;

use crate::entities::users;

/// User data returned from the repository (without the password hash)
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub must_change_password: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            must_change_password: model.must_change_password,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Pre-hashed row staged by a bulk import.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Get user by username. Identity matching is case-insensitive.
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = self
            .find_model_by_username(username)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(User::from))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    /// List all users ordered by username
    pub async fn list(&self) -> Result<Vec<User>> {
        let users = users::Entity::find()
            .order_by_asc(users::Column::Username)
            .all(&self.conn)
            .await
            .context("Failed to list users")?;

        Ok(users.into_iter().map(User::from).collect())
    }

    /// Case-insensitive existence check on the username identity field
    pub async fn exists(&self, username: &str) -> Result<bool> {
        let user = self
            .find_model_by_username(username)
            .await
            .context("Failed to check username existence")?;

        Ok(user.is_some())
    }

    /// Create a user, hashing the password. Returns `None` when the store
    /// rejects the row as a duplicate identity.
    pub async fn create(&self, username: &str, password: &str) -> Result<Option<User>> {
        let password = password.to_string();
        let password_hash = task::spawn_blocking(move || hash_password(&password))
            .await
            .context("Password hashing task panicked")??;

        let now = chrono::Utc::now().to_rfc3339();
        let model = users::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            must_change_password: Set(false),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let insert = users::Entity::insert(model)
            .on_conflict(OnConflict::new().do_nothing().to_owned())
            .exec(&self.conn)
            .await;

        match insert {
            Ok(result) => self.get_by_id(result.last_insert_id).await,
            Err(DbErr::RecordNotInserted) => Ok(None),
            Err(e) => Err(e).context("Failed to insert user"),
        }
    }

    /// Delete a user by ID. Returns false when no row matched.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete user")?;

        Ok(result.rows_affected > 0)
    }

    /// Verify password for a user.
    /// Argon2 verification is CPU-bound, so it runs under `spawn_blocking`
    /// instead of stalling the async runtime.
    pub async fn verify_password(&self, username: &str, password: &str) -> Result<bool> {
        let user = self
            .find_model_by_username(username)
            .await
            .context("Failed to query user for password verification")?;

        let Some(user) = user else {
            return Ok(false);
        };

        let password_hash = user.password_hash;
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            let argon2 = Argon2::default();
            Ok::<bool, anyhow::Error>(
                argon2
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")??;

        Ok(is_valid)
    }

    /// Self-service password update: stores the new hash and clears the
    /// rotation flag in the same write.
    pub async fn update_password(&self, username: &str, new_password: &str) -> Result<()> {
        let user = self
            .find_model_by_username(username)
            .await
            .context("Failed to query user for password update")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {username}"))?;

        let password = new_password.to_string();
        let new_hash = task::spawn_blocking(move || hash_password(&password))
            .await
            .context("Password hashing task panicked")??;

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(new_hash);
        active.must_change_password = Set(false);
        active.updated_at = Set(now);
        active.update(&self.conn).await?;

        Ok(())
    }

    /// Admin-initiated reset: stores the new hash and raises the rotation
    /// flag so the owner must pick their own password at next sign-in.
    pub async fn reset_password(&self, id: i32, new_password: &str) -> Result<()> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for password reset")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {id}"))?;

        let password = new_password.to_string();
        let new_hash = task::spawn_blocking(move || hash_password(&password))
            .await
            .context("Password hashing task panicked")??;

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(new_hash);
        active.must_change_password = Set(true);
        active.updated_at = Set(now);
        active.update(&self.conn).await?;

        Ok(())
    }

    /// Insert a batch of pre-hashed rows in one transaction. Rows the
    /// store rejects as duplicate identities are skipped, not fatal; their
    /// usernames are returned so the caller can reclassify them.
    pub async fn insert_batch(&self, rows: Vec<NewUser>) -> Result<Vec<String>> {
        let txn = self
            .conn
            .begin()
            .await
            .context("Failed to open import transaction")?;

        let now = chrono::Utc::now().to_rfc3339();
        let mut skipped = Vec::new();

        for row in rows {
            let model = users::ActiveModel {
                username: Set(row.username.clone()),
                password_hash: Set(row.password_hash),
                must_change_password: Set(false),
                created_at: Set(now.clone()),
                updated_at: Set(now.clone()),
                ..Default::default()
            };

            let insert = users::Entity::insert(model)
                .on_conflict(OnConflict::new().do_nothing().to_owned())
                .exec(&txn)
                .await;

            match insert {
                Ok(_) => {}
                Err(DbErr::RecordNotInserted) => skipped.push(row.username),
                Err(e) => return Err(e).context("Failed to insert imported user"),
            }
        }

        txn.commit()
            .await
            .context("Failed to commit import transaction")?;

        Ok(skipped)
    }

    async fn find_model_by_username(&self, username: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(users::Column::Username)))
                    .eq(username.to_lowercase()),
            )
            .one(&self.conn)
            .await
    }
}

/// Hash a password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}
