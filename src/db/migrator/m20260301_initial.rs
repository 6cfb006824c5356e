use crate::constants::ADMIN_USERNAME;
use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, Schema};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Bootstrap password for the seeded admin account. Rotation is not
/// forced on it; the admin account is exempt anyway.
const DEFAULT_ADMIN_PASSWORD: &[u8] = b"Admin123!";

/// Hash the bootstrap password using Argon2id
fn hash_default_password() -> String {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(DEFAULT_ADMIN_PASSWORD, &salt)
        .expect("Failed to hash default password")
        .to_string()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Users)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(People)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Identity fields are unique case-insensitively; the NOCASE
        // indexes make the store itself reject "Alice" next to "alice".
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_username_nocase \
                 ON users (username COLLATE NOCASE)",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_people_name_nocase \
                 ON people (forename COLLATE NOCASE, family_name COLLATE NOCASE)",
            )
            .await?;

        // Seed the bootstrap admin account
        let now = chrono::Utc::now().to_rfc3339();
        let password_hash = hash_default_password();

        let insert = sea_orm_migration::sea_query::Query::insert()
            .into_table(Users)
            .columns([
                crate::entities::users::Column::Username,
                crate::entities::users::Column::PasswordHash,
                crate::entities::users::Column::MustChangePassword,
                crate::entities::users::Column::CreatedAt,
                crate::entities::users::Column::UpdatedAt,
            ])
            .values_panic([
                ADMIN_USERNAME.into(),
                password_hash.into(),
                false.into(),
                now.clone().into(),
                now.into(),
            ])
            .to_owned();

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(People).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users).to_owned())
            .await?;

        Ok(())
    }
}
