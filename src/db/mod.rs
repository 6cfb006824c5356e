use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::person::{NewPerson, Person, PersonSortKey, SortOrder};
pub use repositories::user::{NewUser, User};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn person_repo(&self) -> repositories::person::PersonRepository {
        repositories::person::PersonRepository::new(self.conn.clone())
    }

    // ========== User Repository Methods ==========

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list().await
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        self.user_repo().exists(username).await
    }

    pub async fn create_user(&self, username: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().create(username, password).await
    }

    pub async fn delete_user(&self, id: i32) -> Result<bool> {
        self.user_repo().delete(id).await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn update_user_password(&self, username: &str, new_password: &str) -> Result<()> {
        self.user_repo()
            .update_password(username, new_password)
            .await
    }

    pub async fn reset_user_password(&self, id: i32, new_password: &str) -> Result<()> {
        self.user_repo().reset_password(id, new_password).await
    }

    pub async fn import_users(&self, rows: Vec<NewUser>) -> Result<Vec<String>> {
        self.user_repo().insert_batch(rows).await
    }

    // ========== Person Repository Methods ==========

    pub async fn list_people(
        &self,
        sort: PersonSortKey,
        order: SortOrder,
        search: Option<&str>,
    ) -> Result<Vec<Person>> {
        self.person_repo().list(sort, order, search).await
    }

    pub async fn get_person(&self, id: i32) -> Result<Option<Person>> {
        self.person_repo().get(id).await
    }

    pub async fn add_person(&self, row: NewPerson) -> Result<Option<Person>> {
        self.person_repo().insert(row).await
    }

    pub async fn update_person(&self, id: i32, row: NewPerson) -> Result<Option<Person>> {
        self.person_repo().update(id, row).await
    }

    pub async fn person_name_exists(
        &self,
        forename: &str,
        family_name: &str,
        exclude: Option<i32>,
    ) -> Result<bool> {
        self.person_repo()
            .exists(forename, family_name, exclude)
            .await
    }

    pub async fn remove_person(&self, id: i32) -> Result<bool> {
        self.person_repo().delete(id).await
    }

    pub async fn remove_people(&self, ids: &[i32]) -> Result<u64> {
        self.person_repo().delete_many(ids).await
    }

    pub async fn import_people(&self, rows: Vec<NewPerson>) -> Result<Vec<String>> {
        self.person_repo().insert_batch(rows).await
    }
}
