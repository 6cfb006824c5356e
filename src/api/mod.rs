use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use time;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, DefaultImportService, ImportService, PersonService, SeaOrmAuthService,
    SeaOrmPersonService, SeaOrmUserAdminService, UserAdminService,
};

pub mod auth;
mod error;
mod export;
mod observability;
mod people;
mod types;
mod users;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,

    pub store: Store,

    pub auth: Arc<dyn AuthService>,

    pub users: Arc<dyn UserAdminService>,

    pub people: Arc<dyn PersonService>,

    pub imports: Arc<dyn ImportService>,
}

#[must_use]
pub fn create_app_state(config: Config, store: Store) -> Arc<AppState> {
    let auth: Arc<dyn AuthService> = Arc::new(SeaOrmAuthService::new(store.clone()));
    let users: Arc<dyn UserAdminService> = Arc::new(SeaOrmUserAdminService::new(store.clone()));
    let people: Arc<dyn PersonService> = Arc::new(SeaOrmPersonService::new(store.clone()));
    let imports: Arc<dyn ImportService> = Arc::new(DefaultImportService::new(store.clone()));

    Arc::new(AppState {
        config,
        store,
        auth,
        users,
        people,
        imports,
    })
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    Ok(create_app_state(config, store))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config.server.cors_allowed_origins.clone();
    let secure_cookies = state.config.server.secure_cookies;
    let session_minutes = state.config.server.session_minutes;
    let max_import_bytes = state.config.server.max_import_bytes;

    let protected_routes = create_protected_router();

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            session_minutes,
        )));

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .layer(session_layer)
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(DefaultBodyLimit::max(max_import_bytes))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn create_protected_router() -> Router<Arc<AppState>> {
    // Static segments (export, delete, import) are registered alongside
    // the {id} captures; the router prefers the static match.
    let rotation_gated = Router::new()
        .route("/users", get(users::list_users))
        .route("/users", post(users::create_user))
        .route("/users/{id}", delete(users::delete_user))
        .route("/users/{id}/password", put(users::reset_password))
        .route("/users/import", post(users::import_users))
        .route("/people", get(people::list_people))
        .route("/people", post(people::create_person))
        .route("/people/export", get(export::export_people))
        .route("/people/delete", post(people::delete_people))
        .route("/people/import", post(people::import_people))
        .route("/people/{id}", get(people::get_person))
        .route("/people/{id}", put(people::update_person))
        .route("/people/{id}", delete(people::delete_person))
        .route_layer(middleware::from_fn(auth::enforce_password_rotation));

    // The password-change flow stays reachable while an account is
    // flagged for rotation; only the session check applies to it.
    Router::new()
        .route("/auth/me", get(auth::current_user))
        .route("/auth/password", put(auth::change_password))
        .merge(rotation_gated)
        .route_layer(middleware::from_fn(auth::require_session))
        .route_layer(middleware::from_fn(observability::no_store_headers))
}
