pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, SessionUser};
pub use auth_service_impl::SeaOrmAuthService;

pub mod user_admin_service;
pub mod user_admin_service_impl;
pub use user_admin_service::{AdminError, UserAdminService, UserInfo};
pub use user_admin_service_impl::SeaOrmUserAdminService;

pub mod person_service;
pub mod person_service_impl;
pub use person_service::{PersonError, PersonInput, PersonService};
pub use person_service_impl::SeaOrmPersonService;

pub mod import_service;
pub mod import_service_impl;
pub use import_service::{DuplicateRow, ImportError, ImportReport, ImportService, RowError};
pub use import_service_impl::DefaultImportService;
