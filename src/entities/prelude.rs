pub use super::people::Entity as People;
pub use super::users::Entity as Users;
