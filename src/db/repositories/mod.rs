pub mod person;
pub mod user;
