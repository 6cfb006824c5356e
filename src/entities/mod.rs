pub mod prelude;

pub mod people;
pub mod users;
