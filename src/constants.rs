/// The bootstrap account. It can never be deleted and is exempt from
/// forced password rotation; every protection check compares against this.
pub const ADMIN_USERNAME: &str = "admin";

pub mod password {

    pub const MIN_LEN: usize = 8;

    pub const MAX_LEN: usize = 12;
}

pub mod session {

    /// Session key holding the signed-in username.
    pub const USER_KEY: &str = "user";

    /// Session key mirroring the account's rotation flag so the gate
    /// does not re-read the database on every request.
    pub const MUST_CHANGE_KEY: &str = "must_change_password";
}

pub mod people {

    pub const MIN_YEAR_OF_BIRTH: i32 = 1900;

    pub const MAX_YEAR_OF_BIRTH: i32 = 2025;
}

pub mod import {

    /// How many duplicate identities the report summary names before
    /// collapsing the rest into a count.
    pub const MAX_DUPLICATES_SHOWN: usize = 5;
}

pub mod limits {

    pub const MAX_USERNAME_LEN: usize = 50;
}
