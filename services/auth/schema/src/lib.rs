//! sea-orm entities for the auth service tables.

pub mod auth_codes;
pub mod sessions;
pub mod students;
