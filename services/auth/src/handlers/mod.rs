pub mod auth_code;
pub mod cleanup;
pub mod health;
pub mod token;
