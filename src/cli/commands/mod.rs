//! CLI command implementations

pub mod health;
pub mod init;
pub mod providers;
pub mod validate;
