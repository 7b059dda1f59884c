//! CLI command implementations.

pub mod config;
pub mod providers;
pub mod run;
pub mod session;
pub mod types;
