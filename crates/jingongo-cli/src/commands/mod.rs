//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function.

pub mod convert;
pub mod download;
pub mod generate_key;
pub mod health;
pub mod list;
pub mod portal;
pub mod status;
