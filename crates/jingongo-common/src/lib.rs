//! Jingongo Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Ambient utilities shared by the Jingongo SDK and CLI.
//!
//! - **Logging**: tracing subscriber setup driven by [`logging::LogConfig`]
//! - **Formatting**: human-readable byte sizes for progress and log output
//!
//! # Example
//!
//! ```no_run
//! use jingongo_common::logging::{init_logging, LogConfig};
//!
//! let config = LogConfig::from_env().unwrap_or_default();
//! init_logging(&config).ok();
//! tracing::info!("SDK ready");
//! ```

pub mod format;
pub mod logging;

pub use format::format_bytes;
