//! Service API surface
//!
//! Endpoint paths and the JSON request/response types exchanged with the
//! Jingongo backend.

pub mod endpoints;
pub mod types;

pub use types::*;
