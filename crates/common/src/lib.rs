//! Shared helpers for the gateway crates: logging setup and wire types
//! that are not tied to the auth domain.

pub mod types;
pub mod utils;
