//! Shared building blocks for the catalog crates: logging setup, wire types
//! used by more than one crate, and startup environment helpers.

pub mod types;
pub mod utils;
pub mod env;
