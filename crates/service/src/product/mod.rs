//! Product catalog module: domain types, validation, repository abstraction
//! with SeaORM and in-memory implementations, and the `ProductService`.

pub mod domain;
pub mod validation;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::{ListLimits, ProductService};
