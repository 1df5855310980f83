//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access (`product::repository`).
//! - Keeps file handling behind the `storage::blob::BlobStorage` capability.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod pagination;
pub mod product;
pub mod runtime;
pub mod storage;
#[cfg(test)]
pub mod test_support;
