//! Catalog client: typed wrappers over the product HTTP API plus the view
//! state a catalog frontend keeps (listing, detail/edit, add form).

pub mod api;
pub mod debounce;
pub mod display;
pub mod errors;
pub mod form;
pub mod types;
pub mod views;

pub use api::CatalogApi;
pub use errors::ClientError;
