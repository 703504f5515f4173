//! Catalog gateway adapters.

mod in_memory;
mod json_file;
mod resilient;

pub use in_memory::{CatalogSnapshot, InMemoryCatalogGateway};
pub use json_file::JsonCatalogGateway;
pub use resilient::ResilientGateway;
