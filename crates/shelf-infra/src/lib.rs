//! Infrastructure adapters for romshelf: catalog gateways and config loading.

pub mod config;
pub mod gateway;

pub use config::{load_config, load_config_or_default};
pub use gateway::{CatalogSnapshot, InMemoryCatalogGateway, JsonCatalogGateway, ResilientGateway};
