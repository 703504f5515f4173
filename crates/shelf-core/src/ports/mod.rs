//! Port interfaces for the store layer
//!
//! Ports define the contract between the stores and whatever process actually
//! owns the catalog. The stores only ever talk to the backend through these
//! traits, so the native backend, a fixture file, or a test double can stand
//! behind them interchangeably.

pub mod catalog_gateway;
pub mod errors;

pub use catalog_gateway::CatalogGatewayPort;
pub use errors::GatewayError;
