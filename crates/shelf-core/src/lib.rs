//! # shelf-core
//!
//! Core domain models and ports for romshelf.
//!
//! This crate holds the catalog entities, the backend gateway contract and
//! the configuration DTO, without any runtime or infrastructure dependencies.

pub mod catalog;
pub mod config;
pub mod error;
pub mod ids;
pub mod ports;
pub mod ui;

// Re-export commonly used types at the crate root
pub use catalog::{Console, ConsoleWithGameRoms, Game, GameWithRoms, Rom};
pub use config::{AppConfig, GatewaySettings, StoreSettings};
pub use error::StoreError;
pub use ids::{ConsoleId, GameId, RomId};
pub use ports::{CatalogGatewayPort, GatewayError};
pub use ui::UiPanel;
