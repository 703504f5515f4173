//! Catalog gateway port - the backend process boundary
//!
//! Every call is a single-shot request/response: no streaming, no pagination.
//! Responses are authoritative and total; callers replace their state with
//! them wholesale.

use async_trait::async_trait;

use super::GatewayError;
use crate::catalog::{Console, ConsoleWithGameRoms, Game, GameWithRoms};
use crate::ids::ConsoleId;

#[async_trait]
pub trait CatalogGatewayPort: Send + Sync {
    /// Full console catalog.
    async fn list_consoles(&self) -> Result<Vec<Console>, GatewayError>;

    /// A console looked up by display name, with all of its games and ROMs.
    ///
    /// Returns [`GatewayError::NotFound`] when no console carries that name.
    async fn list_consoles_with_games(
        &self,
        console_name: &str,
    ) -> Result<ConsoleWithGameRoms, GatewayError>;

    /// Full game catalog, unfiltered and without ROMs.
    async fn list_games(&self) -> Result<Vec<Game>, GatewayError>;

    /// Games (with ROM files) belonging to one console.
    async fn list_games_for_console(
        &self,
        console_id: ConsoleId,
    ) -> Result<Vec<GameWithRoms>, GatewayError>;
}
