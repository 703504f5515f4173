use std::path::PathBuf;

use async_trait::async_trait;
use shelf_core::{
    CatalogGatewayPort, Console, ConsoleId, ConsoleWithGameRoms, Game, GameWithRoms, GatewayError,
};
use tracing::debug;

use super::CatalogSnapshot;

/// Gateway over a JSON catalog snapshot on disk.
///
/// The file is re-read on every call, so each response reflects whatever
/// the backend last exported.
pub struct JsonCatalogGateway {
    path: PathBuf,
}

impl JsonCatalogGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn snapshot(&self) -> Result<CatalogSnapshot, GatewayError> {
        debug!(path = %self.path.display(), "reading catalog snapshot");
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            GatewayError::Transport(format!("failed to read {}: {e}", self.path.display()))
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            GatewayError::Decode(format!("invalid catalog {}: {e}", self.path.display()))
        })
    }
}

#[async_trait]
impl CatalogGatewayPort for JsonCatalogGateway {
    async fn list_consoles(&self) -> Result<Vec<Console>, GatewayError> {
        Ok(self.snapshot().await?.consoles)
    }

    async fn list_consoles_with_games(
        &self,
        console_name: &str,
    ) -> Result<ConsoleWithGameRoms, GatewayError> {
        self.snapshot().await?.console_with_games(console_name)
    }

    async fn list_games(&self) -> Result<Vec<Game>, GatewayError> {
        Ok(self.snapshot().await?.all_games())
    }

    async fn list_games_for_console(
        &self,
        console_id: ConsoleId,
    ) -> Result<Vec<GameWithRoms>, GatewayError> {
        Ok(self.snapshot().await?.games_for_console(console_id))
    }
}
