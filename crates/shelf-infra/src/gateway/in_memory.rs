use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shelf_core::{
    CatalogGatewayPort, Console, ConsoleId, ConsoleWithGameRoms, Game, GameWithRoms, GatewayError,
};

/// Whole catalog as the backend would serve it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub consoles: Vec<Console>,
    #[serde(default)]
    pub games: Vec<GameWithRoms>,
}

impl CatalogSnapshot {
    pub fn games_for_console(&self, console_id: ConsoleId) -> Vec<GameWithRoms> {
        self.games
            .iter()
            .filter(|g| g.console_id() == console_id)
            .cloned()
            .collect()
    }

    pub fn console_with_games(
        &self,
        console_name: &str,
    ) -> Result<ConsoleWithGameRoms, GatewayError> {
        let console = self
            .consoles
            .iter()
            .find(|c| c.name == console_name)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("console {console_name}")))?;
        let games = self.games_for_console(console.id);
        Ok(ConsoleWithGameRoms { console, games })
    }

    pub fn all_games(&self) -> Vec<Game> {
        self.games.iter().map(|g| g.game.clone()).collect()
    }
}

/// Gateway over a catalog held in memory.
pub struct InMemoryCatalogGateway {
    snapshot: CatalogSnapshot,
}

impl InMemoryCatalogGateway {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl CatalogGatewayPort for InMemoryCatalogGateway {
    async fn list_consoles(&self) -> Result<Vec<Console>, GatewayError> {
        Ok(self.snapshot.consoles.clone())
    }

    async fn list_consoles_with_games(
        &self,
        console_name: &str,
    ) -> Result<ConsoleWithGameRoms, GatewayError> {
        self.snapshot.console_with_games(console_name)
    }

    async fn list_games(&self) -> Result<Vec<Game>, GatewayError> {
        Ok(self.snapshot.all_games())
    }

    async fn list_games_for_console(
        &self,
        console_id: ConsoleId,
    ) -> Result<Vec<GameWithRoms>, GatewayError> {
        Ok(self.snapshot.games_for_console(console_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::GameId;

    fn console(id: i32, name: &str) -> Console {
        Console {
            id: ConsoleId::new(id),
            name: name.to_string(),
            manufacturer: "Test".to_string(),
            abbreviation: "T".to_string(),
            in_library: true,
        }
    }

    fn game(id: i32, console: i32) -> GameWithRoms {
        GameWithRoms {
            game: Game {
                id: GameId::new(id),
                title: format!("Game {id}"),
                console_id: ConsoleId::new(console),
            },
            roms: Vec::new(),
        }
    }

    fn gateway() -> InMemoryCatalogGateway {
        InMemoryCatalogGateway::new(CatalogSnapshot {
            consoles: vec![console(1, "Nintendo 64"), console(2, "Sega Genesis")],
            games: vec![game(10, 1), game(11, 2), game(12, 1)],
        })
    }

    #[tokio::test]
    async fn test_games_for_console_keep_snapshot_order() {
        let games = gateway()
            .list_games_for_console(ConsoleId::new(1))
            .await
            .unwrap();

        let ids: Vec<_> = games.iter().map(|g| g.game.id.get()).collect();
        assert_eq!(ids, vec![10, 12]);
    }

    #[tokio::test]
    async fn test_console_with_games_by_name() {
        let result = gateway()
            .list_consoles_with_games("Sega Genesis")
            .await
            .unwrap();

        assert_eq!(result.console.id, ConsoleId::new(2));
        assert_eq!(result.games, vec![game(11, 2)]);
    }

    #[tokio::test]
    async fn test_unknown_console_name_is_not_found() {
        let err = gateway()
            .list_consoles_with_games("Vectrex")
            .await
            .unwrap_err();

        assert_eq!(err, GatewayError::NotFound("console Vectrex".into()));
    }

    #[tokio::test]
    async fn test_list_games_drops_roms() {
        let games = gateway().list_games().await.unwrap();
        assert_eq!(games.len(), 3);
        assert_eq!(games[0].title, "Game 10");
    }
}
