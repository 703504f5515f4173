use serde::{Deserialize, Serialize};

use crate::ids::{ConsoleId, GameId, RomId};

/// A game entry. `console_id` points at [`super::Console::id`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub title: String,
    pub console_id: ConsoleId,
}

/// Physical ROM file descriptor from a DAT catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rom {
    pub id: RomId,
    pub title: String,
    pub md5: String,
    pub crc: String,
    pub size: i64,
    pub game_id: GameId,
}

/// A game with its ROM files, in backend order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameWithRoms {
    #[serde(flatten)]
    pub game: Game,
    pub roms: Vec<Rom>,
}

impl GameWithRoms {
    pub fn console_id(&self) -> ConsoleId {
        self.game.console_id
    }
}
