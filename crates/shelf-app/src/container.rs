//! # Store Container / Store 容器
//!
//! One instance of every store for the session, built from explicit deps.
//! 每个会话持有每种 store 的唯一实例，由显式依赖构造，不使用全局单例。

use shelf_core::StoreError;
use tracing::info;

use crate::stores::{ConsoleFilter, ConsoleStore, GameStore, UiStateStore};
use crate::StoreDeps;

pub struct StoreContainer {
    consoles: ConsoleStore,
    games: GameStore,
    ui: UiStateStore,
}

impl StoreContainer {
    /// Build the stores. The game store subscribes to the console store here.
    pub fn new(deps: StoreDeps) -> Self {
        let StoreDeps {
            gateway,
            runtime,
            settings,
        } = deps;

        let consoles = ConsoleStore::new(
            gateway.clone(),
            runtime.clone(),
            ConsoleFilter::from_settings(&settings),
        );
        let games = GameStore::new(&consoles, gateway, runtime);

        Self {
            consoles,
            games,
            ui: UiStateStore::new(),
        }
    }

    pub fn consoles(&self) -> &ConsoleStore {
        &self.consoles
    }

    pub fn games(&self) -> &GameStore {
        &self.games
    }

    pub fn ui(&self) -> &UiStateStore {
        &self.ui
    }

    /// Load the console catalog before first render.
    pub async fn ensure_initialized(&self) -> Result<(), StoreError> {
        self.consoles.ensure_initialized().await?;
        info!(
            consoles = self.consoles.consoles().len(),
            "store container initialized"
        );
        Ok(())
    }
}
