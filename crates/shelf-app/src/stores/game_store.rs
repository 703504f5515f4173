//! # Game Store / 游戏 Store
//!
//! Games (with ROM files) for the active console.
//! 当前主机下的游戏（含 ROM 文件）。
//!
//! ## Behavior / 行为
//!
//! - The store follows the console store's active selection: every switch to
//!   a different, non-null console starts a fetch for that console.
//!   当前主机切换为新的非空值时发起拉取。
//! - A response for a console that is no longer selected is dropped and the
//!   current one is fetched instead.
//!   过期主机的响应被丢弃，并为当前主机重新拉取。

use std::sync::Arc;

use shelf_core::{CatalogGatewayPort, ConsoleId, GameWithRoms, StoreError};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::console_store::{ActiveConsoleChange, ActiveConsoleObserver, ConsoleStore};
use super::load_state::{join_fetch, FetchOutcome, FetchTicket, LoadState, NotStarted, Settled};
use super::Observable;

#[derive(Clone)]
pub struct GameStore {
    inner: Arc<GameStoreInner>,
}

struct GameStoreInner {
    gateway: Arc<dyn CatalogGatewayPort>,
    runtime: Handle,
    games: Observable<Vec<GameWithRoms>>,
    /// Request key is the console the next fetch is for.
    load: Arc<LoadState<Option<ConsoleId>>>,
}

impl GameStore {
    /// Create the store and subscribe it to `consoles`.
    ///
    /// If a console is already active, its games start loading immediately.
    pub fn new(
        consoles: &ConsoleStore,
        gateway: Arc<dyn CatalogGatewayPort>,
        runtime: Handle,
    ) -> Self {
        let store = Self {
            inner: Arc::new(GameStoreInner {
                gateway,
                runtime,
                games: Observable::new(Vec::new()),
                load: Arc::new(LoadState::new("game")),
            }),
        };
        consoles.observe_active_console(Arc::new(store.clone()));
        store
    }

    /// Games of the last successful fetch, exactly as the gateway returned
    /// them.
    /// 最近一次成功拉取的游戏列表，保持网关返回的原样。
    ///
    /// Empty until the first fetch completes. A failed fetch, or clearing
    /// the selection, keeps the previous list.
    pub fn games(&self) -> Vec<GameWithRoms> {
        self.inner.games.get()
    }

    pub fn subscribe_games(&self) -> watch::Receiver<Vec<GameWithRoms>> {
        self.inner.games.subscribe()
    }

    pub fn subscribe_is_loading(&self) -> watch::Receiver<bool> {
        self.inner.load.subscribe_is_loading()
    }

    pub fn subscribe_is_initialized(&self) -> watch::Receiver<bool> {
        self.inner.load.subscribe_is_initialized()
    }

    pub fn subscribe_error(&self) -> watch::Receiver<Option<StoreError>> {
        self.inner.load.subscribe_error()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.load.is_loading()
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.load.is_initialized()
    }

    pub fn error(&self) -> Option<StoreError> {
        self.inner.load.error()
    }

    /// Resolves once the current fetch cycle, including any re-fetch for a
    /// newer selection, has finished.
    pub async fn wait_idle(&self) {
        self.inner.load.wait_idle().await
    }

    /// Fetch games for the active console.
    ///
    /// No-op while a fetch is in flight or when no console is selected.
    pub async fn fetch_games(&self) -> Result<FetchOutcome, StoreError> {
        match self.inner.load.try_begin_with(|console| *console) {
            Ok((ticket, console_id)) => join_fetch(self.spawn_fetch(ticket, console_id)).await,
            Err(NotStarted::InFlight) => {
                debug!("game fetch already in flight");
                Ok(FetchOutcome::AlreadyLoading)
            }
            Err(NotStarted::NotReady) => Ok(FetchOutcome::NoActiveConsole),
        }
    }

    fn spawn_fetch(
        &self,
        ticket: FetchTicket,
        console_id: ConsoleId,
    ) -> JoinHandle<Result<FetchOutcome, StoreError>> {
        let inner = self.inner.clone();
        self.inner.load.spawn_fetch(&self.inner.runtime, async move {
            inner.run_fetch(ticket, console_id).await
        })
    }
}

impl ActiveConsoleObserver for GameStore {
    fn on_active_console_changed(&self, change: ActiveConsoleChange) {
        let Some(console_id) = change.current else {
            self.inner.load.set_key(None);
            return;
        };
        if !change.is_new_selection() {
            return;
        }

        info!(console_id = %console_id, "new active console");
        if let Some(ticket) = self.inner.load.retarget(Some(console_id)) {
            // Detached: the outcome lands in the store's observable fields.
            drop(self.spawn_fetch(ticket, console_id));
        }
    }
}

impl GameStoreInner {
    async fn run_fetch(
        &self,
        ticket: FetchTicket,
        console_id: ConsoleId,
    ) -> Result<FetchOutcome, StoreError> {
        let mut next = Some((ticket, console_id));

        while let Some((ticket, console_id)) = next.take() {
            info!(console_id = %console_id, "fetching games");
            let result = self
                .gateway
                .list_games_for_console(console_id)
                .await
                .map_err(StoreError::from);

            match self.load.settle(
                ticket,
                result,
                |games| {
                    info!(console_id = %console_id, count = games.len(), "games loaded");
                    self.games.set(games);
                },
                |current| *current,
            ) {
                Settled::Committed => return Ok(FetchOutcome::Loaded),
                Settled::Failed(err) => {
                    warn!(console_id = %console_id, error = %err, "game fetch failed");
                    return Err(err);
                }
                Settled::Stale(reissued) => {
                    debug!(console_id = %console_id, "active console changed mid-fetch");
                    next = reissued;
                }
            }
        }

        Ok(FetchOutcome::Superseded)
    }
}
