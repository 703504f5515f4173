//! # Fetch Bookkeeping / 拉取状态管理
//!
//! Every fetching store owns one [`LoadState`]. It carries the observable
//! `is_loading` / `is_initialized` / `error` fields and the mutex-protected
//! fetch cycle that enforces at most one outstanding fetch per store.
//! 每个拉取型 store 持有一个 [`LoadState`]，包含可观察的加载状态字段，
//! 以及由互斥锁保护、保证同一时刻最多一个请求在途的拉取周期。
//!
//! ## Behavior / 行为
//!
//! - Each fetch is tagged with the cycle's generation at the time it started.
//!   [`LoadState::retarget`] bumps the generation, so a response that arrives
//!   for an older generation is discarded instead of overwriting newer state.
//!   每个请求带有发起时的代数；过期代数的响应会被丢弃。
//! - Fetches run as spawned tasks. If a task dies without settling (the
//!   gateway panicked), the slot is released and a transport error is
//!   published, so the store never stays loading.
//!   请求任务异常退出时释放占位并发布错误，store 不会永久处于加载中。

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shelf_core::StoreError;
use tokio::runtime::Handle;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error};

use super::Observable;

/// What a fetch call ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A response was committed to the store.
    Loaded,
    /// Another fetch was already in flight; nothing was issued.
    AlreadyLoading,
    /// The game store has no active console to fetch for.
    NoActiveConsole,
    /// The response belonged to an outdated request and was dropped.
    Superseded,
}

/// Why [`LoadState::try_begin_with`] did not start a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NotStarted {
    InFlight,
    NotReady,
}

/// Proof that the holder owns the single in-flight slot.
#[must_use = "a begun fetch must be settled or the store stays loading"]
#[derive(Debug)]
pub(crate) struct FetchTicket {
    generation: u64,
}

pub(crate) enum Settled<R> {
    Committed,
    Failed(StoreError),
    /// The response was outdated. Carries a fresh ticket when the caller
    /// should fetch again for the current request key.
    Stale(Option<(FetchTicket, R)>),
}

struct FetchCycle<K> {
    in_flight: bool,
    generation: u64,
    key: K,
}

pub struct LoadState<K = ()> {
    store: &'static str,
    cycle: Mutex<FetchCycle<K>>,
    is_loading: Observable<bool>,
    is_initialized: Observable<bool>,
    error: Observable<Option<StoreError>>,
}

impl<K: Default> LoadState<K> {
    /// Create an idle, uninitialized state with the default request key.
    /// 创建空闲、未初始化的状态，请求键取默认值。
    ///
    /// `store` labels log lines and assertion messages.
    pub fn new(store: &'static str) -> Self {
        Self {
            store,
            cycle: Mutex::new(FetchCycle {
                in_flight: false,
                generation: 0,
                key: K::default(),
            }),
            is_loading: Observable::new(false),
            is_initialized: Observable::new(false),
            error: Observable::new(None),
        }
    }
}

impl<K> LoadState<K> {
    fn cycle(&self) -> MutexGuard<'_, FetchCycle<K>> {
        self.cycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading.get()
    }

    pub fn is_initialized(&self) -> bool {
        self.is_initialized.get()
    }

    pub fn error(&self) -> Option<StoreError> {
        self.error.get()
    }

    pub fn subscribe_is_loading(&self) -> tokio::sync::watch::Receiver<bool> {
        self.is_loading.subscribe()
    }

    pub fn subscribe_is_initialized(&self) -> tokio::sync::watch::Receiver<bool> {
        self.is_initialized.subscribe()
    }

    pub fn subscribe_error(&self) -> tokio::sync::watch::Receiver<Option<StoreError>> {
        self.error.subscribe()
    }

    /// Resolves once no fetch is in flight.
    pub async fn wait_idle(&self) {
        let mut rx = self.is_loading.subscribe();
        // The sender lives as long as `self`, so this cannot observe a closed channel.
        let _ = rx.wait_for(|loading| !*loading).await;
    }

    /// Claim the in-flight slot if the current request key is usable.
    ///
    /// `select` sees the current key and returns what the fetch needs, or
    /// `None` when there is nothing to fetch yet.
    pub(crate) fn try_begin_with<R>(
        &self,
        select: impl FnOnce(&K) -> Option<R>,
    ) -> Result<(FetchTicket, R), NotStarted> {
        let mut cycle = self.cycle();
        if cycle.in_flight {
            return Err(NotStarted::InFlight);
        }
        let selected = select(&cycle.key).ok_or(NotStarted::NotReady)?;
        cycle.in_flight = true;
        self.is_loading.set(true);
        Ok((
            FetchTicket {
                generation: cycle.generation,
            },
            selected,
        ))
    }

    pub(crate) fn try_begin(&self) -> Result<FetchTicket, NotStarted> {
        self.try_begin_with(|_| Some(())).map(|(ticket, ())| ticket)
    }

    /// Point the store at a new request key.
    ///
    /// Any fetch still in flight becomes stale. Returns a ticket when the
    /// slot was free and a fetch for `key` may start right away; otherwise
    /// the in-flight fetch picks the new key up when it settles.
    pub(crate) fn retarget(&self, key: K) -> Option<FetchTicket> {
        let mut cycle = self.cycle();
        cycle.generation += 1;
        cycle.key = key;
        if cycle.in_flight {
            return None;
        }
        cycle.in_flight = true;
        self.is_loading.set(true);
        Some(FetchTicket {
            generation: cycle.generation,
        })
    }

    /// Replace the request key without invalidating the in-flight fetch.
    pub(crate) fn set_key(&self, key: K) {
        self.cycle().key = key;
    }

    /// Finish the fetch owned by `ticket`.
    ///
    /// A current response is committed (or its error published) and the
    /// slot released. A stale response is dropped; if `reissue` yields a
    /// value for the current key the slot stays claimed and a fresh ticket
    /// is handed back, so `is_loading` never flickers between the two.
    pub(crate) fn settle<T, R>(
        &self,
        ticket: FetchTicket,
        result: Result<T, StoreError>,
        commit: impl FnOnce(T),
        reissue: impl FnOnce(&K) -> Option<R>,
    ) -> Settled<R> {
        let mut cycle = self.cycle();

        if !cycle.in_flight {
            debug_assert!(
                cycle.in_flight,
                "{}: fetch settled with no fetch in flight",
                self.store
            );
            error!(store = self.store, "fetch settled with no fetch in flight");
            return Settled::Stale(None);
        }

        if ticket.generation != cycle.generation {
            debug!(
                store = self.store,
                ticket = ticket.generation,
                current = cycle.generation,
                "dropping stale response"
            );
            if let Some(next) = reissue(&cycle.key) {
                return Settled::Stale(Some((
                    FetchTicket {
                        generation: cycle.generation,
                    },
                    next,
                )));
            }
            cycle.in_flight = false;
            self.is_loading.set(false);
            return Settled::Stale(None);
        }

        let settled = match result {
            Ok(value) => {
                commit(value);
                self.error.set_if_changed(None);
                self.is_initialized.set_if_changed(true);
                Settled::Committed
            }
            Err(err) => {
                self.error.set(Some(err.clone()));
                Settled::Failed(err)
            }
        };
        cycle.in_flight = false;
        self.is_loading.set(false);
        settled
    }
}

impl<K: Send + 'static> LoadState<K> {
    /// Run `fetch` on `runtime`, releasing the slot if it dies unsettled.
    ///
    /// The returned handle resolves to the fetch's own result, or to the
    /// transport error published by [`LoadState::abandon`].
    pub(crate) fn spawn_fetch<F>(
        self: &Arc<Self>,
        runtime: &Handle,
        fetch: F,
    ) -> JoinHandle<Result<FetchOutcome, StoreError>>
    where
        F: Future<Output = Result<FetchOutcome, StoreError>> + Send + 'static,
    {
        let task = runtime.spawn(fetch);
        let load = Arc::clone(self);
        runtime.spawn(async move {
            match task.await {
                Ok(result) => result,
                Err(err) => Err(load.abandon(err)),
            }
        })
    }
}

impl<K> LoadState<K> {
    /// Release the slot held by a fetch task that ended without settling.
    pub(crate) fn abandon(&self, cause: JoinError) -> StoreError {
        let err = StoreError::Transport(format!("fetch task failed: {cause}"));
        let mut cycle = self.cycle();
        error!(store = self.store, error = %err, "fetch task ended without settling");
        if cycle.in_flight {
            cycle.in_flight = false;
            self.error.set(Some(err.clone()));
            self.is_loading.set(false);
        }
        err
    }
}

/// Await a spawned fetch task.
pub(crate) async fn join_fetch(
    handle: JoinHandle<Result<FetchOutcome, StoreError>>,
) -> Result<FetchOutcome, StoreError> {
    handle
        .await
        .map_err(|e| StoreError::Transport(format!("fetch task failed: {e}")))?
}
