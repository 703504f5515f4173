//! # Console Store / 主机目录 Store
//!
//! Source of truth for the console catalog and the globally active console.
//! 主机目录与全局当前主机选择的唯一数据源。
//!
//! ## Behavior / 行为
//!
//! - The catalog and its in-library projection are published together as one
//!   [`ConsoleCatalog`] value, so subscribers never see one without the other.
//!   目录与"已入库"投影作为同一个值发布。
//! - Any subscription taken while the store is uninitialized starts the
//!   initial load, unless a fetch is already in flight. A failed initial load
//!   is retried by the next subscription.
//!   未初始化时的任意订阅都会触发首次加载；失败后下一次订阅会重试。
//! - Active-console observers run synchronously, before the new id is
//!   published to watch subscribers.
//!   当前主机观察者在新 id 发布前同步执行。

use std::sync::{Arc, Mutex, PoisonError};

use shelf_core::{CatalogGatewayPort, Console, ConsoleId, StoreError, StoreSettings};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::load_state::{join_fetch, FetchOutcome, FetchTicket, LoadState, Settled};
use super::Observable;

/// Restriction applied to every fetched console list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleFilter {
    /// Keep consoles whose name contains the needle, ignoring case.
    NameContains(String),
}

impl ConsoleFilter {
    pub fn from_settings(settings: &StoreSettings) -> Option<Self> {
        settings
            .console_name_filter
            .clone()
            .map(ConsoleFilter::NameContains)
    }

    pub fn matches(&self, console: &Console) -> bool {
        match self {
            ConsoleFilter::NameContains(needle) => console.name_contains(needle),
        }
    }
}

/// The stored console list with its in-library projection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsoleCatalog {
    pub consoles: Vec<Console>,
    /// Consoles with `in_library` set, in catalog order.
    pub in_library: Vec<Console>,
}

impl ConsoleCatalog {
    fn new(consoles: Vec<Console>) -> Self {
        let in_library = consoles.iter().filter(|c| c.in_library).cloned().collect();
        Self {
            consoles,
            in_library,
        }
    }
}

/// One transition of the active console selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveConsoleChange {
    pub previous: Option<ConsoleId>,
    pub current: Option<ConsoleId>,
}

impl ActiveConsoleChange {
    /// A console is now selected and it is not the one selected before.
    pub fn is_new_selection(&self) -> bool {
        self.current.is_some() && self.current != self.previous
    }
}

/// Receives active-console changes synchronously, before the new id is
/// published to watch subscribers.
///
/// Called with the console store's observer lock held: implementations must
/// not call back into [`ConsoleStore`] mutators.
pub trait ActiveConsoleObserver: Send + Sync {
    fn on_active_console_changed(&self, change: ActiveConsoleChange);
}

#[derive(Clone)]
pub struct ConsoleStore {
    inner: Arc<ConsoleStoreInner>,
}

struct ConsoleStoreInner {
    gateway: Arc<dyn CatalogGatewayPort>,
    runtime: Handle,
    filter: Option<ConsoleFilter>,
    catalog: Observable<ConsoleCatalog>,
    active_console_id: Observable<Option<ConsoleId>>,
    load: Arc<LoadState>,
    observers: Mutex<Vec<Arc<dyn ActiveConsoleObserver>>>,
}

impl ConsoleStore {
    /// Create an empty, uninitialized store.
    /// 创建空的、未初始化的 store。
    ///
    /// Nothing is fetched here. The catalog loads on the first subscription,
    /// on [`ConsoleStore::ensure_initialized`], or on an explicit
    /// [`ConsoleStore::fetch_consoles`]. Fetches are spawned on `runtime`,
    /// and `filter` is applied to every response before it is stored.
    pub fn new(
        gateway: Arc<dyn CatalogGatewayPort>,
        runtime: Handle,
        filter: Option<ConsoleFilter>,
    ) -> Self {
        Self {
            inner: Arc::new(ConsoleStoreInner {
                gateway,
                runtime,
                filter,
                catalog: Observable::new(ConsoleCatalog::default()),
                active_console_id: Observable::new(None),
                load: Arc::new(LoadState::new("console")),
                observers: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn consoles(&self) -> Vec<Console> {
        self.inner.catalog.with(|c| c.consoles.clone())
    }

    pub fn consoles_in_library(&self) -> Vec<Console> {
        self.inner.catalog.with(|c| c.in_library.clone())
    }

    /// Live catalog and in-library projection.
    pub fn subscribe_catalog(&self) -> watch::Receiver<ConsoleCatalog> {
        self.request_initial_load();
        self.inner.catalog.subscribe()
    }

    pub fn console_by_id(&self, id: ConsoleId) -> Option<Console> {
        self.inner
            .catalog
            .with(|c| c.consoles.iter().find(|c| c.id == id).cloned())
    }

    pub fn active_console_id(&self) -> Option<ConsoleId> {
        self.inner.active_console_id.get()
    }

    pub fn subscribe_active_console_id(&self) -> watch::Receiver<Option<ConsoleId>> {
        self.request_initial_load();
        self.inner.active_console_id.subscribe()
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

    pub fn subscribe_is_loading(&self) -> watch::Receiver<bool> {
        self.request_initial_load();
        self.inner.load.subscribe_is_loading()
    }

    pub fn subscribe_is_initialized(&self) -> watch::Receiver<bool> {
        self.request_initial_load();
        self.inner.load.subscribe_is_initialized()
    }

    pub fn subscribe_error(&self) -> watch::Receiver<Option<StoreError>> {
        self.request_initial_load();
        self.inner.load.subscribe_error()
    }

    /// Resolves once no console fetch is in flight.
    pub async fn wait_idle(&self) {
        self.inner.load.wait_idle().await
    }

    /// Select a console. No check that `id` is in the current catalog.
    pub fn set_active_console_id(&self, id: ConsoleId) {
        self.replace_active(Some(id));
    }

    pub fn clear_active_console(&self) {
        self.replace_active(None);
    }

    fn replace_active(&self, next: Option<ConsoleId>) {
        let observers = self
            .inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let change = ActiveConsoleChange {
            previous: self.inner.active_console_id.get(),
            current: next,
        };
        for observer in observers.iter() {
            observer.on_active_console_changed(change);
        }
        self.inner.active_console_id.set(next);
    }

    /// Register for active-console changes.
    ///
    /// The observer is called once immediately with the current selection
    /// (as a change from `None`), then on every subsequent change.
    pub fn observe_active_console(&self, observer: Arc<dyn ActiveConsoleObserver>) {
        let mut observers = self
            .inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        observer.on_active_console_changed(ActiveConsoleChange {
            previous: None,
            current: self.inner.active_console_id.get(),
        });
        observers.push(observer);
    }

    /// Fetch the console catalog, unless a fetch is already in flight.
    ///
    /// Errors are returned and also published on the store's error field;
    /// the previous catalog is kept.
    pub async fn fetch_consoles(&self) -> Result<FetchOutcome, StoreError> {
        match self.spawn_fetch() {
            Some(handle) => join_fetch(handle).await,
            None => {
                debug!("console fetch already in flight");
                Ok(FetchOutcome::AlreadyLoading)
            }
        }
    }

    /// Load the catalog once. Waits on an in-flight fetch instead of
    /// issuing a second one; returns immediately once initialized.
    pub async fn ensure_initialized(&self) -> Result<(), StoreError> {
        if self.is_initialized() {
            return Ok(());
        }

        match self.fetch_consoles().await? {
            FetchOutcome::AlreadyLoading => {
                self.wait_idle().await;
                match self.error() {
                    Some(err) if !self.is_initialized() => Err(err),
                    _ => Ok(()),
                }
            }
            _ => Ok(()),
        }
    }

    fn request_initial_load(&self) {
        if self.is_initialized() {
            return;
        }
        // Detached: the outcome lands in the store's observable fields.
        if self.spawn_fetch().is_some() {
            debug!("console store observed before initialization, loading catalog");
        }
    }

    fn spawn_fetch(
        &self,
    ) -> Option<tokio::task::JoinHandle<Result<FetchOutcome, StoreError>>> {
        let ticket = self.inner.load.try_begin().ok()?;
        let inner = self.inner.clone();
        Some(
            self.inner
                .load
                .spawn_fetch(&self.inner.runtime, async move { inner.run_fetch(ticket).await }),
        )
    }
}

impl ConsoleStoreInner {
    async fn run_fetch(&self, ticket: FetchTicket) -> Result<FetchOutcome, StoreError> {
        info!("fetching consoles");

        let result = self
            .gateway
            .list_consoles()
            .await
            .map_err(StoreError::from)
            .and_then(|consoles| {
                if consoles.is_empty() {
                    Err(StoreError::EmptyResult("consoles"))
                } else {
                    Ok(self.apply_filter(consoles))
                }
            });

        match self
            .load
            .settle(ticket, result, |consoles| self.replace(consoles), |_| None::<()>)
        {
            Settled::Committed => Ok(FetchOutcome::Loaded),
            Settled::Stale(_) => Ok(FetchOutcome::Superseded),
            Settled::Failed(err) => {
                warn!(error = %err, "console fetch failed");
                Err(err)
            }
        }
    }

    fn apply_filter(&self, consoles: Vec<Console>) -> Vec<Console> {
        match &self.filter {
            Some(filter) => consoles.into_iter().filter(|c| filter.matches(c)).collect(),
            None => consoles,
        }
    }

    fn replace(&self, consoles: Vec<Console>) {
        info!(count = consoles.len(), "console catalog loaded");
        self.catalog.set(ConsoleCatalog::new(consoles));
    }
}
