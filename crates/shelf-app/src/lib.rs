//! romshelf store layer
//!
//! Observable console, game and view-selection state over the catalog
//! gateway, with fetch deduplication and active-console cascading.

mod container;
mod deps;
pub mod stores;

pub use container::StoreContainer;
pub use deps::StoreDeps;
pub use stores::{
    ActiveConsoleChange, ActiveConsoleObserver, ConsoleCatalog, ConsoleFilter, ConsoleStore,
    FetchOutcome, GameStore, LoadState, Observable, UiStateStore,
};
