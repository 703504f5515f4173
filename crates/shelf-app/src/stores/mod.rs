//! Observable state stores.
//!
//! `ConsoleStore` and `UiStateStore` are independent roots. `GameStore`
//! follows the console store's active selection; nothing depends on it.

pub mod console_store;
pub mod game_store;
mod load_state;
mod observable;
pub mod ui_state;

pub use console_store::{
    ActiveConsoleChange, ActiveConsoleObserver, ConsoleCatalog, ConsoleFilter, ConsoleStore,
};
pub use game_store::GameStore;
pub use load_state::{FetchOutcome, LoadState};
pub use observable::Observable;
pub use ui_state::UiStateStore;
