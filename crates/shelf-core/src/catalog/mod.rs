//! Catalog domain models.
//!
//! These mirror the backend catalog rows the gateway hands back. They are
//! immutable snapshots: stores replace whole collections instead of editing
//! entries in place.

mod console;
mod game;

pub use console::{Console, ConsoleWithGameRoms};
pub use game::{Game, GameWithRoms, Rom};
