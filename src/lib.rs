//! romshelf
//!
//! Composition root for the game-library browser state layer.

pub mod bootstrap;
