//! ID type wrappers for type safety.
//!
//! Catalog identities are the backend's integer primary keys. Equality is by
//! value, so two ids compare equal whenever the backend row is the same.

mod id_macro;

use serde::{Deserialize, Serialize};

use id_macro::impl_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsoleId(i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RomId(i32);

impl_id!(ConsoleId, GameId, RomId);
