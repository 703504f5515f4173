//! View-selection values shared with the UI layer.

use serde::{Deserialize, Serialize};

/// Which main panel is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiPanel {
    #[default]
    Game,
    File,
}
