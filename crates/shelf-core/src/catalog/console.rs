use serde::{Deserialize, Serialize};

use super::GameWithRoms;
use crate::ids::ConsoleId;

/// A console known to the backend catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Console {
    pub id: ConsoleId,
    pub name: String,
    pub manufacturer: String,
    pub abbreviation: String,
    /// Whether the user has ROMs for this console. Older backends omit it.
    #[serde(default, alias = "inLibrary")]
    pub in_library: bool,
}

impl Console {
    /// Case-insensitive substring match against the display name.
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// A console together with every game (and its ROM files) filed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleWithGameRoms {
    #[serde(flatten)]
    pub console: Console,
    pub games: Vec<GameWithRoms>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn console(name: &str) -> Console {
        Console {
            id: ConsoleId::new(1),
            name: name.to_string(),
            manufacturer: "Nintendo".to_string(),
            abbreviation: "N64".to_string(),
            in_library: false,
        }
    }

    #[test]
    fn test_name_contains_ignores_case() {
        assert!(console("Nintendo 64").name_contains("nintendo"));
        assert!(console("Nintendo 64").name_contains("NINTENDO"));
        assert!(!console("Sega Genesis").name_contains("nintendo"));
    }

    #[test]
    fn test_in_library_defaults_to_false_when_missing() {
        let json = r#"{"id":3,"name":"Game Boy","manufacturer":"Nintendo","abbreviation":"GB"}"#;
        let parsed: Console = serde_json::from_str(json).unwrap();
        assert!(!parsed.in_library);
    }

    #[test]
    fn test_in_library_accepts_camel_case_key() {
        let json = r#"{"id":3,"name":"Game Boy","manufacturer":"Nintendo","abbreviation":"GB","inLibrary":true}"#;
        let parsed: Console = serde_json::from_str(json).unwrap();
        assert!(parsed.in_library);
    }

    #[test]
    fn test_console_with_game_roms_flattens_console_fields() {
        let json = r#"{"id":1,"name":"Nintendo 64","manufacturer":"Nintendo","abbreviation":"N64","games":[]}"#;
        let parsed: ConsoleWithGameRoms = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.console.id, ConsoleId::new(1));
        assert!(parsed.games.is_empty());
    }
}
