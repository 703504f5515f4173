//! Ephemeral view selection. No backend involvement.

use std::sync::Arc;

use shelf_core::UiPanel;
use tokio::sync::watch;
use tracing::debug;

use super::Observable;

#[derive(Clone, Default)]
pub struct UiStateStore {
    inner: Arc<UiStateInner>,
}

#[derive(Default)]
struct UiStateInner {
    active_ui: Observable<UiPanel>,
    active_console_name: Observable<Option<String>>,
}

impl UiStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_ui(&self) -> UiPanel {
        self.inner.active_ui.get()
    }

    pub fn subscribe_active_ui(&self) -> watch::Receiver<UiPanel> {
        self.inner.active_ui.subscribe()
    }

    pub fn set_active_ui(&self, panel: UiPanel) {
        self.inner.active_ui.set(panel);
    }

    /// Display name of the console the UI is showing.
    pub fn active_console_name(&self) -> Option<String> {
        self.inner.active_console_name.get()
    }

    pub fn subscribe_active_console_name(&self) -> watch::Receiver<Option<String>> {
        self.inner.active_console_name.subscribe()
    }

    pub fn set_active_ui_console(&self, name: impl Into<String>) {
        let name = name.into();
        debug!(console = %name, "active console set");
        self.inner.active_console_name.set(Some(name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_game_panel_without_console() {
        let ui = UiStateStore::new();
        assert_eq!(ui.active_ui(), UiPanel::Game);
        assert_eq!(ui.active_console_name(), None);
    }

    #[test]
    fn test_set_active_ui_is_read_back() {
        let ui = UiStateStore::new();
        ui.set_active_ui(UiPanel::File);
        assert_eq!(ui.active_ui(), UiPanel::File);
    }

    #[test]
    fn test_clones_share_state() {
        let ui = UiStateStore::new();
        let other = ui.clone();

        other.set_active_ui_console("Nintendo 64");

        assert_eq!(ui.active_console_name().as_deref(), Some("Nintendo 64"));
    }

    #[tokio::test]
    async fn test_subscribers_are_notified() {
        let ui = UiStateStore::new();
        let mut rx = ui.subscribe_active_ui();

        ui.set_active_ui(UiPanel::File);

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), UiPanel::File);
    }
}
