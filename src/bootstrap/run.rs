//! Headless session: load the catalog, pick a console, load its games.

use anyhow::Context;
use shelf_app::StoreContainer;
use shelf_core::{AppConfig, Console};
use tokio::runtime::Handle;
use tracing::{info, warn};

use super::wiring::{build_gateway, build_store_container};

/// Run one browsing session.
///
/// `console_name` picks the console to open; without it the first console
/// in the library (or the first in the catalog) is used.
pub async fn run_app(config: AppConfig, console_name: Option<String>) -> anyhow::Result<()> {
    let gateway = build_gateway(&config);
    let stores = build_store_container(&config, gateway, Handle::current());

    if config.stores.auto_initialize {
        stores
            .ensure_initialized()
            .await
            .context("Failed to load console catalog")?;
    } else {
        stores
            .consoles()
            .fetch_consoles()
            .await
            .context("Failed to load console catalog")?;
    }

    let Some(console) = pick_console(&stores, console_name.as_deref()) else {
        warn!("no console to open");
        return Ok(());
    };

    stores.ui().set_active_ui_console(console.name.clone());
    stores.consoles().set_active_console_id(console.id);
    stores.games().wait_idle().await;

    if let Some(err) = stores.games().error() {
        return Err(err).with_context(|| format!("Failed to load games for {}", console.name));
    }

    for entry in stores.games().games() {
        info!(
            game = %entry.game.title,
            roms = entry.roms.len(),
            "game"
        );
    }
    info!(
        console = %console.name,
        games = stores.games().games().len(),
        "session ready"
    );
    Ok(())
}

fn pick_console(stores: &StoreContainer, console_name: Option<&str>) -> Option<Console> {
    let consoles = stores.consoles();
    match console_name {
        Some(name) => consoles.consoles().into_iter().find(|c| c.name == name),
        None => consoles
            .consoles_in_library()
            .into_iter()
            .next()
            .or_else(|| consoles.consoles().into_iter().next()),
    }
}
