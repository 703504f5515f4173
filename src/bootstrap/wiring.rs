//! Composition root: concrete adapters in, store container out.

use std::sync::Arc;

use shelf_app::{StoreContainer, StoreDeps};
use shelf_core::{AppConfig, CatalogGatewayPort};
use shelf_infra::{JsonCatalogGateway, ResilientGateway};
use tokio::runtime::Handle;

/// File-backed catalog behind the timeout/retry wrapper.
pub fn build_gateway(config: &AppConfig) -> Arc<dyn CatalogGatewayPort> {
    let backend: Arc<dyn CatalogGatewayPort> =
        Arc::new(JsonCatalogGateway::new(config.catalog_path.clone()));
    Arc::new(ResilientGateway::new(backend, config.gateway.clone()))
}

pub fn build_store_container(
    config: &AppConfig,
    gateway: Arc<dyn CatalogGatewayPort>,
    runtime: Handle,
) -> StoreContainer {
    StoreContainer::new(StoreDeps {
        gateway,
        runtime,
        settings: config.stores.clone(),
    })
}
