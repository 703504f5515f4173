//! # Store Dependencies / Store 依赖
//!
//! Dependency grouping for [`crate::StoreContainer`] construction.
//! 此模块定义 [`crate::StoreContainer`] 构造所需的依赖分组。
//!
//! **Note / 注意**: This is NOT a Builder pattern.
//! **这不是 Builder 模式。**
//! - No build steps / 无构建步骤
//! - No default values / 无默认值
//! - Just parameter grouping / 仅用于参数打包

use std::sync::Arc;

use shelf_core::{CatalogGatewayPort, StoreSettings};
use tokio::runtime::Handle;

/// Everything the stores need from the outside world.
/// Store 从外部获取的全部依赖。
pub struct StoreDeps {
    /// Backend boundary shared by every fetching store.
    pub gateway: Arc<dyn CatalogGatewayPort>,
    /// Runtime the stores spawn their fetches on.
    pub runtime: Handle,
    pub settings: StoreSettings,
}
