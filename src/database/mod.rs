pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::DatabaseConfig;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{ResourceStore, StoreError};

/// Build the configured store: Postgres when a URL is present, otherwise in-memory
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn ResourceStore>, StoreError> {
    match config.url {
        Some(_) => {
            let store = PgStore::connect(config).await?;
            Ok(Arc::new(store))
        }
        None => {
            warn!("DATABASE_URL not set; using in-memory store (data is lost on restart)");
            info!("Created in-memory resource store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
