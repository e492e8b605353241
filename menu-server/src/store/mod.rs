//! Menu store backends
//!
//! | `DB_URI` scheme | Backend |
//! |-----------------|---------|
//! | `memory://` | [`MemoryMenuStore`] |
//! | anything else (`mem://`, `rocksdb://`, `ws://`, ...) | [`SurrealMenuStore`] |

pub mod memory;
pub mod surreal;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use shared::models::FoodCreate;
use shared::store::{MenuStore, StoreResult};

pub use memory::MemoryMenuStore;
pub use surreal::SurrealMenuStore;

pub const MEMORY_SCHEME: &str = "memory://";

/// Open the store named by `db_uri`
pub async fn open_store(db_uri: &str) -> StoreResult<Arc<dyn MenuStore>> {
    if db_uri.starts_with(MEMORY_SCHEME) {
        tracing::info!("Using in-memory menu store");
        return Ok(Arc::new(MemoryMenuStore::new()));
    }
    Ok(Arc::new(SurrealMenuStore::connect(db_uri).await?))
}

/// Load a JSON array of foods into an empty store
///
/// Returns the number of items added. A store that already has items is left
/// untouched.
pub async fn seed_from_file(store: &dyn MenuStore, path: impl AsRef<Path>) -> anyhow::Result<usize> {
    let path = path.as_ref();
    let existing = store.list_food_items().await?;
    if !existing.is_empty() {
        tracing::info!(items = existing.len(), "Store already populated, skipping seed");
        return Ok(0);
    }

    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;
    let items: Vec<FoodCreate> = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid seed file {}", path.display()))?;

    let mut added = 0;
    for item in items {
        let name = item.name.clone();
        store
            .add_food_item(item)
            .await
            .with_context(|| format!("Failed to seed food {name:?}"))?;
        added += 1;
    }
    tracing::info!(items = added, "Seeded menu store");
    Ok(added)
}
