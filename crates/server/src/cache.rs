use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

/// Marks a previously rendered view as stale so the next request regenerates it.
#[async_trait]
pub trait ViewInvalidator: Send + Sync {
    async fn invalidate(&self, path: &str);
}

/// Rendered page bodies keyed by request path.
///
/// Every invalidation bumps the path's generation. A render started before an
/// invalidation carries the old generation and is refused by [`PageCache::put_if_current`].
#[derive(Default)]
pub struct PageCache {
    state: RwLock<CacheState>,
}

#[derive(Default)]
struct CacheState {
    pages: HashMap<String, String>,
    generations: HashMap<String, u64>,
}

impl PageCache {
    pub async fn get(&self, path: &str) -> Option<String> {
        self.state.read().await.pages.get(path).cloned()
    }

    /// Current generation for `path`; capture it before reading the data to render.
    pub async fn generation(&self, path: &str) -> u64 {
        self.state.read().await.generations.get(path).copied().unwrap_or_default()
    }

    /// Stores `body` unless `path` was invalidated after `generation` was captured.
    pub async fn put_if_current(&self, path: &str, body: String, generation: u64) -> bool {
        let mut state = self.state.write().await;
        let current = state.generations.get(path).copied().unwrap_or_default();
        if current != generation {
            return false;
        }

        state.pages.insert(path.to_string(), body);
        true
    }
}

#[async_trait]
impl ViewInvalidator for PageCache {
    async fn invalidate(&self, path: &str) {
        let mut state = self.state.write().await;
        let evicted = state.pages.remove(path).is_some();
        let generation = state.generations.entry(path.to_string()).or_default();
        *generation += 1;
        debug!(
            event_name = "view.cache.invalidated",
            path,
            evicted,
            generation = *generation,
            "cached view invalidated"
        );
    }
}
