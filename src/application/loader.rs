use crate::domain::ports::{ResourceFetcher, ScriptLoad, ScriptLoader};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

/// Loads each script URL at most once per process.
///
/// Concurrent callers for the same URL share a single in-flight fetch.
/// Only successful loads are remembered; a failed load is retried by the next
/// caller.
pub struct CachedScriptLoader<F> {
    fetcher: F,
    loaded: Mutex<HashMap<String, Arc<OnceCell<()>>>>,
}

impl<F: ResourceFetcher> CachedScriptLoader<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            loaded: Mutex::new(HashMap::new()),
        }
    }

    async fn cell_for(&self, url: &str) -> Arc<OnceCell<()>> {
        let mut loaded = self.loaded.lock().await;
        loaded.entry(url.to_string()).or_default().clone()
    }
}

#[async_trait]
impl<F: ResourceFetcher> ScriptLoader for CachedScriptLoader<F> {
    async fn load(&self, url: &str) -> ScriptLoad {
        let cell = self.cell_for(url).await;
        if cell.initialized() {
            debug!(%url, "script already loaded");
            return ScriptLoad::Loaded;
        }

        match cell
            .get_or_try_init(|| async {
                info!(%url, "loading checkout script");
                self.fetcher.fetch(url).await
            })
            .await
        {
            Ok(_) => ScriptLoad::Loaded,
            Err(e) => {
                warn!(%url, error = %e, "checkout script failed to load");
                ScriptLoad::Failed(e.to_string())
            }
        }
    }
}
