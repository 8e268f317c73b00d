use log::{error, info};
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::catalog::model::Catalog;
use crate::catalog::source::CatalogSource;
use crate::errors::CatalogLoadError;

// @module: Session-wide holder of the loaded catalog

/// Holds the current catalog and the state of its loading
#[derive(Debug)]
pub struct CatalogStore {
    // @field: Where load() fetches from
    source: Arc<dyn CatalogSource>,
    // @field: Last successfully loaded catalog
    catalog: RwLock<Option<Arc<Catalog>>>,
    // @field: Message of the last failed load
    error: RwLock<Option<String>>,
    // @field: True while a load is in progress
    loading: AtomicBool,
}

/// Keeps the loading flag raised for as long as it lives
struct LoadingGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> LoadingGuard<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self { flag }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

impl CatalogStore {
    /// Create an empty store reading from the given source
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            catalog: RwLock::new(None),
            error: RwLock::new(None),
            loading: AtomicBool::new(false),
        }
    }

    /// Fetch and parse the dataset, replacing the held catalog on success.
    ///
    /// On failure the previously loaded catalog, if any, is kept untouched.
    pub async fn load(&self) -> Result<Arc<Catalog>, CatalogLoadError> {
        let _guard = LoadingGuard::raise(&self.loading);
        *self.error.write() = None;

        let location = self.source.location();
        let result = match self.source.fetch().await {
            Ok(bytes) => Catalog::from_slice(&bytes),
            Err(e) => Err(e),
        };

        match result {
            Ok(catalog) => {
                let catalog = Arc::new(catalog);
                info!(
                    "Loaded {} parts ({} words) from {}",
                    catalog.len(),
                    catalog.word_count(),
                    location
                );
                *self.catalog.write() = Some(Arc::clone(&catalog));
                Ok(catalog)
            }
            Err(e) => {
                error!("Failed to load vocabulary from {}: {}", location, e);
                *self.error.write() = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Snapshot of the current catalog
    pub fn catalog(&self) -> Option<Arc<Catalog>> {
        self.catalog.read().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Message of the last failed load, cleared when a new load starts
    pub fn last_error(&self) -> Option<String> {
        self.error.read().clone()
    }

    pub fn source(&self) -> &Arc<dyn CatalogSource> {
        &self.source
    }
}
