/*!
 * Catalog sources.
 *
 * A source knows where the dataset lives and how to fetch its raw bytes:
 * - `HttpCatalogSource`: GET against the configured origin
 * - `FileCatalogSource`: read from the local filesystem
 */

use async_trait::async_trait;
use bytes::Bytes;
use log::debug;
use reqwest::Client;
use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::app_config::{CatalogConfig, SourceKind};
use crate::assets::AssetResolver;
use crate::errors::CatalogLoadError;

/// Common trait for everything the catalog can be loaded from
#[async_trait]
pub trait CatalogSource: Send + Sync + Debug {
    /// Fetch the raw dataset
    async fn fetch(&self) -> Result<Bytes, CatalogLoadError>;

    /// Human-readable location, used in log lines
    fn location(&self) -> String;
}

/// Fetches the dataset over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    /// Full dataset URL
    url: Url,
    /// HTTP client for making requests
    client: Client,
}

impl HttpCatalogSource {
    /// Create a source for a dataset URL
    pub fn new(url: Url, timeout: Duration) -> Result<Self, CatalogLoadError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogLoadError::Fetch(e.to_string()))?;
        Ok(Self { url, client })
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self) -> Result<Bytes, CatalogLoadError> {
        debug!("Requesting vocabulary from {}", self.url);
        let response = self.client.get(self.url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogLoadError::Status {
                status_code: status.as_u16(),
                url: self.url.to_string(),
            });
        }

        Ok(response.bytes().await?)
    }

    fn location(&self) -> String {
        self.url.to_string()
    }
}

/// Reads the dataset from a local file
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    async fn fetch(&self) -> Result<Bytes, CatalogLoadError> {
        debug!("Reading vocabulary from {}", self.path.display());
        let content = tokio::fs::read(&self.path).await?;
        Ok(Bytes::from(content))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Build the source described by the catalog configuration
pub fn from_config(config: &CatalogConfig) -> Result<Arc<dyn CatalogSource>, CatalogLoadError> {
    let resolver = AssetResolver::from_config(config)
        .map_err(|e| CatalogLoadError::InvalidLocation(format!("{}: {}", config.base_url, e)))?;
    let url = resolver
        .resolve(&config.catalog_path)
        .map_err(|e| CatalogLoadError::InvalidLocation(format!("{}: {}", config.catalog_path, e)))?;

    match config.source {
        SourceKind::Http => {
            let source = HttpCatalogSource::new(url, Duration::from_secs(config.timeout_secs))?;
            Ok(Arc::new(source))
        }
        SourceKind::File => {
            let path = url.to_file_path().map_err(|_| {
                CatalogLoadError::InvalidLocation(format!("{} is not a local path", url))
            })?;
            Ok(Arc::new(FileCatalogSource::new(path)))
        }
    }
}
