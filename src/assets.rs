use url::Url;

use crate::app_config::CatalogConfig;
use crate::errors::PlaybackError;

// @module: Resolution of catalog-relative asset paths

/// Joins catalog references with the configured origin and deployment prefix
#[derive(Debug, Clone)]
pub struct AssetResolver {
    // @field: Origin, always ending in '/'
    base: Url,
    // @field: Normalised prefix without trailing '/', e.g. "/wordtalktalk_tts"
    base_path: String,
}

impl AssetResolver {
    /// Create a resolver from an origin URL and a path prefix
    pub fn new(base_url: &str, base_path: &str) -> Result<Self, url::ParseError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            base,
            base_path: normalise_prefix(base_path),
        })
    }

    /// Create a resolver from the catalog section of the config
    pub fn from_config(config: &CatalogConfig) -> Result<Self, url::ParseError> {
        Self::new(&config.base_url, &config.base_path)
    }

    /// Resolve a reference taken from the catalog.
    ///
    /// References carrying their own scheme are returned unchanged; everything
    /// else is prefixed with the base path and joined onto the origin.
    pub fn resolve(&self, reference: &str) -> Result<Url, url::ParseError> {
        if let Ok(absolute) = Url::parse(reference) {
            return Ok(absolute);
        }

        let relative = reference.trim_start_matches('/');
        let prefixed = if self.base_path.is_empty() {
            relative.to_string()
        } else {
            format!("{}/{}", self.base_path.trim_start_matches('/'), relative)
        };
        self.base.join(&prefixed)
    }

    /// Resolve a clip reference, mapping failures to a playback error
    pub fn resolve_clip(&self, reference: &str) -> Result<Url, PlaybackError> {
        self.resolve(reference)
            .map_err(|_| PlaybackError::InvalidReference(reference.to_string()))
    }
}

fn normalise_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
