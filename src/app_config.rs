use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use url::Url;

use crate::messages::Locale;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Where the vocabulary dataset and its audio live
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Playback defaults applied at startup
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// Language for user-visible messages
    #[serde(default)]
    pub locale: Locale,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Catalog source type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    // @source: Fetch over HTTP(S)
    #[default]
    Http,
    // @source: Read from the local filesystem
    File,
}

impl SourceKind {
    // @returns: Lowercase source identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Http => "http".to_string(),
            Self::File => "file".to_string(),
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

/// Catalog location configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CatalogConfig {
    // @field: Source type
    #[serde(default)]
    pub source: SourceKind,

    // @field: Origin the dataset and audio are served from
    #[serde(default = "default_base_url")]
    pub base_url: String,

    // @field: Deployment prefix, e.g. "/wordtalktalk_tts"
    #[serde(default)]
    pub base_path: String,

    // @field: Dataset path below the prefix
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::default(),
            base_url: default_base_url(),
            base_path: String::new(),
            catalog_path: default_catalog_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Playback defaults
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaybackConfig {
    /// Voices selected at startup, in playback order
    #[serde(default = "default_voices")]
    pub default_voices: Vec<String>,

    /// Whether the Korean clip follows the English ones
    #[serde(default = "default_true")]
    pub include_korean: bool,

    /// Whether finished words advance automatically
    #[serde(default)]
    pub auto_advance: bool,

    /// Pause before auto-advancing to the next word, in milliseconds
    #[serde(default = "default_advance_delay_ms")]
    pub advance_delay_ms: u64,

    /// Pause between two clips of the same word, in milliseconds
    #[serde(default)]
    pub clip_gap_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            default_voices: default_voices(),
            include_korean: true,
            auto_advance: false,
            advance_delay_ms: default_advance_delay_ms(),
            clip_gap_ms: 0,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Map to the `log` crate filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Upper bound for both playback pauses
pub const MAX_DELAY_MS: u64 = 10_000;

fn default_base_url() -> String {
    "http://localhost:5173".to_string()
}

fn default_catalog_path() -> String {
    "/data/vocabulary.json".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_voices() -> Vec<String> {
    vec!["danna".to_string()]
}

fn default_advance_delay_ms() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .context(format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Load the configuration, writing a default one first if the file is missing
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }

        log::warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Save the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .context(format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let base = Url::parse(&self.catalog.base_url)
            .context(format!("Invalid base URL: {}", self.catalog.base_url))?;

        match (self.catalog.source, base.scheme()) {
            (SourceKind::Http, "http" | "https") | (SourceKind::File, "file") => {}
            (source, scheme) => {
                return Err(anyhow!(
                    "Base URL scheme '{}' does not match catalog source '{}'",
                    scheme,
                    source
                ));
            }
        }

        if self.catalog.catalog_path.trim().is_empty() {
            return Err(anyhow!("Catalog path must not be empty"));
        }

        if self.playback.default_voices.iter().all(|v| v.trim().is_empty()) {
            return Err(anyhow!("At least one default voice is required"));
        }

        if self.playback.advance_delay_ms > MAX_DELAY_MS {
            return Err(anyhow!(
                "Advance delay must be at most {}ms, got {}ms",
                MAX_DELAY_MS,
                self.playback.advance_delay_ms
            ));
        }

        if self.playback.clip_gap_ms > MAX_DELAY_MS {
            return Err(anyhow!(
                "Clip gap must be at most {}ms, got {}ms",
                MAX_DELAY_MS,
                self.playback.clip_gap_ms
            ));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            catalog: CatalogConfig::default(),
            playback: PlaybackConfig::default(),
            locale: Locale::default(),
            log_level: LogLevel::default(),
        }
    }
}
