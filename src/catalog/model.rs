/*!
 * Vocabulary data model.
 *
 * The shapes mirror the static dataset: parts contain words, words carry
 * references to their English voice clips and an optional Korean clip.
 */

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::errors::CatalogLoadError;

/// Identifier of an English voice ("matt", "danna", ...)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceId(String);

impl VoiceId {
    /// Create a voice identifier
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Voice name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VoiceId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for VoiceId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Audio clips available for one word
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioRefs {
    /// English clip per voice
    #[serde(rename = "en", default)]
    pub english_by_voice: BTreeMap<VoiceId, String>,

    /// Korean pronunciation clip
    #[serde(rename = "kr", default)]
    pub korean: Option<String>,
}

impl AudioRefs {
    /// English clip for a voice; empty references count as missing
    pub fn english(&self, voice: &VoiceId) -> Option<&str> {
        self.english_by_voice
            .get(voice)
            .map(String::as_str)
            .filter(|url| !url.trim().is_empty())
    }

    /// Korean clip; empty references count as missing
    pub fn korean(&self) -> Option<&str> {
        self.korean.as_deref().filter(|url| !url.trim().is_empty())
    }
}

/// A vocabulary word
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// The word itself
    #[serde(rename = "word")]
    pub text: String,

    /// Its translation
    pub translation: String,

    /// Recorded clips
    #[serde(rename = "audioFiles", default)]
    pub audio: AudioRefs,
}

/// A numbered group of words
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub words: Vec<Word>,
}

/// Root of the dataset file
#[derive(Debug, Deserialize)]
struct VocabularyData {
    parts: Vec<Part>,
}

/// The loaded vocabulary. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    parts: Vec<Part>,
}

impl Catalog {
    /// Build a catalog from parts. An empty part list is rejected.
    pub fn new(parts: Vec<Part>) -> Result<Self, CatalogLoadError> {
        if parts.is_empty() {
            return Err(CatalogLoadError::Empty);
        }
        Ok(Self { parts })
    }

    /// Parse the dataset JSON
    pub fn from_json(json: &str) -> Result<Self, CatalogLoadError> {
        let data: VocabularyData = serde_json::from_str(json)?;
        Self::new(data.parts)
    }

    /// Parse the dataset JSON from raw bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CatalogLoadError> {
        let data: VocabularyData = serde_json::from_slice(bytes)?;
        Self::new(data.parts)
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Number of parts
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Always false for a constructed catalog; kept for API symmetry
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn part(&self, index: usize) -> Option<&Part> {
        self.parts.get(index)
    }

    /// Number of words in a part, zero for an unknown part
    pub fn part_len(&self, index: usize) -> usize {
        self.parts.get(index).map_or(0, |p| p.words.len())
    }

    pub fn word(&self, part: usize, word: usize) -> Option<&Word> {
        self.parts.get(part).and_then(|p| p.words.get(word))
    }

    /// Total number of words across all parts
    pub fn word_count(&self) -> usize {
        self.parts.iter().map(|p| p.words.len()).sum()
    }

    /// Every voice referenced by at least one word, sorted by name
    pub fn voices(&self) -> BTreeSet<VoiceId> {
        self.parts
            .iter()
            .flat_map(|p| p.words.iter())
            .flat_map(|w| w.audio.english_by_voice.keys().cloned())
            .collect()
    }
}
