/*!
 * Common test utilities for the wordtalk test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use wordtalk::assets::AssetResolver;
use wordtalk::catalog::{AudioRefs, Catalog, Part, VoiceId, Word};
use wordtalk::messages::Locale;
use wordtalk::player::MockClipPlayer;
use wordtalk::sequencer::{PlaybackSettings, Sequencer, SequencerOptions};

// Re-export the mock catalog sources module
pub mod mock_sources;

/// Origin every test clip resolves against
pub const BASE_URL: &str = "http://localhost:5173";

/// Advance delay used by sequencer tests
pub const ADVANCE_DELAY_MS: u64 = 1000;

/// Route library logs to the test harness output
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Helper to get the absolute path to a test resource
pub fn test_resource_path(relative_path: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("resources");
    path.push(relative_path);
    path
}

/// The vocabulary fixture parsed into a catalog
pub fn fixture_catalog() -> Catalog {
    let json = fs::read_to_string(test_resource_path("vocabulary.json")).unwrap();
    Catalog::from_json(&json).unwrap()
}

/// A word with English clips per voice and an optional Korean clip
pub fn word(text: &str, english: &[(&str, &str)], korean: Option<&str>) -> Word {
    Word {
        text: text.to_string(),
        translation: format!("{} (ko)", text),
        audio: AudioRefs {
            english_by_voice: english
                .iter()
                .map(|(voice, url)| (VoiceId::from(*voice), url.to_string()))
                .collect(),
            korean: korean.map(str::to_string),
        },
    }
}

/// A catalog with the given number of words per part.
///
/// Word `w` of part `p` has a `danna` clip `p{p}w{w}.mp3` and no Korean clip.
pub fn catalog_with_sizes(sizes: &[usize]) -> Catalog {
    let parts = sizes
        .iter()
        .enumerate()
        .map(|(p, &size)| Part {
            id: p as i64 + 1,
            name: format!("Part {}", p + 1),
            words: (0..size)
                .map(|w| {
                    let clip = format!("p{}w{}.mp3", p, w);
                    word(&format!("word {}-{}", p, w), &[("danna", clip.as_str())], None)
                })
                .collect(),
        })
        .collect();
    Catalog::new(parts).unwrap()
}

/// A catalog made of a single part holding the given words
pub fn catalog_of(words: Vec<Word>) -> Catalog {
    Catalog::new(vec![Part {
        id: 1,
        name: "Part 1".to_string(),
        words,
    }])
    .unwrap()
}

/// Settings selecting the voices in order
pub fn settings(voices: &[&str], include_korean: bool) -> PlaybackSettings {
    let mut settings = PlaybackSettings::new(VoiceId::from(voices[0]));
    for voice in &voices[1..] {
        settings.toggle_voice(VoiceId::from(*voice));
    }
    settings.include_korean = include_korean;
    settings
}

/// A sequencer over the catalog driving the mock player
pub fn sequencer(catalog: Catalog, player: &Arc<MockClipPlayer>, settings: PlaybackSettings) -> Sequencer {
    Sequencer::new(
        Arc::new(catalog),
        player.clone(),
        AssetResolver::new(BASE_URL, "").unwrap(),
        settings,
        SequencerOptions {
            advance_delay: Duration::from_millis(ADVANCE_DELAY_MS),
            clip_gap: Duration::ZERO,
            locale: Locale::En,
        },
    )
}

/// Full URL a clip reference resolves to in tests
pub fn clip_url(reference: &str) -> String {
    format!("{}/{}", BASE_URL, reference.trim_start_matches('/'))
}

/// Let spawned tasks run, advancing paused time by `ms`
pub async fn settle(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
