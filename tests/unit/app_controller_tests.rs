/*!
 * Tests for the application controller
 */

use anyhow::Result;
use std::sync::Arc;

use wordtalk::app_config::Config;
use wordtalk::app_controller::{Controller, format_catalog};
use wordtalk::catalog::VoiceId;
use wordtalk::player::MockClipPlayer;
use crate::common::{self, mock_sources::ScriptedSource};

fn controller(config: Config) -> Controller {
    Controller::with_source(config, Arc::new(ScriptedSource::body("{}")))
}

/// Test that playback defaults flow from the config into the sequencer
#[tokio::test]
async fn test_build_sequencer_withPlaybackConfig_shouldApplyDefaults() -> Result<()> {
    let mut config = Config::default();
    config.playback.default_voices = vec!["matt".to_string(), "danna".to_string()];
    config.playback.include_korean = false;

    let sequencer = controller(config).build_sequencer(
        Arc::new(common::fixture_catalog()),
        Arc::new(MockClipPlayer::instant()),
    )?;

    let settings = sequencer.settings();
    assert_eq!(settings.selected_voices(), &[VoiceId::from("matt"), VoiceId::from("danna")]);
    assert!(!settings.include_korean);
    assert!(!settings.auto_advance);
    Ok(())
}

/// Test that a config without usable voices is refused
#[test]
fn test_build_sequencer_withBlankVoices_shouldFail() {
    let mut config = Config::default();
    config.playback.default_voices = vec!["  ".to_string()];

    let result = controller(config).build_sequencer(
        Arc::new(common::fixture_catalog()),
        Arc::new(MockClipPlayer::instant()),
    );

    assert!(result.is_err());
}

/// Test the vocabulary outline
#[test]
fn test_format_catalog_withSizes_shouldListEveryPart() {
    let listing = format_catalog(&common::catalog_with_sizes(&[2, 0, 1]));
    let lines: Vec<&str> = listing.lines().collect();

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "  1. Part 1 (2 words)");
    assert_eq!(lines[1], "  2. Part 2 (0 words)");
    assert_eq!(lines[3], "Voices: danna");
}
