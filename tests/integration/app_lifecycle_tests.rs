/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;
use std::sync::Arc;
use tokio::io::BufReader;

use wordtalk::app_config::Config;
use wordtalk::app_controller::{Command, Controller, Flow};
use wordtalk::player::MockClipPlayer;
use wordtalk::sequencer::{PlaybackPosition, PlaybackState};
use crate::common::{self, clip_url, mock_sources::{Response, ScriptedSource}};

fn fixture_json() -> String {
    std::fs::read_to_string(common::test_resource_path("vocabulary.json")).unwrap()
}

fn controller_with(responses: Vec<Response>) -> Controller {
    let mut config = Config::default();
    config.playback.default_voices = vec!["danna".to_string(), "matt".to_string()];
    Controller::with_source(config, Arc::new(ScriptedSource::new(responses)))
}

/// Test the controller initialization with default config
#[test]
fn test_controller_initialization_withDefaultConfig_shouldSucceed() -> Result<()> {
    let controller = Controller::with_config(Config::default())?;
    assert_eq!(
        controller.store().source().location(),
        "http://localhost:5173/data/vocabulary.json"
    );
    assert!(controller.store().catalog().is_none());
    Ok(())
}

/// Test that the list command outlines the vocabulary
#[test]
fn test_list_withFixture_shouldPrintPartsAndVoices() -> Result<()> {
    let controller = controller_with(vec![Response::Body(fixture_json())]);

    let listing = tokio_test::block_on(controller.list())?;

    assert!(listing.contains("1. Part 1 (2 words)"));
    assert!(listing.contains("2. Part 2 (1 words)"));
    assert!(listing.contains("Voices: clara, danna, matt"));
    Ok(())
}

/// Test that a failed load carries the localized message
#[tokio::test]
async fn test_loadCatalog_withServerError_shouldReportLocalizedMessage() {
    let controller = controller_with(vec![Response::Status(500)]);

    let error = controller.load_catalog().await.unwrap_err();

    assert_eq!(error.to_string(), "단어 목록을 불러오지 못했습니다");
    assert!(format!("{:#}", error).contains("500"));
    assert!(controller.store().last_error().is_some());
}

/// Test a scripted terminal session
#[tokio::test(start_paused = true)]
async fn test_runWith_scriptedSession_shouldNavigateAndRender() -> Result<()> {
    let controller = controller_with(vec![Response::Body(fixture_json())]);
    let catalog = controller.load_catalog().await?;
    let player = Arc::new(MockClipPlayer::instant());
    let sequencer = controller.build_sequencer(catalog, player.clone())?;

    let input = BufReader::new(&b"n\nt\nbogus\nq\nn\n"[..]);
    let mut output: Vec<u8> = Vec::new();
    controller.run_with(&sequencer, input, &mut output).await?;

    let output = String::from_utf8(output)?;
    assert!(output.contains("apple"));
    assert!(output.contains("bridge"));
    assert!(output.contains("다리"));
    assert!(output.contains("Unknown command: bogus"));

    // Input after `q` is ignored
    assert_eq!(sequencer.position(), PlaybackPosition::new(0, 1));
    assert_eq!(sequencer.state(), PlaybackState::Idle);
    assert_eq!(player.call_count(), 0);
    Ok(())
}

/// Test that a session configured for auto-advance starts playing on its own
#[tokio::test(start_paused = true)]
async fn test_runWith_autoAdvanceConfigured_shouldStartPlaying() -> Result<()> {
    let mut config = Config::default();
    config.playback.default_voices = vec!["danna".to_string()];
    config.playback.auto_advance = true;
    let controller = Controller::with_source(
        config,
        Arc::new(ScriptedSource::new(vec![Response::Body(fixture_json())])),
    );
    let catalog = controller.load_catalog().await?;
    let player = Arc::new(MockClipPlayer::instant());
    let sequencer = controller.build_sequencer(catalog, player.clone())?;

    controller.start_session(&sequencer);
    common::settle(1_500).await;

    assert!(sequencer.runtime().is_playing);
    assert_eq!(sequencer.position(), PlaybackPosition::new(0, 1));
    assert_eq!(player.calls()[0], clip_url("/audio/en/danna/apple.mp3"));

    // An already running session is left alone
    controller.start_session(&sequencer);
    assert!(sequencer.runtime().is_playing);
    Ok(())
}

/// Test that without auto-advance the session waits for a command
#[tokio::test(start_paused = true)]
async fn test_startSession_withoutAutoAdvance_shouldStayIdle() -> Result<()> {
    let controller = controller_with(vec![Response::Body(fixture_json())]);
    let catalog = controller.load_catalog().await?;
    let player = Arc::new(MockClipPlayer::instant());
    let sequencer = controller.build_sequencer(catalog, player.clone())?;

    controller.start_session(&sequencer);
    common::settle(1_500).await;

    assert_eq!(sequencer.state(), PlaybackState::Idle);
    assert_eq!(player.call_count(), 0);
    Ok(())
}

/// Test one-shot and continuous playback commands
#[tokio::test(start_paused = true)]
async fn test_execute_playbackCommands_shouldDriveSequencer() -> Result<()> {
    let controller = controller_with(vec![Response::Body(fixture_json())]);
    let catalog = controller.load_catalog().await?;
    let player = Arc::new(MockClipPlayer::instant());
    let sequencer = controller.build_sequencer(catalog, player.clone())?;
    let mut output: Vec<u8> = Vec::new();

    controller.execute(&sequencer, Command::PlayWord, &mut output).await?;
    common::settle(10).await;
    assert_eq!(
        player.calls(),
        vec![
            clip_url("/audio/en/danna/apple.mp3"),
            clip_url("/audio/en/matt/apple.mp3"),
            clip_url("/audio/kr/apple.mp3"),
        ]
    );
    assert_eq!(sequencer.state(), PlaybackState::Idle);

    controller.execute(&sequencer, Command::Seek(PlaybackPosition::new(1, 0)), &mut output).await?;
    controller.execute(&sequencer, Command::TogglePlayback, &mut output).await?;
    common::settle(10).await;
    assert_eq!(sequencer.state(), PlaybackState::Playing);
    assert_eq!(player.call_count(), 5);

    let flow = controller.execute(&sequencer, Command::TogglePlayback, &mut output).await?;
    assert_eq!(flow, Flow::Continue);
    assert_eq!(sequencer.state(), PlaybackState::Idle);
    Ok(())
}

/// Test voice commands, including an unknown voice
#[tokio::test]
async fn test_execute_voiceCommands_shouldListAvailableVoicesOnError() -> Result<()> {
    let controller = controller_with(vec![Response::Body(fixture_json())]);
    let catalog = controller.load_catalog().await?;
    let sequencer = controller.build_sequencer(catalog, Arc::new(MockClipPlayer::instant()))?;
    let mut output: Vec<u8> = Vec::new();

    controller.execute(&sequencer, Command::ToggleVoice("nara".to_string()), &mut output).await?;
    controller.execute(&sequencer, Command::ToggleVoice("danna".to_string()), &mut output).await?;

    let output = String::from_utf8(output)?;
    assert!(output.contains("Available voices: clara, danna, matt"));
    let selected: Vec<String> = sequencer.settings().selected_voices().iter().map(|v| v.to_string()).collect();
    assert_eq!(selected, vec!["matt"]);
    Ok(())
}

/// Test that reload swaps the catalog and resets the cursor
#[tokio::test]
async fn test_execute_reload_shouldReplaceCatalog() -> Result<()> {
    let one_part = r#"{"parts":[{"id":9,"name":"Review","words":[{"word":"sun","translation":"해","audioFiles":{"en":{"danna":"sun.mp3"}}}]}]}"#;
    let controller = controller_with(vec![
        Response::Body(fixture_json()),
        Response::Unreachable,
        Response::Body(one_part.to_string()),
    ]);
    let catalog = controller.load_catalog().await?;
    let sequencer = controller.build_sequencer(catalog, Arc::new(MockClipPlayer::instant()))?;
    sequencer.next_word();
    let mut output: Vec<u8> = Vec::new();

    controller.execute(&sequencer, Command::Reload, &mut output).await?;
    assert_eq!(sequencer.catalog().len(), 2);
    assert_eq!(sequencer.position(), PlaybackPosition::new(0, 1));

    controller.execute(&sequencer, Command::Reload, &mut output).await?;
    assert_eq!(sequencer.catalog().len(), 1);
    assert_eq!(sequencer.position(), PlaybackPosition::new(0, 0));
    assert_eq!(sequencer.view().part_name.as_deref(), Some("Review"));

    let output = String::from_utf8(output)?;
    assert!(output.contains("단어 목록을 불러오지 못했습니다"));
    Ok(())
}
