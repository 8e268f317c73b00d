/*!
 * Tests for the vocabulary model and its wire format
 */

use wordtalk::catalog::{Catalog, VoiceId};
use wordtalk::errors::CatalogLoadError;
use crate::common;

#[test]
fn test_fixture_shouldParseWireFormat() {
    let catalog = common::fixture_catalog();

    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.part_len(0), 2);
    assert_eq!(catalog.part_len(1), 1);
    assert_eq!(catalog.part_len(5), 0);

    let apple = catalog.word(0, 0).unwrap();
    assert_eq!(apple.text, "apple");
    assert_eq!(apple.translation, "사과");
    assert_eq!(apple.audio.english(&VoiceId::from("matt")), Some("/audio/en/matt/apple.mp3"));
    assert_eq!(apple.audio.korean(), Some("/audio/kr/apple.mp3"));
}

#[test]
fn test_word_withEmptyOrAbsentClips_shouldReportMissing() {
    let catalog = common::fixture_catalog();

    let bridge = catalog.word(0, 1).unwrap();
    assert_eq!(bridge.audio.english(&VoiceId::from("clara")), None);
    assert_eq!(bridge.audio.english(&VoiceId::from("matt")), None);

    let cloud = catalog.word(1, 0).unwrap();
    assert_eq!(cloud.audio.korean(), None);
    assert!(catalog.word(1, 1).is_none());
}

#[test]
fn test_voices_shouldCollectEveryReferencedVoice() {
    let catalog = common::fixture_catalog();
    let voices = catalog.voices();
    let names: Vec<&str> = voices.iter().map(|v| v.as_str()).collect();
    assert_eq!(names, vec!["clara", "danna", "matt"]);
}

#[test]
fn test_word_withoutAudioFiles_shouldDefaultToNoClips() {
    let catalog = Catalog::from_json(
        r#"{"parts":[{"id":1,"name":"Part 1","words":[{"word":"sun","translation":"해"}]}]}"#,
    )
    .unwrap();

    let sun = catalog.word(0, 0).unwrap();
    assert!(sun.audio.english_by_voice.is_empty());
    assert_eq!(sun.audio.korean(), None);
    assert!(catalog.voices().is_empty());
}

#[test]
fn test_catalog_withNoParts_shouldBeRejected() {
    assert!(matches!(Catalog::from_json(r#"{"parts":[]}"#), Err(CatalogLoadError::Empty)));
    assert!(matches!(Catalog::from_json(r#"{"words":[]}"#), Err(CatalogLoadError::Parse(_))));
}
