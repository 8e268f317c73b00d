use log::debug;

use crate::catalog::{VoiceId, Word};
use crate::sequencer::settings::PlaybackSettings;

/// What a queued clip is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipKind {
    English(VoiceId),
    Korean,
}

/// One entry of a play queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedClip {
    pub kind: ClipKind,
    /// Reference as written in the catalog, not yet resolved
    pub reference: String,
}

/// Clips to play for a word, in order: the selected voices' English clips in
/// selection order, then the Korean clip when enabled.
///
/// Voices without a clip for this word are skipped.
pub fn build_play_queue(word: &Word, settings: &PlaybackSettings) -> Vec<QueuedClip> {
    let mut queue = Vec::with_capacity(settings.selected_voices().len() + 1);

    for voice in settings.selected_voices() {
        match word.audio.english(voice) {
            Some(reference) => queue.push(QueuedClip {
                kind: ClipKind::English(voice.clone()),
                reference: reference.to_string(),
            }),
            None => debug!("No '{}' clip for '{}', skipping", voice, word.text),
        }
    }

    if settings.include_korean {
        if let Some(reference) = word.audio.korean() {
            queue.push(QueuedClip {
                kind: ClipKind::Korean,
                reference: reference.to_string(),
            });
        }
    }

    queue
}
