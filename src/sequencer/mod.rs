/*!
 * Playback sequencer.
 *
 * Owns the cursor, the playback settings and the play/pause state machine:
 *
 * ```text
 *   Idle ──toggle_playback──▶ Playing ──queue done + auto-advance──▶ Transitioning
 *    ▲                          │  ▲                                      │
 *    └──stop / failure / end────┘  └──────────advance delay elapsed───────┘
 * ```
 *
 * Each traversal of a play queue runs as a spawned task holding a playback
 * token. Navigation, stopping and new traversals revoke the token, so at most
 * one traversal is ever live and a stale advance timer can never resurrect
 * playback for a word the user has left.
 */

pub mod navigation;
pub mod queue;
pub mod settings;
pub mod token;

use log::{debug, error, info, warn};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::Config;
use crate::assets::AssetResolver;
use crate::catalog::{Catalog, VoiceId, Word};
use crate::errors::{PlaybackError, SequencerError};
use crate::messages::{self, Locale};
use crate::player::ClipPlayer;

pub use navigation::{PlaybackPosition, Step};
pub use queue::{ClipKind, QueuedClip, build_play_queue};
pub use settings::PlaybackSettings;
pub use token::{PlaybackToken, TokenSource};

/// Phase of the play/pause state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlaybackState {
    /// Nothing is playing
    Idle,
    /// A play queue is being traversed
    Playing,
    /// Waiting the advance delay before the next word
    Transitioning,
}

/// Transient session flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PlaybackRuntimeState {
    pub is_playing: bool,
    pub show_translation: bool,
}

/// Position of the current word inside its part, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

/// Timing and presentation options
#[derive(Debug, Clone)]
pub struct SequencerOptions {
    /// Pause before auto-advancing to the next word
    pub advance_delay: Duration,
    /// Pause between two clips of the same word
    pub clip_gap: Duration,
    /// Language of surfaced error messages
    pub locale: Locale,
}

impl SequencerOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            advance_delay: Duration::from_millis(config.playback.advance_delay_ms),
            clip_gap: Duration::from_millis(config.playback.clip_gap_ms),
            locale: config.locale,
        }
    }
}

impl Default for SequencerOptions {
    fn default() -> Self {
        Self {
            advance_delay: Duration::from_millis(1000),
            clip_gap: Duration::ZERO,
            locale: Locale::default(),
        }
    }
}

/// Everything a front-end needs to draw the card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub part_name: Option<String>,
    pub word: Option<String>,
    /// Present only while the translation is revealed
    pub translation: Option<String>,
    pub position: PlaybackPosition,
    pub progress: Progress,
    pub state: PlaybackState,
    pub selected_voices: Vec<String>,
    pub available_voices: Vec<String>,
    pub include_korean: bool,
    pub auto_advance: bool,
    pub show_translation: bool,
    pub error: Option<String>,
}

#[derive(Debug)]
struct SequencerState {
    catalog: Arc<Catalog>,
    position: PlaybackPosition,
    settings: PlaybackSettings,
    phase: PlaybackState,
    show_translation: bool,
    last_error: Option<String>,
    /// Token id of the traversal still driving playback, if any
    traversal: Option<u64>,
}

impl SequencerState {
    fn current_word(&self) -> Option<&Word> {
        self.catalog
            .word(self.position.part_index, self.position.word_index)
    }
}

#[derive(Debug)]
struct Inner {
    player: Arc<dyn ClipPlayer>,
    resolver: AssetResolver,
    options: SequencerOptions,
    tokens: TokenSource,
    state: Mutex<SequencerState>,
}

/// Drives playback over a catalog. Cheap to clone; clones share state.
///
/// Operations that start playback spawn tokio tasks and must be called from
/// within a tokio runtime.
#[derive(Debug, Clone)]
pub struct Sequencer {
    inner: Arc<Inner>,
}

/// How a traversal of one queue ended without error
enum QueueOutcome {
    Completed,
    Cancelled,
}

impl Sequencer {
    /// Create a sequencer positioned on the first word of the catalog.
    ///
    /// Selected voices the catalog never references are dropped; if none
    /// remain, the first voice of the catalog is selected instead.
    pub fn new(
        catalog: Arc<Catalog>,
        player: Arc<dyn ClipPlayer>,
        resolver: AssetResolver,
        mut settings: PlaybackSettings,
        options: SequencerOptions,
    ) -> Self {
        Self::reconcile_voices(&catalog, &mut settings);
        let position = navigation::first(&catalog).unwrap_or_default();

        Self {
            inner: Arc::new(Inner {
                player,
                resolver,
                options,
                tokens: TokenSource::new(),
                state: Mutex::new(SequencerState {
                    catalog,
                    position,
                    settings,
                    phase: PlaybackState::Idle,
                    show_translation: false,
                    last_error: None,
                    traversal: None,
                }),
            }),
        }
    }

    fn reconcile_voices(catalog: &Catalog, settings: &mut PlaybackSettings) {
        let known = catalog.voices();
        let Some(fallback) = known.iter().next().cloned() else {
            return;
        };

        for voice in settings.selected_voices() {
            if !known.contains(voice) {
                warn!("Voice '{}' is not provided by the vocabulary, ignoring it", voice);
            }
        }
        settings.retain_voices(|v| known.contains(v), fallback);
    }

    // ===== Read access =====

    pub fn state(&self) -> PlaybackState {
        self.inner.state.lock().phase
    }

    pub fn runtime(&self) -> PlaybackRuntimeState {
        let state = self.inner.state.lock();
        PlaybackRuntimeState {
            is_playing: state.phase != PlaybackState::Idle,
            show_translation: state.show_translation,
        }
    }

    pub fn position(&self) -> PlaybackPosition {
        self.inner.state.lock().position
    }

    pub fn settings(&self) -> PlaybackSettings {
        self.inner.state.lock().settings.clone()
    }

    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.inner.state.lock().catalog)
    }

    pub fn current_word(&self) -> Option<Word> {
        self.inner.state.lock().current_word().cloned()
    }

    /// Message of the last playback failure
    pub fn last_error(&self) -> Option<String> {
        self.inner.state.lock().last_error.clone()
    }

    pub fn clear_error(&self) {
        self.inner.state.lock().last_error = None;
    }

    pub fn progress(&self) -> Progress {
        Self::progress_of(&self.inner.state.lock())
    }

    fn progress_of(state: &SequencerState) -> Progress {
        let total = state.catalog.part_len(state.position.part_index);
        if total == 0 {
            return Progress::default();
        }
        Progress {
            current: state.position.word_index + 1,
            total,
        }
    }

    /// Play queue the current word would get with the current settings
    pub fn play_queue(&self) -> Vec<QueuedClip> {
        let state = self.inner.state.lock();
        state
            .current_word()
            .map(|word| build_play_queue(word, &state.settings))
            .unwrap_or_default()
    }

    /// Snapshot for rendering
    pub fn view(&self) -> CardView {
        let state = self.inner.state.lock();
        let word = state.current_word();

        CardView {
            part_name: state
                .catalog
                .part(state.position.part_index)
                .map(|p| p.name.clone()),
            word: word.map(|w| w.text.clone()),
            translation: word
                .filter(|_| state.show_translation)
                .map(|w| w.translation.clone()),
            position: state.position,
            progress: Self::progress_of(&state),
            state: state.phase,
            selected_voices: state
                .settings
                .selected_voices()
                .iter()
                .map(VoiceId::to_string)
                .collect(),
            available_voices: state.catalog.voices().iter().map(VoiceId::to_string).collect(),
            include_korean: state.settings.include_korean,
            auto_advance: state.settings.auto_advance,
            show_translation: state.show_translation,
            error: state.last_error.clone(),
        }
    }

    // ===== Play / pause =====

    /// Start playing the current word, or stop whatever is playing
    pub fn toggle_playback(&self) -> PlaybackState {
        let mut state = self.inner.state.lock();
        if state.phase == PlaybackState::Idle {
            info!("Playback started");
            state.phase = PlaybackState::Playing;
            state.last_error = None;
            self.start_traversal(&mut state);
        } else {
            info!("Playback stopped");
            state.phase = PlaybackState::Idle;
            self.halt();
        }
        state.phase
    }

    /// Stop playback: the sounding clip and any pending advance are cancelled
    pub fn stop(&self) {
        let mut state = self.inner.state.lock();
        state.phase = PlaybackState::Idle;
        self.halt();
    }

    /// Play the current word's queue once.
    ///
    /// Does not switch to `Playing` and never auto-advances. While playing,
    /// it restarts the running traversal on the current word instead.
    pub async fn play_current_word(&self) -> Result<(), PlaybackError> {
        let (queue, token) = {
            let mut state = self.inner.state.lock();
            if state.phase != PlaybackState::Idle {
                state.phase = PlaybackState::Playing;
                self.start_traversal(&mut state);
                return Ok(());
            }
            let queue = state
                .current_word()
                .map(|word| build_play_queue(word, &state.settings))
                .unwrap_or_default();
            (queue, self.issue_token())
        };

        self.play_one_shot(queue, token).await
    }

    /// Play only the current word's Korean clip, whatever `include_korean` says.
    ///
    /// Continuous playback is stopped first. A word without a Korean clip is a no-op.
    pub async fn play_korean(&self) -> Result<(), PlaybackError> {
        let (queue, token) = {
            let mut state = self.inner.state.lock();
            state.phase = PlaybackState::Idle;
            let queue: Vec<QueuedClip> = state
                .current_word()
                .and_then(|word| word.audio.korean())
                .map(|reference| QueuedClip {
                    kind: ClipKind::Korean,
                    reference: reference.to_string(),
                })
                .into_iter()
                .collect();
            (queue, self.issue_token())
        };

        self.play_one_shot(queue, token).await
    }

    async fn play_one_shot(
        &self,
        queue: Vec<QueuedClip>,
        mut token: PlaybackToken,
    ) -> Result<(), PlaybackError> {
        match self.play_clips(&queue, &mut token).await {
            Ok(_) => Ok(()),
            Err(e) => {
                self.fail(&token, &e);
                Err(e)
            }
        }
    }

    // ===== Navigation =====

    /// Move to the next word, wrapping past the end of the catalog.
    ///
    /// While playing with auto-advance off, reaching past the last word stops
    /// playback and leaves the cursor where it is.
    pub fn next_word(&self) -> PlaybackPosition {
        let mut state = self.inner.state.lock();
        let Some(step) = navigation::next(&state.catalog, state.position) else {
            return state.position;
        };

        if step.wrapped && state.phase != PlaybackState::Idle && !state.settings.auto_advance {
            info!("Reached the end of the vocabulary, stopping playback");
            state.phase = PlaybackState::Idle;
            self.halt();
            return state.position;
        }

        self.move_to(&mut state, step.position);
        state.position
    }

    /// Move to the previous word, wrapping before the start of the catalog
    pub fn previous_word(&self) -> PlaybackPosition {
        let mut state = self.inner.state.lock();
        if let Some(step) = navigation::previous(&state.catalog, state.position) {
            self.move_to(&mut state, step.position);
        }
        state.position
    }

    /// Jump to an explicit word
    pub fn seek(&self, position: PlaybackPosition) -> Result<(), SequencerError> {
        let mut state = self.inner.state.lock();
        if !position.is_valid(&state.catalog) {
            return Err(SequencerError::InvalidPosition {
                part: position.part_index,
                word: position.word_index,
            });
        }
        self.move_to(&mut state, position);
        Ok(())
    }

    fn move_to(&self, state: &mut SequencerState, position: PlaybackPosition) {
        state.position = position;
        debug!(
            "Moved to part {}, word {}",
            position.part_index + 1,
            position.word_index + 1
        );

        if state.phase == PlaybackState::Idle {
            self.halt();
        } else {
            state.phase = PlaybackState::Playing;
            self.start_traversal(state);
        }
    }

    // ===== Settings =====

    /// Select or deselect a voice; the last selected voice cannot be removed.
    ///
    /// Returns whether the selection changed.
    pub fn toggle_voice(&self, name: &str) -> Result<bool, SequencerError> {
        let voice = VoiceId::from(name.trim());
        let mut state = self.inner.state.lock();
        let known = state.catalog.voices();
        if !known.is_empty() && !known.contains(&voice) {
            return Err(SequencerError::UnknownVoice(voice.to_string()));
        }

        let changed = state.settings.toggle_voice(voice.clone());
        if !changed {
            debug!("Keeping '{}': at least one voice must stay selected", voice);
        }
        Ok(changed)
    }

    pub fn toggle_korean(&self) -> bool {
        self.inner.state.lock().settings.toggle_korean()
    }

    /// Flip auto-advance.
    ///
    /// Turning it on from Idle starts playing from the current word. A running
    /// traversal keeps its clip and picks the flag up when the queue finishes;
    /// a word that already finished playing is played again and followed on.
    pub fn toggle_auto_advance(&self) -> bool {
        let mut state = self.inner.state.lock();
        let enabled = state.settings.toggle_auto_advance();
        if enabled {
            info!("Auto-advance on");
            if state.phase == PlaybackState::Idle {
                state.phase = PlaybackState::Playing;
                state.last_error = None;
                self.start_traversal(&mut state);
            } else if state.traversal.is_none() {
                state.phase = PlaybackState::Playing;
                self.start_traversal(&mut state);
            }
        } else {
            info!("Auto-advance off");
        }
        enabled
    }

    pub fn toggle_translation(&self) -> bool {
        let mut state = self.inner.state.lock();
        state.show_translation = !state.show_translation;
        state.show_translation
    }

    /// Swap in a reloaded catalog: playback stops and the cursor returns to the start
    pub fn replace_catalog(&self, catalog: Arc<Catalog>) {
        let mut state = self.inner.state.lock();
        state.phase = PlaybackState::Idle;
        self.halt();

        Self::reconcile_voices(&catalog, &mut state.settings);
        state.position = navigation::first(&catalog).unwrap_or_default();
        state.catalog = catalog;
        info!("Vocabulary replaced, back to the first word");
    }

    // ===== Traversal =====

    /// Kill every outstanding token and silence the player
    fn halt(&self) {
        self.inner.tokens.revoke();
        self.inner.player.cancel();
    }

    /// Kill every outstanding token, silence the player and hand out a fresh token
    fn issue_token(&self) -> PlaybackToken {
        let token = self.inner.tokens.issue();
        self.inner.player.cancel();
        token
    }

    fn start_traversal(&self, state: &mut SequencerState) {
        let token = self.issue_token();
        debug!("Starting traversal {}", token.id());
        state.traversal = Some(token.id());
        tokio::spawn(self.clone().run_traversal(token));
    }

    async fn run_traversal(self, token: PlaybackToken) {
        let id = token.id();
        self.traverse(token).await;
        Self::release_traversal(&mut self.inner.state.lock(), id);
    }

    fn release_traversal(state: &mut SequencerState, id: u64) {
        if state.traversal == Some(id) {
            state.traversal = None;
        }
    }

    async fn traverse(&self, mut token: PlaybackToken) {
        loop {
            let Some(queue) = self.queue_for(&token) else {
                return;
            };

            match self.play_clips(&queue, &mut token).await {
                Ok(QueueOutcome::Completed) => {}
                Ok(QueueOutcome::Cancelled) => return,
                Err(e) => {
                    self.fail(&token, &e);
                    return;
                }
            }

            if !self.begin_transition(&token) {
                return;
            }

            tokio::select! {
                biased;
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(self.inner.options.advance_delay) => {}
            }

            if !self.advance(&token) {
                return;
            }
        }
    }

    fn queue_for(&self, token: &PlaybackToken) -> Option<Vec<QueuedClip>> {
        let state = self.inner.state.lock();
        if !token.is_live() {
            return None;
        }
        Some(
            state
                .current_word()
                .map(|word| build_play_queue(word, &state.settings))
                .unwrap_or_default(),
        )
    }

    /// Play clips strictly one after another while the token is live
    async fn play_clips(
        &self,
        queue: &[QueuedClip],
        token: &mut PlaybackToken,
    ) -> Result<QueueOutcome, PlaybackError> {
        let gap = self.inner.options.clip_gap;

        for (index, clip) in queue.iter().enumerate() {
            if index > 0 && !gap.is_zero() {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => return Ok(QueueOutcome::Cancelled),
                    _ = tokio::time::sleep(gap) => {}
                }
            }

            if !token.is_live() {
                return Ok(QueueOutcome::Cancelled);
            }

            let url = self.inner.resolver.resolve_clip(&clip.reference)?;
            debug!("Clip {}/{} ({:?}): {}", index + 1, queue.len(), clip.kind, url);

            let outcome = tokio::select! {
                biased;
                _ = token.cancelled() => None,
                result = self.inner.player.play(&url) => Some(result),
            };

            match outcome {
                None => return Ok(QueueOutcome::Cancelled),
                Some(Err(e)) => return Err(e),
                Some(Ok(())) => {}
            }
        }

        if token.is_live() {
            Ok(QueueOutcome::Completed)
        } else {
            Ok(QueueOutcome::Cancelled)
        }
    }

    /// Enter `Transitioning` if the finished word should be followed by the next one
    fn begin_transition(&self, token: &PlaybackToken) -> bool {
        let mut state = self.inner.state.lock();
        if !token.is_live() || state.phase == PlaybackState::Idle || !state.settings.auto_advance {
            // Released under the same guard so a late toggle_auto_advance restarts the word
            Self::release_traversal(&mut state, token.id());
            return false;
        }
        state.phase = PlaybackState::Transitioning;
        true
    }

    /// Step to the next word after the advance delay; auto-advance always wraps
    fn advance(&self, token: &PlaybackToken) -> bool {
        let mut state = self.inner.state.lock();
        if !token.is_live() || state.phase == PlaybackState::Idle {
            return false;
        }

        state.phase = PlaybackState::Playing;
        if !state.settings.auto_advance {
            Self::release_traversal(&mut state, token.id());
            return false;
        }

        match navigation::next(&state.catalog, state.position) {
            Some(step) => {
                if step.wrapped {
                    info!("End of the vocabulary, starting over");
                }
                state.position = step.position;
                true
            }
            None => false,
        }
    }

    fn fail(&self, token: &PlaybackToken, e: &PlaybackError) {
        let mut state = self.inner.state.lock();
        if !token.is_live() {
            debug!("Ignoring failure of a cancelled clip: {}", e);
            return;
        }

        error!("{}", e);
        state.phase = PlaybackState::Idle;
        state.last_error = Some(messages::playback_failed(self.inner.options.locale).to_string());
        self.inner.tokens.revoke();
    }
}
