use serde::{Deserialize, Serialize};

use crate::app_config::PlaybackConfig;
use crate::catalog::VoiceId;

/// User-adjustable playback settings
///
/// `selected_voices` is an ordered set: its order is the playback order and it
/// is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSettings {
    selected_voices: Vec<VoiceId>,
    pub include_korean: bool,
    pub auto_advance: bool,
}

impl PlaybackSettings {
    /// Create settings with a first voice
    pub fn new(first_voice: VoiceId) -> Self {
        Self {
            selected_voices: vec![first_voice],
            include_korean: true,
            auto_advance: false,
        }
    }

    /// Build settings from the configured defaults.
    ///
    /// Duplicates and blank names are dropped; `None` when no voice remains.
    pub fn from_config(config: &PlaybackConfig) -> Option<Self> {
        let mut voices: Vec<VoiceId> = Vec::new();
        for name in &config.default_voices {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let voice = VoiceId::from(name);
            if !voices.contains(&voice) {
                voices.push(voice);
            }
        }

        if voices.is_empty() {
            return None;
        }

        Some(Self {
            selected_voices: voices,
            include_korean: config.include_korean,
            auto_advance: config.auto_advance,
        })
    }

    /// Selected voices in playback order
    pub fn selected_voices(&self) -> &[VoiceId] {
        &self.selected_voices
    }

    /// Add the voice at the end, or remove it unless it is the only one left.
    ///
    /// Returns whether the selection changed.
    pub fn toggle_voice(&mut self, voice: VoiceId) -> bool {
        match self.selected_voices.iter().position(|v| *v == voice) {
            None => {
                self.selected_voices.push(voice);
                true
            }
            Some(_) if self.selected_voices.len() == 1 => false,
            Some(index) => {
                self.selected_voices.remove(index);
                true
            }
        }
    }

    /// Keep only voices accepted by `known`, falling back to `fallback` if none survive
    pub fn retain_voices<F>(&mut self, known: F, fallback: VoiceId)
    where
        F: Fn(&VoiceId) -> bool,
    {
        self.selected_voices.retain(|v| known(v));
        if self.selected_voices.is_empty() {
            self.selected_voices.push(fallback);
        }
    }

    pub fn toggle_korean(&mut self) -> bool {
        self.include_korean = !self.include_korean;
        self.include_korean
    }

    pub fn toggle_auto_advance(&mut self) -> bool {
        self.auto_advance = !self.auto_advance;
        self.auto_advance
    }
}
