use anyhow::{Context, Result, anyhow};
use log::{debug, info, warn};
use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::app_config::Config;
use crate::assets::AssetResolver;
use crate::catalog::source;
use crate::catalog::{Catalog, CatalogSource, CatalogStore};
use crate::errors::SequencerError;
use crate::messages::{self, Locale};
use crate::player::{ClipPlayer, RodioClipPlayer};
use crate::sequencer::{CardView, PlaybackPosition, PlaybackSettings, PlaybackState, Sequencer, SequencerOptions};

// @module: Interactive terminal front-end

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    TogglePlayback,
    PlayWord,
    PlayKorean,
    ToggleKorean,
    ToggleAutoAdvance,
    ToggleTranslation,
    ToggleVoice(String),
    /// Zero-based target, parsed from 1-based input
    Seek(PlaybackPosition),
    ClearError,
    Status,
    Reload,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        // A lone space is the play/pause key
        if line.trim().is_empty() {
            return Ok(if line.contains(' ') { Self::TogglePlayback } else { Self::Status });
        }

        let mut parts = line.split_whitespace();
        let keyword = parts.next().unwrap_or_default().to_lowercase();
        let args: Vec<&str> = parts.collect();

        let command = match (keyword.as_str(), args.as_slice()) {
            ("n" | "next", []) => Self::Next,
            ("p" | "prev", []) => Self::Previous,
            ("play" | "stop", []) => Self::TogglePlayback,
            ("w" | "word", []) => Self::PlayWord,
            ("kr", []) => Self::PlayKorean,
            ("k" | "korean", []) => Self::ToggleKorean,
            ("a" | "auto", []) => Self::ToggleAutoAdvance,
            ("t" | "translation", []) => Self::ToggleTranslation,
            ("v" | "voice", [name]) => Self::ToggleVoice(name.to_string()),
            ("g" | "go", [part, word]) => {
                let part: usize = part.parse().context(format!("Invalid part number: {}", part))?;
                let word: usize = word.parse().context(format!("Invalid word number: {}", word))?;
                if part == 0 || word == 0 {
                    return Err(anyhow!("Part and word numbers start at 1"));
                }
                Self::Seek(PlaybackPosition::new(part - 1, word - 1))
            }
            ("c" | "clear", []) => Self::ClearError,
            ("s" | "status", []) => Self::Status,
            ("r" | "reload", []) => Self::Reload,
            ("h" | "help" | "?", []) => Self::Help,
            ("q" | "quit" | "exit", []) => Self::Quit,
            _ => return Err(anyhow!("Unknown command: {}", line.trim())),
        };
        Ok(command)
    }
}

/// Whether the input loop keeps going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub const HELP: &str = "\
Commands:
  n / p          next / previous word
  <space>, play  start or stop playback
  w              play the current word once
  kr             play the Korean clip
  k              include Korean in the queue on/off
  a              auto-advance on/off
  t              show/hide the translation
  v <voice>      select/deselect a voice
  g <part> <n>   go to word n of a part
  c              dismiss the error message
  s              show the card
  r              reload the vocabulary
  q              quit";

/// Main application controller for the flashcard player
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Loaded vocabulary
    store: CatalogStore,
}

impl Controller {
    /// Create a controller reading the vocabulary from the configured location
    pub fn with_config(config: Config) -> Result<Self> {
        let source = source::from_config(&config.catalog).context("Invalid vocabulary location")?;
        Ok(Self::with_source(config, source))
    }

    /// Create a controller reading the vocabulary from an explicit source
    pub fn with_source(config: Config, source: Arc<dyn CatalogSource>) -> Self {
        Self {
            config,
            store: CatalogStore::new(source),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    /// Load the vocabulary; the error carries the localized message
    pub async fn load_catalog(&self) -> Result<Arc<Catalog>> {
        let location = self.store.source().location();
        info!("Loading vocabulary from {}", location);

        self.store
            .load()
            .await
            .context(messages::catalog_load_failed(self.config.locale))
    }

    /// Build a sequencer over a catalog with the configured defaults
    pub fn build_sequencer(&self, catalog: Arc<Catalog>, player: Arc<dyn ClipPlayer>) -> Result<Sequencer> {
        let settings = PlaybackSettings::from_config(&self.config.playback)
            .ok_or_else(|| anyhow!("At least one default voice is required"))?;
        let resolver = AssetResolver::from_config(&self.config.catalog)
            .context(format!("Invalid base URL: {}", self.config.catalog.base_url))?;

        Ok(Sequencer::new(
            catalog,
            player,
            resolver,
            settings,
            SequencerOptions::from_config(&self.config),
        ))
    }

    /// Load the vocabulary and print its outline
    pub async fn list(&self) -> Result<String> {
        let catalog = self.load_catalog().await?;
        Ok(format_catalog(&catalog))
    }

    /// Run the interactive player on the terminal
    pub async fn run(&self) -> Result<()> {
        let catalog = self.load_catalog().await?;
        let player = RodioClipPlayer::new(Duration::from_secs(self.config.catalog.timeout_secs))
            .context("Failed to initialize the audio player")?;
        let sequencer = self.build_sequencer(catalog, Arc::new(player))?;

        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();
        self.run_with(&sequencer, stdin, &mut stdout).await
    }

    /// With auto-advance configured, the session starts playing right away
    pub fn start_session(&self, sequencer: &Sequencer) {
        if self.config.playback.auto_advance && sequencer.state() == PlaybackState::Idle {
            info!("Auto-advance configured, starting playback");
            sequencer.toggle_playback();
        }
    }

    /// Drive a sequencer from line-based input until `q` or end of input
    pub async fn run_with<R, W>(&self, sequencer: &Sequencer, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(out, "{}", HELP)?;
        self.start_session(sequencer);
        writeln!(out, "{}", render_card(&sequencer.view(), self.config.locale))?;

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(e) => {
                    writeln!(out, "{} (h for help)", e)?;
                    continue;
                }
            };

            debug!("Command: {:?}", command);
            if self.execute(sequencer, command, out).await? == Flow::Quit {
                break;
            }
        }

        sequencer.stop();
        Ok(())
    }

    /// Apply one command and print the resulting card
    pub async fn execute<W: Write>(&self, sequencer: &Sequencer, command: Command, out: &mut W) -> Result<Flow> {
        match command {
            Command::Next => {
                sequencer.next_word();
            }
            Command::Previous => {
                sequencer.previous_word();
            }
            Command::TogglePlayback => {
                sequencer.toggle_playback();
            }
            Command::PlayWord => {
                let sequencer = sequencer.clone();
                tokio::spawn(async move {
                    if let Err(e) = sequencer.play_current_word().await {
                        debug!("One-shot playback ended with: {}", e);
                    }
                });
            }
            Command::PlayKorean => {
                let sequencer = sequencer.clone();
                tokio::spawn(async move {
                    if let Err(e) = sequencer.play_korean().await {
                        debug!("Korean clip ended with: {}", e);
                    }
                });
            }
            Command::ToggleKorean => {
                sequencer.toggle_korean();
            }
            Command::ToggleAutoAdvance => {
                sequencer.toggle_auto_advance();
            }
            Command::ToggleTranslation => {
                sequencer.toggle_translation();
            }
            Command::ToggleVoice(name) => match sequencer.toggle_voice(&name) {
                Ok(_) => {}
                Err(e @ SequencerError::UnknownVoice(_)) => {
                    warn!("{}", e);
                    let voices: Vec<String> = sequencer.catalog().voices().iter().map(|v| v.to_string()).collect();
                    writeln!(out, "Available voices: {}", voices.join(", "))?;
                }
                Err(e) => warn!("{}", e),
            },
            Command::Seek(position) => {
                if let Err(e) = sequencer.seek(position) {
                    warn!("{}", e);
                }
            }
            Command::ClearError => sequencer.clear_error(),
            Command::Status => {}
            Command::Reload => match self.load_catalog().await {
                Ok(catalog) => sequencer.replace_catalog(catalog),
                Err(e) => writeln!(out, "{:#}", e)?,
            },
            Command::Help => {
                writeln!(out, "{}", HELP)?;
                return Ok(Flow::Continue);
            }
            Command::Quit => return Ok(Flow::Quit),
        }

        writeln!(out, "{}", render_card(&sequencer.view(), self.config.locale))?;
        Ok(Flow::Continue)
    }
}

/// Text rendering of the card
pub fn render_card(view: &CardView, locale: Locale) -> String {
    let state = match view.state {
        PlaybackState::Idle => "■ stopped",
        PlaybackState::Playing => "▶ playing",
        PlaybackState::Transitioning => "▶ next word...",
    };

    let mut lines = vec![format!(
        "[{}] {}/{}  {}",
        view.part_name.as_deref().unwrap_or("-"),
        view.progress.current,
        view.progress.total,
        state
    )];

    lines.push(format!("  {}", view.word.as_deref().unwrap_or("-")));
    if let Some(translation) = &view.translation {
        lines.push(format!("  {}", translation));
    }

    lines.push(format!(
        "  voices: {} | korean: {} | auto: {} | t: {}",
        view.selected_voices.join(", "),
        on_off(view.include_korean),
        on_off(view.auto_advance),
        messages::translation_toggle_label(locale, view.show_translation)
    ));

    if let Some(error) = &view.error {
        lines.push(format!("  ! {}", error));
    }

    lines.join("\n")
}

/// Outline of the vocabulary: one line per part, then the voices
pub fn format_catalog(catalog: &Catalog) -> String {
    let mut lines: Vec<String> = catalog
        .parts()
        .iter()
        .enumerate()
        .map(|(i, part)| format!("{:>3}. {} ({} words)", i + 1, part.name, part.words.len()))
        .collect();

    let voices: Vec<String> = catalog.voices().iter().map(|v| v.to_string()).collect();
    lines.push(format!("Voices: {}", voices.join(", ")));
    lines.join("\n")
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}
