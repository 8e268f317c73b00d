/*!
 * # wordtalk - vocabulary flashcard playback
 *
 * A Rust library that plays recorded pronunciations of vocabulary words.
 *
 * ## Features
 *
 * - Load a vocabulary dataset (parts of words with audio clips) over HTTP or from disk
 * - Play each word's English clips in the selected voices, then its Korean clip
 * - Navigate word by word, with circular wrap-around across parts
 * - Auto-advance through the whole vocabulary
 * - Stop instantly, including clips in flight and pending advances
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `catalog`: The vocabulary dataset:
 *   - `catalog::model`: Parts, words and audio references
 *   - `catalog::source`: HTTP and file dataset sources
 *   - `catalog::store`: All-or-nothing loading with a loading flag
 * - `sequencer`: Cursor, settings and the play/pause state machine:
 *   - `sequencer::navigation`: Circular cursor arithmetic
 *   - `sequencer::queue`: Play queue construction
 *   - `sequencer::token`: Playback tokens for cancellation
 * - `player`: Clip player abstraction with rodio and mock implementations
 * - `assets`: Resolution of clip references against the deployment base
 * - `messages`: Localized user-visible messages
 * - `app_controller`: Interactive terminal front-end
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod assets;
pub mod catalog;
pub mod errors;
pub mod messages;
pub mod player;
pub mod sequencer;

// Re-export main types for easier usage
pub use app_config::Config;
pub use assets::AssetResolver;
pub use catalog::{Catalog, CatalogStore, VoiceId, Word};
pub use errors::{CatalogLoadError, PlaybackError, SequencerError};
pub use player::{ClipPlayer, MockClipPlayer, RodioClipPlayer};
pub use sequencer::{PlaybackPosition, PlaybackSettings, PlaybackState, Sequencer, SequencerOptions};
