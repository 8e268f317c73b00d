/*!
 * Audio clip players.
 *
 * The sequencer depends only on the `ClipPlayer` trait:
 * - `rodio_player`: decodes clips and plays them on the default output device
 * - `mock`: records requests and simulates timing or failures, for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;
use url::Url;

use crate::errors::PlaybackError;

/// Plays one clip at a time
///
/// Implementations must be cancellable: `cancel()` stops whatever clip is
/// currently sounding, and the pending `play` call then returns.
#[async_trait]
pub trait ClipPlayer: Send + Sync + Debug {
    /// Play a clip to its natural end
    ///
    /// # Arguments
    /// * `url` - Fully resolved location of the clip
    ///
    /// # Returns
    /// * `Result<(), PlaybackError>` - Ok once the clip ended or was cancelled
    async fn play(&self, url: &Url) -> Result<(), PlaybackError>;

    /// Stop the clip currently playing, if any
    fn cancel(&self);
}

pub mod mock;
pub mod rodio_player;

pub use mock::{MockBehavior, MockClipPlayer};
pub use rodio_player::RodioClipPlayer;
