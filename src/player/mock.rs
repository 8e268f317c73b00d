/*!
 * Mock clip player for testing.
 *
 * This module provides a player that simulates different behaviors:
 * - `MockClipPlayer::instant()` - Every clip ends immediately
 * - `MockClipPlayer::timed(ms)` - Every clip lasts a fixed time (use with paused tokio time)
 * - `MockClipPlayer::failing()` - Every clip fails to load
 * - `MockClipPlayer::failing_on(marker)` - Clips whose URL contains the marker fail
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;
use url::Url;

use crate::errors::PlaybackError;
use crate::player::ClipPlayer;

/// Behavior mode for the mock player
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Clips end as soon as they start
    Instant,
    /// Clips end after a fixed duration unless cancelled
    Timed { duration_ms: u64 },
    /// Every clip fails
    Failing,
    /// Clips whose URL contains the marker fail, others end immediately
    FailingOn { marker: String },
}

/// Mock player recording every request
#[derive(Debug)]
pub struct MockClipPlayer {
    /// Behavior mode
    behavior: MockBehavior,
    /// URLs passed to play(), in order
    calls: Arc<Mutex<Vec<String>>>,
    /// Clips that reached their end
    completed: Arc<AtomicUsize>,
    /// Calls to cancel()
    cancels: Arc<AtomicUsize>,
    /// Wakes timed clips on cancel()
    cancel_signal: Arc<Notify>,
}

impl MockClipPlayer {
    /// Create a new mock player with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(Mutex::new(Vec::new())),
            completed: Arc::new(AtomicUsize::new(0)),
            cancels: Arc::new(AtomicUsize::new(0)),
            cancel_signal: Arc::new(Notify::new()),
        }
    }

    pub fn instant() -> Self {
        Self::new(MockBehavior::Instant)
    }

    pub fn timed(duration_ms: u64) -> Self {
        Self::new(MockBehavior::Timed { duration_ms })
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn failing_on(marker: impl Into<String>) -> Self {
        Self::new(MockBehavior::FailingOn {
            marker: marker.into(),
        })
    }

    /// URLs requested so far
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Number of play() calls so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Number of clips that played to their end
    pub fn completed_count(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Number of cancel() calls so far
    pub fn cancel_count(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }

    fn load_error(url: &Url) -> PlaybackError {
        PlaybackError::Load {
            url: url.to_string(),
            reason: "mock failure".to_string(),
        }
    }
}

#[async_trait]
impl ClipPlayer for MockClipPlayer {
    async fn play(&self, url: &Url) -> Result<(), PlaybackError> {
        self.calls.lock().push(url.to_string());

        match &self.behavior {
            MockBehavior::Instant => {}
            MockBehavior::Timed { duration_ms } => {
                tokio::select! {
                    _ = tokio::time::sleep(Duration::from_millis(*duration_ms)) => {}
                    _ = self.cancel_signal.notified() => return Ok(()),
                }
            }
            MockBehavior::Failing => return Err(Self::load_error(url)),
            MockBehavior::FailingOn { marker } => {
                if url.as_str().contains(marker.as_str()) {
                    return Err(Self::load_error(url));
                }
            }
        }

        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
        self.cancel_signal.notify_waiters();
    }
}
