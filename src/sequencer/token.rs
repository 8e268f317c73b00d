/*!
 * Playback tokens.
 *
 * Every traversal of a play queue holds a token. Issuing a new token or
 * revoking the current one makes all earlier tokens dead, so clips, timers and
 * continuations started under them stop at their next check.
 */

use tokio::sync::watch;

/// Issues and revokes playback tokens
#[derive(Debug)]
pub struct TokenSource {
    generation: watch::Sender<u64>,
}

/// Handle held by one traversal
#[derive(Debug)]
pub struct PlaybackToken {
    id: u64,
    generation: watch::Receiver<u64>,
}

impl TokenSource {
    pub fn new() -> Self {
        let (generation, _) = watch::channel(0);
        Self { generation }
    }

    /// Issue a fresh token; every previous token dies
    pub fn issue(&self) -> PlaybackToken {
        let mut id = 0;
        self.generation.send_modify(|g| {
            *g += 1;
            id = *g;
        });
        PlaybackToken {
            id,
            generation: self.generation.subscribe(),
        }
    }

    /// Kill every outstanding token
    pub fn revoke(&self) {
        self.generation.send_modify(|g| *g += 1);
    }
}

impl Default for TokenSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackToken {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_live(&self) -> bool {
        *self.generation.borrow() == self.id
    }

    /// Resolves once the token is dead
    pub async fn cancelled(&mut self) {
        while self.is_live() {
            if self.generation.changed().await.is_err() {
                return;
            }
        }
    }
}
