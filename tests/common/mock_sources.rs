/*!
 * Mock catalog sources for testing
 *
 * These sources serve predetermined payloads so loading can be tested
 * without a server.
 */

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use parking_lot::Mutex;

use wordtalk::catalog::CatalogSource;
use wordtalk::errors::CatalogLoadError;

/// What one fetch returns
#[derive(Debug, Clone)]
pub enum Response {
    /// The payload is served as is
    Body(String),
    /// The server answers with this status
    Status(u16),
    /// The connection fails
    Unreachable,
}

/// Serves scripted responses in order; the last one repeats
#[derive(Debug)]
pub struct ScriptedSource {
    responses: Mutex<VecDeque<Response>>,
    fetches: Arc<AtomicUsize>,
    delay: Duration,
}

impl ScriptedSource {
    pub fn new(responses: Vec<Response>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            fetches: Arc::new(AtomicUsize::new(0)),
            delay: Duration::ZERO,
        }
    }

    /// Serve a single body forever
    pub fn body(json: &str) -> Self {
        Self::new(vec![Response::Body(json.to_string())])
    }

    /// Wait before answering each fetch
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn next_response(&self) -> Option<Response> {
        let mut responses = self.responses.lock();
        if responses.len() > 1 {
            responses.pop_front()
        } else {
            responses.front().cloned()
        }
    }
}

#[async_trait]
impl CatalogSource for ScriptedSource {
    async fn fetch(&self) -> Result<Bytes, CatalogLoadError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self.next_response() {
            Some(Response::Body(json)) => Ok(Bytes::from(json)),
            Some(Response::Status(status_code)) => Err(CatalogLoadError::Status {
                status_code,
                url: self.location(),
            }),
            Some(Response::Unreachable) | None => {
                Err(CatalogLoadError::Fetch("connection refused".to_string()))
            }
        }
    }

    fn location(&self) -> String {
        "mock://vocabulary.json".to_string()
    }
}
