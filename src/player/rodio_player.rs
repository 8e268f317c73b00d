use async_trait::async_trait;
use bytes::Bytes;
use log::debug;
use parking_lot::Mutex;
use reqwest::Client;
use rodio::{Decoder, OutputStream, Sink};
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use url::Url;

use crate::errors::PlaybackError;
use crate::player::ClipPlayer;

/// How often the playback thread checks for the end of the clip or a stop request
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Clip player backed by the default audio output device
#[derive(Debug)]
pub struct RodioClipPlayer {
    /// HTTP client for remote clips
    client: Client,
    /// Stop flag of the clip currently playing
    current: Mutex<Option<Arc<AtomicBool>>>,
}

/// Raises the stop flag when the play future is dropped
struct StopOnDrop(Arc<AtomicBool>);

impl Drop for StopOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl RodioClipPlayer {
    /// Create a player whose downloads time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, PlaybackError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PlaybackError::Device {
                url: String::new(),
                reason: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            current: Mutex::new(None),
        })
    }

    async fn fetch(&self, url: &Url) -> Result<Bytes, PlaybackError> {
        let load_error = |reason: String| PlaybackError::Load {
            url: url.to_string(),
            reason,
        };

        match url.scheme() {
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|_| load_error("not a local path".to_string()))?;
                let content = tokio::fs::read(&path)
                    .await
                    .map_err(|e| load_error(e.to_string()))?;
                Ok(Bytes::from(content))
            }
            "http" | "https" => {
                let response = self
                    .client
                    .get(url.clone())
                    .send()
                    .await
                    .map_err(|e| load_error(e.to_string()))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(load_error(format!("HTTP status {}", status.as_u16())));
                }

                response.bytes().await.map_err(|e| load_error(e.to_string()))
            }
            other => Err(load_error(format!("unsupported scheme '{}'", other))),
        }
    }
}

#[async_trait]
impl ClipPlayer for RodioClipPlayer {
    async fn play(&self, url: &Url) -> Result<(), PlaybackError> {
        let data = self.fetch(url).await?;

        let stop = Arc::new(AtomicBool::new(false));
        *self.current.lock() = Some(Arc::clone(&stop));
        let _guard = StopOnDrop(Arc::clone(&stop));

        debug!("Playing {}", url);
        let clip = url.to_string();
        let result = tokio::task::spawn_blocking(move || play_blocking(data, &stop, &clip)).await;

        match result {
            Ok(outcome) => outcome,
            Err(e) => Err(PlaybackError::Device {
                url: url.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    fn cancel(&self) {
        if let Some(stop) = self.current.lock().take() {
            stop.store(true, Ordering::SeqCst);
        }
    }
}

// @runs: On a blocking thread; the output stream cannot leave it
fn play_blocking(data: Bytes, stop: &AtomicBool, clip: &str) -> Result<(), PlaybackError> {
    let device_error = |reason: String| PlaybackError::Device {
        url: clip.to_string(),
        reason,
    };

    let (_stream, handle) = OutputStream::try_default().map_err(|e| device_error(e.to_string()))?;
    let sink = Sink::try_new(&handle).map_err(|e| device_error(e.to_string()))?;
    let source = Decoder::new(Cursor::new(data)).map_err(|e| PlaybackError::Load {
        url: clip.to_string(),
        reason: e.to_string(),
    })?;

    sink.append(source);
    while !sink.empty() {
        if stop.load(Ordering::SeqCst) {
            debug!("Stopped {} before its end", clip);
            sink.stop();
            break;
        }
        std::thread::sleep(POLL_INTERVAL);
    }

    Ok(())
}
