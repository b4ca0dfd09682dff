//! Worker thread management
//!
//! Renders documents on a dedicated thread so a live editor can submit a
//! render on every keystroke. Each request carries a sequence number and
//! only the newest result is kept.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use log::debug;

use crate::palette::Palette;
use crate::render_engines::styler::{RenderCache, StyleEngine, StyledDocument};
use crate::style::StyleConfig;

/// Messages sent from the owner to the worker
#[derive(Debug)]
pub enum WorkerMessage {
    Render {
        seq: u64,
        text: String,
        config: StyleConfig,
    },
    /// Swap the palettes used to resolve colors
    SetPalettes { backgrounds: Palette, text_colors: Palette },
    Shutdown,
}

/// A finished render
#[derive(Debug, Clone)]
pub struct RenderResponse {
    pub seq: u64,
    pub document: StyledDocument,
    /// Milliseconds spent rendering
    pub render_time: u64,
}

/// Handle to the render thread
pub struct RenderWorker {
    request_tx: Sender<WorkerMessage>,
    response_rx: Receiver<RenderResponse>,
    next_seq: u64,
    thread: Option<JoinHandle<()>>,
}

impl RenderWorker {
    /// Spawn the render thread
    pub fn spawn(engine: StyleEngine) -> std::io::Result<Self> {
        let (request_tx, request_rx) = unbounded::<WorkerMessage>();
        let (response_tx, response_rx) = unbounded::<RenderResponse>();

        let thread = thread::Builder::new()
            .name("render-worker".to_string())
            .spawn(move || worker_loop(engine, request_rx, response_tx))?;

        Ok(Self {
            request_tx,
            response_rx,
            next_seq: 0,
            thread: Some(thread),
        })
    }

    /// Queue a render; returns its sequence number
    pub fn submit(&mut self, text: impl Into<String>, config: &StyleConfig) -> u64 {
        self.next_seq += 1;
        let seq = self.next_seq;
        let _ = self.request_tx.send(WorkerMessage::Render {
            seq,
            text: text.into(),
            config: config.clone(),
        });
        seq
    }

    pub fn set_palettes(&self, backgrounds: Palette, text_colors: Palette) {
        let _ = self.request_tx.send(WorkerMessage::SetPalettes {
            backgrounds,
            text_colors,
        });
    }

    /// Sequence number of the most recent submission
    pub fn latest_seq(&self) -> u64 {
        self.next_seq
    }

    pub fn responses(&self) -> &Receiver<RenderResponse> {
        &self.response_rx
    }

    pub fn try_recv(&self) -> Option<RenderResponse> {
        self.response_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<RenderResponse> {
        match self.response_rx.recv_timeout(timeout) {
            Ok(response) => Some(response),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Stop the thread and wait for it to exit
    pub fn shutdown(mut self) {
        let _ = self.request_tx.send(WorkerMessage::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

/// Processes messages until shutdown
fn worker_loop(
    mut engine: StyleEngine,
    rx: Receiver<WorkerMessage>,
    tx: Sender<RenderResponse>,
) {
    let mut cache = RenderCache::new();

    while let Ok(msg) = rx.recv() {
        match msg {
            WorkerMessage::Shutdown => break,

            WorkerMessage::SetPalettes {
                backgrounds,
                text_colors,
            } => {
                engine = StyleEngine::new(backgrounds, text_colors);
                cache.clear();
            }

            WorkerMessage::Render { seq, text, config } => {
                let start = Instant::now();
                let document = cache.render(&engine, &text, &config).clone();
                let response = RenderResponse {
                    seq,
                    document,
                    render_time: start.elapsed().as_millis() as u64,
                };
                if tx.send(response).is_err() {
                    break;
                }
            }
        }
    }

    debug!(
        "render worker exiting after {} hits, {} misses",
        cache.hits(),
        cache.misses()
    );
}

/// Keeps the newest render result, dropping stale ones
#[derive(Debug, Default)]
pub struct LatestRender {
    seq: Option<u64>,
    document: Option<StyledDocument>,
}

impl LatestRender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take `response` if it is newer than what is held
    pub fn accept(&mut self, response: RenderResponse) -> bool {
        if matches!(self.seq, Some(seq) if response.seq <= seq) {
            debug!("dropping stale render {}", response.seq);
            return false;
        }
        self.seq = Some(response.seq);
        self.document = Some(response.document);
        true
    }

    pub fn seq(&self) -> Option<u64> {
        self.seq
    }

    pub fn document(&self) -> Option<&StyledDocument> {
        self.document.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_space::Rgb;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn test_spawn_and_shutdown() {
        let worker = RenderWorker::spawn(StyleEngine::default()).unwrap();
        worker.shutdown();
    }

    #[test]
    fn test_render_request() {
        let mut worker = RenderWorker::spawn(StyleEngine::default()).unwrap();
        let config = StyleConfig::default().with_bionic(true);
        let seq = worker.submit("hello world", &config);

        let response = worker.recv_timeout(TIMEOUT).unwrap();
        assert_eq!(response.seq, seq);
        assert_eq!(response.document.to_markup(), "**he**llo **wo**rld");
        worker.shutdown();
    }

    #[test]
    fn test_sequence_numbers_increase() {
        let mut worker = RenderWorker::spawn(StyleEngine::default()).unwrap();
        let config = StyleConfig::default();
        let first = worker.submit("a", &config);
        let second = worker.submit("ab", &config);
        assert!(second > first);
        assert_eq!(worker.latest_seq(), second);
        worker.shutdown();
    }

    #[test]
    fn test_latest_render_drops_stale() {
        let mut worker = RenderWorker::spawn(StyleEngine::default()).unwrap();
        let config = StyleConfig::default();
        worker.submit("old", &config);
        worker.submit("new", &config);

        let first = worker.recv_timeout(TIMEOUT).unwrap();
        let second = worker.recv_timeout(TIMEOUT).unwrap();

        let mut latest = LatestRender::new();
        assert!(latest.accept(second));
        assert!(!latest.accept(first));
        assert_eq!(latest.document().unwrap().plain_text(), "new");
        assert_eq!(latest.seq(), Some(2));
        worker.shutdown();
    }

    #[test]
    fn test_set_palettes() {
        let mut worker = RenderWorker::spawn(StyleEngine::default()).unwrap();
        let mut backgrounds = Palette::backgrounds();
        let mint = Rgb::new(200, 240, 220);
        backgrounds.set_custom(mint);
        worker.set_palettes(backgrounds.clone(), Palette::text_colors());

        let config = StyleConfig::default().with_background_color_index(backgrounds.custom_index());
        worker.submit("x", &config);
        let response = worker.recv_timeout(TIMEOUT).unwrap();
        assert_eq!(response.document.background_color, mint);
        worker.shutdown();
    }
}
