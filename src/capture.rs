//! Capture sources
//!
//! Recognized text arrives asynchronously from some outside recognizer
//! (a camera scanner, an OCR tool piping lines into stdin). A
//! [`CaptureSession`] collects the items and hands the joined text to a
//! [`DocumentStore`] as a new document.

use std::io::BufRead;
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, TryRecvError};
use log::{debug, info, warn};

use crate::documents::DocumentStore;
use crate::error::CaptureError;

/// What the recognizer is looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanType {
    Barcode,
    #[default]
    Text,
}

impl ScanType {
    pub fn name(&self) -> &'static str {
        match self {
            ScanType::Barcode => "barcode",
            ScanType::Text => "text",
        }
    }
}

/// One recognized item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizedItem {
    Text(String),
    Barcode(String),
}

/// Producer of recognized items
pub trait CaptureSource {
    /// Begin capturing; items stream on the returned channel until the
    /// source is exhausted, at which point the channel disconnects
    fn start(&mut self) -> Result<Receiver<RecognizedItem>, CaptureError>;
}

/// Streams each non-empty line of a reader as a text item
pub struct LineCaptureSource<R> {
    reader: Option<R>,
    thread: Option<JoinHandle<()>>,
}

impl<R: BufRead + Send + 'static> LineCaptureSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
            thread: None,
        }
    }

    /// Wait for the reader thread to finish
    ///
    /// Returns `false` when the thread panicked.
    pub fn join(&mut self) -> bool {
        let Some(handle) = self.thread.take() else {
            return true;
        };
        match handle.join() {
            Ok(()) => true,
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                warn!("capture source thread panicked: {}", reason);
                false
            }
        }
    }
}

impl<R: BufRead + Send + 'static> CaptureSource for LineCaptureSource<R> {
    fn start(&mut self) -> Result<Receiver<RecognizedItem>, CaptureError> {
        let reader = self
            .reader
            .take()
            .ok_or_else(|| CaptureError::Source("line source already started".to_string()))?;
        let (tx, rx) = unbounded();

        let handle = thread::Builder::new()
            .name("capture-lines".to_string())
            .spawn(move || {
                for line in reader.lines() {
                    let line = match line {
                        Ok(line) => line,
                        Err(e) => {
                            warn!("capture source stopped: {}", e);
                            break;
                        }
                    };
                    let line = line.trim_end_matches('\r');
                    if line.trim().is_empty() {
                        continue;
                    }
                    if tx.send(RecognizedItem::Text(line.to_string())).is_err() {
                        debug!("capture receiver dropped");
                        break;
                    }
                }
            })
            .map_err(|e| CaptureError::Source(e.to_string()))?;

        self.thread = Some(handle);
        Ok(rx)
    }
}

/// Collected results of one scan
#[derive(Debug, Default)]
pub struct CaptureSession {
    scan_type: ScanType,
    items: Vec<RecognizedItem>,
    receiver: Option<Receiver<RecognizedItem>>,
}

impl CaptureSession {
    pub fn new(scan_type: ScanType) -> Self {
        Self {
            scan_type,
            ..Self::default()
        }
    }

    /// Start `source` and collect from it
    pub fn attach(&mut self, source: &mut dyn CaptureSource) -> Result<(), CaptureError> {
        self.receiver = Some(source.start()?);
        Ok(())
    }

    pub fn push(&mut self, item: RecognizedItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[RecognizedItem] {
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// True while an attached source may still deliver items
    pub fn is_capturing(&self) -> bool {
        self.receiver.is_some()
    }

    /// Take whatever has arrived without blocking; returns the number taken
    pub fn poll(&mut self) -> usize {
        let Some(rx) = &self.receiver else {
            return 0;
        };
        let mut taken = Vec::new();
        let mut disconnected = false;
        loop {
            match rx.try_recv() {
                Ok(item) => taken.push(item),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }
        if disconnected {
            self.receiver = None;
        }
        let count = taken.len();
        self.items.extend(taken);
        count
    }

    /// Block until the source is exhausted or no item arrives within `idle`
    pub fn wait(&mut self, idle: Duration) -> usize {
        let mut count = 0;
        while let Some(rx) = &self.receiver {
            match rx.recv_timeout(idle) {
                Ok(item) => {
                    self.items.push(item);
                    count += 1;
                }
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => self.receiver = None,
            }
        }
        count
    }

    /// Text transcripts joined by newlines; barcodes are skipped
    pub fn recognized_text(&self) -> String {
        self.items
            .iter()
            .filter_map(|item| match item {
                RecognizedItem::Text(text) => Some(text.as_str()),
                RecognizedItem::Barcode(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn header_text(&self) -> String {
        if self.items.is_empty() {
            format!("Scanning {}", self.scan_type.name())
        } else {
            format!("Recognized {} item(s)", self.items.len())
        }
    }

    /// Store the recognized text as a new document
    ///
    /// A blank `name` becomes `Scan-<unix seconds>`.
    pub fn save_to<S: DocumentStore>(
        &self,
        store: &mut S,
        name: Option<&str>,
    ) -> Result<S::Id, CaptureError> {
        let text = self.recognized_text();
        if text.is_empty() {
            return Err(CaptureError::NothingToSave);
        }

        let name = match name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => default_scan_name(SystemTime::now()),
        };

        let id = store.create(&name, &text)?;
        info!("saved {} recognized item(s) as {:?}", self.items.len(), id);
        Ok(id)
    }
}

/// `Scan-<unix seconds>` for the given moment
pub fn default_scan_name(at: SystemTime) -> String {
    let secs = at
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("Scan-{}", secs)
}
