//! Asynchronous level loading
//!
//! Each request is its own object owned by the caller. The fetch runs on a
//! worker thread and the result arrives over a channel exactly once; the
//! caller polls without blocking.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use super::LevelId;
use super::layout::LevelLayout;
use crate::error::LevelLoadError;

/// Outcome of a level fetch
pub type LevelResult = Result<LevelLayout, LevelLoadError>;

/// Anything that can produce level layouts
pub trait LevelSource: Send + Sync + 'static {
    fn fetch(&self, id: LevelId) -> LevelResult;
}

/// Reads `<root>/level{n}.json`
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, id: LevelId) -> PathBuf {
        self.root.join(format!("{}.json", id.tag()))
    }
}

impl LevelSource for DirectorySource {
    fn fetch(&self, id: LevelId) -> LevelResult {
        let path = self.path_for(id);
        let json = std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LevelLoadError::NotFound(id)
            } else {
                LevelLoadError::Io { id, source }
            }
        })?;
        log::debug!("Read {}", path.display());
        LevelLayout::from_json(id, &json)
    }
}

/// Pending single-fire result for one level
#[derive(Debug)]
pub struct LevelRequest {
    id: LevelId,
    rx: Option<Receiver<LevelResult>>,
}

/// Completion side of a `LevelRequest`
#[derive(Debug)]
pub struct LevelResponder {
    id: LevelId,
    tx: Sender<LevelResult>,
}

impl LevelRequest {
    /// A request completed by hand through the returned responder
    pub fn channel(id: LevelId) -> (Self, LevelResponder) {
        let (tx, rx) = mpsc::channel();
        (Self { id, rx: Some(rx) }, LevelResponder { id, tx })
    }

    pub fn id(&self) -> LevelId {
        self.id
    }

    /// True once the result has been handed out
    pub fn is_finished(&self) -> bool {
        self.rx.is_none()
    }

    /// Non-blocking check. Yields the result once, then `None` forever.
    pub fn poll(&mut self) -> Option<LevelResult> {
        let rx = self.rx.as_ref()?;
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(LevelLoadError::Cancelled(self.id)),
        };
        self.rx = None;
        Some(result)
    }

    /// Block for at most `timeout`
    pub fn wait_timeout(&mut self, timeout: Duration) -> Option<LevelResult> {
        let rx = self.rx.as_ref()?;
        let result = match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => return None,
            Err(RecvTimeoutError::Disconnected) => Err(LevelLoadError::Cancelled(self.id)),
        };
        self.rx = None;
        Some(result)
    }
}

impl LevelResponder {
    pub fn id(&self) -> LevelId {
        self.id
    }

    pub fn complete(self, result: LevelResult) {
        if self.tx.send(result).is_err() {
            log::debug!("Request for level {} was dropped before completion", self.id);
        }
    }
}

/// Spawns a worker per request
#[derive(Debug)]
pub struct LevelLoader<S> {
    source: Arc<S>,
}

impl<S: LevelSource> LevelLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch a level in the background
    pub fn request(&self, id: LevelId) -> LevelRequest {
        let (request, responder) = LevelRequest::channel(id);
        let source = Arc::clone(&self.source);
        let spawned = thread::Builder::new()
            .name(format!("level-loader-{}", id.tag()))
            .spawn(move || responder.complete(source.fetch(id)));
        if let Err(e) = spawned {
            // The responder went down with the closure; the request reports Cancelled
            log::error!("Failed to spawn loader for level {}: {}", id, e);
        }
        request
    }
}
