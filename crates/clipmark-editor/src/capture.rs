//! Capture sessions for clip export.
//!
//! A session lives from the moment the stream tap opens until the recorder
//! reports it stopped. Every recorder and timer event carries the id of the
//! session it belongs to, so events from a superseded session are rejected
//! instead of mutating the current buffer.

use std::fmt;

/// Identifier of one export capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(u64);

impl SessionId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "capture#{}", self.0)
    }
}

/// Hands out monotonically increasing session ids.
#[derive(Debug, Default)]
pub(crate) struct SessionCounter {
    last: u64,
}

impl SessionCounter {
    pub(crate) fn next(&mut self) -> SessionId {
        self.last += 1;
        SessionId(self.last)
    }
}

/// An in-flight capture accumulating encoded fragments in arrival order.
#[derive(Debug)]
pub struct CaptureSession {
    id: SessionId,
    fragments: Vec<Vec<u8>>,
    stopping: bool,
}

impl CaptureSession {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            fragments: Vec::new(),
            stopping: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Append a fragment if it belongs to this session.
    ///
    /// Returns `false` (and drops the bytes) for a foreign session id.
    pub fn accept(&mut self, session: SessionId, bytes: Vec<u8>) -> bool {
        if session != self.id {
            return false;
        }
        if !bytes.is_empty() {
            self.fragments.push(bytes);
        }
        true
    }

    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    pub fn buffered_bytes(&self) -> usize {
        self.fragments.iter().map(Vec::len).sum()
    }

    /// Whether the stop has been requested and the recorder is draining.
    pub fn is_stopping(&self) -> bool {
        self.stopping
    }

    pub(crate) fn mark_stopping(&mut self) {
        self.stopping = true;
    }

    /// Concatenate every fragment into one container blob.
    pub fn into_blob(self) -> Vec<u8> {
        self.fragments.concat()
    }
}
