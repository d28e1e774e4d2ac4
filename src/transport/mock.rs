//! Scripted transport for tests and offline development.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::Transport;
use crate::error::Result;

/// Transport that replays a canned script instead of touching hardware.
///
/// Reads hand out queued chunks one at a time; a queued empty chunk, or an
/// exhausted script, reads as silence. Writes and the close call are
/// recorded behind shared handles so a test can inspect them after the
/// session has consumed the transport.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    reads: VecDeque<Vec<u8>>,
    writes: Arc<Mutex<Vec<Vec<u8>>>>,
    close_count: Arc<Mutex<u32>>,
}

impl ScriptedTransport {
    /// Create a transport with an empty script (every read is silent).
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a chunk to be handed out by the next read.
    pub fn push_read(&mut self, chunk: &[u8]) {
        self.reads.push_back(chunk.to_vec());
    }

    /// Queue an explicitly silent read (timeout window with no data).
    pub fn push_silence(&mut self) {
        self.reads.push_back(Vec::new());
    }

    /// Handle for inspecting everything written to the link.
    pub fn writes(&self) -> Arc<Mutex<Vec<Vec<u8>>>> {
        Arc::clone(&self.writes)
    }

    /// Handle for counting close calls.
    pub fn close_count(&self) -> Arc<Mutex<u32>> {
        Arc::clone(&self.close_count)
    }
}

impl Transport for ScriptedTransport {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self.reads.pop_front() {
            Some(chunk) => {
                let n = chunk.len().min(buf.len());
                buf[..n].copy_from_slice(&chunk[..n]);
                // Anything that did not fit is delivered by the next read.
                if n < chunk.len() {
                    self.reads.push_front(chunk[n..].to_vec());
                }
                Ok(n)
            }
            None => Ok(0),
        }
    }

    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.writes.lock().unwrap().push(data.to_vec());
        Ok(())
    }

    fn close(self) -> Result<()> {
        *self.close_count.lock().unwrap() += 1;
        Ok(())
    }
}
