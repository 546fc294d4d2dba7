//! Mock transport for testing

use super::Transport;
use crate::error::{Error, Result};
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

/// Scripted transport for hardware-free testing
///
/// Each injected chunk is returned by one `read` call (split further only if
/// the caller's buffer is smaller). Clones share the same script, so a test
/// can keep injecting while a session owns another clone.
#[derive(Clone)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

enum Scripted {
    Data(Vec<u8>),
    Error(String),
}

struct MockTransportInner {
    script: VecDeque<Scripted>,
    reads: usize,
}

impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        MockTransport {
            inner: Arc::new(Mutex::new(MockTransportInner {
                script: VecDeque::new(),
                reads: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockTransportInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue a chunk to be returned by a future read
    pub fn inject_read(&self, data: &[u8]) {
        self.lock().script.push_back(Scripted::Data(data.to_vec()));
    }

    /// Queue a read failure
    pub fn inject_error(&self, message: &str) {
        self.lock()
            .script
            .push_back(Scripted::Error(message.to_string()));
    }

    /// Number of scripted chunks and errors not yet consumed
    pub fn pending(&self) -> usize {
        self.lock().script.len()
    }

    /// Number of `read` calls that returned data or an error
    pub fn reads(&self) -> usize {
        self.lock().reads
    }

    /// Drop everything not yet read
    pub fn clear_read(&self) {
        self.lock().script.clear();
    }
}

impl Transport for MockTransport {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let mut inner = self.lock();
        let Some(next) = inner.script.pop_front() else {
            return Ok(0);
        };
        inner.reads += 1;

        match next {
            Scripted::Data(mut data) => {
                let n = data.len().min(buffer.len());
                buffer[..n].copy_from_slice(&data[..n]);
                if n < data.len() {
                    inner.script.push_front(Scripted::Data(data.split_off(n)));
                }
                Ok(n)
            }
            Scripted::Error(message) => Err(Error::Io(io::Error::other(message))),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}
