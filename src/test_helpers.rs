use std::io::{self, Read, Write};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use crate::cancel::CancelToken;
use crate::commands::{from_fn, Handler};
use crate::error::HandlerError;

/// Handler that does nothing and succeeds.
pub fn noop() -> impl Handler {
    from_fn(|_, _| Ok(()))
}

/// Handler that always fails with `message`.
pub fn failing(message: &'static str) -> impl Handler {
    from_fn(move |_, _| Err(HandlerError::from(message)))
}

/// Records the arguments of every invocation.
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handler(&self) -> impl Handler + use<> {
        let calls = Arc::clone(&self.calls);
        from_fn(move |_: &CancelToken, args: &[String]| {
            calls.lock().unwrap().push(args.to_vec());
            Ok(())
        })
    }

    /// Like `handler`, but reports `message` after recording the call.
    pub fn failing_handler(&self, message: &'static str) -> impl Handler + use<> {
        let calls = Arc::clone(&self.calls);
        from_fn(move |_: &CancelToken, args: &[String]| {
            calls.lock().unwrap().push(args.to_vec());
            Err(HandlerError::from(message))
        })
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

/// In-memory writer whose contents stay readable after it is moved away.
#[derive(Clone, Default)]
pub struct SharedBuf {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Reader that blocks until bytes are pushed through the paired sender.
/// Dropping the sender ends the stream.
pub struct BlockingReader {
    rx: mpsc::Receiver<Vec<u8>>,
    pending: Vec<u8>,
}

impl BlockingReader {
    pub fn new() -> (mpsc::Sender<Vec<u8>>, Self) {
        let (tx, rx) = mpsc::channel();
        (
            tx,
            Self {
                rx,
                pending: Vec::new(),
            },
        )
    }
}

impl Read for BlockingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pending.is_empty() {
            match self.rx.recv() {
                Ok(bytes) => self.pending = bytes,
                Err(_) => return Ok(0),
            }
        }
        let n = buf.len().min(self.pending.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.drain(..n);
        Ok(n)
    }
}
