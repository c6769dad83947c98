//! Input producer: a reader thread feeding lines to the dispatch loop.

use std::io::BufRead;
use std::thread;

use tokio::sync::{mpsc, oneshot};

use crate::cancel::CancelToken;

/// One item handed from the reader thread to the dispatch loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    /// The stream failed; carries the error text. Nothing follows it.
    Failed(String),
}

/// An input paired with the acknowledgement its producer waits for.
///
/// The producer does not read another line until the loop has accepted
/// this one, so at most one line is ever in flight.
#[derive(Debug)]
pub struct Handoff {
    input: Input,
    ack: oneshot::Sender<()>,
}

impl Handoff {
    pub fn new(input: Input) -> (Self, oneshot::Receiver<()>) {
        let (ack, ack_rx) = oneshot::channel();
        (Self { input, ack }, ack_rx)
    }

    /// Take the input and release the producer.
    pub fn accept(self) -> Input {
        let _ = self.ack.send(());
        self.input
    }
}

/// Spawn the reader thread.
///
/// Reads block, so cancellation is only observed between lines: a read
/// already waiting on the terminal finishes before the thread notices the
/// token. The thread is detached and exits once the stream ends, the
/// receiver is dropped, or the token has fired after an accepted line.
pub fn spawn_producer<R>(
    reader: R,
    tx: mpsc::Sender<Handoff>,
    token: CancelToken,
) -> thread::JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        log::debug!("input producer started");
        produce(reader, &tx, &token);
        log::debug!("input producer stopped");
    })
}

fn produce<R: BufRead>(mut reader: R, tx: &mpsc::Sender<Handoff>, token: &CancelToken) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let input = match reader.read_until(b'\n', &mut buf) {
            Ok(0) => return,
            Ok(_) => Input::Line(decode_line(&buf)),
            Err(e) => Input::Failed(e.to_string()),
        };
        let failed = matches!(input, Input::Failed(_));
        let (handoff, accepted) = Handoff::new(input);
        if tx.blocking_send(handoff).is_err() || accepted.blocking_recv().is_err() {
            return;
        }
        if failed || token.is_cancelled() {
            return;
        }
    }
}

// Invalid UTF-8 is an encoding problem in one line, not the end of input.
fn decode_line(raw: &[u8]) -> String {
    let line = raw.strip_suffix(b"\n").unwrap_or(raw);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}
