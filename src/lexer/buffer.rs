//! Double-buffered read-ahead over a [`ByteSource`].
//!
//! Two blocks circulate between the scanner and a background worker thread.
//! The scanner reads from the *active* block while the worker refills the
//! other one. When the active block runs dry it is handed back to the worker
//! over the recycle channel and the refilled block is taken from the filled
//! channel, which blocks only if the worker has not finished yet.
//!
//! ```text
//!            recycle (exhausted block)
//!   scanner ---------------------------> worker ---> ByteSource::read_block
//!      ^                                   |
//!      +-----------------------------------+
//!            filled (io::Result<block>)
//! ```
//!
//! Both channels are bounded to one slot; with exactly two blocks in play
//! neither side can get more than one block ahead of the other.

use std::{
    io::{self, Read},
    mem,
    thread::{self, JoinHandle},
};

use crossbeam::channel::{bounded, Receiver, Sender};
use tracing::debug;

use super::source::ByteSource;

/// Default block size in bytes.
pub const DEFAULT_CAPACITY: usize = 1024;

/// State of the block that is not currently being scanned.
#[derive(Debug)]
enum Standby {
    /// Filled and waiting to become active.
    Ready(Vec<u8>),
    /// Handed to the worker; the result arrives on the filled channel.
    Refilling,
    /// End of input has been observed; no more blocks will arrive.
    Drained,
    /// A refill failed. Every later read reports the same error.
    Failed(io::ErrorKind, String),
}

pub struct DoubleBuffer {
    active: Vec<u8>,
    pos: usize,
    standby: Standby,
    capacity: usize,
    recycle: Option<Sender<Vec<u8>>>,
    filled: Receiver<io::Result<Vec<u8>>>,
    worker: Option<JoinHandle<()>>,
    swaps: usize,
}

impl DoubleBuffer {
    /// Fills both blocks synchronously, then starts the refill worker if the
    /// input was not already exhausted by the two initial reads.
    pub fn new<R>(reader: R, capacity: usize) -> io::Result<Self>
    where
        R: Read + Send + 'static,
    {
        let mut source = ByteSource::new(reader, capacity);
        let capacity = source.capacity();

        let mut first = Vec::with_capacity(capacity);
        source.read_block(&mut first)?;
        let mut second = Vec::with_capacity(capacity);
        source.read_block(&mut second)?;

        debug!(capacity, first = first.len(), second = second.len(), "initial fill");

        let (recycle_tx, recycle_rx) = bounded::<Vec<u8>>(1);
        let (filled_tx, filled_rx) = bounded::<io::Result<Vec<u8>>>(1);

        let (standby, recycle, worker) = if second.is_empty() {
            (Standby::Drained, None, None)
        } else {
            let worker = thread::Builder::new()
                .name(String::from("lexer-refill"))
                .spawn(move || refill_worker(source, recycle_rx, filled_tx))?;
            (Standby::Ready(second), Some(recycle_tx), Some(worker))
        };

        Ok(DoubleBuffer {
            active: first,
            pos: 0,
            standby,
            capacity,
            recycle,
            filled: filled_rx,
            worker,
            swaps: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of times the active block has been replaced.
    pub fn swaps(&self) -> usize {
        self.swaps
    }

    /// Returns the next byte and moves past it, swapping blocks when the
    /// active one is exhausted. `None` means end of input.
    pub fn next_byte(&mut self) -> io::Result<Option<u8>> {
        if self.pos >= self.active.len() && !self.swap()? {
            return Ok(None);
        }

        let byte = self.active[self.pos];
        self.pos += 1;
        Ok(Some(byte))
    }

    /// Returns the byte [`next_byte`](Self::next_byte) would return, without
    /// consuming it. At the end of the active block this looks into the
    /// standby block, waiting for an in-flight refill if necessary.
    pub fn peek_byte(&mut self) -> io::Result<Option<u8>> {
        if let Some(&byte) = self.active.get(self.pos) {
            return Ok(Some(byte));
        }

        if let Standby::Refilling = self.standby {
            self.standby = Standby::Ready(self.await_refill()?);
        }

        match &self.standby {
            Standby::Ready(block) => Ok(block.first().copied()),
            Standby::Failed(kind, message) => Err(io::Error::new(*kind, message.clone())),
            Standby::Refilling | Standby::Drained => Ok(None),
        }
    }

    /// Makes the standby block active and schedules a refill of the one just
    /// exhausted. Returns `false` once there is no more input.
    fn swap(&mut self) -> io::Result<bool> {
        let next = match mem::replace(&mut self.standby, Standby::Drained) {
            Standby::Ready(block) => block,
            Standby::Refilling => self.await_refill()?,
            Standby::Drained => Vec::new(),
            Standby::Failed(kind, message) => {
                let err = io::Error::new(kind, message.clone());
                self.standby = Standby::Failed(kind, message);
                return Err(err);
            }
        };

        if next.is_empty() {
            self.active.clear();
            self.pos = 0;
            self.shutdown();
            return Ok(false);
        }

        let exhausted = mem::replace(&mut self.active, next);
        self.pos = 0;
        self.swaps += 1;
        debug!(swap = self.swaps, len = self.active.len(), "swapped active block");

        if let Some(recycle) = &self.recycle {
            if recycle.send(exhausted).is_ok() {
                self.standby = Standby::Refilling;
            }
        }

        Ok(true)
    }

    /// Blocks until the worker hands back the block it was refilling. A
    /// failure is recorded in `standby` so it is reported again on every
    /// later read.
    fn await_refill(&mut self) -> io::Result<Vec<u8>> {
        let result = match self.filled.recv() {
            Ok(result) => result,
            // The worker exited without handing back the block.
            Err(_) => Err(io::Error::new(io::ErrorKind::BrokenPipe, "refill worker stopped")),
        };

        result.map_err(|err| {
            debug!(error = %err, "read-ahead stopped");
            self.standby = Standby::Failed(err.kind(), err.to_string());
            err
        })
    }

    fn shutdown(&mut self) {
        self.recycle.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                debug!("refill worker panicked");
            }
        }
    }
}

impl Drop for DoubleBuffer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn refill_worker<R: Read>(
    mut source: ByteSource<R>,
    recycle: Receiver<Vec<u8>>,
    filled: Sender<io::Result<Vec<u8>>>,
) {
    for mut block in recycle.iter() {
        let result = source.read_block(&mut block).map(|_| block);
        let last = match &result {
            Ok(block) => {
                debug!(len = block.len(), "refilled block");
                block.is_empty()
            }
            Err(err) => {
                debug!(error = %err, "refill failed");
                true
            }
        };

        if filled.send(result).is_err() || last {
            break;
        }
    }
}
