//! Newline framing over a byte channel.
//!
//! Wire format:
//! ```text
//! ┌──────────────────────────────┬────────────┐
//! │ text (≤ 64 bytes, UTF-8)     │ \n  (\r ok)│
//! └──────────────────────────────┴────────────┘
//! ```
//!
//! [`LineDecoder`] accumulates bytes and yields complete lines.  A single
//! [`ByteTransport::read`] may return part of a line or several lines; the
//! decoder copes with both.  Lines longer than the cap are discarded whole,
//! up to and including their terminator, so a flood of garbage never turns
//! into a truncated command.

use heapless::{Deque, Vec};
use log::warn;

use crate::app::commands::{raw_line, RawLine, MAX_LINE_LEN};
use crate::app::ports::LineTransport;

/// Complete lines buffered ahead of the controller.
const READY_DEPTH: usize = 4;

/// Upper bound on reads while flushing input on reinitialize.
const FLUSH_READS: usize = 16;

const LINE_END: &[u8] = b"\r\n";

/// Byte-oriented channel (UART, USB CDC, a pipe).
pub trait ByteTransport {
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes.  Returns 0 if nothing is available;
    /// never blocks.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `data`, returning how many bytes were accepted.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    fn flush(&mut self) -> Result<(), Self::Error>;
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// Streaming line decoder.
pub struct LineDecoder {
    buf: Vec<u8, MAX_LINE_LEN>,
    /// Current line outgrew the buffer; skip to the next `\n`.
    discarding: bool,
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LineDecoder {
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            discarding: false,
        }
    }

    /// Feed one byte.  Returns the line it completes, if any.
    pub fn push(&mut self, byte: u8) -> Option<RawLine> {
        match byte {
            b'\n' => {
                if core::mem::take(&mut self.discarding) {
                    warn!("dropped line longer than {} bytes", MAX_LINE_LEN);
                    self.buf.clear();
                    return None;
                }
                let line = match core::str::from_utf8(&self.buf) {
                    Ok(text) => Some(raw_line(text)),
                    Err(_) => {
                        warn!("dropped line that is not valid UTF-8");
                        None
                    }
                };
                self.buf.clear();
                line
            }
            b'\r' => None,
            _ if self.discarding => None,
            _ => {
                if self.buf.push(byte).is_err() {
                    self.discarding = true;
                }
                None
            }
        }
    }

    /// Bytes of the current, incomplete line.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Forget any partial line (e.g. after the link is reset).
    pub fn reset(&mut self) {
        self.buf.clear();
        self.discarding = false;
    }
}

// ---------------------------------------------------------------------------
// Line transport
// ---------------------------------------------------------------------------

/// [`LineTransport`] over any [`ByteTransport`].
pub struct SerialLineTransport<T: ByteTransport> {
    io: T,
    decoder: LineDecoder,
    ready: Deque<RawLine, READY_DEPTH>,
}

impl<T: ByteTransport> SerialLineTransport<T> {
    pub fn new(io: T) -> Self {
        Self {
            io,
            decoder: LineDecoder::new(),
            ready: Deque::new(),
        }
    }

    pub fn io(&self) -> &T {
        &self.io
    }

    pub fn io_mut(&mut self) -> &mut T {
        &mut self.io
    }

    /// Move whatever the channel has into the decoder.
    fn pump(&mut self) {
        let mut chunk = [0u8; 32];
        while !self.ready.is_full() {
            let n = match self.io.read(&mut chunk) {
                Ok(0) => return,
                Ok(n) => n,
                Err(e) => {
                    warn!("serial read failed: {:?}", e);
                    return;
                }
            };
            for &b in &chunk[..n] {
                if let Some(line) = self.decoder.push(b) {
                    if self.ready.push_back(line).is_err() {
                        warn!("line queue full, dropping input");
                    }
                }
            }
        }
    }

    fn write_all(&mut self, mut data: &[u8]) {
        while !data.is_empty() {
            match self.io.write(data) {
                Ok(0) => {
                    warn!("serial write stalled, {} bytes lost", data.len());
                    return;
                }
                Ok(n) => data = &data[n..],
                Err(e) => {
                    warn!("serial write failed: {:?}", e);
                    return;
                }
            }
        }
    }
}

impl<T: ByteTransport> LineTransport for SerialLineTransport<T> {
    fn has_line(&mut self) -> bool {
        if self.ready.is_empty() {
            self.pump();
        }
        !self.ready.is_empty()
    }

    fn read_line(&mut self) -> Option<String> {
        if self.ready.is_empty() {
            self.pump();
        }
        self.ready.pop_front().map(|l| l.as_str().to_owned())
    }

    fn write_line(&mut self, line: &str) {
        self.write_all(line.as_bytes());
        self.write_all(LINE_END);
        if let Err(e) = self.io.flush() {
            warn!("serial flush failed: {:?}", e);
        }
    }

    fn reinitialize(&mut self) {
        let mut scratch = [0u8; 32];
        for _ in 0..FLUSH_READS {
            match self.io.read(&mut scratch) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
        }
        self.decoder.reset();
        self.ready.clear();
    }
}
