//! Host console link: stdin/stdout standing in for the UART.
//!
//! A reader thread owns stdin and pushes framed lines into a static
//! `embassy-sync` channel; the control loop drains it without blocking.
//!
//! ```text
//! ┌──────────────┐  ConsoleInput  ┌──────────────────┐
//! │ stdin thread │───────────────▶│ ConsoleTransport │──▶ Controller
//! │  (blocking)  │  CONSOLE_RX    │  (non-blocking)  │
//! └──────────────┘                └──────────────────┘
//! ```

use std::io::{BufRead, Write};
use std::thread;
use std::time::Duration;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::{info, warn};

use crate::app::commands::{raw_line, RawLine, MAX_LINE_LEN};
use crate::app::ports::LineTransport;

/// Channel depth for console lines.
const RX_DEPTH: usize = 8;

/// Back-off while the control loop is not draining.
const RETRY: Duration = Duration::from_millis(2);

pub enum ConsoleInput {
    Line(RawLine),
    /// stdin reached end of file.
    Closed,
}

/// Inbound channel: stdin thread → control loop.
pub static CONSOLE_RX: Channel<CriticalSectionRawMutex, ConsoleInput, RX_DEPTH> = Channel::new();

fn send_blocking(mut msg: ConsoleInput) {
    loop {
        match CONSOLE_RX.try_send(msg) {
            Ok(()) => return,
            Err(embassy_sync::channel::TrySendError::Full(back)) => {
                msg = back;
                thread::sleep(RETRY);
            }
        }
    }
}

/// Spawn the stdin reader.  Call once.
pub fn spawn_stdin_reader() -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(|| {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) if line.len() > MAX_LINE_LEN => {
                        warn!("dropped line longer than {} bytes", MAX_LINE_LEN);
                    }
                    Ok(line) => send_blocking(ConsoleInput::Line(raw_line(&line))),
                    Err(e) => {
                        warn!("stdin read failed: {}", e);
                        break;
                    }
                }
            }
            info!("stdin closed");
            send_blocking(ConsoleInput::Closed);
        })
}

/// [`LineTransport`] draining [`CONSOLE_RX`] and writing to stdout.
#[derive(Default)]
pub struct ConsoleTransport {
    next: Option<RawLine>,
    closed: bool,
}

impl ConsoleTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn fill(&mut self) {
        if self.next.is_some() || self.closed {
            return;
        }
        match CONSOLE_RX.try_receive() {
            Ok(ConsoleInput::Line(line)) => self.next = Some(line),
            Ok(ConsoleInput::Closed) => self.closed = true,
            Err(_) => {}
        }
    }
}

impl LineTransport for ConsoleTransport {
    fn has_line(&mut self) -> bool {
        self.fill();
        self.next.is_some()
    }

    fn read_line(&mut self) -> Option<String> {
        self.fill();
        self.next.take().map(|l| l.as_str().to_owned())
    }

    fn write_line(&mut self, line: &str) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            warn!("stdout write failed: {}", e);
        }
    }

    fn reinitialize(&mut self) {
        self.next = None;
        while let Ok(msg) = CONSOLE_RX.try_receive() {
            if let ConsoleInput::Closed = msg {
                self.closed = true;
            }
        }
    }

    fn is_closed(&self) -> bool {
        self.closed && self.next.is_none()
    }
}
