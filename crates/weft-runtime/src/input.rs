#![forbid(unsafe_code)]

//! Input sources for the interactive loop.
//!
//! The live source polls the tty with a short timeout; the timeout
//! doubles as the clock for escape disambiguation: when nothing arrives
//! within one interval, a pending lone ESC is flushed as the Escape key.

use std::io;

use weft_core::Event;

/// Where the input thread gets its events.
pub trait InputSource: Send {
    /// Block for at most one poll interval and return whatever decoded
    /// events arrived. An empty batch is a normal timeout.
    ///
    /// `Err` means the source is gone (tty closed, read failure); the
    /// loop treats it as a request to exit.
    fn poll_events(&mut self) -> io::Result<Vec<Event>>;
}

#[cfg(unix)]
pub use tty::TtyInput;

#[cfg(unix)]
mod tty {
    use std::io::{self, Read};
    use std::os::fd::AsFd;

    use nix::poll::{PollFd, PollFlags, PollTimeout, poll};
    use weft_core::{Event, InputDecoder};

    use super::InputSource;

    const POLL_INTERVAL_MS: u16 = 50;
    const READ_BUFFER: usize = 4096;

    /// Reads and decodes bytes from the controlling terminal.
    pub struct TtyInput {
        tty: std::fs::File,
        decoder: InputDecoder,
        interval_ms: u16,
    }

    impl TtyInput {
        /// Wrap a tty handle (from `RawModeGuard::tty_reader`).
        #[must_use]
        pub fn new(tty: std::fs::File) -> Self {
            Self {
                tty,
                decoder: InputDecoder::new(),
                interval_ms: POLL_INTERVAL_MS,
            }
        }
    }

    impl InputSource for TtyInput {
        fn poll_events(&mut self) -> io::Result<Vec<Event>> {
            let mut fds = [PollFd::new(self.tty.as_fd(), PollFlags::POLLIN)];
            let ready = match poll(&mut fds, PollTimeout::from(self.interval_ms)) {
                Ok(n) => n,
                // Interrupted by a signal (SIGWINCH); treat as a timeout.
                Err(nix::errno::Errno::EINTR) => 0,
                Err(e) => return Err(io::Error::other(e)),
            };

            if ready == 0 {
                // Quiet interval: a buffered lone ESC is really Escape.
                return Ok(self.decoder.flush_pending().into_iter().collect());
            }

            let mut buf = [0u8; READ_BUFFER];
            let n = self.tty.read(&mut buf)?;
            if n == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "terminal closed",
                ));
            }
            Ok(self.decoder.feed(&buf[..n]))
        }
    }
}

/// A scripted source for tests: yields prepared batches, then reports
/// the terminal as closed.
pub struct ScriptedInput {
    batches: std::collections::VecDeque<Vec<Event>>,
}

impl ScriptedInput {
    /// Create a source that yields `batches` one per poll.
    #[must_use]
    pub fn new(batches: Vec<Vec<Event>>) -> Self {
        Self {
            batches: batches.into(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn poll_events(&mut self) -> io::Result<Vec<Event>> {
        self.batches.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted")
        })
    }
}
