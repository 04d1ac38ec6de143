#![forbid(unsafe_code)]

//! Unix terminal lifecycle: raw mode, window size, resize signals.
//!
//! ## Escape Sequence Reference
//!
//! | Feature           | Enable           | Disable          |
//! |-------------------|------------------|------------------|
//! | Alternate screen  | `CSI ? 1049 h`   | `CSI ? 1049 l`   |
//! | Mouse (SGR)       | `CSI ? 1000;1002;1003;1006 h` | `CSI ? 1000;1002;1003;1006 l` |
//! | Bracketed paste   | `CSI ? 2004 h`   | `CSI ? 2004 l`   |
//! | Cursor show/hide  | `CSI ? 25 h`     | `CSI ? 25 l`     |

use std::io::{self, Write};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use signal_hook::consts::signal::SIGWINCH;
use signal_hook::iterator::Signals;

pub const ALT_SCREEN_ENTER: &[u8] = b"\x1b[?1049h";
pub const ALT_SCREEN_LEAVE: &[u8] = b"\x1b[?1049l";

pub const MOUSE_ENABLE: &[u8] = b"\x1b[?1000;1002;1003;1006h";
pub const MOUSE_DISABLE: &[u8] = b"\x1b[?1000;1002;1003;1006l";

pub const BRACKETED_PASTE_ENABLE: &[u8] = b"\x1b[?2004h";
pub const BRACKETED_PASTE_DISABLE: &[u8] = b"\x1b[?2004l";

pub const CURSOR_SHOW: &[u8] = b"\x1b[?25h";
pub const CURSOR_HIDE: &[u8] = b"\x1b[?25l";

/// Request a cursor position report (`CSI row ; col R` comes back on stdin).
pub const CURSOR_POSITION_REQUEST: &[u8] = b"\x1b[6n";

pub const CLEAR_SCREEN: &[u8] = b"\x1b[2J";
pub const CURSOR_HOME: &[u8] = b"\x1b[H";

/// RAII guard that saves the original termios and restores it on drop.
///
/// Opens `/dev/tty` to get an owned fd valid for the lifetime of the guard,
/// avoiding unsafe `BorrowedFd` construction. Even if the application
/// panics, the Drop impl runs (unless `panic = "abort"`) and the terminal
/// returns to its original state.
pub struct RawModeGuard {
    original_termios: nix::sys::termios::Termios,
    tty: std::fs::File,
}

impl RawModeGuard {
    /// Enter raw mode on the controlling terminal.
    pub fn enter() -> io::Result<Self> {
        let tty = std::fs::File::open("/dev/tty")?;

        let original_termios = nix::sys::termios::tcgetattr(&tty).map_err(io::Error::other)?;

        let mut raw = original_termios.clone();
        nix::sys::termios::cfmakeraw(&mut raw);
        nix::sys::termios::tcsetattr(&tty, nix::sys::termios::SetArg::TCSAFLUSH, &raw)
            .map_err(io::Error::other)?;

        Ok(Self {
            original_termios,
            tty,
        })
    }

    /// Clone of the tty handle, for reading input from the same device.
    pub fn tty_reader(&self) -> io::Result<std::fs::File> {
        self.tty.try_clone()
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        // Best-effort restore; errors during cleanup have nowhere to go.
        let _ = nix::sys::termios::tcsetattr(
            &self.tty,
            nix::sys::termios::SetArg::TCSAFLUSH,
            &self.original_termios,
        );
    }
}

/// Query the terminal size from the controlling tty.
///
/// Falls back to 80x24 when the size cannot be determined (not a tty, or
/// the ioctl fails).
#[must_use]
pub fn terminal_size() -> (u16, u16) {
    if let Ok(tty) = std::fs::File::open("/dev/tty")
        && let Ok(ws) = rustix::termios::tcgetwinsize(&tty)
        && ws.ws_col > 0
        && ws.ws_row > 0
    {
        return (ws.ws_col, ws.ws_row);
    }
    (80, 24)
}

/// The cleanup sequence the panic hook and session teardown both write.
fn write_restore_sequence(writer: &mut impl Write) -> io::Result<()> {
    writer.write_all(MOUSE_DISABLE)?;
    writer.write_all(BRACKETED_PASTE_DISABLE)?;
    writer.write_all(CURSOR_SHOW)?;
    writer.write_all(ALT_SCREEN_LEAVE)?;
    writer.flush()
}

/// Install a panic hook that restores the terminal before the default hook
/// prints the panic message.
///
/// The guard is shared with the session; taking it out of the mutex here
/// restores termios exactly once even if teardown also runs.
pub fn install_panic_hook(guard: Arc<Mutex<Option<RawModeGuard>>>) {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let mut stdout = io::stdout();
        let _ = write_restore_sequence(&mut stdout);
        if let Ok(mut slot) = guard.lock() {
            // Dropping the guard restores termios.
            slot.take();
        }
        default_hook(info);
    }));
}

/// Watches SIGWINCH on a dedicated thread and reports resizes.
///
/// The signal only says "something changed"; the authoritative size comes
/// from the ioctl at notification time. Notifications are coalesced: a
/// storm of signals produces at most one pending notification.
pub struct ResizeWatch {
    rx: mpsc::Receiver<()>,
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl ResizeWatch {
    /// Start watching for terminal resizes.
    pub fn new() -> io::Result<Self> {
        let (tx, rx) = mpsc::sync_channel(1);
        let mut signals = Signals::new([SIGWINCH]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let thread = std::thread::spawn(move || {
            for _ in signals.forever() {
                let _ = tx.try_send(());
            }
        });

        Ok(Self {
            rx,
            handle,
            thread: Some(thread),
        })
    }

    /// Current size if a resize happened since the last poll.
    #[must_use]
    pub fn poll(&self) -> Option<(u16, u16)> {
        match self.rx.try_recv() {
            Ok(()) => Some(terminal_size()),
            Err(_) => None,
        }
    }
}

impl Drop for ResizeWatch {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
