#![forbid(unsafe_code)]

//! Terminal output with state tracking.
//!
//! The presenter turns a [`ScreenDiff`] into the smallest escape stream it
//! knows how to produce: one cursor move per run (none when the cursor is
//! already in place), style changes only when a cell's attributes differ
//! from what the terminal is currently set to, and a single flush per
//! frame through a 64 KB buffer.
//!
//! Style changes use reset-then-apply: emit `SGR 0` and rebuild the full
//! attribute set. Turning individual attributes off has inconsistent
//! sequences across terminals; a reset does not.

use std::io::{self, BufWriter, Write};

use crate::ansi;
use crate::cell::{Rgba, StyleFlags};
use crate::diff::ScreenDiff;
use crate::screen::Screen;

const BUFFER_SIZE: usize = 64 * 1024;

/// Writes frame differences to a terminal, tracking cursor position and
/// SGR state to skip redundant sequences.
pub struct Presenter<W: Write> {
    writer: BufWriter<W>,
    /// Last emitted (fg, bg, flags), or `None` after a reset.
    style: Option<(Rgba, Rgba, StyleFlags)>,
    /// Where the terminal cursor is, or `None` when unknown.
    cursor: Option<(u16, u16)>,
}

impl<W: Write> Presenter<W> {
    /// Wrap a writer. No bytes are emitted until the first presentation.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(BUFFER_SIZE, writer),
            style: None,
            cursor: None,
        }
    }

    /// Emit the difference between the screen's current and previous
    /// frames, then retain the current frame as presented.
    ///
    /// An empty difference writes nothing at all.
    pub fn present(&mut self, screen: &mut Screen) -> io::Result<()> {
        let diff = ScreenDiff::compute(screen);
        if diff.is_empty() {
            return Ok(());
        }

        #[cfg(feature = "tracing")]
        let _span =
            tracing::debug_span!("present", cells = diff.len()).entered();

        for run in diff.runs() {
            let mut x = run.x0;
            while x <= run.x1 {
                let Some(pixel) = screen.get(x, run.y).copied() else {
                    break;
                };
                if pixel.is_continuation() {
                    // Already painted by its head.
                    x += 1;
                    continue;
                }

                if self.cursor != Some((x, run.y)) {
                    ansi::cup(&mut self.writer, run.y, x)?;
                }

                let style = (pixel.fg, pixel.bg, pixel.style);
                if self.style != Some(style) {
                    ansi::sgr_reset(&mut self.writer)?;
                    ansi::sgr_flags(&mut self.writer, pixel.style)?;
                    ansi::sgr_fg(&mut self.writer, pixel.fg)?;
                    ansi::sgr_bg(&mut self.writer, pixel.bg)?;
                    self.style = Some(style);
                }

                let width = match pixel.glyph.as_char() {
                    Some(c) if pixel.glyph.width() > 0 => {
                        let mut buf = [0u8; 4];
                        self.writer
                            .write_all(c.encode_utf8(&mut buf).as_bytes())?;
                        pixel.glyph.width() as u16
                    }
                    _ => {
                        // Empty and zero-width cells paint as a space.
                        self.writer.write_all(b" ")?;
                        1
                    }
                };
                self.cursor = Some((x + width, run.y));
                x += width;
            }
        }

        ansi::sgr_reset(&mut self.writer)?;
        self.style = None;
        self.writer.flush()?;
        screen.flip();
        Ok(())
    }

    /// Erase the display and home the cursor.
    pub fn clear_screen(&mut self) -> io::Result<()> {
        self.writer.write_all(ansi::ERASE_DISPLAY)?;
        ansi::cup(&mut self.writer, 0, 0)?;
        self.cursor = Some((0, 0));
        self.writer.flush()
    }

    /// Hide the terminal cursor.
    pub fn hide_cursor(&mut self) -> io::Result<()> {
        self.writer.write_all(ansi::CURSOR_HIDE)?;
        self.writer.flush()
    }

    /// Show the terminal cursor.
    pub fn show_cursor(&mut self) -> io::Result<()> {
        self.writer.write_all(ansi::CURSOR_SHOW)?;
        self.writer.flush()
    }

    /// Reset SGR state and drop the tracked caches. Use after another
    /// writer may have touched the terminal.
    pub fn reset(&mut self) -> io::Result<()> {
        ansi::sgr_reset(&mut self.writer)?;
        self.style = None;
        self.cursor = None;
        self.writer.flush()
    }

    /// Flush buffered bytes to the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> io::Result<W> {
        self.writer.into_inner().map_err(io::IntoInnerError::into_error)
    }
}

impl<W: Write> std::fmt::Debug for Presenter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Presenter")
            .field("style", &self.style)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}
