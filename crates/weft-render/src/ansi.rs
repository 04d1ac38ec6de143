#![forbid(unsafe_code)]

//! ANSI escape sequence generation.
//!
//! Pure byte-generation helpers with no state tracking; the presenter owns
//! the state and calls in here only when something actually changed.
//!
//! # Sequence Reference
//!
//! | Category | Sequence             | Description                       |
//! |----------|----------------------|-----------------------------------|
//! | CSI      | `ESC [ n m`          | SGR (Select Graphic Rendition)    |
//! | CSI      | `ESC [ row ; col H`  | CUP (Cursor Position, 1-indexed)  |
//! | CSI      | `ESC [ 2 J`          | ED (Erase Display)                |
//! | CSI      | `ESC [ ? 25 h/l`     | Cursor show/hide                  |

use std::io::{self, Write};

use crate::cell::{Rgba, StyleFlags};

/// SGR reset: `CSI 0 m`
pub const SGR_RESET: &[u8] = b"\x1b[0m";

/// Cursor show: `CSI ? 25 h`
pub const CURSOR_SHOW: &[u8] = b"\x1b[?25h";

/// Cursor hide: `CSI ? 25 l`
pub const CURSOR_HIDE: &[u8] = b"\x1b[?25l";

/// Erase the whole display: `CSI 2 J`
pub const ERASE_DISPLAY: &[u8] = b"\x1b[2J";

/// Write SGR reset.
#[inline]
pub fn sgr_reset<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(SGR_RESET)
}

/// Ordered table of (flag, SGR "on" code).
const FLAG_TABLE: [(StyleFlags, u8); 7] = [
    (StyleFlags::BOLD, 1),
    (StyleFlags::DIM, 2),
    (StyleFlags::ITALIC, 3),
    (StyleFlags::UNDERLINED, 4),
    (StyleFlags::BLINK, 5),
    (StyleFlags::INVERTED, 7),
    (StyleFlags::STRIKETHROUGH, 9),
];

/// Write one `CSI n ; n ; ... m` enabling every set flag.
///
/// No reset is emitted here; the presenter's reset-then-apply strategy
/// handles state.
pub fn sgr_flags<W: Write>(w: &mut W, flags: StyleFlags) -> io::Result<()> {
    if flags.is_empty() {
        return Ok(());
    }

    w.write_all(b"\x1b[")?;
    let mut first = true;
    for (flag, code) in FLAG_TABLE {
        if flags.contains(flag) {
            if !first {
                w.write_all(b";")?;
            }
            write!(w, "{code}")?;
            first = false;
        }
    }
    w.write_all(b"m")
}

/// Foreground color: truecolor `CSI 38;2;r;g;b m`, or default `CSI 39 m`
/// for the transparent sentinel.
pub fn sgr_fg<W: Write>(w: &mut W, color: Rgba) -> io::Result<()> {
    if color.is_default() {
        w.write_all(b"\x1b[39m")
    } else {
        write!(w, "\x1b[38;2;{};{};{}m", color.r(), color.g(), color.b())
    }
}

/// Background color: truecolor `CSI 48;2;r;g;b m`, or default `CSI 49 m`
/// for the transparent sentinel.
pub fn sgr_bg<W: Write>(w: &mut W, color: Rgba) -> io::Result<()> {
    if color.is_default() {
        w.write_all(b"\x1b[49m")
    } else {
        write!(w, "\x1b[48;2;{};{};{}m", color.r(), color.g(), color.b())
    }
}

/// CUP: move the cursor to (row, col), 0-indexed input, 1-indexed wire.
pub fn cup<W: Write>(w: &mut W, row: u16, col: u16) -> io::Result<()> {
    write!(
        w,
        "\x1b[{};{}H",
        row.saturating_add(1),
        col.saturating_add(1)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> Vec<u8> {
        let mut buf = Vec::new();
        f(&mut buf).expect("writes to Vec cannot fail");
        buf
    }

    #[test]
    fn cup_is_one_indexed() {
        assert_eq!(collect(|w| cup(w, 0, 0)), b"\x1b[1;1H");
        assert_eq!(collect(|w| cup(w, 5, 10)), b"\x1b[6;11H");
    }

    #[test]
    fn sgr_flags_single() {
        assert_eq!(collect(|w| sgr_flags(w, StyleFlags::UNDERLINED)), b"\x1b[4m");
        assert_eq!(collect(|w| sgr_flags(w, StyleFlags::BOLD)), b"\x1b[1m");
    }

    #[test]
    fn sgr_flags_combined_in_table_order() {
        let flags = StyleFlags::BOLD | StyleFlags::UNDERLINED | StyleFlags::INVERTED;
        assert_eq!(collect(|w| sgr_flags(w, flags)), b"\x1b[1;4;7m");
    }

    #[test]
    fn sgr_flags_empty_writes_nothing() {
        assert!(collect(|w| sgr_flags(w, StyleFlags::empty())).is_empty());
    }

    #[test]
    fn truecolor_and_default_colors() {
        assert_eq!(
            collect(|w| sgr_fg(w, Rgba::rgb(255, 10, 0))),
            b"\x1b[38;2;255;10;0m"
        );
        assert_eq!(collect(|w| sgr_fg(w, Rgba::TRANSPARENT)), b"\x1b[39m");
        assert_eq!(
            collect(|w| sgr_bg(w, Rgba::rgb(0, 0, 1))),
            b"\x1b[48;2;0;0;1m"
        );
        assert_eq!(collect(|w| sgr_bg(w, Rgba::TRANSPARENT)), b"\x1b[49m");
    }
}
