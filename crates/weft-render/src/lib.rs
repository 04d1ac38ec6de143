#![forbid(unsafe_code)]

//! Render kernel: pixel grid, frame diffing, and ANSI presentation.
//!
//! The pipeline per frame:
//!
//! 1. elements draw into a [`Screen`] (the current grid),
//! 2. [`autojoin::join_glyphs`] fuses abutting box-drawing characters,
//! 3. [`diff::ScreenDiff`] compares current against the previous frame,
//! 4. [`Presenter`] emits escape sequences for the changed runs and flips
//!    the frame.

pub mod ansi;
pub mod autojoin;
pub mod cell;
pub mod diff;
pub mod presenter;
pub mod screen;

pub use cell::{Glyph, Pixel, Rgba, StyleFlags};
pub use diff::{ChangeRun, ScreenDiff};
pub use presenter::Presenter;
pub use screen::Screen;

/// Display width of a char in terminal columns (0, 1, or 2).
#[must_use]
pub fn char_width(c: char) -> usize {
    use unicode_width::UnicodeWidthChar;
    c.width().unwrap_or(0)
}

/// Display width of a string in terminal columns.
///
/// Summed per grapheme cluster so combining marks don't add columns.
#[must_use]
pub fn str_width(s: &str) -> usize {
    use unicode_segmentation::UnicodeSegmentation;
    use unicode_width::UnicodeWidthStr;
    s.graphemes(true).map(|g| g.width()).sum()
}
