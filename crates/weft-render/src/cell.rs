#![forbid(unsafe_code)]

//! Pixel types and invariants.
//!
//! The `Pixel` is the unit of the terminal grid. Each pixel occupies exactly
//! **16 bytes** so four fit in a 64-byte cache line and the diff's equality
//! check can lower to a single 128-bit compare.
//!
//! # Layout (16 bytes)
//!
//! ```text
//! Pixel {
//!     glyph: Glyph,       // 4 bytes - packed char
//!     fg:    Rgba,        // 4 bytes - foreground color
//!     bg:    Rgba,        // 4 bytes - background color
//!     style: StyleFlags,  // 4 bytes - style flags
//! }
//! ```
//!
//! # Wide glyphs
//!
//! A glyph of display width 2 occupies its head cell plus exactly one
//! [`Glyph::CONTINUATION`] cell to its right. Continuation cells are never
//! written independently; [`crate::Screen::set`] maintains the pairing.

use crate::char_width;

/// Pixel content: a Unicode scalar packed into 4 bytes.
///
/// # Special values
///
/// - `EMPTY` (0): nothing drawn here; presents as a space
/// - `CONTINUATION` (`0x7FFF_FFFF`): trailing column of a wide glyph;
///   the value is outside the Unicode scalar range, so it can never
///   collide with a real character
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Glyph(u32);

impl Glyph {
    /// Empty cell (no character).
    pub const EMPTY: Self = Self(0);

    /// Trailing column of a glyph with display width 2.
    pub const CONTINUATION: Self = Self(0x7FFF_FFFF);

    /// Pack a character.
    #[inline]
    pub const fn from_char(c: char) -> Self {
        Self(c as u32)
    }

    /// Check if this is the trailing half of a wide glyph.
    #[inline]
    pub const fn is_continuation(self) -> bool {
        self.0 == Self::CONTINUATION.0
    }

    /// Check if this cell holds no character.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == Self::EMPTY.0
    }

    /// Extract the character, if any.
    ///
    /// `None` for `EMPTY` and `CONTINUATION`.
    #[inline]
    pub fn as_char(self) -> Option<char> {
        if self.is_empty() || self.is_continuation() {
            None
        } else {
            char::from_u32(self.0)
        }
    }

    /// Display width in columns: 0 for empty/continuation, else per
    /// Unicode width.
    #[inline]
    pub fn width(self) -> usize {
        match self.as_char() {
            Some(c) => char_width(c),
            None => 0,
        }
    }

    /// Raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl Default for Glyph {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl core::fmt::Debug for Glyph {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_empty() {
            write!(f, "Glyph::EMPTY")
        } else if self.is_continuation() {
            write!(f, "Glyph::CONTINUATION")
        } else if let Some(c) = self.as_char() {
            write!(f, "Glyph({c:?})")
        } else {
            write!(f, "Glyph(0x{:08x})", self.0)
        }
    }
}

/// A compact RGBA color, `0xRRGGBBAA` (R in bits 31..24, A in bits 7..0).
///
/// `TRANSPARENT` (alpha 0) means "the terminal's default color"; the
/// presenter maps it to SGR 39/49 rather than a truecolor sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(transparent)]
pub struct Rgba(pub u32);

impl Rgba {
    /// The terminal's default color (alpha = 0).
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Opaque green.
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    /// Opaque blue.
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    /// Create an opaque RGB color (alpha = 255).
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Create an RGBA color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    /// Red channel.
    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Green channel.
    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Blue channel.
    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Alpha channel.
    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// Whether this is the terminal-default sentinel.
    #[inline]
    pub const fn is_default(self) -> bool {
        self.a() == 0
    }
}

bitflags::bitflags! {
    /// Cell style flags, one per SGR attribute the presenter can emit.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u32 {
        /// Bold / increased intensity.
        const BOLD          = 0b0000_0001;
        /// Dim / decreased intensity.
        const DIM           = 0b0000_0010;
        /// Italic text.
        const ITALIC        = 0b0000_0100;
        /// Underlined text.
        const UNDERLINED    = 0b0000_1000;
        /// Blinking text.
        const BLINK         = 0b0001_0000;
        /// Reverse video (swap fg/bg).
        const INVERTED      = 0b0010_0000;
        /// Strikethrough text.
        const STRIKETHROUGH = 0b0100_0000;
    }
}

/// A single terminal cell (16 bytes).
///
/// # Invariants
///
/// - Size is exactly 16 bytes (compile-time assert below)
/// - A continuation pixel carries the colors of its head so background
///   styling spans the full glyph
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(C, align(16))]
pub struct Pixel {
    /// Character content.
    pub glyph: Glyph,
    /// Foreground color.
    pub fg: Rgba,
    /// Background color.
    pub bg: Rgba,
    /// Style flags.
    pub style: StyleFlags,
}

const _: () = assert!(core::mem::size_of::<Pixel>() == 16);

impl Pixel {
    /// Create a pixel with the given glyph and default colors.
    #[inline]
    #[must_use]
    pub const fn new(glyph: Glyph) -> Self {
        Self {
            glyph,
            fg: Rgba::TRANSPARENT,
            bg: Rgba::TRANSPARENT,
            style: StyleFlags::empty(),
        }
    }

    /// Create a pixel from a single character.
    #[inline]
    #[must_use]
    pub const fn from_char(c: char) -> Self {
        Self::new(Glyph::from_char(c))
    }

    /// The continuation placeholder paired with this pixel's colors.
    #[inline]
    #[must_use]
    pub const fn continuation_of(&self) -> Self {
        Self {
            glyph: Glyph::CONTINUATION,
            fg: self.fg,
            bg: self.bg,
            style: self.style,
        }
    }

    /// Check if this is a continuation pixel.
    #[inline]
    #[must_use]
    pub const fn is_continuation(&self) -> bool {
        self.glyph.is_continuation()
    }

    /// Check if this pixel holds no character.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.glyph.is_empty()
    }

    /// Bitwise equality (the diff fast path).
    ///
    /// Non-short-circuit `&` so all four u32 comparisons always run; LLVM
    /// can lower this to one 128-bit compare.
    #[inline]
    #[must_use]
    pub fn bits_eq(&self, other: &Self) -> bool {
        (self.glyph.raw() == other.glyph.raw())
            & (self.fg == other.fg)
            & (self.bg == other.bg)
            & (self.style == other.style)
    }

    /// Set the glyph, preserving colors and style.
    #[inline]
    #[must_use]
    pub const fn with_char(mut self, c: char) -> Self {
        self.glyph = Glyph::from_char(c);
        self
    }

    /// Set the foreground color.
    #[inline]
    #[must_use]
    pub const fn with_fg(mut self, fg: Rgba) -> Self {
        self.fg = fg;
        self
    }

    /// Set the background color.
    #[inline]
    #[must_use]
    pub const fn with_bg(mut self, bg: Rgba) -> Self {
        self.bg = bg;
        self
    }

    /// Set the style flags.
    #[inline]
    #[must_use]
    pub const fn with_style(mut self, style: StyleFlags) -> Self {
        self.style = style;
        self
    }
}

impl Default for Pixel {
    fn default() -> Self {
        Self::new(Glyph::EMPTY)
    }
}

impl core::fmt::Debug for Pixel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pixel")
            .field("glyph", &self.glyph)
            .field("fg", &self.fg)
            .field("bg", &self.bg)
            .field("style", &self.style)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Glyph, Pixel, Rgba, StyleFlags};

    #[test]
    fn pixel_is_16_bytes() {
        assert_eq!(core::mem::size_of::<Pixel>(), 16);
        assert_eq!(core::mem::align_of::<Pixel>(), 16);
    }

    #[test]
    fn glyph_special_values() {
        assert!(Glyph::EMPTY.is_empty());
        assert!(!Glyph::EMPTY.is_continuation());
        assert!(Glyph::CONTINUATION.is_continuation());
        assert_eq!(Glyph::EMPTY.as_char(), None);
        assert_eq!(Glyph::CONTINUATION.as_char(), None);
        assert_eq!(Glyph::EMPTY.width(), 0);
        assert_eq!(Glyph::CONTINUATION.width(), 0);
    }

    #[test]
    fn glyph_char_roundtrip() {
        let g = Glyph::from_char('測');
        assert_eq!(g.as_char(), Some('測'));
        assert_eq!(g.width(), 2);
        assert_eq!(Glyph::from_char('x').width(), 1);
    }

    #[test]
    fn continuation_outside_scalar_range() {
        assert!(char::from_u32(Glyph::CONTINUATION.raw()).is_none());
    }

    #[test]
    fn rgba_channels() {
        let c = Rgba::rgba(10, 20, 30, 40);
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (10, 20, 30, 40));
        assert_eq!(Rgba::rgb(1, 2, 3).a(), 255);
    }

    #[test]
    fn rgba_default_sentinel() {
        assert!(Rgba::TRANSPARENT.is_default());
        assert!(Rgba::default().is_default());
        assert!(!Rgba::WHITE.is_default());
    }

    #[test]
    fn pixel_default_is_empty_unstyled() {
        let p = Pixel::default();
        assert!(p.is_empty());
        assert!(p.fg.is_default());
        assert!(p.bg.is_default());
        assert!(p.style.is_empty());
    }

    #[test]
    fn continuation_inherits_colors() {
        let head = Pixel::from_char('日')
            .with_fg(Rgba::RED)
            .with_bg(Rgba::BLUE)
            .with_style(StyleFlags::BOLD);
        let tail = head.continuation_of();
        assert!(tail.is_continuation());
        assert_eq!(tail.fg, Rgba::RED);
        assert_eq!(tail.bg, Rgba::BLUE);
        assert_eq!(tail.style, StyleFlags::BOLD);
    }

    #[test]
    fn bits_eq_detects_each_field() {
        let base = Pixel::from_char('x');
        assert!(base.bits_eq(&base));
        assert!(!base.bits_eq(&base.with_char('y')));
        assert!(!base.bits_eq(&base.with_fg(Rgba::RED)));
        assert!(!base.bits_eq(&base.with_bg(Rgba::GREEN)));
        assert!(!base.bits_eq(&base.with_style(StyleFlags::UNDERLINED)));
    }

    #[test]
    fn builders_preserve_other_fields() {
        let p = Pixel::from_char('a')
            .with_fg(Rgba::RED)
            .with_style(StyleFlags::BOLD | StyleFlags::ITALIC)
            .with_char('b');
        assert_eq!(p.glyph.as_char(), Some('b'));
        assert_eq!(p.fg, Rgba::RED);
        assert_eq!(p.style, StyleFlags::BOLD | StyleFlags::ITALIC);
    }
}
