#![forbid(unsafe_code)]

//! Canonical input event types.
//!
//! Every variant owns its own payload; there is no shared storage and no
//! manual tag checking. Events derive `Clone` and `PartialEq` so tests can
//! compare them structurally.
//!
//! # Design Notes
//!
//! - Mouse and cursor coordinates are 0-indexed (the wire format is
//!   1-indexed; the decoder normalizes during decode).
//! - Unrecognized escape sequences become [`Event::Special`] carrying the
//!   raw bytes verbatim, never a decode error.
//! - The named special-key table ([`KEY_SEQUENCES`]) catalogues the exact
//!   byte sequences the decoder maps to each key; a conformance test keeps
//!   the decoder and the table in agreement.

use bitflags::bitflags;

/// A decoded terminal input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A printable character or grapheme, decoded from UTF-8.
    Character(String),

    /// A named special key (arrows, function keys, Enter, ...).
    Key(KeyEvent),

    /// A mouse report.
    Mouse(MouseEvent),

    /// A cursor-position report (`CSI row ; col R`), normalized to
    /// 0-indexed screen coordinates.
    CursorPosition {
        /// Column (0-indexed).
        x: u16,
        /// Row (0-indexed).
        y: u16,
    },

    /// Pasted text from bracketed paste mode, delivered atomically.
    Paste(String),

    /// An escape sequence the decoder does not recognize, carried verbatim.
    Special(Vec<u8>),

    /// Terminal was resized.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },

    /// An application-posted wake-up value.
    Custom(u64),
}

impl Event {
    /// Build a character event from a single char.
    #[must_use]
    pub fn character(c: char) -> Self {
        Event::Character(c.to_string())
    }

    /// Build a key event with no modifiers.
    #[must_use]
    pub const fn key(code: Key) -> Self {
        Event::Key(KeyEvent::new(code))
    }

    /// Check if this is a character event.
    #[must_use]
    pub const fn is_character(&self) -> bool {
        matches!(self, Event::Character(_))
    }

    /// Check if this is a mouse event.
    #[must_use]
    pub const fn is_mouse(&self) -> bool {
        matches!(self, Event::Mouse(_))
    }
}

/// A special-key press with modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub code: Key,
    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a key event with no modifiers.
    #[must_use]
    pub const fn new(code: Key) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// Attach modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Check if Ctrl is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Check if Alt is held.
    #[must_use]
    pub const fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    /// Check if Shift is held.
    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}

/// Named special keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Enter/Return key.
    Enter,
    /// Escape key.
    Escape,
    /// Tab key.
    Tab,
    /// Shift+Tab (back-tab).
    BackTab,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Insert key.
    Insert,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page Up key.
    PageUp,
    /// Page Down key.
    PageDown,
    /// Function key (F1-F12).
    F(u8),
    /// A control character combined with Ctrl (Ctrl+A .. Ctrl+Z).
    Ctrl(char),
}

bitflags! {
    /// Modifier keys that can be held during an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b000;
        /// Shift key.
        const SHIFT = 0b001;
        /// Alt/Option key.
        const ALT   = 0b010;
        /// Control key.
        const CTRL  = 0b100;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// A mouse report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    /// Which button the report is about (meaningless for `Move`).
    pub button: MouseButton,
    /// What the mouse did.
    pub action: MouseAction,
    /// Column (0-indexed).
    pub x: u16,
    /// Row (0-indexed).
    pub y: u16,
    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl MouseEvent {
    /// Create a new mouse event with no modifiers.
    #[must_use]
    pub const fn new(button: MouseButton, action: MouseAction, x: u16, y: u16) -> Self {
        Self {
            button,
            action,
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    /// Attach modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Position as a tuple.
    #[must_use]
    pub const fn position(&self) -> (u16, u16) {
        (self.x, self.y)
    }
}

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseButton {
    /// Left mouse button.
    #[default]
    Left,
    /// Middle mouse button.
    Middle,
    /// Right mouse button.
    Right,
    /// No button (motion reports).
    None,
}

/// What a mouse report describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAction {
    /// Button pressed down.
    Press,
    /// Button released.
    Release,
    /// Moved with a button held.
    Drag,
    /// Moved with no button held.
    Move,
    /// Wheel scrolled up.
    WheelUp,
    /// Wheel scrolled down.
    WheelDown,
}

/// The fixed catalogue of named escape sequences and the keys they decode
/// to, unmodified forms only. The decoder parses these structurally; the
/// table exists so tests (and curious callers) have the mapping in one
/// place.
pub static KEY_SEQUENCES: &[(&[u8], Key)] = &[
    (b"\x1b[A", Key::Up),
    (b"\x1b[B", Key::Down),
    (b"\x1b[C", Key::Right),
    (b"\x1b[D", Key::Left),
    (b"\x1b[H", Key::Home),
    (b"\x1b[F", Key::End),
    (b"\x1b[Z", Key::BackTab),
    (b"\x1b[1~", Key::Home),
    (b"\x1b[2~", Key::Insert),
    (b"\x1b[3~", Key::Delete),
    (b"\x1b[4~", Key::End),
    (b"\x1b[5~", Key::PageUp),
    (b"\x1b[6~", Key::PageDown),
    (b"\x1b[15~", Key::F(5)),
    (b"\x1b[17~", Key::F(6)),
    (b"\x1b[18~", Key::F(7)),
    (b"\x1b[19~", Key::F(8)),
    (b"\x1b[20~", Key::F(9)),
    (b"\x1b[21~", Key::F(10)),
    (b"\x1b[23~", Key::F(11)),
    (b"\x1b[24~", Key::F(12)),
    (b"\x1bOP", Key::F(1)),
    (b"\x1bOQ", Key::F(2)),
    (b"\x1bOR", Key::F(3)),
    (b"\x1bOS", Key::F(4)),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_event_modifiers() {
        let event = KeyEvent::new(Key::Up).with_modifiers(Modifiers::CTRL | Modifiers::SHIFT);
        assert!(event.ctrl());
        assert!(event.shift());
        assert!(!event.alt());
    }

    #[test]
    fn character_predicate() {
        assert!(Event::character('a').is_character());
        assert!(!Event::key(Key::Enter).is_character());
    }

    #[test]
    fn mouse_predicate_and_position() {
        let event = Event::Mouse(MouseEvent::new(MouseButton::Left, MouseAction::Press, 4, 7));
        assert!(event.is_mouse());
        if let Event::Mouse(m) = event {
            assert_eq!(m.position(), (4, 7));
        }
    }

    #[test]
    fn events_compare_structurally() {
        assert_eq!(Event::character('x'), Event::Character("x".into()));
        assert_ne!(
            Event::Special(vec![0x1b, b'?']),
            Event::Special(vec![0x1b, b'!'])
        );
    }

    #[test]
    fn key_table_sequences_all_start_with_escape() {
        for (seq, _) in KEY_SEQUENCES {
            assert_eq!(seq[0], 0x1b);
            assert!(seq.len() >= 3);
        }
    }

    #[test]
    fn key_table_has_no_duplicate_sequences() {
        for (i, (a, _)) in KEY_SEQUENCES.iter().enumerate() {
            for (b, _) in &KEY_SEQUENCES[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
