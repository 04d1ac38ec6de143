#![forbid(unsafe_code)]

//! Input decoder state machine.
//!
//! Turns raw terminal bytes into [`Event`] values. The decoder is a pure
//! byte-at-a-time state machine: it holds no clock and performs no I/O, so
//! the same byte stream always produces the same event stream regardless of
//! how it is chunked across [`InputDecoder::feed`] calls.
//!
//! Handled inputs:
//! - printable ASCII and multi-byte UTF-8 (one [`Event::Character`] each)
//! - control codes (Enter, Tab, Backspace, Ctrl+letter)
//! - CSI sequences: arrows, navigation, function keys, modifiers
//! - SS3 sequences (F1-F4, application-mode arrows)
//! - cursor position reports (`CSI row ; col R`)
//! - SGR mouse reports, including wheel and motion
//! - bracketed paste, delivered as one [`Event::Paste`]
//! - OSC sequences (consumed and discarded)
//!
//! Anything that parses as a well-formed escape sequence but is not
//! recognized comes out as [`Event::Special`] carrying the raw bytes, so
//! callers can log or forward it. Malformed input never panics and never
//! wedges the machine.
//!
//! A bare ESC is ambiguous: it may be the Escape key or the start of a
//! sequence whose tail has not arrived. The decoder cannot resolve that
//! without a clock, so the caller's read loop invokes
//! [`InputDecoder::flush_pending`] after a read timeout to force a verdict.
//!
//! # Length limits
//!
//! Hostile or broken input cannot grow buffers without bound:
//! - CSI sequences: 256 bytes
//! - OSC sequences: 4 KB
//! - paste content: 1 MB

use crate::event::{Event, Key, KeyEvent, Modifiers, MouseAction, MouseButton, MouseEvent};

/// Maximum CSI sequence length.
const MAX_CSI_LEN: usize = 256;

/// Maximum OSC sequence length.
const MAX_OSC_LEN: usize = 4096;

/// Maximum paste content length.
const MAX_PASTE_LEN: usize = 1024 * 1024;

/// Decoder states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DecoderState {
    /// Normal character input.
    #[default]
    Ground,
    /// After ESC.
    Escape,
    /// Collecting a CSI sequence (after ESC `[`).
    Csi,
    /// After ESC `O` (SS3 introducer).
    Ss3,
    /// Collecting OSC content (after ESC `]`).
    Osc,
    /// After ESC inside OSC (possible ST terminator).
    OscEscape,
    /// Collecting a UTF-8 multi-byte sequence.
    Utf8 {
        /// Bytes collected so far.
        collected: u8,
        /// Total bytes expected.
        expected: u8,
    },
}

/// Terminal input decoder.
///
/// ```
/// use weft_core::{Event, InputDecoder, Key};
///
/// let mut decoder = InputDecoder::new();
/// assert_eq!(decoder.feed(b"\x1b[A"), vec![Event::key(Key::Up)]);
/// assert_eq!(decoder.feed(b"q"), vec![Event::character('q')]);
/// ```
#[derive(Debug)]
pub struct InputDecoder {
    /// Current state.
    state: DecoderState,
    /// Raw bytes of the escape sequence in progress, ESC included.
    seq: Vec<u8>,
    /// Paste content in progress.
    paste_buffer: Vec<u8>,
    /// UTF-8 bytes collected so far.
    utf8_buffer: [u8; 4],
    /// Whether we're inside a bracketed paste.
    in_paste: bool,
}

impl Default for InputDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl InputDecoder {
    /// Create a new decoder in the ground state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: DecoderState::Ground,
            seq: Vec::with_capacity(64),
            paste_buffer: Vec::new(),
            utf8_buffer: [0; 4],
            in_paste: false,
        }
    }

    /// Feed input bytes and return the events they complete.
    ///
    /// Bytes that end mid-sequence are retained; the next `feed` resumes
    /// where this one stopped.
    pub fn feed(&mut self, input: &[u8]) -> Vec<Event> {
        #[cfg(feature = "tracing")]
        let _span = tracing::trace_span!("decode", bytes = input.len()).entered();

        let mut events = Vec::new();
        for &byte in input {
            if let Some(event) = self.process_byte(byte) {
                events.push(event);
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(events = events.len(), "decoded");

        events
    }

    /// Resolve a sequence stalled mid-decode.
    ///
    /// Called by the read loop when no bytes arrived for a timeout interval.
    /// A lone ESC becomes the Escape key; a longer unfinished escape
    /// sequence is surrendered as [`Event::Special`]. Returns `None` when
    /// nothing is pending (partial UTF-8 and in-progress pastes keep
    /// waiting; their terminators are unambiguous).
    pub fn flush_pending(&mut self) -> Option<Event> {
        match self.state {
            DecoderState::Escape => {
                self.state = DecoderState::Ground;
                self.seq.clear();
                Some(Event::key(Key::Escape))
            }
            DecoderState::Csi | DecoderState::Ss3 | DecoderState::Osc | DecoderState::OscEscape => {
                self.state = DecoderState::Ground;
                Some(Event::Special(std::mem::take(&mut self.seq)))
            }
            DecoderState::Ground | DecoderState::Utf8 { .. } => None,
        }
    }

    /// Whether a sequence is stalled mid-decode.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !matches!(
            self.state,
            DecoderState::Ground | DecoderState::Utf8 { .. }
        )
    }

    /// Process a single byte and optionally return an event.
    fn process_byte(&mut self, byte: u8) -> Option<Event> {
        if self.in_paste {
            return self.process_paste_byte(byte);
        }

        match self.state {
            DecoderState::Ground => self.process_ground(byte),
            DecoderState::Escape => self.process_escape(byte),
            DecoderState::Csi => self.process_csi(byte),
            DecoderState::Ss3 => self.process_ss3(byte),
            DecoderState::Osc => self.process_osc(byte),
            DecoderState::OscEscape => self.process_osc_escape(byte),
            DecoderState::Utf8 { collected, expected } => {
                self.process_utf8(byte, collected, expected)
            }
        }
    }

    fn process_ground(&mut self, byte: u8) -> Option<Event> {
        match byte {
            0x1B => {
                self.state = DecoderState::Escape;
                self.seq.clear();
                self.seq.push(byte);
                None
            }
            // Tab (Ctrl+I) and Enter (Ctrl+M) before the generic Ctrl range
            0x09 => Some(Event::key(Key::Tab)),
            0x0D => Some(Event::key(Key::Enter)),
            0x01..=0x08 | 0x0A..=0x0C | 0x0E..=0x1A => {
                let c = (byte - 1 + b'a') as char;
                Some(Event::key(Key::Ctrl(c)))
            }
            0x7F => Some(Event::key(Key::Backspace)),
            0x20..=0x7E => Some(Event::character(byte as char)),
            // UTF-8 lead bytes
            0xC0..=0xDF => {
                self.utf8_buffer[0] = byte;
                self.state = DecoderState::Utf8 { collected: 1, expected: 2 };
                None
            }
            0xE0..=0xEF => {
                self.utf8_buffer[0] = byte;
                self.state = DecoderState::Utf8 { collected: 1, expected: 3 };
                None
            }
            0xF0..=0xF7 => {
                self.utf8_buffer[0] = byte;
                self.state = DecoderState::Utf8 { collected: 1, expected: 4 };
                None
            }
            // NUL and stray continuation bytes
            _ => None,
        }
    }

    fn process_escape(&mut self, byte: u8) -> Option<Event> {
        self.seq.push(byte);
        match byte {
            b'[' => {
                self.state = DecoderState::Csi;
                None
            }
            b'O' => {
                self.state = DecoderState::Ss3;
                None
            }
            b']' => {
                self.state = DecoderState::Osc;
                None
            }
            // ESC ESC: resolve the first as the Escape key, stay armed
            0x1B => {
                self.seq.clear();
                self.seq.push(0x1B);
                Some(Event::key(Key::Escape))
            }
            // ESC + printable (Alt+char in most terminals): not a named
            // sequence here, so surrender the raw bytes
            0x20..=0x7E => {
                self.state = DecoderState::Ground;
                Some(Event::Special(std::mem::take(&mut self.seq)))
            }
            _ => {
                self.state = DecoderState::Ground;
                Some(Event::Special(std::mem::take(&mut self.seq)))
            }
        }
    }

    fn process_csi(&mut self, byte: u8) -> Option<Event> {
        if self.seq.len() >= MAX_CSI_LEN {
            self.state = DecoderState::Ground;
            self.seq.clear();
            return None;
        }

        self.seq.push(byte);

        match byte {
            // Parameter and intermediate bytes
            b'0'..=b'9' | b';' | b':' | b'<' | b'=' | b'>' | b'?' | b' ' => None,
            // Final byte
            0x40..=0x7E => {
                self.state = DecoderState::Ground;
                self.finish_csi()
            }
            _ => {
                self.state = DecoderState::Ground;
                Some(Event::Special(std::mem::take(&mut self.seq)))
            }
        }
    }

    /// Interpret a complete CSI sequence held in `seq`.
    fn finish_csi(&mut self) -> Option<Event> {
        let seq = std::mem::take(&mut self.seq);
        // seq = ESC '[' params... final
        let final_byte = *seq.last()?;
        let params = &seq[2..seq.len() - 1];

        match (params, final_byte) {
            // Bracketed paste delimiters
            (b"200", b'~') => {
                self.in_paste = true;
                self.paste_buffer.clear();
                return None;
            }
            (b"201", b'~') => {
                // Stray end marker outside a paste; swallow it
                return None;
            }
            // SGR mouse report
            _ if params.first() == Some(&b'<') && matches!(final_byte, b'M' | b'm') => {
                return decode_sgr_mouse(&params[1..], final_byte)
                    .or(Some(Event::Special(seq)));
            }
            _ => {}
        }

        let event = match final_byte {
            b'A' => Some(key_with_params(Key::Up, params)),
            b'B' => Some(key_with_params(Key::Down, params)),
            b'C' => Some(key_with_params(Key::Right, params)),
            b'D' => Some(key_with_params(Key::Left, params)),
            b'H' => Some(key_with_params(Key::Home, params)),
            b'F' => Some(key_with_params(Key::End, params)),
            b'Z' => Some(Event::key(Key::BackTab)),
            b'R' => decode_cursor_report(params),
            b'~' => decode_csi_tilde(params),
            _ => None,
        };

        // Well-formed but unrecognized: hand back the raw bytes
        event.or(Some(Event::Special(seq)))
    }

    fn process_ss3(&mut self, byte: u8) -> Option<Event> {
        self.seq.push(byte);
        self.state = DecoderState::Ground;

        let code = match byte {
            b'P' => Key::F(1),
            b'Q' => Key::F(2),
            b'R' => Key::F(3),
            b'S' => Key::F(4),
            b'A' => Key::Up,
            b'B' => Key::Down,
            b'C' => Key::Right,
            b'D' => Key::Left,
            b'H' => Key::Home,
            b'F' => Key::End,
            _ => return Some(Event::Special(std::mem::take(&mut self.seq))),
        };

        self.seq.clear();
        Some(Event::key(code))
    }

    fn process_osc(&mut self, byte: u8) -> Option<Event> {
        if self.seq.len() >= MAX_OSC_LEN {
            self.state = DecoderState::Ground;
            self.seq.clear();
            return None;
        }

        match byte {
            // BEL terminates; OSC content carries no events
            0x07 => {
                self.state = DecoderState::Ground;
                self.seq.clear();
                None
            }
            0x1B => {
                self.state = DecoderState::OscEscape;
                self.seq.push(byte);
                None
            }
            _ => {
                self.seq.push(byte);
                None
            }
        }
    }

    fn process_osc_escape(&mut self, byte: u8) -> Option<Event> {
        if byte == b'\\' {
            // ST terminator
            self.state = DecoderState::Ground;
            self.seq.clear();
            None
        } else {
            self.seq.push(byte);
            self.state = DecoderState::Osc;
            None
        }
    }

    fn process_utf8(&mut self, byte: u8, collected: u8, expected: u8) -> Option<Event> {
        if (byte & 0xC0) != 0x80 {
            // Invalid continuation; drop the partial and reprocess this byte
            self.state = DecoderState::Ground;
            return self.process_byte(byte);
        }

        self.utf8_buffer[collected as usize] = byte;
        let collected = collected + 1;

        if collected == expected {
            self.state = DecoderState::Ground;
            let s = std::str::from_utf8(&self.utf8_buffer[..expected as usize]).ok()?;
            Some(Event::Character(s.to_owned()))
        } else {
            self.state = DecoderState::Utf8 { collected, expected };
            None
        }
    }

    fn process_paste_byte(&mut self, byte: u8) -> Option<Event> {
        const END_SEQ: &[u8] = b"\x1b[201~";

        if self.paste_buffer.len() >= MAX_PASTE_LEN + END_SEQ.len() {
            // Excess content is dropped; keep scanning for the terminator
            // by retaining only the tail that could be a partial END_SEQ.
            let keep_from = self.paste_buffer.len() - END_SEQ.len();
            self.paste_buffer.drain(..keep_from);
        }

        self.paste_buffer.push(byte);

        if self.paste_buffer.ends_with(END_SEQ) {
            self.in_paste = false;
            let content_len = self.paste_buffer.len() - END_SEQ.len();
            let content = String::from_utf8_lossy(&self.paste_buffer[..content_len]).into_owned();
            self.paste_buffer.clear();
            return Some(Event::Paste(content));
        }

        None
    }
}

/// Key event with xterm modifier params applied.
fn key_with_params(code: Key, params: &[u8]) -> Event {
    Event::Key(KeyEvent::new(code).with_modifiers(modifier_param(params)))
}

/// Parse the modifier parameter (second `;`-field) of a CSI sequence.
fn modifier_param(params: &[u8]) -> Modifiers {
    let Ok(s) = std::str::from_utf8(params) else {
        return Modifiers::NONE;
    };
    let value: u32 = s
        .split(';')
        .nth(1)
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);
    modifiers_from_xterm(value)
}

/// xterm modifier encoding: value = 1 + bits, Shift=1 Alt=2 Ctrl=4.
fn modifiers_from_xterm(value: u32) -> Modifiers {
    let bits = value.saturating_sub(1);
    let mut mods = Modifiers::NONE;
    if bits & 1 != 0 {
        mods |= Modifiers::SHIFT;
    }
    if bits & 2 != 0 {
        mods |= Modifiers::ALT;
    }
    if bits & 4 != 0 {
        mods |= Modifiers::CTRL;
    }
    mods
}

/// CSI sequences ending in `~` (navigation and function keys).
fn decode_csi_tilde(params: &[u8]) -> Option<Event> {
    let s = std::str::from_utf8(params).ok()?;
    let num: u32 = s.split(';').next()?.parse().ok()?;
    let mods = modifier_param(params);

    let code = match num {
        1 => Key::Home,
        2 => Key::Insert,
        3 => Key::Delete,
        4 => Key::End,
        5 => Key::PageUp,
        6 => Key::PageDown,
        15 => Key::F(5),
        17 => Key::F(6),
        18 => Key::F(7),
        19 => Key::F(8),
        20 => Key::F(9),
        21 => Key::F(10),
        23 => Key::F(11),
        24 => Key::F(12),
        _ => return None,
    };

    Some(Event::Key(KeyEvent::new(code).with_modifiers(mods)))
}

/// Cursor position report: `CSI row ; col R`, 1-indexed on the wire.
fn decode_cursor_report(params: &[u8]) -> Option<Event> {
    let s = std::str::from_utf8(params).ok()?;
    let mut parts = s.split(';');
    let row: u16 = parts.next()?.parse().ok()?;
    let col: u16 = parts.next()?.parse().ok()?;
    Some(Event::CursorPosition {
        x: col.saturating_sub(1),
        y: row.saturating_sub(1),
    })
}

/// SGR mouse report: `CSI < button ; x ; y M|m` (leading `<` stripped).
fn decode_sgr_mouse(params: &[u8], final_byte: u8) -> Option<Event> {
    let s = std::str::from_utf8(params).ok()?;
    let mut parts = s.split(';');

    let code: u16 = parts.next()?.parse().ok()?;
    let x: u16 = parts.next()?.parse().ok()?;
    let y: u16 = parts.next()?.parse().ok()?;

    let button = match code & 0b11 {
        0 => MouseButton::Left,
        1 => MouseButton::Middle,
        2 => MouseButton::Right,
        _ => MouseButton::None,
    };

    let mut mods = Modifiers::NONE;
    if code & 4 != 0 {
        mods |= Modifiers::SHIFT;
    }
    if code & 8 != 0 {
        mods |= Modifiers::ALT;
    }
    if code & 16 != 0 {
        mods |= Modifiers::CTRL;
    }

    let action = if code & 64 != 0 {
        // Wheel: low bit picks the direction, direction ignores M/m
        if code & 1 != 0 {
            MouseAction::WheelDown
        } else {
            MouseAction::WheelUp
        }
    } else if code & 32 != 0 {
        if button == MouseButton::None {
            MouseAction::Move
        } else {
            MouseAction::Drag
        }
    } else if final_byte == b'M' {
        MouseAction::Press
    } else {
        MouseAction::Release
    };

    Some(Event::Mouse(
        MouseEvent::new(button, action, x.saturating_sub(1), y.saturating_sub(1))
            .with_modifiers(mods),
    ))
}
