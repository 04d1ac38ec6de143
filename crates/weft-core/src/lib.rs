#![forbid(unsafe_code)]

//! Core: geometry, events, input decoding, and terminal lifecycle.

pub mod decoder;
pub mod event;
pub mod geometry;
#[cfg(unix)]
pub mod terminal;

pub use decoder::InputDecoder;
pub use event::{Event, Key, KeyEvent, Modifiers, MouseAction, MouseButton, MouseEvent};
pub use geometry::Rect;
