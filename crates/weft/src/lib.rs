#![forbid(unsafe_code)]

//! weft public facade crate.
//!
//! Re-exports the common types from the internal crates and offers a
//! lightweight prelude for day-to-day usage:
//!
//! ```no_run
//! use weft::prelude::*;
//!
//! let mut root = renderer(|| {
//!     border(hbox(vec![
//!         text("hello") | bold(),
//!         filler(),
//!         text("world"),
//!     ]))
//! });
//! InteractiveLoop::new().run(&mut root).expect("terminal session");
//! ```

// --- Core re-exports -------------------------------------------------------

pub use weft_core::{
    Event, InputDecoder, Key, KeyEvent, Modifiers, MouseAction, MouseButton,
    MouseEvent, Rect,
};

// --- Render re-exports -----------------------------------------------------

pub use weft_render::{
    Glyph, Pixel, Presenter, Rgba, Screen, ScreenDiff, StyleFlags,
};

// --- Document re-exports ---------------------------------------------------

pub use weft_dom::{
    Decorate, Element, Node, Requirement, bg, blink, bold, border, dbox, dim,
    fg, filler, fit_size, flex, flex_grow, hbox, inverted, italic, render_at,
    separator, strikethrough, text, underlined, vbox,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use weft_runtime::{
    Component, Container, EventQueue, InteractiveLoop, LoopContext, LoopState,
    Renderer, renderer,
};

// --- Prelude ---------------------------------------------------------------

pub mod prelude {
    //! The working set for a typical weft program.

    pub use crate::{
        Decorate, Element, Event, Key, KeyEvent, Modifiers, Rect, Rgba,
        Screen, StyleFlags, bg, bold, border, dbox, dim, fg, filler,
        fit_size, flex, hbox, inverted, italic, render_at, separator, text,
        underlined, vbox,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{Component, Container, InteractiveLoop, LoopContext, renderer};
}
