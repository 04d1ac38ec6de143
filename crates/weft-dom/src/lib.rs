#![forbid(unsafe_code)]

//! Declarative element tree with two-pass layout.
//!
//! Documents are built from element constructors and composed with `|`:
//!
//! ```
//! use weft_dom::{border, filler, hbox, text, underlined, render_at};
//! use weft_core::Rect;
//! use weft_render::Screen;
//!
//! let mut document = border(hbox(vec![
//!     text("left") | underlined(),
//!     filler(),
//!     text("right"),
//! ]));
//!
//! let mut screen = Screen::new(30, 3);
//! render_at(&mut screen, Rect::from_size(30, 3), &mut document);
//! ```
//!
//! Layout is a bottom-up requirement pass followed by a top-down
//! placement pass; see [`node`] for the contract.

pub mod border;
pub mod containers;
pub mod decorator;
pub mod leaves;
pub mod node;

pub use decorator::{
    Decorate, bg, blink, bold, dim, fg, flex, flex_grow, inverted, italic,
    strikethrough, underlined,
};
pub use node::{Element, Node, Requirement, fit_size, render_at};

use containers::{DBox, HBox, VBox};
use leaves::{Filler, Separator, Text};

/// A single line of text.
#[must_use]
pub fn text(content: impl Into<String>) -> Element {
    Box::new(Text::new(content.into()))
}

/// Children laid out left to right.
#[must_use]
pub fn hbox(children: Vec<Element>) -> Element {
    Box::new(HBox::new(children))
}

/// Children laid out top to bottom.
#[must_use]
pub fn vbox(children: Vec<Element>) -> Element {
    Box::new(VBox::new(children))
}

/// Children stacked on top of each other, later ones painting over
/// earlier ones.
#[must_use]
pub fn dbox(children: Vec<Element>) -> Element {
    Box::new(DBox::new(children))
}

/// An invisible spacer that absorbs slack on both axes.
#[must_use]
pub fn filler() -> Element {
    Box::new(Filler)
}

/// A line separator oriented by its box shape.
#[must_use]
pub fn separator() -> Element {
    Box::new(Separator::new())
}

/// A light box-drawing frame around `child`.
#[must_use]
pub fn border(child: Element) -> Element {
    Box::new(border::Border::new(child))
}
