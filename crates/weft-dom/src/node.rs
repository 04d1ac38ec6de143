#![forbid(unsafe_code)]

//! The node contract and layout driver.
//!
//! Rendering is two passes over the element tree:
//!
//! 1. [`Node::compute_requirement`] walks bottom-up, each node reporting
//!    the smallest box it can use and how eagerly it grows beyond it.
//!    Composites store their children's requirements so the second pass
//!    never recomputes them.
//! 2. [`Node::set_layout`] walks top-down, assigning each node a
//!    rectangle carved out of its parent's.
//!
//! After both passes, [`Node::render`] draws into the screen using the
//! assigned rectangles.

use weft_core::Rect;
use weft_render::Screen;

/// What a node needs from layout: a minimum box and growth weights.
///
/// A growth weight of zero means the node never takes slack on that
/// axis; among siblings, slack is split proportionally to the weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Requirement {
    /// Minimum width in columns.
    pub min_width: u16,
    /// Minimum height in rows.
    pub min_height: u16,
    /// Horizontal growth weight.
    pub grow_x: u16,
    /// Vertical growth weight.
    pub grow_y: u16,
}

impl Requirement {
    /// A rigid requirement: exact minimum, no growth.
    #[inline]
    #[must_use]
    pub const fn fixed(min_width: u16, min_height: u16) -> Self {
        Self {
            min_width,
            min_height,
            grow_x: 0,
            grow_y: 0,
        }
    }

    /// A fully flexible requirement: no minimum, unit growth both ways.
    #[inline]
    #[must_use]
    pub const fn flexible() -> Self {
        Self {
            min_width: 0,
            min_height: 0,
            grow_x: 1,
            grow_y: 1,
        }
    }
}

/// A renderable node in the element tree.
pub trait Node {
    /// First pass: report the node's minimum size and growth weights.
    ///
    /// Called exactly once per frame, parent before using the value.
    fn compute_requirement(&mut self) -> Requirement;

    /// Second pass: accept the assigned rectangle and lay out children.
    fn set_layout(&mut self, area: Rect);

    /// Draw into the screen inside the assigned rectangle.
    fn render(&self, screen: &mut Screen);
}

/// An owned node in the tree.
pub type Element = Box<dyn Node>;

/// Drive both layout passes over `element` and draw it into `screen`.
pub fn render_at(screen: &mut Screen, area: Rect, element: &mut Element) {
    #[cfg(feature = "tracing")]
    let _span = tracing::trace_span!(
        "render_at",
        width = area.width,
        height = area.height
    )
    .entered();

    element.compute_requirement();
    element.set_layout(area);
    element.render(screen);
}

/// The size a document wants, capped to `(max_width, max_height)`.
///
/// Size a screen with this to fit the document instead of the terminal.
#[must_use]
pub fn fit_size(element: &mut Element, max_width: u16, max_height: u16) -> (u16, u16) {
    let requirement = element.compute_requirement();
    (
        requirement.min_width.min(max_width),
        requirement.min_height.min(max_height),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text;

    #[test]
    fn requirement_constructors() {
        let fixed = Requirement::fixed(3, 2);
        assert_eq!(fixed.min_width, 3);
        assert_eq!(fixed.grow_x, 0);

        let flexible = Requirement::flexible();
        assert_eq!(flexible.min_width, 0);
        assert_eq!(flexible.grow_y, 1);
    }

    #[test]
    fn fit_size_caps_to_max() {
        let mut element = text("hello world");
        assert_eq!(fit_size(&mut element, 80, 25), (11, 1));
        assert_eq!(fit_size(&mut element, 5, 25), (5, 1));
        assert_eq!(fit_size(&mut element, 80, 0), (11, 0));
    }

    #[test]
    fn render_at_draws() {
        let mut screen = Screen::new(10, 1);
        let mut element = text("hi");
        render_at(&mut screen, Rect::from_size(10, 1), &mut element);
        assert_eq!(screen.get(0, 0).and_then(|p| p.glyph.as_char()), Some('h'));
        assert_eq!(screen.get(1, 0).and_then(|p| p.glyph.as_char()), Some('i'));
    }
}
