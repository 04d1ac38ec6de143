#![forbid(unsafe_code)]

//! Decorators: nodes that wrap a child and restyle or resize it.
//!
//! Decorators compose with `|`:
//!
//! ```ignore
//! use weft_dom::{text, bold, fg};
//! use weft_render::Rgba;
//!
//! let element = text("error") | bold() | fg(Rgba::RED);
//! ```

use weft_core::Rect;
use weft_render::{Rgba, Screen, StyleFlags};

use crate::node::{Element, Node, Requirement};

/// Anything that can wrap an element into a new element.
///
/// `element | decorator` is sugar for `decorator.decorate(element)`.
pub trait Decorate {
    /// Wrap `element`.
    fn decorate(self, element: Element) -> Element;
}

impl<D: Decorate> std::ops::BitOr<D> for Element {
    type Output = Element;

    fn bitor(self, decorator: D) -> Element {
        decorator.decorate(self)
    }
}

/// Applies style flags over every cell of the child's box.
pub struct StyleDecorator {
    flags: StyleFlags,
}

impl StyleDecorator {
    pub(crate) const fn new(flags: StyleFlags) -> Self {
        Self { flags }
    }
}

impl Decorate for StyleDecorator {
    fn decorate(self, element: Element) -> Element {
        Box::new(Styled {
            child: element,
            flags: self.flags,
            area: Rect::default(),
        })
    }
}

struct Styled {
    child: Element,
    flags: StyleFlags,
    area: Rect,
}

impl Node for Styled {
    fn compute_requirement(&mut self) -> Requirement {
        self.child.compute_requirement()
    }

    fn set_layout(&mut self, area: Rect) {
        self.area = area;
        self.child.set_layout(area);
    }

    fn render(&self, screen: &mut Screen) {
        self.child.render(screen);
        for y in self.area.y..self.area.bottom() {
            for x in self.area.x..self.area.right() {
                if let Some(pixel) = screen.get_mut(x, y) {
                    pixel.style |= self.flags;
                }
            }
        }
    }
}

/// Sets the foreground color over the child's box.
pub struct FgDecorator {
    color: Rgba,
}

/// Sets the background color over the child's box.
pub struct BgDecorator {
    color: Rgba,
}

impl Decorate for FgDecorator {
    fn decorate(self, element: Element) -> Element {
        Box::new(Colored {
            child: element,
            color: self.color,
            foreground: true,
            area: Rect::default(),
        })
    }
}

impl Decorate for BgDecorator {
    fn decorate(self, element: Element) -> Element {
        Box::new(Colored {
            child: element,
            color: self.color,
            foreground: false,
            area: Rect::default(),
        })
    }
}

struct Colored {
    child: Element,
    color: Rgba,
    foreground: bool,
    area: Rect,
}

impl Node for Colored {
    fn compute_requirement(&mut self) -> Requirement {
        self.child.compute_requirement()
    }

    fn set_layout(&mut self, area: Rect) {
        self.area = area;
        self.child.set_layout(area);
    }

    fn render(&self, screen: &mut Screen) {
        self.child.render(screen);
        for y in self.area.y..self.area.bottom() {
            for x in self.area.x..self.area.right() {
                if let Some(pixel) = screen.get_mut(x, y) {
                    if self.foreground {
                        pixel.fg = self.color;
                    } else {
                        pixel.bg = self.color;
                    }
                }
            }
        }
    }
}

/// Overrides the child's growth weights.
pub struct FlexDecorator {
    grow_x: u16,
    grow_y: u16,
}

impl FlexDecorator {
    pub(crate) const fn new(grow_x: u16, grow_y: u16) -> Self {
        Self { grow_x, grow_y }
    }
}

impl Decorate for FlexDecorator {
    fn decorate(self, element: Element) -> Element {
        Box::new(Flexed {
            child: element,
            grow_x: self.grow_x,
            grow_y: self.grow_y,
        })
    }
}

struct Flexed {
    child: Element,
    grow_x: u16,
    grow_y: u16,
}

impl Node for Flexed {
    fn compute_requirement(&mut self) -> Requirement {
        let mut requirement = self.child.compute_requirement();
        requirement.grow_x = self.grow_x;
        requirement.grow_y = self.grow_y;
        requirement
    }

    fn set_layout(&mut self, area: Rect) {
        self.child.set_layout(area);
    }

    fn render(&self, screen: &mut Screen) {
        self.child.render(screen);
    }
}

/// The bold decorator.
#[must_use]
pub fn bold() -> StyleDecorator {
    StyleDecorator::new(StyleFlags::BOLD)
}

/// The dim decorator.
#[must_use]
pub fn dim() -> StyleDecorator {
    StyleDecorator::new(StyleFlags::DIM)
}

/// The italic decorator.
#[must_use]
pub fn italic() -> StyleDecorator {
    StyleDecorator::new(StyleFlags::ITALIC)
}

/// The underline decorator.
#[must_use]
pub fn underlined() -> StyleDecorator {
    StyleDecorator::new(StyleFlags::UNDERLINED)
}

/// The blink decorator.
#[must_use]
pub fn blink() -> StyleDecorator {
    StyleDecorator::new(StyleFlags::BLINK)
}

/// The video-inversion decorator.
#[must_use]
pub fn inverted() -> StyleDecorator {
    StyleDecorator::new(StyleFlags::INVERTED)
}

/// The strikethrough decorator.
#[must_use]
pub fn strikethrough() -> StyleDecorator {
    StyleDecorator::new(StyleFlags::STRIKETHROUGH)
}

/// Foreground color decorator.
#[must_use]
pub fn fg(color: Rgba) -> FgDecorator {
    FgDecorator { color }
}

/// Background color decorator.
#[must_use]
pub fn bg(color: Rgba) -> BgDecorator {
    BgDecorator { color }
}

/// Unit growth on both axes.
#[must_use]
pub fn flex() -> FlexDecorator {
    FlexDecorator::new(1, 1)
}

/// Explicit growth weights.
#[must_use]
pub fn flex_grow(grow_x: u16, grow_y: u16) -> FlexDecorator {
    FlexDecorator::new(grow_x, grow_y)
}
