#![forbid(unsafe_code)]

//! A light box-drawing frame around a child.

use weft_core::Rect;
use weft_render::{Pixel, Screen};

use crate::node::{Element, Node, Requirement};

/// Frames its child with `┌─┐│└┘`, reserving one cell per side.
///
/// Abutting borders fuse into shared junctions during the glyph-joining
/// pass, so two bordered siblings read as one connected frame.
pub struct Border {
    child: Element,
    area: Rect,
}

impl Border {
    pub(crate) fn new(child: Element) -> Self {
        Self {
            child,
            area: Rect::default(),
        }
    }
}

impl Node for Border {
    fn compute_requirement(&mut self) -> Requirement {
        let inner = self.child.compute_requirement();
        Requirement {
            min_width: inner.min_width.saturating_add(2),
            min_height: inner.min_height.saturating_add(2),
            grow_x: inner.grow_x,
            grow_y: inner.grow_y,
        }
    }

    fn set_layout(&mut self, area: Rect) {
        self.area = area;
        self.child.set_layout(area.shrink(1));
    }

    fn render(&self, screen: &mut Screen) {
        let area = self.area;
        if area.is_empty() {
            return;
        }

        let right = area.right() - 1;
        let bottom = area.bottom() - 1;

        for x in area.x + 1..right {
            screen.set(x, area.y, Pixel::from_char('─'));
            screen.set(x, bottom, Pixel::from_char('─'));
        }
        for y in area.y + 1..bottom {
            screen.set(area.x, y, Pixel::from_char('│'));
            screen.set(right, y, Pixel::from_char('│'));
        }

        if area.width >= 2 && area.height >= 2 {
            screen.set(area.x, area.y, Pixel::from_char('┌'));
            screen.set(right, area.y, Pixel::from_char('┐'));
            screen.set(area.x, bottom, Pixel::from_char('└'));
            screen.set(right, bottom, Pixel::from_char('┘'));
        } else {
            // Degenerate: a single row or column, no room for corners.
            let glyph = if area.height == 1 { '─' } else { '│' };
            for y in area.y..area.bottom() {
                for x in area.x..area.right() {
                    screen.set(x, y, Pixel::from_char(glyph));
                }
            }
        }

        self.child.render(screen);
    }
}
