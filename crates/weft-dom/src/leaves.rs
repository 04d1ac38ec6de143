#![forbid(unsafe_code)]

//! Leaf nodes: text, fillers, and separators.

use weft_core::Rect;
use weft_render::{Pixel, Screen, char_width, str_width};

use crate::node::{Node, Requirement};

/// A single line of text.
///
/// Width is priced in terminal columns, so CJK and other wide glyphs
/// count two. Rendering clips at the assigned box; a wide glyph that
/// only half fits is dropped entirely.
pub struct Text {
    content: String,
    area: Rect,
}

impl Text {
    pub(crate) fn new(content: String) -> Self {
        Self {
            content,
            area: Rect::default(),
        }
    }
}

impl Node for Text {
    fn compute_requirement(&mut self) -> Requirement {
        let width = u16::try_from(str_width(&self.content)).unwrap_or(u16::MAX);
        Requirement::fixed(width, 1)
    }

    fn set_layout(&mut self, area: Rect) {
        self.area = area;
    }

    fn render(&self, screen: &mut Screen) {
        if self.area.is_empty() {
            return;
        }

        use unicode_segmentation::UnicodeSegmentation;
        let mut x = self.area.x;
        let y = self.area.y;
        for grapheme in self.content.graphemes(true) {
            // A cluster occupies its base character's columns; trailing
            // combining marks cannot be stored in a one-scalar cell and
            // are dropped.
            let Some(base) = grapheme.chars().next() else {
                continue;
            };
            let width = char_width(base) as u16;
            if width == 0 {
                continue;
            }
            if x.saturating_add(width) > self.area.right() {
                break;
            }
            screen.set(x, y, Pixel::from_char(base));
            x += width;
        }
    }
}

/// An invisible, maximally flexible spacer.
pub struct Filler;

impl Node for Filler {
    fn compute_requirement(&mut self) -> Requirement {
        Requirement::flexible()
    }

    fn set_layout(&mut self, _area: Rect) {}

    fn render(&self, _screen: &mut Screen) {}
}

/// A line separator that fills its box, horizontal when the box is at
/// least as wide as it is tall, vertical otherwise.
pub struct Separator {
    area: Rect,
}

impl Separator {
    pub(crate) fn new() -> Self {
        Self {
            area: Rect::default(),
        }
    }
}

impl Node for Separator {
    fn compute_requirement(&mut self) -> Requirement {
        Requirement::fixed(1, 1)
    }

    fn set_layout(&mut self, area: Rect) {
        self.area = area;
    }

    fn render(&self, screen: &mut Screen) {
        if self.area.is_empty() {
            return;
        }
        let glyph = if self.area.width >= self.area.height {
            '─'
        } else {
            '│'
        };
        for y in self.area.y..self.area.bottom() {
            for x in self.area.x..self.area.right() {
                screen.set(x, y, Pixel::from_char(glyph));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::render_at;
    use crate::{hbox, separator, text, vbox};

    fn row(screen: &Screen, y: u16) -> String {
        (0..screen.width())
            .map(|x| {
                screen
                    .get(x, y)
                    .and_then(|p| p.glyph.as_char())
                    .unwrap_or(' ')
            })
            .collect()
    }

    #[test]
    fn text_requirement_prices_wide_glyphs() {
        let mut node = Text::new("a日b".to_owned());
        let r = node.compute_requirement();
        assert_eq!(r.min_width, 4);
        assert_eq!(r.min_height, 1);
        assert_eq!(r.grow_x, 0);
    }

    #[test]
    fn text_clips_wide_glyph_that_half_fits() {
        let mut screen = Screen::new(4, 1);
        let mut element = text("ab日");
        render_at(&mut screen, Rect::new(0, 0, 3, 1), &mut element);
        assert_eq!(row(&screen, 0), "ab  ");
    }

    #[test]
    fn text_renders_wide_glyph_when_it_fits() {
        let mut screen = Screen::new(4, 1);
        let mut element = text("日x");
        render_at(&mut screen, Rect::from_size(4, 1), &mut element);
        assert_eq!(screen.get(0, 0).and_then(|p| p.glyph.as_char()), Some('日'));
        assert!(screen.get(1, 0).is_some_and(|p| p.is_continuation()));
        assert_eq!(screen.get(2, 0).and_then(|p| p.glyph.as_char()), Some('x'));
    }

    #[test]
    fn separator_in_vbox_is_horizontal() {
        let mut screen = Screen::new(3, 3);
        let mut element = vbox(vec![text("a"), separator(), text("b")]);
        render_at(&mut screen, Rect::from_size(3, 3), &mut element);
        assert_eq!(row(&screen, 1), "───");
    }

    #[test]
    fn separator_in_hbox_is_vertical() {
        let mut screen = Screen::new(3, 2);
        let mut element = hbox(vec![text("a"), separator(), text("b")]);
        render_at(&mut screen, Rect::from_size(3, 2), &mut element);
        assert_eq!(row(&screen, 0), "a│b");
        assert_eq!(row(&screen, 1), " │ ");
    }

    #[test]
    fn empty_text_renders_nothing() {
        let mut screen = Screen::new(3, 1);
        let mut element = text("");
        render_at(&mut screen, Rect::from_size(3, 1), &mut element);
        assert_eq!(row(&screen, 0), "   ");
    }
}
