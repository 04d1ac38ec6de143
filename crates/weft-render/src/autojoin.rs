#![forbid(unsafe_code)]

//! Box-drawing glyph fusion.
//!
//! Separately drawn borders that abut on screen should read as one
//! connected frame: two boxes sharing an edge get `├` / `┤` / `┬` / `┴`
//! junctions instead of overlapping `│` and `─` strokes.
//!
//! Every light and heavy box-drawing character is a set of arms reaching
//! up, right, down, left from the cell center. The pass inspects each
//! horizontally or vertically adjacent pair: when one cell has an arm
//! pointing at its neighbor and the neighbor is joinable but lacks the
//! facing arm, the facing arm is added. Added arms take the receiving
//! cell's own weight, so a light grid crossing a heavy rule stays pure
//! per cell. Double-line characters are left untouched.

use crate::cell::Glyph;
use crate::screen::Screen;

const UP: u8 = 0b0001;
const RIGHT: u8 = 0b0010;
const DOWN: u8 = 0b0100;
const LEFT: u8 = 0b1000;

/// Light characters indexed by arm mask. Index 0 (no arms) is unused.
const LIGHT: [char; 16] = [
    ' ', '╵', '╶', '└', '╷', '│', '┌', '├', '╴', '┘', '─', '┴', '┐', '┤',
    '┬', '┼',
];

/// Heavy characters indexed by arm mask. Index 0 (no arms) is unused.
const HEAVY: [char; 16] = [
    ' ', '╹', '╺', '┗', '╻', '┃', '┏', '┣', '╸', '┛', '━', '┻', '┓', '┫',
    '┳', '╋',
];

/// Decompose a joinable character into (arm mask, is-heavy).
fn arms(c: char) -> Option<(u8, bool)> {
    for (mask, &light) in LIGHT.iter().enumerate().skip(1) {
        if c == light {
            return Some((mask as u8, false));
        }
    }
    for (mask, &heavy) in HEAVY.iter().enumerate().skip(1) {
        if c == heavy {
            return Some((mask as u8, true));
        }
    }
    None
}

/// Recompose a character from its arm mask and weight.
fn compose(mask: u8, heavy: bool) -> char {
    let table = if heavy { &HEAVY } else { &LIGHT };
    table[mask as usize & 0x0F]
}

/// Fuse abutting box-drawing glyphs across the whole screen.
///
/// Runs after all elements have drawn and before diffing. Cells that are
/// not light or heavy box-drawing characters are never modified.
pub fn join_glyphs(screen: &mut Screen) {
    let width = screen.width();
    let height = screen.height();
    if width == 0 || height == 0 {
        return;
    }

    // Snapshot the arm masks first so resolution order can't cascade.
    let len = width as usize * height as usize;
    let mut masks: Vec<Option<(u8, bool)>> = vec![None; len];
    for y in 0..height {
        for x in 0..width {
            if let Some(pixel) = screen.get(x, y)
                && let Some(c) = pixel.glyph.as_char()
            {
                masks[y as usize * width as usize + x as usize] = arms(c);
            }
        }
    }

    let at = |x: u16, y: u16| masks[y as usize * width as usize + x as usize];

    for y in 0..height {
        for x in 0..width {
            let Some((mask, heavy)) = at(x, y) else {
                continue;
            };
            let mut joined = mask;

            // A neighbor's arm pointing at us grows our facing arm.
            if x > 0 && at(x - 1, y).is_some_and(|(m, _)| m & RIGHT != 0) {
                joined |= LEFT;
            }
            if x + 1 < width && at(x + 1, y).is_some_and(|(m, _)| m & LEFT != 0) {
                joined |= RIGHT;
            }
            if y > 0 && at(x, y - 1).is_some_and(|(m, _)| m & DOWN != 0) {
                joined |= UP;
            }
            if y + 1 < height && at(x, y + 1).is_some_and(|(m, _)| m & UP != 0) {
                joined |= DOWN;
            }

            if joined != mask
                && let Some(pixel) = screen.get_mut(x, y)
            {
                pixel.glyph = Glyph::from_char(compose(joined, heavy));
            }
        }
    }
}
