#![forbid(unsafe_code)]

//! Frame diffing.
//!
//! Row-major scan of the screen's current grid against its previous grid,
//! with changed cells coalesced into per-row [`ChangeRun`]s. Row-major
//! order keeps memory access sequential (cells are stored row by row, four
//! per cache line).
//!
//! # Wide pairs
//!
//! A run never starts on a CONTINUATION cell of the current frame: such a
//! run is extended left to include the head, so the presenter always
//! rewrites a wide glyph as a unit.

use smallvec::SmallVec;

use crate::screen::Screen;

/// A contiguous run of changed cells on a single row.
///
/// The presenter positions the cursor once per run and emits the run's
/// cells in sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeRun {
    /// Row index.
    pub y: u16,
    /// Start column (inclusive).
    pub x0: u16,
    /// End column (inclusive).
    pub x1: u16,
}

impl ChangeRun {
    /// Create a new change run.
    #[inline]
    #[must_use]
    pub const fn new(y: u16, x0: u16, x1: u16) -> Self {
        debug_assert!(x0 <= x1);
        Self { y, x0, x1 }
    }

    /// Number of cells in this run.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> u16 {
        self.x1 - self.x0 + 1
    }

    /// Check if this run is degenerate.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.x1 < self.x0
    }
}

/// The difference between a screen's current and previous frames.
#[derive(Debug, Clone, Default)]
pub struct ScreenDiff {
    changes: Vec<(u16, u16)>,
}

impl ScreenDiff {
    /// Compute the changed cells of `screen`.
    ///
    /// When the screen demands a full repaint (first frame, after a
    /// resize) every cell is treated as changed.
    #[must_use]
    pub fn compute(screen: &Screen) -> Self {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "diff_compute",
            width = screen.width(),
            height = screen.height()
        )
        .entered();

        let width = screen.width();
        let height = screen.height();

        if screen.needs_repaint() {
            let mut changes = Vec::with_capacity(width as usize * height as usize);
            for y in 0..height {
                for x in 0..width {
                    changes.push((x, y));
                }
            }
            return Self { changes };
        }

        // Assume ~5% of cells change on a typical frame.
        let estimate = (width as usize * height as usize) / 20;
        let mut changes: Vec<(u16, u16)> = Vec::with_capacity(estimate);

        for y in 0..height {
            for x in 0..width {
                let cur = screen.get(x, y).copied().unwrap_or_default();
                let prev = screen.get_previous(x, y).copied().unwrap_or_default();
                if !cur.bits_eq(&prev) {
                    // Wide pairs are rewritten from the head.
                    if cur.is_continuation()
                        && x > 0
                        && changes.last() != Some(&(x - 1, y))
                    {
                        changes.push((x - 1, y));
                    }
                    changes.push((x, y));
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(changes = changes.len(), "diff computed");

        Self { changes }
    }

    /// Number of changed cells.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Check if no cells changed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// The changed positions in row-major order.
    #[inline]
    #[must_use]
    pub fn changes(&self) -> &[(u16, u16)] {
        &self.changes
    }

    /// Coalesce point changes into contiguous per-row runs.
    ///
    /// Positions are already sorted by (y, x) from the row-major scan.
    #[must_use]
    pub fn runs(&self) -> SmallVec<[ChangeRun; 32]> {
        let mut runs = SmallVec::new();
        let mut i = 0;

        while i < self.changes.len() {
            let (x0, y) = self.changes[i];
            let mut x1 = x0;
            i += 1;

            while i < self.changes.len() {
                let (x, yy) = self.changes[i];
                if yy != y || x != x1 + 1 {
                    break;
                }
                x1 = x;
                i += 1;
            }

            runs.push(ChangeRun::new(y, x0, x1));
        }

        runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{Pixel, Rgba};

    fn settled(width: u16, height: u16) -> Screen {
        let mut screen = Screen::new(width, height);
        screen.flip();
        screen
    }

    #[test]
    fn no_change_is_empty_diff() {
        let screen = settled(10, 4);
        let diff = ScreenDiff::compute(&screen);
        assert!(diff.is_empty());
        assert!(diff.runs().is_empty());
    }

    #[test]
    fn single_cell_change() {
        let mut screen = settled(10, 4);
        screen.set(5, 2, Pixel::from_char('X'));
        let diff = ScreenDiff::compute(&screen);
        assert_eq!(diff.changes(), &[(5, 2)]);

        let runs = diff.runs();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0], ChangeRun::new(2, 5, 5));
    }

    #[test]
    fn adjacent_changes_coalesce() {
        let mut screen = settled(10, 2);
        screen.set(3, 1, Pixel::from_char('a'));
        screen.set(4, 1, Pixel::from_char('b'));
        screen.set(5, 1, Pixel::from_char('c'));
        let runs = ScreenDiff::compute(&screen).runs();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0], ChangeRun::new(1, 3, 5));
        assert_eq!(runs[0].len(), 3);
    }

    #[test]
    fn gaps_split_runs() {
        let mut screen = settled(10, 1);
        screen.set(0, 0, Pixel::from_char('a'));
        screen.set(1, 0, Pixel::from_char('b'));
        screen.set(3, 0, Pixel::from_char('c'));
        let runs = ScreenDiff::compute(&screen).runs();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], ChangeRun::new(0, 0, 1));
        assert_eq!(runs[1], ChangeRun::new(0, 3, 3));
    }

    #[test]
    fn rows_never_merge() {
        let mut screen = settled(2, 2);
        screen.set(1, 0, Pixel::from_char('a'));
        screen.set(0, 1, Pixel::from_char('b'));
        let runs = ScreenDiff::compute(&screen).runs();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].y, 0);
        assert_eq!(runs[1].y, 1);
    }

    #[test]
    fn color_only_change_detected() {
        let mut screen = settled(4, 1);
        screen.set(2, 0, Pixel::default().with_fg(Rgba::RED));
        let diff = ScreenDiff::compute(&screen);
        assert_eq!(diff.len(), 1);
    }

    #[test]
    fn wide_pair_diffed_as_unit() {
        let mut screen = settled(10, 1);
        screen.set(4, 0, Pixel::from_char('日'));
        screen.flip();

        // Same head but the continuation changed (restyled tail).
        let tail = screen
            .get(5, 0)
            .copied()
            .expect("in bounds")
            .with_fg(Rgba::RED);
        if let Some(p) = screen.get_mut(5, 0) {
            *p = tail;
        }

        let diff = ScreenDiff::compute(&screen);
        assert_eq!(diff.changes(), &[(4, 0), (5, 0)]);
        let runs = diff.runs();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0], ChangeRun::new(0, 4, 5));
    }

    #[test]
    fn full_repaint_covers_every_cell() {
        let mut screen = Screen::new(3, 2);
        screen.flip();
        screen.force_repaint();
        let diff = ScreenDiff::compute(&screen);
        assert_eq!(diff.len(), 6);
        let runs = diff.runs();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], ChangeRun::new(0, 0, 2));
        assert_eq!(runs[1], ChangeRun::new(1, 0, 2));
    }

    #[test]
    fn first_frame_is_full_repaint() {
        let screen = Screen::new(2, 2);
        assert!(screen.needs_repaint());
        assert_eq!(ScreenDiff::compute(&screen).len(), 4);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn runs_cover_the_changes_exactly(
                writes in proptest::collection::vec(
                    (0u16..16, 0u16..8, proptest::char::range(' ', '~')),
                    0..40,
                ),
            ) {
                let mut screen = settled(16, 8);
                for (x, y, c) in writes {
                    screen.set(x, y, Pixel::from_char(c));
                }

                let diff = ScreenDiff::compute(&screen);
                let runs = diff.runs();

                // Run cells and change positions are the same set.
                let total: usize = runs.iter().map(|r| usize::from(r.len())).sum();
                prop_assert_eq!(total, diff.len());
                for &(x, y) in diff.changes() {
                    prop_assert!(
                        runs.iter().any(|r| r.y == y && r.x0 <= x && x <= r.x1)
                    );
                }
            }
        }
    }
}
