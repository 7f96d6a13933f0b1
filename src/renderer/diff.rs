//! Differential output.
//!
//! The back buffer is compared to the front buffer cell by cell and only
//! cells that differ are written to the terminal.
//!
//! # Algorithm
//!
//! 1. Walk both buffers row-major, collecting a [`CellChange`] per mismatch
//! 2. Copy the back buffer into the front buffer (it is now on screen)
//! 3. For each change: cursor move, full SGR, glyph bytes
//! 4. One trailing reset so style never leaks into later terminal output

use std::io::{self, Write};

use super::ansi;
use super::buffer::CellBuffer;
use crate::types::Cell;

/// A cell that differs between the front and back buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellChange {
    pub x: u16,
    pub y: u16,
    pub cell: Cell,
}

/// Compare `back` against `front`, then make `front` hold `back`'s content.
///
/// Returns changes in row-major order. Both buffers must have the same size.
pub fn diff_and_swap(front: &mut CellBuffer, back: &CellBuffer) -> Vec<CellChange> {
    debug_assert_eq!(
        (front.width(), front.height()),
        (back.width(), back.height()),
        "front and back buffers must match"
    );

    let changes: Vec<CellChange> = back
        .iter()
        .zip(front.cells())
        .filter(|((_, _, new), old)| new != old)
        .map(|((x, y, new), _)| CellChange { x, y, cell: *new })
        .collect();

    front.copy_from(back);
    changes
}

/// Emit escape sequences for a list of changes.
///
/// `origin` is the terminal position (0-indexed) of canvas cell (0, 0).
/// Continuation cells get their cursor move and style but no glyph, so a
/// colored wide glyph does not leave a default-styled gap.
pub fn write_changes<W: Write + ?Sized>(
    w: &mut W,
    changes: &[CellChange],
    origin: (u16, u16),
) -> io::Result<()> {
    for change in changes {
        ansi::cursor_to(
            w,
            origin.0.saturating_add(change.x),
            origin.1.saturating_add(change.y),
        )?;
        ansi::sgr(w, change.cell.style)?;
        w.write_all(change.cell.glyph())?;
    }
    ansi::reset(w)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Style;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_identical_buffers_no_changes() {
        let mut front = CellBuffer::allocate(6, 3).unwrap();
        let mut back = CellBuffer::allocate(6, 3).unwrap();
        front.write_string(0, 1, "same", Style::PLAIN);
        back.write_string(0, 1, "same", Style::PLAIN);

        assert!(diff_and_swap(&mut front, &back).is_empty());
    }

    #[test]
    fn test_single_modified_cell() {
        let mut front = CellBuffer::allocate(6, 3).unwrap();
        let mut back = front.clone();
        back.write_glyph(4, 2, b"Z", Style::PLAIN);

        let changes = diff_and_swap(&mut front, &back);
        assert_eq!(changes.len(), 1);
        assert_eq!((changes[0].x, changes[0].y), (4, 2));
        assert_eq!(changes[0].cell.symbol(), "Z");

        // Front now mirrors back; a second diff is empty.
        assert_eq!(front, back);
        assert!(diff_and_swap(&mut front, &back).is_empty());
    }

    #[test]
    fn test_style_only_change_detected() {
        let mut front = CellBuffer::allocate(2, 1).unwrap();
        let mut back = front.clone();
        back.write_glyph(0, 0, b" ", Style::make(0, 0x202020, false, false, false));
        assert_eq!(diff_and_swap(&mut front, &back).len(), 1);
    }

    #[test]
    fn test_changes_are_row_major() {
        let mut front = CellBuffer::allocate(3, 2).unwrap();
        let mut back = front.clone();
        back.write_glyph(2, 1, b"c", Style::PLAIN);
        back.write_glyph(0, 1, b"b", Style::PLAIN);
        back.write_glyph(1, 0, b"a", Style::PLAIN);

        let coords: Vec<_> = diff_and_swap(&mut front, &back)
            .iter()
            .map(|c| (c.x, c.y))
            .collect();
        assert_eq!(coords, vec![(1, 0), (0, 1), (2, 1)]);
    }

    #[test]
    fn test_invalidated_front_reports_everything() {
        let mut front = CellBuffer::allocate(4, 2).unwrap();
        let back = front.clone();
        front.invalidate();
        assert_eq!(diff_and_swap(&mut front, &back).len(), 8);
    }

    #[test]
    fn test_write_changes() {
        let style = Style::make(0xFF0000, 0, true, false, false);
        let changes = [
            CellChange { x: 0, y: 0, cell: Cell::new('中', style) },
            CellChange { x: 1, y: 0, cell: Cell::continuation(style) },
        ];
        let mut out = Vec::new();
        write_changes(&mut out, &changes, (2, 1)).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\x1b[2;3H\x1b[0;1;38;2;255;0;0m中\x1b[2;4H\x1b[0;1;38;2;255;0;0m\x1b[0m"
        );
    }

    #[test]
    fn test_write_no_changes_still_resets() {
        let mut out = Vec::new();
        write_changes(&mut out, &[], (0, 0)).unwrap();
        assert_eq!(out, b"\x1b[0m");
    }
}
