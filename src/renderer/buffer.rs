//! CellBuffer and drawing primitives.
//!
//! The CellBuffer is a 2D grid of [`Cell`]s representing the canvas. Two of
//! them exist per canvas: the back buffer collects the frame being drawn, the
//! front buffer remembers what the terminal currently shows.
//!
//! # Design Decisions
//!
//! - **Flat storage**: `Vec<Cell>` with row-major indexing.
//! - **Clipping**: writes outside the grid are silently dropped, never wrapped.
//! - **Wide characters**: a double-width glyph fills one cell and turns the
//!   next cell into an empty continuation carrying the same style.

use unicode_width::UnicodeWidthChar;

use crate::error::{Error, Result};
use crate::types::{Cell, GLYPH_CAPACITY, Style};

// =============================================================================
// CellBuffer
// =============================================================================

/// A 2D buffer of terminal cells.
///
/// Uses flat storage with row-major indexing: `index = y * width + x`
#[derive(Debug, Clone, PartialEq)]
pub struct CellBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl CellBuffer {
    /// Allocate a buffer of blank cells.
    ///
    /// The whole grid is reserved up front; if that fails nothing is kept and
    /// [`Error::Allocation`] is returned.
    pub fn allocate(width: u16, height: u16) -> Result<Self> {
        let size = width as usize * height as usize;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(size)
            .map_err(|e| Error::allocation("cell buffer", e))?;
        cells.resize(size, Cell::BLANK);
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Convert (x, y) to flat index.
    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    /// Get a cell reference (None if out of bounds).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Raw cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate over cells with their coordinates, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (u16, u16, &Cell)> {
        let width = self.width.max(1) as usize;
        self.cells.iter().enumerate().map(move |(i, cell)| {
            let x = (i % width) as u16;
            let y = (i / width) as u16;
            (x, y, cell)
        })
    }

    /// Reset every cell to a blank space with plain style.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    /// Mark every cell with [`Style::INVALID`].
    ///
    /// No drawable cell carries that style, so the next diff against this
    /// buffer reports every position as changed.
    pub fn invalidate(&mut self) {
        for cell in &mut self.cells {
            cell.style = Style::INVALID;
        }
    }

    /// Overwrite this buffer with the contents of another of the same size.
    pub(crate) fn copy_from(&mut self, other: &CellBuffer) {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        self.cells.copy_from_slice(&other.cells);
    }

    // =========================================================================
    // Drawing Primitives
    // =========================================================================

    /// Write one UTF-8 encoded glyph.
    ///
    /// Returns false, leaving the buffer untouched, when the position is off
    /// the grid, the bytes are not exactly one well-formed scalar, the scalar
    /// has no display width, or a wide scalar would hang off the right edge.
    pub fn write_glyph(&mut self, x: u16, y: u16, glyph: &[u8], style: Style) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        match decode_glyph(glyph) {
            Some(ch) => self.put(x, y, ch, style),
            None => false,
        }
    }

    /// Write a single char. Same clipping rules as [`write_glyph`](Self::write_glyph).
    pub fn write_char(&mut self, x: u16, y: u16, ch: char, style: Style) -> bool {
        self.put(x, y, ch, style)
    }

    /// Write text left to right starting at column `x`.
    ///
    /// Stops before the first scalar that would cross the right edge; text
    /// never wraps onto the next row. Zero-width and control scalars are
    /// skipped. Returns the number of columns written.
    pub fn write_string(&mut self, x: u16, y: u16, text: &str, style: Style) -> u16 {
        if y >= self.height {
            return 0;
        }
        let start = x as usize;
        let mut col = start;

        for ch in text.chars() {
            let w = char_width(ch);
            if w == 0 {
                continue;
            }
            if col + w > self.width as usize {
                break;
            }
            self.put(col as u16, y, ch, style);
            col += w;
        }

        col.saturating_sub(start) as u16
    }

    /// Store `ch` at (x, y), marking the continuation cell for wide glyphs.
    fn put(&mut self, x: u16, y: u16, ch: char, style: Style) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let w = char_width(ch);
        if w == 0 || (w == 2 && x + 1 >= self.width) {
            return false;
        }

        // Break up any wide glyph we are about to overwrite half of.
        self.detach_wide(x, y);
        if w == 2 {
            self.detach_wide(x + 1, y);
        }

        let idx = self.index(x, y);
        self.cells[idx] = Cell::new(ch, style);
        if w == 2 {
            self.cells[idx + 1] = Cell::continuation(style);
        }
        true
    }

    /// Blank the other half of a wide glyph touching (x, y).
    fn detach_wide(&mut self, x: u16, y: u16) {
        let idx = self.index(x, y);
        if self.cells[idx].is_continuation() {
            if x > 0 {
                let lead = &mut self.cells[idx - 1];
                *lead = Cell::new(' ', lead.style);
            }
        } else if x + 1 < self.width && self.cells[idx + 1].is_continuation() {
            let tail = &mut self.cells[idx + 1];
            *tail = Cell::new(' ', tail.style);
        }
    }
}

// =============================================================================
// Glyph Utilities
// =============================================================================

/// Display width of a character: 0 for control and combining characters,
/// 2 for wide (CJK, most emoji), 1 otherwise.
pub fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(0).min(2)
}

/// Expected UTF-8 sequence length from a leading byte.
fn utf8_len(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        b if b & 0xE0 == 0xC0 => Some(2),
        b if b & 0xF0 == 0xE0 => Some(3),
        b if b & 0xF8 == 0xF0 => Some(4),
        _ => None,
    }
}

/// Decode bytes that must hold exactly one UTF-8 scalar.
pub fn decode_glyph(bytes: &[u8]) -> Option<char> {
    let lead = *bytes.first()?;
    if bytes.len() > GLYPH_CAPACITY || utf8_len(lead)? != bytes.len() {
        return None;
    }
    let mut chars = std::str::from_utf8(bytes).ok()?.chars();
    let ch = chars.next()?;
    chars.next().is_none().then_some(ch)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buffer: &CellBuffer, y: u16) -> String {
        (0..buffer.width())
            .map(|x| buffer.get(x, y).unwrap().symbol())
            .collect()
    }

    #[test]
    fn test_allocate_blank() {
        let buffer = CellBuffer::allocate(8, 3).unwrap();
        assert_eq!(buffer.width(), 8);
        assert_eq!(buffer.height(), 3);
        assert_eq!(buffer.cells().len(), 24);
        assert!(buffer.cells().iter().all(|c| *c == Cell::BLANK));
    }

    #[test]
    fn test_write_glyph() {
        let mut buffer = CellBuffer::allocate(10, 2).unwrap();
        let style = Style::make(0xFF0000, 0, true, false, false);
        assert!(buffer.write_glyph(3, 1, b"X", style));

        let cell = buffer.get(3, 1).unwrap();
        assert_eq!(cell.symbol(), "X");
        assert_eq!(cell.style, style);
    }

    #[test]
    fn test_write_glyph_out_of_bounds_is_ignored() {
        let mut buffer = CellBuffer::allocate(4, 2).unwrap();
        let before = buffer.clone();
        assert!(!buffer.write_glyph(4, 0, b"X", Style::PLAIN));
        assert!(!buffer.write_glyph(0, 2, b"X", Style::PLAIN));
        assert_eq!(buffer, before);
    }

    #[test]
    fn test_write_glyph_rejects_malformed() {
        let mut buffer = CellBuffer::allocate(4, 1).unwrap();
        let before = buffer.clone();
        assert!(!buffer.write_glyph(0, 0, b"", Style::PLAIN));
        assert!(!buffer.write_glyph(0, 0, &[0x80], Style::PLAIN)); // stray continuation byte
        assert!(!buffer.write_glyph(0, 0, &[0xE4, 0xB8], Style::PLAIN)); // truncated
        assert!(!buffer.write_glyph(0, 0, &[0xC0, 0x80], Style::PLAIN)); // overlong
        assert!(!buffer.write_glyph(0, 0, b"ab", Style::PLAIN)); // two scalars
        assert!(!buffer.write_glyph(0, 0, &[0xF8, 0x80, 0x80, 0x80], Style::PLAIN));
        assert_eq!(buffer, before);
    }

    #[test]
    fn test_write_glyph_multibyte() {
        let mut buffer = CellBuffer::allocate(4, 1).unwrap();
        assert!(buffer.write_glyph(0, 0, "é".as_bytes(), Style::PLAIN));
        assert!(buffer.write_glyph(1, 0, "😀".as_bytes(), Style::PLAIN));
        assert_eq!(buffer.get(0, 0).unwrap().symbol(), "é");
        assert_eq!(buffer.get(1, 0).unwrap().symbol(), "😀");
        assert!(buffer.get(2, 0).unwrap().is_continuation());
    }

    #[test]
    fn test_write_string() {
        let mut buffer = CellBuffer::allocate(10, 2).unwrap();
        assert_eq!(buffer.write_string(2, 1, "Hello", Style::PLAIN), 5);
        assert_eq!(row(&buffer, 1), "  Hello   ");
        assert_eq!(row(&buffer, 0), "          ");
    }

    #[test]
    fn test_write_string_clips_at_edge() {
        let mut buffer = CellBuffer::allocate(5, 2).unwrap();
        assert_eq!(buffer.write_string(4, 0, "AB", Style::PLAIN), 1);
        assert_eq!(row(&buffer, 0), "    A");
        assert_eq!(row(&buffer, 1), "     ");
    }

    #[test]
    fn test_write_string_wide_chars() {
        let style = Style::make(0x00FF00, 0x000080, false, false, true);
        let mut buffer = CellBuffer::allocate(6, 1).unwrap();
        assert_eq!(buffer.write_string(0, 0, "中a文", style), 5);

        assert_eq!(buffer.get(0, 0).unwrap().symbol(), "中");
        let cont = buffer.get(1, 0).unwrap();
        assert!(cont.is_continuation());
        assert_eq!(cont.style, style);
        assert_eq!(buffer.get(2, 0).unwrap().symbol(), "a");
        assert_eq!(buffer.get(3, 0).unwrap().symbol(), "文");
        assert!(buffer.get(4, 0).unwrap().is_continuation());
    }

    #[test]
    fn test_wide_char_never_crosses_edge() {
        let mut buffer = CellBuffer::allocate(3, 1).unwrap();
        assert_eq!(buffer.write_string(1, 0, "a中", Style::PLAIN), 1);
        assert_eq!(row(&buffer, 0), " a ");
        assert!(!buffer.write_glyph(2, 0, "中".as_bytes(), Style::PLAIN));
    }

    #[test]
    fn test_zero_width_skipped() {
        let mut buffer = CellBuffer::allocate(4, 1).unwrap();
        assert_eq!(buffer.write_string(0, 0, "a\u{301}\tb", Style::PLAIN), 2);
        assert_eq!(row(&buffer, 0), "ab  ");
    }

    #[test]
    fn test_glyph_without_width_rejected() {
        let mut buffer = CellBuffer::allocate(4, 1).unwrap();
        buffer.write_char(0, 0, 'a', Style::PLAIN);
        assert!(!buffer.write_glyph(0, 0, "\u{301}".as_bytes(), Style::PLAIN));
        assert!(!buffer.write_glyph(0, 0, b"\t", Style::PLAIN));
        assert!(!buffer.write_glyph(1, 0, b"\x1b", Style::PLAIN));
        assert_eq!(row(&buffer, 0), "a   ");
    }

    #[test]
    fn test_overwrite_half_of_wide_glyph() {
        let mut buffer = CellBuffer::allocate(4, 1).unwrap();
        buffer.write_string(0, 0, "中", Style::PLAIN);
        // Overwrite the continuation: the lead loses its right half.
        buffer.write_char(1, 0, 'x', Style::PLAIN);
        assert_eq!(row(&buffer, 0), " x  ");

        buffer.write_string(1, 0, "文", Style::PLAIN);
        // Overwrite the lead: the orphaned continuation becomes a blank.
        buffer.write_char(1, 0, 'y', Style::PLAIN);
        assert_eq!(row(&buffer, 0), " y  ");
        assert!(buffer.cells().iter().all(|c| !c.is_continuation()));
    }

    #[test]
    fn test_clear_and_invalidate() {
        let mut buffer = CellBuffer::allocate(3, 1).unwrap();
        buffer.write_string(0, 0, "abc", Style::make(1, 2, true, true, true));
        buffer.clear();
        assert!(buffer.cells().iter().all(|c| *c == Cell::BLANK));

        buffer.invalidate();
        assert!(buffer.cells().iter().all(|c| c.style == Style::INVALID));
    }

    #[test]
    fn test_iter_row_major() {
        let buffer = CellBuffer::allocate(2, 2).unwrap();
        let coords: Vec<_> = buffer.iter().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn test_decode_glyph() {
        assert_eq!(decode_glyph(b"a"), Some('a'));
        assert_eq!(decode_glyph("┌".as_bytes()), Some('┌'));
        assert_eq!(decode_glyph(&[0xFF]), None);
    }

    #[test]
    fn test_char_width() {
        assert_eq!(char_width('a'), 1);
        assert_eq!(char_width(' '), 1);
        assert_eq!(char_width('\n'), 0);
        assert_eq!(char_width('中'), 2);
    }
}
