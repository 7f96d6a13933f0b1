//! Core types for tui-canvas.
//!
//! These are the values the renderer understands: a packed style word and
//! the cell that carries one glyph plus its style. Everything upstream (the
//! component tree, layout) exists to fill a grid of these.

use std::fmt;

// =============================================================================
// Style Flags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes stored in the low bits of a [`Style`].
    ///
    /// Combine with bitwise OR: `StyleFlags::BOLD | StyleFlags::ITALIC`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u8 {
        const BOLD = 1 << 0;
        const ITALIC = 1 << 1;
        const UNDERLINE = 1 << 2;
    }
}

// =============================================================================
// Style - packed 64-bit style word
// =============================================================================

const FG_SHIFT: u32 = 40;
const BG_SHIFT: u32 = 16;
const RGB_MASK: u64 = 0x00FF_FFFF;
const FLAG_MASK: u64 = 0b111;
const DEFINED_BITS: u64 = (RGB_MASK << FG_SHIFT) | (RGB_MASK << BG_SHIFT) | FLAG_MASK;

/// A packed style word.
///
/// Layout:
///
/// ```text
/// 63            40 39            16 15        3 2 1 0
/// +---------------+----------------+-----------+-+-+-+
/// |  fg 0xRRGGBB  |  bg 0xRRGGBB   |  unused   |U|I|B|
/// +---------------+----------------+-----------+-+-+-+
/// ```
///
/// A color channel of exactly `0` means "emit no color escape for this
/// channel", so pure black (`0x000000`) cannot be requested explicitly and
/// renders in the terminal's default color. Use `0x010101` for a near-black.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style(u64);

impl Style {
    /// No colors, no attributes. Renders as a bare `ESC[0m`.
    pub const PLAIN: Self = Self(0);

    /// Sentinel no constructor can produce (bits 3..15 are never set). Used to force every front-buffer cell to compare unequal.
    pub const INVALID: Self = Self(u64::MAX);

    /// Pack a style from `0xRRGGBB` colors and attribute flags.
    ///
    /// Bits above the low 24 of each color are ignored.
    #[inline]
    pub const fn new(fg: u32, bg: u32, flags: StyleFlags) -> Self {
        Self(
            ((fg as u64 & RGB_MASK) << FG_SHIFT)
                | ((bg as u64 & RGB_MASK) << BG_SHIFT)
                | (flags.bits() as u64 & FLAG_MASK),
        )
    }

    /// Pack a style from individual attribute booleans.
    pub const fn make(fg: u32, bg: u32, bold: bool, italic: bool, underline: bool) -> Self {
        let mut flags = StyleFlags::empty();
        if bold {
            flags = flags.union(StyleFlags::BOLD);
        }
        if italic {
            flags = flags.union(StyleFlags::ITALIC);
        }
        if underline {
            flags = flags.union(StyleFlags::UNDERLINE);
        }
        Self::new(fg, bg, flags)
    }

    /// Rebuild a style from its raw bits. Bits 3..15 are dropped, so the
    /// result is never [`Style::INVALID`].
    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits & DEFINED_BITS)
    }

    /// Raw 64-bit word.
    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Foreground as `0xRRGGBB` (0 = unset).
    #[inline]
    pub const fn fg(self) -> u32 {
        ((self.0 >> FG_SHIFT) & RGB_MASK) as u32
    }

    /// Background as `0xRRGGBB` (0 = unset).
    #[inline]
    pub const fn bg(self) -> u32 {
        ((self.0 >> BG_SHIFT) & RGB_MASK) as u32
    }

    #[inline]
    pub const fn flags(self) -> StyleFlags {
        StyleFlags::from_bits_truncate((self.0 & FLAG_MASK) as u8)
    }

    /// Same style with a different foreground.
    pub const fn with_fg(self, fg: u32) -> Self {
        Self::new(fg, self.bg(), self.flags())
    }

    /// Same style with a different background.
    pub const fn with_bg(self, bg: u32) -> Self {
        Self::new(self.fg(), bg, self.flags())
    }

    #[inline]
    pub const fn is_plain(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            return f.write_str("Style(INVALID)");
        }
        f.debug_struct("Style")
            .field("fg", &format_args!("{:#08x}", self.fg()))
            .field("bg", &format_args!("{:#08x}", self.bg()))
            .field("flags", &self.flags())
            .finish()
    }
}

/// Split a `0xRRGGBB` value into channels.
#[inline]
pub const fn rgb_channels(rgb: u32) -> (u8, u8, u8) {
    ((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

// =============================================================================
// Cell - The atomic unit of terminal rendering
// =============================================================================

/// Maximum UTF-8 length of a single scalar value.
pub const GLYPH_CAPACITY: usize = 4;

/// A single terminal cell.
///
/// The glyph is stored inline as UTF-8 bytes. A length of 0 marks a
/// continuation cell: the right half of a double-width glyph that lives in
/// the cell to its left. Continuation cells keep the lead glyph's style so
/// colored wide glyphs don't leave a default-styled gap.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    glyph: [u8; GLYPH_CAPACITY],
    len: u8,
    /// Packed style word.
    pub style: Style,
}

impl Cell {
    /// A blank cell: one space, plain style.
    pub const BLANK: Self = Self {
        glyph: [b' ', 0, 0, 0],
        len: 1,
        style: Style::PLAIN,
    };

    /// Build a cell from a char.
    pub fn new(ch: char, style: Style) -> Self {
        let mut glyph = [0u8; GLYPH_CAPACITY];
        let len = ch.encode_utf8(&mut glyph).len() as u8;
        Self { glyph, len, style }
    }

    /// The empty right half of a wide glyph.
    pub const fn continuation(style: Style) -> Self {
        Self {
            glyph: [0; GLYPH_CAPACITY],
            len: 0,
            style,
        }
    }

    /// UTF-8 bytes of the glyph (empty for continuation cells).
    #[inline]
    pub fn glyph(&self) -> &[u8] {
        &self.glyph[..self.len as usize]
    }

    /// The glyph as a str. Continuation cells yield `""`.
    #[inline]
    pub fn symbol(&self) -> &str {
        // Only ever filled from a char or validated bytes.
        std::str::from_utf8(self.glyph()).unwrap_or("")
    }

    #[inline]
    pub fn is_continuation(&self) -> bool {
        self.len == 0
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_continuation() {
            write!(f, "Cell(<cont> {:?})", self.style)
        } else {
            write!(f, "Cell({:?} {:?})", self.symbol(), self.style)
        }
    }
}

// =============================================================================
// Component Kinds
// =============================================================================

/// The kind of a component node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ComponentKind {
    #[default]
    Root = 0,
    Container = 1,
    Text = 2,
    Box = 3,
}

// =============================================================================
// Tests
// =============================================================================
