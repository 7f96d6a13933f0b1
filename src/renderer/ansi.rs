//! ANSI escape sequences for terminal control.
//!
//! Only the sequences the canvas emits live here:
//! - Cursor positioning and visibility
//! - Screen clearing
//! - SGR style sequences built from a packed [`Style`]
//! - Box-drawing glyphs for the canvas border

use std::io::Write;

use crate::types::{Style, StyleFlags, rgb_channels};

// =============================================================================
// Constants
// =============================================================================

/// `ESC[0m`, the bare reset.
pub const RESET: &str = "\x1b[0m";

// Border glyphs.
pub const TOP_LEFT: &str = "┌";
pub const TOP_RIGHT: &str = "┐";
pub const BOTTOM_LEFT: &str = "└";
pub const BOTTOM_RIGHT: &str = "┘";
pub const HORIZONTAL: &str = "─";
pub const VERTICAL: &str = "│";

// =============================================================================
// Cursor
// =============================================================================

/// Move cursor to a 0-indexed position. Emitted 1-indexed.
#[inline]
pub fn cursor_to<W: Write + ?Sized>(w: &mut W, x: u16, y: u16) -> std::io::Result<()> {
    write!(w, "\x1b[{};{}H", y as u32 + 1, x as u32 + 1)
}

/// Hide cursor.
#[inline]
pub fn cursor_hide<W: Write + ?Sized>(w: &mut W) -> std::io::Result<()> {
    write!(w, "\x1b[?25l")
}

/// Show cursor.
#[inline]
pub fn cursor_show<W: Write + ?Sized>(w: &mut W) -> std::io::Result<()> {
    write!(w, "\x1b[?25h")
}

// =============================================================================
// Screen Control
// =============================================================================

/// Clear entire screen (viewport only).
#[inline]
pub fn erase_screen<W: Write + ?Sized>(w: &mut W) -> std::io::Result<()> {
    write!(w, "\x1b[2J")
}

// =============================================================================
// Style
// =============================================================================

/// Reset all attributes and colors.
#[inline]
pub fn reset<W: Write + ?Sized>(w: &mut W) -> std::io::Result<()> {
    w.write_all(RESET.as_bytes())
}

/// Emit the full SGR sequence for a style.
///
/// Always starts from a reset so the result never depends on what the
/// terminal had before: `ESC[0[;1][;3][;4][;38;2;R;G;B][;48;2;R;G;B]m`.
/// Zero color channels are omitted.
pub fn sgr<W: Write + ?Sized>(w: &mut W, style: Style) -> std::io::Result<()> {
    write!(w, "\x1b[0")?;

    let flags = style.flags();
    macro_rules! emit {
        ($flag:expr, $code:expr) => {
            if flags.contains($flag) {
                write!(w, ";{}", $code)?;
            }
        };
    }
    emit!(StyleFlags::BOLD, 1);
    emit!(StyleFlags::ITALIC, 3);
    emit!(StyleFlags::UNDERLINE, 4);

    if style.fg() != 0 {
        let (r, g, b) = rgb_channels(style.fg());
        write!(w, ";38;2;{};{};{}", r, g, b)?;
    }
    if style.bg() != 0 {
        let (r, g, b) = rgb_channels(style.bg());
        write!(w, ";48;2;{};{};{}", r, g, b)?;
    }

    write!(w, "m")
}

// =============================================================================
// Tests
// =============================================================================
