//! Terminal renderer - the "blind" output layer.
//!
//! The renderer knows only about cells. It doesn't understand components or
//! layout. It holds the cell grids, compares them and turns the difference
//! into ANSI escape sequences.

pub mod ansi;
pub mod buffer;
pub mod diff;
pub mod output;

pub use buffer::{CellBuffer, char_width, decode_glyph};
pub use diff::{CellChange, diff_and_swap, write_changes};
pub use output::OutputBuffer;
