//! Render pipeline and terminal session.
//!
//! ```text
//! Canvas::render()
//!     → size check (resize: clear screen, invalidate front, re-center)
//!         → too small? advisory only
//!         → tree walk (layout + text) into the back buffer
//!             → diff back vs front → ANSI → border → terminal
//! ```

pub mod canvas;
pub mod frame;
pub mod terminal;

pub use canvas::Canvas;
pub use frame::{FrameOutcome, Viewport};
pub use terminal::{StdTerminal, Terminal};
