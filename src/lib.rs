//! # tui-canvas
//!
//! A fixed-size character canvas rendered into a terminal with minimal
//! output.
//!
//! Drawing happens into a back buffer of cells, either directly through
//! [`Canvas::write_glyph`] / [`Canvas::write_string`] or by registering
//! components in a tree whose nodes are positioned relative to their
//! parents. Containers and text draw; boxes are stored but not rendered.
//! Each frame compares the back buffer with what the terminal already shows
//! and emits ANSI sequences only for the cells that differ.
//!
//! ## Architecture
//!
//! ```text
//! ComponentTree ─→ layout (parent-relative → absolute)
//!               ─→ back CellBuffer ─→ diff vs front ─→ ANSI ─→ Terminal
//! ```
//!
//! ## Modules
//!
//! - [`types`] - style word, cells, component kinds
//! - [`engine`] - component registry and nodes
//! - [`layout`] - absolute position resolution
//! - [`renderer`] - cell buffers, diffing, ANSI output
//! - [`pipeline`] - the [`Canvas`] session and terminal backend
//! - [`config`] - canvas configuration
//! - [`error`] - error types
//!
//! ## Colors
//!
//! Colors are packed 24-bit RGB where `0` means "terminal default". Pure
//! black (`0x000000`) therefore cannot be requested; use `0x000001` or
//! similar.
//!
//! ## Threading
//!
//! Everything is single-threaded. A [`Canvas`] takes `&mut self` for every
//! operation and does no internal locking; wrap it in a mutex to share it.
//!
//! ## Example
//!
//! ```no_run
//! use tui_canvas::{Canvas, CanvasConfig, ComponentDescriptor, Mode, Style};
//!
//! # fn main() -> tui_canvas::Result<()> {
//! let config = CanvasConfig::new(40, 10).min_size(20, 5).mode(Mode::OneShot);
//! let mut canvas = Canvas::initialize_stdout(config)?;
//!
//! let text = canvas.register(ComponentDescriptor::text(1))?;
//! if let Some(text) = text.as_text_mut() {
//!     text.content = "Hello".into();
//!     text.style = Style::make(0xFF8800, 0, true, false, false);
//! }
//! canvas.render()?;
//! canvas.shutdown()
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod renderer;
pub mod types;

pub use config::{CanvasConfig, Mode};
pub use engine::{
    BoxPayload, ComponentDescriptor, ComponentTree, ContainerPayload, Node, Payload, ROOT_ID,
    TextPayload,
};
pub use error::{Error, RegistrationError, Result};
pub use pipeline::{Canvas, FrameOutcome, StdTerminal, Terminal, Viewport};
pub use renderer::CellBuffer;
pub use types::{Cell, ComponentKind, Style, StyleFlags};
