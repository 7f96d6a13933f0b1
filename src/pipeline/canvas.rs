//! The canvas session: everything one rendering surface owns.
//!
//! A [`Canvas`] is created once, mutated every frame and torn down when it
//! is dropped (or explicitly via [`Canvas::shutdown`]). There is no hidden
//! global: every operation goes through `&mut Canvas`.
//!
//! # Threading
//!
//! Single-threaded and synchronous. Nothing inside is synchronized; all
//! operations take `&mut self`, and sharing a canvas across threads needs
//! external locking. Frames never yield and cannot be cancelled.

use std::ops::ControlFlow;
use std::thread;
use std::time::Duration;

use super::frame::{self, FrameOutcome, Viewport};
use super::terminal::{StdTerminal, Terminal};
use crate::config::{CanvasConfig, Mode};
use crate::engine::{ComponentDescriptor, ComponentTree, Payload};
use crate::error::{Error, Result};
use crate::renderer::{CellBuffer, OutputBuffer, ansi, diff_and_swap, write_changes};
use crate::types::Style;

/// A diff-rendered canvas bound to a terminal.
pub struct Canvas<T: Terminal = StdTerminal> {
    config: CanvasConfig,
    front: CellBuffer,
    back: CellBuffer,
    tree: ComponentTree,
    terminal: T,
    terminal_size: (u16, u16),
    viewport: Viewport,
    output: OutputBuffer,
    /// Interactive setup happened and still needs undoing.
    session_active: bool,
}

impl Canvas<StdTerminal> {
    /// Initialize against the process's own terminal.
    pub fn initialize_stdout(config: CanvasConfig) -> Result<Self> {
        Self::initialize(config, StdTerminal::new())
    }
}

impl<T: Terminal> Canvas<T> {
    /// Allocate buffers and the tree, measure the terminal and, in
    /// interactive mode, take over the screen.
    ///
    /// Buffers are allocated before the terminal is touched, so an
    /// allocation failure leaves the terminal exactly as it was.
    pub fn initialize(config: CanvasConfig, mut terminal: T) -> Result<Self> {
        config.validate()?;

        let front = CellBuffer::allocate(config.max_width, config.max_height)?;
        let back = CellBuffer::allocate(config.max_width, config.max_height)?;
        let tree = ComponentTree::with_capacity(config.expected_components)?;

        let terminal_size = match terminal.size() {
            Ok(size) => size,
            Err(e) => {
                tracing::warn!(error = %e, "terminal size unavailable at startup");
                (0, 0)
            }
        };
        let viewport = Viewport::compute(
            terminal_size,
            (config.max_width, config.max_height),
            config.show_border,
        );

        let mut session_active = false;
        if config.mode == Mode::Interactive {
            let mut out = OutputBuffer::with_capacity(16);
            ansi::erase_screen(&mut out)?;
            ansi::cursor_hide(&mut out)?;
            out.flush_to(&mut terminal)?;
            terminal.flush()?;
            if let Err(e) = terminal.enter_raw_mode() {
                // Undo the cursor hide before bailing out.
                let _ = ansi::cursor_show(&mut terminal).and_then(|_| terminal.flush());
                return Err(e.into());
            }
            session_active = true;
        }

        tracing::debug!(
            width = config.max_width,
            height = config.max_height,
            mode = ?config.mode,
            terminal = ?terminal_size,
            "canvas initialized"
        );

        Ok(Self {
            config,
            front,
            back,
            tree,
            terminal,
            terminal_size,
            viewport,
            output: OutputBuffer::new(),
            session_active,
        })
    }

    /// Pack a style word.
    pub fn make_style(fg: u32, bg: u32, bold: bool, italic: bool, underline: bool) -> Style {
        Style::make(fg, bg, bold, italic, underline)
    }

    // =========================================================================
    // Direct drawing (bypasses the tree)
    // =========================================================================

    /// Write one UTF-8 glyph into the back buffer. Off-canvas or malformed
    /// writes are dropped and return false.
    pub fn write_glyph(&mut self, x: u16, y: u16, glyph: &[u8], style: Style) -> bool {
        self.back.write_glyph(x, y, glyph, style)
    }

    /// Write a string into the back buffer, clipped at the right edge.
    /// Returns the number of columns written.
    pub fn write_string(&mut self, x: u16, y: u16, text: &str, style: Style) -> u16 {
        self.back.write_string(x, y, text, style)
    }

    // =========================================================================
    // Component tree
    // =========================================================================

    /// Add a component; fill in the returned payload.
    pub fn register(&mut self, descriptor: ComponentDescriptor) -> Result<&mut Payload> {
        self.tree.register(descriptor)
    }

    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ComponentTree {
        &mut self.tree
    }

    // =========================================================================
    // Frames
    // =========================================================================

    /// Run one full frame: size check, tree render, diff, flush.
    pub fn render(&mut self) -> Result<FrameOutcome> {
        self.frame(true)
    }

    /// Flush whatever is in the back buffer without rebuilding it from the
    /// tree. For callers that draw with [`write_glyph`](Self::write_glyph)
    /// and [`write_string`](Self::write_string).
    pub fn present(&mut self) -> Result<FrameOutcome> {
        self.frame(false)
    }

    fn frame(&mut self, from_tree: bool) -> Result<FrameOutcome> {
        self.check_size();

        let outcome = if self.is_too_small() {
            frame::write_advisory(
                &mut self.output,
                (self.config.min_width, self.config.min_height),
            )?;
            FrameOutcome::TooSmall
        } else {
            if from_tree {
                self.back.clear();
                frame::render_tree(&mut self.tree, &mut self.back);
            }

            let changes = diff_and_swap(&mut self.front, &self.back);
            write_changes(&mut self.output, &changes, self.viewport.origin)?;
            if let Some(corner) = self.viewport.border {
                frame::draw_border(
                    &mut self.output,
                    corner,
                    (self.config.max_width, self.config.max_height),
                )?;
            }
            tracing::trace!(changes = changes.len(), "frame flushed");
            FrameOutcome::Drawn {
                changes: changes.len(),
            }
        };

        self.output.flush_to(&mut self.terminal)?;
        self.terminal.flush()?;
        Ok(outcome)
    }

    /// On a size change: clear the display, force a full redraw and
    /// re-center. A failed query counts as "unchanged".
    fn check_size(&mut self) {
        let size = match self.terminal.size() {
            Ok(size) => size,
            Err(e) => {
                tracing::warn!(error = %Error::TerminalQuery(e), "keeping previous terminal size");
                return;
            }
        };
        if size == self.terminal_size {
            return;
        }

        tracing::debug!(from = ?self.terminal_size, to = ?size, "terminal resized");
        self.terminal_size = size;
        // Writes into an in-memory buffer cannot fail.
        let _ = ansi::erase_screen(&mut self.output);
        self.front.invalidate();
        self.viewport = Viewport::compute(
            size,
            (self.config.max_width, self.config.max_height),
            self.config.show_border,
        );
    }

    fn is_too_small(&self) -> bool {
        self.terminal_size.0 < self.config.min_width || self.terminal_size.1 < self.config.min_height
    }

    /// Drive the canvas according to its mode.
    ///
    /// Interactive: call `update`, render, sleep `interval`, repeat until
    /// `update` breaks. One-shot: `update` once, render once.
    pub fn run<F>(&mut self, interval: Duration, mut update: F) -> Result<()>
    where
        F: FnMut(&mut Self) -> ControlFlow<()>,
    {
        match self.config.mode {
            Mode::OneShot => {
                let _ = update(self);
                self.render()?;
                Ok(())
            }
            Mode::Interactive => loop {
                if update(self).is_break() {
                    return Ok(());
                }
                self.render()?;
                thread::sleep(interval);
            },
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Last measured terminal size as (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn back_buffer(&self) -> &CellBuffer {
        &self.back
    }

    pub fn front_buffer(&self) -> &CellBuffer {
        &self.front
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut T {
        &mut self.terminal
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Restore the terminal now and report any failure.
    ///
    /// Dropping the canvas does the same but can only log errors.
    pub fn shutdown(mut self) -> Result<()> {
        self.teardown()
    }

    fn teardown(&mut self) -> Result<()> {
        if !self.session_active {
            return Ok(());
        }
        self.session_active = false;

        let mut out = OutputBuffer::with_capacity(16);
        ansi::reset(&mut out)?;
        ansi::cursor_show(&mut out)?;
        let written = out
            .flush_to(&mut self.terminal)
            .and_then(|_| self.terminal.flush());
        // Mode restore runs even if the final write failed.
        let restored = self.terminal.restore_mode();
        written?;
        restored?;
        tracing::debug!("canvas session closed");
        Ok(())
    }
}

impl<T: Terminal> Drop for Canvas<T> {
    fn drop(&mut self) {
        if let Err(e) = self.teardown() {
            tracing::warn!(error = %e, "terminal teardown failed");
        }
    }
}
