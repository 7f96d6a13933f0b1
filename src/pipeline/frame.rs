//! One frame of the render pipeline.
//!
//! ```text
//! Idle → SizeCheck ─┬─→ TooSmall ───────────────┬─→ Flush → Idle
//!                   └─→ Render (tree → back) ───┘
//! ```
//!
//! The pieces here are pure with respect to the terminal: they read the tree
//! and buffers and write escape sequences into any `Write`, in practice the
//! canvas's [`OutputBuffer`](crate::renderer::OutputBuffer). The
//! [`Canvas`](super::Canvas) sequences them and owns the I/O.

use std::io::{self, Write};

use crate::engine::{ComponentTree, NodeIndex, ROOT_INDEX};
use crate::layout;
use crate::renderer::{CellBuffer, ansi};
use crate::types::ComponentKind;

/// What a frame ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Terminal below the minimum size; only the advisory was written.
    TooSmall,
    /// The canvas was flushed; `changes` cells were re-emitted.
    Drawn { changes: usize },
}

// =============================================================================
// Viewport - where the canvas sits inside the terminal
// =============================================================================

/// Placement of the canvas inside the terminal window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// Terminal position of canvas cell (0, 0).
    pub origin: (u16, u16),
    /// Terminal position of the border's top-left corner, when it fits.
    pub border: Option<(u16, u16)>,
}

impl Viewport {
    /// Center a `canvas`-sized area (plus a one-cell frame when `show_border`
    /// is set and there is room for it) in a `terminal`-sized window.
    pub fn compute(terminal: (u16, u16), canvas: (u16, u16), show_border: bool) -> Self {
        let (tw, th) = (terminal.0 as u32, terminal.1 as u32);
        let (cw, ch) = (canvas.0 as u32, canvas.1 as u32);

        if show_border && tw >= cw + 2 && th >= ch + 2 {
            let bx = ((tw - cw - 2) / 2) as u16;
            let by = ((th - ch - 2) / 2) as u16;
            Self {
                origin: (bx + 1, by + 1),
                border: Some((bx, by)),
            }
        } else {
            Self {
                origin: ((tw.saturating_sub(cw) / 2) as u16, (th.saturating_sub(ch) / 2) as u16),
                border: None,
            }
        }
    }
}

// =============================================================================
// Render - tree into the back buffer
// =============================================================================

/// Walk the tree depth-first in child order, resolving positions and drawing.
///
/// Later siblings draw over earlier ones where they overlap.
pub fn render_tree(tree: &mut ComponentTree, back: &mut CellBuffer) {
    render_node(tree, back, ROOT_INDEX);
}

fn render_node(tree: &mut ComponentTree, back: &mut CellBuffer, index: NodeIndex) {
    let Some(kind) = tree.node(index).map(|n| n.kind()) else {
        return;
    };

    match kind {
        ComponentKind::Root => {}
        ComponentKind::Container => {
            layout::resolve_node(tree, index);
        }
        // No render rule for boxes yet: the node and its subtree are skipped.
        ComponentKind::Box => return,
        ComponentKind::Text => {
            if let Some((x, y)) = layout::resolve_node(tree, index) {
                if let Some(text) = tree.node(index).and_then(|n| n.payload().as_text()) {
                    back.write_string(x, y, &text.content, text.style);
                }
            }
            return;
        }
    }

    let child_count = tree.node(index).map_or(0, |n| n.children().len());
    for i in 0..child_count {
        let child = tree.node(index).map(|n| n.children()[i]);
        if let Some(child) = child {
            render_node(tree, back, child);
        }
    }
}

// =============================================================================
// Terminal-side decorations
// =============================================================================

/// Top-left advisory shown instead of the canvas on a too-small terminal.
pub fn write_advisory<W: Write + ?Sized>(w: &mut W, min: (u16, u16)) -> io::Result<()> {
    ansi::cursor_to(w, 0, 0)?;
    ansi::reset(w)?;
    write!(
        w,
        "Please resize your terminal to at least {} x {} to view this content.",
        min.0, min.1
    )
}

/// Frame a `canvas`-sized area whose top-left border corner is at `corner`.
///
/// Drawn outside the cell diff: it is static and rewritten whenever called.
pub fn draw_border<W: Write + ?Sized>(
    w: &mut W,
    corner: (u16, u16),
    canvas: (u16, u16),
) -> io::Result<()> {
    let (bx, by) = corner;
    let (cw, ch) = canvas;
    let right = bx.saturating_add(cw).saturating_add(1);
    let bottom = by.saturating_add(ch).saturating_add(1);

    ansi::cursor_to(w, bx, by)?;
    w.write_all(ansi::TOP_LEFT.as_bytes())?;
    for _ in 0..cw {
        w.write_all(ansi::HORIZONTAL.as_bytes())?;
    }
    w.write_all(ansi::TOP_RIGHT.as_bytes())?;

    for row in 1..=ch {
        ansi::cursor_to(w, bx, by + row)?;
        w.write_all(ansi::VERTICAL.as_bytes())?;
        ansi::cursor_to(w, right, by + row)?;
        w.write_all(ansi::VERTICAL.as_bytes())?;
    }

    ansi::cursor_to(w, bx, bottom)?;
    w.write_all(ansi::BOTTOM_LEFT.as_bytes())?;
    for _ in 0..cw {
        w.write_all(ansi::HORIZONTAL.as_bytes())?;
    }
    w.write_all(ansi::BOTTOM_RIGHT.as_bytes())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ComponentDescriptor;
    use crate::types::Style;
    use pretty_assertions::assert_eq;

    fn row(buffer: &CellBuffer, y: u16) -> String {
        (0..buffer.width())
            .map(|x| buffer.get(x, y).unwrap().symbol())
            .collect()
    }

    fn add_text(tree: &mut ComponentTree, desc: ComponentDescriptor, x: u16, y: u16, s: &str) {
        let text = tree.register(desc).unwrap().as_text_mut().unwrap();
        text.x = x;
        text.y = y;
        text.content = s.to_string();
    }

    #[test]
    fn test_viewport_centers_canvas() {
        let vp = Viewport::compute((30, 14), (20, 10), false);
        assert_eq!(vp, Viewport { origin: (5, 2), border: None });
    }

    #[test]
    fn test_viewport_with_border() {
        let vp = Viewport::compute((30, 14), (20, 10), true);
        assert_eq!(vp, Viewport { origin: (5, 2), border: Some((4, 1)) });

        // Exactly enough room for the frame.
        let vp = Viewport::compute((22, 12), (20, 10), true);
        assert_eq!(vp, Viewport { origin: (1, 1), border: Some((0, 0)) });
    }

    #[test]
    fn test_viewport_border_dropped_when_cramped() {
        let vp = Viewport::compute((21, 12), (20, 10), true);
        assert_eq!(vp, Viewport { origin: (0, 1), border: None });
    }

    #[test]
    fn test_viewport_small_terminal() {
        let vp = Viewport::compute((10, 5), (20, 10), false);
        assert_eq!(vp.origin, (0, 0));
    }

    #[test]
    fn test_render_tree_positions_text() {
        let mut tree = ComponentTree::with_capacity(4).unwrap();
        let c = tree
            .register(ComponentDescriptor::container(1))
            .unwrap()
            .as_container_mut()
            .unwrap();
        c.x = 2;
        c.y = 1;
        add_text(&mut tree, ComponentDescriptor::text(2).parent(1), 1, 0, "ab");
        add_text(&mut tree, ComponentDescriptor::text(3), 0, 0, "z");

        let mut back = CellBuffer::allocate(8, 3).unwrap();
        render_tree(&mut tree, &mut back);

        assert_eq!(row(&back, 0), "z       ");
        assert_eq!(row(&back, 1), "   ab   ");
        assert_eq!(tree.position(2), Some((3, 1)));
    }

    #[test]
    fn test_later_sibling_wins() {
        let mut tree = ComponentTree::with_capacity(4).unwrap();
        add_text(&mut tree, ComponentDescriptor::text(1), 0, 0, "aaaa");
        add_text(&mut tree, ComponentDescriptor::text(2), 1, 0, "bb");

        let mut back = CellBuffer::allocate(5, 1).unwrap();
        render_tree(&mut tree, &mut back);
        assert_eq!(row(&back, 0), "abba ");
    }

    #[test]
    fn test_box_is_skipped_with_its_subtree() {
        let mut tree = ComponentTree::with_capacity(4).unwrap();
        let b = tree
            .register(ComponentDescriptor::boxed(1))
            .unwrap()
            .as_box_mut()
            .unwrap();
        b.width = 4;
        b.height = 2;
        b.title = "T".into();
        b.border_style = Style::make(0xFFFFFF, 0, true, false, false);
        add_text(&mut tree, ComponentDescriptor::text(2).parent(1), 0, 0, "X");
        add_text(&mut tree, ComponentDescriptor::text(3), 2, 1, "y");

        let mut back = CellBuffer::allocate(6, 2).unwrap();
        render_tree(&mut tree, &mut back);
        assert_eq!(row(&back, 0), "      ");
        assert_eq!(row(&back, 1), "  y   ");
    }

    #[test]
    fn test_advisory() {
        let mut out = Vec::new();
        write_advisory(&mut out, (10, 5)).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\x1b[1;1H\x1b[0mPlease resize your terminal to at least 10 x 5 to view this content."
        );
    }

    #[test]
    fn test_draw_border() {
        let mut out = Vec::new();
        draw_border(&mut out, (0, 0), (2, 1)).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\x1b[1;1H┌──┐\x1b[2;1H│\x1b[2;4H│\x1b[3;1H└──┘"
        );
    }
}
