//! Layout resolver - parent-relative offsets to absolute canvas positions.
//!
//! There is no flow layout: every node carries a fixed offset from its
//! parent's origin.
//!
//! ```text
//! absolute = parent_absolute + own_offset     (node attached to a parent)
//! absolute = own_offset                       (node attached to the root)
//! absolute = (0, 0)                           (the root itself)
//! ```
//!
//! The tree is walked top-down, so a parent is always resolved before its
//! children read its position. Coordinates saturate at `u16::MAX`; anything
//! that far out is clipped by the cell buffer anyway.

use crate::engine::{ComponentTree, NodeIndex};

/// Resolve one node from its parent's current position.
///
/// The parent must already be resolved for this frame. Returns the new
/// absolute position, or `None` for an unknown index.
pub fn resolve_node(tree: &mut ComponentTree, index: NodeIndex) -> Option<(u16, u16)> {
    let node = tree.node(index)?;

    let base = match (node.parent_id(), node.parent()) {
        // Attached to a real parent: offset from its resolved origin.
        (Some(_), Some(parent)) => tree.node(parent)?.position(),
        // Root-level placement (and the root itself).
        _ => (0, 0),
    };
    let (dx, dy) = node.payload().offset().unwrap_or((0, 0));
    let abs = (base.0.saturating_add(dx), base.1.saturating_add(dy));

    tree.node_mut(index)?.abs = abs;
    Some(abs)
}

// =============================================================================
// Tests
// =============================================================================
