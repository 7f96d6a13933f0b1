//! Component nodes and their type-specific payloads.

use crate::types::{ComponentKind, Style};

/// Position of a node in the tree arena. Stable for the life of the tree.
pub type NodeIndex = usize;

// =============================================================================
// Payloads
// =============================================================================

/// Placement data for a grouping node. Draws nothing itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerPayload {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

/// A single line of styled text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextPayload {
    pub x: u16,
    pub y: u16,
    pub content: String,
    pub style: Style,
}

/// A bordered, titled panel.
///
/// Positioned like a container. It has no drawing rule of its own yet, so
/// the render walk only places it and visits its children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoxPayload {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    pub title: String,
    pub border_style: Style,
}

/// Type-specific data carried by a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Root,
    Container(ContainerPayload),
    Text(TextPayload),
    Box(BoxPayload),
}

impl Payload {
    /// A zeroed payload for `kind`, ready for the caller to fill in.
    pub fn for_kind(kind: ComponentKind) -> Self {
        match kind {
            ComponentKind::Root => Self::Root,
            ComponentKind::Container => Self::Container(ContainerPayload::default()),
            ComponentKind::Text => Self::Text(TextPayload::default()),
            ComponentKind::Box => Self::Box(BoxPayload::default()),
        }
    }

    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Root => ComponentKind::Root,
            Self::Container(_) => ComponentKind::Container,
            Self::Text(_) => ComponentKind::Text,
            Self::Box(_) => ComponentKind::Box,
        }
    }

    /// Offset relative to the parent. Root payloads have none.
    pub fn offset(&self) -> Option<(u16, u16)> {
        match self {
            Self::Root => None,
            Self::Container(c) => Some((c.x, c.y)),
            Self::Text(t) => Some((t.x, t.y)),
            Self::Box(b) => Some((b.x, b.y)),
        }
    }

    pub fn as_container_mut(&mut self) -> Option<&mut ContainerPayload> {
        match self {
            Self::Container(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextPayload> {
        match self {
            Self::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextPayload> {
        match self {
            Self::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_box_mut(&mut self) -> Option<&mut BoxPayload> {
        match self {
            Self::Box(b) => Some(b),
            _ => None,
        }
    }
}

// =============================================================================
// Node
// =============================================================================

/// One element of the component tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) id: u16,
    pub(crate) parent_id: Option<u16>,
    pub(crate) parent: Option<NodeIndex>,
    pub(crate) children: Vec<NodeIndex>,
    /// Absolute canvas position. Written only by the layout resolver.
    pub(crate) abs: (u16, u16),
    pub(crate) payload: Payload,
}

impl Node {
    pub(crate) fn new(id: u16, parent_id: Option<u16>, parent: Option<NodeIndex>, payload: Payload) -> Self {
        Self {
            id,
            parent_id,
            parent,
            children: Vec::new(),
            abs: (0, 0),
            payload,
        }
    }

    #[inline]
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Parent id as registered. `None` means "attached under the root".
    #[inline]
    pub fn parent_id(&self) -> Option<u16> {
        self.parent_id
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// Children in registration order, which is also render order.
    #[inline]
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    #[inline]
    pub fn kind(&self) -> ComponentKind {
        self.payload.kind()
    }

    #[inline]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Absolute position from the most recent layout pass.
    #[inline]
    pub fn position(&self) -> (u16, u16) {
        self.abs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_for_kind() {
        for kind in [
            ComponentKind::Root,
            ComponentKind::Container,
            ComponentKind::Text,
            ComponentKind::Box,
        ] {
            assert_eq!(Payload::for_kind(kind).kind(), kind);
        }
    }

    #[test]
    fn test_payload_offset() {
        assert_eq!(Payload::Root.offset(), None);
        let mut payload = Payload::for_kind(ComponentKind::Text);
        let text = payload.as_text_mut().unwrap();
        text.x = 3;
        text.y = 7;
        assert_eq!(payload.offset(), Some((3, 7)));
        assert!(payload.as_container_mut().is_none());
    }
}
