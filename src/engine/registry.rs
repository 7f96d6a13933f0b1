//! Component Registry - the tree of nodes addressed by small integer ids.
//!
//! Nodes live in an arena (`Vec<Node>`); an id → index map resolves the
//! caller-chosen identifiers. Children are kept as ordered arena indices,
//! so growing the arena never invalidates a link.
//!
//! Rules enforced at registration:
//! - id 0 is the implicit root and exists from construction
//! - ids are unique
//! - a parent must be registered before any child that names it
//!
//! Together these keep the tree acyclic without any check at layout time.

use std::collections::HashMap;

use super::node::{Node, NodeIndex, Payload};
use crate::error::{Error, RegistrationError, Result};
use crate::types::ComponentKind;

/// Identifier of the implicit root.
pub const ROOT_ID: u16 = 0;

/// Arena index of the root.
pub const ROOT_INDEX: NodeIndex = 0;

// =============================================================================
// Descriptor
// =============================================================================

/// What a caller supplies to add a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentDescriptor {
    pub id: u16,
    /// `None` attaches the node under the root.
    pub parent: Option<u16>,
    pub kind: ComponentKind,
}

impl ComponentDescriptor {
    pub fn new(id: u16, kind: ComponentKind) -> Self {
        Self {
            id,
            parent: None,
            kind,
        }
    }

    pub fn container(id: u16) -> Self {
        Self::new(id, ComponentKind::Container)
    }

    pub fn text(id: u16) -> Self {
        Self::new(id, ComponentKind::Text)
    }

    pub fn boxed(id: u16) -> Self {
        Self::new(id, ComponentKind::Box)
    }

    /// Attach under `parent` instead of the root.
    pub fn parent(mut self, parent: u16) -> Self {
        self.parent = Some(parent);
        self
    }
}

// =============================================================================
// ComponentTree
// =============================================================================

/// Registry of component nodes.
#[derive(Debug, Clone)]
pub struct ComponentTree {
    nodes: Vec<Node>,
    ids: HashMap<u16, NodeIndex>,
}

impl ComponentTree {
    /// Create a tree holding only the root, with room for `capacity` nodes.
    pub fn with_capacity(capacity: u16) -> Result<Self> {
        let capacity = capacity as usize + 1;
        let mut nodes = Vec::new();
        nodes
            .try_reserve(capacity)
            .map_err(|e| Error::allocation("component registry", e))?;
        let mut ids = HashMap::new();
        ids.try_reserve(capacity)
            .map_err(|e| Error::allocation("component registry", e))?;

        nodes.push(Node::new(ROOT_ID, None, None, Payload::Root));
        ids.insert(ROOT_ID, ROOT_INDEX);
        Ok(Self { nodes, ids })
    }

    /// Add a component and return its freshly allocated payload to fill in.
    ///
    /// The node becomes the last child of its parent (the root when
    /// `descriptor.parent` is `None`). On error the tree is left unchanged.
    pub fn register(&mut self, descriptor: ComponentDescriptor) -> Result<&mut Payload> {
        let ComponentDescriptor { id, parent, kind } = descriptor;

        if self.ids.contains_key(&id) {
            return Err(RegistrationError::Duplicate(id).into());
        }
        let parent_index = match parent {
            Some(pid) if pid == id => return Err(RegistrationError::SelfParent(id).into()),
            Some(pid) => *self
                .ids
                .get(&pid)
                .ok_or(RegistrationError::UnknownParent { id, parent: pid })?,
            None => ROOT_INDEX,
        };

        // Reserve everything before touching the tree.
        self.nodes
            .try_reserve(1)
            .map_err(|e| Error::allocation("component node", e))?;
        self.ids
            .try_reserve(1)
            .map_err(|e| Error::allocation("component node", e))?;
        self.nodes[parent_index]
            .children
            .try_reserve(1)
            .map_err(|e| Error::allocation("component children", e))?;

        let index = self.nodes.len();
        self.nodes
            .push(Node::new(id, parent, Some(parent_index), Payload::for_kind(kind)));
        self.ids.insert(id, index);
        self.nodes[parent_index].children.push(index);

        tracing::debug!(id, parent = ?parent, ?kind, "registered component");
        Ok(&mut self.nodes[index].payload)
    }

    /// Ids of the direct children of `id`, in render order.
    pub fn children_of(&self, id: u16) -> Option<impl Iterator<Item = u16> + '_> {
        let node = self.node(self.index_of(id)?)?;
        Some(node.children.iter().map(|&child| self.nodes[child].id))
    }

    #[inline]
    pub fn index_of(&self, id: u16) -> Option<NodeIndex> {
        self.ids.get(&id).copied()
    }

    #[inline]
    pub fn contains(&self, id: u16) -> bool {
        self.ids.contains_key(&id)
    }

    #[inline]
    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index)
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        self.nodes.get_mut(index)
    }

    pub fn payload(&self, id: u16) -> Option<&Payload> {
        self.index_of(id).map(|i| &self.nodes[i].payload)
    }

    /// Mutable payload, for updating content between frames.
    pub fn payload_mut(&mut self, id: u16) -> Option<&mut Payload> {
        let index = self.index_of(id)?;
        Some(&mut self.nodes[index].payload)
    }

    /// Absolute position from the most recent layout pass.
    pub fn position(&self, id: u16) -> Option<(u16, u16)> {
        self.index_of(id).map(|i| self.nodes[i].abs)
    }

    /// Number of nodes, root included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root exists.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }
}

// =============================================================================
// Tests
// =============================================================================
