//! Component engine - the tree of drawable elements.
//!
//! - [`registry`] - id → node registry enforcing the tree invariants
//! - [`node`] - nodes and their type-specific payloads

pub mod node;
pub mod registry;

pub use node::{BoxPayload, ContainerPayload, Node, NodeIndex, Payload, TextPayload};
pub use registry::{ComponentDescriptor, ComponentTree, ROOT_ID, ROOT_INDEX};
