//! Error types for tui-canvas.

use std::collections::TryReserveError;
use std::io;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by canvas operations.
///
/// Malformed glyphs are not represented here: a corrupt write is dropped so a
/// single bad glyph never aborts a frame.
#[derive(Debug, Error)]
pub enum Error {
    /// Memory for a buffer or node could not be reserved.
    ///
    /// Fatal during initialization. Anything allocated before the failure
    /// has already been released when this is returned.
    #[error("failed to allocate {what}: {source}")]
    Allocation {
        what: &'static str,
        #[source]
        source: TryReserveError,
    },

    /// A component could not be added to the tree. The tree is unchanged.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// The terminal size could not be queried.
    ///
    /// The render pipeline treats this as "size unchanged" for the frame.
    #[error("terminal size query failed: {0}")]
    TerminalQuery(#[source] io::Error),

    /// The configuration describes an unusable canvas.
    #[error("invalid canvas configuration: {0}")]
    InvalidConfig(String),

    /// Writing to the terminal stream failed.
    #[error("terminal io error: {0}")]
    Io(#[from] io::Error),
}

/// Reasons a component registration is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The identifier is already in the tree. Id 0 always is (the root).
    #[error("component {0} is already registered")]
    Duplicate(u16),

    /// The parent must be registered before its children.
    #[error("component {id} references unregistered parent {parent}")]
    UnknownParent { id: u16, parent: u16 },

    /// A component cannot be its own parent.
    #[error("component {0} lists itself as parent")]
    SelfParent(u16),
}

impl Error {
    pub(crate) fn allocation(what: &'static str, source: TryReserveError) -> Self {
        Self::Allocation { what, source }
    }
}
