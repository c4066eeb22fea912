//! Listing sources for the scanner
//!
//! A scan never talks to a drive directly; it goes through a [`ChildLister`]
//! capability supplied by the caller. The built-in [`local::LocalDrive`]
//! serves a local filesystem root; remote drive adapters implement the same
//! trait on top of their own client.

pub mod local;

use thiserror::Error;

use crate::types::{Item, NodeId};

/// Errors that can occur while listing the children of a node
#[derive(Error, Debug)]
pub enum ListError {
    /// Transient failure for one node; the scanner skips the subtree
    #[error("Failed to list children of {node}: {reason}")]
    Transient {
        /// Node whose listing failed
        node: NodeId,
        /// Human-readable failure reason
        reason: String,
    },

    /// The identifier does not name a listable folder
    #[error("Not a listable folder: {0}")]
    NotAFolder(NodeId),

    /// IO error from a filesystem-backed source
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Specialized Result type for listing operations
pub type ListResult<T> = Result<T, ListError>;

/// Capability to list the children of a node
///
/// Implementations own their retry policy; the scanner treats any error as
/// "skip this subtree, log, continue" and never retries on its own.
pub trait ChildLister: Send + Sync {
    /// List the direct children of the given node
    fn list_children(&self, id: &NodeId) -> ListResult<Vec<Item>>;
}

impl<L: ChildLister + ?Sized> ChildLister for &L {
    fn list_children(&self, id: &NodeId) -> ListResult<Vec<Item>> {
        (**self).list_children(id)
    }
}
