//! Shared base types for the arena tree (`NodeIndex`, `NodeList`).

use serde::{Deserialize, Serialize};

/// Index of a node in a [`NodeArena`](crate::NodeArena).
///
/// `NodeIndex::NONE` marks an absent child (no parent, no initializer, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    pub const fn is_some(self) -> bool {
        !self.is_none()
    }

    /// `None` for `NodeIndex::NONE`, otherwise `Some(self)`.
    #[inline]
    pub const fn into_option(self) -> Option<NodeIndex> {
        if self.is_none() { None } else { Some(self) }
    }
}

impl Default for NodeIndex {
    fn default() -> Self {
        Self::NONE
    }
}

/// Ordered list of child nodes (call arguments, statements).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeList {
    pub nodes: Vec<NodeIndex>,
}

impl NodeList {
    pub fn new() -> NodeList {
        NodeList { nodes: Vec::new() }
    }

    pub fn from_vec(nodes: Vec<NodeIndex>) -> NodeList {
        NodeList { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
