//! Non-owning navigation over the arena.

use crate::base::NodeIndex;
use crate::node::{Node, NodeArena};

/// A view of one node plus its ancestor chain.
///
/// `NodePath` borrows the arena and holds only an index; it never allocates
/// or frees nodes. Ancestors are reached through the arena's parent
/// pointers, so a path is valid as long as the borrow is.
#[derive(Clone, Copy, Debug)]
pub struct NodePath<'a> {
    arena: &'a NodeArena,
    index: NodeIndex,
}

impl<'a> NodePath<'a> {
    pub fn new(arena: &'a NodeArena, index: NodeIndex) -> Self {
        Self { arena, index }
    }

    #[inline]
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    #[inline]
    pub fn arena(&self) -> &'a NodeArena {
        self.arena
    }

    /// The node this path points at, `None` if the index is dangling.
    #[inline]
    pub fn node(&self) -> Option<&'a Node> {
        self.arena.get(self.index)
    }

    #[inline]
    pub fn kind(&self) -> Option<u16> {
        self.node().map(|n| n.kind)
    }

    pub fn parent(&self) -> Option<NodePath<'a>> {
        self.arena
            .parent_of(self.index)
            .map(|parent| NodePath::new(self.arena, parent))
    }

    pub fn grandparent(&self) -> Option<NodePath<'a>> {
        self.parent()?.parent()
    }

    /// Ancestors from the immediate parent up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = NodePath<'a>> + 'a {
        let arena = self.arena;
        std::iter::successors(self.parent(), move |p| {
            arena.parent_of(p.index).map(|parent| NodePath::new(arena, parent))
        })
    }
}
