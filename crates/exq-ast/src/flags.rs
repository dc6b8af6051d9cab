//! Packed per-node flags.

use bitflags::bitflags;

bitflags! {
    /// Flags stored in `Node::flags`.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u16 {
        /// Created by a node builder rather than imported from the host tree.
        const SYNTHESIZED = 1 << 0;
        /// Removed from the tree by a substitution; kept in the arena but
        /// no longer reachable from the root.
        const DETACHED = 1 << 1;
    }
}
