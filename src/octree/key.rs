use crate::spatial::math::{octant_offset, vector::V3c, AxisMask};
use std::fmt;

/// Path encoded identifier of an octree node
/// The root is the single sentinel bit `0b1`, every level below appends the 3 bits of the selected octant.
/// Keys are not ordered spatially, their ordering only reflects the encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct NodeKey(u64);

impl Default for NodeKey {
    fn default() -> Self {
        Self::ROOT
    }
}

impl NodeKey {
    pub const ROOT: NodeKey = NodeKey(0b1);

    /// Number of bits available for the encoding
    pub const BITS: u32 = u64::BITS;

    /// The deepest level representable: `3 * MAX_DEPTH + 1 <= BITS`
    pub const MAX_DEPTH: u8 = ((Self::BITS - 1) / 3) as u8;

    /// Creates a key from its raw value, in case it is a valid encoding
    pub fn from_raw(raw: u64) -> Option<Self> {
        if 0 == raw || 0 != (Self::BITS - 1 - raw.leading_zeros()) % 3 {
            return None;
        }
        Some(Self(raw))
    }

    pub fn raw(self) -> u64 {
        self.0
    }

    /// Creates the key of the node reached by the given octant selections from the root
    pub fn from_path<I: IntoIterator<Item = AxisMask>>(path: I) -> Self {
        path.into_iter().fold(Self::ROOT, NodeKey::append)
    }

    /// The key of the given child of this node
    /// No bounds checking is done: appending below `MAX_DEPTH` silently aliases with an unrelated node
    pub fn append(self, child: AxisMask) -> NodeKey {
        NodeKey((self.0 << 3) | child.bits() as u64)
    }

    pub fn depth(self) -> u8 {
        ((Self::BITS - 1 - self.0.leading_zeros()) / 3) as u8
    }

    pub fn is_root(self) -> bool {
        Self::ROOT == self
    }

    pub fn parent(self) -> Option<NodeKey> {
        if self.is_root() {
            None
        } else {
            Some(NodeKey(self.0 >> 3))
        }
    }

    /// The octant this node occupies inside its parent
    pub fn octant(self) -> Option<AxisMask> {
        if self.is_root() {
            None
        } else {
            Some(AxisMask::new(self.0 as u8))
        }
    }

    /// Every node above this one, starting from the parent up until the root
    pub fn ancestors(self) -> impl Iterator<Item = NodeKey> {
        std::iter::successors(self.parent(), |key| key.parent())
    }

    /// The octant selections leading from the root to this node
    pub fn path(self) -> impl Iterator<Item = AxisMask> {
        let raw = self.0;
        (0..self.depth() as u32)
            .rev()
            .map(move |level| AxisMask::new((raw >> (3 * level)) as u8))
    }

    /// True if the given node is inside the subtree of this node, itself excluded
    pub fn is_ancestor_of(self, other: NodeKey) -> bool {
        let depth = self.depth();
        let other_depth = other.depth();
        depth < other_depth && (other.0 >> (3 * (other_depth - depth) as u32)) == self.0
    }

    /// Center and half extent of the node inside the normalized space of the octree,
    /// where the root is centered at the origin with half extent 1
    pub fn local_bounds(self) -> (V3c<f32>, f32) {
        let mut center = V3c::unit(0.);
        let mut half_extent = 1.;
        for octant in self.path() {
            half_extent /= 2.;
            center += octant_offset(octant) * half_extent;
        }
        (center, half_extent)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#b}", self.0)
    }
}

impl From<NodeKey> for u64 {
    fn from(key: NodeKey) -> u64 {
        key.0
    }
}
