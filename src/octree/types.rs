use crate::octree::NodeKey;
use crate::spatial::{math::vector::V3c, BoundingBox};
use std::collections::HashMap;
use std::error::Error;

/// error types during usage or creation of the octree
#[derive(Debug, thiserror::Error)]
pub enum OctreeError {
    #[error("Bounding box with min {min:?} and max {max:?} has no volume")]
    DegenerateBounds { min: V3c<f32>, max: V3c<f32> },

    #[error("Depth {requested} is not supported; it must be between 1 and {supported}")]
    InvalidDepth { requested: u8, supported: u8 },

    #[error("Node {key} at depth {depth} is deeper than the maximum depth {max_depth}")]
    KeyBeyondMaxDepth { key: NodeKey, depth: u8, max_depth: u8 },

    #[error("Position ({x}, {y}, {z}) is outside of the octree bounds")]
    InvalidPosition { x: f32, y: f32, z: f32 },

    #[error("Invalid structure: {0}")]
    InvalidStructure(Box<dyn Error + Send + Sync>),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Sparse Octree over an axis aligned box, storing payloads at arbitrary nodes
/// Nodes are identified by their path encoded `NodeKey`; a node without payload takes no space.
/// For every node the number of payloads inside its subtree is also tracked,
/// so empty subtrees can be skipped during raytracing.
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Octree<T> {
    pub(crate) bounds: BoundingBox,
    pub(crate) max_depth: u8,
    pub(crate) payloads: HashMap<NodeKey, T>,
    pub(crate) occupancy: HashMap<NodeKey, u32>, // payload count in the subtree of each occupied node
}
