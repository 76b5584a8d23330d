pub mod key;
pub mod raytracing;
pub mod types;


pub use crate::octree::{
    key::NodeKey,
    raytracing::{Everywhere, NodeVisit, Occupancy, Raymarch, TraversalOrder, TraversalStack},
    types::{Octree, OctreeError},
};
pub use crate::spatial::{
    math::{vector::V3c, AxisMask},
    raytracing::Ray,
    BoundingBox,
};

use crate::spatial::math::{octant_at, octant_offset};
use std::collections::HashMap;

impl<T> Octree<T> {
    /// Creates an empty octree over the given bounds, able to store payloads down to `max_depth`
    /// * `bounds` - The world space region covered by the root node, must have a volume
    /// * `max_depth` - The deepest level of nodes, limited by the width of `NodeKey`
    pub fn new(bounds: BoundingBox, max_depth: u8) -> Result<Self, OctreeError> {
        if bounds.is_degenerate() {
            return Err(OctreeError::DegenerateBounds {
                min: bounds.min,
                max: bounds.max,
            });
        }
        if 0 == max_depth || max_depth > NodeKey::MAX_DEPTH {
            return Err(OctreeError::InvalidDepth {
                requested: max_depth,
                supported: NodeKey::MAX_DEPTH,
            });
        }
        debug_assert!(3 * max_depth as u32 + 1 <= NodeKey::BITS);
        log::debug!(
            "Creating octree over {:?}..{:?} with depth {}",
            bounds.min,
            bounds.max,
            max_depth
        );
        Ok(Self {
            bounds,
            max_depth,
            payloads: HashMap::new(),
            occupancy: HashMap::new(),
        })
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }

    /// Number of payloads stored
    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    /// Provides the key of the node at `depth` which contains the given world space position
    /// Positions on the boundary between nodes belong to the upper node on each axis
    pub fn key_at(&self, position: &V3c<f32>, depth: u8) -> Result<NodeKey, OctreeError> {
        if depth > self.max_depth {
            return Err(OctreeError::InvalidDepth {
                requested: depth,
                supported: self.max_depth,
            });
        }
        if !self.bounds.contains_point(position) {
            return Err(OctreeError::InvalidPosition {
                x: position.x,
                y: position.y,
                z: position.z,
            });
        }

        let local = self.bounds.to_local(position);
        let mut key = NodeKey::ROOT;
        let mut center = V3c::unit(0.);
        let mut half_extent = 1.;
        for _ in 0..depth {
            let octant = octant_at(&center, &local);
            half_extent /= 2.;
            center += octant_offset(octant) * half_extent;
            key = key.append(octant);
        }
        Ok(key)
    }

    /// Stores the given payload at the node, replacing the previous one if any
    pub fn insert(&mut self, key: NodeKey, data: T) -> Result<Option<T>, OctreeError> {
        if key.depth() > self.max_depth {
            return Err(OctreeError::KeyBeyondMaxDepth {
                key,
                depth: key.depth(),
                max_depth: self.max_depth,
            });
        }
        let previous = self.payloads.insert(key, data);
        if previous.is_none() {
            for node in std::iter::once(key).chain(key.ancestors()) {
                *self.occupancy.entry(node).or_insert(0) += 1;
            }
        }
        Ok(previous)
    }

    /// Stores the given payload in the node at `depth` containing the given world space position
    pub fn insert_at(
        &mut self,
        position: &V3c<f32>,
        depth: u8,
        data: T,
    ) -> Result<NodeKey, OctreeError> {
        let key = self.key_at(position, depth)?;
        self.insert(key, data)?;
        Ok(key)
    }

    /// Provides immutable reference to the payload stored at the node, if any
    pub fn get(&self, key: NodeKey) -> Option<&T> {
        self.payloads.get(&key)
    }

    /// Provides mutable reference to the payload stored at the node, if any
    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut T> {
        self.payloads.get_mut(&key)
    }

    /// True if there is a payload stored exactly at the given node
    pub fn contains(&self, key: NodeKey) -> bool {
        self.payloads.contains_key(&key)
    }

    /// True if there is any payload stored at the given node or inside its subtree
    pub fn exists(&self, key: NodeKey) -> bool {
        self.occupancy.contains_key(&key)
    }

    /// Removes the payload stored at the node, returning it if there was one
    pub fn remove(&mut self, key: NodeKey) -> Option<T> {
        let removed = self.payloads.remove(&key)?;
        for node in std::iter::once(key).chain(key.ancestors()) {
            if let Some(count) = self.occupancy.get_mut(&node) {
                *count -= 1;
                if 0 == *count {
                    self.occupancy.remove(&node);
                }
            }
        }
        Some(removed)
    }

    /// Removes every payload
    pub fn clear(&mut self) {
        self.payloads.clear();
        self.occupancy.clear();
    }

    /// Iterates over the stored payloads in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &T)> {
        self.payloads.iter().map(|(key, data)| (*key, data))
    }
}
