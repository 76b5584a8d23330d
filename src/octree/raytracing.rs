
use crate::{
    octree::{NodeKey, Octree},
    spatial::{
        math::{
            axis_plane_intersection, octant_offset, sign_mask, sort_mask_by_maximum,
            sort_mask_by_minimum, vector::V3c, AxisMask,
        },
        raytracing::{clip_segment, Ray},
        BoundingBox,
    },
};
use std::collections::HashSet;

///####################################################################################
/// Occupancy
///####################################################################################
/// Tells whether there is anything stored at a node or inside its subtree
/// Raytracing skips every node for which this is false, together with its whole subtree.
pub trait Occupancy {
    fn exists(&self, key: NodeKey) -> bool;
}

/// Occupancy without any pruning: every node intersected by the ray is visited
#[derive(Debug, Default, Clone, Copy)]
pub struct Everywhere;

impl Occupancy for Everywhere {
    fn exists(&self, _key: NodeKey) -> bool {
        true
    }
}

impl Occupancy for HashSet<NodeKey> {
    fn exists(&self, key: NodeKey) -> bool {
        self.contains(&key)
    }
}

impl<T> Occupancy for Octree<T> {
    fn exists(&self, key: NodeKey) -> bool {
        Octree::<T>::exists(self, key)
    }
}

impl<F: Fn(NodeKey) -> bool> Occupancy for F {
    fn exists(&self, key: NodeKey) -> bool {
        self(key)
    }
}

///####################################################################################
/// Traversal state
///####################################################################################
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TraversalOrder {
    /// Nodes are visited in the order the ray passes through them
    #[default]
    FrontToBack,

    /// Nodes are visited in the order a ray in the opposite direction would pass through them
    BackToFront,
}

/// One node intersected by a ray, with the parameter range of the ray inside it
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct NodeVisit {
    pub key: NodeKey,
    pub depth: u8,
    pub t_in: f32,
    pub t_out: f32,
}

/// A pending node visit; never changed after it is pushed
#[derive(Debug, Clone, Copy)]
pub(crate) struct StackFrame {
    pub(crate) key: NodeKey,
    pub(crate) depth: u8,
    pub(crate) t_in: f32,
    pub(crate) t_out: f32,
    pub(crate) center: V3c<f32>, // in the normalized space of the octree
}

/// Stack of pending node visits, owned by a single traversal
/// Can be taken back from a finished traversal to save allocations in the next one.
#[derive(Debug, Default, Clone)]
pub struct TraversalStack {
    frames: Vec<StackFrame>,
}

impl TraversalStack {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            frames: Vec::with_capacity(capacity),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn clear(&mut self) {
        self.frames.clear();
    }

    pub(crate) fn push(&mut self, frame: StackFrame) {
        self.frames.push(frame);
    }

    pub(crate) fn pop(&mut self) -> Option<StackFrame> {
        self.frames.pop()
    }
}

///####################################################################################
/// Raymarch
///####################################################################################
/// Lazily visits the nodes intersected by a ray, always descending into the next intersected
/// child before its siblings, so the sequence of nodes on any level follows the given order.
/// Stopping the iteration early is a valid way to cancel the traversal.
pub struct Raymarch<'a, O: Occupancy + ?Sized> {
    occupancy: &'a O,
    stack: TraversalStack,
    max_depth: u8,
    order: TraversalOrder,
    origin: V3c<f32>,       // segment start in normalized space
    displacement: V3c<f32>, // segment end - segment start in normalized space
    visited: usize,
    truncated: usize,
}

impl<'a, O: Occupancy + ?Sized> Raymarch<'a, O> {
    /// Prepares the traversal of the given ray segment through the octree described by `bounds`
    /// `bounds` must not be degenerate and `max_depth` must fit into `NodeKey`,
    /// which is guaranteed by the construction of `Octree`.
    pub(crate) fn new(
        bounds: &BoundingBox,
        max_depth: u8,
        order: TraversalOrder,
        occupancy: &'a O,
        ray: &Ray,
        mut stack: TraversalStack,
    ) -> Self {
        debug_assert!(!bounds.is_degenerate());
        debug_assert!(max_depth <= NodeKey::MAX_DEPTH);

        let local_space = bounds.local_normalized_space_matrix();
        let mut a: V3c<f32> = local_space.transform_point(&ray.point_at(0.).into()).into();
        let mut b: V3c<f32> = local_space.transform_point(&ray.point_at(1.).into()).into();
        if TraversalOrder::BackToFront == order {
            std::mem::swap(&mut a, &mut b);
        }

        stack.clear();
        let mut raymarch = Self {
            occupancy,
            stack,
            max_depth,
            order,
            origin: a,
            displacement: b - a,
            visited: 0,
            truncated: 0,
        };

        if let Some((t_in, t_out)) =
            clip_segment(&a, &raymarch.displacement, &V3c::unit(-1.), &V3c::unit(1.))
        {
            if occupancy.exists(NodeKey::ROOT) {
                raymarch.stack.push(StackFrame {
                    key: NodeKey::ROOT,
                    depth: 0,
                    t_in,
                    t_out,
                    center: V3c::unit(0.),
                });
            }
        }
        raymarch
    }

    /// Number of nodes visited so far
    pub fn visited(&self) -> usize {
        self.visited
    }

    /// Number of visited nodes at the maximum depth which still had occupied nodes below them
    pub fn truncated(&self) -> usize {
        self.truncated
    }

    /// Gives back the stack used during the traversal, so it can be reused in another one
    pub fn into_stack(self) -> TraversalStack {
        self.stack
    }

    fn point_at(&self, t: f32) -> V3c<f32> {
        self.origin + self.displacement * t
    }

    /// Classifies the given point on the segment against the splitting planes through `center`
    /// A set bit means the point is in the upper half of the node on that axis.
    /// Points exactly on a plane are assigned to the side the segment continues in
    /// when `entering`, or the side it arrived from otherwise.
    fn side_of_planes(&self, center: &V3c<f32>, point: &V3c<f32>, entering: bool) -> AxisMask {
        let offset = *point - *center;
        let upper_or_on_plane = !sign_mask(&offset);
        let on_plane = upper_or_on_plane & !sign_mask(&-offset);
        let resolved_to_lower = if entering {
            sign_mask(&self.displacement)
        } else {
            sign_mask(&-self.displacement)
        };
        upper_or_on_plane & !(on_plane & resolved_to_lower)
    }

    /// Parameter where the segment crosses the splitting plane on one axis, kept inside the frame
    fn plane_crossing(
        &self,
        frame: &StackFrame,
        center: f32,
        origin: f32,
        displacement: f32,
    ) -> f32 {
        axis_plane_intersection(center, origin, displacement)
            .unwrap_or(frame.t_in)
            .clamp(frame.t_in, frame.t_out)
    }

    fn push_child(&mut self, parent: &StackFrame, octant: AxisMask, t_in: f32, t_out: f32) {
        if t_out <= t_in {
            // The child is only touched in a single point
            return;
        }
        let key = parent.key.append(octant);
        if !self.occupancy.exists(key) {
            return;
        }
        let child_half_extent = 0.5_f32.powi(parent.depth as i32 + 1);
        self.stack.push(StackFrame {
            key,
            depth: parent.depth + 1,
            t_in,
            t_out,
            center: parent.center + octant_offset(octant) * child_half_extent,
        });
    }

    /// Pushes the children of the node intersected by the segment, the last intersected one first
    fn push_children(&mut self, frame: &StackFrame) {
        let p_in = self.point_at(frame.t_in);
        let p_out = self.point_at(frame.t_out);
        let entry_octant = self.side_of_planes(&frame.center, &p_in, true);
        let exit_octant = self.side_of_planes(&frame.center, &p_out, false);
        let crossed_planes = entry_octant ^ exit_octant;

        let mut t = V3c::unit(f32::INFINITY);
        if crossed_planes.contains(AxisMask::X) {
            t.x = self.plane_crossing(frame, frame.center.x, self.origin.x, self.displacement.x);
        }
        if crossed_planes.contains(AxisMask::Y) {
            t.y = self.plane_crossing(frame, frame.center.y, self.origin.y, self.displacement.y);
        }
        if crossed_planes.contains(AxisMask::Z) {
            t.z = self.plane_crossing(frame, frame.center.z, self.origin.z, self.displacement.z);
        }

        let first_crossing = sort_mask_by_minimum(&t);
        let last_crossing = sort_mask_by_maximum(&t);
        let mut sorted_t = [t.x, t.y, t.z];
        sorted_t.sort_by(|a, b| a.total_cmp(b));

        match crossed_planes.count() {
            0 => {
                self.push_child(frame, entry_octant, frame.t_in, frame.t_out);
            }
            1 => {
                self.push_child(frame, exit_octant, sorted_t[0], frame.t_out);
                self.push_child(frame, entry_octant, frame.t_in, sorted_t[0]);
            }
            2 => {
                self.push_child(frame, exit_octant, sorted_t[1], frame.t_out);
                self.push_child(
                    frame,
                    entry_octant ^ first_crossing,
                    sorted_t[0],
                    sorted_t[1],
                );
                self.push_child(frame, entry_octant, frame.t_in, sorted_t[0]);
            }
            _ => {
                self.push_child(frame, exit_octant, sorted_t[2], frame.t_out);
                self.push_child(
                    frame,
                    exit_octant ^ last_crossing,
                    sorted_t[1],
                    sorted_t[2],
                );
                self.push_child(
                    frame,
                    entry_octant ^ first_crossing,
                    sorted_t[0],
                    sorted_t[1],
                );
                self.push_child(frame, entry_octant, frame.t_in, sorted_t[0]);
            }
        }
    }

    fn has_occupied_children(&self, frame: &StackFrame) -> bool {
        frame.depth < NodeKey::MAX_DEPTH
            && AxisMask::octants().any(|octant| self.occupancy.exists(frame.key.append(octant)))
    }
}

impl<O: Occupancy + ?Sized> Iterator for Raymarch<'_, O> {
    type Item = NodeVisit;

    fn next(&mut self) -> Option<NodeVisit> {
        let frame = self.stack.pop()?;

        if frame.depth < self.max_depth {
            self.push_children(&frame);
        } else if self.has_occupied_children(&frame) {
            self.truncated += 1;
            log::trace!(
                "Raymarch stopped at node {} on the maximum depth {}",
                frame.key,
                self.max_depth
            );
        }

        self.visited += 1;
        if self.stack.is_empty() {
            log::debug!(
                "Raymarch finished with {} visits, {} truncated",
                self.visited,
                self.truncated
            );
        }

        Some(match self.order {
            TraversalOrder::FrontToBack => NodeVisit {
                key: frame.key,
                depth: frame.depth,
                t_in: frame.t_in,
                t_out: frame.t_out,
            },
            TraversalOrder::BackToFront => NodeVisit {
                key: frame.key,
                depth: frame.depth,
                t_in: 1. - frame.t_out,
                t_out: 1. - frame.t_in,
            },
        })
    }
}

///####################################################################################
/// Octree
///####################################################################################
static EVERYWHERE: Everywhere = Everywhere;

impl<T> Octree<T> {
    /// Visits the occupied nodes intersected by the ray segment `origin + t * direction`, t in [0, 1],
    /// front to back. Nodes without any payload in their subtree are skipped.
    pub fn raymarch(&self, ray: &Ray) -> Raymarch<'_, Self> {
        self.raymarch_ordered(ray, TraversalOrder::FrontToBack)
    }

    /// Visits the occupied nodes intersected by the ray segment in the given order
    pub fn raymarch_ordered(&self, ray: &Ray, order: TraversalOrder) -> Raymarch<'_, Self> {
        self.raymarch_with(ray, order, self, TraversalStack::default())
    }

    /// Visits every node intersected by the ray segment down to the maximum depth, regardless of payloads
    pub fn raymarch_geometric(&self, ray: &Ray) -> Raymarch<'static, Everywhere> {
        Raymarch::new(
            &self.bounds,
            self.max_depth,
            TraversalOrder::FrontToBack,
            &EVERYWHERE,
            ray,
            TraversalStack::default(),
        )
    }

    /// Visits the nodes intersected by the ray segment, skipping the ones the given occupancy
    /// rejects, reusing the given stack
    pub fn raymarch_with<'a, O: Occupancy + ?Sized>(
        &self,
        ray: &Ray,
        order: TraversalOrder,
        occupancy: &'a O,
        stack: TraversalStack,
    ) -> Raymarch<'a, O> {
        Raymarch::new(&self.bounds, self.max_depth, order, occupancy, ray, stack)
    }

    /// Provides the payload stored in the first node intersected by the ray which has one
    /// Nodes entered at the same point of the ray are resolved to the deepest one.
    pub fn get_by_ray(&self, ray: &Ray) -> Option<(&T, NodeVisit)> {
        let mut best: Option<(&T, NodeVisit)> = None;
        // entry parameters are non-decreasing during the traversal
        for visit in self.raymarch(ray) {
            if let Some((_, hit)) = &best {
                if visit.t_in > hit.t_in {
                    break;
                }
            }
            if let Some(data) = self.get(visit.key) {
                best = Some((data, visit));
            }
        }
        best
    }
}
