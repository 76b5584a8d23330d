mod tests;
pub mod vector;

use crate::spatial::math::vector::V3c;
use std::ops::{BitAnd, BitOr, BitXor, Not};

///####################################################################################
/// AxisMask
///####################################################################################
/// One bit for each coordinate axis
/// Used both as a per-axis classification of a point against the splitting planes of a node,
/// and as an octant selector, where a set bit means the upper half of the node on that axis.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct AxisMask(u8);

impl AxisMask {
    pub const NONE: AxisMask = AxisMask(0b000);
    pub const X: AxisMask = AxisMask(0b001);
    pub const Y: AxisMask = AxisMask(0b010);
    pub const Z: AxisMask = AxisMask(0b100);
    pub const ALL: AxisMask = AxisMask(0b111);

    /// Creates a mask from the lowest 3 bits of the given value, the rest is discarded
    pub const fn new(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True if every bit set in `other` is also set in `self`
    pub fn contains(self, other: AxisMask) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn is_empty(self) -> bool {
        0 == self.0
    }

    /// Number of axes set in the mask
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Iterates over the octants ordered by their numeric value
    pub fn octants() -> impl Iterator<Item = AxisMask> {
        (0..8).map(AxisMask::new)
    }
}

impl BitXor for AxisMask {
    type Output = AxisMask;
    fn bitxor(self, other: AxisMask) -> AxisMask {
        AxisMask(self.0 ^ other.0)
    }
}

impl BitAnd for AxisMask {
    type Output = AxisMask;
    fn bitand(self, other: AxisMask) -> AxisMask {
        AxisMask(self.0 & other.0)
    }
}

impl BitOr for AxisMask {
    type Output = AxisMask;
    fn bitor(self, other: AxisMask) -> AxisMask {
        AxisMask(self.0 | other.0)
    }
}

impl Not for AxisMask {
    type Output = AxisMask;
    fn not(self) -> AxisMask {
        AxisMask::new(!self.0)
    }
}

impl From<AxisMask> for u8 {
    fn from(mask: AxisMask) -> u8 {
        mask.0
    }
}

///####################################################################################
/// Classification
///####################################################################################
/// Sets the bit for every axis where the given component is negative
pub fn sign_mask(v: &V3c<f32>) -> AxisMask {
    let mut mask = AxisMask::NONE;
    if v.x < 0. {
        mask = mask | AxisMask::X;
    }
    if v.y < 0. {
        mask = mask | AxisMask::Y;
    }
    if v.z < 0. {
        mask = mask | AxisMask::Z;
    }
    mask
}

/// Sets the bit for every axis where the given component equals the minimum of the components
/// Ties set multiple bits
pub fn sort_mask_by_minimum(v: &V3c<f32>) -> AxisMask {
    let minimum = v.min_component();
    let mut mask = AxisMask::NONE;
    if v.x == minimum {
        mask = mask | AxisMask::X;
    }
    if v.y == minimum {
        mask = mask | AxisMask::Y;
    }
    if v.z == minimum {
        mask = mask | AxisMask::Z;
    }
    mask
}

/// Sets the bit for every axis where the given component equals the maximum of the components
/// Ties set multiple bits
pub fn sort_mask_by_maximum(v: &V3c<f32>) -> AxisMask {
    let maximum = v.max_component();
    let mut mask = AxisMask::NONE;
    if v.x == maximum {
        mask = mask | AxisMask::X;
    }
    if v.y == maximum {
        mask = mask | AxisMask::Y;
    }
    if v.z == maximum {
        mask = mask | AxisMask::Z;
    }
    mask
}

///####################################################################################
/// Octant
///####################################################################################
/// Direction of the given octant from the center of its parent, each component is either -1 or 1
pub(crate) fn octant_offset(octant: AxisMask) -> V3c<f32> {
    V3c::new(
        if octant.contains(AxisMask::X) { 1. } else { -1. },
        if octant.contains(AxisMask::Y) { 1. } else { -1. },
        if octant.contains(AxisMask::Z) { 1. } else { -1. },
    )
}

/// The octant of a node centered at `center` which contains the given point
/// Points on a splitting plane belong to the upper half
pub(crate) fn octant_at(center: &V3c<f32>, point: &V3c<f32>) -> AxisMask {
    !sign_mask(&(*point - *center))
}

/// Parameter of the point where the line `origin + t * displacement` crosses the plane
/// perpendicular to one axis at `plane_coordinate`, all values taken on that axis
/// Returns with None if the line is parallel to the plane
pub fn axis_plane_intersection(
    plane_coordinate: f32,
    line_origin: f32,
    line_displacement: f32,
) -> Option<f32> {
    if 0. == line_displacement {
        return None;
    }
    Some((plane_coordinate - line_origin) / line_displacement)
}
