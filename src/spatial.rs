pub mod math;
pub mod raytracing;

use crate::spatial::math::vector::V3c;
use nalgebra::{Matrix4, Vector3};

pub(crate) const FLOAT_ERROR_TOLERANCE: f32 = 0.00001;

/// Axis aligned box in world space, describing the region covered by an octree
#[derive(Default, Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct BoundingBox {
    pub min: V3c<f32>,
    pub max: V3c<f32>,
}

impl BoundingBox {
    pub fn new(min: V3c<f32>, max: V3c<f32>) -> Self {
        Self { min, max }
    }

    pub fn center(&self) -> V3c<f32> {
        (self.min + self.max) / 2.
    }

    /// Length of the box along each axis
    pub fn size(&self) -> V3c<f32> {
        self.max - self.min
    }

    /// True if the box has no volume, so it can not be mapped to the normalized space
    pub fn is_degenerate(&self) -> bool {
        let size = self.size();
        !(size.x > 0. && size.y > 0. && size.z > 0.)
            || !(size.x.is_finite() && size.y.is_finite() && size.z.is_finite())
    }

    /// Matrix mapping world space into the cube centered at the origin with half-extent 1 on each axis
    /// The box must not be degenerate, otherwise the resulting matrix is not invertible
    pub fn local_normalized_space_matrix(&self) -> Matrix4<f32> {
        let translation = Matrix4::new_translation(&Vector3::from(-self.center()));
        let axis_lengths = self.size();
        let scale = Matrix4::new_nonuniform_scaling(&Vector3::from(V3c::unit(2.0_f32) / axis_lengths));
        scale * translation
    }

    /// Transforms the given world space point into the normalized space of the box
    pub fn to_local(&self, point: &V3c<f32>) -> V3c<f32> {
        self.local_normalized_space_matrix()
            .transform_point(&(*point).into())
            .into()
    }

    /// Transforms the given point from the normalized space of the box back into world space
    pub fn to_world(&self, point: &V3c<f32>) -> V3c<f32> {
        self.center() + (*point * self.size()) / 2.
    }

    /// True if the given point is inside the box, edges included
    pub fn contains_point(&self, point: &V3c<f32>) -> bool {
        (point.x >= self.min.x - FLOAT_ERROR_TOLERANCE)
            && (point.x <= self.max.x + FLOAT_ERROR_TOLERANCE)
            && (point.y >= self.min.y - FLOAT_ERROR_TOLERANCE)
            && (point.y <= self.max.y + FLOAT_ERROR_TOLERANCE)
            && (point.z >= self.min.z - FLOAT_ERROR_TOLERANCE)
            && (point.z <= self.max.z + FLOAT_ERROR_TOLERANCE)
    }
}
