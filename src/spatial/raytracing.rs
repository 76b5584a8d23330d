use crate::spatial::{math::vector::V3c, BoundingBox};

/// A parametric ray segment: the traversed points are `origin + t * direction` for `t` in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Ray {
    pub origin: V3c<f32>,
    pub direction: V3c<f32>,
}

impl Ray {
    /// Creates a ray segment starting at `from` and ending at `to`
    pub fn between(from: V3c<f32>, to: V3c<f32>) -> Self {
        Self {
            origin: from,
            direction: to - from,
        }
    }

    /// True if the ray spans a non-zero, finite distance
    pub fn is_valid(&self) -> bool {
        let length = self.direction.length();
        length.is_finite() && 0. < length
    }

    pub fn point_at(&self, t: f32) -> V3c<f32> {
        self.origin + self.direction * t
    }
}

impl BoundingBox {
    /// Tells the parameter range of the ray segment which is inside the box
    /// Returns with None if the segment misses the box or only touches it in a single point
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, f32)> {
        clip_segment(&ray.origin, &ray.direction, &self.min, &self.max)
    }
}

/// Clips the parameter range [0, 1] of the line `origin + t * displacement`
/// to the axis aligned box described by its minimum and maximum corners
/// Returns with None for a zero displacement, as the segment is then a single point
/// https://gamedev.stackexchange.com/questions/18436/most-efficient-aabb-vs-ray-collision-algorithms
pub(crate) fn clip_segment(
    origin: &V3c<f32>,
    displacement: &V3c<f32>,
    min_corner: &V3c<f32>,
    max_corner: &V3c<f32>,
) -> Option<(f32, f32)> {
    if 0. == displacement.x && 0. == displacement.y && 0. == displacement.z {
        // a single point, which can at most touch the box
        return None;
    }
    let mut t_in = 0.0_f32;
    let mut t_out = 1.0_f32;
    for (o, d, min, max) in [
        (origin.x, displacement.x, min_corner.x, max_corner.x),
        (origin.y, displacement.y, min_corner.y, max_corner.y),
        (origin.z, displacement.z, min_corner.z, max_corner.z),
    ] {
        if 0. == d {
            // parallel to the slab, either always inside it or never
            if o < min || o > max {
                return None;
            }
            continue;
        }
        let t1 = (min - o) / d;
        let t2 = (max - o) / d;
        t_in = t_in.max(t1.min(t2));
        t_out = t_out.min(t1.max(t2));
    }

    if t_in < t_out {
        Some((t_in, t_out))
    } else {
        None
    }
}
