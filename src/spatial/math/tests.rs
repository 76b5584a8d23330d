#[cfg(test)]
mod vector_tests {
    use crate::spatial::math::vector::V3c;

    #[test]
    fn test_cross_product() {
        let a = V3c::new(3., 0., 2.);
        let b = V3c::new(-1., 4., 2.);
        let cross = a.cross(b);
        assert!(cross.x == -8.);
        assert!(cross.y == -8.);
        assert!(cross.z == 12.);
    }

    #[test]
    fn test_min_max_component() {
        let v: V3c<f32> = V3c::new(4., -3., 1.);
        assert_eq!(v.min_component(), -3.);
        assert_eq!(v.max_component(), 4.);
    }
}

#[cfg(test)]
mod axis_mask_tests {
    use crate::spatial::math::{
        octant_at, octant_offset, sign_mask, sort_mask_by_maximum, sort_mask_by_minimum,
        vector::V3c, AxisMask,
    };

    #[test]
    fn test_sign_mask() {
        assert_eq!(sign_mask(&V3c::new(1., 1., 1.)), AxisMask::NONE);
        assert_eq!(sign_mask(&V3c::new(-1., 1., 1.)), AxisMask::X);
        assert_eq!(sign_mask(&V3c::new(1., -1., 1.)), AxisMask::Y);
        assert_eq!(sign_mask(&V3c::new(1., 1., -0.5)), AxisMask::Z);
        assert_eq!(sign_mask(&V3c::new(-1., -1., -1.)), AxisMask::ALL);

        // zero is not negative
        assert_eq!(sign_mask(&V3c::new(0., -0., 0.)), AxisMask::NONE);
    }

    #[test]
    fn test_sort_masks_without_ties() {
        let t = V3c::new(0.5, 0.1, 0.9);
        assert_eq!(sort_mask_by_minimum(&t), AxisMask::Y);
        assert_eq!(sort_mask_by_maximum(&t), AxisMask::Z);
    }

    #[test]
    fn test_sort_masks_with_ties() {
        let t = V3c::new(0.5, 0.5, 0.9);
        assert_eq!(sort_mask_by_minimum(&t), AxisMask::X | AxisMask::Y);
        assert_eq!(sort_mask_by_maximum(&t), AxisMask::Z);

        let t = V3c::unit(0.3);
        assert_eq!(sort_mask_by_minimum(&t), AxisMask::ALL);
        assert_eq!(sort_mask_by_maximum(&t), AxisMask::ALL);
    }

    #[test]
    fn test_sort_masks_ignore_unreachable_values() {
        let t = V3c::new(f32::INFINITY, 0.25, f32::INFINITY);
        assert_eq!(sort_mask_by_minimum(&t), AxisMask::Y);
        assert_eq!(sort_mask_by_maximum(&t), AxisMask::X | AxisMask::Z);
    }

    #[test]
    fn test_mask_operators() {
        assert_eq!(AxisMask::X ^ AxisMask::ALL, AxisMask::Y | AxisMask::Z);
        assert_eq!(AxisMask::ALL & AxisMask::Z, AxisMask::Z);
        assert_eq!(!AxisMask::X, AxisMask::Y | AxisMask::Z);
        assert_eq!(AxisMask::new(0xFF), AxisMask::ALL);
        assert_eq!((AxisMask::X | AxisMask::Z).count(), 2);
        assert!(AxisMask::ALL.contains(AxisMask::Y));
        assert!(!AxisMask::X.contains(AxisMask::Y));
        assert!(AxisMask::NONE.is_empty());
        assert_eq!(AxisMask::octants().count(), 8);
    }

    #[test]
    fn test_octant_offset() {
        assert_eq!(octant_offset(AxisMask::NONE), V3c::unit(-1.));
        assert_eq!(octant_offset(AxisMask::ALL), V3c::unit(1.));
        assert_eq!(octant_offset(AxisMask::Y), V3c::new(-1., 1., -1.));
    }

    #[test]
    fn test_octant_at() {
        let center = V3c::new(0.5, -0.5, 0.5);
        assert_eq!(octant_at(&center, &V3c::new(0.75, -0.75, 0.25)), AxisMask::X);
        assert_eq!(octant_at(&center, &V3c::new(0.25, -0.25, 0.75)), AxisMask::Y | AxisMask::Z);
        // points on the splitting planes belong to the upper half
        assert_eq!(octant_at(&center, &center), AxisMask::ALL);
    }
}

#[cfg(test)]
mod intersection_tests {
    use crate::spatial::math::axis_plane_intersection;

    #[test]
    fn test_axis_plane_intersection() {
        assert_eq!(axis_plane_intersection(0., -1., 2.), Some(0.5));
        assert_eq!(axis_plane_intersection(0.5, 1., -1.), Some(0.5));
        assert_eq!(axis_plane_intersection(0., 1., 0.), None);
    }
}
