//! View frustum for culling
//!
//! Extracts frustum planes from the view-projection matrix and provides
//! intersection tests for points, spheres and axis-aligned boxes.

use glam::{Mat4, Vec3, Vec4};

/// Planes whose squared normal length falls below this are left
/// unnormalized. Real far planes can be as short as `2n / (f - n)`, so only
/// vanishing normals qualify.
const MIN_NORMAL_LENGTH_SQUARED: f32 = f32::EPSILON * f32::EPSILON;

/// A plane in 3D space, represented as (normal.x, normal.y, normal.z, distance)
/// where the plane equation is: ax + by + cz + d = 0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Normal pointing into the positive half-space.
    pub normal: Vec3,
    /// Signed distance from origin (`n · p + d = 0`).
    pub distance: f32,
}

impl Plane {
    /// Create a plane from `(a, b, c, d)` coefficients and normalize it.
    ///
    /// Near-degenerate normals are kept as they are instead of dividing by a
    /// vanishing length.
    #[must_use]
    pub fn from_coefficients(coefficients: Vec4) -> Self {
        let normal = coefficients.truncate();
        let length_squared = normal.length_squared();
        if length_squared > MIN_NORMAL_LENGTH_SQUARED {
            let inv_length = length_squared.sqrt().recip();
            Self {
                normal: normal * inv_length,
                distance: coefficients.w * inv_length,
            }
        } else {
            Self {
                normal,
                distance: coefficients.w,
            }
        }
    }

    /// Signed distance from point to plane (positive = in front, negative =
    /// behind)
    #[inline]
    #[must_use]
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

/// Index of each plane within [`Frustum::planes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrustumPlane {
    /// `x <= w` in clip space.
    Right = 0,
    /// `x >= -w` in clip space.
    Left = 1,
    /// `y >= -w` in clip space.
    Bottom = 2,
    /// `y <= w` in clip space.
    Top = 3,
    /// `z <= w` in clip space.
    Far = 4,
    /// `z >= -w` in clip space.
    Near = 5,
}

/// View frustum consisting of 6 planes
#[derive(Debug, Clone, PartialEq)]
pub struct Frustum {
    /// Six clipping planes: right, left, bottom, top, far, near.
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extract frustum planes from a view-projection matrix.
    /// Uses the Gribb/Hartmann method for plane extraction.
    /// Planes point inward (positive half-space is inside the frustum).
    #[must_use]
    pub fn from_view_projection(vp: Mat4) -> Self {
        let row0 = vp.row(0);
        let row1 = vp.row(1);
        let row2 = vp.row(2);
        let row3 = vp.row(3);

        // OpenGL clip space: every coordinate lies in [-w, w]
        Self {
            planes: [
                Plane::from_coefficients(row3 - row0),
                Plane::from_coefficients(row3 + row0),
                Plane::from_coefficients(row3 + row1),
                Plane::from_coefficients(row3 - row1),
                Plane::from_coefficients(row3 - row2),
                Plane::from_coefficients(row3 + row2),
            ],
        }
    }

    /// One plane by name.
    #[must_use]
    pub fn plane(&self, which: FrustumPlane) -> Plane {
        self.planes[which as usize]
    }

    /// Test if a point is inside the frustum
    #[inline]
    #[must_use]
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(point) >= 0.0)
    }

    /// Test if a sphere intersects or is inside the frustum
    #[inline]
    #[must_use]
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(center) >= -radius)
    }

    /// Test if an axis-aligned box intersects or is inside the frustum.
    ///
    /// For each plane the corner furthest along the normal is tested; the
    /// box is rejected as soon as that corner is behind a plane. Boxes near
    /// frustum edges may be accepted without touching the frustum.
    #[must_use]
    pub fn intersects_aabb(&self, min: Vec3, max: Vec3) -> bool {
        self.planes.iter().all(|plane| {
            let positive =
                Vec3::select(plane.normal.cmpge(Vec3::ZERO), max, min);
            plane.distance_to_point(positive) >= 0.0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;

    fn looking_down_negative_z() -> Frustum {
        let proj =
            Mat4::perspective_rh_gl(45.0_f32.to_radians(), 1.0, 0.1, 100.0);
        let view =
            Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        Frustum::from_view_projection(proj * view)
    }

    #[test]
    fn test_frustum_contains_origin() {
        let frustum = looking_down_negative_z();

        // Origin should be inside the frustum
        assert!(frustum.contains_point(Vec3::ZERO));

        // Point far behind camera should be outside
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, 20.0)));

        // Beyond the far plane
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, -200.0)));
    }

    #[test]
    fn test_planes_are_normalized_and_ordered() {
        let frustum = looking_down_negative_z();
        for plane in &frustum.planes {
            assert!((plane.normal.length() - 1.0).abs() < 1e-4);
        }
        // Near plane faces away from the eye, far plane toward it
        assert!(frustum.plane(FrustumPlane::Near).normal.z < -0.99);
        assert!(frustum.plane(FrustumPlane::Far).normal.z > 0.99);
        // Near plane sits 0.1 in front of the eye at z = 10
        let near = frustum.plane(FrustumPlane::Near);
        assert!(near.distance_to_point(Vec3::new(0.0, 0.0, 9.9)).abs() < 1e-3);
    }

    #[test]
    fn test_sphere_intersection() {
        let frustum = looking_down_negative_z();

        // Sphere at origin should intersect
        assert!(frustum.intersects_sphere(Vec3::ZERO, 1.0));

        // Large sphere behind camera that doesn't reach frustum
        assert!(!frustum.intersects_sphere(Vec3::new(0.0, 0.0, 50.0), 1.0));

        // Centre just outside the left plane, radius reaching back in
        assert!(frustum.intersects_sphere(Vec3::new(-5.0, 0.0, 0.0), 2.0));
    }

    #[test]
    fn test_aabb_intersection() {
        let frustum = looking_down_negative_z();

        assert!(frustum.intersects_aabb(Vec3::splat(-1.0), Vec3::splat(1.0)));

        // Straddling the near plane still counts
        assert!(frustum.intersects_aabb(
            Vec3::new(-1.0, -1.0, 8.0),
            Vec3::new(1.0, 1.0, 12.0)
        ));

        // Entirely behind the eye
        assert!(!frustum.intersects_aabb(
            Vec3::new(-1.0, -1.0, 11.0),
            Vec3::new(1.0, 1.0, 13.0)
        ));

        // Far off to the side
        assert!(!frustum.intersects_aabb(
            Vec3::new(50.0, -1.0, -1.0),
            Vec3::new(52.0, 1.0, 1.0)
        ));
    }

    #[test]
    fn test_degenerate_plane_is_not_normalized() {
        let plane = Plane::from_coefficients(Vec4::new(1e-8, 0.0, 0.0, 0.5));
        assert_eq!(plane.normal, Vec3::new(1e-8, 0.0, 0.0));
        assert_eq!(plane.distance, 0.5);

        // Short but real normals are still normalized
        let plane = Plane::from_coefficients(Vec4::new(0.0, 0.0, 2e-4, 0.2));
        assert!((plane.normal.length() - 1.0).abs() < 1e-6);
        assert!((plane.distance - 1000.0).abs() < 0.1);
    }

    /// A point `ahead` units down the default camera's view, shifted by
    /// `side` along its right axis and `lift` along its up axis.
    fn in_view_of(camera: &Camera, ahead: f32, side: f32, lift: f32) -> Vec3 {
        let spatial = camera.spatial();
        camera.eye_position()
            + spatial.forward() * ahead
            + spatial.right() * side
            + spatial.up() * lift
    }

    #[test]
    fn test_default_lens_planes_are_normalized() {
        let camera = Camera::default();
        let frustum = camera.extract_frustum();
        for plane in &frustum.planes {
            assert!((plane.normal.length() - 1.0).abs() < 1e-4);
        }

        // Far plane sits `far` ahead of the eye
        let far = frustum.plane(FrustumPlane::Far);
        let on_far = in_view_of(&camera, camera.far_plane(), 0.0, 0.0);
        assert!(far.distance_to_point(on_far).abs() < 1.0);
    }

    #[test]
    fn test_default_lens_culls_past_each_plane() {
        let camera = Camera::default();
        let frustum = camera.extract_frustum();
        let half_fov = camera.field_of_view().to_radians() / 2.0;
        let half_height = 10.0 * half_fov.tan();
        let half_width = half_height * camera.aspect_ratio();

        let outside = [
            (FrustumPlane::Right, in_view_of(&camera, 10.0, 50.0, 0.0)),
            (FrustumPlane::Left, in_view_of(&camera, 10.0, -50.0, 0.0)),
            (FrustumPlane::Bottom, in_view_of(&camera, 10.0, 0.0, -50.0)),
            (FrustumPlane::Top, in_view_of(&camera, 10.0, 0.0, 50.0)),
            (FrustumPlane::Far, in_view_of(&camera, 1500.0, 0.0, 0.0)),
            (FrustumPlane::Near, in_view_of(&camera, 0.05, 0.0, 0.0)),
        ];
        for (which, center) in outside {
            assert!(
                frustum.plane(which).distance_to_point(center) < -0.02,
                "{which:?} should reject {center}"
            );
            assert!(
                !frustum.intersects_sphere(center, 0.01),
                "sphere past {which:?} reported visible"
            );
            let half = Vec3::splat(0.01);
            assert!(
                !frustum.intersects_aabb(center - half, center + half),
                "box past {which:?} reported visible"
            );
        }

        let inside = [
            in_view_of(&camera, 10.0, 0.0, 0.0),
            in_view_of(&camera, 999.0, 0.0, 0.0),
            // Centres just outside the side planes with radius reaching in
            in_view_of(&camera, 10.0, half_width + 0.5, 0.0),
            in_view_of(&camera, 10.0, 0.0, -(half_height + 0.5)),
        ];
        for center in inside {
            assert!(frustum.intersects_sphere(center, 1.0), "{center}");
            let half = Vec3::ONE;
            assert!(frustum.intersects_aabb(center - half, center + half));
        }
    }
}
