//! Affine transforms and the parent/child transform hierarchy.
//!
//! [`Transform`] is a plain local TRS value. [`TransformTree`] owns a set of
//! transforms, links them into a hierarchy, and lazily caches each node's
//! world matrix.

/// Arena-backed transform hierarchy with lazy world matrices.
pub mod tree;

use glam::{Mat3, Mat4, Quat, Vec3};

pub use tree::{TransformError, TransformId, TransformTree};

/// Forward axis in an object's local frame.
pub const WORLD_FORWARD: Vec3 = Vec3::NEG_Z;
/// Up axis in an object's local frame.
pub const WORLD_UP: Vec3 = Vec3::Y;
/// Right axis in an object's local frame.
pub const WORLD_RIGHT: Vec3 = Vec3::X;

/// Local position, rotation and scale.
///
/// The matrix form is `T * R * S`: scale first, then rotate, then translate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation.
    pub position: Vec3,
    /// Orientation.
    pub rotation: Quat,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a transform from its three components.
    #[must_use]
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Create a transform that only translates.
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Build the `T * R * S` matrix.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            self.rotation,
            self.position,
        )
    }

    /// Forward direction (`-Z` rotated).
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation * WORLD_FORWARD
    }

    /// Up direction (`+Y` rotated).
    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.rotation * WORLD_UP
    }

    /// Right direction (`+X` rotated).
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.rotation * WORLD_RIGHT
    }

    /// Rotate so that forward points from `position` at `target`.
    ///
    /// Returns `false` and leaves the rotation untouched when the direction
    /// is degenerate.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) -> bool {
        match look_rotation(target - self.position, up) {
            Some(rotation) => {
                self.rotation = rotation;
                true
            }
            None => false,
        }
    }
}

/// Rotation whose forward axis (`-Z`) points along `direction`.
///
/// The basis is `(right, up', -forward)` with `right = forward x up` and
/// `up' = right x forward`. Returns `None` when `direction` is zero or
/// parallel to `up`.
#[must_use]
pub fn look_rotation(direction: Vec3, up: Vec3) -> Option<Quat> {
    let forward = direction.try_normalize()?;
    let right = forward.cross(up).try_normalize()?;
    let up = right.cross(forward);
    let basis = Mat3::from_cols(right, up, -forward);
    Some(Quat::from_mat3(&basis).normalize())
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn identity_has_canonical_axes() {
        let t = Transform::default();
        assert_eq!(t.matrix(), Mat4::IDENTITY);
        assert_eq!(t.forward(), Vec3::NEG_Z);
        assert_eq!(t.up(), Vec3::Y);
        assert_eq!(t.right(), Vec3::X);
    }

    #[test]
    fn matrix_applies_scale_then_rotation_then_translation() {
        let t = Transform::new(
            Vec3::new(10.0, 0.0, 0.0),
            Quat::from_rotation_y(FRAC_PI_2),
            Vec3::splat(2.0),
        );
        // (1,0,0) -> scale (2,0,0) -> rotate about Y (0,0,-2) -> translate
        let p = t.matrix().transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::new(10.0, 0.0, -2.0), 1e-5));
    }

    #[test]
    fn look_at_points_forward_at_target() {
        let mut t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        let target = Vec3::new(4.0, 2.0, -1.0);
        assert!(t.look_at(target, WORLD_UP));
        let expected = (target - t.position).normalize();
        assert!(t.forward().abs_diff_eq(expected, 1e-5));
        // Right stays horizontal for a level target
        assert!(t.right().y.abs() < 1e-5);
    }

    #[test]
    fn look_at_rejects_degenerate_directions() {
        let mut t = Transform::default();
        assert!(!t.look_at(Vec3::ZERO, WORLD_UP));
        assert!(!t.look_at(Vec3::new(0.0, 5.0, 0.0), WORLD_UP));
        assert_eq!(t.rotation, Quat::IDENTITY);
    }
}
