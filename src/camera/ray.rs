//! Screen-space picking rays.

use glam::{Vec2, Vec3, Vec4};

use super::core::Camera;

/// A half-line starting at `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Point `distance` units along the ray.
    #[must_use]
    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

impl Camera {
    /// World-space direction through a pixel.
    ///
    /// `screen_pos` is in pixels from the top-left corner. A non-positive
    /// `screen_size` yields the ray through the screen centre.
    #[must_use]
    pub fn screen_to_world(&self, screen_pos: Vec2, screen_size: Vec2) -> Vec3 {
        let ndc = if screen_size.x > 0.0 && screen_size.y > 0.0 {
            Vec2::new(
                2.0 * screen_pos.x / screen_size.x - 1.0,
                1.0 - 2.0 * screen_pos.y / screen_size.y,
            )
        } else {
            Vec2::ZERO
        };

        let clip = Vec4::new(ndc.x, ndc.y, -1.0, 1.0);
        let eye = self.projection_matrix().inverse() * clip;
        let eye = Vec4::new(eye.x, eye.y, -1.0, 0.0);
        let world = (self.view_matrix().inverse() * eye).truncate();
        world.normalize_or(self.forward())
    }

    /// Ray from the eye through a pixel.
    #[must_use]
    pub fn create_ray_from_screen(
        &self,
        screen_pos: Vec2,
        screen_size: Vec2,
    ) -> Ray {
        Ray {
            origin: self.eye_position(),
            direction: self.screen_to_world(screen_pos, screen_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::core::CameraMode;
    use crate::transform::WORLD_UP;

    const SCREEN: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn centre_pixel_looks_forward() {
        let camera = Camera::create_look_at(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::ZERO,
            WORLD_UP,
        );
        let direction = camera.screen_to_world(SCREEN * 0.5, SCREEN);
        assert!(direction.abs_diff_eq(camera.forward(), 1e-4));
        assert!((direction.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn corners_point_outward() {
        let camera = Camera::create_look_at(Vec3::ZERO, Vec3::NEG_Z, WORLD_UP);
        let top_left = camera.screen_to_world(Vec2::ZERO, SCREEN);
        assert!(top_left.x < 0.0 && top_left.y > 0.0 && top_left.z < 0.0);
        let bottom_right = camera.screen_to_world(SCREEN, SCREEN);
        assert!(bottom_right.x > 0.0 && bottom_right.y < 0.0);
    }

    #[test]
    fn empty_screen_uses_centre() {
        let camera = Camera::create_look_at(Vec3::ZERO, Vec3::NEG_Z, WORLD_UP);
        let direction = camera.screen_to_world(Vec2::new(5.0, 5.0), Vec2::ZERO);
        assert!(direction.abs_diff_eq(Vec3::NEG_Z, 1e-4));
    }

    #[test]
    fn ray_starts_at_orbital_eye() {
        let mut camera =
            Camera::create_look_at(Vec3::ZERO, Vec3::NEG_Z, WORLD_UP);
        camera.set_mode(CameraMode::Orbital);
        camera.set_target(Vec3::ZERO);
        let ray = camera.create_ray_from_screen(SCREEN * 0.5, SCREEN);
        assert!(ray.origin.abs_diff_eq(Vec3::new(0.0, 0.0, 10.0), 1e-4));
        assert!(ray.at(10.0).abs_diff_eq(Vec3::ZERO, 1e-3));
    }
}
