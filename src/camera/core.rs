use std::cell::Cell;
use std::fmt;

use glam::{Mat4, Vec3};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::frustum::Frustum;
use crate::options::CameraOptions;
use crate::spatial::Spatial;

/// Smallest allowed vertical field of view in degrees.
pub const MIN_FOV: f32 = 1.0;
/// Largest allowed vertical field of view in degrees.
pub const MAX_FOV: f32 = 170.0;
/// Closest an orbiting eye may get to its target.
pub const MIN_ORBIT_DISTANCE: f32 = 0.1;

/// Orthographic half-height per degree of field of view.
const ORTHO_SCALE: f32 = 0.01;

/// How clip space is produced from view space.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionType {
    /// Perspective frustum from the field of view.
    #[default]
    Perspective,
    /// Parallel projection sized from the field of view.
    Orthographic,
}

/// Behaviour the camera's controller should follow.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    /// Fly through the scene looking along forward.
    FirstPerson,
    /// Circle a target at a fixed distance.
    Orbital,
    /// No dedicated controller.
    #[default]
    Free,
}

#[derive(Debug, Clone)]
struct MatrixCache {
    view_dirty: Cell<bool>,
    projection_dirty: Cell<bool>,
    view: Cell<Mat4>,
    projection: Cell<Mat4>,
    spatial_revision: Cell<u64>,
}

impl MatrixCache {
    fn stale() -> Self {
        Self {
            view_dirty: Cell::new(true),
            projection_dirty: Cell::new(true),
            view: Cell::new(Mat4::IDENTITY),
            projection: Cell::new(Mat4::IDENTITY),
            spatial_revision: Cell::new(0),
        }
    }
}

/// A viewpoint with lazily cached view and projection matrices.
///
/// The camera owns a [`Spatial`] for its pose. Pose changes made through
/// [`Camera::spatial_mut`] are picked up on the next matrix query by
/// comparing the spatial's revision against the one the cached view was
/// built from.
#[derive(Debug, Clone)]
pub struct Camera {
    spatial: Spatial,
    settings: CameraOptions,
    target: Option<Vec3>,
    orbit_distance: f32,
    cache: MatrixCache,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&CameraOptions::default())
    }
}

impl Camera {
    /// Create a camera at the default pose using `options`.
    #[must_use]
    pub fn new(options: &CameraOptions) -> Self {
        let mut settings = options.clone();
        settings.field_of_view = settings.field_of_view.clamp(MIN_FOV, MAX_FOV);
        let mut spatial = Spatial::default();
        spatial.set_movement_speed(settings.movement_speed);
        Self {
            spatial,
            orbit_distance: settings.orbit_distance.max(MIN_ORBIT_DISTANCE),
            settings,
            target: None,
            cache: MatrixCache::stale(),
        }
    }

    /// Default camera placed at `position` and turned toward `target`.
    #[must_use]
    pub fn create_look_at(position: Vec3, target: Vec3, up: Vec3) -> Self {
        let mut camera = Self::default();
        camera.spatial.set_position(position);
        camera.spatial.look_at(target, up);
        camera
    }

    /// Pose of the camera.
    #[must_use]
    pub fn spatial(&self) -> &Spatial {
        &self.spatial
    }

    /// Mutable pose. Changes invalidate the view matrix.
    pub fn spatial_mut(&mut self) -> &mut Spatial {
        &mut self.spatial
    }

    /// Current projection and control settings.
    #[must_use]
    pub fn settings(&self) -> &CameraOptions {
        &self.settings
    }

    /// Position of the underlying spatial.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.spatial.position()
    }

    /// Forward direction of the underlying spatial.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.spatial.forward()
    }

    /// Where the view is rendered from.
    ///
    /// While orbiting a target this is `target - forward * orbit_distance`;
    /// otherwise it is the spatial position.
    #[must_use]
    pub fn eye_position(&self) -> Vec3 {
        match self.orbit_target() {
            Some(target) => target - self.forward() * self.orbit_distance,
            None => self.position(),
        }
    }

    /// Orbit target, if any.
    #[must_use]
    pub fn target(&self) -> Option<Vec3> {
        self.target
    }

    /// Distance from an orbit target to the eye.
    #[must_use]
    pub fn orbit_distance(&self) -> f32 {
        self.orbit_distance
    }

    /// Vertical field of view in degrees.
    #[must_use]
    pub fn field_of_view(&self) -> f32 {
        self.settings.field_of_view
    }

    /// Width over height.
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        self.settings.aspect_ratio
    }

    /// Near clipping distance.
    #[must_use]
    pub fn near_plane(&self) -> f32 {
        self.settings.near_plane
    }

    /// Far clipping distance.
    #[must_use]
    pub fn far_plane(&self) -> f32 {
        self.settings.far_plane
    }

    /// Degrees of rotation per pixel of mouse travel.
    #[must_use]
    pub fn mouse_sensitivity(&self) -> f32 {
        self.settings.mouse_sensitivity
    }

    /// Active projection.
    #[must_use]
    pub fn projection_type(&self) -> ProjectionType {
        self.settings.projection_type
    }

    /// Active mode.
    #[must_use]
    pub fn mode(&self) -> CameraMode {
        self.settings.mode
    }

    /// World-to-view matrix, rebuilt only when the pose or orbit changed.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        let revision = self.spatial.revision();
        if self.cache.view_dirty.get()
            || self.cache.spatial_revision.get() != revision
        {
            let up = self.spatial.up();
            let view = match self.orbit_target() {
                Some(target) => {
                    Mat4::look_at_rh(self.eye_position(), target, up)
                }
                None => {
                    let eye = self.position();
                    Mat4::look_at_rh(eye, eye + self.forward(), up)
                }
            };
            self.cache.view.set(view);
            self.cache.spatial_revision.set(revision);
            self.cache.view_dirty.set(false);
        }
        self.cache.view.get()
    }

    /// View-to-clip matrix with OpenGL depth (`[-1, 1]`).
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        if self.cache.projection_dirty.get() {
            let s = &self.settings;
            let projection = match s.projection_type {
                ProjectionType::Perspective => Mat4::perspective_rh_gl(
                    s.field_of_view.to_radians(),
                    s.aspect_ratio,
                    s.near_plane,
                    s.far_plane,
                ),
                ProjectionType::Orthographic => {
                    let half_height = s.field_of_view * ORTHO_SCALE;
                    let half_width = half_height * s.aspect_ratio;
                    Mat4::orthographic_rh_gl(
                        -half_width,
                        half_width,
                        -half_height,
                        half_height,
                        s.near_plane,
                        s.far_plane,
                    )
                }
            };
            self.cache.projection.set(projection);
            self.cache.projection_dirty.set(false);
        }
        self.cache.projection.get()
    }

    /// `projection * view`.
    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Set the vertical field of view, clamped to [`MIN_FOV`]..=[`MAX_FOV`].
    pub fn set_field_of_view(&mut self, degrees: f32) {
        self.settings.field_of_view = degrees.clamp(MIN_FOV, MAX_FOV);
        self.cache.projection_dirty.set(true);
    }

    /// Set width over height.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.settings.aspect_ratio = aspect_ratio;
        self.cache.projection_dirty.set(true);
    }

    /// Set the near clipping distance.
    pub fn set_near_plane(&mut self, near: f32) {
        self.settings.near_plane = near;
        self.cache.projection_dirty.set(true);
    }

    /// Set the far clipping distance.
    pub fn set_far_plane(&mut self, far: f32) {
        self.settings.far_plane = far;
        self.cache.projection_dirty.set(true);
    }

    /// Switch between perspective and orthographic.
    pub fn set_projection_type(&mut self, projection_type: ProjectionType) {
        self.settings.projection_type = projection_type;
        self.cache.projection_dirty.set(true);
    }

    /// Change the mode. Only orbital mode affects the view matrix.
    pub fn set_mode(&mut self, mode: CameraMode) {
        self.settings.mode = mode;
        self.cache.view_dirty.set(true);
    }

    /// Set mouse sensitivity.
    pub fn set_mouse_sensitivity(&mut self, sensitivity: f32) {
        self.settings.mouse_sensitivity = sensitivity;
    }

    /// Orbit around `target` when in orbital mode.
    pub fn set_target(&mut self, target: Vec3) {
        self.target = Some(target);
        self.cache.view_dirty.set(true);
    }

    /// Forget the orbit target.
    pub fn clear_target(&mut self) {
        self.target = None;
        self.cache.view_dirty.set(true);
    }

    /// Set the orbit distance, never closer than [`MIN_ORBIT_DISTANCE`].
    pub fn set_orbit_distance(&mut self, distance: f32) {
        self.orbit_distance = distance.max(MIN_ORBIT_DISTANCE);
        self.cache.view_dirty.set(true);
    }

    /// Frustum of the current view-projection.
    #[must_use]
    pub fn extract_frustum(&self) -> Frustum {
        Frustum::from_view_projection(self.view_projection())
    }

    /// Whether `point` lies inside `frustum`.
    #[must_use]
    pub fn is_point_visible(point: Vec3, frustum: &Frustum) -> bool {
        frustum.contains_point(point)
    }

    /// Whether a sphere touches `frustum`.
    #[must_use]
    pub fn is_sphere_visible(
        center: Vec3,
        radius: f32,
        frustum: &Frustum,
    ) -> bool {
        frustum.intersects_sphere(center, radius)
    }

    /// Whether an axis-aligned box touches `frustum` (conservative).
    #[must_use]
    pub fn is_aabb_visible(min: Vec3, max: Vec3, frustum: &Frustum) -> bool {
        frustum.intersects_aabb(min, max)
    }

    /// Blend pose and lens toward `target`. `t` is clamped to `[0, 1]`.
    pub fn interpolate_to(&mut self, target: &Self, t: f32) {
        let t = t.clamp(0.0, 1.0);
        self.spatial.interpolate_to(&target.spatial, t);

        let lerp = |a: f32, b: f32| a + (b - a) * t;
        self.settings.field_of_view =
            lerp(self.settings.field_of_view, target.settings.field_of_view);
        self.settings.near_plane =
            lerp(self.settings.near_plane, target.settings.near_plane);
        self.settings.far_plane =
            lerp(self.settings.far_plane, target.settings.far_plane);
        self.cache.projection_dirty.set(true);
    }

    fn orbit_target(&self) -> Option<Vec3> {
        if self.settings.mode == CameraMode::Orbital {
            self.target
        } else {
            None
        }
    }
}

impl fmt::Display for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.position();
        writeln!(f, "Camera:")?;
        writeln!(f, "  Position: {}, {}, {}", p.x, p.y, p.z)?;
        writeln!(
            f,
            "  Orientation: {}, {}, {}",
            self.spatial.yaw(),
            self.spatial.pitch(),
            self.spatial.roll()
        )?;
        writeln!(f, "  FOV: {}", self.settings.field_of_view)?;
        write!(
            f,
            "  Near/Far: {}/{}",
            self.settings.near_plane, self.settings.far_plane
        )
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// Plain-old-data camera block laid out for a uniform buffer.
pub struct CameraUniform {
    /// World-to-view matrix.
    pub view: [[f32; 4]; 4],
    /// View-to-clip matrix.
    pub projection: [[f32; 4]; 4],
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Eye position in world space.
    pub position: [f32; 3],
    /// Near clipping distance.
    pub near: f32,
    /// Forward direction in world space.
    pub forward: [f32; 3],
    /// Far clipping distance.
    pub far: f32,
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Identity matrices looking down `-Z`.
    #[must_use]
    pub fn new() -> Self {
        let identity = Mat4::IDENTITY.to_cols_array_2d();
        Self {
            view: identity,
            projection: identity,
            view_proj: identity,
            position: [0.0; 3],
            near: 0.1,
            forward: [0.0, 0.0, -1.0],
            far: 1000.0,
        }
    }

    /// Copy the camera's current matrices and lens into the block.
    pub fn update_from(&mut self, camera: &Camera) {
        let view = camera.view_matrix();
        let projection = camera.projection_matrix();
        self.view = view.to_cols_array_2d();
        self.projection = projection.to_cols_array_2d();
        self.view_proj = (projection * view).to_cols_array_2d();
        self.position = camera.eye_position().to_array();
        self.near = camera.near_plane();
        self.forward = camera.forward().to_array();
        self.far = camera.far_plane();
    }
}
