use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::camera::{CameraMode, ProjectionType};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera projection and control parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    #[schemars(
        title = "Field of View",
        range(min = 1.0, max = 170.0),
        extend("step" = 1.0)
    )]
    pub field_of_view: f32,
    /// Viewport width over height.
    #[schemars(skip)]
    pub aspect_ratio: f32,
    /// Near clipping plane distance.
    #[schemars(title = "Near Plane", range(min = 0.001, max = 10.0))]
    pub near_plane: f32,
    /// Far clipping plane distance.
    #[schemars(title = "Far Plane", range(min = 1.0, max = 100000.0))]
    pub far_plane: f32,
    /// Degrees of rotation per pixel of cursor travel.
    #[schemars(
        title = "Mouse Sensitivity",
        range(min = 0.01, max = 1.0),
        extend("step" = 0.01)
    )]
    pub mouse_sensitivity: f32,
    /// Perspective or orthographic projection.
    #[schemars(title = "Projection")]
    pub projection_type: ProjectionType,
    /// Which controller drives the camera.
    #[schemars(title = "Mode")]
    pub mode: CameraMode,
    /// Units travelled per second of held movement.
    #[schemars(
        title = "Movement Speed",
        range(min = 0.1, max = 100.0),
        extend("step" = 0.1)
    )]
    pub movement_speed: f32,
    /// Initial eye-to-target distance in orbital mode.
    #[schemars(title = "Orbit Distance", range(min = 0.1, max = 1000.0))]
    pub orbit_distance: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            field_of_view: 45.0,
            aspect_ratio: 16.0 / 9.0,
            near_plane: 0.1,
            far_plane: 1000.0,
            mouse_sensitivity: 0.1,
            projection_type: ProjectionType::Perspective,
            mode: CameraMode::Free,
            movement_speed: 5.0,
            orbit_distance: 10.0,
        }
    }
}
