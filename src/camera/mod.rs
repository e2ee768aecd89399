//! Cameras and the controllers that move them.
//!
//! Provides a camera with cached view/projection matrices, frustum culling,
//! screen-space picking rays, interpolation, and first-person and orbital
//! controllers driven by rebindable input.

/// Camera actions, input sources and binding tables.
pub mod bindings;
/// Keyboard and mouse driven camera controllers.
pub mod controller;
/// Core camera struct and GPU uniform types.
pub mod core;
/// View frustum extraction and intersection tests.
pub mod frustum;
/// Screen-to-world rays.
pub mod ray;
/// Camera plus controller wired to input events.
pub mod system;

pub use bindings::{BindingSource, BindingTable, CameraAction, InputBinding};
pub use controller::CameraController;
pub use self::core::{
    Camera, CameraMode, CameraUniform, ProjectionType, MAX_FOV, MIN_FOV,
    MIN_ORBIT_DISTANCE,
};
pub use frustum::{Frustum, FrustumPlane, Plane};
pub use ray::Ray;
pub use system::CameraSystem;
