//! Position and orientation state shared by anything that moves in 3D.
//!
//! [`Spatial`] owns a root [`Transform`] and keeps a yaw/pitch/roll view of
//! its rotation in sync. Every public mutation takes a fresh change stamp
//! ([`Spatial::revision`]) exactly once; owners that cache derived values
//! (such as a camera's view matrix) compare stamps instead of being called
//! back.

use std::sync::atomic::{AtomicU64, Ordering};

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::transform::{look_rotation, Transform, WORLD_UP};

/// Initial position of a default spatial.
pub const DEFAULT_POSITION: Vec3 = Vec3::new(0.0, 0.0, 3.0);
/// Initial yaw in degrees.
pub const DEFAULT_YAW: f32 = -90.0;
/// Initial pitch in degrees.
pub const DEFAULT_PITCH: f32 = 0.0;
/// Initial roll in degrees.
pub const DEFAULT_ROLL: f32 = 0.0;
/// Units moved per unit of movement distance.
pub const DEFAULT_MOVEMENT_SPEED: f32 = 5.0;
/// Lowest allowed pitch in degrees.
pub const MIN_PITCH: f32 = -89.0;
/// Highest allowed pitch in degrees.
pub const MAX_PITCH: f32 = 89.0;

/// Source of change stamps. Stamps are unique across all spatials, so a
/// swapped-in spatial never matches a stamp cached from another one.
static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

fn next_revision() -> u64 {
    NEXT_REVISION.fetch_add(1, Ordering::Relaxed)
}

/// Yaw, pitch and roll in degrees.
///
/// The rotation they describe is `Ry(yaw) * Rx(pitch) * Rz(roll)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EulerAngles {
    /// Rotation about the up axis.
    pub yaw: f32,
    /// Rotation about the right axis, kept within
    /// [`MIN_PITCH`]..=[`MAX_PITCH`].
    pub pitch: f32,
    /// Rotation about the forward axis.
    pub roll: f32,
}

impl EulerAngles {
    /// Quaternion for these angles.
    #[must_use]
    pub fn to_quat(self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.yaw.to_radians(),
            self.pitch.to_radians(),
            self.roll.to_radians(),
        )
    }

    /// Angles for a quaternion, with pitch clamped.
    #[must_use]
    pub fn from_quat(rotation: Quat) -> Self {
        let (yaw, pitch, roll) = rotation.to_euler(EulerRot::YXZ);
        Self {
            yaw: yaw.to_degrees(),
            pitch: pitch.to_degrees().clamp(MIN_PITCH, MAX_PITCH),
            roll: roll.to_degrees(),
        }
    }
}

/// A positioned, oriented object with Euler bookkeeping and movement helpers.
///
/// Equality compares pose, speed and world up; the change stamp is ignored.
#[derive(Debug, Clone)]
pub struct Spatial {
    transform: Transform,
    euler: EulerAngles,
    movement_speed: f32,
    world_up: Vec3,
    revision: u64,
}

impl PartialEq for Spatial {
    fn eq(&self, other: &Self) -> bool {
        self.transform == other.transform
            && self.euler == other.euler
            && self.movement_speed == other.movement_speed
            && self.world_up == other.world_up
    }
}

impl Default for Spatial {
    fn default() -> Self {
        Self::new(
            DEFAULT_POSITION,
            DEFAULT_YAW,
            DEFAULT_PITCH,
            DEFAULT_ROLL,
            WORLD_UP,
        )
    }
}

impl Spatial {
    /// Create a spatial at `position` facing the given Euler angles (degrees).
    #[must_use]
    pub fn new(
        position: Vec3,
        yaw: f32,
        pitch: f32,
        roll: f32,
        world_up: Vec3,
    ) -> Self {
        let euler = EulerAngles {
            yaw,
            pitch: pitch.clamp(MIN_PITCH, MAX_PITCH),
            roll,
        };
        Self {
            transform: Transform::new(position, euler.to_quat(), Vec3::ONE),
            euler,
            movement_speed: DEFAULT_MOVEMENT_SPEED,
            world_up: world_up.normalize_or(WORLD_UP),
            revision: next_revision(),
        }
    }

    /// Change stamp, replaced once per mutation by a value no other spatial
    /// has held.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The underlying transform.
    #[must_use]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Current position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Current orientation.
    #[must_use]
    pub fn rotation(&self) -> Quat {
        self.transform.rotation
    }

    /// Cached Euler angles.
    #[must_use]
    pub fn euler(&self) -> EulerAngles {
        self.euler
    }

    /// Yaw in degrees.
    #[must_use]
    pub fn yaw(&self) -> f32 {
        self.euler.yaw
    }

    /// Pitch in degrees.
    #[must_use]
    pub fn pitch(&self) -> f32 {
        self.euler.pitch
    }

    /// Roll in degrees.
    #[must_use]
    pub fn roll(&self) -> f32 {
        self.euler.roll
    }

    /// Forward direction.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.transform.forward()
    }

    /// Up direction.
    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.transform.up()
    }

    /// Right direction.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.transform.right()
    }

    /// Reference up vector used when re-orienting.
    #[must_use]
    pub fn world_up(&self) -> Vec3 {
        self.world_up
    }

    /// Movement speed multiplier.
    #[must_use]
    pub fn movement_speed(&self) -> f32 {
        self.movement_speed
    }

    /// Set the movement speed multiplier.
    pub fn set_movement_speed(&mut self, movement_speed: f32) {
        self.movement_speed = movement_speed;
    }

    /// Model matrix of the transform.
    #[must_use]
    pub fn model_matrix(&self) -> Mat4 {
        self.transform.matrix()
    }

    /// Move to `position`.
    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
        self.mark_changed();
    }

    /// Set yaw, pitch and roll in degrees. Pitch is clamped.
    pub fn set_orientation(&mut self, yaw: f32, pitch: f32, roll: f32) {
        self.euler = EulerAngles {
            yaw,
            pitch: pitch.clamp(MIN_PITCH, MAX_PITCH),
            roll,
        };
        self.sync_rotation();
        self.mark_changed();
    }

    /// Set the orientation from a quaternion and refresh the Euler cache.
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.transform.rotation = rotation.normalize();
        self.sync_euler();
        self.mark_changed();
    }

    /// Add to yaw and pitch (degrees). Pitch stays clamped.
    pub fn rotate(&mut self, yaw_offset: f32, pitch_offset: f32) {
        self.euler.yaw += yaw_offset;
        self.euler.pitch =
            (self.euler.pitch + pitch_offset).clamp(MIN_PITCH, MAX_PITCH);
        self.sync_rotation();
        self.mark_changed();
    }

    /// Replace the reference up vector, keeping the current forward.
    ///
    /// Ignored when `up` is zero or parallel to forward.
    pub fn set_world_up(&mut self, up: Vec3) {
        let Some(up) = up.try_normalize() else {
            return;
        };
        let Some(rotation) = look_rotation(self.forward(), up) else {
            log::debug!("set_world_up: {up} is parallel to forward, ignored");
            return;
        };
        self.world_up = up;
        self.transform.rotation = rotation;
        self.sync_euler();
        self.mark_changed();
    }

    /// Turn to face `target`. Degenerate directions are ignored.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        if self.transform.look_at(target, up) {
            self.sync_euler();
            self.mark_changed();
        }
    }

    /// Move along forward by `distance * movement_speed`.
    pub fn move_forward(&mut self, distance: f32) {
        self.translate(self.forward() * distance);
    }

    /// Move along right by `distance * movement_speed`.
    pub fn move_right(&mut self, distance: f32) {
        self.translate(self.right() * distance);
    }

    /// Move along up by `distance * movement_speed`.
    pub fn move_up(&mut self, distance: f32) {
        self.translate(self.up() * distance);
    }

    /// Move along `direction` (normalized first) by
    /// `distance * movement_speed`. A zero direction does nothing.
    pub fn move_in_direction(&mut self, direction: Vec3, distance: f32) {
        if let Some(direction) = direction.try_normalize() {
            self.translate(direction * distance);
        }
    }

    /// Orbit `angle` degrees about `axis` through `point`.
    ///
    /// Both position and orientation are rotated.
    pub fn rotate_around(&mut self, point: Vec3, axis: Vec3, angle: f32) {
        let Some(axis) = axis.try_normalize() else {
            return;
        };
        let rotation = Quat::from_axis_angle(axis, angle.to_radians());
        self.transform.position =
            point + rotation * (self.transform.position - point);
        self.transform.rotation =
            (rotation * self.transform.rotation).normalize();
        self.sync_euler();
        self.mark_changed();
    }

    /// Place along a polyline at parameter `t`, facing down the path.
    ///
    /// `t` wraps into `[0, 1)` and is spread uniformly over the segments,
    /// regardless of their lengths. An empty path does nothing and a single
    /// point is snapped to.
    pub fn follow_path(&mut self, path: &[Vec3], t: f32) {
        match path {
            [] => return,
            [point] => {
                self.set_position(*point);
                return;
            }
            _ => {}
        }

        let t = t.rem_euclid(1.0);
        let segments = path.len() - 1;
        let segment_length = 1.0 / segments as f32;
        let segment = ((t / segment_length) as usize).min(segments - 1);
        let segment_t = (t - segment as f32 * segment_length) / segment_length;

        self.transform.position =
            path[segment].lerp(path[segment + 1], segment_t);

        // Face where the next segment is at the same parameter
        if let Some(&after) = path.get(segment + 2) {
            let look_target = path[segment + 1].lerp(after, segment_t);
            if self.transform.look_at(look_target, self.world_up) {
                self.sync_euler();
            }
        }
        self.mark_changed();
    }

    /// Blend toward `target`: lerp position, slerp rotation.
    ///
    /// `t` is clamped to `[0, 1]`.
    pub fn interpolate_to(&mut self, target: &Self, t: f32) {
        let t = t.clamp(0.0, 1.0);
        self.transform.position =
            self.transform.position.lerp(target.transform.position, t);
        self.transform.rotation =
            self.transform.rotation.slerp(target.transform.rotation, t);
        self.sync_euler();
        self.mark_changed();
    }

    fn translate(&mut self, offset: Vec3) {
        self.transform.position += offset * self.movement_speed;
        self.mark_changed();
    }

    fn sync_rotation(&mut self) {
        self.transform.rotation = self.euler.to_quat();
    }

    /// Refresh the Euler cache. A rotation past the pitch limits is pulled
    /// back onto them so the cache and the quaternion stay interchangeable.
    fn sync_euler(&mut self) {
        let (_, pitch, _) = self.transform.rotation.to_euler(EulerRot::YXZ);
        self.euler = EulerAngles::from_quat(self.transform.rotation);
        if !(MIN_PITCH..=MAX_PITCH).contains(&pitch.to_degrees()) {
            self.sync_rotation();
        }
    }

    fn mark_changed(&mut self) {
        self.revision = next_revision();
    }
}
