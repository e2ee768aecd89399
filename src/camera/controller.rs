use glam::Vec2;
use rustc_hash::FxHashSet;

use super::bindings::{
    default_first_person_bindings, default_orbital_bindings, BindingTable,
    CameraAction, InputBinding,
};
use super::core::{Camera, CameraMode};
use crate::input::{KeyState, MouseButton};

/// Field-of-view change in degrees per scroll line.
const SCROLL_ZOOM_DEGREES: f32 = 2.0;
/// Distance assumed when an orbital controller scrolls without a target.
const DEFAULT_ORBIT_DISTANCE: f32 = 10.0;

#[derive(Debug, Clone)]
enum Behaviour {
    FirstPerson {
        keys_down: FxHashSet<String>,
        first_mouse: bool,
    },
    Orbital,
}

/// Turns input into camera motion.
///
/// First-person controllers fly the camera with held keys and turn it with
/// every cursor movement. Orbital controllers turn the camera only while the
/// rotate action is held and use the scroll wheel to change the orbit
/// distance.
#[derive(Debug, Clone)]
pub struct CameraController {
    behaviour: Behaviour,
    bindings: BindingTable,
    actions: [bool; CameraAction::COUNT],
    last_cursor: Vec2,
}

impl CameraController {
    /// First-person controller with the default bindings.
    #[must_use]
    pub fn first_person(initial_cursor: Vec2) -> Self {
        Self::with_behaviour(
            Behaviour::FirstPerson {
                keys_down: FxHashSet::default(),
                first_mouse: true,
            },
            initial_cursor,
        )
    }

    /// Orbital controller with the default bindings.
    #[must_use]
    pub fn orbital(initial_cursor: Vec2) -> Self {
        Self::with_behaviour(Behaviour::Orbital, initial_cursor)
    }

    fn with_behaviour(behaviour: Behaviour, initial_cursor: Vec2) -> Self {
        let mut controller = Self {
            behaviour,
            bindings: BindingTable::default(),
            actions: [false; CameraAction::COUNT],
            last_cursor: initial_cursor,
        };
        controller.set_default_bindings();
        controller
    }

    /// [`CameraMode::FirstPerson`] or [`CameraMode::Orbital`].
    #[must_use]
    pub fn mode(&self) -> CameraMode {
        match self.behaviour {
            Behaviour::FirstPerson { .. } => CameraMode::FirstPerson,
            Behaviour::Orbital => CameraMode::Orbital,
        }
    }

    /// Apply held movement actions for `delta_time` seconds.
    pub fn update(&mut self, camera: &mut Camera, delta_time: f32) {
        if matches!(self.behaviour, Behaviour::Orbital) {
            return;
        }

        let spatial = camera.spatial_mut();
        if self.is_action_active(CameraAction::MoveForward) {
            spatial.move_forward(delta_time);
        }
        if self.is_action_active(CameraAction::MoveBackward) {
            spatial.move_forward(-delta_time);
        }
        if self.is_action_active(CameraAction::MoveLeft) {
            spatial.move_right(-delta_time);
        }
        if self.is_action_active(CameraAction::MoveRight) {
            spatial.move_right(delta_time);
        }
        if self.is_action_active(CameraAction::MoveUp) {
            spatial.move_up(delta_time);
        }
        if self.is_action_active(CameraAction::MoveDown) {
            spatial.move_up(-delta_time);
        }
    }

    /// Record a key transition and update any action bound to it.
    pub fn process_key_input(&mut self, key: &str, state: KeyState) {
        if let Behaviour::FirstPerson { keys_down, .. } = &mut self.behaviour {
            if state.is_down() {
                let _ = keys_down.insert(key.to_owned());
            } else {
                let _ = keys_down.remove(key);
            }
        }
        if let Some(action) = self.bindings.key_action(key) {
            self.actions[action.index()] = state.is_down();
        }
    }

    /// React to the cursor moving to `(x, y)`.
    pub fn process_mouse_movement(
        &mut self,
        camera: &mut Camera,
        x: f32,
        y: f32,
    ) {
        let cursor = Vec2::new(x, y);
        let rotate = match &mut self.behaviour {
            Behaviour::FirstPerson { first_mouse, .. } => {
                if *first_mouse {
                    *first_mouse = false;
                    false
                } else {
                    self.bindings.mouse_movement_action().is_some()
                }
            }
            Behaviour::Orbital => {
                self.actions[CameraAction::RotateCamera.index()]
            }
        };

        if rotate {
            let offset =
                (self.last_cursor - cursor) * camera.mouse_sensitivity();
            camera.spatial_mut().rotate(offset.x, offset.y);
        }
        self.last_cursor = cursor;
    }

    /// React to `y_offset` lines of vertical scroll.
    ///
    /// Orbital zoom measures from the rendered eye
    /// ([`Camera::eye_position`]) to the target, not from the spatial's own
    /// position, and falls back to a distance of 10 without a target.
    pub fn process_mouse_scroll(
        &mut self,
        camera: &mut Camera,
        y_offset: f32,
    ) {
        if self.bindings.scroll_action().is_none() {
            return;
        }
        match self.behaviour {
            Behaviour::FirstPerson { .. } => {
                camera.set_field_of_view(
                    camera.field_of_view() - y_offset * SCROLL_ZOOM_DEGREES,
                );
            }
            Behaviour::Orbital => {
                let current = camera
                    .target()
                    .map_or(DEFAULT_ORBIT_DISTANCE, |target| {
                        camera.eye_position().distance(target)
                    });
                camera.set_orbit_distance(current - y_offset);
            }
        }
    }

    /// Update the action bound to `button`, if any.
    pub fn process_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if let Some(action) = self.bindings.mouse_button_action(button) {
            self.actions[action.index()] = pressed;
        }
    }

    /// Replace every binding. Lookup maps are rebuilt from the new list.
    pub fn set_input_bindings(&mut self, bindings: Vec<InputBinding>) {
        self.bindings.set_bindings(bindings);
    }

    /// Current bindings in order.
    #[must_use]
    pub fn input_bindings(&self) -> &[InputBinding] {
        self.bindings.bindings()
    }

    /// Restore the bindings this kind of controller starts with.
    pub fn set_default_bindings(&mut self) {
        let defaults = match self.behaviour {
            Behaviour::FirstPerson { .. } => default_first_person_bindings(),
            Behaviour::Orbital => default_orbital_bindings(),
        };
        self.bindings.set_bindings(defaults);
    }

    /// Whether `action` is currently held.
    #[must_use]
    pub fn is_action_active(&self, action: CameraAction) -> bool {
        self.actions[action.index()]
    }

    /// Force the rotate action on or off.
    pub fn set_rotating(&mut self, rotating: bool) {
        self.actions[CameraAction::RotateCamera.index()] = rotating;
    }

    /// Whether a key is held. Only first-person controllers track raw keys.
    #[must_use]
    pub fn is_key_down(&self, key: &str) -> bool {
        match &self.behaviour {
            Behaviour::FirstPerson { keys_down, .. } => keys_down.contains(key),
            Behaviour::Orbital => false,
        }
    }
}
