use glam::{Vec2, Vec3};

use super::bindings::InputBinding;
use super::controller::CameraController;
use super::core::{Camera, CameraMode};
use crate::input::InputEvent;
use crate::options::{CameraOptions, Options};
use crate::util::FrameTiming;

/// One camera plus the controller that drives it.
///
/// A windowing layer forwards [`InputEvent`]s through
/// [`CameraSystem::handle_event`] and calls [`CameraSystem::update`] once per
/// frame.
#[derive(Debug, Clone)]
pub struct CameraSystem {
    camera: Camera,
    controller: CameraController,
    timing: FrameTiming,
}

impl Default for CameraSystem {
    fn default() -> Self {
        Self::new(&CameraOptions::default())
    }
}

impl CameraSystem {
    /// Build a camera from `options` and pick a controller for its mode.
    ///
    /// Orbital cameras get an orbital controller and orbit the origin. Every
    /// other mode gets a first-person controller.
    #[must_use]
    pub fn new(options: &CameraOptions) -> Self {
        let mut camera = Camera::new(options);
        let controller = match options.mode {
            CameraMode::Orbital => {
                camera.set_target(Vec3::ZERO);
                CameraController::orbital(Vec2::ZERO)
            }
            CameraMode::FirstPerson => {
                CameraController::first_person(Vec2::ZERO)
            }
            mode @ CameraMode::Free => {
                log::warn!(
                    "no controller for camera mode {mode:?}, using first person"
                );
                CameraController::first_person(Vec2::ZERO)
            }
        };
        log::debug!("camera system using {:?} controller", controller.mode());

        Self {
            camera,
            controller,
            timing: FrameTiming::new(),
        }
    }

    /// Like [`CameraSystem::new`], also installing the configured bindings
    /// for the chosen controller.
    #[must_use]
    pub fn with_options(options: &Options) -> Self {
        let mut system = Self::new(&options.camera);
        let bindings = options.keybindings.for_mode(system.controller.mode());
        system.controller.set_input_bindings(bindings.to_vec());
        system
    }

    /// Route an input event to the controller.
    pub fn handle_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::Key { key, state } => {
                self.controller.process_key_input(key, *state);
            }
            InputEvent::CursorMoved { x, y } => {
                self.controller
                    .process_mouse_movement(&mut self.camera, *x, *y);
            }
            InputEvent::Scroll { delta } => {
                self.controller.process_mouse_scroll(&mut self.camera, *delta);
            }
            InputEvent::MouseButton { button, pressed } => {
                self.controller.process_mouse_button(*button, *pressed);
            }
        }
    }

    /// Translate and route a winit window event. Resizes update the aspect
    /// ratio. Returns whether the event was consumed.
    #[cfg(feature = "winit")]
    pub fn handle_window_event(
        &mut self,
        event: &winit::event::WindowEvent,
    ) -> bool {
        if let winit::event::WindowEvent::Resized(size) = event {
            self.resize(size.width, size.height);
            return true;
        }
        match InputEvent::from_window_event(event) {
            Some(input) => {
                self.handle_event(&input);
                true
            }
            None => false,
        }
    }

    /// Advance by the wall-clock time since the previous update.
    pub fn update(&mut self) {
        let delta_time = self.timing.tick();
        self.controller.update(&mut self.camera, delta_time);
    }

    /// Advance by a fixed `delta_time` in seconds.
    pub fn update_with_delta(&mut self, delta_time: f32) {
        self.controller.update(&mut self.camera, delta_time);
    }

    /// Match the aspect ratio to a new viewport. Empty viewports are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.camera.set_aspect_ratio(width as f32 / height as f32);
    }

    /// The camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable camera.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// The controller.
    #[must_use]
    pub fn controller(&self) -> &CameraController {
        &self.controller
    }

    /// Mutable controller.
    pub fn controller_mut(&mut self) -> &mut CameraController {
        &mut self.controller
    }

    /// Replace the controller's bindings.
    pub fn set_input_bindings(&mut self, bindings: Vec<InputBinding>) {
        self.controller.set_input_bindings(bindings);
    }

    /// Smoothed frames per second measured by [`CameraSystem::update`].
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.timing.fps()
    }
}
