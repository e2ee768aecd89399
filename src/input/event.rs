use serde::{Deserialize, Serialize};

/// Platform-agnostic input events.
///
/// These are fed into a [`CameraSystem`](crate::camera::CameraSystem),
/// which routes them to the active controller.
///
/// # Example
///
/// ```
/// use vantage::{CameraSystem, InputEvent, KeyState};
///
/// let mut system = CameraSystem::default();
/// system.handle_event(&InputEvent::Key {
///     key: "KeyW".to_owned(),
///     state: KeyState::Pressed,
/// });
/// system.update_with_delta(0.016);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A keyboard key changed state.
    Key {
        /// Key code name as printed by winit's `KeyCode` (e.g. `"KeyW"`).
        key: String,
        /// New state of the key.
        state: KeyState,
    },
    /// Cursor moved to absolute screen position.
    CursorMoved {
        /// Horizontal position in physical pixels.
        x: f32,
        /// Vertical position in physical pixels.
        y: f32,
    },
    /// Mouse button pressed or released.
    MouseButton {
        /// Which button changed.
        button: MouseButton,
        /// `true` for press, `false` for release.
        pressed: bool,
    },
    /// Vertical scroll wheel motion.
    Scroll {
        /// Scroll amount in lines (positive = away from the user).
        delta: f32,
    },
}

/// Key transition reported by the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyState {
    /// Key went down.
    Pressed,
    /// Key went up.
    Released,
    /// Key is held and auto-repeating.
    Repeated,
}

impl KeyState {
    /// `true` for pressed and repeated keys.
    #[must_use]
    pub fn is_down(self) -> bool {
        !matches!(self, Self::Released)
    }
}

/// Platform-agnostic mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    /// Primary (left) mouse button.
    Left,
    /// Secondary (right) mouse button.
    Right,
    /// Middle mouse button (wheel click).
    Middle,
    /// Side "back" button.
    Back,
    /// Side "forward" button.
    Forward,
    /// Any other button, by platform index.
    Other(u16),
}

#[cfg(feature = "winit")]
impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        use winit::event::MouseButton as Winit;
        match button {
            Winit::Left => Self::Left,
            Winit::Right => Self::Right,
            Winit::Middle => Self::Middle,
            Winit::Back => Self::Back,
            Winit::Forward => Self::Forward,
            Winit::Other(index) => Self::Other(index),
        }
    }
}

#[cfg(feature = "winit")]
impl InputEvent {
    /// Translate a winit window event. Events the camera does not consume
    /// yield `None`.
    #[must_use]
    pub fn from_window_event(
        event: &winit::event::WindowEvent,
    ) -> Option<Self> {
        use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
        use winit::keyboard::PhysicalKey;

        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return None;
                };
                let state = match (event.state, event.repeat) {
                    (ElementState::Released, _) => KeyState::Released,
                    (ElementState::Pressed, true) => KeyState::Repeated,
                    (ElementState::Pressed, false) => KeyState::Pressed,
                };
                Some(Self::Key {
                    key: format!("{code:?}"),
                    state,
                })
            }
            WindowEvent::CursorMoved { position, .. } => {
                Some(Self::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                })
            }
            WindowEvent::MouseInput { state, button, .. } => {
                Some(Self::MouseButton {
                    button: (*button).into(),
                    pressed: *state == ElementState::Pressed,
                })
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                Some(Self::Scroll { delta })
            }
            _ => None,
        }
    }
}
