//! Camera actions and the bindings that trigger them.
//!
//! A binding pairs one input source with one [`CameraAction`]. The
//! [`BindingTable`] keeps the ordered list and lookup maps derived from it;
//! every change to the list rebuilds the maps from scratch, so the last
//! binding for a given source wins.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::input::MouseButton;

/// Things a controller can be asked to do.
///
/// Serde serializes as `snake_case` strings so TOML stays readable:
/// ```toml
/// [[keybindings.first_person]]
/// action = "move_forward"
/// source = { key = "KeyW" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraAction {
    /// Move along forward.
    MoveForward,
    /// Move against forward.
    MoveBackward,
    /// Strafe left.
    MoveLeft,
    /// Strafe right.
    MoveRight,
    /// Rise along the camera's up.
    MoveUp,
    /// Sink along the camera's up.
    MoveDown,
    /// Turn (first person) or orbit (orbital).
    RotateCamera,
    /// Narrow the view or approach the target.
    ZoomIn,
    /// Reserved for bindings that zoom out.
    ZoomOut,
}

impl CameraAction {
    /// Number of actions.
    pub const COUNT: usize = 9;

    /// Every action, in declaration order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::MoveForward,
        Self::MoveBackward,
        Self::MoveLeft,
        Self::MoveRight,
        Self::MoveUp,
        Self::MoveDown,
        Self::RotateCamera,
        Self::ZoomIn,
        Self::ZoomOut,
    ];

    /// Dense index in `0..COUNT`.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// The input half of a binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingSource {
    /// A keyboard key by winit `KeyCode` name (e.g. `"KeyW"`).
    Key(String),
    /// A mouse button.
    MouseButton(MouseButton),
    /// Any cursor motion.
    MouseMovement,
    /// The scroll wheel.
    Scroll,
}

/// One source mapped to one action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputBinding {
    /// What the source triggers.
    pub action: CameraAction,
    /// What triggers the action.
    pub source: BindingSource,
}

impl InputBinding {
    /// Bind a key by `KeyCode` name.
    #[must_use]
    pub fn key(key: &str, action: CameraAction) -> Self {
        Self {
            action,
            source: BindingSource::Key(key.to_owned()),
        }
    }

    /// Bind a mouse button.
    #[must_use]
    pub fn mouse_button(button: MouseButton, action: CameraAction) -> Self {
        Self {
            action,
            source: BindingSource::MouseButton(button),
        }
    }

    /// Bind cursor motion.
    #[must_use]
    pub fn mouse_movement(action: CameraAction) -> Self {
        Self {
            action,
            source: BindingSource::MouseMovement,
        }
    }

    /// Bind the scroll wheel.
    #[must_use]
    pub fn scroll(action: CameraAction) -> Self {
        Self {
            action,
            source: BindingSource::Scroll,
        }
    }
}

/// WASD plus Space/ControlLeft for flying, mouse to look, scroll to zoom.
#[must_use]
pub fn default_first_person_bindings() -> Vec<InputBinding> {
    use CameraAction::{
        MoveBackward, MoveDown, MoveForward, MoveLeft, MoveRight, MoveUp,
        RotateCamera, ZoomIn,
    };
    vec![
        InputBinding::key("KeyW", MoveForward),
        InputBinding::key("KeyS", MoveBackward),
        InputBinding::key("KeyA", MoveLeft),
        InputBinding::key("KeyD", MoveRight),
        InputBinding::key("Space", MoveUp),
        InputBinding::key("ControlLeft", MoveDown),
        InputBinding::mouse_movement(RotateCamera),
        InputBinding::scroll(ZoomIn),
    ]
}

/// Left drag to orbit, scroll to change distance.
#[must_use]
pub fn default_orbital_bindings() -> Vec<InputBinding> {
    vec![
        InputBinding::mouse_button(
            MouseButton::Left,
            CameraAction::RotateCamera,
        ),
        InputBinding::scroll(CameraAction::ZoomIn),
    ]
}

/// Ordered bindings with per-source lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingTable {
    bindings: Vec<InputBinding>,
    keys: FxHashMap<String, CameraAction>,
    mouse_buttons: FxHashMap<MouseButton, CameraAction>,
    mouse_movement: Option<CameraAction>,
    scroll: Option<CameraAction>,
}

impl BindingTable {
    /// Table over `bindings`.
    #[must_use]
    pub fn new(bindings: Vec<InputBinding>) -> Self {
        let mut table = Self {
            bindings,
            ..Self::default()
        };
        table.rebuild_lookup();
        table
    }

    /// The bindings in the order they were given.
    #[must_use]
    pub fn bindings(&self) -> &[InputBinding] {
        &self.bindings
    }

    /// Replace every binding.
    pub fn set_bindings(&mut self, bindings: Vec<InputBinding>) {
        self.bindings = bindings;
        self.rebuild_lookup();
    }

    /// Action bound to a key name.
    #[must_use]
    pub fn key_action(&self, key: &str) -> Option<CameraAction> {
        self.keys.get(key).copied()
    }

    /// Action bound to a mouse button.
    #[must_use]
    pub fn mouse_button_action(
        &self,
        button: MouseButton,
    ) -> Option<CameraAction> {
        self.mouse_buttons.get(&button).copied()
    }

    /// Action bound to cursor motion.
    #[must_use]
    pub fn mouse_movement_action(&self) -> Option<CameraAction> {
        self.mouse_movement
    }

    /// Action bound to the scroll wheel.
    #[must_use]
    pub fn scroll_action(&self) -> Option<CameraAction> {
        self.scroll
    }

    fn rebuild_lookup(&mut self) {
        self.keys.clear();
        self.mouse_buttons.clear();
        self.mouse_movement = None;
        self.scroll = None;
        for binding in &self.bindings {
            match &binding.source {
                BindingSource::Key(key) => {
                    let _ = self.keys.insert(key.clone(), binding.action);
                }
                BindingSource::MouseButton(button) => {
                    let _ = self.mouse_buttons.insert(*button, binding.action);
                }
                BindingSource::MouseMovement => {
                    self.mouse_movement = Some(binding.action);
                }
                BindingSource::Scroll => self.scroll = Some(binding.action),
            }
        }
        log::debug!("rebuilt lookup for {} bindings", self.bindings.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_indices_are_dense() {
        for (i, action) in CameraAction::ALL.iter().enumerate() {
            assert_eq!(action.index(), i);
        }
    }

    #[test]
    fn first_person_defaults_resolve() {
        let table = BindingTable::new(default_first_person_bindings());
        assert_eq!(table.key_action("KeyW"), Some(CameraAction::MoveForward));
        assert_eq!(
            table.key_action("ControlLeft"),
            Some(CameraAction::MoveDown)
        );
        assert_eq!(table.key_action("KeyQ"), None);
        assert_eq!(
            table.mouse_movement_action(),
            Some(CameraAction::RotateCamera)
        );
        assert_eq!(table.scroll_action(), Some(CameraAction::ZoomIn));
        assert_eq!(table.mouse_button_action(MouseButton::Left), None);
    }

    #[test]
    fn last_binding_for_a_source_wins() {
        let table = BindingTable::new(vec![
            InputBinding::key("KeyW", CameraAction::MoveForward),
            InputBinding::scroll(CameraAction::ZoomIn),
            InputBinding::key("KeyW", CameraAction::MoveUp),
            InputBinding::scroll(CameraAction::ZoomOut),
        ]);
        assert_eq!(table.key_action("KeyW"), Some(CameraAction::MoveUp));
        assert_eq!(table.scroll_action(), Some(CameraAction::ZoomOut));
        assert_eq!(table.bindings().len(), 4);
    }

    #[test]
    fn replacing_bindings_clears_old_lookups() {
        let mut table = BindingTable::new(default_first_person_bindings());
        table.set_bindings(default_orbital_bindings());
        assert_eq!(table.key_action("KeyW"), None);
        assert_eq!(table.mouse_movement_action(), None);
        assert_eq!(
            table.mouse_button_action(MouseButton::Left),
            Some(CameraAction::RotateCamera)
        );
    }
}
