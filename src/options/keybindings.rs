use serde::{Deserialize, Serialize};

use crate::camera::bindings::{
    default_first_person_bindings, default_orbital_bindings, InputBinding,
};
use crate::camera::CameraMode;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Configurable input bindings, one list per controller kind.
pub struct KeybindingOptions {
    /// Bindings installed on first-person controllers.
    pub first_person: Vec<InputBinding>,
    /// Bindings installed on orbital controllers.
    pub orbital: Vec<InputBinding>,
}

impl Default for KeybindingOptions {
    fn default() -> Self {
        Self {
            first_person: default_first_person_bindings(),
            orbital: default_orbital_bindings(),
        }
    }
}

impl KeybindingOptions {
    /// The list for a controller of the given mode.
    ///
    /// Modes without a dedicated controller fall back to the first-person
    /// list, matching the controller they get.
    #[must_use]
    pub fn for_mode(&self, mode: CameraMode) -> &[InputBinding] {
        match mode {
            CameraMode::Orbital => &self.orbital,
            CameraMode::FirstPerson | CameraMode::Free => &self.first_person,
        }
    }
}
