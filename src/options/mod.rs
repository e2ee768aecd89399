//! Camera and input options with TOML support.
//!
//! All tweakable settings (camera lens and control parameters, per-controller
//! bindings) are consolidated here. Options serialize to and from TOML
//! strings; where those strings are stored is up to the caller.

mod camera;
mod keybindings;

pub use camera::CameraOptions;
pub use keybindings::KeybindingOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::VantageError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML (e.g. only overriding `[camera]`) works correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Camera projection and control parameters.
    pub camera: CameraOptions,
    /// Input bindings per controller kind.
    #[schemars(skip)]
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from TOML. Missing fields use defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, VantageError> {
        toml::from_str(content)
            .map_err(|e| VantageError::OptionsParse(e.to_string()))
    }

    /// Render options as pretty-printed TOML.
    pub fn to_toml_string(&self) -> Result<String, VantageError> {
        toml::to_string_pretty(self)
            .map_err(|e| VantageError::OptionsParse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::bindings::{CameraAction, InputBinding};
    use crate::camera::{CameraMode, ProjectionType};
    use crate::input::MouseButton;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = opts.to_toml_string().unwrap();
        let parsed = Options::from_toml_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[camera]
field_of_view = 60.0
mode = "orbital"
"#;
        let opts = Options::from_toml_str(toml_str).unwrap();
        assert_eq!(opts.camera.field_of_view, 60.0);
        assert_eq!(opts.camera.mode, CameraMode::Orbital);
        // Everything else should be default
        assert_eq!(opts.camera.near_plane, 0.1);
        assert_eq!(opts.camera.projection_type, ProjectionType::Perspective);
        assert_eq!(opts.keybindings, KeybindingOptions::default());
    }

    #[test]
    fn bindings_parse_from_toml() {
        let toml_str = r#"
[[keybindings.orbital]]
action = "rotate_camera"
source = { mouse_button = "right" }

[[keybindings.orbital]]
action = "zoom_in"
source = "scroll"
"#;
        let opts = Options::from_toml_str(toml_str).unwrap();
        assert_eq!(
            opts.keybindings.orbital,
            vec![
                InputBinding::mouse_button(
                    MouseButton::Right,
                    CameraAction::RotateCamera
                ),
                InputBinding::scroll(CameraAction::ZoomIn),
            ]
        );
        assert_eq!(
            opts.keybindings.for_mode(CameraMode::Free),
            opts.keybindings.first_person.as_slice()
        );
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let err = Options::from_toml_str("[camera]\nfield_of_view = \"wide\"")
            .unwrap_err();
        assert!(matches!(err, VantageError::OptionsParse(_)));
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("camera"));
        assert!(!props.contains_key("keybindings"));

        let camera = &props["camera"]["properties"];
        assert!(camera.get("field_of_view").is_some());
        assert!(camera.get("mouse_sensitivity").is_some());
        assert!(camera.get("aspect_ratio").is_none());
    }
}
