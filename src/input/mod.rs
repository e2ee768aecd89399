//! Platform-agnostic input events consumed by the camera system.
//!
//! Any windowing layer can construct [`InputEvent`]s directly; with the
//! `winit` feature, `InputEvent::from_window_event` converts winit's
//! window events.

/// Platform-agnostic input events.
pub mod event;

pub use event::{InputEvent, KeyState, MouseButton};
