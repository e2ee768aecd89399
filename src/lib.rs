// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Hierarchical transforms, spatial state and input-driven cameras for
//! real-time 3D.
//!
//! Vantage is the scene-side half of a small renderer: it owns where things
//! are and where they are seen from, and hands matrices to whatever draws
//! them.
//!
//! # Key entry points
//!
//! - [`transform::TransformTree`] - parent/child transforms with lazily
//!   cached world matrices
//! - [`spatial::Spatial`] - position plus yaw/pitch/roll with movement,
//!   orbiting, path following and interpolation
//! - [`camera::Camera`] - cached view/projection matrices, frustum culling
//!   and picking rays
//! - [`camera::CameraSystem`] - a camera and its controller fed by
//!   [`input::InputEvent`]s
//! - [`options::Options`] - camera settings and bindings as TOML
//!
//! # Architecture
//!
//! Input events reach a [`camera::CameraController`], which looks them up in
//! its binding table and moves the camera's [`spatial::Spatial`]. Every
//! spatial mutation takes a fresh, globally unique revision stamp; the camera
//! compares that stamp on the next matrix query and rebuilds its view only
//! when it changed. Projection changes go through the camera's own setters and mark
//! the projection stale directly.

pub mod camera;
pub mod error;
pub mod input;
pub mod options;
pub mod spatial;
pub mod transform;
pub mod util;

pub use camera::{Camera, CameraController, CameraSystem, CameraUniform};
pub use error::VantageError;
pub use input::{InputEvent, KeyState, MouseButton};
pub use options::Options;
pub use spatial::Spatial;
pub use transform::{Transform, TransformId, TransformTree};
