//! Perspective camera, damped orbit controls and the skybox/floor bounds.

/// Skybox and floor constraints applied every active frame.
pub mod bounds;
/// Damped orbit controls.
pub mod controls;
/// Core camera struct, pose, picking ray and GPU uniform.
pub mod core;
/// Pointer click/drag discrimination.
pub mod input;

pub use self::core::{Camera, CameraPose, CameraUniform, Ray};
pub use bounds::enforce_bounds;
pub use controls::OrbitControls;
pub use input::{DragGesture, PointerButton, PointerState};
