//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, growable buffers, texture
//! creation, and bind group layout helpers shared by the scene renderer.

/// Growable GPU buffers with automatic reallocation.
pub mod dynamic_buffer;
/// Shared wgpu boilerplate for bind group layouts, samplers and shaders.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// Depth and sampled texture creation.
pub mod texture;

pub use render_context::{RenderContext, RenderContextError};
