use std::sync::Arc;

use glam::{Mat4, Vec3};

use crate::{
    error::ShowcaseError, model::Model, points::InteractivePointSet,
    theme::SkyboxImage,
};

/// What a scene draws behind its model.
#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    /// Flat clear color.
    Color([f32; 3]),
    /// Equirectangular skybox texture.
    Skybox(Arc<SkyboxImage>),
}

/// Per-frame state handed to [`RenderTarget::render`].
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    /// Combined view-projection matrix.
    pub view_proj: Mat4,
    /// Camera position.
    pub eye: Vec3,
    /// Installed model, with its current root transform.
    pub model: Option<&'a Model>,
    /// Markers, with their current transform and colors.
    pub points: &'a InteractivePointSet,
}

/// Exclusive rendering surface owned by one scene.
///
/// A scene installs resources when its content changes and releases them
/// before replacing them; nothing is shared between targets.
pub trait RenderTarget {
    /// Upload a model's geometry, replacing nothing (the scene releases the
    /// previous model first).
    fn install_model(&mut self, model: &Model);

    /// Free the installed model's resources, if any.
    fn release_model(&mut self);

    /// Upload marker instances.
    fn install_points(&mut self, points: &InteractivePointSet);

    /// Free marker resources, if any.
    fn release_points(&mut self);

    /// Change what is drawn behind the model.
    fn set_background(&mut self, background: &Background);

    /// The viewport changed size.
    fn resize(&mut self, width: u32, height: u32);

    /// Draw one frame.
    fn render(&mut self, frame: &FrameView<'_>) -> Result<(), ShowcaseError>;

    /// Free every remaining resource. The target is not used afterward.
    fn release(&mut self);
}
