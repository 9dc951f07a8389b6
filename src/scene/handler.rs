use glam::Vec3;

use super::target::{Background, FrameView, RenderTarget};
use crate::{
    asset::{AssetError, AssetFetch, AssetLoader},
    camera::{
        enforce_bounds, Camera, CameraPose, DragGesture, OrbitControls,
    },
    error::ShowcaseError,
    framing::{ModelFramer, ModelInfo},
    manifest::{Manifest, SceneDescriptor},
    model::Model,
    options::Options,
    points::{InteractivePoint, InteractivePointSet, PointHit},
};

/// Edge length of the placeholder cube.
const PLACEHOLDER_SIZE: f32 = 8.0;

/// Lifecycle of a [`SceneHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerState {
    /// Created, no render target yet.
    Uninitialized,
    /// Render target bound; a model may or may not be loaded.
    Initialized,
    /// Resources released. Terminal.
    Disposed,
}

/// One scene: its render target, camera, controls, model and markers.
///
/// Only an active handler accepts input and renders. The handler never
/// renders on its own; the owner calls [`frame`](Self::frame) once per
/// display refresh and the handler decides whether anything happens.
pub struct SceneHandler<T> {
    index: usize,
    descriptor: SceneDescriptor,
    state: HandlerState,
    active: bool,
    rendering: bool,
    target: Option<T>,
    camera: Camera,
    controls: OrbitControls,
    framer: ModelFramer,
    model: Option<Model>,
    model_info: Option<ModelInfo>,
    points: InteractivePointSet,
    initial_pose: Option<CameraPose>,
    background: Option<Background>,
    viewport: (u32, u32),
    min_height: f32,
    frames_rendered: u64,
}

impl<T: RenderTarget> SceneHandler<T> {
    /// Uninitialized handler for the scene at `index`.
    #[must_use]
    pub fn new(index: usize, descriptor: SceneDescriptor, options: &Options) -> Self {
        Self {
            index,
            descriptor,
            state: HandlerState::Uninitialized,
            active: false,
            rendering: false,
            target: None,
            camera: Camera::from_options(&options.camera, 1.0),
            controls: OrbitControls::new(&options.controls),
            framer: ModelFramer::new(&options.framing, &options.skybox),
            model: None,
            model_info: None,
            points: InteractivePointSet::new(&options.interaction),
            initial_pose: None,
            background: None,
            viewport: (1, 1),
            min_height: options.camera_bounds.min_height,
            frames_rendered: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Bind the render target and capture the initial camera pose.
    ///
    /// Only the first call on an uninitialized handler has any effect;
    /// later targets are dropped unused. Returns whether the target was
    /// bound.
    pub fn init(&mut self, mut target: T, width: u32, height: u32) -> bool {
        if self.state != HandlerState::Uninitialized {
            return false;
        }
        self.viewport = (width.max(1), height.max(1));
        self.camera.resize(width, height);
        target.resize(width, height);
        if let Some(background) = &self.background {
            target.set_background(background);
        }
        self.target = Some(target);
        self.controls.enabled = false;
        self.controls.target = self.camera.target;
        // Never zoom out past the skybox shell.
        let (min, max) = self.controls.distance_limits();
        self.controls.set_distance_limits(min, max.min(self.framer.ceiling()));
        self.initial_pose = Some(self.camera.pose());
        self.state = HandlerState::Initialized;
        true
    }

    /// Load this scene's model, substituting the placeholder cube when
    /// every path variant fails.
    pub async fn load_model<F: AssetFetch>(
        &mut self,
        loader: &AssetLoader<F>,
    ) -> ModelInfo {
        let path = self.descriptor.model_path.clone();
        let result = loader.load(&path).await;
        self.install_loaded(result)
    }

    /// Install a finished load, or the placeholder when it failed.
    pub fn install_loaded(&mut self, result: Result<Model, AssetError>) -> ModelInfo {
        match result {
            Ok(model) => self.install_model(model),
            Err(e) => {
                log::error!(
                    "failed to load model for scene {}: {e}",
                    self.index
                );
                self.install_placeholder()
            }
        }
    }

    /// Frame and install `model`, replacing and releasing any previous
    /// one, then re-frame the camera and rebuild the markers.
    pub fn install_model(&mut self, mut model: Model) -> ModelInfo {
        let info = self.framer.frame_or_fallback(&mut model);
        self.replace_model(model, info);
        info
    }

    /// Install the placeholder cube in this scene's fallback color.
    pub fn install_placeholder(&mut self) -> ModelInfo {
        let model = Model::placeholder(
            PLACEHOLDER_SIZE,
            Manifest::fallback_color(self.index),
        );
        self.replace_model(model, ModelInfo::PLACEHOLDER);
        ModelInfo::PLACEHOLDER
    }

    fn replace_model(&mut self, model: Model, info: ModelInfo) {
        if let Some(target) = &mut self.target {
            if self.model.is_some() {
                target.release_model();
            }
            target.install_model(&model);
        }
        self.model = Some(model);
        self.model_info = Some(info);
        self.update_camera_for_model();
        self.add_interactive_points();
        log::info!("scene {} model ready: {info:?}", self.index);
    }

    /// Move the camera to a distance suited to the installed model, keeping
    /// the direction of the current reference pose, and reset orbit limits.
    fn update_camera_for_model(&mut self) {
        let Some(max_dim) = self.model_max_dimension() else {
            return;
        };
        let distance = self.framer.camera_distance(max_dim);
        let direction = self
            .initial_pose
            .map(|pose| pose.position.normalize_or_zero())
            .filter(|dir| *dir != Vec3::ZERO)
            .unwrap_or_else(|| Vec3::new(1.0, 0.3, 1.0).normalize());

        let (min, max) = self.framer.framing_limits(max_dim);
        self.controls.set_distance_limits(min, max);
        self.controls.apply_pose(
            &mut self.camera,
            CameraPose {
                position: direction * distance,
                target: Vec3::ZERO,
            },
        );
        self.controls.update(&mut self.camera);
        self.initial_pose = Some(self.camera.pose());
    }

    /// Rebuild the markers from the scene's configured points.
    pub fn add_interactive_points(&mut self) {
        if let Some(target) = &mut self.target {
            if !self.points.is_empty() {
                target.release_points();
            }
        }
        self.points.rebuild(&self.descriptor.points, self.index);
        if self.points.is_empty() {
            log::warn!("no points configured for scene {}", self.index);
            return;
        }
        log::info!(
            "created {} interactive points for scene {}",
            self.points.len(),
            self.index
        );
        if let Some(model) = &self.model {
            self.points.sync_to(&model.transform);
        }
        if let Some(target) = &mut self.target {
            target.install_points(&self.points);
        }
    }

    /// Tighten orbit limits to the installed model's current size.
    pub fn update_zoom_constraints(&mut self) {
        if let Some(max_dim) = self.model_max_dimension() {
            let (min, max) = self.framer.zoom_limits(max_dim);
            self.controls.set_distance_limits(min, max);
        }
    }

    /// Turn input and the frame loop on or off. Returns whether anything
    /// changed.
    pub fn set_active(&mut self, active: bool) -> bool {
        if self.active == active || self.state == HandlerState::Disposed {
            return false;
        }
        self.active = active;
        self.controls.enabled = active;
        self.rendering = active && self.state == HandlerState::Initialized;
        if active {
            log::info!("scene {} activated", self.index);
        } else {
            log::info!("scene {} deactivated", self.index);
        }
        true
    }

    /// Run one iteration of the frame loop: follow the model with the
    /// markers, apply damped controls, keep the camera in bounds and
    /// render. Returns `Ok(false)` without doing anything when the loop is
    /// not running.
    pub fn frame(&mut self) -> Result<bool, ShowcaseError> {
        if !self.rendering {
            return Ok(false);
        }
        if let Some(model) = &self.model {
            self.points.sync_to(&model.transform);
        }
        self.controls.update(&mut self.camera);
        let _ = enforce_bounds(
            &mut self.camera.eye,
            self.framer.ceiling(),
            self.min_height,
        );
        self.render()?;
        Ok(true)
    }

    fn render(&mut self) -> Result<(), ShowcaseError> {
        let Some(target) = &mut self.target else {
            return Ok(());
        };
        target.render(&FrameView {
            view_proj: self.camera.build_matrix(),
            eye: self.camera.eye,
            model: self.model.as_ref(),
            points: &self.points,
        })?;
        self.frames_rendered += 1;
        Ok(())
    }

    /// Stop rendering and release every resource. Safe to call in any
    /// state, any number of times.
    pub fn dispose(&mut self) {
        if self.state == HandlerState::Disposed {
            return;
        }
        let _ = self.set_active(false);
        self.rendering = false;
        if let Some(mut target) = self.target.take() {
            if self.model.is_some() {
                target.release_model();
            }
            if !self.points.is_empty() {
                target.release_points();
            }
            target.release();
        }
        self.model = None;
        self.points.clear();
        self.state = HandlerState::Disposed;
        log::debug!("scene {} disposed", self.index);
    }

    // -----------------------------------------------------------------------
    // Interaction
    // -----------------------------------------------------------------------

    /// Toggle a marker's highlight color.
    pub fn highlight_point(&mut self, index: usize, on: bool) -> bool {
        self.points.highlight(index, on)
    }

    /// Restore the camera to the pose captured at init or after the last
    /// framing.
    pub fn reset_camera(&mut self) {
        if let Some(pose) = self.initial_pose {
            self.controls.apply_pose(&mut self.camera, pose);
            self.controls.update(&mut self.camera);
        }
    }

    /// Move the camera to `pose` without changing the reset pose.
    pub fn set_camera_pose(&mut self, pose: CameraPose) {
        self.controls.apply_pose(&mut self.camera, pose);
    }

    /// The viewport changed size. Re-renders immediately when active.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        if self.state != HandlerState::Initialized {
            return;
        }
        self.viewport = (width.max(1), height.max(1));
        self.camera.resize(width, height);
        if let Some(target) = &mut self.target {
            target.resize(width, height);
        }
        if self.active {
            if let Err(e) = self.render() {
                log::warn!("scene {} resize redraw failed: {e}", self.index);
            }
        }
    }

    /// Change the background and forward it to the target.
    pub fn set_background(&mut self, background: &Background) {
        if let Some(target) = &mut self.target {
            target.set_background(background);
        }
        self.background = Some(background.clone());
    }

    /// Apply a pointer drag to the controls.
    pub fn drag(&mut self, gesture: DragGesture) {
        let height = self.viewport.1 as f32;
        match gesture {
            DragGesture::Orbit(delta) => self.controls.rotate(delta, height),
            DragGesture::Pan(delta) => {
                self.controls.pan(delta, &self.camera, height);
            }
        }
    }

    /// Apply a wheel dolly to the controls.
    pub fn dolly(&mut self, amount: f32) {
        self.controls.dolly(amount);
    }

    /// Marker under a pixel of the viewport, if any.
    #[must_use]
    pub fn pick_point(&self, x: f32, y: f32) -> Option<PointHit> {
        let (width, height) = self.viewport;
        let ndc_x = x / width as f32 * 2.0 - 1.0;
        let ndc_y = 1.0 - y / height as f32 * 2.0;
        self.points.pick(&self.camera.ray_from_ndc(ndc_x, ndc_y))
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Position of this scene in the manifest.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Static description of this scene.
    #[must_use]
    pub fn descriptor(&self) -> &SceneDescriptor {
        &self.descriptor
    }

    /// Lifecycle state.
    #[must_use]
    pub fn state(&self) -> HandlerState {
        self.state
    }

    /// Whether a render target is bound.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.state == HandlerState::Initialized
    }

    /// Whether this scene accepts input and renders.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the frame loop is running.
    #[must_use]
    pub fn is_rendering(&self) -> bool {
        self.rendering
    }

    /// Whether a model (or the placeholder) is installed.
    #[must_use]
    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Installed model.
    #[must_use]
    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    /// Sizes recorded by the last framing.
    #[must_use]
    pub fn model_info(&self) -> Option<ModelInfo> {
        self.model_info
    }

    /// Markers, in index order.
    #[must_use]
    pub fn interactive_points(&self) -> &[InteractivePoint] {
        self.points.points()
    }

    /// Camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Orbit controls.
    #[must_use]
    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    /// Reference pose restored by [`reset_camera`](Self::reset_camera).
    #[must_use]
    pub fn initial_pose(&self) -> Option<CameraPose> {
        self.initial_pose
    }

    /// Bound render target.
    #[must_use]
    pub fn target(&self) -> Option<&T> {
        self.target.as_ref()
    }

    /// Frames rendered since creation.
    #[must_use]
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    fn model_max_dimension(&self) -> Option<f32> {
        self.model
            .as_ref()
            .and_then(Model::world_bounds)
            .map(|b| b.max_dimension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        manifest::PointDescriptor,
        scene::testing::{triangle_glb, CountingFetcher, RecordingTarget},
    };

    fn descriptor(points: usize) -> SceneDescriptor {
        SceneDescriptor {
            id: "model1".into(),
            container: Some("container1".into()),
            model_path: "/models/model1.glb".into(),
            points: (0..points)
                .map(|i| PointDescriptor {
                    position: [i as f32, 0.0, 0.0],
                    label: format!("point {i}"),
                    info: "info".into(),
                })
                .collect(),
            ..SceneDescriptor::default()
        }
    }

    fn handler(points: usize) -> SceneHandler<RecordingTarget> {
        let mut handler = SceneHandler::new(0, descriptor(points), &Options::default());
        assert!(handler.init(RecordingTarget::default(), 800, 600));
        handler
    }

    #[test]
    fn init_is_idempotent() {
        let mut handler = handler(0);
        let pose = handler.initial_pose();
        assert!(pose.is_some());
        assert!(!handler.init(RecordingTarget::default(), 10, 10));
        assert_eq!(handler.target().unwrap().size, (800, 600));
        assert_eq!(handler.initial_pose(), pose);
    }

    #[test]
    fn failed_load_installs_placeholder() {
        let mut handler = handler(2);
        let loader = AssetLoader::new(CountingFetcher::default());
        let info = pollster::block_on(handler.load_model(&loader));
        assert_eq!(info, ModelInfo::PLACEHOLDER);
        assert!(handler.has_model());
        assert_eq!(handler.model().unwrap().name, "placeholder");
        assert_eq!(
            handler.model().unwrap().nodes[0].color,
            Manifest::fallback_color(0)
        );
        assert_eq!(handler.interactive_points().len(), 2);
    }

    #[test]
    fn successful_load_frames_model() {
        let mut handler = handler(1);
        let fetcher = CountingFetcher::default()
            .with_file("/models/model1.glb", triangle_glb());
        let loader = AssetLoader::new(fetcher);
        let info = pollster::block_on(handler.load_model(&loader));
        assert_eq!(info.scale_factor, 15.0);
        let bounds = handler.model().unwrap().world_bounds().unwrap();
        assert!(bounds.center().length() < 1e-4);
        assert_eq!(loader.fetcher().attempts(), 1);
    }

    #[test]
    fn reinstall_releases_previous_model() {
        let mut handler = handler(3);
        let _ = handler.install_placeholder();
        let _ = handler.install_placeholder();
        let target = handler.target().unwrap();
        assert_eq!(target.models_installed, 2);
        assert_eq!(target.models_released, 1);
        assert_eq!(target.points_released, 1);
        assert_eq!(target.installed_points, 3);
        assert_eq!(handler.interactive_points().len(), 3);
    }

    #[test]
    fn camera_keeps_direction_when_reframed() {
        let mut handler = handler(0);
        let before = handler.initial_pose().unwrap().position.normalize();
        let _ = handler.install_placeholder();
        let pose = handler.initial_pose().unwrap();
        assert!(pose.position.normalize().dot(before) > 0.9999);
        assert_eq!(pose.target, Vec3::ZERO);
        // 8-unit cube: distance is the framing floor.
        assert!((pose.position.length() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn frame_only_runs_while_active() {
        let mut handler = handler(0);
        let _ = handler.install_placeholder();
        assert!(!handler.frame().unwrap());
        assert!(handler.set_active(true));
        assert!(!handler.set_active(true));
        assert!(handler.controls().enabled);
        assert!(handler.frame().unwrap());
        assert!(handler.frame().unwrap());
        assert!(handler.set_active(false));
        assert!(!handler.frame().unwrap());
        assert_eq!(handler.frames_rendered(), 2);
        assert!(!handler.controls().enabled);
    }

    #[test]
    fn frame_enforces_floor() {
        let mut handler = handler(0);
        let _ = handler.install_placeholder();
        let _ = handler.set_active(true);
        handler.controls.apply_pose(
            &mut handler.camera,
            CameraPose {
                position: Vec3::new(5.0, -20.0, 5.0),
                target: Vec3::ZERO,
            },
        );
        let _ = handler.frame().unwrap();
        assert!(handler.camera().eye.y >= 0.5 - 1e-6);
    }

    #[test]
    fn init_caps_zoom_at_skybox_ceiling() {
        let options = Options::default();
        let ceiling = options.skybox.distance_ceiling();
        assert!(options.controls.max_distance > ceiling);

        let handler = handler(0);
        let (min, max) = handler.controls().distance_limits();
        assert!((max - ceiling).abs() < 1e-3);
        assert!(min <= max);
    }

    #[test]
    fn highlight_toggle_restores_color() {
        let mut handler = handler(2);
        let _ = handler.install_placeholder();
        let original = handler.interactive_points()[1].color;
        assert!(handler.highlight_point(1, true));
        assert!(handler.highlight_point(1, false));
        assert_eq!(handler.interactive_points()[1].color, original);
        assert!(!handler.highlight_point(9, true));
    }

    #[test]
    fn reset_camera_restores_pose() {
        let mut handler = handler(0);
        let _ = handler.install_placeholder();
        let _ = handler.set_active(true);
        handler.drag(DragGesture::Orbit(glam::Vec2::new(120.0, 30.0)));
        for _ in 0..10 {
            let _ = handler.frame().unwrap();
        }
        let pose = handler.initial_pose().unwrap();
        assert_ne!(handler.camera().eye, pose.position);
        handler.reset_camera();
        assert!((handler.camera().eye - pose.position).length() < 1e-3);
    }

    #[test]
    fn dispose_is_idempotent_and_stops_loop() {
        let mut handler = handler(1);
        let _ = handler.install_placeholder();
        let _ = handler.set_active(true);
        assert!(handler.frame().unwrap());
        handler.dispose();
        handler.dispose();
        assert_eq!(handler.state(), HandlerState::Disposed);
        assert!(!handler.is_active());
        assert!(!handler.frame().unwrap());
        assert!(!handler.set_active(true));
        assert!(handler.target().is_none());
        assert_eq!(handler.frames_rendered(), 1);
    }

    #[test]
    fn dispose_without_init_is_safe() {
        let mut handler: SceneHandler<RecordingTarget> =
            SceneHandler::new(0, descriptor(0), &Options::default());
        handler.dispose();
        assert_eq!(handler.state(), HandlerState::Disposed);
    }

    #[test]
    fn background_set_before_init_reaches_target() {
        let mut handler: SceneHandler<RecordingTarget> =
            SceneHandler::new(0, descriptor(0), &Options::default());
        handler.set_background(&Background::Color([0.1, 0.2, 0.3]));
        let _ = handler.init(RecordingTarget::default(), 4, 4);
        assert_eq!(
            handler.target().unwrap().background,
            Some(Background::Color([0.1, 0.2, 0.3]))
        );
    }

    #[test]
    fn zoom_constraints_follow_model_size() {
        let mut handler = handler(0);
        let _ = handler.install_placeholder();
        handler.update_zoom_constraints();
        assert_eq!(handler.controls().distance_limits(), (0.8, 80.0));
    }

    #[test]
    fn picking_hits_marker_at_screen_center() {
        let mut handler = handler(1);
        let _ = handler.install_placeholder();
        // Aim the camera straight at the single marker.
        let marker = handler.points.world_position(0).unwrap();
        handler.controls.apply_pose(
            &mut handler.camera,
            CameraPose {
                position: marker + Vec3::new(0.0, 0.0, 50.0),
                target: marker,
            },
        );
        let hit = handler.pick_point(400.0, 300.0).unwrap();
        assert_eq!(hit.point_index, 0);
        assert!(handler.pick_point(0.0, 0.0).is_none());
    }
}
