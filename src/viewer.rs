//! Standalone winit window running the showcase.
//!
//! All scenes share one window and one wgpu surface; only the current scene
//! renders into it. Model loads run on a worker thread and come back as
//! user events, so the event loop never blocks on a model fetch. Skybox
//! images are small and load on the event-loop thread.

use std::{
    sync::{mpsc, Arc},
    thread,
};

use web_time::Instant;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::{
    asset::{AssetError, AssetLoader, AssetSource},
    error::ShowcaseError,
    gpu::RenderContext,
    input::{InputCommand, InputEvent, InputProcessor, KeyAction},
    interaction::InteractionHandler,
    manifest::Manifest,
    model::Model,
    options::Options,
    renderer::{GpuSceneTarget, ScenePipelines},
    scene::{LoadTicket, Navigation, SceneHandler, SceneManager},
    theme::{FileThemeStore, MemoryThemeStore, Theme, ThemeManager, ThemeStore},
};

/// Title shown when no panel or loading text is visible.
const BASE_TITLE: &str = "Atrium";
/// Share of the monitor the window initially covers.
const INITIAL_WINDOW_FRACTION: f64 = 0.75;
/// Pixel scroll to line scroll.
const PIXEL_SCROLL_SCALE: f32 = 0.01;

/// Everything the viewer needs to start.
pub struct ViewerConfig {
    /// Scenes to show.
    pub manifest: Manifest,
    /// Rendering and interaction constants.
    pub options: Options,
    /// Where models and skybox images come from.
    pub source: AssetSource,
    /// Scene shown first.
    pub start_scene: usize,
    /// Theme forced from the command line, stored like a user choice.
    pub theme: Option<Theme>,
}

/// Events sent to the event loop from the loader thread.
#[derive(Debug)]
pub enum ViewerEvent {
    /// A model requested by a navigation finished loading.
    ModelLoaded {
        /// Navigation that asked for the model.
        ticket: LoadTicket,
        /// Loaded model or the aggregated failure.
        result: Result<Model, AssetError>,
    },
}

/// Window application. Create with [`Viewer::new`] and start with
/// [`Viewer::run`].
pub struct Viewer {
    config: ViewerConfig,
    loader: Arc<AssetLoader<AssetSource>>,
    loads: Option<mpsc::Sender<LoadTicket>>,
    state: Option<ViewerState>,
    error: Option<ShowcaseError>,
}

/// Live state, created once the window exists.
struct ViewerState {
    window: Arc<Window>,
    scenes: SceneManager<GpuSceneTarget>,
    ui: InteractionHandler,
    themes: ThemeManager<Box<dyn ThemeStore>>,
    input: InputProcessor,
    title: String,
}

impl Viewer {
    /// Viewer for the given configuration.
    #[must_use]
    pub fn new(config: ViewerConfig) -> Self {
        let loader = Arc::new(AssetLoader::new(config.source.clone()));
        Self {
            config,
            loader,
            loads: None,
            state: None,
            error: None,
        }
    }

    /// Open the window and run until it closes.
    ///
    /// # Errors
    ///
    /// Returns [`ShowcaseError`] if the event loop or loader thread cannot
    /// start, or if GPU initialization fails.
    pub fn run(mut self) -> Result<(), ShowcaseError> {
        let event_loop = EventLoop::<ViewerEvent>::with_user_event()
            .build()
            .map_err(|e| ShowcaseError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Wait);

        self.loads = Some(spawn_loader(
            Arc::clone(&self.loader),
            event_loop.create_proxy(),
        )?);

        event_loop
            .run_app(&mut self)
            .map_err(|e| ShowcaseError::Viewer(e.to_string()))?;
        self.error.map_or(Ok(()), Err)
    }

    fn create_state(
        &self,
        event_loop: &ActiveEventLoop,
    ) -> Result<ViewerState, ShowcaseError> {
        let window = Arc::new(
            event_loop
                .create_window(window_attributes(event_loop))
                .map_err(|e| ShowcaseError::Viewer(e.to_string()))?,
        );
        let size = window.inner_size();
        let size = (size.width, size.height);

        let context =
            Arc::new(pollster::block_on(RenderContext::new(Arc::clone(&window), size))?);
        let pipelines = Arc::new(ScenePipelines::new(&context));

        let options = &self.config.options;
        let mut scenes = SceneManager::from_manifest(
            &self.config.manifest,
            options,
            size,
            |_, _| {
                Some(GpuSceneTarget::new(
                    Arc::clone(&context),
                    Arc::clone(&pipelines),
                    &options.lighting,
                    &options.skybox,
                ))
            },
        );
        log::info!(
            "{} of {} scenes ready",
            (0..scenes.len())
                .filter(|&i| scenes.handler(i).is_some_and(SceneHandler::is_initialized))
                .count(),
            scenes.len()
        );

        let store: Box<dyn ThemeStore> = match FileThemeStore::default_location() {
            Some(store) => Box::new(store),
            None => {
                log::warn!("no config directory, theme choice will not persist");
                Box::new(MemoryThemeStore::default())
            }
        };
        let ambient = window.theme().map(from_window_theme);
        let mut themes = ThemeManager::new(&options.theme, store, ambient);
        pollster::block_on(async {
            themes.preload(&self.loader).await;
            match self.config.theme {
                Some(theme) if theme != themes.current() => {
                    themes.set_theme(theme, &self.loader, &mut scenes).await;
                }
                _ => themes.apply(&self.loader, &mut scenes).await,
            }
        });

        Ok(ViewerState {
            window,
            scenes,
            ui: InteractionHandler::new(&self.config.manifest, &options.interaction),
            themes,
            input: InputProcessor::new(options.keybindings.clone()),
            title: String::new(),
        })
    }

    fn navigate(&mut self, index: usize) {
        let Some(state) = &mut self.state else {
            return;
        };
        match state.scenes.begin_navigation(index, &mut state.ui) {
            Navigation::NeedsModel(ticket) => {
                let sent = self
                    .loads
                    .as_ref()
                    .is_some_and(|loads| loads.send(ticket).is_ok());
                if !sent {
                    log::error!("model loader is gone, scene {index} stays empty");
                }
            }
            Navigation::Ready => {}
            Navigation::Ignored => log::debug!("navigation to {index} ignored"),
        }
        state.window.request_redraw();
    }

    fn execute(&mut self, command: InputCommand) {
        let Some(state) = &mut self.state else {
            return;
        };
        match command {
            InputCommand::Drag(gesture) => {
                if let Some(handler) = state.scenes.current_mut() {
                    handler.drag(gesture);
                }
            }
            InputCommand::Dolly(amount) => {
                if let Some(handler) = state.scenes.current_mut() {
                    handler.dolly(amount);
                }
            }
            InputCommand::Click(position) => {
                let _ = state.ui.click(
                    &mut state.scenes,
                    position.x,
                    position.y,
                    Instant::now(),
                );
            }
            InputCommand::Action(KeyAction::NextScene) => {
                if let Some(next) = state.scenes.next_index() {
                    self.navigate(next);
                }
                return;
            }
            InputCommand::Action(KeyAction::PreviousScene) => {
                if let Some(previous) = state.scenes.previous_index() {
                    self.navigate(previous);
                }
                return;
            }
            InputCommand::Action(KeyAction::ToggleTheme) => {
                let _ = pollster::block_on(
                    state.themes.toggle(&self.loader, &mut state.scenes),
                );
            }
            InputCommand::Action(KeyAction::ResetCamera) => {
                if let Some(handler) = state.scenes.current_mut() {
                    handler.reset_camera();
                }
            }
            InputCommand::Action(KeyAction::ClosePanel) => state.ui.close_all(),
            InputCommand::GoTo(index) => {
                self.navigate(index);
                return;
            }
        }
        state.window.request_redraw();
    }

    fn handle_input(&mut self, event: InputEvent) {
        let command = self
            .state
            .as_mut()
            .and_then(|state| state.input.handle_event(event));
        if let Some(command) = command {
            self.execute(command);
        }
    }

    fn handle_key(&mut self, key: &str) {
        let command = self
            .state
            .as_ref()
            .and_then(|state| state.input.handle_key_press(key));
        if let Some(command) = command {
            self.execute(command);
        }
    }

    fn redraw(&mut self) {
        let Some(state) = &mut self.state else {
            return;
        };
        let _ = state.ui.tick(&mut state.scenes, Instant::now());
        if let Err(e) = state.scenes.frame() {
            log::error!("render error: {e}");
        }
        if state.scenes.current().is_some_and(SceneHandler::is_rendering) {
            state.window.request_redraw();
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            state.scenes.dispose();
            state.themes.dispose();
        }
        // Dropping the sender ends the loader thread.
        self.loads = None;
        event_loop.exit();
    }
}

impl ApplicationHandler<ViewerEvent> for Viewer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match self.create_state(event_loop) {
            Ok(state) => {
                self.state = Some(state);
                self.navigate(self.config.start_scene);
            }
            Err(e) => {
                log::error!("could not start viewer: {e}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: ViewerEvent) {
        let ViewerEvent::ModelLoaded { ticket, result } = event;
        if let Some(state) = &mut self.state {
            let _ = state.scenes.complete_navigation(&ticket, result, &mut state.ui);
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),

            WindowEvent::Resized(size) => {
                if let Some(state) = &mut self.state {
                    state.scenes.on_resize(size.width, size.height);
                }
            }

            WindowEvent::Occluded(occluded) => {
                if let Some(state) = &mut self.state {
                    if occluded {
                        state.scenes.suspend();
                    } else {
                        state.scenes.resume();
                        state.window.request_redraw();
                    }
                }
            }

            WindowEvent::ThemeChanged(theme) => {
                if let Some(state) = &mut self.state {
                    let _ = pollster::block_on(state.themes.follow_system(
                        from_window_theme(theme),
                        &self.loader,
                        &mut state.scenes,
                    ));
                }
            }

            WindowEvent::RedrawRequested => self.redraw(),

            WindowEvent::CursorMoved { position, .. } => {
                self.handle_input(InputEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }

            WindowEvent::MouseInput { button, state, .. } => {
                self.handle_input(InputEvent::MouseButton {
                    button: button.into(),
                    pressed: state == ElementState::Pressed,
                });
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => {
                        pos.y as f32 * PIXEL_SCROLL_SCALE
                    }
                };
                self.handle_input(InputEvent::Scroll { delta });
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.handle_input(InputEvent::ModifiersChanged {
                    shift: modifiers.state().shift_key(),
                });
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed && !event.repeat {
                    if let PhysicalKey::Code(code) = event.physical_key {
                        self.handle_key(&format!("{code:?}"));
                    }
                }
            }

            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = &mut self.state else {
            return;
        };
        if state.ui.tick(&mut state.scenes, Instant::now()) {
            state.window.request_redraw();
        }

        let title = state.ui.status_line().map_or_else(
            || BASE_TITLE.to_owned(),
            |status| format!("{BASE_TITLE} | {status}"),
        );
        if title != state.title {
            state.window.set_title(&title);
            state.title = title;
        }

        event_loop.set_control_flow(
            state
                .ui
                .next_deadline()
                .map_or(ControlFlow::Wait, ControlFlow::WaitUntil),
        );
    }
}

fn window_attributes(
    event_loop: &ActiveEventLoop,
) -> winit::window::WindowAttributes {
    let attrs = Window::default_attributes().with_title(BASE_TITLE);
    let Some(monitor) = event_loop
        .primary_monitor()
        .or_else(|| event_loop.available_monitors().next())
    else {
        return attrs;
    };
    let size = monitor.size();
    let scale = monitor.scale_factor();
    attrs.with_inner_size(winit::dpi::LogicalSize::new(
        f64::from(size.width) / scale * INITIAL_WINDOW_FRACTION,
        f64::from(size.height) / scale * INITIAL_WINDOW_FRACTION,
    ))
}

const fn from_window_theme(theme: winit::window::Theme) -> Theme {
    match theme {
        winit::window::Theme::Dark => Theme::Dark,
        winit::window::Theme::Light => Theme::Light,
    }
}

/// Load models one at a time on a worker thread, posting each result back
/// to the event loop. The thread exits when the sender is dropped or the
/// event loop is gone.
fn spawn_loader(
    loader: Arc<AssetLoader<AssetSource>>,
    proxy: EventLoopProxy<ViewerEvent>,
) -> Result<mpsc::Sender<LoadTicket>, ShowcaseError> {
    let (sender, receiver) = mpsc::channel::<LoadTicket>();
    let _handle = thread::Builder::new()
        .name("atrium-loader".into())
        .spawn(move || {
            for ticket in receiver {
                log::debug!(
                    "loading {} for scene {}",
                    ticket.model_path,
                    ticket.scene_index
                );
                let result = pollster::block_on(loader.load(&ticket.model_path));
                if proxy
                    .send_event(ViewerEvent::ModelLoaded { ticket, result })
                    .is_err()
                {
                    break;
                }
            }
        })?;
    Ok(sender)
}
