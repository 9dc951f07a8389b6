use std::time::Duration;

use rand::seq::IndexedRandom;

use super::{
    handler::SceneHandler,
    target::{Background, RenderTarget},
};
use crate::{
    asset::{AssetError, AssetFetch, AssetLoader},
    error::ShowcaseError,
    manifest::{Manifest, SceneDescriptor},
    model::Model,
    options::Options,
};

/// Page chrome that navigation drives: info panels, the loading indicator
/// and the navigation buttons.
pub trait NavigationUi {
    /// Close every open info panel.
    fn close_panels(&mut self);
    /// Show the loading indicator, optionally with a fact to type out.
    fn show_loading(&mut self, fact: Option<&str>);
    /// Mark the navigation button for `index` as current.
    fn update_navigation(&mut self, index: usize);
    /// Hide the loading indicator once `delay` has passed.
    fn schedule_hide_loading(&mut self, delay: Duration);
}

/// A model load requested by [`SceneManager::begin_navigation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    /// Scene the model belongs to.
    pub scene_index: usize,
    /// Navigation generation that requested the load.
    pub generation: u64,
    /// Path to pass to the asset loader.
    pub model_path: String,
}

/// Outcome of starting a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Index out of range or scene skipped; nothing changed.
    Ignored,
    /// The target scene already had a model and is now active.
    Ready,
    /// The target scene needs its model; pass the result to
    /// [`SceneManager::complete_navigation`].
    NeedsModel(LoadTicket),
}

/// Ordered scenes, of which at most one is active.
///
/// Every navigation bumps a generation counter. A model load that resolves
/// after a newer navigation has started never activates its scene.
pub struct SceneManager<T> {
    handlers: Vec<Option<SceneHandler<T>>>,
    current: usize,
    generation: u64,
    suspended: bool,
    facts: Vec<String>,
    hide_delay: Duration,
}

impl<T: RenderTarget> SceneManager<T> {
    /// Create and initialize one handler per manifest scene.
    ///
    /// `create_target` is asked for each scene with a container; scenes
    /// without a container, or whose container yields no target, are
    /// skipped and can never be navigated to.
    pub fn from_manifest(
        manifest: &Manifest,
        options: &Options,
        (width, height): (u32, u32),
        mut create_target: impl FnMut(usize, &SceneDescriptor) -> Option<T>,
    ) -> Self {
        let handlers = manifest
            .scenes
            .iter()
            .enumerate()
            .map(|(index, descriptor)| {
                let Some(container) = &descriptor.container else {
                    log::warn!("scene {index} ({}) has no container, skipping", descriptor.id);
                    return None;
                };
                let Some(target) = create_target(index, descriptor) else {
                    log::error!("container {container} not found");
                    return None;
                };
                let mut handler = SceneHandler::new(index, descriptor.clone(), options);
                let _ = handler.init(target, width, height);
                Some(handler)
            })
            .collect();

        Self {
            handlers,
            current: 0,
            generation: 0,
            suspended: false,
            facts: manifest.facts.clone(),
            hide_delay: Duration::from_millis(options.navigation.loading_hide_delay_ms),
        }
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Navigate to `index`, loading its model through `loader` if needed.
    /// Returns whether the scene ended up active.
    pub async fn navigate_to<F: AssetFetch>(
        &mut self,
        index: usize,
        loader: &AssetLoader<F>,
        ui: &mut impl NavigationUi,
    ) -> bool {
        match self.begin_navigation(index, ui) {
            Navigation::Ignored => false,
            Navigation::Ready => true,
            Navigation::NeedsModel(ticket) => {
                let result = loader.load(&ticket.model_path).await;
                self.complete_navigation(&ticket, result, ui)
            }
        }
    }

    /// First half of a navigation: deactivate the current scene, reset the
    /// page chrome and either activate the target right away or ask for its
    /// model.
    pub fn begin_navigation(
        &mut self,
        index: usize,
        ui: &mut impl NavigationUi,
    ) -> Navigation {
        let Some(target_has_model) = self.handler(index).map(SceneHandler::has_model) else {
            return Navigation::Ignored;
        };
        log::info!("navigating to scene {index}");

        if let Some(current) = self.current_mut() {
            let _ = current.set_active(false);
        }
        ui.close_panels();
        let fact = self.facts.choose(&mut rand::rng()).map(String::as_str);
        ui.show_loading(fact);
        ui.update_navigation(index);
        self.current = index;
        self.generation += 1;

        if target_has_model {
            let _ = self.activate_current();
            ui.schedule_hide_loading(self.hide_delay);
            return Navigation::Ready;
        }
        let model_path = self.handlers[index]
            .as_ref()
            .map(|h| h.descriptor().model_path.clone())
            .unwrap_or_default();
        Navigation::NeedsModel(LoadTicket {
            scene_index: index,
            generation: self.generation,
            model_path,
        })
    }

    /// Second half of a navigation: install the loaded model (or the
    /// placeholder) and activate the scene.
    ///
    /// A ticket from a superseded navigation never activates anything. Its
    /// model is still kept if the scene has none yet, so the work is not
    /// wasted. Returns whether the scene was activated.
    pub fn complete_navigation(
        &mut self,
        ticket: &LoadTicket,
        result: Result<Model, AssetError>,
        ui: &mut impl NavigationUi,
    ) -> bool {
        let stale = ticket.generation != self.generation;
        let Some(handler) = self.handler_mut(ticket.scene_index) else {
            return false;
        };
        if stale {
            if handler.has_model() {
                log::debug!(
                    "discarding stale load for scene {} (generation {})",
                    ticket.scene_index,
                    ticket.generation
                );
            } else {
                log::debug!(
                    "keeping stale load for scene {} without activating",
                    ticket.scene_index
                );
                let _ = handler.install_loaded(result);
            }
            return false;
        }

        let _ = handler.install_loaded(result);
        let activated = self.activate_current();
        ui.schedule_hide_loading(self.hide_delay);
        activated
    }

    fn activate_current(&mut self) -> bool {
        if self.suspended {
            return false;
        }
        let Some(handler) = self.current_mut() else {
            return false;
        };
        handler.update_zoom_constraints();
        let _ = handler.set_active(true);
        log::info!(
            "scene {} has {} interactive points",
            handler.index(),
            handler.interactive_points().len()
        );
        true
    }

    /// Index one step after the current scene, if any scene follows.
    #[must_use]
    pub fn next_index(&self) -> Option<usize> {
        (self.current + 1..self.handlers.len()).find(|&i| self.handlers[i].is_some())
    }

    /// Index one step before the current scene, if any scene precedes.
    #[must_use]
    pub fn previous_index(&self) -> Option<usize> {
        (0..self.current).rev().find(|&i| self.handlers[i].is_some())
    }

    // -----------------------------------------------------------------------
    // Frame loop and visibility
    // -----------------------------------------------------------------------

    /// Run the active scene's frame. Returns whether anything rendered.
    pub fn frame(&mut self) -> Result<bool, ShowcaseError> {
        self.current_mut().map_or(Ok(false), SceneHandler::frame)
    }

    /// Stop every scene, e.g. while the window is hidden.
    pub fn suspend(&mut self) {
        self.suspended = true;
        self.set_all_active(false);
    }

    /// Restart the current scene after [`suspend`](Self::suspend).
    pub fn resume(&mut self) {
        if !std::mem::take(&mut self.suspended) {
            return;
        }
        if self.current().is_some_and(SceneHandler::has_model) {
            let _ = self.activate_current();
        }
    }

    /// Whether scenes are suspended.
    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Forward a viewport size change to every initialized scene.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        for handler in self.handlers.iter_mut().flatten() {
            if handler.is_initialized() {
                handler.on_resize(width, height);
            }
        }
    }

    /// Apply a background to every scene.
    pub fn apply_background(&mut self, background: &Background) {
        for handler in self.handlers.iter_mut().flatten() {
            handler.set_background(background);
        }
    }

    fn set_all_active(&mut self, active: bool) {
        for handler in self.handlers.iter_mut().flatten() {
            let _ = handler.set_active(active);
        }
    }

    /// Deactivate and dispose every scene.
    pub fn dispose(&mut self) {
        self.set_all_active(false);
        for handler in self.handlers.iter_mut().flatten() {
            handler.dispose();
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Number of manifest scenes, skipped ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the manifest had no scenes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Index of the current scene.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Current navigation generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Handler of the current scene.
    #[must_use]
    pub fn current(&self) -> Option<&SceneHandler<T>> {
        self.handler(self.current)
    }

    /// Mutable handler of the current scene.
    pub fn current_mut(&mut self) -> Option<&mut SceneHandler<T>> {
        self.handler_mut(self.current)
    }

    /// Handler at `index`, unless out of range or skipped.
    #[must_use]
    pub fn handler(&self, index: usize) -> Option<&SceneHandler<T>> {
        self.handlers.get(index).and_then(Option::as_ref)
    }

    /// Mutable handler at `index`, unless out of range or skipped.
    pub fn handler_mut(&mut self, index: usize) -> Option<&mut SceneHandler<T>> {
        self.handlers.get_mut(index).and_then(Option::as_mut)
    }

    /// Number of active scenes.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.handlers
            .iter()
            .flatten()
            .filter(|h| h.is_active())
            .count()
    }
}
