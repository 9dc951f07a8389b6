//! Point clicks, info panels and the loading screen.
//!
//! [`InteractionHandler`] owns every piece of page chrome: one info panel
//! per scene that has one, the loading screen, and the timers that hide
//! the loading screen and revert point highlights. It implements
//! [`NavigationUi`] so the scene manager can drive it during navigation.

pub mod panel;

use std::time::Duration;

use web_time::Instant;

pub use panel::{InfoPanel, LoadingScreen, PanelContent, TypingAnimation};

use crate::{
    manifest::Manifest,
    options::InteractionOptions,
    points::PointHit,
    scene::{NavigationUi, RenderTarget, SceneManager},
    util::Timers,
};

/// Delayed UI work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// Hide the loading screen.
    HideLoading,
    /// Return a highlighted point to its original color.
    RevertHighlight {
        /// Scene owning the point.
        scene: usize,
        /// Point index within the scene.
        point: usize,
    },
}

/// Routes clicks to points and owns panel, loading and timer state.
pub struct InteractionHandler {
    panels: Vec<Option<InfoPanel>>,
    loading: LoadingScreen,
    timers: Timers<UiEvent>,
    highlight_duration: Duration,
    navigation_index: usize,
}

impl InteractionHandler {
    /// One panel per manifest scene that names an info panel.
    #[must_use]
    pub fn new(manifest: &Manifest, options: &InteractionOptions) -> Self {
        let title = Duration::from_millis(options.title_char_interval_ms);
        let body = Duration::from_millis(options.body_char_interval_ms);
        Self {
            panels: manifest
                .scenes
                .iter()
                .map(|s| s.info_panel.as_ref().map(|_| InfoPanel::new(title, body)))
                .collect(),
            loading: LoadingScreen::new(Duration::from_millis(
                options.loading_char_interval_ms,
            )),
            timers: Timers::new(),
            highlight_duration: Duration::from_millis(options.highlight_duration_ms),
            navigation_index: 0,
        }
    }

    /// Handle a click at viewport pixel `(x, y)` in the current scene.
    ///
    /// Clicks in scenes without an info panel, and clicks that miss every
    /// point, are ignored. A hit opens the panel, highlights the point and
    /// schedules the highlight's revert.
    pub fn click<T: RenderTarget>(
        &mut self,
        scenes: &mut SceneManager<T>,
        x: f32,
        y: f32,
        now: Instant,
    ) -> Option<PointHit> {
        let scene = scenes.current_index();
        if !matches!(self.panels.get(scene), Some(Some(_))) {
            return None;
        }
        let handler = scenes.current_mut().filter(|h| h.is_active())?;
        let hit = handler.pick_point(x, y)?;

        let descriptor = handler.descriptor();
        let point = handler.interactive_points().get(hit.point_index)?;
        let content = PanelContent {
            title: point.label.clone(),
            body: point.info.clone(),
            style: descriptor.style.clone(),
            period: descriptor.period.clone(),
            point_index: hit.point_index,
        };
        let _ = handler.highlight_point(hit.point_index, true);

        self.close_other_panels(scene);
        if let Some(Some(panel)) = self.panels.get_mut(scene) {
            panel.open(content, now);
        }
        let event = UiEvent::RevertHighlight {
            scene,
            point: hit.point_index,
        };
        let _ = self.timers.cancel(|e| *e == event);
        self.timers.schedule(now, self.highlight_duration, event);
        log::debug!("point {} clicked in scene {scene}", hit.point_index);
        Some(hit)
    }

    /// Close every panel and stop their typing.
    pub fn close_all(&mut self) {
        for panel in self.panels.iter_mut().flatten() {
            panel.close();
        }
    }

    fn close_other_panels(&mut self, scene: usize) {
        for (index, panel) in self.panels.iter_mut().enumerate() {
            if index != scene {
                if let Some(panel) = panel {
                    panel.close();
                }
            }
        }
    }

    /// Finish every typing animation at once.
    pub fn complete_typing(&mut self) {
        for panel in self.panels.iter_mut().flatten() {
            panel.complete_typing();
        }
    }

    /// Fire due timers and advance typing. Returns whether anything
    /// visible changed.
    pub fn tick<T: RenderTarget>(&mut self, scenes: &mut SceneManager<T>, now: Instant) -> bool {
        let mut changed = false;
        for event in self.timers.take_due(now) {
            changed = true;
            match event {
                UiEvent::HideLoading => self.loading.hide(),
                UiEvent::RevertHighlight { scene, point } => {
                    if let Some(handler) = scenes.handler_mut(scene) {
                        let _ = handler.highlight_point(point, false);
                    }
                }
            }
        }
        for panel in self.panels.iter_mut().flatten() {
            changed |= panel.tick(now);
        }
        changed |= self.loading.tick(now);
        changed
    }

    /// Earliest time anything needs to happen, for scheduling wakeups.
    /// Covers pending timers and the next typed character.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.panels
            .iter()
            .flatten()
            .filter_map(InfoPanel::next_at)
            .chain(self.loading.next_at())
            .chain(self.timers.next_deadline())
            .min()
    }

    /// Panel of the scene at `index`.
    #[must_use]
    pub fn panel(&self, index: usize) -> Option<&InfoPanel> {
        self.panels.get(index).and_then(Option::as_ref)
    }

    /// Loading screen.
    #[must_use]
    pub fn loading(&self) -> &LoadingScreen {
        &self.loading
    }

    /// Index last marked current in the navigation.
    #[must_use]
    pub fn navigation_index(&self) -> usize {
        self.navigation_index
    }

    /// One-line summary of what the page chrome shows, for a window title.
    #[must_use]
    pub fn status_line(&self) -> Option<String> {
        if self.loading.is_visible() {
            return Some(format!("Loading... {}", self.loading.text()));
        }
        let panel = self.panels.iter().flatten().find(|p| p.is_open())?;
        let content = panel.content()?;
        Some(format!(
            "{} | {} | {}, {}",
            panel.visible_title(),
            panel.visible_body(),
            content.style,
            content.period
        ))
    }
}

impl NavigationUi for InteractionHandler {
    fn close_panels(&mut self) {
        self.close_all();
    }

    fn show_loading(&mut self, fact: Option<&str>) {
        let _ = self.timers.cancel(|e| *e == UiEvent::HideLoading);
        self.loading.show(fact, Instant::now());
    }

    fn update_navigation(&mut self, index: usize) {
        self.navigation_index = index;
    }

    fn schedule_hide_loading(&mut self, delay: Duration) {
        self.timers.schedule(Instant::now(), delay, UiEvent::HideLoading);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::{
        camera::CameraPose,
        manifest::{PointDescriptor, SceneDescriptor},
        options::Options,
        scene::testing::RecordingTarget,
    };

    fn manifest() -> Manifest {
        let scene = |i: usize, panel: bool| SceneDescriptor {
            id: format!("model{i}"),
            container: Some(format!("container{i}")),
            info_panel: panel.then(|| format!("info-panel{i}")),
            style: "Gothic".into(),
            period: "1200".into(),
            points: vec![PointDescriptor {
                position: [0.0, 0.0, 0.0],
                label: "Spire".into(),
                info: "Tallest part.".into(),
            }],
            ..SceneDescriptor::default()
        };
        Manifest {
            scenes: vec![scene(1, true), scene(2, false)],
            facts: vec!["Fact.".into()],
        }
    }

    /// Scene 0 active with its placeholder model and the camera looking
    /// straight at the single point.
    fn setup() -> (SceneManager<RecordingTarget>, InteractionHandler) {
        let manifest = manifest();
        let options = Options::default();
        let mut scenes = SceneManager::from_manifest(&manifest, &options, (800, 600), |_, _| {
            Some(RecordingTarget::default())
        });
        let mut ui = InteractionHandler::new(&manifest, &options.interaction);
        let ticket = match scenes.begin_navigation(0, &mut ui) {
            crate::scene::Navigation::NeedsModel(ticket) => ticket,
            other => panic!("unexpected {other:?}"),
        };
        assert!(scenes.complete_navigation(
            &ticket,
            Err(crate::asset::AssetError::NotFound("x".into())),
            &mut ui
        ));
        let handler = scenes.current_mut().unwrap();
        let pose = CameraPose {
            position: Vec3::new(0.0, 0.0, 60.0),
            target: Vec3::ZERO,
        };
        handler.set_camera_pose(pose);
        (scenes, ui)
    }

    #[test]
    fn click_opens_panel_and_highlight_reverts() {
        let (mut scenes, mut ui) = setup();
        let now = Instant::now();
        let original = scenes.current().unwrap().interactive_points()[0].color;

        let hit = ui.click(&mut scenes, 400.0, 300.0, now).unwrap();
        assert_eq!(hit.point_index, 0);
        let panel = ui.panel(0).unwrap();
        assert!(panel.is_open());
        assert_eq!(panel.content().unwrap().style, "Gothic");
        assert_ne!(scenes.current().unwrap().interactive_points()[0].color, original);

        let _ = ui.tick(&mut scenes, now + Duration::from_millis(500));
        assert_ne!(scenes.current().unwrap().interactive_points()[0].color, original);
        let _ = ui.tick(&mut scenes, now + Duration::from_secs(5));
        assert_eq!(scenes.current().unwrap().interactive_points()[0].color, original);
        assert!(!ui.loading().is_visible());
    }

    #[test]
    fn miss_is_ignored() {
        let (mut scenes, mut ui) = setup();
        assert!(ui.click(&mut scenes, 0.0, 0.0, Instant::now()).is_none());
        assert!(!ui.panel(0).unwrap().is_open());
    }

    #[test]
    fn scene_without_panel_ignores_clicks() {
        let (mut scenes, mut ui) = setup();
        assert!(ui.panel(1).is_none());
        let ticket = match scenes.begin_navigation(1, &mut ui) {
            crate::scene::Navigation::NeedsModel(ticket) => ticket,
            other => panic!("unexpected {other:?}"),
        };
        let _ = scenes.complete_navigation(
            &ticket,
            Err(crate::asset::AssetError::NotFound("y".into())),
            &mut ui,
        );
        assert!(ui.click(&mut scenes, 400.0, 300.0, Instant::now()).is_none());
    }

    #[test]
    fn inactive_scene_ignores_clicks() {
        let (mut scenes, mut ui) = setup();
        scenes.suspend();
        assert!(ui.click(&mut scenes, 400.0, 300.0, Instant::now()).is_none());
    }

    #[test]
    fn navigation_closes_panels_and_shows_loading() {
        let (mut scenes, mut ui) = setup();
        let now = Instant::now();
        let _ = ui.click(&mut scenes, 400.0, 300.0, now).unwrap();
        // Loading screen from the initial navigation hides after its delay.
        let _ = ui.tick(&mut scenes, now + Duration::from_secs(5));
        assert!(!ui.loading().is_visible());
        assert!(ui.status_line().unwrap().contains("Gothic"));

        let _ = scenes.begin_navigation(1, &mut ui);
        assert!(!ui.panel(0).unwrap().is_open());
        assert!(ui.loading().is_visible());
        assert_eq!(ui.navigation_index(), 1);
        assert!(ui.status_line().unwrap().starts_with("Loading"));
    }

    #[test]
    fn next_deadline_follows_loading_fact_typing() {
        let manifest = manifest();
        let options = Options::default();
        let mut scenes: SceneManager<RecordingTarget> =
            SceneManager::from_manifest(&manifest, &options, (800, 600), |_, _| {
                Some(RecordingTarget::default())
            });
        let mut ui = InteractionHandler::new(&manifest, &options.interaction);
        let before = Instant::now();

        // Model still loading: no hide timer yet, only the typed fact.
        let _ = scenes.begin_navigation(0, &mut ui);
        assert_eq!(ui.loading().text(), "F");
        let deadline = ui.next_deadline().unwrap();
        assert!(deadline > before);
        let interval = Duration::from_millis(options.interaction.loading_char_interval_ms);
        assert!(deadline <= Instant::now() + interval);

        let _ = ui.tick(&mut scenes, deadline);
        assert_eq!(ui.loading().text(), "Fa");
    }

    #[test]
    fn next_deadline_is_none_when_idle() {
        let manifest = manifest();
        let ui = InteractionHandler::new(&manifest, &Options::default().interaction);
        assert_eq!(ui.next_deadline(), None);
    }
}
