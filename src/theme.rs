//! Light/dark skybox theme shared by every scene.
//!
//! Each theme has one equirectangular skybox image. Images are decoded
//! once and cached behind [`Arc`] so toggling is instant after the first
//! load; a theme whose image cannot be loaded falls back to a flat color.
//! The chosen theme is persisted through a [`ThemeStore`].

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{
    asset::{AssetFetch, AssetLoader},
    error::ShowcaseError,
    options::ThemeOptions,
    scene::{Background, RenderTarget, SceneManager},
};

/// Color scheme.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Night skybox.
    #[default]
    Dark,
    /// Day skybox.
    Light,
}

impl Theme {
    /// The other theme.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dark => "dark",
            Self::Light => "light",
        })
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(format!("unknown theme {other:?}")),
        }
    }
}

/// Largest skybox edge the GPU backend accepts (the default wgpu 2D texture
/// limit). Larger images are downscaled on decode.
pub const MAX_SKYBOX_DIMENSION: u32 = 8192;

/// Decoded RGBA8 skybox texture.
#[derive(Clone, PartialEq, Eq)]
pub struct SkyboxImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 pixels.
    pub pixels: Vec<u8>,
}

impl fmt::Debug for SkyboxImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkyboxImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl SkyboxImage {
    /// Decode a PNG or JPEG image, fitting it within
    /// [`MAX_SKYBOX_DIMENSION`] while keeping its aspect ratio.
    pub fn decode(bytes: &[u8]) -> Result<Self, String> {
        let mut decoded =
            image::load_from_memory(bytes).map_err(|e| e.to_string())?;
        if decoded.width() > MAX_SKYBOX_DIMENSION
            || decoded.height() > MAX_SKYBOX_DIMENSION
        {
            log::debug!(
                "downscaling {}x{} skybox",
                decoded.width(),
                decoded.height()
            );
            decoded = decoded.resize(
                MAX_SKYBOX_DIMENSION,
                MAX_SKYBOX_DIMENSION,
                image::imageops::FilterType::Triangle,
            );
        }
        let rgba = decoded.to_rgba8();
        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            pixels: rgba.into_raw(),
        })
    }
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// Durable storage for the chosen theme.
pub trait ThemeStore {
    /// Stored theme, or `None` when the user never chose one.
    fn load(&self) -> Result<Option<Theme>, ShowcaseError>;
    /// Remember `theme`.
    fn save(&mut self, theme: Theme) -> Result<(), ShowcaseError>;
}

impl<S: ThemeStore + ?Sized> ThemeStore for Box<S> {
    fn load(&self) -> Result<Option<Theme>, ShowcaseError> {
        (**self).load()
    }

    fn save(&mut self, theme: Theme) -> Result<(), ShowcaseError> {
        (**self).save(theme)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Preferences {
    theme: Option<Theme>,
}

/// Theme preference kept in a small TOML file.
#[derive(Debug, Clone)]
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    /// Store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform config directory, when one exists.
    #[must_use]
    pub fn default_location() -> Option<Self> {
        dirs::config_dir().map(|mut p| {
            p.push("atrium");
            p.push("preferences.toml");
            Self::new(p)
        })
    }

    /// Backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ThemeStore for FileThemeStore {
    fn load(&self) -> Result<Option<Theme>, ShowcaseError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ShowcaseError::Io(e)),
        };
        let prefs: Preferences = toml::from_str(&content)
            .map_err(|e| ShowcaseError::Preferences(e.to_string()))?;
        Ok(prefs.theme)
    }

    fn save(&mut self, theme: Theme) -> Result<(), ShowcaseError> {
        let content = toml::to_string(&Preferences { theme: Some(theme) })
            .map_err(|e| ShowcaseError::Preferences(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, content)?;
        log::debug!("saved theme preference to {}", self.path.display());
        Ok(())
    }
}

/// Theme preference held in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryThemeStore {
    theme: Option<Theme>,
    saves: usize,
}

impl MemoryThemeStore {
    /// Store that starts out holding `theme`.
    #[must_use]
    pub fn with_theme(theme: Theme) -> Self {
        Self {
            theme: Some(theme),
            saves: 0,
        }
    }

    /// Number of saves so far.
    #[must_use]
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl ThemeStore for MemoryThemeStore {
    fn load(&self) -> Result<Option<Theme>, ShowcaseError> {
        Ok(self.theme)
    }

    fn save(&mut self, theme: Theme) -> Result<(), ShowcaseError> {
        self.theme = Some(theme);
        self.saves += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ThemeManager
// ---------------------------------------------------------------------------

/// Current theme, its skybox cache and its persistence.
pub struct ThemeManager<S> {
    current: Theme,
    explicit: bool,
    store: S,
    dark_path: String,
    light_path: String,
    dark_fallback: [f32; 3],
    light_fallback: [f32; 3],
    cache: FxHashMap<Theme, Arc<SkyboxImage>>,
}

impl<S: ThemeStore> ThemeManager<S> {
    /// Start from the stored preference, else the platform's `ambient`
    /// scheme, else dark.
    pub fn new(options: &ThemeOptions, store: S, ambient: Option<Theme>) -> Self {
        let stored = store.load().unwrap_or_else(|e| {
            log::warn!("could not read theme preference: {e}");
            None
        });
        let current = stored.or(ambient).unwrap_or_default();
        log::info!("initial theme: {current}");
        Self {
            current,
            explicit: stored.is_some(),
            store,
            dark_path: options.dark_skybox.clone(),
            light_path: options.light_skybox.clone(),
            dark_fallback: options.dark_fallback,
            light_fallback: options.light_fallback,
            cache: FxHashMap::default(),
        }
    }

    /// Current theme.
    #[must_use]
    pub fn current(&self) -> Theme {
        self.current
    }

    /// Whether the current theme came from a stored user choice.
    #[must_use]
    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    /// Preference store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Skybox image path for `theme`.
    #[must_use]
    pub fn skybox_path(&self, theme: Theme) -> &str {
        match theme {
            Theme::Dark => &self.dark_path,
            Theme::Light => &self.light_path,
        }
    }

    /// Flat color used when `theme`'s skybox is unavailable.
    #[must_use]
    pub fn fallback_color(&self, theme: Theme) -> [f32; 3] {
        match theme {
            Theme::Dark => self.dark_fallback,
            Theme::Light => self.light_fallback,
        }
    }

    /// Whether `theme`'s skybox is cached.
    #[must_use]
    pub fn is_cached(&self, theme: Theme) -> bool {
        self.cache.contains_key(&theme)
    }

    /// What scenes should draw behind their models right now.
    #[must_use]
    pub fn background(&self) -> Background {
        self.cache.get(&self.current).map_or_else(
            || Background::Color(self.fallback_color(self.current)),
            |image| Background::Skybox(Arc::clone(image)),
        )
    }

    /// Load and cache `theme`'s skybox unless already cached.
    pub async fn load_skybox<F: AssetFetch>(
        &mut self,
        theme: Theme,
        loader: &AssetLoader<F>,
    ) -> Option<Arc<SkyboxImage>> {
        if let Some(image) = self.cache.get(&theme) {
            return Some(Arc::clone(image));
        }
        let path = self.skybox_path(theme).to_owned();
        let decoded = match loader.fetch(&path).await {
            Ok(bytes) => SkyboxImage::decode(&bytes),
            Err(e) => Err(e.to_string()),
        };
        match decoded {
            Ok(image) => {
                let image = Arc::new(image);
                let _ = self.cache.insert(theme, Arc::clone(&image));
                log::debug!(
                    "loaded {theme} skybox {path} ({}x{})",
                    image.width,
                    image.height
                );
                Some(image)
            }
            Err(e) => {
                log::warn!("skybox {path} unavailable, using flat color: {e}");
                None
            }
        }
    }

    /// Load both skyboxes so later toggles are instant.
    pub async fn preload<F: AssetFetch>(&mut self, loader: &AssetLoader<F>) {
        for theme in [Theme::Dark, Theme::Light] {
            let _ = self.load_skybox(theme, loader).await;
        }
    }

    /// Apply the current theme's background to every scene.
    pub async fn apply<F: AssetFetch, T: RenderTarget>(
        &mut self,
        loader: &AssetLoader<F>,
        scenes: &mut SceneManager<T>,
    ) {
        let _ = self.load_skybox(self.current, loader).await;
        scenes.apply_background(&self.background());
    }

    /// Switch to `theme`, apply it and persist it.
    pub async fn set_theme<F: AssetFetch, T: RenderTarget>(
        &mut self,
        theme: Theme,
        loader: &AssetLoader<F>,
        scenes: &mut SceneManager<T>,
    ) {
        self.current = theme;
        self.explicit = true;
        log::info!("theme changed to {theme}");
        self.apply(loader, scenes).await;
        if let Err(e) = self.store.save(theme) {
            log::warn!("could not save theme preference: {e}");
        }
    }

    /// Flip between dark and light.
    pub async fn toggle<F: AssetFetch, T: RenderTarget>(
        &mut self,
        loader: &AssetLoader<F>,
        scenes: &mut SceneManager<T>,
    ) -> Theme {
        let theme = self.current.toggled();
        self.set_theme(theme, loader, scenes).await;
        theme
    }

    /// Adopt the platform scheme, unless the user chose a theme.
    pub async fn follow_system<F: AssetFetch, T: RenderTarget>(
        &mut self,
        ambient: Theme,
        loader: &AssetLoader<F>,
        scenes: &mut SceneManager<T>,
    ) -> bool {
        if self.explicit || self.current == ambient {
            return false;
        }
        log::info!("following system theme: {ambient}");
        self.current = ambient;
        self.apply(loader, scenes).await;
        true
    }

    /// Point the themes at new skybox images. Cached images are dropped.
    pub fn set_skybox_paths(&mut self, dark: impl Into<String>, light: impl Into<String>) {
        self.dark_path = dark.into();
        self.light_path = light.into();
        self.cache.clear();
    }

    /// Drop the cache, reload both skyboxes and re-apply.
    pub async fn reload_skyboxes<F: AssetFetch, T: RenderTarget>(
        &mut self,
        loader: &AssetLoader<F>,
        scenes: &mut SceneManager<T>,
    ) {
        self.cache.clear();
        self.preload(loader).await;
        scenes.apply_background(&self.background());
    }

    /// Drop every cached texture.
    pub fn dispose(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        manifest::{Manifest, SceneDescriptor},
        options::Options,
        scene::testing::{CountingFetcher, RecordingTarget},
    };

    fn png(width: u32, height: u32) -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        image.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    fn loader() -> AssetLoader<CountingFetcher> {
        AssetLoader::new(
            CountingFetcher::default()
                .with_file("/images/skybox/dark-skybox.png", png(4, 2))
                .with_file("/images/skybox/light-skybox.png", png(8, 4)),
        )
    }

    fn scenes() -> SceneManager<RecordingTarget> {
        let manifest = Manifest {
            scenes: vec![SceneDescriptor {
                id: "model1".into(),
                container: Some("container1".into()),
                ..SceneDescriptor::default()
            }],
            facts: Vec::new(),
        };
        SceneManager::from_manifest(&manifest, &Options::default(), (8, 8), |_, _| {
            Some(RecordingTarget::default())
        })
    }

    fn manager(store: MemoryThemeStore, ambient: Option<Theme>) -> ThemeManager<MemoryThemeStore> {
        ThemeManager::new(&ThemeOptions::default(), store, ambient)
    }

    #[test]
    fn boxed_store_delegates() {
        let mut store: Box<dyn ThemeStore> = Box::new(MemoryThemeStore::default());
        assert_eq!(store.load().unwrap(), None);
        store.save(Theme::Light).unwrap();
        assert_eq!(store.load().unwrap(), Some(Theme::Light));
        let themes = ThemeManager::new(&ThemeOptions::default(), store, None);
        assert_eq!(themes.current(), Theme::Light);
    }

    #[test]
    fn oversized_skybox_is_downscaled() {
        let image = SkyboxImage::decode(&png(MAX_SKYBOX_DIMENSION * 2, 2)).unwrap();
        assert_eq!(image.width, MAX_SKYBOX_DIMENSION);
        assert_eq!(image.height, 1);
        assert_eq!(image.pixels.len(), (MAX_SKYBOX_DIMENSION * 4) as usize);
    }

    #[test]
    fn stored_preference_wins_over_ambient() {
        let themes = manager(MemoryThemeStore::with_theme(Theme::Dark), Some(Theme::Light));
        assert_eq!(themes.current(), Theme::Dark);
        assert!(themes.is_explicit());

        let themes = manager(MemoryThemeStore::default(), Some(Theme::Light));
        assert_eq!(themes.current(), Theme::Light);
        assert!(!themes.is_explicit());

        let themes = manager(MemoryThemeStore::default(), None);
        assert_eq!(themes.current(), Theme::Dark);
    }

    #[test]
    fn toggle_applies_and_persists() {
        let mut themes = manager(MemoryThemeStore::default(), None);
        let loader = loader();
        let mut scenes = scenes();
        let theme = pollster::block_on(themes.toggle(&loader, &mut scenes));
        assert_eq!(theme, Theme::Light);
        assert_eq!(themes.store().saves(), 1);
        assert_eq!(themes.store().load().unwrap(), Some(Theme::Light));

        let target = scenes.handler(0).unwrap().target().unwrap();
        let Some(Background::Skybox(image)) = &target.background else {
            panic!("expected skybox, got {:?}", target.background);
        };
        assert_eq!((image.width, image.height), (8, 4));
    }

    #[test]
    fn preload_caches_both_and_skips_refetch() {
        let mut themes = manager(MemoryThemeStore::default(), None);
        let loader = loader();
        pollster::block_on(themes.preload(&loader));
        assert!(themes.is_cached(Theme::Dark));
        assert!(themes.is_cached(Theme::Light));
        let attempts = loader.fetcher().attempts();

        let mut scenes = scenes();
        let _ = pollster::block_on(themes.toggle(&loader, &mut scenes));
        let _ = pollster::block_on(themes.toggle(&loader, &mut scenes));
        assert_eq!(loader.fetcher().attempts(), attempts);
    }

    #[test]
    fn missing_skybox_falls_back_to_color() {
        let mut themes = manager(MemoryThemeStore::default(), None);
        themes.set_skybox_paths("/nope-dark.png", "/nope-light.png");
        let loader = loader();
        let mut scenes = scenes();
        pollster::block_on(themes.apply(&loader, &mut scenes));
        let target = scenes.handler(0).unwrap().target().unwrap();
        assert_eq!(
            target.background,
            Some(Background::Color(ThemeOptions::default().dark_fallback))
        );
    }

    #[test]
    fn follow_system_respects_explicit_choice() {
        let loader = loader();
        let mut scenes = scenes();

        let mut themes = manager(MemoryThemeStore::default(), None);
        assert!(pollster::block_on(themes.follow_system(Theme::Light, &loader, &mut scenes)));
        assert_eq!(themes.current(), Theme::Light);
        assert_eq!(themes.store().saves(), 0);

        let mut themes = manager(MemoryThemeStore::with_theme(Theme::Dark), None);
        assert!(!pollster::block_on(themes.follow_system(Theme::Light, &loader, &mut scenes)));
        assert_eq!(themes.current(), Theme::Dark);
    }

    #[test]
    fn reload_and_dispose_manage_cache() {
        let mut themes = manager(MemoryThemeStore::default(), None);
        let loader = loader();
        let mut scenes = scenes();
        pollster::block_on(themes.reload_skyboxes(&loader, &mut scenes));
        assert!(themes.is_cached(Theme::Light));
        themes.dispose();
        assert!(!themes.is_cached(Theme::Dark));
        assert_eq!(themes.background(), Background::Color(themes.fallback_color(Theme::Dark)));
    }

    #[test]
    fn file_store_round_trips() {
        let path = std::env::temp_dir().join("atrium_theme_store_test/preferences.toml");
        let _ = std::fs::remove_file(&path);
        let mut store = FileThemeStore::new(&path);
        assert_eq!(store.load().unwrap(), None);
        store.save(Theme::Light).unwrap();
        assert_eq!(store.load().unwrap(), Some(Theme::Light));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn theme_parses_case_insensitively() {
        assert_eq!("Light".parse::<Theme>(), Ok(Theme::Light));
        assert!("sepia".parse::<Theme>().is_err());
        assert_eq!(Theme::Dark.to_string(), "dark");
    }
}
