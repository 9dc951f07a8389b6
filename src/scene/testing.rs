//! Headless doubles for driving scenes in tests.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    time::Duration,
};

use super::{
    manager::NavigationUi,
    target::{Background, FrameView, RenderTarget},
};
use crate::{
    asset::{AssetError, AssetFetch},
    error::ShowcaseError,
    model::Model,
    points::InteractivePointSet,
};

/// Render target that only counts what happens to it.
#[derive(Debug, Default)]
pub struct RecordingTarget {
    pub models_installed: usize,
    pub models_released: usize,
    pub points_released: usize,
    pub installed_points: usize,
    pub renders: usize,
    pub released: bool,
    pub size: (u32, u32),
    pub background: Option<Background>,
    pub fail_render: bool,
}

impl RenderTarget for RecordingTarget {
    fn install_model(&mut self, _model: &Model) {
        self.models_installed += 1;
    }

    fn release_model(&mut self) {
        self.models_released += 1;
    }

    fn install_points(&mut self, points: &InteractivePointSet) {
        self.installed_points = points.len();
    }

    fn release_points(&mut self) {
        self.points_released += 1;
    }

    fn set_background(&mut self, background: &Background) {
        self.background = Some(background.clone());
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn render(&mut self, _frame: &FrameView<'_>) -> Result<(), ShowcaseError> {
        if self.fail_render {
            return Err(ShowcaseError::Render("surface lost".into()));
        }
        self.renders += 1;
        Ok(())
    }

    fn release(&mut self) {
        self.released = true;
    }
}

/// In-memory fetcher that counts every request.
#[derive(Debug, Default)]
pub struct CountingFetcher {
    files: HashMap<String, Vec<u8>>,
    attempts: Cell<usize>,
    requested: RefCell<Vec<String>>,
}

impl CountingFetcher {
    /// Serve `bytes` at exactly `path`.
    pub fn with_file(mut self, path: &str, bytes: Vec<u8>) -> Self {
        let _ = self.files.insert(path.to_owned(), bytes);
        self
    }

    /// Number of fetches so far.
    pub fn attempts(&self) -> usize {
        self.attempts.get()
    }

    /// Every requested path, in order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl AssetFetch for CountingFetcher {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        self.attempts.set(self.attempts.get() + 1);
        self.requested.borrow_mut().push(path.to_owned());
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(path.to_owned()))
    }
}

/// Navigation UI that records calls.
#[derive(Debug, Default)]
pub struct RecordingUi {
    pub panels_closed: usize,
    pub loading_shown: Vec<Option<String>>,
    pub highlighted_nav: Option<usize>,
    pub hide_scheduled: Vec<Duration>,
}

impl NavigationUi for RecordingUi {
    fn close_panels(&mut self) {
        self.panels_closed += 1;
    }

    fn show_loading(&mut self, fact: Option<&str>) {
        self.loading_shown.push(fact.map(str::to_owned));
    }

    fn update_navigation(&mut self, index: usize) {
        self.highlighted_nav = Some(index);
    }

    fn schedule_hide_loading(&mut self, delay: Duration) {
        self.hide_scheduled.push(delay);
    }
}

/// Binary glTF holding one triangle `(0,0,0) (1,0,0) (0,1,0)` under a
/// node translated by `(0, 2, 0)`.
pub fn triangle_glb() -> Vec<u8> {
    const MAGIC: &[u8; 4] = b"glTF";
    const CHUNK_JSON: u32 = 0x4E4F_534A;
    const CHUNK_BIN: u32 = 0x004E_4942;

    let positions: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let mut bin: Vec<u8> = positions.iter().flat_map(|f| f.to_le_bytes()).collect();
    let bin_len = bin.len();
    let mut json = format!(
        r#"{{
  "asset": {{ "version": "2.0" }},
  "scene": 0,
  "scenes": [{{ "nodes": [0] }}],
  "nodes": [{{ "mesh": 0, "translation": [0.0, 2.0, 0.0] }}],
  "meshes": [{{ "primitives": [{{ "attributes": {{ "POSITION": 0 }} }}] }}],
  "buffers": [{{ "byteLength": {bin_len} }}],
  "bufferViews": [{{ "buffer": 0, "byteOffset": 0, "byteLength": {bin_len} }}],
  "accessors": [{{
    "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
    "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
  }}]
}}"#
    )
    .into_bytes();
    // Chunks are 4-byte aligned: JSON pads with spaces, BIN with zeros.
    json.resize(json.len().next_multiple_of(4), b' ');
    bin.resize(bin.len().next_multiple_of(4), 0);

    let total = 12 + 8 + json.len() + 8 + bin.len();
    let mut glb = Vec::with_capacity(total);
    glb.extend_from_slice(MAGIC);
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&le_u32(total));
    for (kind, data) in [(CHUNK_JSON, &json), (CHUNK_BIN, &bin)] {
        glb.extend_from_slice(&le_u32(data.len()));
        glb.extend_from_slice(&kind.to_le_bytes());
        glb.extend_from_slice(data);
    }
    glb
}

fn le_u32(n: usize) -> [u8; 4] {
    u32::try_from(n).unwrap_or(u32::MAX).to_le_bytes()
}
