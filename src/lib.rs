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
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
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
// Async trait methods are only driven on the calling thread.
#![allow(async_fn_in_trait)]

//! Multi-scene interactive showcase for architectural 3D models.
//!
//! Atrium loads a handful of models one at a time into independent
//! viewports, normalizes their wildly different unit scales, frames the
//! camera around them, and annotates them with clickable points of interest
//! that open an info panel. Navigation steps between scenes with buttons or
//! the keyboard, and a day/night skybox theme applies across all scenes.
//!
//! # Key entry points
//!
//! - [`scene::SceneManager`] - ordered scenes, navigation, activation
//! - [`scene::SceneHandler`] - per-scene lifecycle state machine
//! - [`framing::ModelFramer`] - centering and step-table scaling
//! - [`asset::AssetLoader`] - path-variant fallback model loader
//! - [`theme::ThemeManager`] - light/dark skybox with a texture cache
//! - [`options::Options`] - rendering constants (TOML, schema)
//! - [`manifest::Manifest`] - static scene descriptors
//!
//! # Architecture
//!
//! Every scene owns exactly one [`scene::RenderTarget`]. The GPU backend
//! ([`renderer::GpuSceneTarget`]) implements it on top of wgpu; tests use a
//! recording target so the state machines run headlessly. Only the active
//! scene runs its frame loop; the viewer drives that loop from the window's
//! redraw events.

pub mod asset;
pub mod camera;
pub mod error;
pub mod framing;
pub mod gpu;
pub mod input;
pub mod interaction;
pub mod manifest;
pub mod model;
pub mod options;
pub mod points;
pub mod renderer;
pub mod scene;
pub mod theme;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use error::ShowcaseError;
pub use scene::{SceneHandler, SceneManager};
#[cfg(feature = "viewer")]
pub use viewer::{Viewer, ViewerConfig};
