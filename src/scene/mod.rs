//! Scene lifecycle: per-scene handlers, navigation between them, and the
//! render-target seam they draw through.

mod handler;
mod manager;
mod target;
#[cfg(test)]
pub(crate) mod testing;

pub use handler::{HandlerState, SceneHandler};
pub use manager::{LoadTicket, Navigation, NavigationUi, SceneManager};
pub use target::{Background, FrameView, RenderTarget};
