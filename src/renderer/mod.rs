//! Rendering module
//!
//! `shapes` builds a display list from the simulation; `canvas` (web only)
//! plays it back on a Canvas 2D context.

pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use shapes::{Shape, scene};

#[cfg(target_arch = "wasm32")]
pub use canvas::{CanvasRenderer, ImageStatus, PortraitImage};
