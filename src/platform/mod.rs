//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (joystick drag normalization)
//! - Storage (LocalStorage on web, in-memory natively)

pub mod input;
pub mod storage;

pub use input::{Joystick, StickBase};
pub use storage::{KeyValueStore, MemoryStore, StoreError};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStore;
