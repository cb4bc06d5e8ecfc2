//! Built-in implementations of the storage and navigator ports

mod memory;
#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::{MemoryStorage, RecordingNavigator};
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;
