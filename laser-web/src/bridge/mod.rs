//! Bridge module - browser platform and the JS-facing API
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod app;
mod canvas;
mod detector;
mod media;
mod platform;
mod pump;

pub use app::{init_logging, LaserPointer};
pub use platform::WebPlatform;
