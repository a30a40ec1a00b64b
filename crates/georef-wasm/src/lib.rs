//! Georef WASM - WebAssembly bindings for Georef
//!
//! This crate exposes the georef-core transform to JavaScript/TypeScript, so a
//! browser-side viewer can plot corners, raw pixel points and every stage of
//! the transform.
//!
//! # Module Structure
//!
//! - `transform` - `JsGeoreference` class and one-shot `transform` function
//! - `types` - conversion helpers for JS corner objects and point buffers
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsGeoreference } from '@georef/wasm';
//!
//! await init();
//!
//! const georef = new JsGeoreference(corners, 5064, 52224);
//! const lonlat = georef.apply_points(new Float64Array([2532, 26112, 0, 0]));
//! ```

use wasm_bindgen::prelude::*;

mod transform;
mod types;

pub use transform::{transform, JsGeoreference};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
