//! Leafcrop WASM - WebAssembly bindings for the leaf photo crop editor
//!
//! This crate exposes the leafcrop-core editing session to the upload page.
//! The page renders the photo and the crop overlay; everything else
//! (layout, gestures, zoom, rasterizing and encoding the crop) runs here.
//!
//! # Module Structure
//!
//! - `editor` - `JsCropEditor`, one editing session per accepted photo
//! - `types` - JS value objects for the crop box and display transform
//! - `object_url` - revocable Blob URLs for the source photo
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropEditor } from '@leafcrop/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const editor = new JsCropEditor(bytes, 500, 500, undefined, onCropComplete, onCancel);
//! container.onpointerdown = (e) => editor.pointerDown(e.offsetX, e.offsetY);
//! ```

use wasm_bindgen::prelude::*;

mod editor;
mod object_url;
mod types;

pub use editor::JsCropEditor;
pub use types::{JsCropRect, JsDisplayTransform};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
