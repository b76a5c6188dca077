//! Blob object URLs for showing the source photo in an `<img>`.

use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, Url};

/// An object URL that is revoked when dropped.
pub(crate) struct ObjectUrl {
    url: String,
}

impl ObjectUrl {
    pub(crate) fn new(bytes: &[u8], mime: &str) -> Result<Self, JsValue> {
        let array = js_sys::Array::new();
        let u8_array = js_sys::Uint8Array::from(bytes);
        array.push(&u8_array.buffer());
        let options = BlobPropertyBag::new();
        if !mime.trim().is_empty() {
            options.set_type(mime);
        }
        let blob = Blob::new_with_u8_array_sequence_and_options(&array, &options)?;
        let url = Url::create_object_url_with_blob(&blob)?;
        Ok(Self { url })
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.url
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        let _ = Url::revoke_object_url(&self.url);
    }
}
