//! The crop editor exposed to JavaScript.
//!
//! `JsCropEditor` wraps one [`CropSession`]. The page forwards pointer events
//! in container coordinates and redraws the overlay from `cropRect()` and
//! `transform()`; the session reports its outcome through the two callbacks
//! passed to the constructor.

use leafcrop_core::decode::guess_mime_type;
use leafcrop_core::{CropConfig, CropError, CropHost, CropOutput, CropSession, Point, Viewport};
use wasm_bindgen::prelude::*;

use crate::object_url::ObjectUrl;
use crate::types::{mode_name, JsCropRect, JsDisplayTransform};

const FALLBACK_MIME: &str = "application/octet-stream";

/// Forwards session outcomes to the page's callbacks.
struct JsCallbacks {
    on_complete: js_sys::Function,
    on_cancel: js_sys::Function,
}

impl CropHost for JsCallbacks {
    fn crop_complete(&mut self, output: CropOutput) {
        let bytes = js_sys::Uint8Array::from(output.bytes.as_slice());
        let preview = JsValue::from_str(&output.preview_data_url);
        if let Err(err) = self.on_complete.call2(&JsValue::NULL, &bytes, &preview) {
            web_sys::console::error_1(&err);
        }
    }

    fn cancelled(&mut self) {
        if let Err(err) = self.on_cancel.call0(&JsValue::NULL) {
            web_sys::console::error_1(&err);
        }
    }
}

/// Crop editor for one accepted photo.
///
/// # Usage
///
/// ```typescript
/// const editor = new JsCropEditor(bytes, box.width, box.height, { targetSize: 224 },
///   (file: Uint8Array, preview: string) => upload(file, preview),
///   () => closeDialog());
/// img.src = editor.sourceUrl();
/// ```
#[wasm_bindgen]
pub struct JsCropEditor {
    session: CropSession<JsCallbacks>,
    /// Encoded source, kept only until the session ends.
    source_bytes: Option<Vec<u8>>,
    source_url: Option<ObjectUrl>,
}

#[wasm_bindgen]
impl JsCropEditor {
    /// Decode the photo and lay it out in a container of the given size.
    ///
    /// `options` may be `undefined` for the defaults, otherwise an object
    /// with any of the camelCase `CropConfig` fields.
    #[wasm_bindgen(constructor)]
    pub fn new(
        bytes: Vec<u8>,
        container_width: f64,
        container_height: f64,
        options: JsValue,
        on_crop_complete: js_sys::Function,
        on_cancel: js_sys::Function,
    ) -> Result<JsCropEditor, JsValue> {
        let config = parse_options(options)?;
        let host = JsCallbacks {
            on_complete: on_crop_complete,
            on_cancel,
        };
        let session = CropSession::open(
            &bytes,
            Viewport::new(container_width, container_height),
            config,
            host,
        )
        .map_err(to_js_error)?;

        Ok(JsCropEditor {
            session,
            source_bytes: Some(bytes),
            source_url: None,
        })
    }

    /// Start a gesture. Returns the resulting mode name.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f64, y: f64) -> String {
        mode_name(self.session.pointer_down(Point::new(x, y))).to_string()
    }

    /// Returns true when the overlay needs a redraw.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.session.pointer_move(Point::new(x, y))
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) {
        self.session.pointer_up();
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) {
        self.session.pointer_leave();
    }

    /// Re-layout after the container changed size. Resets zoom and crop.
    #[wasm_bindgen(js_name = resizeContainer)]
    pub fn resize_container(&mut self, width: f64, height: f64) -> Result<(), JsValue> {
        self.session
            .resize_viewport(Viewport::new(width, height))
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&mut self) {
        self.session.zoom_in();
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&mut self) {
        self.session.zoom_out();
    }

    /// Zoom to an absolute scale, clamped to the allowed range.
    #[wasm_bindgen(js_name = setScale)]
    pub fn set_scale(&mut self, scale: f64) {
        self.session.zoom_to(scale);
    }

    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.session.engine().scale()
    }

    #[wasm_bindgen(getter, js_name = minScale)]
    pub fn min_scale(&self) -> f64 {
        self.session.engine().min_scale()
    }

    #[wasm_bindgen(getter, js_name = maxScale)]
    pub fn max_scale(&self) -> f64 {
        self.session.engine().max_scale()
    }

    #[wasm_bindgen(getter, js_name = canZoomIn)]
    pub fn can_zoom_in(&self) -> bool {
        self.session.engine().can_zoom_in()
    }

    #[wasm_bindgen(getter, js_name = canZoomOut)]
    pub fn can_zoom_out(&self) -> bool {
        self.session.engine().can_zoom_out()
    }

    /// Source width in pixels, after EXIF orientation
    #[wasm_bindgen(getter, js_name = imageWidth)]
    pub fn image_width(&self) -> u32 {
        self.session.engine().image().width
    }

    /// Source height in pixels, after EXIF orientation
    #[wasm_bindgen(getter, js_name = imageHeight)]
    pub fn image_height(&self) -> u32 {
        self.session.engine().image().height
    }

    #[wasm_bindgen(js_name = cropRect)]
    pub fn crop_rect(&self) -> JsCropRect {
        self.session.engine().crop().into()
    }

    pub fn transform(&self) -> JsDisplayTransform {
        self.session.engine().transform().into()
    }

    /// `idle`, `dragging` or `resize-<corner>`.
    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> String {
        mode_name(self.session.mode()).to_string()
    }

    #[wasm_bindgen(getter, js_name = isOpen)]
    pub fn is_open(&self) -> bool {
        self.session.is_open()
    }

    /// Object URL of the source photo, created on first use.
    ///
    /// The URL is revoked once the editor commits, cancels or is freed.
    #[wasm_bindgen(js_name = sourceUrl)]
    pub fn source_url(&mut self) -> Result<String, JsValue> {
        if let Some(url) = &self.source_url {
            return Ok(url.as_str().to_string());
        }
        let bytes = self
            .source_bytes
            .as_deref()
            .ok_or_else(|| to_js_error(CropError::SessionClosed))?;
        let mime = guess_mime_type(bytes).unwrap_or(FALLBACK_MIME);
        let url = ObjectUrl::new(bytes, mime)?;
        let result = url.as_str().to_string();
        self.source_url = Some(url);
        Ok(result)
    }

    /// Rasterize the crop and pass it to `onCropComplete`.
    ///
    /// Throws if encoding fails; the editor then stays open and `commit`
    /// can be called again.
    pub fn commit(&mut self) -> Result<(), JsValue> {
        let result = self.session.commit().map_err(to_js_error);
        self.release_if_closed();
        result
    }

    /// Close without a crop and call `onCancel`. Safe to call repeatedly.
    pub fn cancel(&mut self) {
        self.session.cancel();
        self.release_if_closed();
    }
}

impl JsCropEditor {
    fn release_if_closed(&mut self) {
        if !self.session.is_open() {
            self.source_url = None;
            self.source_bytes = None;
        }
    }
}

/// Read editor options from JS, `undefined` or `null` meaning defaults.
pub(crate) fn parse_options(options: JsValue) -> Result<CropConfig, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(CropConfig::default());
    }
    serde_wasm_bindgen::from_value(options).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn to_js_error(err: CropError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use leafcrop_core::decode::DecodedImage;
    use leafcrop_core::encode::encode_png;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn photo_png() -> Vec<u8> {
        let img = DecodedImage::filled(1000, 800, [60, 150, 70]);
        encode_png(&img.pixels, img.width, img.height).unwrap()
    }

    fn noop() -> js_sys::Function {
        js_sys::Function::new_no_args("")
    }

    fn editor() -> JsCropEditor {
        JsCropEditor::new(photo_png(), 500.0, 500.0, JsValue::UNDEFINED, noop(), noop()).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_editor_initial_layout() {
        let editor = editor();
        let crop = editor.crop_rect();
        assert_eq!((crop.x(), crop.y(), crop.size()), (194.0, 194.0, 112.0));
        assert_eq!(editor.scale(), 0.5);
        assert_eq!(editor.transform().offset_y(), 50.0);
        assert_eq!(editor.mode(), "idle");
    }

    #[wasm_bindgen_test]
    fn test_editor_rejects_garbage() {
        let result = JsCropEditor::new(vec![1, 2, 3], 500.0, 500.0, JsValue::NULL, noop(), noop());
        assert!(result.is_err());
    }

    #[wasm_bindgen_test]
    fn test_editor_drag() {
        let mut editor = editor();
        assert_eq!(editor.pointer_down(250.0, 250.0), "dragging");
        assert!(editor.pointer_move(260.0, 250.0));
        editor.pointer_up();
        assert_eq!(editor.crop_rect().x(), 204.0);
    }

    #[wasm_bindgen_test]
    fn test_commit_calls_back_and_releases_source() {
        let on_complete = js_sys::Function::new_with_args(
            "bytes, preview",
            "globalThis.__leafcropPreview = preview;",
        );
        let mut editor =
            JsCropEditor::new(photo_png(), 500.0, 500.0, JsValue::UNDEFINED, on_complete, noop())
                .unwrap();
        assert!(editor.source_url().unwrap().starts_with("blob:"));

        editor.commit().unwrap();

        assert!(!editor.is_open());
        assert!(editor.source_url().is_err());
        let preview = js_sys::Reflect::get(&js_sys::global(), &"__leafcropPreview".into()).unwrap();
        assert!(preview
            .as_string()
            .unwrap()
            .starts_with("data:image/jpeg;base64,"));
    }

    #[wasm_bindgen_test]
    fn test_cancel_twice() {
        let mut editor = editor();
        editor.cancel();
        editor.cancel();
        assert!(!editor.is_open());
        assert!(editor.commit().is_err());
    }

    #[wasm_bindgen_test]
    fn test_parse_options() {
        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &"targetSize".into(), &JsValue::from(128)).unwrap();
        let config = parse_options(options.into()).unwrap();
        assert_eq!(config.target_size, 128);
        assert_eq!(parse_options(JsValue::UNDEFINED).unwrap(), CropConfig::default());
    }
}
