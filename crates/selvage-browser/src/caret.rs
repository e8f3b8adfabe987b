//! Caret lookup from client coordinates.
//!
//! Tries `caretRangeFromPoint` (WebKit/Blink), then the standard
//! `caretPositionFromPoint` (Gecko), then IE's `TextRange.moveToPoint`.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use selvage_core::{CaretLocator, DomPoint, DomRange, NativeRangeLike, NativeSelection};

use crate::dom::BrowserNode;
use crate::selection::{BrowserSelection, range_to_dom};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(extends = web_sys::Document)]
    type CaretDocument;

    #[wasm_bindgen(method, catch, js_name = caretRangeFromPoint)]
    fn caret_range_from_point(
        this: &CaretDocument,
        x: f64,
        y: f64,
    ) -> Result<Option<web_sys::Range>, JsValue>;

    #[wasm_bindgen(method, catch, js_name = caretPositionFromPoint)]
    fn caret_position_from_point(
        this: &CaretDocument,
        x: f64,
        y: f64,
    ) -> Result<Option<CaretPosition>, JsValue>;

    type CaretPosition;

    #[wasm_bindgen(method, getter, js_name = offsetNode)]
    fn offset_node(this: &CaretPosition) -> Option<web_sys::Node>;

    #[wasm_bindgen(method, getter)]
    fn offset(this: &CaretPosition) -> u32;

    type LegacyBody;

    #[wasm_bindgen(method, catch, js_name = createTextRange)]
    fn create_text_range(this: &LegacyBody) -> Result<TextRange, JsValue>;

    type TextRange;

    #[wasm_bindgen(method, catch, js_name = moveToPoint)]
    fn move_to_point(this: &TextRange, x: f64, y: f64) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn select(this: &TextRange) -> Result<(), JsValue>;
}

fn has_method(target: &JsValue, name: &str) -> bool {
    js_sys::Reflect::get(target, &JsValue::from_str(name))
        .map(|value| value.is_function())
        .unwrap_or(false)
}

#[derive(Clone, Debug)]
pub struct BrowserCaretLocator {
    window: web_sys::Window,
    document: web_sys::Document,
}

impl BrowserCaretLocator {
    pub fn new(window: web_sys::Window, document: web_sys::Document) -> Self {
        Self { window, document }
    }

    fn legacy_caret(&self, x: f64, y: f64) -> Option<NativeRangeLike<BrowserNode>> {
        let body = self.document.body()?;
        if !has_method(&body, "createTextRange") {
            return None;
        }
        let text_range = body.unchecked_ref::<LegacyBody>().create_text_range().ok()?;
        if let Err(err) = text_range.move_to_point(x, y) {
            tracing::debug!(target: "selvage::events", ?err, "moveToPoint threw");
            return None;
        }
        // a TextRange has no DOM boundary points; select it to read them back
        text_range.select().ok()?;
        let selection = BrowserSelection(self.window.get_selection().ok().flatten()?);
        selection.first_range().map(NativeRangeLike::from)
    }
}

impl CaretLocator for BrowserCaretLocator {
    type Node = BrowserNode;

    fn caret_at(&self, x: f64, y: f64) -> Option<NativeRangeLike<BrowserNode>> {
        let document = self.document.unchecked_ref::<CaretDocument>();

        if has_method(&self.document, "caretRangeFromPoint") {
            let range = document.caret_range_from_point(x, y).ok().flatten()?;
            return range_to_dom(&range).ok().map(NativeRangeLike::from);
        }

        if has_method(&self.document, "caretPositionFromPoint") {
            let position = document.caret_position_from_point(x, y).ok().flatten()?;
            let point = DomPoint::new(BrowserNode(position.offset_node()?), position.offset() as usize);
            return Some(DomRange::new(point.clone(), point).into());
        }

        self.legacy_caret(x, y)
    }
}
