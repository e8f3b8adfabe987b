//! `DomHost` for the browser window.

use wasm_bindgen::{JsCast, JsValue};

use selvage_core::{DomError, DomHost, Rect, Viewport, scroll_target};

use crate::dom::{BrowserNode, dom_error};
use crate::error::BrowserError;
use crate::platform::{Platform, platform};
use crate::selection::BrowserSelection;

const OVERFLOWS: [&str; 3] = ["auto", "overlay", "scroll"];

/// The window an editor lives in.
#[derive(Clone, Debug)]
pub struct BrowserHost {
    window: web_sys::Window,
    document: web_sys::Document,
    platform: &'static Platform,
}

impl BrowserHost {
    pub fn new() -> Result<Self, BrowserError> {
        let window = web_sys::window().ok_or(BrowserError::NoWindow)?;
        let document = window.document().ok_or(BrowserError::NoDocument)?;
        Ok(Self {
            window,
            document,
            platform: platform(),
        })
    }

    pub fn window(&self) -> &web_sys::Window {
        &self.window
    }

    pub fn document(&self) -> &web_sys::Document {
        &self.document
    }

    pub fn platform(&self) -> &'static Platform {
        self.platform
    }

    /// Nearest ancestor that scrolls vertically, else the document's
    /// scrolling element.
    fn scroll_container(&self, node: &web_sys::Node) -> Option<web_sys::Element> {
        let mut parent = node.parent_element();
        while let Some(element) = parent {
            if element.parent_node().is_none() {
                break;
            }
            let overflow = self
                .window
                .get_computed_style(&element)
                .ok()
                .flatten()
                .and_then(|style| style.get_property_value("overflow-y").ok())
                .unwrap_or_default();
            if OVERFLOWS.contains(&overflow.as_str()) {
                return Some(element);
            }
            parent = element.parent_element();
        }
        self.document
            .scrolling_element()
            .or_else(|| self.document.document_element())
    }

    fn caret_rect(range: &web_sys::Range, backward: bool) -> Option<Rect> {
        let caret = range.clone_range();
        caret.collapse_with_to_start(backward);
        let rect = caret.get_bounding_client_rect();
        let mut cursor = Rect::new(rect.left(), rect.top(), rect.width(), rect.height());
        // collapsed ranges measure as zero in Safari
        if cursor.is_empty() {
            let first = caret.get_client_rects()?.get(0)?;
            cursor = Rect::new(first.left(), first.top(), first.width(), first.height());
        }
        Some(cursor)
    }

    fn viewport(&self, scroller: &web_sys::Element, is_window: bool) -> Viewport {
        if is_window {
            return Viewport::window(
                self.window.page_x_offset().unwrap_or(0.0),
                self.window.page_y_offset().unwrap_or(0.0),
                js_number(self.window.inner_width()),
                js_number(self.window.inner_height()),
            );
        }
        let style = self.window.get_computed_style(scroller).ok().flatten();
        let px = |name: &str| {
            style
                .as_ref()
                .and_then(|s| s.get_property_value(name).ok())
                .map(|v| parse_px(&v))
                .unwrap_or(0.0)
        };
        let rect = scroller.get_bounding_client_rect();
        let (width, height) = match scroller.dyn_ref::<web_sys::HtmlElement>() {
            Some(html) => (html.offset_width() as f64, html.offset_height() as f64),
            None => (rect.width(), rect.height()),
        };
        Viewport {
            scroll_x: scroller.scroll_left() as f64,
            scroll_y: scroller.scroll_top() as f64,
            width,
            height,
            origin_x: rect.left() + px("border-left-width"),
            origin_y: rect.top() + px("border-top-width"),
            padding_left: px("padding-left"),
            padding_top: px("padding-top"),
        }
    }
}

fn js_number(value: Result<JsValue, JsValue>) -> f64 {
    value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
}

fn parse_px(value: &str) -> f64 {
    value.trim().trim_end_matches("px").parse().unwrap_or(0.0)
}

impl DomHost for BrowserHost {
    type Node = BrowserNode;
    type Selection = BrowserSelection;

    fn selection(&self) -> Option<BrowserSelection> {
        self.window.get_selection().ok().flatten().map(BrowserSelection)
    }

    fn active_element(&self) -> Option<BrowserNode> {
        self.document
            .active_element()
            .map(|e| BrowserNode(e.into()))
    }

    fn focus(&self, element: &BrowserNode, prevent_scroll: bool) -> Result<(), DomError> {
        let target = element.as_node();
        let focus = js_sys::Reflect::get(target, &JsValue::from_str("focus"))
            .map_err(dom_error)?
            .dyn_into::<js_sys::Function>()
            .map_err(|_| DomError::Operation("element is not focusable".into()))?;
        let options = js_sys::Object::new();
        js_sys::Reflect::set(
            &options,
            &JsValue::from_str("preventScroll"),
            &JsValue::from_bool(prevent_scroll),
        )
        .map_err(dom_error)?;
        focus.call1(target, &options).map(|_| ()).map_err(dom_error)
    }

    fn blur(&self, element: &BrowserNode) -> Result<(), DomError> {
        match element.as_node().dyn_ref::<web_sys::HtmlElement>() {
            Some(html) => html.blur().map_err(dom_error),
            None => Ok(()),
        }
    }

    fn scroll_selection_into_view(&self, selection: &BrowserSelection, backward: bool) {
        // mobile browsers keep the caret in view themselves
        if self.platform.ios || self.platform.android {
            return;
        }
        let native = &selection.0;
        let Some(anchor) = native.anchor_node() else {
            return;
        };
        if native.range_count() == 0 {
            return;
        }
        let Ok(range) = native.get_range_at(0) else {
            return;
        };
        let Some(cursor) = Self::caret_rect(&range, backward) else {
            return;
        };
        let Some(scroller) = self.scroll_container(&anchor) else {
            return;
        };

        let is_window = self.document.body().is_some_and(|b| {
            let body: &web_sys::Element = b.as_ref();
            body == &scroller
        }) || self
            .document
            .document_element()
            .is_some_and(|e| e == scroller);

        let viewport = self.viewport(&scroller, is_window);
        let Some((x, y)) = scroll_target(cursor, &viewport) else {
            return;
        };
        tracing::trace!(target: "selvage::reconcile", x, y, is_window, "scrolling caret into view");
        if is_window {
            self.window.scroll_to_with_x_and_y(x, y);
        } else {
            scroller.set_scroll_left(x as i32);
            scroller.set_scroll_top(y as i32);
        }
    }
}
