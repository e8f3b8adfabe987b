//! `NativeSelection` for `web_sys::Selection`, plus Range/StaticRange
//! conversions.

use wasm_bindgen::prelude::*;

use selvage_core::{DomError, DomPoint, DomRange, NativeRangeLike, NativeSelection};

use crate::dom::{BrowserNode, dom_error};

// === StaticRange binding ===
//
// web-sys doesn't expose StaticRange. It is what
// InputEvent.getTargetRanges() returns.

#[wasm_bindgen]
extern "C" {
    /// A range that doesn't track DOM mutations.
    pub type StaticRange;

    #[wasm_bindgen(method, getter, structural)]
    pub fn startContainer(this: &StaticRange) -> web_sys::Node;

    #[wasm_bindgen(method, getter, structural)]
    pub fn startOffset(this: &StaticRange) -> u32;

    #[wasm_bindgen(method, getter, structural)]
    pub fn endContainer(this: &StaticRange) -> web_sys::Node;

    #[wasm_bindgen(method, getter, structural)]
    pub fn endOffset(this: &StaticRange) -> u32;
}

pub fn static_range_to_native(range: &StaticRange) -> NativeRangeLike<BrowserNode> {
    DomRange::new(
        DomPoint::new(BrowserNode(range.startContainer()), range.startOffset() as usize),
        DomPoint::new(BrowserNode(range.endContainer()), range.endOffset() as usize),
    )
    .into()
}

pub fn range_to_dom(range: &web_sys::Range) -> Result<DomRange<BrowserNode>, DomError> {
    Ok(DomRange::new(
        DomPoint::new(
            BrowserNode(range.start_container().map_err(dom_error)?),
            range.start_offset().map_err(dom_error)? as usize,
        ),
        DomPoint::new(
            BrowserNode(range.end_container().map_err(dom_error)?),
            range.end_offset().map_err(dom_error)? as usize,
        ),
    ))
}

/// The document selection.
#[derive(Clone, Debug)]
pub struct BrowserSelection(pub web_sys::Selection);

impl BrowserSelection {
    fn point(node: Option<web_sys::Node>, offset: u32) -> Option<DomPoint<BrowserNode>> {
        Some(DomPoint::new(BrowserNode(node?), offset as usize))
    }
}

impl NativeSelection for BrowserSelection {
    type Node = BrowserNode;

    fn range_count(&self) -> usize {
        self.0.range_count() as usize
    }

    fn anchor(&self) -> Option<DomPoint<BrowserNode>> {
        Self::point(self.0.anchor_node(), self.0.anchor_offset())
    }

    fn focus(&self) -> Option<DomPoint<BrowserNode>> {
        Self::point(self.0.focus_node(), self.0.focus_offset())
    }

    fn is_collapsed(&self) -> bool {
        self.0.is_collapsed()
    }

    fn first_range(&self) -> Option<DomRange<BrowserNode>> {
        if self.0.range_count() == 0 {
            return None;
        }
        let range = self.0.get_range_at(0).ok()?;
        range_to_dom(&range).ok()
    }

    fn remove_all_ranges(&self) -> Result<(), DomError> {
        self.0.remove_all_ranges().map_err(dom_error)
    }

    fn supports_base_and_extent(&self) -> bool {
        js_sys::Reflect::has(&self.0, &JsValue::from_str("setBaseAndExtent")).unwrap_or(false)
    }

    fn set_base_and_extent(
        &self,
        base: &DomPoint<BrowserNode>,
        extent: &DomPoint<BrowserNode>,
    ) -> Result<(), DomError> {
        self.0
            .set_base_and_extent(
                base.node.as_node(),
                base.offset as u32,
                extent.node.as_node(),
                extent.offset as u32,
            )
            .map_err(dom_error)
    }

    fn add_range(&self, range: &DomRange<BrowserNode>) -> Result<(), DomError> {
        let document = range
            .start
            .node
            .as_node()
            .owner_document()
            .ok_or(DomError::Detached)?;
        let native = document.create_range().map_err(dom_error)?;
        native
            .set_start(range.start.node.as_node(), range.start.offset as u32)
            .map_err(dom_error)?;
        native
            .set_end(range.end.node.as_node(), range.end.offset as u32)
            .map_err(dom_error)?;
        self.0.add_range(&native).map_err(dom_error)
    }
}
