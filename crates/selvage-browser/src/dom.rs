//! `DomNode` for `web_sys::Node`.

use std::fmt;

use wasm_bindgen::{JsCast, JsValue};

use selvage_core::{DomError, DomNode, DomNodeKind};

/// A browser DOM node. Equality is `isSameNode`.
#[derive(Clone)]
pub struct BrowserNode(pub web_sys::Node);

impl BrowserNode {
    pub fn new(node: impl Into<web_sys::Node>) -> Self {
        Self(node.into())
    }

    pub fn as_node(&self) -> &web_sys::Node {
        &self.0
    }

    pub fn as_element(&self) -> Option<&web_sys::Element> {
        self.0.dyn_ref::<web_sys::Element>()
    }

    /// The node itself if it is an element, else its parent element.
    pub fn element_or_parent(&self) -> Option<web_sys::Element> {
        match self.as_element() {
            Some(element) => Some(element.clone()),
            None => self.0.parent_element(),
        }
    }
}

impl PartialEq for BrowserNode {
    fn eq(&self, other: &Self) -> bool {
        self.0.is_same_node(Some(&other.0))
    }
}

impl Eq for BrowserNode {}

impl fmt::Debug for BrowserNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BrowserNode").field(&self.0.node_name()).finish()
    }
}

impl From<web_sys::Node> for BrowserNode {
    fn from(node: web_sys::Node) -> Self {
        Self(node)
    }
}

/// Map a thrown JS value to a [`DomError`]. Firefox's "Permission denied to
/// access property" on restricted elements becomes
/// [`DomError::RestrictedAccess`].
pub fn dom_error(value: JsValue) -> DomError {
    let message = value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"));
    if message.contains("Permission denied") {
        DomError::RestrictedAccess(message)
    } else {
        DomError::Operation(message)
    }
}

impl DomNode for BrowserNode {
    fn kind(&self) -> Result<DomNodeKind, DomError> {
        // `nodeType` throws on restricted elements; read it through Reflect
        // so the exception surfaces as an error instead of a trap.
        let node_type = js_sys::Reflect::get(&self.0, &JsValue::from_str("nodeType"))
            .map_err(dom_error)?
            .as_f64()
            .ok_or_else(|| DomError::Operation("nodeType is not a number".into()))?;
        Ok(match node_type as u16 {
            web_sys::Node::ELEMENT_NODE => DomNodeKind::Element,
            web_sys::Node::TEXT_NODE => DomNodeKind::Text,
            web_sys::Node::COMMENT_NODE => DomNodeKind::Comment,
            _ => DomNodeKind::Other,
        })
    }

    fn parent(&self) -> Option<Self> {
        self.0.parent_node().map(BrowserNode)
    }

    fn child_nodes(&self) -> Vec<Self> {
        let list = self.0.child_nodes();
        (0..list.length())
            .filter_map(|i| list.item(i))
            .map(BrowserNode)
            .collect()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.as_element()?.get_attribute(name)
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.as_element().is_some_and(|e| e.has_attribute(name))
    }

    fn text_content(&self) -> String {
        self.0.text_content().unwrap_or_default()
    }

    fn is_content_editable(&self) -> bool {
        self.0
            .dyn_ref::<web_sys::HtmlElement>()
            .is_some_and(|e| e.is_content_editable())
    }

    fn contains(&self, other: &Self) -> bool {
        self.0.contains(Some(&other.0))
    }

    fn closest(&self, attribute: &str) -> Option<Self> {
        let start = self.element_or_parent()?;
        start
            .closest(&format!("[{attribute}]"))
            .ok()
            .flatten()
            .map(|e| BrowserNode(e.into()))
    }

    fn query(&self, attribute: &str) -> Option<Self> {
        self.as_element()?
            .query_selector(&format!("[{attribute}]"))
            .ok()
            .flatten()
            .map(|e| BrowserNode(e.into()))
    }
}
