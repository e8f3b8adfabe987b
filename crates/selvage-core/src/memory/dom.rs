use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::dom::{DomNode, DomNodeKind, DomPoint, ZERO_WIDTH_CHAR};
use crate::error::DomError;

enum Data {
    Element {
        tag: String,
        attributes: RefCell<Vec<(String, String)>>,
    },
    Text(String),
    Comment(String),
}

struct Inner {
    data: Data,
    parent: RefCell<Weak<Inner>>,
    children: RefCell<Vec<MemoryNode>>,
    kind_error: RefCell<Option<DomError>>,
}

/// A node handle. Clones share the node; equality is identity.
#[derive(Clone)]
pub struct MemoryNode(Rc<Inner>);

impl MemoryNode {
    fn with_data(data: Data) -> Self {
        Self(Rc::new(Inner {
            data,
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
            kind_error: RefCell::new(None),
        }))
    }

    pub fn element(tag: impl Into<String>) -> Self {
        Self::with_data(Data::Element {
            tag: tag.into(),
            attributes: RefCell::new(Vec::new()),
        })
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::with_data(Data::Text(text.into()))
    }

    pub fn comment(data: impl Into<String>) -> Self {
        Self::with_data(Data::Comment(data.into()))
    }

    pub fn with_attr(self, name: &str, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Set an attribute, keeping its original position if it already exists.
    /// No-op on non-elements.
    pub fn set_attribute(&self, name: &str, value: impl Into<String>) {
        if let Data::Element { attributes, .. } = &self.0.data {
            let mut attributes = attributes.borrow_mut();
            let value = value.into();
            match attributes.iter_mut().find(|(n, _)| n == name) {
                Some((_, existing)) => *existing = value,
                None => attributes.push((name.to_string(), value)),
            }
        }
    }

    /// Append `child`, detaching it from its current parent first.
    pub fn append(&self, child: &MemoryNode) {
        child.detach();
        *child.0.parent.borrow_mut() = Rc::downgrade(&self.0);
        self.0.children.borrow_mut().push(child.clone());
    }

    pub fn with_children(self, children: Vec<MemoryNode>) -> Self {
        for child in &children {
            self.append(child);
        }
        self
    }

    pub fn detach(&self) {
        let parent = self.parent();
        if let Some(parent) = parent {
            parent.0.children.borrow_mut().retain(|c| c != self);
        }
        *self.0.parent.borrow_mut() = Weak::new();
    }

    /// Make `kind()` fail like Firefox does on its internal restricted
    /// elements.
    pub fn set_restricted(&self, restricted: bool) {
        let error = restricted.then(|| DomError::RestrictedAccess("nodeType".into()));
        self.set_kind_error(error);
    }

    /// Make `kind()` fail with `error`, or succeed again with `None`.
    pub fn set_kind_error(&self, error: Option<DomError>) {
        *self.0.kind_error.borrow_mut() = error;
    }

    /// Serialize the subtree. Zero-width characters are written as
    /// `&#xFEFF;` so snapshots stay readable.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match &self.0.data {
            Data::Text(text) => escape_into(text, out),
            Data::Comment(data) => {
                out.push_str("<!--");
                out.push_str(data);
                out.push_str("-->");
            }
            Data::Element { tag, attributes } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes.borrow().iter() {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_into(value, out);
                    out.push('"');
                }
                out.push('>');
                if matches!(tag.as_str(), "br" | "img") {
                    return;
                }
                for child in self.0.children.borrow().iter() {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }

    /// Child indices from the topmost ancestor down to this node.
    fn tree_path(&self) -> Vec<usize> {
        let mut path = Vec::new();
        let mut node = self.clone();
        while let Some(parent) = node.parent() {
            let index = parent
                .0
                .children
                .borrow()
                .iter()
                .position(|c| c == &node)
                .unwrap_or(0);
            path.push(index);
            node = parent;
        }
        path.reverse();
        path
    }
}

/// Compare two boundary points in document order.
///
/// A boundary `(node, offset)` sorts as the node's tree path followed by the
/// offset. Text nodes have no children, so this also orders a text position
/// correctly against element boundaries around it.
pub(crate) fn compare_points(a: &DomPoint<MemoryNode>, b: &DomPoint<MemoryNode>) -> Ordering {
    let mut key_a = a.node.tree_path();
    key_a.push(a.offset);
    let mut key_b = b.node.tree_path();
    key_b.push(b.offset);
    key_a.cmp(&key_b)
}

fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            ZERO_WIDTH_CHAR => out.push_str("&#xFEFF;"),
            c => out.push(c),
        }
    }
}

impl PartialEq for MemoryNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for MemoryNode {}

impl fmt::Debug for MemoryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.data {
            Data::Element { tag, attributes } => {
                write!(f, "<{tag}")?;
                for (name, value) in attributes.borrow().iter() {
                    write!(f, " {name}={value:?}")?;
                }
                write!(f, ">")
            }
            Data::Text(text) => write!(f, "#text {:?}", text),
            Data::Comment(data) => write!(f, "<!--{data}-->"),
        }
    }
}

impl DomNode for MemoryNode {
    fn kind(&self) -> Result<DomNodeKind, DomError> {
        if let Some(err) = self.0.kind_error.borrow().clone() {
            return Err(err);
        }
        Ok(match self.0.data {
            Data::Element { .. } => DomNodeKind::Element,
            Data::Text(_) => DomNodeKind::Text,
            Data::Comment(_) => DomNodeKind::Comment,
        })
    }

    fn parent(&self) -> Option<Self> {
        self.0.parent.borrow().upgrade().map(MemoryNode)
    }

    fn child_nodes(&self) -> Vec<Self> {
        self.0.children.borrow().clone()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        match &self.0.data {
            Data::Element { attributes, .. } => attributes
                .borrow()
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.clone()),
            _ => None,
        }
    }

    fn text_content(&self) -> String {
        match &self.0.data {
            Data::Text(text) => text.clone(),
            Data::Comment(data) => data.clone(),
            Data::Element { .. } => {
                let mut out = String::new();
                for node in self.descendants() {
                    if let Data::Text(text) = &node.0.data {
                        out.push_str(text);
                    }
                }
                out
            }
        }
    }

    fn is_content_editable(&self) -> bool {
        if !matches!(self.0.data, Data::Element { .. }) {
            return false;
        }
        let mut current = Some(self.clone());
        while let Some(node) = current {
            match node.attribute("contenteditable").as_deref() {
                Some("true") | Some("") => return true,
                Some("false") => return false,
                _ => current = node.parent(),
            }
        }
        false
    }
}
