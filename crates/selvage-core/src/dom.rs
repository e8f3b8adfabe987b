//! DOM abstraction: the node, selection and host capabilities the mapping
//! layer needs, plus the data-attribute contract shared with the view layer.
//!
//! `selvage-browser` implements these traits for `web_sys` types; the
//! [`memory`](crate::memory) module implements them for an in-memory tree.

use std::fmt;

use crate::error::DomError;

// === Data-attribute contract ===
//
// These must match the view layer bit-for-bit.

/// Node key on every node-ref subtree root.
pub const DATA_KEY: &str = "data-key";
/// `block` | `inline` | `text`.
pub const DATA_OBJECT: &str = "data-slate-object";
/// Span holding a leaf's literal text.
pub const DATA_STRING: &str = "data-slate-string";
/// Zero-width placeholder span; value is a [`ZeroWidthKind`].
pub const DATA_ZERO_WIDTH: &str = "data-slate-zero-width";
/// Logical length a zero-width placeholder stands in for.
pub const DATA_LENGTH: &str = "data-slate-length";
/// Root element of a void node.
pub const DATA_VOID: &str = "data-slate-void";
/// Editor content root.
pub const DATA_EDITOR: &str = "data-slate-editor";
/// Element rendering one text leaf.
pub const DATA_LEAF: &str = "data-slate-leaf";
pub const DATA_OFFSET_KEY: &str = "data-offset-key";
/// Caret target rendered inside void nodes.
pub const DATA_SPACER: &str = "data-spacer";

/// Character rendered by zero-width placeholders.
pub const ZERO_WIDTH_CHAR: char = '\u{FEFF}';

/// Placeholder flavour, the value of `data-slate-zero-width`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZeroWidthKind {
    /// `n`: the only (empty) text of an empty block, followed by a `<br>`.
    Normal,
    /// `z`: empty text at an inline edge, or the text inside a void.
    Zero,
}

impl ZeroWidthKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ZeroWidthKind::Normal => "n",
            ZeroWidthKind::Zero => "z",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "n" => Some(ZeroWidthKind::Normal),
            "z" => Some(ZeroWidthKind::Zero),
            _ => None,
        }
    }
}

// === Nodes ===

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DomNodeKind {
    Element,
    Text,
    Comment,
    Other,
}

/// A handle to a DOM node. Equality is node identity.
pub trait DomNode: Clone + PartialEq + fmt::Debug + 'static {
    /// The node type. Fails with [`DomError::RestrictedAccess`] on Firefox
    /// for internal restricted elements.
    fn kind(&self) -> Result<DomNodeKind, DomError>;

    fn parent(&self) -> Option<Self>;

    fn child_nodes(&self) -> Vec<Self>;

    /// Attribute value; always `None` for non-elements.
    fn attribute(&self, name: &str) -> Option<String>;

    fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// `textContent`: concatenated text of all descendant text nodes.
    fn text_content(&self) -> String;

    /// `isContentEditable`; always false for non-elements.
    fn is_content_editable(&self) -> bool;

    fn is_element(&self) -> bool {
        matches!(self.kind(), Ok(DomNodeKind::Element))
    }

    fn is_text(&self) -> bool {
        matches!(self.kind(), Ok(DomNodeKind::Text))
    }

    /// Length of `textContent` in UTF-16 code units.
    fn text_len(&self) -> usize {
        self.text_content().encode_utf16().count()
    }

    /// Inclusive containment, like `Node.contains`.
    fn contains(&self, other: &Self) -> bool {
        let mut current = Some(other.clone());
        while let Some(node) = current {
            if &node == self {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Nearest inclusive ancestor carrying `attribute`, like
    /// `Element.closest("[attribute]")`.
    fn closest(&self, attribute: &str) -> Option<Self> {
        let mut current = Some(self.clone());
        while let Some(node) = current {
            if node.has_attribute(attribute) {
                return Some(node);
            }
            current = node.parent();
        }
        None
    }

    /// All descendants in document (pre-)order, excluding `self`.
    fn descendants(&self) -> Vec<Self> {
        let mut out = Vec::new();
        let mut stack: Vec<Self> = self.child_nodes().into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            stack.extend(node.child_nodes().into_iter().rev());
            out.push(node);
        }
        out
    }

    /// First descendant carrying `attribute`, like
    /// `querySelector("[attribute]")`.
    fn query(&self, attribute: &str) -> Option<Self> {
        self.descendants()
            .into_iter()
            .find(|n| n.has_attribute(attribute))
    }
}

// === Positions ===

/// A DOM boundary point: a node and an offset into it (UTF-16 units for
/// text nodes, child index for elements).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomPoint<N> {
    pub node: N,
    pub offset: usize,
}

impl<N> DomPoint<N> {
    pub fn new(node: N, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// A native range as a value: start always precedes end in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomRange<N> {
    pub start: DomPoint<N>,
    pub end: DomPoint<N>,
}

impl<N: PartialEq> DomRange<N> {
    pub fn new(start: DomPoint<N>, end: DomPoint<N>) -> Self {
        Self { start, end }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Whether both ranges cover the same extent, comparing the
    /// (start container, start offset, end container, end offset) tuple
    /// in both orientations.
    ///
    /// Native ranges have no direction, so a range equal to `other` with its
    /// endpoints swapped still selects the same thing.
    pub fn same_extent(&self, other: &DomRange<N>) -> bool {
        (self.start == other.start && self.end == other.end)
            || (self.start == other.end && self.end == other.start)
    }
}

/// Anything a model range can be read back from: a Selection (anchor/focus
/// with direction) or a Range/StaticRange (start/end).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NativeRangeLike<N> {
    Selection {
        anchor: DomPoint<N>,
        focus: DomPoint<N>,
        is_collapsed: bool,
    },
    Range(DomRange<N>),
}

impl<N: DomNode> NativeRangeLike<N> {
    /// Snapshot the anchor/focus of a native selection.
    pub fn from_selection<S: NativeSelection<Node = N>>(selection: &S) -> Option<Self> {
        Some(NativeRangeLike::Selection {
            anchor: selection.anchor()?,
            focus: selection.focus()?,
            is_collapsed: selection.is_collapsed(),
        })
    }

    /// Anchor, focus and collapsed flag. Ranges read as start → end.
    pub fn endpoints(&self) -> (&DomPoint<N>, &DomPoint<N>, bool) {
        match self {
            NativeRangeLike::Selection {
                anchor,
                focus,
                is_collapsed,
            } => (anchor, focus, *is_collapsed),
            NativeRangeLike::Range(range) => (&range.start, &range.end, range.is_collapsed()),
        }
    }
}

impl<N> From<DomRange<N>> for NativeRangeLike<N> {
    fn from(range: DomRange<N>) -> Self {
        NativeRangeLike::Range(range)
    }
}

// === Selection & host ===

/// The document's native selection.
pub trait NativeSelection {
    type Node: DomNode;

    fn range_count(&self) -> usize;

    fn anchor(&self) -> Option<DomPoint<Self::Node>>;

    fn focus(&self) -> Option<DomPoint<Self::Node>>;

    fn is_collapsed(&self) -> bool;

    /// `getRangeAt(0)`, if there is a range.
    fn first_range(&self) -> Option<DomRange<Self::Node>>;

    fn remove_all_ranges(&self) -> Result<(), DomError>;

    /// IE 11 lacks `setBaseAndExtent`.
    fn supports_base_and_extent(&self) -> bool {
        true
    }

    /// Select from `base` to `extent`, preserving direction.
    fn set_base_and_extent(
        &self,
        base: &DomPoint<Self::Node>,
        extent: &DomPoint<Self::Node>,
    ) -> Result<(), DomError>;

    fn add_range(&self, range: &DomRange<Self::Node>) -> Result<(), DomError>;
}

/// Window-level capabilities: the selection object, focus and scrolling.
pub trait DomHost {
    type Node: DomNode;
    type Selection: NativeSelection<Node = Self::Node>;

    /// `window.getSelection()`. `None` mirrors the Firefox defect where it
    /// returns null (e.g. inside hidden iframes).
    fn selection(&self) -> Option<Self::Selection>;

    /// `document.activeElement`.
    fn active_element(&self) -> Option<Self::Node>;

    fn focus(&self, element: &Self::Node, prevent_scroll: bool) -> Result<(), DomError>;

    fn blur(&self, element: &Self::Node) -> Result<(), DomError>;

    /// Scroll the caret end of the selection into view (the focus end, which
    /// is the start of the range when `backward`).
    fn scroll_selection_into_view(&self, selection: &Self::Selection, backward: bool);
}
