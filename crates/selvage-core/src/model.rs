//! Document model value types: nodes, paths, points, ranges and selections.
//!
//! All of these are immutable values created fresh per query. Offsets are in
//! UTF-16 code units (the unit the DOM Selection API reports), NOT bytes or
//! chars.

use std::collections::BTreeSet;
use std::fmt;

use smol_str::SmolStr;

/// Stable node identity, rendered into the DOM as `data-key`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(SmolStr);

impl Key {
    pub fn new(key: impl Into<SmolStr>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A formatting tag applied to a text node (bold, italic, ...).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Mark(SmolStr);

impl Mark {
    pub fn new(mark: impl Into<SmolStr>) -> Self {
        Self(mark.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Mark {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Active formatting marks.
pub type Marks = BTreeSet<Mark>;

/// Number of UTF-16 code units in `s`.
pub fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

// === Nodes ===

/// Node variant tag, rendered as `data-slate-object`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeObject {
    Document,
    Block,
    Inline,
    Text,
}

impl NodeObject {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeObject::Document => "document",
            NodeObject::Block => "block",
            NodeObject::Inline => "inline",
            NodeObject::Text => "text",
        }
    }
}

/// A composite node (document, block or inline).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub key: Key,
    /// Schema type name, e.g. `paragraph`, `link`, `image`.
    pub kind: SmolStr,
    pub nodes: Vec<Node>,
}

/// A leaf text node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Text {
    pub key: Key,
    pub text: String,
    pub marks: Marks,
}

impl Text {
    /// Length in UTF-16 code units.
    pub fn len(&self) -> usize {
        utf16_len(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Document(Element),
    Block(Element),
    Inline(Element),
    Text(Text),
}

impl Node {
    pub fn document(key: impl Into<Key>, nodes: Vec<Node>) -> Self {
        Node::Document(Element {
            key: key.into(),
            kind: SmolStr::new_static("document"),
            nodes,
        })
    }

    pub fn block(key: impl Into<Key>, kind: impl Into<SmolStr>, nodes: Vec<Node>) -> Self {
        Node::Block(Element {
            key: key.into(),
            kind: kind.into(),
            nodes,
        })
    }

    pub fn inline(key: impl Into<Key>, kind: impl Into<SmolStr>, nodes: Vec<Node>) -> Self {
        Node::Inline(Element {
            key: key.into(),
            kind: kind.into(),
            nodes,
        })
    }

    pub fn text(key: impl Into<Key>, text: impl Into<String>) -> Self {
        Node::Text(Text {
            key: key.into(),
            text: text.into(),
            marks: Marks::new(),
        })
    }

    pub fn marked_text<M: Into<Mark>>(
        key: impl Into<Key>,
        text: impl Into<String>,
        marks: impl IntoIterator<Item = M>,
    ) -> Self {
        Node::Text(Text {
            key: key.into(),
            text: text.into(),
            marks: marks.into_iter().map(Into::into).collect(),
        })
    }

    pub fn key(&self) -> &Key {
        match self {
            Node::Document(e) | Node::Block(e) | Node::Inline(e) => &e.key,
            Node::Text(t) => &t.key,
        }
    }

    pub fn object(&self) -> NodeObject {
        match self {
            Node::Document(_) => NodeObject::Document,
            Node::Block(_) => NodeObject::Block,
            Node::Inline(_) => NodeObject::Inline,
            Node::Text(_) => NodeObject::Text,
        }
    }

    /// Schema type name; `None` for text nodes.
    pub fn kind(&self) -> Option<&str> {
        match self {
            Node::Document(e) | Node::Block(e) | Node::Inline(e) => Some(&e.kind),
            Node::Text(_) => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Document(e) | Node::Block(e) | Node::Inline(e) => &e.nodes,
            Node::Text(_) => &[],
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Node::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Node::Block(_))
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, Node::Inline(_))
    }

    /// Concatenated text of every descendant text node.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for (_, text) in self.texts() {
            out.push_str(&text.text);
        }
        out
    }

    /// Descendant at `path`, relative to this node.
    pub fn get(&self, path: &Path) -> Option<&Node> {
        let mut node = self;
        for &index in path.indices() {
            node = node.children().get(index)?;
        }
        Some(node)
    }

    /// Text node at `path`, if the path addresses one.
    pub fn text_at(&self, path: &Path) -> Option<&Text> {
        self.get(path).and_then(Node::as_text)
    }

    /// Every descendant text node in document order, with relative paths.
    pub fn texts(&self) -> Vec<(Path, &Text)> {
        let mut out = Vec::new();
        collect_texts(self, Path::root(), &mut out);
        out
    }

    /// Last descendant text node, in document order.
    pub fn last_text(&self) -> Option<&Text> {
        self.texts().pop().map(|(_, text)| text)
    }

    /// Path of the node with the given key.
    pub fn path_of(&self, key: &Key) -> Option<Path> {
        if self.key() == key {
            return Some(Path::root());
        }
        for (index, child) in self.children().iter().enumerate() {
            if let Some(rest) = child.path_of(key) {
                return Some(Path::root().child(index).join(&rest));
            }
        }
        None
    }

    /// Deepest block strictly above `path` (this node included).
    pub fn closest_block(&self, path: &Path) -> Option<(Path, &Node)> {
        self.closest_ancestor(path, Node::is_block)
    }

    /// Deepest inline strictly above `path` (this node included).
    pub fn closest_inline(&self, path: &Path) -> Option<(Path, &Node)> {
        self.closest_ancestor(path, Node::is_inline)
    }

    fn closest_ancestor(&self, path: &Path, pred: fn(&Node) -> bool) -> Option<(Path, &Node)> {
        let mut node = self;
        let mut found = None;
        let indices = path.indices();
        for (depth, &index) in indices.iter().enumerate() {
            if pred(node) {
                found = Some((Path::new(indices[..depth].to_vec()), node));
            }
            node = node.children().get(index)?;
        }
        found
    }

    /// First text after `path` (outside its subtree), in document order.
    pub fn next_text(&self, path: &Path) -> Option<(Path, &Text)> {
        self.texts()
            .into_iter()
            .find(|(p, _)| p > path && !path.is_ancestor_of(p))
    }

    /// Last text before `path`, in document order.
    pub fn previous_text(&self, path: &Path) -> Option<(Path, &Text)> {
        self.texts()
            .into_iter()
            .rev()
            .find(|(p, _)| p < path && !p.is_ancestor_of(path))
    }
}

fn collect_texts<'a>(node: &'a Node, path: Path, out: &mut Vec<(Path, &'a Text)>) {
    match node {
        Node::Text(text) => out.push((path, text)),
        _ => {
            for (index, child) in node.children().iter().enumerate() {
                collect_texts(child, path.child(index), out);
            }
        }
    }
}

// === Coordinates ===

/// Child indices from the document root to a node.
///
/// The derived ordering is document order: an ancestor sorts before its
/// descendants, siblings sort by index.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path(Vec<usize>);

impl Path {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// The empty path, addressing the root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.is_root()
    }

    pub fn child(&self, index: usize) -> Path {
        let mut indices = self.0.clone();
        indices.push(index);
        Path(indices)
    }

    pub fn join(&self, rest: &Path) -> Path {
        let mut indices = self.0.clone();
        indices.extend_from_slice(&rest.0);
        Path(indices)
    }

    pub fn parent(&self) -> Option<Path> {
        let (_, init) = self.0.split_last()?;
        Some(Path(init.to_vec()))
    }

    /// Strict prefix check.
    pub fn is_ancestor_of(&self, other: &Path) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }
}

impl From<Vec<usize>> for Path {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl<const N: usize> From<[usize; N]> for Path {
    fn from(indices: [usize; N]) -> Self {
        Self(indices.to_vec())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// A cursor location inside the text node at `path`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub path: Path,
    /// UTF-16 offset within the text node.
    pub offset: usize,
}

impl Point {
    pub fn new(path: impl Into<Path>, offset: usize) -> Self {
        Self {
            path: path.into(),
            offset,
        }
    }

    pub fn with_offset(&self, offset: usize) -> Self {
        Self {
            path: self.path.clone(),
            offset,
        }
    }
}

/// Anchor/focus pair. The anchor is where selection started, the focus is
/// where it currently ends; they may be in either order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Range {
    pub anchor: Point,
    pub focus: Point,
}

impl Range {
    pub fn new(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    pub fn collapsed(point: Point) -> Self {
        Self {
            anchor: point.clone(),
            focus: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Whether the focus precedes the anchor in document order.
    pub fn is_backward(&self) -> bool {
        self.focus < self.anchor
    }

    pub fn start(&self) -> &Point {
        if self.is_backward() {
            &self.focus
        } else {
            &self.anchor
        }
    }

    pub fn end(&self) -> &Point {
        if self.is_backward() {
            &self.anchor
        } else {
            &self.focus
        }
    }

    /// The same extent with anchor and focus swapped.
    pub fn flipped(&self) -> Range {
        Range {
            anchor: self.focus.clone(),
            focus: self.anchor.clone(),
        }
    }
}

/// A range plus focus state and the active formatting marks.
///
/// An unset selection has neither anchor nor focus (nothing selected).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Option<Point>,
    pub focus: Option<Point>,
    pub is_focused: bool,
    /// Marks cannot be derived from the DOM; they are carried between
    /// selections.
    pub marks: Marks,
}

impl Selection {
    pub fn unset() -> Self {
        Self::default()
    }

    pub fn from_range(range: Range) -> Self {
        Self {
            anchor: Some(range.anchor),
            focus: Some(range.focus),
            is_focused: false,
            marks: Marks::new(),
        }
    }

    pub fn focused(mut self, is_focused: bool) -> Self {
        self.is_focused = is_focused;
        self
    }

    pub fn with_marks(mut self, marks: Marks) -> Self {
        self.marks = marks;
        self
    }

    pub fn is_set(&self) -> bool {
        self.anchor.is_some() && self.focus.is_some()
    }

    pub fn is_unset(&self) -> bool {
        !self.is_set()
    }

    pub fn is_blurred(&self) -> bool {
        !self.is_focused
    }

    pub fn is_backward(&self) -> bool {
        self.to_range().is_some_and(|r| r.is_backward())
    }

    pub fn to_range(&self) -> Option<Range> {
        Some(Range::new(self.anchor.clone()?, self.focus.clone()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        Node::document(
            "d",
            vec![
                Node::block(
                    "b0",
                    "paragraph",
                    vec![
                        Node::text("t0", "Hello"),
                        Node::inline("i0", "link", vec![Node::text("t1", "World")]),
                        Node::text("t2", ""),
                    ],
                ),
                Node::block("b1", "paragraph", vec![Node::text("t3", "Again")]),
            ],
        )
    }

    #[test]
    fn test_path_order_is_document_order() {
        assert!(Path::from([0]) < Path::from([0, 0]));
        assert!(Path::from([0, 1, 0]) < Path::from([0, 2]));
        assert!(Path::from([0, 2]) < Path::from([1, 0]));
        assert!(Path::from([0]).is_ancestor_of(&Path::from([0, 1])));
        assert!(!Path::from([0]).is_ancestor_of(&Path::from([0])));
    }

    #[test]
    fn test_range_direction() {
        let forward = Range::new(Point::new([0, 0], 1), Point::new([0, 2], 0));
        assert!(!forward.is_backward());
        assert!(forward.flipped().is_backward());
        assert_eq!(forward.flipped().start(), forward.start());

        // Same text node: offsets decide.
        let backward = Range::new(Point::new([1, 0], 4), Point::new([1, 0], 2));
        assert!(backward.is_backward());
        assert!(!Range::collapsed(Point::new([1, 0], 2)).is_backward());
    }

    #[test]
    fn test_closest_ancestors() {
        let doc = sample();
        let (block_path, block) = doc.closest_block(&Path::from([0, 1, 0])).unwrap();
        assert_eq!(block_path, Path::from([0]));
        assert_eq!(block.key().as_str(), "b0");

        let (inline_path, _) = doc.closest_inline(&Path::from([0, 1, 0])).unwrap();
        assert_eq!(inline_path, Path::from([0, 1]));
        assert!(doc.closest_inline(&Path::from([0, 0])).is_none());
    }

    #[test]
    fn test_sibling_texts() {
        let doc = sample();
        let (next, text) = doc.next_text(&Path::from([0, 1, 0])).unwrap();
        assert_eq!(next, Path::from([0, 2]));
        assert_eq!(text.key.as_str(), "t2");

        // Skips the subtree of the reference node itself.
        let (next, _) = doc.next_text(&Path::from([0, 1])).unwrap();
        assert_eq!(next, Path::from([0, 2]));

        let (prev, _) = doc.previous_text(&Path::from([0, 1])).unwrap();
        assert_eq!(prev, Path::from([0, 0]));
        assert!(doc.previous_text(&Path::from([0, 0])).is_none());
    }

    #[test]
    fn test_path_of_key() {
        let doc = sample();
        assert_eq!(doc.path_of(&Key::from("t1")), Some(Path::from([0, 1, 0])));
        assert_eq!(doc.path_of(&Key::from("d")), Some(Path::root()));
        assert_eq!(doc.path_of(&Key::from("missing")), None);
    }

    #[test]
    fn test_utf16_lengths() {
        let text = Text {
            key: Key::from("t"),
            text: "a😀b".to_string(),
            marks: Marks::new(),
        };
        assert_eq!(text.len(), 4);
    }

    #[test]
    fn test_selection_state() {
        let unset = Selection::unset();
        assert!(unset.is_unset());
        assert!(unset.is_blurred());

        let sel = Selection::from_range(Range::new(Point::new([0, 0], 3), Point::new([0, 0], 1)))
            .focused(true);
        assert!(sel.is_set());
        assert!(sel.is_backward());
        assert!(!sel.is_blurred());
    }
}
