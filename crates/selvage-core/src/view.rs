//! Path resolver and DOM locator over a rendered editor.
//!
//! A [`DomView`] pairs the editor's content root element with the node-ref
//! capability of the current render. Point and range conversion
//! ([`point`](crate::point), [`range`](crate::range)) are built on it.

use crate::dom::{DATA_EDITOR, DATA_KEY, DomNode, DomNodeKind};
use crate::error::DomError;
use crate::model::Path;
use crate::node_ref::NodeRefs;

/// A rendered editor: its content root plus the node refs of this render.
pub struct DomView<'a, N, R> {
    root: &'a N,
    refs: &'a R,
}

impl<'a, N, R> Clone for DomView<'a, N, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, N, R> Copy for DomView<'a, N, R> {}

impl<'a, N: DomNode, R: NodeRefs<N>> DomView<'a, N, R> {
    pub fn new(root: &'a N, refs: &'a R) -> Self {
        Self { root, refs }
    }

    /// The editor's content root element.
    pub fn root(&self) -> &'a N {
        self.root
    }

    pub fn refs(&self) -> &'a R {
        self.refs
    }

    /// Model path of the node rendering `element`.
    ///
    /// Ascends to the nearest element carrying `data-key`; the editor root
    /// itself is the empty path. `None` when the element is detached or
    /// belongs to a stale render.
    pub fn resolve_path(&self, element: &N) -> Option<Path> {
        let keyed = element.closest(DATA_KEY)?;
        if &keyed == self.root {
            return Some(Path::root());
        }
        let path = self.refs.locate(&keyed);
        if path.is_none() {
            tracing::trace!(
                target: "selvage::view",
                element = ?keyed,
                "resolve_path: keyed element not in node refs"
            );
        }
        path
    }

    /// Root element of the node at `path`; the empty path is the content
    /// root.
    pub fn resolve_element(&self, path: &Path) -> Option<N> {
        if path.is_root() {
            return Some(self.root.clone());
        }
        self.refs.resolve(path)
    }

    /// Whether `target` is editable content of *this* editor.
    ///
    /// An element qualifies when it is content-editable and is either the
    /// root or its nearest `data-slate-editor` ancestor is the root (nested
    /// editors own their own content). Text nodes are checked through their
    /// parent since they have no `isContentEditable`. A restricted-element
    /// access failure counts as "not in editor"; other errors propagate.
    pub fn is_in_editor(&self, target: &N) -> Result<bool, DomError> {
        let element = match target.kind() {
            Ok(DomNodeKind::Text) => match target.parent() {
                Some(parent) => parent,
                None => return Ok(false),
            },
            Ok(_) => target.clone(),
            Err(err) if err.is_restricted_access() => {
                tracing::debug!(target: "selvage::view", %err, "restricted event target");
                return Ok(false);
            }
            Err(err) => return Err(err),
        };

        if !element.is_content_editable() {
            return Ok(false);
        }
        Ok(&element == self.root || element.closest(DATA_EDITOR).as_ref() == Some(self.root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryNode, render_document};
    use crate::model::Node;
    use crate::schema::VoidTypes;

    fn doc() -> Node {
        Node::document(
            "d",
            vec![Node::block(
                "b",
                "paragraph",
                vec![
                    Node::text("t0", "Hello"),
                    Node::inline("i", "link", vec![Node::text("t1", "World")]),
                    Node::text("t2", ""),
                ],
            )],
        )
    }

    #[test]
    fn test_resolve_path_ascends_to_keyed_element() {
        let rendered = render_document(&doc(), &VoidTypes::default());
        let view = rendered.view();

        let text_el = rendered.element_for_key("t1").unwrap();
        let leaf = text_el.query(crate::dom::DATA_LEAF).unwrap();
        assert_eq!(view.resolve_path(&leaf), Some(Path::from([0, 1, 0])));
        assert_eq!(view.resolve_path(&text_el), Some(Path::from([0, 1, 0])));
        assert_eq!(view.resolve_path(&rendered.root), Some(Path::root()));
    }

    #[test]
    fn test_resolve_path_detached_is_none() {
        let rendered = render_document(&doc(), &VoidTypes::default());
        let stray = MemoryNode::element("span").with_attr(DATA_KEY, "t0");
        assert_eq!(rendered.view().resolve_path(&stray), None);
        assert_eq!(rendered.view().resolve_path(&MemoryNode::text("x")), None);
    }

    #[test]
    fn test_resolve_element_inverts_resolve_path() {
        let rendered = render_document(&doc(), &VoidTypes::default());
        let view = rendered.view();
        for path in [Path::from([0]), Path::from([0, 1]), Path::from([0, 2])] {
            let element = view.resolve_element(&path).unwrap();
            assert_eq!(view.resolve_path(&element), Some(path));
        }
        assert_eq!(view.resolve_element(&Path::root()), Some(rendered.root.clone()));
        assert_eq!(view.resolve_element(&Path::from([3])), None);
    }

    #[test]
    fn test_is_in_editor() {
        let rendered = render_document(&doc(), &VoidTypes::default());
        let view = rendered.view();
        let leaf_text = rendered
            .element_for_key("t0")
            .unwrap()
            .descendants()
            .into_iter()
            .find(|n| n.is_text())
            .unwrap();

        assert_eq!(view.is_in_editor(&leaf_text), Ok(true));
        assert_eq!(view.is_in_editor(&rendered.root), Ok(true));

        let outside = MemoryNode::element("div").with_attr("contenteditable", "true");
        assert_eq!(view.is_in_editor(&outside), Ok(false));
    }

    #[test]
    fn test_is_in_editor_nested_editor_is_foreign() {
        let rendered = render_document(&doc(), &VoidTypes::default());
        let nested = MemoryNode::element("div")
            .with_attr(DATA_EDITOR, "true")
            .with_attr("contenteditable", "true");
        let inner = MemoryNode::element("p");
        nested.append(&inner);
        rendered.root.append(&nested);

        assert_eq!(rendered.view().is_in_editor(&inner), Ok(false));
    }

    #[test]
    fn test_is_in_editor_restricted_target() {
        let rendered = render_document(&doc(), &VoidTypes::default());
        let stepper = MemoryNode::element("input");
        stepper.set_restricted(true);
        rendered.root.append(&stepper);
        assert_eq!(rendered.view().is_in_editor(&stepper), Ok(false));
    }

    #[test]
    fn test_is_in_editor_propagates_other_errors() {
        let rendered = render_document(&doc(), &VoidTypes::default());
        let broken = MemoryNode::element("span");
        broken.set_kind_error(Some(DomError::Operation("nodeType threw".into())));
        rendered.root.append(&broken);

        assert_eq!(
            rendered.view().is_in_editor(&broken),
            Err(DomError::Operation("nodeType threw".into()))
        );
    }
}
