//! The node-ref capability: the view layer's association between model
//! nodes and the DOM subtrees rendering them.
//!
//! Refs are owned by the view layer and rebuilt on every render. The mapping
//! code only reads them through [`NodeRefs`], so it does not depend on any
//! particular component framework.

use crate::dom::DomNode;
use crate::model::Path;

/// Path ⇄ element lookups over the current render.
pub trait NodeRefs<N: DomNode> {
    /// Root element of the node at `path`. The empty path resolves to the
    /// content root.
    fn resolve(&self, path: &Path) -> Option<N>;

    /// Path of the node whose subtree root is exactly `element`.
    fn locate(&self, element: &N) -> Option<Path>;
}

/// A node-ref tree mirroring the model tree: each ref knows the DOM root of
/// its node and has one child ref per model child, in order.
#[derive(Clone, Debug)]
pub struct RefTree<N> {
    root_node: Option<N>,
    children: Vec<RefTree<N>>,
}

impl<N: DomNode> RefTree<N> {
    pub fn new(root_node: N, children: Vec<RefTree<N>>) -> Self {
        Self {
            root_node: Some(root_node),
            children,
        }
    }

    /// A ref whose component has not mounted (no DOM yet).
    pub fn unmounted(children: Vec<RefTree<N>>) -> Self {
        Self {
            root_node: None,
            children,
        }
    }

    pub fn root_node(&self) -> Option<&N> {
        self.root_node.as_ref()
    }

    pub fn child(&self, index: usize) -> Option<&RefTree<N>> {
        self.children.get(index)
    }

    pub fn children(&self) -> &[RefTree<N>] {
        &self.children
    }

    fn search(&self, element: &N, path: &mut Vec<usize>) -> bool {
        if self.root_node.as_ref() == Some(element) {
            return true;
        }
        for (index, child) in self.children.iter().enumerate() {
            path.push(index);
            if child.search(element, path) {
                return true;
            }
            path.pop();
        }
        false
    }
}

impl<N: DomNode> NodeRefs<N> for RefTree<N> {
    fn resolve(&self, path: &Path) -> Option<N> {
        let mut node_ref = self;
        for &index in path.indices() {
            node_ref = node_ref.child(index)?;
        }
        node_ref.root_node.clone()
    }

    fn locate(&self, element: &N) -> Option<Path> {
        let mut path = Vec::new();
        self.search(element, &mut path).then(|| Path::new(path))
    }
}
