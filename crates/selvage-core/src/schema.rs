//! Predicate queries the mapping layer asks about model nodes.

use std::collections::BTreeSet;

use smol_str::SmolStr;

use crate::model::Node;

/// Read-only predicate dispatcher over model nodes.
///
/// The editor's plugin stack answers these; the mapping code only needs
/// voidness (content that is not character-addressable).
pub trait Schema {
    fn is_void(&self, node: &Node) -> bool;
}

impl<S: Schema + ?Sized> Schema for &S {
    fn is_void(&self, node: &Node) -> bool {
        (**self).is_void(node)
    }
}

/// Schema that treats a fixed set of block/inline types as void.
#[derive(Clone, Debug, Default)]
pub struct VoidTypes(BTreeSet<SmolStr>);

impl VoidTypes {
    pub fn new<I, T>(types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<SmolStr>,
    {
        Self(types.into_iter().map(Into::into).collect())
    }
}

impl Schema for VoidTypes {
    fn is_void(&self, node: &Node) -> bool {
        match node {
            Node::Block(e) | Node::Inline(e) => self.0.contains(&e.kind),
            Node::Document(_) | Node::Text(_) => false,
        }
    }
}
