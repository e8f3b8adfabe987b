//! Model range under the pointer, for drag and drop.

use crate::dom::{DomNode, NativeRangeLike};
use crate::model::{Node, Point, Range};
use crate::node_ref::NodeRefs;
use crate::range::to_range;
use crate::schema::Schema;
use crate::scroll::Rect;
use crate::view::DomView;

/// Resolves a caret position from client coordinates.
pub trait CaretLocator {
    type Node: DomNode;

    /// The collapsed native range at `(x, y)`, or `None` if the browser has
    /// no usable API or the lookup threw.
    fn caret_at(&self, x: f64, y: f64) -> Option<NativeRangeLike<Self::Node>>;
}

/// Where a pointer event happened.
#[derive(Clone, Debug)]
pub struct PointerTarget<N> {
    pub target: N,
    pub x: f64,
    pub y: f64,
    /// Bounding client rect of `target`.
    pub target_rect: Rect,
}

/// Resolve the model range a drop (or other pointer event) points at.
///
/// Voids have no caret positions of their own, so a pointer over a void
/// lands at the end of the text before it or the start of the text after
/// it, whichever half of the void is closer: left/right for inline voids,
/// top/bottom for blocks.
pub fn event_range<N, R, S, L>(
    view: &DomView<'_, N, R>,
    document: &Node,
    schema: &S,
    locator: &L,
    pointer: &PointerTarget<N>,
) -> Option<Range>
where
    N: DomNode,
    R: NodeRefs<N>,
    S: Schema,
    L: CaretLocator<Node = N>,
{
    let path = view.resolve_path(&pointer.target)?;
    let node = document.get(&path)?;

    if schema.is_void(node) {
        let rect = pointer.target_rect;
        let is_previous = if node.is_inline() {
            pointer.x - rect.x < rect.x + rect.width - pointer.x
        } else {
            pointer.y - rect.y < rect.y + rect.height - pointer.y
        };
        let point = if is_previous {
            document
                .previous_text(&path)
                .map(|(path, text)| Point::new(path, text.len()))
        } else {
            document.next_text(&path).map(|(path, _)| Point::new(path, 0))
        };
        return point.map(Range::collapsed);
    }

    let native = locator.caret_at(pointer.x, pointer.y);
    if native.is_none() {
        tracing::debug!(
            target: "selvage::events",
            x = pointer.x,
            y = pointer.y,
            "no caret at pointer"
        );
    }
    to_range(view, &native?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{DomPoint, DomRange};
    use crate::memory::{MemoryNode, render_document};
    use crate::schema::VoidTypes;

    struct FixedCaret(Option<DomPoint<MemoryNode>>);

    impl CaretLocator for FixedCaret {
        type Node = MemoryNode;

        fn caret_at(&self, _x: f64, _y: f64) -> Option<NativeRangeLike<MemoryNode>> {
            let point = self.0.clone()?;
            Some(DomRange::new(point.clone(), point).into())
        }
    }

    fn doc() -> Node {
        Node::document(
            "d",
            vec![
                Node::block("b0", "paragraph", vec![Node::text("t0", "above")]),
                Node::block("img", "image", vec![Node::text("t1", "")]),
                Node::block("b2", "paragraph", vec![Node::text("t2", "below")]),
            ],
        )
    }

    #[test]
    fn test_void_block_picks_closer_half() {
        let doc = doc();
        let schema = VoidTypes::new(["image"]);
        let rendered = render_document(&doc, &schema);
        let target = rendered.element_for_key("img").unwrap();
        let rect = Rect::new(0.0, 100.0, 200.0, 100.0);
        let locator = FixedCaret(None);

        let upper = PointerTarget {
            target: target.clone(),
            x: 10.0,
            y: 120.0,
            target_rect: rect,
        };
        assert_eq!(
            event_range(&rendered.view(), &doc, &schema, &locator, &upper),
            Some(Range::collapsed(Point::new([0, 0], 5)))
        );

        let lower = PointerTarget { y: 190.0, ..upper };
        assert_eq!(
            event_range(&rendered.view(), &doc, &schema, &locator, &lower),
            Some(Range::collapsed(Point::new([2, 0], 0)))
        );
    }

    #[test]
    fn test_text_target_uses_caret_locator() {
        let doc = doc();
        let schema = VoidTypes::new(["image"]);
        let rendered = render_document(&doc, &schema);
        let target = rendered.element_for_key("t2").unwrap();
        let text = target.descendants()[2].clone();

        let pointer = PointerTarget {
            target,
            x: 0.0,
            y: 0.0,
            target_rect: Rect::default(),
        };
        let locator = FixedCaret(Some(DomPoint::new(text, 3)));
        assert_eq!(
            event_range(&rendered.view(), &doc, &schema, &locator, &pointer),
            Some(Range::collapsed(Point::new([2, 0], 3)))
        );

        assert_eq!(
            event_range(&rendered.view(), &doc, &schema, &FixedCaret(None), &pointer),
            None
        );
    }
}
