//! Range conversion between model ranges and native ranges.

use crate::dom::{DomNode, DomRange, NativeRangeLike};
use crate::model::Range;
use crate::node_ref::NodeRefs;
use crate::point::{to_dom_point, to_point};
use crate::view::DomView;

/// Convert a model range to a native range.
///
/// Native ranges have no direction, so a backward range is emitted
/// start-first (focus, then anchor). `None` if either end fails to map.
pub fn to_dom_range<N, R>(view: &DomView<'_, N, R>, range: &Range) -> Option<DomRange<N>>
where
    N: DomNode,
    R: NodeRefs<N>,
{
    let anchor = to_dom_point(view, &range.anchor)?;
    if range.is_collapsed() {
        return Some(DomRange::new(anchor.clone(), anchor));
    }
    let focus = to_dom_point(view, &range.focus)?;

    if range.is_backward() {
        Some(DomRange::new(focus, anchor))
    } else {
        Some(DomRange::new(anchor, focus))
    }
}

/// Convert a native selection or range to a model range.
///
/// Selections keep their anchor/focus direction; ranges read start → end.
/// A collapsed input maps its anchor once and reuses it for the focus.
pub fn to_range<N, R>(view: &DomView<'_, N, R>, native: &NativeRangeLike<N>) -> Option<Range>
where
    N: DomNode,
    R: NodeRefs<N>,
{
    let (anchor_dom, focus_dom, is_collapsed) = native.endpoints();
    let anchor = to_point(view, anchor_dom)?;
    let focus = if is_collapsed {
        anchor.clone()
    } else {
        to_point(view, focus_dom)?
    };
    Some(Range::new(anchor, focus))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::DomPoint;
    use crate::memory::render_document;
    use crate::model::{Node, Point};
    use crate::schema::VoidTypes;

    fn doc() -> Node {
        Node::document(
            "d",
            vec![
                Node::block("b0", "paragraph", vec![Node::text("t0", "Hello")]),
                Node::block("b1", "paragraph", vec![Node::text("t1", "World")]),
            ],
        )
    }

    #[test]
    fn test_to_dom_range_orders_backward_ranges() {
        let rendered = render_document(&doc(), &VoidTypes::default());
        let view = rendered.view();

        let forward = Range::new(Point::new([0, 0], 1), Point::new([1, 0], 2));
        let backward = forward.flipped();

        let a = to_dom_range(&view, &forward).unwrap();
        let b = to_dom_range(&view, &backward).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.start.offset, 1);
        assert_eq!(a.end.offset, 2);
    }

    #[test]
    fn test_to_dom_range_collapsed_shares_point() {
        let rendered = render_document(&doc(), &VoidTypes::default());
        let range = Range::collapsed(Point::new([1, 0], 5));
        let dom = to_dom_range(&rendered.view(), &range).unwrap();
        assert!(dom.is_collapsed());
    }

    #[test]
    fn test_to_dom_range_fails_if_either_side_fails() {
        let rendered = render_document(&doc(), &VoidTypes::default());
        let range = Range::new(Point::new([0, 0], 1), Point::new([1, 0], 9));
        assert!(to_dom_range(&rendered.view(), &range).is_none());
    }

    #[test]
    fn test_to_range_keeps_selection_direction() {
        let rendered = render_document(&doc(), &VoidTypes::default());
        let view = rendered.view();
        let backward = Range::new(Point::new([1, 0], 3), Point::new([0, 0], 1));
        let dom = to_dom_range(&view, &backward).unwrap();

        let selection = NativeRangeLike::Selection {
            anchor: dom.end.clone(),
            focus: dom.start.clone(),
            is_collapsed: false,
        };
        assert_eq!(to_range(&view, &selection), Some(backward.clone()));

        // ranges are always read forward
        let static_range = NativeRangeLike::from(dom);
        assert_eq!(to_range(&view, &static_range), Some(backward.flipped()));
    }

    #[test]
    fn test_to_range_collapsed_reuses_anchor() {
        let rendered = render_document(&doc(), &VoidTypes::default());
        let view = rendered.view();
        let anchor = to_dom_point(&view, &Point::new([0, 0], 2)).unwrap();
        let selection = NativeRangeLike::Selection {
            anchor: anchor.clone(),
            // a stale focus is never consulted for a collapsed selection
            focus: DomPoint::new(rendered.root.clone(), 99),
            is_collapsed: true,
        };
        assert_eq!(
            to_range(&view, &selection),
            Some(Range::collapsed(Point::new([0, 0], 2)))
        );
    }
}
