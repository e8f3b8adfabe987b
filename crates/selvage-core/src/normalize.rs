//! Editing-semantics corrections for selections read back from the DOM.

use crate::dom::{DomNode, NativeRangeLike, NativeSelection};
use crate::model::{Node, Point, Range, Selection};
use crate::node_ref::NodeRefs;
use crate::range::to_range;
use crate::schema::Schema;
use crate::view::DomView;

/// Apply the void clamp and inline-boundary migration to a DOM-derived
/// range.
///
/// - Anchor at offset 0 of a non-void block with the focus at a non-zero
///   offset inside a void block: the focus offset becomes 0. Void content is
///   rendered out of view, so its offsets are not meaningful.
/// - An endpoint at the end of a non-void inline's text moves to the start
///   of the next text in the same block; an endpoint at offset 0 moves to
///   the end of the previous text. Both positions look identical on screen.
pub fn normalize_range<S: Schema>(document: &Node, schema: &S, range: &Range) -> Range {
    let mut range = range.clone();

    let anchor_block = document.closest_block(&range.anchor.path);
    let focus_block = document.closest_block(&range.focus.path);
    if let (Some((_, anchor_block)), Some((_, focus_block))) = (anchor_block, focus_block) {
        if !schema.is_void(anchor_block)
            && range.anchor.offset == 0
            && schema.is_void(focus_block)
            && range.focus.offset != 0
        {
            tracing::trace!(
                target: "selvage::normalize",
                focus = %range.focus.path,
                "clamping focus inside void to offset 0"
            );
            range.focus = range.focus.with_offset(0);
        }
    }

    range.anchor = migrate_inline_boundary(document, schema, range.anchor);
    range.focus = migrate_inline_boundary(document, schema, range.focus);
    range
}

fn migrate_inline_boundary<S: Schema>(document: &Node, schema: &S, point: Point) -> Point {
    let Some(text) = document.text_at(&point.path) else {
        return point;
    };
    let Some((_, inline)) = document.closest_inline(&point.path) else {
        return point;
    };
    if schema.is_void(inline) {
        return point;
    }

    let block_path = document
        .closest_block(&point.path)
        .map(|(path, _)| path)
        .unwrap_or_default();
    let in_block = |path: &crate::model::Path| block_path.is_ancestor_of(path);

    if point.offset == text.len() {
        if let Some((next, _)) = document.next_text(&point.path).filter(|(p, _)| in_block(p)) {
            return Point::new(next, 0);
        }
    }
    if point.offset == 0 {
        if let Some((previous, text)) = document
            .previous_text(&point.path)
            .filter(|(p, _)| in_block(p))
        {
            return Point::new(previous, text.len());
        }
    }
    point
}

/// Normalize a DOM-derived range into the canonical model selection: the
/// corrected range, focused, carrying the marks of the `previous` selection.
pub fn normalize_selection<S: Schema>(
    document: &Node,
    schema: &S,
    range: &Range,
    previous: &Selection,
) -> Selection {
    Selection::from_range(normalize_range(document, schema, range))
        .focused(true)
        .with_marks(previous.marks.clone())
}

/// What the native selection means for the model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionRead {
    /// Nothing is selected in the document.
    Blur,
    /// A mapped, normalized selection.
    Select(Selection),
    /// The native selection lies outside mappable editor content.
    Unmapped,
}

/// Pull the native selection back into the model.
pub fn read_selection<N, R, Sel, Sch>(
    view: &DomView<'_, N, R>,
    native: &Sel,
    document: &Node,
    schema: &Sch,
    previous: &Selection,
) -> SelectionRead
where
    N: DomNode,
    R: NodeRefs<N>,
    Sel: NativeSelection<Node = N>,
    Sch: Schema,
{
    if native.range_count() == 0 {
        return SelectionRead::Blur;
    }
    let Some(range) = NativeRangeLike::from_selection(native).and_then(|n| to_range(view, &n))
    else {
        tracing::debug!(target: "selvage::normalize", "native selection does not map to the model");
        return SelectionRead::Unmapped;
    };
    SelectionRead::Select(normalize_selection(document, schema, &range, previous))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Marks, Mark, Path};
    use crate::schema::VoidTypes;

    fn inline_doc() -> Node {
        Node::document(
            "d",
            vec![
                Node::block(
                    "b0",
                    "paragraph",
                    vec![
                        Node::text("t0", "one "),
                        Node::inline("link", "link", vec![Node::text("t1", "two")]),
                        Node::text("t2", " three"),
                    ],
                ),
                Node::block("b1", "paragraph", vec![Node::text("t3", "four")]),
            ],
        )
    }

    #[test]
    fn test_inline_end_moves_to_next_text() {
        let doc = inline_doc();
        let range = Range::collapsed(Point::new([0, 1, 0], 3));
        let out = normalize_range(&doc, &VoidTypes::default(), &range);
        assert_eq!(out, Range::collapsed(Point::new([0, 2], 0)));
    }

    #[test]
    fn test_inline_start_moves_to_previous_text() {
        let doc = inline_doc();
        let range = Range::new(Point::new([0, 1, 0], 0), Point::new([0, 1, 0], 2));
        let out = normalize_range(&doc, &VoidTypes::default(), &range);
        assert_eq!(out.anchor, Point::new([0, 0], 4));
        assert_eq!(out.focus, Point::new([0, 1, 0], 2));
    }

    #[test]
    fn test_void_inline_is_not_migrated() {
        let doc = inline_doc();
        let range = Range::collapsed(Point::new([0, 1, 0], 3));
        let out = normalize_range(&doc, &VoidTypes::new(["link"]), &range);
        assert_eq!(out, range);
    }

    #[test]
    fn test_migration_stays_inside_block() {
        let doc = Node::document(
            "d",
            vec![
                Node::block(
                    "b0",
                    "paragraph",
                    vec![Node::inline("l", "link", vec![Node::text("t0", "end")])],
                ),
                Node::block("b1", "paragraph", vec![Node::text("t1", "next")]),
            ],
        );
        let range = Range::collapsed(Point::new([0, 0, 0], 3));
        assert_eq!(normalize_range(&doc, &VoidTypes::default(), &range), range);
    }

    #[test]
    fn test_void_clamp() {
        let doc = Node::document(
            "d",
            vec![
                Node::block("b0", "paragraph", vec![Node::text("t0", "text")]),
                Node::block("img", "image", vec![Node::text("t1", "")]),
            ],
        );
        let schema = VoidTypes::new(["image"]);
        let range = Range::new(Point::new([0, 0], 0), Point::new([1, 0], 1));
        let out = normalize_range(&doc, &schema, &range);
        assert_eq!(out.focus, Point::new([1, 0], 0));

        // only from the very start of the anchor block
        let range = Range::new(Point::new([0, 0], 2), Point::new([1, 0], 1));
        assert_eq!(normalize_range(&doc, &schema, &range).focus.offset, 1);
    }

    #[test]
    fn test_normalize_selection_focuses_and_keeps_marks() {
        let doc = inline_doc();
        let marks: Marks = [Mark::from("bold")].into_iter().collect();
        let previous = Selection::unset().with_marks(marks.clone());
        let range = Range::collapsed(Point::new([1, 0], 2));

        let selection = normalize_selection(&doc, &VoidTypes::default(), &range, &previous);
        assert!(selection.is_focused);
        assert_eq!(selection.marks, marks);
        assert_eq!(selection.anchor, Some(Point::new(Path::from([1, 0]), 2)));
    }
}
