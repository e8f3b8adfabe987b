//! The write → echo → resume cycle with the reconciler and the classifier
//! sharing one session.

use std::rc::Rc;

use selvage_core::memory::{MemoryHost, MemoryNode, render_document};
use selvage_core::point::to_dom_point;
use selvage_core::{
    ClassifyContext, DomHost, DropReason, EditorSession, EventClassifier, Handler,
    ManualScheduler, NativeEvent, NativeRangeLike, NativeSelection, Node, Point, Range,
    Reconciler, Selection, SelectionRead, SyncConfig, Verdict, VoidTypes, WriteOutcome,
    read_selection,
};

fn document() -> Node {
    Node::document(
        "doc",
        vec![
            Node::block(
                "p0",
                "paragraph",
                vec![
                    Node::text("a", "one "),
                    Node::inline("link", "link", vec![Node::text("b", "two")]),
                    Node::text("c", " three"),
                ],
            ),
            Node::block("p1", "paragraph", vec![Node::text("d", "four")]),
        ],
    )
}

#[test]
fn write_suppresses_its_own_select_echo() {
    let doc = document();
    let schema = VoidTypes::default();
    let rendered = render_document(&doc, &schema);
    let view = rendered.view();
    let host = MemoryHost::new();

    let session = Rc::new(EditorSession::<MemoryNode>::new());
    let scheduler = ManualScheduler::new();
    let reconciler = Reconciler::new(session.clone(), scheduler.clone(), SyncConfig::default());
    let classifier = EventClassifier::new(session.clone(), scheduler.clone(), SyncConfig::default());

    let selection = Selection::from_range(Range::collapsed(Point::new([1, 0], 2))).focused(true);
    let report = reconciler.reconcile(&host, &view, &selection).unwrap();
    assert_eq!(report.write, WriteOutcome::Written);

    // the browser echoes the write with a selection somewhere else entirely
    let elsewhere = to_dom_point(&view, &Point::new([0, 0], 1)).unwrap();
    let cx = ClassifyContext {
        view,
        document: &doc,
        schema: &schema,
        selection: &selection,
        native: Some(NativeRangeLike::Selection {
            anchor: elsewhere.clone(),
            focus: elsewhere.clone(),
            is_collapsed: true,
        }),
        active_element: host.active_element(),
    };
    let echo = NativeEvent::new(Handler::Select, Some(elsewhere.node.clone()));
    assert_eq!(
        classifier.classify(&echo, &cx),
        Ok(Verdict::Drop(DropReason::Suspended))
    );

    scheduler.run_pending();
    assert!(!session.is_suspended());
    assert_eq!(classifier.classify(&echo, &cx), Ok(Verdict::Dispatch));

    // reconciling the unchanged model again leaves the DOM alone
    let report = reconciler.reconcile(&host, &view, &selection).unwrap();
    assert_eq!(report.write, WriteOutcome::InSync);
    assert_eq!(host.native().writes(), 1);
}

#[test]
fn read_selection_normalizes_inline_boundary() {
    let doc = document();
    let schema = VoidTypes::default();
    let rendered = render_document(&doc, &schema);
    let view = rendered.view();
    let host = MemoryHost::new();
    let previous = Selection::unset();

    assert_eq!(
        read_selection(&view, &host.native(), &doc, &schema, &previous),
        SelectionRead::Blur
    );

    // caret at the end of the link text
    let end_of_link = to_dom_point(&view, &Point::new([0, 1, 0], 3)).unwrap();
    host.native().set(end_of_link.clone(), end_of_link);
    let read = read_selection(&view, &host.native(), &doc, &schema, &previous);
    let SelectionRead::Select(selection) = read else {
        panic!("expected a mapped selection, got {read:?}");
    };
    assert!(selection.is_focused);
    assert_eq!(selection.anchor, Some(Point::new([0, 2], 0)));
    assert_eq!(selection.focus, Some(Point::new([0, 2], 0)));

    let stray = MemoryNode::text("outside");
    host.native().set(
        selvage_core::DomPoint::new(stray.clone(), 0),
        selvage_core::DomPoint::new(stray, 3),
    );
    assert_eq!(host.native().range_count(), 1);
    assert_eq!(
        read_selection(&view, &host.native(), &doc, &schema, &previous),
        SelectionRead::Unmapped
    );
}
