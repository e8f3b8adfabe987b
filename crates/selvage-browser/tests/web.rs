//! WASM browser tests for selvage-browser.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use selvage_browser::point::{to_dom_point, to_point};
use selvage_browser::{
    BrowserNode, BrowserSync, DomNode, Handler, Node, Platform, Point, Range, RefTree, Selection,
    SelectionRead, SyncConfig, VoidTypes, WriteOutcome, native_event,
};

const EDITOR_HTML: &str = concat!(
    r#"<div data-key="p0" data-slate-object="block">"#,
    r#"<span data-key="a" data-slate-object="text">"#,
    r#"<span data-slate-leaf="true" data-offset-key="a:0">"#,
    r#"<span data-slate-string="true">hello</span>"#,
    r#"</span></span></div>"#,
);

fn document() -> Node {
    Node::document(
        "doc",
        vec![Node::block("p0", "paragraph", vec![Node::text("a", "hello")])],
    )
}

struct Mounted {
    root: web_sys::HtmlElement,
    refs: RefTree<BrowserNode>,
}

impl Drop for Mounted {
    fn drop(&mut self) {
        self.root.remove();
    }
}

fn keyed(root: &web_sys::HtmlElement, key: &str) -> BrowserNode {
    let element = root
        .query_selector(&format!(r#"[data-key="{key}"]"#))
        .unwrap()
        .unwrap();
    BrowserNode::new(element)
}

fn mount() -> Mounted {
    let document = web_sys::window().unwrap().document().unwrap();
    let root = document
        .create_element("div")
        .unwrap()
        .dyn_into::<web_sys::HtmlElement>()
        .unwrap();
    root.set_attribute("data-key", "doc").unwrap();
    root.set_attribute("data-slate-editor", "true").unwrap();
    root.set_attribute("contenteditable", "true").unwrap();
    root.set_inner_html(EDITOR_HTML);
    document.body().unwrap().append_child(&root).unwrap();

    let refs = RefTree::new(
        BrowserNode::new(root.clone()),
        vec![RefTree::new(
            keyed(&root, "p0"),
            vec![RefTree::new(keyed(&root, "a"), vec![])],
        )],
    );
    Mounted { root, refs }
}

#[wasm_bindgen_test]
fn test_point_round_trip() {
    let mounted = mount();
    let sync = BrowserSync::new(mounted.root.clone().into(), SyncConfig::default()).unwrap();
    let view = sync.view(&mounted.refs);

    let point = Point::new([0, 0], 2);
    let dom = to_dom_point(&view, &point).unwrap();
    assert!(dom.node.is_text());
    assert_eq!(dom.node.text_content(), "hello");
    assert_eq!(dom.offset, 2);
    assert_eq!(to_point(&view, &dom), Some(point));
}

#[wasm_bindgen_test]
fn test_reconcile_writes_native_selection() {
    let mounted = mount();
    let sync = BrowserSync::new(mounted.root.clone().into(), SyncConfig::default()).unwrap();
    let doc = document();

    let selection =
        Selection::from_range(Range::new(Point::new([0, 0], 1), Point::new([0, 0], 4)))
            .focused(true);
    let report = sync.reconcile(&mounted.refs, &selection).unwrap();
    assert_eq!(report.write, WriteOutcome::Written);
    assert!(sync.session().is_suspended());

    let native = web_sys::window().unwrap().get_selection().unwrap().unwrap();
    assert_eq!(native.anchor_offset(), 1);
    assert_eq!(native.focus_offset(), 4);

    match sync.read_selection(&mounted.refs, &doc, &VoidTypes::default(), &selection) {
        SelectionRead::Select(read) => assert_eq!(read.to_range(), selection.to_range()),
        other => panic!("expected a mapped selection, got {other:?}"),
    }

    // a second pass finds the DOM already in sync
    let again = sync.reconcile(&mounted.refs, &selection).unwrap();
    assert_eq!(again.write, WriteOutcome::InSync);
}

#[wasm_bindgen_test]
fn test_native_event_undo_chord() {
    let init = web_sys::KeyboardEventInit::new();
    init.set_key("z");
    init.set_ctrl_key(true);
    let event = web_sys::KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap();

    let native = native_event(&event, &Platform::default()).unwrap();
    assert_eq!(native.handler, Handler::KeyDown);
    assert!(native.is_undo_redo);
    assert!(native.target.is_none());
}

#[wasm_bindgen_test]
fn test_native_event_unknown_type() {
    let event = web_sys::Event::new("wheel").unwrap();
    assert!(native_event(&event, &Platform::default()).is_none());
}
