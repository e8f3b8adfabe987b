use crate::dom::{
    DATA_EDITOR, DATA_KEY, DATA_LEAF, DATA_LENGTH, DATA_OBJECT, DATA_OFFSET_KEY, DATA_SPACER,
    DATA_STRING, DATA_VOID, DATA_ZERO_WIDTH, DomNode, ZERO_WIDTH_CHAR, ZeroWidthKind,
};
use crate::model::{Node, Text};
use crate::node_ref::RefTree;
use crate::schema::Schema;
use crate::view::DomView;

use super::dom::MemoryNode;

/// A rendered document: the editor root element and its node refs.
#[derive(Clone, Debug)]
pub struct Rendered {
    pub root: MemoryNode,
    pub refs: RefTree<MemoryNode>,
}

impl Rendered {
    pub fn view(&self) -> DomView<'_, MemoryNode, RefTree<MemoryNode>> {
        DomView::new(&self.root, &self.refs)
    }

    /// The element whose `data-key` is `key`.
    pub fn element_for_key(&self, key: &str) -> Option<MemoryNode> {
        if self.root.attribute(DATA_KEY).as_deref() == Some(key) {
            return Some(self.root.clone());
        }
        self.root
            .descendants()
            .into_iter()
            .find(|n| n.attribute(DATA_KEY).as_deref() == Some(key))
    }
}

/// Render `document` the way the editor's view layer does.
///
/// The root node renders as the content-editable editor root. Blocks become
/// `div`s, inlines `span`s. Void nodes render their text inside a
/// `data-spacer` caret target, next to non-editable content. Each text
/// renders one leaf holding either its string or a zero-width placeholder.
pub fn render_document<S: Schema>(document: &Node, schema: &S) -> Rendered {
    let root = MemoryNode::element("div")
        .with_attr(DATA_KEY, document.key().as_str())
        .with_attr(DATA_EDITOR, "true")
        .with_attr("contenteditable", "true");

    let mut refs = Vec::new();
    for child in document.children() {
        let (element, node_ref) = render_node(child, document, schema, false);
        root.append(&element);
        refs.push(node_ref);
    }

    Rendered {
        refs: RefTree::new(root.clone(), refs),
        root,
    }
}

fn render_node<S: Schema>(
    node: &Node,
    parent: &Node,
    schema: &S,
    in_void: bool,
) -> (MemoryNode, RefTree<MemoryNode>) {
    if let Node::Text(text) = node {
        let element = render_text(text, parent, in_void);
        return (element.clone(), RefTree::new(element, Vec::new()));
    }

    let tag = if node.is_inline() { "span" } else { "div" };
    let element = MemoryNode::element(tag)
        .with_attr(DATA_KEY, node.key().as_str())
        .with_attr(DATA_OBJECT, node.object().as_str());

    let is_void = schema.is_void(node);
    let container = if is_void {
        element.set_attribute(DATA_VOID, "true");
        if node.is_inline() {
            element.set_attribute("contenteditable", "false");
        }
        let spacer = MemoryNode::element(tag).with_attr(DATA_SPACER, "true");
        let content = MemoryNode::element(tag)
            .with_attr("contenteditable", "false")
            .with_children(vec![MemoryNode::element("img")]);
        element.append(&spacer);
        element.append(&content);
        spacer
    } else {
        element.clone()
    };

    let mut refs = Vec::new();
    for child in node.children() {
        let (child_element, child_ref) = render_node(child, node, schema, in_void || is_void);
        container.append(&child_element);
        refs.push(child_ref);
    }

    (element.clone(), RefTree::new(element, refs))
}

fn render_text(text: &Text, parent: &Node, in_void: bool) -> MemoryNode {
    let leaf = MemoryNode::element("span")
        .with_attr(DATA_LEAF, "true")
        .with_attr(DATA_OFFSET_KEY, format!("{}:0", text.key));

    let is_last_text = parent.is_block()
        && parent
            .children()
            .last()
            .is_some_and(|last| last.key() == &text.key);

    if in_void {
        leaf.append(&zero_width(ZeroWidthKind::Zero, text.len()));
    } else if text.is_empty() {
        // an empty block keeps its height with a line break
        if is_last_text && parent.text_content().is_empty() {
            let placeholder = zero_width(ZeroWidthKind::Normal, 0);
            placeholder.append(&MemoryNode::element("br"));
            leaf.append(&placeholder);
        } else {
            leaf.append(&zero_width(ZeroWidthKind::Zero, 0));
        }
    } else {
        let mut content = text.text.clone();
        if is_last_text && content.ends_with('\n') {
            content.push('\n');
        }
        let mut node = MemoryNode::element("span")
            .with_attr(DATA_STRING, "true")
            .with_children(vec![MemoryNode::text(content)]);
        for mark in text.marks.iter().rev() {
            let tag = match mark.as_str() {
                "bold" => "strong",
                "italic" => "em",
                "code" => "code",
                "underline" => "u",
                _ => "span",
            };
            node = MemoryNode::element(tag).with_children(vec![node]);
        }
        leaf.append(&node);
    }

    MemoryNode::element("span")
        .with_attr(DATA_KEY, text.key.as_str())
        .with_attr(DATA_OBJECT, "text")
        .with_children(vec![leaf])
}

fn zero_width(kind: ZeroWidthKind, length: usize) -> MemoryNode {
    MemoryNode::element("span")
        .with_attr(DATA_ZERO_WIDTH, kind.as_str())
        .with_attr(DATA_LENGTH, length.to_string())
        .with_children(vec![MemoryNode::text(ZERO_WIDTH_CHAR.to_string())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Path;
    use crate::node_ref::NodeRefs;
    use crate::schema::VoidTypes;

    #[test]
    fn test_render_empty_paragraph() {
        let doc = Node::document(
            "d",
            vec![Node::block("b", "paragraph", vec![Node::text("t", "")])],
        );
        let rendered = render_document(&doc, &VoidTypes::default());
        insta::assert_snapshot!(
            rendered.root.to_html(),
            @r#"<div data-key="d" data-slate-editor="true" contenteditable="true"><div data-key="b" data-slate-object="block"><span data-key="t" data-slate-object="text"><span data-slate-leaf="true" data-offset-key="t:0"><span data-slate-zero-width="n" data-slate-length="0">&#xFEFF;<br></span></span></span></div></div>"#
        );
    }

    #[test]
    fn test_render_marks_and_inline() {
        let doc = Node::document(
            "d",
            vec![Node::block(
                "b",
                "paragraph",
                vec![
                    Node::marked_text("t0", "Hi", ["bold", "italic"]),
                    Node::inline("l", "link", vec![Node::text("t1", "")]),
                ],
            )],
        );
        let rendered = render_document(&doc, &VoidTypes::default());
        let text = rendered.element_for_key("t0").unwrap();
        insta::assert_snapshot!(
            text.to_html(),
            @r#"<span data-key="t0" data-slate-object="text"><span data-slate-leaf="true" data-offset-key="t0:0"><strong><em><span data-slate-string="true">Hi</span></em></strong></span></span>"#
        );

        let empty = rendered.element_for_key("t1").unwrap();
        assert!(empty.to_html().contains(r#"data-slate-zero-width="z" data-slate-length="0""#));
    }

    #[test]
    fn test_render_void_and_refs() {
        let doc = Node::document(
            "d",
            vec![
                Node::block("b0", "paragraph", vec![Node::text("t0", "line\n")]),
                Node::block("img", "image", vec![Node::text("t1", "alt")]),
            ],
        );
        let rendered = render_document(&doc, &VoidTypes::new(["image"]));

        let void = rendered.element_for_key("img").unwrap();
        assert_eq!(void.attribute(DATA_VOID).as_deref(), Some("true"));
        let spacer = void.child_nodes()[0].clone();
        assert!(spacer.has_attribute(DATA_SPACER));
        assert!(spacer.to_html().contains(r#"data-slate-zero-width="z" data-slate-length="3""#));

        assert_eq!(rendered.element_for_key("t0").unwrap().text_content(), "line\n\n");

        let t1 = rendered.refs.resolve(&Path::from([1, 0])).unwrap();
        assert_eq!(t1, rendered.element_for_key("t1").unwrap());
        assert_eq!(rendered.refs.locate(&void), Some(Path::from([1])));
    }
}
