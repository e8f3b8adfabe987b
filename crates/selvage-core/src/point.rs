//! Point conversion between model points and DOM boundary points.

use crate::dom::{
    DATA_LEAF, DATA_LENGTH, DATA_STRING, DATA_VOID, DATA_ZERO_WIDTH, DomNode, DomNodeKind,
    DomPoint, ZERO_WIDTH_CHAR,
};
use crate::model::Point;
use crate::node_ref::NodeRefs;
use crate::view::DomView;

/// Convert a model point to a DOM point inside the leaf that owns it.
///
/// Walks the string and zero-width spans of the text's element in
/// document order, measuring each by its `data-slate-length` when present
/// (placeholders stand in for text they don't render). The first span whose
/// running end reaches the offset owns the point. A caret at offset 0 of a
/// lone zero-width character is moved past it so the browser draws it on the
/// correct line.
pub fn to_dom_point<N, R>(view: &DomView<'_, N, R>, point: &Point) -> Option<DomPoint<N>>
where
    N: DomNode,
    R: NodeRefs<N>,
{
    let element = view.resolve_element(&point.path)?;
    let mut start = 0;

    for span in element.descendants() {
        if !span.has_attribute(DATA_STRING) && !span.has_attribute(DATA_ZERO_WIDTH) {
            continue;
        }
        let node = span.child_nodes().into_iter().next().unwrap_or(span.clone());
        let dom_len = node.text_len();
        let logical_len = span
            .attribute(DATA_LENGTH)
            .and_then(|len| len.parse::<usize>().ok())
            .unwrap_or(dom_len);
        let end = start + logical_len;

        if point.offset <= end {
            let mut offset = dom_len.min(point.offset.saturating_sub(start));
            if offset == 0 && is_lone_zero_width(&node) {
                offset = 1;
            }
            tracing::trace!(
                target: "selvage::point",
                path = %point.path,
                model_offset = point.offset,
                dom_offset = offset,
                "to_dom_point"
            );
            return Some(DomPoint::new(node, offset));
        }
        start = end;
    }

    tracing::trace!(
        target: "selvage::point",
        path = %point.path,
        offset = point.offset,
        rendered = start,
        "to_dom_point: offset past rendered text"
    );
    None
}

fn is_lone_zero_width<N: DomNode>(node: &N) -> bool {
    let content = node.text_content();
    let mut chars = content.chars();
    chars.next() == Some(ZERO_WIDTH_CHAR) && chars.next().is_none()
}

/// Convert a DOM point to a model point.
///
/// Element-container points are first moved onto the nearest editable leaf
/// ([`normalize_dom_point`]). Points inside a leaf count the text from the
/// start of the enclosing text element, ignoring zero-width placeholders;
/// points elsewhere inside a void snap to the end of the void's leaf.
pub fn to_point<N, R>(view: &DomView<'_, N, R>, dom_point: &DomPoint<N>) -> Option<Point>
where
    N: DomNode,
    R: NodeRefs<N>,
{
    let nearest = normalize_dom_point(dom_point);
    let parent = nearest.node.parent()?;

    let (node, mut offset) = match parent.closest(DATA_LEAF) {
        Some(leaf) => {
            let text_element = leaf.parent()?.closest(crate::dom::DATA_KEY)?;
            let offset = text_before(&text_element, &nearest)?;
            (text_element, offset)
        }
        None => {
            let void = parent.closest(DATA_VOID)?;
            let leaf = void.query(DATA_LEAF)?;
            let offset = leaf.text_len();
            (leaf, offset)
        }
    };

    if offset == node.text_len() && parent.has_attribute(DATA_ZERO_WIDTH) {
        offset = offset.saturating_sub(1);
    }

    let path = view.resolve_path(&node);
    if path.is_none() {
        tracing::trace!(target: "selvage::point", node = ?node, "to_point: no path for node");
    }
    Some(Point::new(path?, offset))
}

/// Length of the text inside `container` that precedes `point`, skipping
/// text inside zero-width placeholders.
fn text_before<N: DomNode>(container: &N, point: &DomPoint<N>) -> Option<usize> {
    let nodes = container.descendants();
    let stop = if point.node.is_text() {
        nodes.iter().position(|n| n == &point.node)?
    } else {
        boundary_index(container, &nodes, point)?
    };

    let mut len = nodes[..stop]
        .iter()
        .filter(|&n| n.is_text() && !in_zero_width(n, container))
        .map(|n| n.text_len())
        .sum::<usize>();

    if point.node.is_text() && !in_zero_width(&point.node, container) {
        len += point.offset.min(point.node.text_len());
    }
    Some(len)
}

/// Preorder index of the first node at or after an element boundary point.
fn boundary_index<N: DomNode>(container: &N, nodes: &[N], point: &DomPoint<N>) -> Option<usize> {
    let children = point.node.child_nodes();
    if let Some(child) = children.get(point.offset) {
        return nodes.iter().position(|n| n == child);
    }
    if &point.node == container {
        return Some(nodes.len());
    }
    let at = nodes.iter().position(|n| n == &point.node)?;
    Some(at + 1 + point.node.descendants().len())
}

fn in_zero_width<N: DomNode>(node: &N, container: &N) -> bool {
    node.parent()
        .and_then(|p| p.closest(DATA_ZERO_WIDTH))
        .is_some_and(|zw| container.contains(&zw))
}

/// Move a DOM point whose container is an element onto the nearest leaf
/// node.
///
/// An element offset indexes its child nodes (comments included). The point
/// is pushed down to the first editable leaf, going forward, or backward
/// when the offset addresses the end of the element; the result sits at the
/// start of that leaf (or its end, going backward). Text points are returned
/// unchanged.
pub fn normalize_dom_point<N: DomNode>(point: &DomPoint<N>) -> DomPoint<N> {
    let children = point.node.child_nodes();
    if !point.node.is_element() || children.is_empty() {
        return point.clone();
    }

    let is_last = point.offset >= children.len();
    let backward = is_last;
    let index = if is_last {
        children.len() - 1
    } else {
        point.offset
    };

    let mut node = editable_child(&point.node, index, backward);
    loop {
        let grandchildren = node.child_nodes();
        if !node.is_element() || grandchildren.is_empty() {
            break;
        }
        let i = if is_last { grandchildren.len() - 1 } else { 0 };
        node = editable_child(&node, i, backward);
    }

    let offset = if is_last { node.text_len() } else { 0 };
    DomPoint::new(node, offset)
}

/// Child of `parent` at `index`, or the nearest sibling that can hold a
/// caret: comments, childless elements and `contenteditable="false"`
/// elements are skipped, first in the preferred direction, then the other.
/// Falls back to the child at `index` when every child is skipped.
fn editable_child<N: DomNode>(parent: &N, index: usize, backward: bool) -> N {
    let children = parent.child_nodes();
    let is_candidate = |child: &N| match child.kind() {
        Ok(DomNodeKind::Comment) => false,
        Ok(DomNodeKind::Element) => {
            !child.child_nodes().is_empty()
                && child.attribute("contenteditable").as_deref() != Some("false")
        }
        _ => true,
    };

    let forward = (index..children.len()).find(|&i| is_candidate(&children[i]));
    let behind = (0..=index).rev().find(|&i| is_candidate(&children[i]));
    let found = if backward {
        behind.or_else(|| (index + 1..children.len()).find(|&i| is_candidate(&children[i])))
    } else {
        forward.or_else(|| (0..index).rev().find(|&i| is_candidate(&children[i])))
    };

    children[found.unwrap_or(index)].clone()
}
