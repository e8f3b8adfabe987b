use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::rc::Rc;

use super::dom::{MemoryNode, compare_points};
use crate::dom::{DomHost, DomPoint, DomRange, NativeSelection};
use crate::error::DomError;

#[derive(Debug)]
struct SelectionState {
    anchor: Option<DomPoint<MemoryNode>>,
    focus: Option<DomPoint<MemoryNode>>,
    writes: usize,
    supports_base_and_extent: bool,
}

/// A native selection with at most one range. Clones share state.
#[derive(Clone, Debug)]
pub struct MemorySelection(Rc<RefCell<SelectionState>>);

impl Default for MemorySelection {
    fn default() -> Self {
        Self(Rc::new(RefCell::new(SelectionState {
            anchor: None,
            focus: None,
            writes: 0,
            supports_base_and_extent: true,
        })))
    }
}

impl MemorySelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select as the user would; not counted as a write.
    pub fn set(&self, anchor: DomPoint<MemoryNode>, focus: DomPoint<MemoryNode>) {
        let mut state = self.0.borrow_mut();
        state.anchor = Some(anchor);
        state.focus = Some(focus);
    }

    /// Programmatic writes (`setBaseAndExtent` / `addRange`) so far.
    pub fn writes(&self) -> usize {
        self.0.borrow().writes
    }

    /// Emulate a browser without `setBaseAndExtent`.
    pub fn set_supports_base_and_extent(&self, supported: bool) {
        self.0.borrow_mut().supports_base_and_extent = supported;
    }

    fn write(&self, anchor: &DomPoint<MemoryNode>, focus: &DomPoint<MemoryNode>) {
        let mut state = self.0.borrow_mut();
        state.anchor = Some(anchor.clone());
        state.focus = Some(focus.clone());
        state.writes += 1;
    }
}

impl NativeSelection for MemorySelection {
    type Node = MemoryNode;

    fn range_count(&self) -> usize {
        usize::from(self.0.borrow().anchor.is_some())
    }

    fn anchor(&self) -> Option<DomPoint<MemoryNode>> {
        self.0.borrow().anchor.clone()
    }

    fn focus(&self) -> Option<DomPoint<MemoryNode>> {
        self.0.borrow().focus.clone()
    }

    fn is_collapsed(&self) -> bool {
        let state = self.0.borrow();
        state.anchor == state.focus
    }

    fn first_range(&self) -> Option<DomRange<MemoryNode>> {
        let (anchor, focus) = (self.anchor()?, self.focus()?);
        if compare_points(&focus, &anchor) == Ordering::Less {
            Some(DomRange::new(focus, anchor))
        } else {
            Some(DomRange::new(anchor, focus))
        }
    }

    fn remove_all_ranges(&self) -> Result<(), DomError> {
        let mut state = self.0.borrow_mut();
        state.anchor = None;
        state.focus = None;
        Ok(())
    }

    fn supports_base_and_extent(&self) -> bool {
        self.0.borrow().supports_base_and_extent
    }

    fn set_base_and_extent(
        &self,
        base: &DomPoint<MemoryNode>,
        extent: &DomPoint<MemoryNode>,
    ) -> Result<(), DomError> {
        if !self.supports_base_and_extent() {
            return Err(DomError::Operation("setBaseAndExtent is not supported".into()));
        }
        self.write(base, extent);
        Ok(())
    }

    fn add_range(&self, range: &DomRange<MemoryNode>) -> Result<(), DomError> {
        if self.range_count() > 0 {
            return Err(DomError::Operation("selection already has a range".into()));
        }
        self.write(&range.start, &range.end);
        Ok(())
    }
}

#[derive(Debug)]
struct HostState {
    selection: MemorySelection,
    selection_available: Cell<bool>,
    active_element: RefCell<Option<MemoryNode>>,
    scrolled: RefCell<Vec<bool>>,
}

/// Window stand-in: one selection, an active element, and a log of
/// scroll-into-view requests. Clones share state.
#[derive(Clone, Debug)]
pub struct MemoryHost(Rc<HostState>);

impl Default for MemoryHost {
    fn default() -> Self {
        Self(Rc::new(HostState {
            selection: MemorySelection::new(),
            selection_available: Cell::new(true),
            active_element: RefCell::new(None),
            scrolled: RefCell::new(Vec::new()),
        }))
    }
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// The selection object, even while [`selection`](DomHost::selection)
    /// is made to return `None`.
    pub fn native(&self) -> MemorySelection {
        self.0.selection.clone()
    }

    /// `false` makes `selection()` return `None`, like Firefox's
    /// `getSelection()` inside hidden frames.
    pub fn set_selection_available(&self, available: bool) {
        self.0.selection_available.set(available);
    }

    pub fn set_active_element(&self, element: Option<MemoryNode>) {
        *self.0.active_element.borrow_mut() = element;
    }

    /// The `backward` flag of every scroll-into-view request.
    pub fn scrolled(&self) -> Vec<bool> {
        self.0.scrolled.borrow().clone()
    }
}

impl DomHost for MemoryHost {
    type Node = MemoryNode;
    type Selection = MemorySelection;

    fn selection(&self) -> Option<MemorySelection> {
        self.0
            .selection_available
            .get()
            .then(|| self.0.selection.clone())
    }

    fn active_element(&self) -> Option<MemoryNode> {
        self.0.active_element.borrow().clone()
    }

    fn focus(&self, element: &MemoryNode, _prevent_scroll: bool) -> Result<(), DomError> {
        self.set_active_element(Some(element.clone()));
        Ok(())
    }

    fn blur(&self, element: &MemoryNode) -> Result<(), DomError> {
        let mut active = self.0.active_element.borrow_mut();
        if active.as_ref() == Some(element) {
            *active = None;
        }
        Ok(())
    }

    fn scroll_selection_into_view(&self, _selection: &MemorySelection, backward: bool) {
        self.0.scrolled.borrow_mut().push(backward);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::DomNode;

    #[test]
    fn test_first_range_is_document_ordered() {
        let root = MemoryNode::element("div")
            .with_children(vec![MemoryNode::text("one"), MemoryNode::text("two")]);
        let children = root.child_nodes();
        let selection = MemorySelection::new();
        selection.set(
            DomPoint::new(children[1].clone(), 2),
            DomPoint::new(children[0].clone(), 1),
        );

        let range = selection.first_range().unwrap();
        assert_eq!(range.start, DomPoint::new(children[0].clone(), 1));
        assert_eq!(range.end, DomPoint::new(children[1].clone(), 2));
        assert!(!selection.is_collapsed());
        assert_eq!(selection.writes(), 0);
    }

    #[test]
    fn test_set_base_and_extent_requires_support() {
        let text = MemoryNode::text("abc");
        let selection = MemorySelection::new();
        selection.set_supports_base_and_extent(false);
        let point = DomPoint::new(text, 1);
        assert!(selection.set_base_and_extent(&point, &point).is_err());
        assert!(selection.add_range(&DomRange::new(point.clone(), point)).is_ok());
        assert_eq!(selection.writes(), 1);
    }
}
