//! Per-editor mutable state shared by the reconciler and the event
//! classifier.
//!
//! Everything here lives behind `Cell`/`RefCell` and is shared through an
//! `Rc`: the reconciler's deferred callbacks and the event listeners all run
//! on the one UI thread.

use std::cell::{Cell, RefCell};

use crate::dom::DomNode;

/// Whether selection echoes from our own DOM writes are expected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncState {
    #[default]
    Idle,
    /// A programmatic selection write is in flight; selection-family events
    /// are our own echo and get dropped.
    Suspended,
}

/// State for one editor instance.
#[derive(Debug)]
pub struct EditorSession<N> {
    state: Cell<SyncState>,
    generation: Cell<u64>,
    composing: Cell<bool>,
    composition_count: Cell<u64>,
    copying: Cell<bool>,
    dragging: Cell<bool>,
    undo_redo: Cell<bool>,
    active_element: RefCell<Option<N>>,
}

impl<N> Default for EditorSession<N> {
    fn default() -> Self {
        Self {
            state: Cell::new(SyncState::Idle),
            generation: Cell::new(0),
            composing: Cell::new(false),
            composition_count: Cell::new(0),
            copying: Cell::new(false),
            dragging: Cell::new(false),
            undo_redo: Cell::new(false),
            active_element: RefCell::new(None),
        }
    }
}

impl<N: DomNode> EditorSession<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SyncState {
        self.state.get()
    }

    pub fn is_suspended(&self) -> bool {
        self.state.get() == SyncState::Suspended
    }

    /// Enter `Suspended` for a new write. Returns the write's generation;
    /// only [`resume`](Self::resume) with the latest generation goes back to
    /// `Idle`.
    pub fn suspend(&self) -> u64 {
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);
        self.state.set(SyncState::Suspended);
        generation
    }

    /// Return to `Idle` if no write newer than `generation` started.
    pub fn resume(&self, generation: u64) -> bool {
        if self.generation.get() != generation {
            tracing::trace!(
                target: "selvage::session",
                stale = generation,
                current = self.generation.get(),
                "ignoring stale resume"
            );
            return false;
        }
        self.state.set(SyncState::Idle);
        true
    }

    pub fn is_composing(&self) -> bool {
        self.composing.get()
    }

    pub fn begin_composition(&self) {
        self.composing.set(true);
        self.composition_count
            .set(self.composition_count.get().wrapping_add(1));
    }

    /// Ticket for the deferred [`settle_composition`](Self::settle_composition).
    /// `composing` stays set until then so the `input` that trails
    /// `compositionend` is still dropped.
    pub fn end_composition(&self) -> u64 {
        self.composition_count.get()
    }

    /// Clear `composing` unless another composition started since `ticket`.
    pub fn settle_composition(&self, ticket: u64) {
        if self.composition_count.get() == ticket {
            self.composing.set(false);
        }
    }

    pub fn is_copying(&self) -> bool {
        self.copying.get()
    }

    pub fn set_copying(&self, copying: bool) {
        self.copying.set(copying);
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.get()
    }

    pub fn set_dragging(&self, dragging: bool) {
        self.dragging.set(dragging);
    }

    /// Set from an undo/redo keydown until the next frame: the selection
    /// events it causes are not user intent.
    pub fn is_undo_redo(&self) -> bool {
        self.undo_redo.get()
    }

    pub fn set_undo_redo(&self, undo_redo: bool) {
        self.undo_redo.set(undo_redo);
    }

    /// Element that had focus when the editor last saw a focus/select.
    pub fn active_element(&self) -> Option<N> {
        self.active_element.borrow().clone()
    }

    pub fn set_active_element(&self, element: Option<N>) {
        *self.active_element.borrow_mut() = element;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryNode;

    #[test]
    fn test_only_latest_write_resumes() {
        let session = EditorSession::<MemoryNode>::new();
        let first = session.suspend();
        let second = session.suspend();
        assert!(session.is_suspended());

        assert!(!session.resume(first));
        assert!(session.is_suspended());
        assert!(session.resume(second));
        assert_eq!(session.state(), SyncState::Idle);
    }

    #[test]
    fn test_composition_settles_only_without_newer_composition() {
        let session = EditorSession::<MemoryNode>::new();
        session.begin_composition();
        let ticket = session.end_composition();
        session.begin_composition();
        session.settle_composition(ticket);
        assert!(session.is_composing());

        let ticket = session.end_composition();
        session.settle_composition(ticket);
        assert!(!session.is_composing());
    }
}
