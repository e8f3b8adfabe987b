//! Pushes the model selection into the native selection.
//!
//! Each call to [`Reconciler::reconcile`] compares the model selection with
//! what the DOM holds and writes only when they differ. A write puts the
//! session into [`SyncState::Suspended`](crate::SyncState) so the browser's
//! own `select`/`focus`/`blur` echoes are dropped by the classifier; a
//! deferred task returns it to `Idle` once the browser has settled.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::SyncConfig;
use crate::dom::{DomHost, DomNode, DomRange, NativeSelection};
use crate::error::DomError;
use crate::model::Selection;
use crate::node_ref::NodeRefs;
use crate::range::to_dom_range;
use crate::schedule::{Scheduler, TaskHandle};
use crate::session::EditorSession;
use crate::view::DomView;

/// What happened to the native selection during a reconcile pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The model selection is blurred or unset; nothing to write.
    #[default]
    NotNeeded,
    /// The native selection already covers the target range.
    InSync,
    Written,
    /// The model selection has no DOM position (stale render).
    Unmapped,
    Failed(DomError),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub blurred: bool,
    pub cleared: bool,
    pub focused: bool,
    pub write: WriteOutcome,
}

/// Selection reconciler for one editor.
pub struct Reconciler<N, S: Scheduler> {
    session: Rc<EditorSession<N>>,
    scheduler: S,
    pending: RefCell<Option<S::Handle>>,
    config: SyncConfig,
}

impl<N: DomNode, S: Scheduler> Reconciler<N, S> {
    pub fn new(session: Rc<EditorSession<N>>, scheduler: S, config: SyncConfig) -> Self {
        Self {
            session,
            scheduler,
            pending: RefCell::new(None),
            config,
        }
    }

    pub fn session(&self) -> &Rc<EditorSession<N>> {
        &self.session
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Bring the native selection and focus in line with `selection`.
    ///
    /// Returns `None` when the host has no selection object at all (Firefox
    /// returns null from `getSelection()` in hidden frames); the tick is
    /// skipped.
    pub fn reconcile<H, R>(
        &self,
        host: &H,
        view: &DomView<'_, N, R>,
        selection: &Selection,
    ) -> Option<ReconcileReport>
    where
        H: DomHost<Node = N> + Clone + 'static,
        R: NodeRefs<N>,
    {
        let Some(native) = host.selection() else {
            tracing::trace!(target: "selvage::reconcile", "no native selection, skipping");
            return None;
        };
        let root = view.root();
        let root_is_active = host.active_element().as_ref() == Some(root);
        let mut report = ReconcileReport::default();

        if selection.is_blurred() && root_is_active {
            match host.blur(root) {
                Ok(()) => report.blurred = true,
                Err(err) => tracing::warn!(target: "selvage::reconcile", %err, "blur failed"),
            }
        }

        if selection.is_unset()
            && self.config.clear_unset_selection
            && self.holds_editor_range(&native, root)
        {
            match native.remove_all_ranges() {
                Ok(()) => report.cleared = true,
                Err(err) => {
                    tracing::warn!(target: "selvage::reconcile", %err, "clearing selection failed")
                }
            }
        }

        if selection.is_focused && !root_is_active {
            match host.focus(root, true) {
                Ok(()) => report.focused = true,
                Err(err) => tracing::warn!(target: "selvage::reconcile", %err, "focus failed"),
            }
        }

        if selection.is_focused && selection.is_set() {
            report.write = self.write(host, view, &native, selection);
        }
        Some(report)
    }

    fn holds_editor_range<Sel: NativeSelection<Node = N>>(&self, native: &Sel, root: &N) -> bool {
        native.range_count() > 0
            && native
                .first_range()
                .is_some_and(|range| root.contains(&range.start.node))
    }

    fn write<H, R>(
        &self,
        host: &H,
        view: &DomView<'_, N, R>,
        native: &H::Selection,
        selection: &Selection,
    ) -> WriteOutcome
    where
        H: DomHost<Node = N> + Clone + 'static,
        R: NodeRefs<N>,
    {
        let Some(range) = selection.to_range() else {
            return WriteOutcome::NotNeeded;
        };
        let Some(target) = to_dom_range(view, &range) else {
            tracing::warn!(
                target: "selvage::reconcile",
                anchor = %range.anchor.path,
                focus = %range.focus.path,
                "unable to map selection to the DOM, skipping"
            );
            return WriteOutcome::Unmapped;
        };

        if native
            .first_range()
            .is_some_and(|current| current.same_extent(&target))
        {
            tracing::trace!(target: "selvage::reconcile", "native selection already in sync");
            return WriteOutcome::InSync;
        }

        if let Some(pending) = self.pending.borrow_mut().take() {
            pending.cancel();
        }
        let generation = self.session.suspend();
        let backward = range.is_backward();

        let outcome = match apply(native, &target, backward) {
            Ok(()) => {
                if self.config.scroll_into_view {
                    host.scroll_selection_into_view(native, backward);
                }
                tracing::debug!(
                    target: "selvage::reconcile",
                    generation,
                    backward,
                    "wrote native selection"
                );
                WriteOutcome::Written
            }
            Err(err) => {
                tracing::warn!(target: "selvage::reconcile", %err, "writing native selection failed");
                WriteOutcome::Failed(err)
            }
        };

        self.schedule_resume(host, view.root(), generation);
        outcome
    }

    fn schedule_resume<H>(&self, host: &H, root: &N, generation: u64)
    where
        H: DomHost<Node = N> + Clone + 'static,
    {
        let session = self.session.clone();
        let refocus = self
            .config
            .refocus_after_write
            .then(|| (host.clone(), root.clone()));

        let handle = self.scheduler.defer(Box::new(move || {
            if let Some((host, root)) = refocus {
                if let Err(err) = host.focus(&root, true) {
                    tracing::debug!(target: "selvage::reconcile", %err, "refocus after write failed");
                }
            }
            session.resume(generation);
        }));
        *self.pending.borrow_mut() = Some(handle);
    }
}

fn apply<Sel: NativeSelection>(
    native: &Sel,
    target: &DomRange<Sel::Node>,
    backward: bool,
) -> Result<(), DomError> {
    native.remove_all_ranges()?;
    if !native.supports_base_and_extent() {
        return native.add_range(target);
    }
    if backward {
        native.set_base_and_extent(&target.end, &target.start)
    } else {
        native.set_base_and_extent(&target.start, &target.end)
    }
}
