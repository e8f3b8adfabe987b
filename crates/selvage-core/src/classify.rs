//! Native event classification.
//!
//! Every native event passes through [`EventClassifier::classify`] before
//! it reaches the command dispatcher. Events caused by our own selection
//! writes, events from nested editors and events targeting content outside
//! this editor are dropped here; the rest update the session flags and are
//! dispatched.

use std::rc::Rc;

use crate::config::SyncConfig;
use crate::dom::{DATA_EDITOR, DATA_SPACER, DomNode, NativeRangeLike};
use crate::error::DomError;
use crate::model::{Node, Selection};
use crate::node_ref::NodeRefs;
use crate::normalize::normalize_range;
use crate::range::to_range;
use crate::schedule::{Scheduler, TaskHandle};
use crate::schema::Schema;
use crate::session::EditorSession;
use crate::view::DomView;

/// Editor event handlers, one per native event the editor listens to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Handler {
    BeforeInput,
    Blur,
    Click,
    CompositionEnd,
    CompositionStart,
    Copy,
    Cut,
    DragEnd,
    DragEnter,
    DragExit,
    DragLeave,
    DragOver,
    DragStart,
    Drop,
    Focus,
    Input,
    KeyDown,
    KeyUp,
    MouseDown,
    MouseUp,
    Paste,
    Select,
}

impl Handler {
    pub const ALL: [Handler; 22] = [
        Handler::BeforeInput,
        Handler::Blur,
        Handler::Click,
        Handler::CompositionEnd,
        Handler::CompositionStart,
        Handler::Copy,
        Handler::Cut,
        Handler::DragEnd,
        Handler::DragEnter,
        Handler::DragExit,
        Handler::DragLeave,
        Handler::DragOver,
        Handler::DragStart,
        Handler::Drop,
        Handler::Focus,
        Handler::Input,
        Handler::KeyDown,
        Handler::KeyUp,
        Handler::MouseDown,
        Handler::MouseUp,
        Handler::Paste,
        Handler::Select,
    ];

    /// Handler for a DOM event type. Both `select` and the document-level
    /// `selectionchange` map to [`Handler::Select`].
    pub fn from_dom_event(event_type: &str) -> Option<Handler> {
        if event_type == "select" {
            return Some(Handler::Select);
        }
        Self::ALL
            .into_iter()
            .find(|h| h.dom_event_type() == event_type)
    }

    /// The DOM event type to listen for.
    pub fn dom_event_type(self) -> &'static str {
        match self {
            Handler::BeforeInput => "beforeinput",
            Handler::Blur => "blur",
            Handler::Click => "click",
            Handler::CompositionEnd => "compositionend",
            Handler::CompositionStart => "compositionstart",
            Handler::Copy => "copy",
            Handler::Cut => "cut",
            Handler::DragEnd => "dragend",
            Handler::DragEnter => "dragenter",
            Handler::DragExit => "dragexit",
            Handler::DragLeave => "dragleave",
            Handler::DragOver => "dragover",
            Handler::DragStart => "dragstart",
            Handler::Drop => "drop",
            Handler::Focus => "focus",
            Handler::Input => "input",
            Handler::KeyDown => "keydown",
            Handler::KeyUp => "keyup",
            Handler::MouseDown => "mousedown",
            Handler::MouseUp => "mouseup",
            Handler::Paste => "paste",
            Handler::Select => "selectionchange",
        }
    }

    /// Handler name passed to the command dispatcher.
    pub fn name(self) -> &'static str {
        match self {
            Handler::BeforeInput => "onBeforeInput",
            Handler::Blur => "onBlur",
            Handler::Click => "onClick",
            Handler::CompositionEnd => "onCompositionEnd",
            Handler::CompositionStart => "onCompositionStart",
            Handler::Copy => "onCopy",
            Handler::Cut => "onCut",
            Handler::DragEnd => "onDragEnd",
            Handler::DragEnter => "onDragEnter",
            Handler::DragExit => "onDragExit",
            Handler::DragLeave => "onDragLeave",
            Handler::DragOver => "onDragOver",
            Handler::DragStart => "onDragStart",
            Handler::Drop => "onDrop",
            Handler::Focus => "onFocus",
            Handler::Input => "onInput",
            Handler::KeyDown => "onKeyDown",
            Handler::KeyUp => "onKeyUp",
            Handler::MouseDown => "onMouseDown",
            Handler::MouseUp => "onMouseUp",
            Handler::Paste => "onPaste",
            Handler::Select => "onSelect",
        }
    }

    pub fn is_drag_family(self) -> bool {
        matches!(
            self,
            Handler::DragEnd
                | Handler::DragEnter
                | Handler::DragExit
                | Handler::DragLeave
                | Handler::DragOver
                | Handler::DragStart
                | Handler::Drop
        )
    }

    /// Editing events only count when their target is editable content of
    /// this editor.
    pub fn requires_editable_target(self) -> bool {
        matches!(
            self,
            Handler::BeforeInput
                | Handler::Blur
                | Handler::CompositionEnd
                | Handler::CompositionStart
                | Handler::Copy
                | Handler::Cut
                | Handler::Focus
                | Handler::Input
                | Handler::KeyDown
                | Handler::KeyUp
                | Handler::Paste
                | Handler::Select
        )
    }

    /// Events a programmatic selection write makes the browser fire.
    pub fn is_selection_echo(self) -> bool {
        matches!(self, Handler::Select | Handler::Blur | Handler::Focus)
    }
}

/// The parts of a native event classification looks at.
#[derive(Clone, Debug, PartialEq)]
pub struct NativeEvent<N> {
    pub handler: Handler,
    pub target: Option<N>,
    /// `relatedTarget` of focus events.
    pub related_target: Option<N>,
    /// The event is, or was caused by, an undo/redo keystroke.
    pub is_undo_redo: bool,
}

impl<N> NativeEvent<N> {
    pub fn new(handler: Handler, target: Option<N>) -> Self {
        Self {
            handler,
            target,
            related_target: None,
            is_undo_redo: false,
        }
    }

    pub fn with_related_target(mut self, related_target: Option<N>) -> Self {
        self.related_target = related_target;
        self
    }

    pub fn with_undo_redo(mut self, is_undo_redo: bool) -> Self {
        self.is_undo_redo = is_undo_redo;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Forward to the command dispatcher.
    Dispatch,
    /// Don't dispatch, but push the model selection to the DOM again: the
    /// native selection changed representation without moving logically.
    Resync,
    Drop(DropReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropReason {
    /// Echo of our own selection write.
    Suspended,
    /// Side effect of an undo/redo keystroke.
    UndoRedo,
    /// `select` mapped to the current model selection and resync is off.
    Unchanged,
    Copying,
    Composing,
    /// Drag event from a nested editor.
    ForeignEditor,
    OutsideEditor,
    /// Blur that doesn't move focus out of the editor.
    BlurNotLeaving,
    NoTarget,
}

/// The command dispatcher the classifier forwards to.
pub trait CommandDispatcher<E> {
    fn run(&mut self, handler: Handler, event: &E);
}

impl<E, F: FnMut(Handler, &E)> CommandDispatcher<E> for F {
    fn run(&mut self, handler: Handler, event: &E) {
        self(handler, event)
    }
}

/// Editor state a classification is made against.
pub struct ClassifyContext<'a, N, R, S> {
    pub view: DomView<'a, N, R>,
    pub document: &'a Node,
    pub schema: &'a S,
    pub selection: &'a Selection,
    /// Native selection at event time; consulted for `select`.
    pub native: Option<NativeRangeLike<N>>,
    /// `document.activeElement` at event time.
    pub active_element: Option<N>,
}

/// Event classifier for one editor.
pub struct EventClassifier<N, Sch> {
    session: Rc<EditorSession<N>>,
    scheduler: Sch,
    config: SyncConfig,
}

impl<N: DomNode, Sch: Scheduler> EventClassifier<N, Sch> {
    pub fn new(session: Rc<EditorSession<N>>, scheduler: Sch, config: SyncConfig) -> Self {
        Self {
            session,
            scheduler,
            config,
        }
    }

    pub fn session(&self) -> &Rc<EditorSession<N>> {
        &self.session
    }

    /// Classify and, on [`Verdict::Dispatch`], forward `raw` to the
    /// dispatcher.
    pub fn handle<R, S, E, D>(
        &self,
        event: &NativeEvent<N>,
        cx: &ClassifyContext<'_, N, R, S>,
        dispatcher: &mut D,
        raw: &E,
    ) -> Result<Verdict, DomError>
    where
        R: NodeRefs<N>,
        S: Schema,
        D: CommandDispatcher<E>,
    {
        let verdict = self.classify(event, cx)?;
        if verdict == Verdict::Dispatch {
            dispatcher.run(event.handler, raw);
        }
        Ok(verdict)
    }

    pub fn classify<R, S>(
        &self,
        event: &NativeEvent<N>,
        cx: &ClassifyContext<'_, N, R, S>,
    ) -> Result<Verdict, DomError>
    where
        R: NodeRefs<N>,
        S: Schema,
    {
        let verdict = self.filter(event, cx)?;
        match verdict {
            Verdict::Drop(reason) => tracing::debug!(
                target: "selvage::events",
                handler = event.handler.name(),
                ?reason,
                "dropped event"
            ),
            _ => tracing::trace!(
                target: "selvage::events",
                handler = event.handler.name(),
                ?verdict,
                "classified event"
            ),
        }
        Ok(verdict)
    }

    fn filter<R, S>(
        &self,
        event: &NativeEvent<N>,
        cx: &ClassifyContext<'_, N, R, S>,
    ) -> Result<Verdict, DomError>
    where
        R: NodeRefs<N>,
        S: Schema,
    {
        let handler = event.handler;
        let root = cx.view.root();

        if handler.is_selection_echo() {
            if self.session.is_suspended() {
                return Ok(Verdict::Drop(DropReason::Suspended));
            }
            if event.is_undo_redo || self.session.is_undo_redo() {
                return Ok(Verdict::Drop(DropReason::UndoRedo));
            }
        }

        if handler == Handler::Select && self.selects_current_range(cx) {
            return Ok(if self.config.resync_on_equal_select {
                Verdict::Resync
            } else {
                Verdict::Drop(DropReason::Unchanged)
            });
        }

        if handler.is_drag_family() {
            let Some(target) = &event.target else {
                return Ok(Verdict::Drop(DropReason::NoTarget));
            };
            if target.closest(DATA_EDITOR).as_ref() != Some(root) {
                return Ok(Verdict::Drop(DropReason::ForeignEditor));
            }
        }

        if handler.requires_editable_target() {
            let Some(target) = self.editable_target(event, cx) else {
                return Ok(Verdict::Drop(DropReason::NoTarget));
            };
            if !cx.view.is_in_editor(&target)? {
                return Ok(Verdict::Drop(DropReason::OutsideEditor));
            }
        }

        Ok(self.track(event, cx))
    }

    /// The node an editing event acts on. `selectionchange` fires on the
    /// document, so a selection event is located by the native anchor.
    fn editable_target<R, S>(
        &self,
        event: &NativeEvent<N>,
        cx: &ClassifyContext<'_, N, R, S>,
    ) -> Option<N>
    where
        R: NodeRefs<N>,
        S: Schema,
    {
        if event.handler == Handler::Select {
            if let Some(native) = &cx.native {
                let (anchor, _, _) = native.endpoints();
                return Some(anchor.node.clone());
            }
        }
        event.target.clone()
    }

    fn selects_current_range<R, S>(&self, cx: &ClassifyContext<'_, N, R, S>) -> bool
    where
        R: NodeRefs<N>,
        S: Schema,
    {
        let Some(current) = cx.selection.to_range() else {
            return false;
        };
        cx.native
            .as_ref()
            .and_then(|native| to_range(&cx.view, native))
            .map(|range| normalize_range(cx.document, cx.schema, &range))
            .is_some_and(|range| range == current)
    }

    /// Session bookkeeping and the last handler-specific gates.
    fn track<R, S>(&self, event: &NativeEvent<N>, cx: &ClassifyContext<'_, N, R, S>) -> Verdict
    where
        R: NodeRefs<N>,
        S: Schema,
    {
        let session = &self.session;
        match event.handler {
            Handler::Blur => {
                if session.is_copying() {
                    return Verdict::Drop(DropReason::Copying);
                }
                if self.blur_stays_in_editor(event, cx) {
                    return Verdict::Drop(DropReason::BlurNotLeaving);
                }
            }
            Handler::Focus => {
                if session.is_copying() {
                    return Verdict::Drop(DropReason::Copying);
                }
                session.set_active_element(cx.active_element.clone());
            }
            Handler::Select => {
                if session.is_copying() {
                    return Verdict::Drop(DropReason::Copying);
                }
                if session.is_composing() {
                    return Verdict::Drop(DropReason::Composing);
                }
                session.set_active_element(cx.active_element.clone());
            }
            Handler::Input => {
                if session.is_composing() {
                    return Verdict::Drop(DropReason::Composing);
                }
            }
            Handler::KeyDown => {
                if session.is_composing() {
                    return Verdict::Drop(DropReason::Composing);
                }
                if event.is_undo_redo {
                    session.set_undo_redo(true);
                    let session = session.clone();
                    self.scheduler
                        .next_frame(Box::new(move || session.set_undo_redo(false)))
                        .detach();
                }
            }
            Handler::CompositionStart => session.begin_composition(),
            Handler::CompositionEnd => {
                let ticket = session.end_composition();
                let session = session.clone();
                self.scheduler
                    .next_frame(Box::new(move || session.settle_composition(ticket)))
                    .detach();
            }
            Handler::Copy | Handler::Cut => {
                session.set_copying(true);
                let session = session.clone();
                self.scheduler
                    .next_frame(Box::new(move || session.set_copying(false)))
                    .detach();
            }
            Handler::DragStart => session.set_dragging(true),
            Handler::DragEnd | Handler::Drop => session.set_dragging(false),
            _ => {}
        }
        Verdict::Dispatch
    }

    /// Blurs that don't take focus away from the editor: the window itself
    /// lost focus (the active element is unchanged), or focus moves back to
    /// the root, into a void spacer, or onto non-void editor content.
    fn blur_stays_in_editor<R, S>(
        &self,
        event: &NativeEvent<N>,
        cx: &ClassifyContext<'_, N, R, S>,
    ) -> bool
    where
        R: NodeRefs<N>,
        S: Schema,
    {
        if cx.active_element.is_some() && cx.active_element == self.session.active_element() {
            return true;
        }
        let Some(related) = &event.related_target else {
            return false;
        };
        let root = cx.view.root();
        if related == root || related.has_attribute(DATA_SPACER) {
            return true;
        }
        root.contains(related)
            && cx
                .view
                .resolve_path(related)
                .and_then(|path| cx.document.get(&path))
                .is_some_and(|node| !cx.schema.is_void(node))
    }
}
