//! One editor's selection sync loop, wired to the browser.

use std::rc::Rc;

use wasm_bindgen::JsCast;

use selvage_core::{
    ClassifyContext, DomHost, DomView, EditorSession, EventClassifier, NativeRangeLike, Node,
    NodeRefs, Range, ReconcileReport, Reconciler, Schema, Selection, SelectionRead,
    SyncConfig, Verdict, event_range, read_selection,
};

use crate::caret::BrowserCaretLocator;
use crate::dom::BrowserNode;
use crate::error::BrowserError;
use crate::events::{native_event, pointer_target};
use crate::host::BrowserHost;
use crate::platform::ForPlatform;
use crate::schedule::BrowserScheduler;

/// Reconciler, classifier and session for an editor mounted at `root`.
pub struct BrowserSync {
    root: BrowserNode,
    host: BrowserHost,
    reconciler: Reconciler<BrowserNode, BrowserScheduler>,
    classifier: EventClassifier<BrowserNode, BrowserScheduler>,
    locator: BrowserCaretLocator,
}

impl BrowserSync {
    /// `config` is adjusted for the detected platform before use.
    pub fn new(root: web_sys::Element, config: SyncConfig) -> Result<Self, BrowserError> {
        let root = root
            .dyn_into::<web_sys::HtmlElement>()
            .map_err(|_| BrowserError::NotHtmlElement)?;
        let host = BrowserHost::new()?;
        let config = config.for_platform(host.platform());
        let session = Rc::new(EditorSession::new());
        let scheduler = BrowserScheduler::new();
        let locator = BrowserCaretLocator::new(host.window().clone(), host.document().clone());

        tracing::debug!(target: "selvage::sync", ?config, "editor sync created");
        Ok(Self {
            root: BrowserNode::new(root),
            reconciler: Reconciler::new(session.clone(), scheduler.clone(), config.clone()),
            classifier: EventClassifier::new(session, scheduler, config),
            host,
            locator,
        })
    }

    pub fn root(&self) -> &BrowserNode {
        &self.root
    }

    pub fn host(&self) -> &BrowserHost {
        &self.host
    }

    pub fn session(&self) -> &Rc<EditorSession<BrowserNode>> {
        self.reconciler.session()
    }

    pub fn config(&self) -> &SyncConfig {
        self.reconciler.config()
    }

    pub fn view<'a, R: NodeRefs<BrowserNode>>(
        &'a self,
        refs: &'a R,
    ) -> DomView<'a, BrowserNode, R> {
        DomView::new(&self.root, refs)
    }

    /// Push `selection` into the DOM after a render.
    pub fn reconcile<R: NodeRefs<BrowserNode>>(
        &self,
        refs: &R,
        selection: &Selection,
    ) -> Option<ReconcileReport> {
        self.reconciler.reconcile(&self.host, &self.view(refs), selection)
    }

    /// Classify a DOM event against the current editor state. Event types
    /// the editor doesn't handle are `None`.
    ///
    /// A [`Verdict::Resync`] is acted on here: `selection` is pushed to the
    /// DOM again before returning.
    pub fn classify<R: NodeRefs<BrowserNode>, S: Schema>(
        &self,
        event: &web_sys::Event,
        refs: &R,
        document: &Node,
        schema: &S,
        selection: &Selection,
    ) -> Option<Verdict> {
        let native = native_event(event, self.host.platform())?;
        let cx = ClassifyContext {
            view: self.view(refs),
            document,
            schema,
            selection,
            native: self
                .host
                .selection()
                .and_then(|s| NativeRangeLike::from_selection(&s)),
            active_element: self.host.active_element(),
        };
        match self.classifier.classify(&native, &cx) {
            Ok(Verdict::Resync) => {
                self.reconcile(refs, selection);
                Some(Verdict::Resync)
            }
            Ok(verdict) => Some(verdict),
            Err(err) => {
                tracing::warn!(target: "selvage::events", %err, "classification failed");
                None
            }
        }
    }

    /// Read the native selection back into the model.
    pub fn read_selection<R: NodeRefs<BrowserNode>, S: Schema>(
        &self,
        refs: &R,
        document: &Node,
        schema: &S,
        previous: &Selection,
    ) -> SelectionRead {
        match self.host.selection() {
            Some(native) => read_selection(&self.view(refs), &native, document, schema, previous),
            None => SelectionRead::Blur,
        }
    }

    /// Model range under a mouse or drag event.
    pub fn event_range<R: NodeRefs<BrowserNode>, S: Schema>(
        &self,
        event: &web_sys::MouseEvent,
        refs: &R,
        document: &Node,
        schema: &S,
    ) -> Option<Range> {
        let pointer = pointer_target(event)?;
        event_range(&self.view(refs), document, schema, &self.locator, &pointer)
    }
}
