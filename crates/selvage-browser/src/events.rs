//! Browser event extraction and listener wiring.
//!
//! Converts `web_sys` events into the [`NativeEvent`] the classifier reads,
//! and attaches one listener per [`Handler`] to the editor root.
//! `selectionchange` only fires on the document, so it is listened to
//! there and sampled through a leading + trailing [`Throttle`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo_timers::callback::Timeout;
use wasm_bindgen::{JsCast, JsValue};
use web_time::Instant;

use selvage_core::{
    Handler, KeyChord, NativeEvent, NativeRangeLike, PointerTarget, Rect, SyncConfig, Throttle,
    ThrottleAction, is_redo, is_undo,
};

use crate::dom::BrowserNode;
use crate::platform::Platform;
use crate::selection::{StaticRange, static_range_to_native};

/// The key chord of a keyboard event.
pub fn key_chord(event: &web_sys::KeyboardEvent) -> KeyChord {
    KeyChord {
        key: event.key().into(),
        ctrl: event.ctrl_key(),
        meta: event.meta_key(),
        shift: event.shift_key(),
        alt: event.alt_key(),
    }
}

fn event_node(target: Option<web_sys::EventTarget>) -> Option<BrowserNode> {
    target
        .and_then(|t| t.dyn_into::<web_sys::Node>().ok())
        .map(BrowserNode)
}

/// Classification input for a DOM event, or `None` for event types the
/// editor doesn't handle.
pub fn native_event(
    event: &web_sys::Event,
    platform: &Platform,
) -> Option<NativeEvent<BrowserNode>> {
    let handler = Handler::from_dom_event(&event.type_())?;
    let mut native = NativeEvent::new(handler, event_node(event.target()));

    if let Some(focus) = event.dyn_ref::<web_sys::FocusEvent>() {
        native = native.with_related_target(event_node(focus.related_target()));
    }
    if let Some(keyboard) = event.dyn_ref::<web_sys::KeyboardEvent>() {
        let chord = key_chord(keyboard);
        let apple = platform.is_apple();
        native = native.with_undo_redo(is_undo(&chord, apple) || is_redo(&chord, apple));
    }
    if let Some(input) = event.dyn_ref::<web_sys::InputEvent>() {
        let history = input.input_type();
        native = native.with_undo_redo(history == "historyUndo" || history == "historyRedo");
    }
    Some(native)
}

/// First range of `InputEvent.getTargetRanges()`, where supported.
pub fn target_range(event: &web_sys::InputEvent) -> Option<NativeRangeLike<BrowserNode>> {
    let method = js_sys::Reflect::get(event, &JsValue::from_str("getTargetRanges")).ok()?;
    let method = method.dyn_into::<js_sys::Function>().ok()?;
    let ranges = method.call0(event).ok()?.dyn_into::<js_sys::Array>().ok()?;
    let first = ranges.get(0);
    if first.is_undefined() {
        return None;
    }
    Some(static_range_to_native(first.unchecked_ref::<StaticRange>()))
}

/// Pointer position and target of a mouse or drag event.
pub fn pointer_target(event: &web_sys::MouseEvent) -> Option<PointerTarget<BrowserNode>> {
    let target = event_node(event.target())?;
    let rect = target
        .element_or_parent()?
        .get_bounding_client_rect();
    Some(PointerTarget {
        target,
        x: event.client_x() as f64,
        y: event.client_y() as f64,
        target_rect: Rect::new(rect.left(), rect.top(), rect.width(), rect.height()),
    })
}

type Callback = Rc<dyn Fn(&web_sys::Event)>;

struct SelectionSampler {
    throttle: Throttle,
    last: Option<web_sys::Event>,
    timer: Option<Timeout>,
}

impl SelectionSampler {
    fn on_change(state: &Rc<RefCell<Self>>, callback: &Callback, event: &web_sys::Event) {
        let action = state.borrow_mut().throttle.call(Instant::now());
        match action {
            ThrottleAction::RunNow => callback(event),
            ThrottleAction::ScheduleTrailing(delay) => {
                let weak = Rc::downgrade(state);
                let callback = callback.clone();
                let timer = Timeout::new(delay.as_millis() as u32, move || {
                    Self::fire(&weak, &callback);
                });
                let mut sampler = state.borrow_mut();
                sampler.last = Some(event.clone());
                sampler.timer = Some(timer);
            }
            ThrottleAction::AlreadyScheduled => {
                state.borrow_mut().last = Some(event.clone());
            }
        }
    }

    fn fire(state: &Weak<RefCell<Self>>, callback: &Callback) {
        let Some(state) = state.upgrade() else {
            return;
        };
        let event = {
            let mut sampler = state.borrow_mut();
            if sampler.throttle.fire_trailing(Instant::now()) {
                sampler.last.take()
            } else {
                None
            }
        };
        if let Some(event) = event {
            callback(&event);
        }
    }
}

/// Listeners for one editor. Dropping this detaches them all and cancels a
/// pending trailing `selectionchange`.
pub struct EditorEvents {
    _listeners: Vec<EventListener>,
    sampler: Rc<RefCell<SelectionSampler>>,
}

impl EditorEvents {
    /// Listen on `root` for every handler and on `document` for
    /// `selectionchange`, forwarding each event to `callback`.
    pub fn attach<F>(
        root: &web_sys::HtmlElement,
        document: &web_sys::Document,
        config: &SyncConfig,
        callback: F,
    ) -> Self
    where
        F: Fn(&web_sys::Event) + 'static,
    {
        let callback: Callback = Rc::new(callback);
        let sampler = Rc::new(RefCell::new(SelectionSampler {
            throttle: Throttle::new(config.selection_throttle()),
            last: None,
            timer: None,
        }));

        let mut listeners: Vec<EventListener> = Handler::ALL
            .into_iter()
            .filter(|h| *h != Handler::Select)
            .map(|handler| {
                let callback = callback.clone();
                // focus and blur don't bubble out of nested editable content
                let options = EventListenerOptions {
                    phase: EventListenerPhase::Capture,
                    passive: false,
                };
                EventListener::new_with_options(
                    root,
                    handler.dom_event_type(),
                    options,
                    move |event| callback(event),
                )
            })
            .collect();

        let select_callback = callback.clone();
        listeners.push(EventListener::new(root, "select", move |event| {
            select_callback(event)
        }));

        let state = sampler.clone();
        listeners.push(EventListener::new(
            document,
            Handler::Select.dom_event_type(),
            move |event| SelectionSampler::on_change(&state, &callback, event),
        ));

        tracing::debug!(
            target: "selvage::events",
            count = listeners.len(),
            "attached editor listeners"
        );
        Self {
            _listeners: listeners,
            sampler,
        }
    }
}

impl Drop for EditorEvents {
    fn drop(&mut self) {
        let mut sampler = self.sampler.borrow_mut();
        sampler.throttle.cancel();
        sampler.last = None;
        // dropping a pending Timeout clears it
        sampler.timer = None;
    }
}
