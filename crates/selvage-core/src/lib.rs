//! selvage-core: position mapping and selection reconciliation between a
//! rich-text document model and the DOM that renders it.
//!
//! This crate is platform-agnostic. The DOM is reached only through the
//! traits in [`dom`], so the same mapping logic runs against the browser
//! (`selvage-browser`) and against the in-memory DOM in [`memory`].
//!
//! # Architecture
//!
//! - `model`: document nodes, paths, points, ranges and selections
//! - `node_ref`: the node-ref capability the view layer provides
//! - `view`: path resolver / DOM locator over a rendered editor root
//! - `point`, `range`: model ↔ DOM coordinate conversion
//! - `normalize`: editing-semantics corrections for DOM-derived selections
//! - `reconcile`: pushes the model selection into the native selection
//! - `classify`: filters native events before command dispatch
//! - `session`: per-editor mutable state shared by the above

pub mod classify;
pub mod config;
pub mod dom;
pub mod error;
pub mod event_range;
pub mod hotkeys;
pub mod memory;
pub mod model;
pub mod node_ref;
pub mod normalize;
pub mod point;
pub mod range;
pub mod reconcile;
pub mod schedule;
pub mod schema;
pub mod scroll;
pub mod session;
pub mod throttle;
pub mod view;

pub use smol_str::SmolStr;

pub use classify::{
    ClassifyContext, CommandDispatcher, DropReason, EventClassifier, Handler, NativeEvent, Verdict,
};
pub use config::SyncConfig;
pub use dom::{DomHost, DomNode, DomNodeKind, DomPoint, DomRange, NativeRangeLike, NativeSelection};
pub use error::{ConfigError, DomError};
pub use event_range::{CaretLocator, PointerTarget, event_range};
pub use hotkeys::{KeyChord, is_redo, is_undo};
pub use model::{Element, Key, Mark, Marks, Node, NodeObject, Path, Point, Range, Selection, Text};
pub use node_ref::{NodeRefs, RefTree};
pub use normalize::{SelectionRead, normalize_range, normalize_selection, read_selection};
pub use reconcile::{ReconcileReport, Reconciler, WriteOutcome};
pub use schedule::{ManualScheduler, Scheduler, TaskHandle};
pub use schema::{Schema, VoidTypes};
pub use scroll::{Rect, Viewport, scroll_target};
pub use session::{EditorSession, SyncState};
pub use throttle::{Throttle, ThrottleAction};
pub use view::DomView;
