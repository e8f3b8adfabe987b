//! Browser DOM binding for selvage.
//!
//! Implements the `selvage-core` DOM traits for `web_sys` types and wires
//! the reconciler and event classifier to real browser events. It assumes
//! a `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `dom`, `selection`: `DomNode` / `NativeSelection` over `web_sys`
//! - `host`: window selection, focus and caret scrolling
//! - `caret`: caret lookup from client coordinates for drag and drop
//! - `events`: event extraction and listener wiring
//! - `schedule`: timeouts and animation frames behind `Scheduler`
//! - `platform`: browser/OS detection and per-platform config
//! - `sync`: one editor's sync loop
//!
//! # Re-exports
//!
//! This crate re-exports `selvage-core` for convenience, so consumers only
//! need to depend on `selvage-browser`.

// Re-export core crate
pub use selvage_core;
pub use selvage_core::*;

pub mod caret;
pub mod dom;
pub mod error;
pub mod events;
pub mod host;
pub mod logging;
pub mod platform;
pub mod schedule;
pub mod selection;
pub mod sync;

pub use caret::BrowserCaretLocator;
pub use dom::BrowserNode;
pub use error::BrowserError;
pub use events::{EditorEvents, key_chord, native_event, pointer_target, target_range};
pub use host::BrowserHost;
pub use logging::init_tracing;
pub use platform::{ForPlatform, Platform, platform};
pub use schedule::{BrowserScheduler, BrowserTask};
pub use selection::BrowserSelection;
pub use sync::BrowserSync;
