//! In-memory DOM implementing the [`dom`](crate::dom) traits.
//!
//! Used to exercise the mapping and sync logic on the host without a
//! browser: [`render_document`] renders a model document following the same
//! data-attribute contract as the real view layer, and [`MemoryHost`] stands
//! in for the window (selection, focus, scrolling).

mod dom;
mod host;
mod render;

pub use dom::MemoryNode;
pub use host::{MemoryHost, MemorySelection};
pub use render::{Rendered, render_document};
