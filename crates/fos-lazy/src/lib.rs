//! fOS Lazy Loading
//!
//! Defers media, background images and scripts marked with
//! `data-<attribute>` until they are needed:
//!
//! - Off-screen elements are revealed when they enter the viewport
//! - Elements inserted later are classified as they arrive
//! - Marked scripts are replaced after the window `load` event
//! - Hosts without observers get everything revealed at activation
//!
//! Lifecycle classes (`on`, `loading`, `loaded`, `failed`) track each
//! element through its reveal.

mod classify;
mod error;
mod fallback;
mod intersection;
mod loader;
mod mutation;
mod options;
mod reveal;
mod script;
mod strategy;
mod viewport;

pub use classify::{classify, wants_priority_hint, Disposition};
pub use error::LazyError;
pub use fallback::FallbackStrategy;
pub use intersection::{IntersectionCoordinator, WatchOutcome};
pub use loader::{activate, LazyLoader};
pub use mutation::MutationCoordinator;
pub use options::{Options, Settings, OPTIONS_GLOBAL};
pub use reveal::reveal;
pub use script::{defer_script, replace_placeholder};
pub use strategy::{Delivery, ObserverStrategy, Strategy, StrategyKind};
pub use viewport::{is_in_viewport, viewport_size};
