//! DOM Events
//!
//! Event types, targets and listener registrations. Dispatch lives on
//! `Document` because listeners receive the document mutably.

use crate::{Document, NodeId};

/// Event type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Resource finished loading (element) or page finished loading (window)
    Load,
    /// Resource failed to load
    Error,
    DOMContentLoaded,
}

impl EventType {
    pub fn name(&self) -> &'static str {
        match self {
            EventType::Load => "load",
            EventType::Error => "error",
            EventType::DOMContentLoaded => "DOMContentLoaded",
        }
    }
}

/// Where a listener is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Window,
    Node(NodeId),
}

/// Dispatched event
#[derive(Debug, Clone)]
pub struct DomEvent {
    pub event_type: EventType,
    pub target: EventTarget,
}

impl DomEvent {
    pub fn new(event_type: EventType, target: EventTarget) -> Self {
        Self { event_type, target }
    }
}

/// Listener options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Remove after first invocation
    pub once: bool,
}

impl ListenerOptions {
    pub fn once() -> Self {
        Self { once: true }
    }
}

/// Listener callback. Receives the document so it can mutate the tree.
pub type EventCallback = Box<dyn FnMut(&mut Document, &DomEvent)>;

pub(crate) struct Listener {
    pub(crate) options: ListenerOptions,
    pub(crate) callback: EventCallback,
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener").field("options", &self.options).finish_non_exhaustive()
    }
}
