//! fOS DOM - Document Object Model
//!
//! Arena DOM tree plus the platform surface scripts and engine services
//! talk to: attributes, class lists, inline style, geometry, observers,
//! events and the implicit resource fetch queue.

mod attributes;
mod classlist;
mod document;
mod events;
mod geometry;
mod node;
mod observer;
mod operations;
mod resource;
mod style;
mod tree;

pub use attributes::{Attr, NamedNodeMap};
pub use classlist::DOMTokenList;
pub use document::{Document, ReadyState};
pub use events::{DomEvent, EventCallback, EventTarget, EventType, ListenerOptions};
pub use geometry::{DOMRect, PlatformFeatures, Window};
pub use node::{ElementData, Node, NodeData};
pub use observer::{
    IntersectionObserverEntry, IntersectionObserverId, MutationObserverId, MutationObserverInit,
    MutationRecord, MutationType,
};
pub use operations::{DomError, DomResult};
pub use resource::{FetchPriority, ResourceKind, ResourceRequest};
pub use style::CssStyleDeclaration;
pub use tree::DomTree;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Raw arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
