//! Implicit resource fetches
//!
//! Assigning `src` to media, inserting a script with `src`, or setting an
//! inline `background-image` makes the engine fetch something. The document
//! queues those requests; the network layer drains them and reports back
//! through load/error events.

use crate::NodeId;

/// What kind of fetch an element triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Image,
    Media,
    Script,
    Background,
}

impl ResourceKind {
    /// Kind of fetch a `src` assignment on `tag` triggers, if any.
    /// Scripts are excluded: they fetch on insertion, not on assignment.
    pub fn for_src(tag: &str) -> Option<Self> {
        match tag {
            "img" | "image" | "iframe" => Some(Self::Image),
            "video" | "audio" | "source" | "track" => Some(Self::Media),
            _ => None,
        }
    }
}

/// `fetchpriority` hint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchPriority {
    High,
    Low,
    #[default]
    Auto,
}

impl FetchPriority {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Self::High,
            "low" => Self::Low,
            _ => Self::Auto,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Low => "low",
            Self::Auto => "auto",
        }
    }
}

/// A fetch waiting for the network layer
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRequest {
    pub target: NodeId,
    pub url: String,
    pub kind: ResourceKind,
    /// Resolved when the queue is drained, so hints set right after the
    /// triggering assignment still apply
    pub priority: FetchPriority,
}
