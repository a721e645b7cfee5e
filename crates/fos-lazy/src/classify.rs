//! Element classifier
//!
//! Decides how a deferrable element is handled. The decision is pure;
//! the observer strategy acts on it.

use fos_dom::{Document, NodeId};

use crate::viewport::is_in_viewport;

/// Handling strategy for one deferrable element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Placeholder script, replaced after window load
    DeferScript,
    /// Already visible: reveal without watching
    RevealNow,
    /// Off-screen: wait for viewport entry
    Watch,
}

pub fn classify(doc: &Document, node: NodeId) -> Disposition {
    if doc.tag_name(node) == Some("script") {
        Disposition::DeferScript
    } else if is_in_viewport(doc, node) {
        Disposition::RevealNow
    } else {
        Disposition::Watch
    }
}

/// Media elements revealed on the spot get `fetchpriority="high"` unless
/// the author already chose a priority.
pub fn wants_priority_hint(doc: &Document, node: NodeId) -> bool {
    matches!(doc.tag_name(node), Some("img" | "image" | "video"))
        && !doc.has_attribute(node, "fetchpriority")
}
