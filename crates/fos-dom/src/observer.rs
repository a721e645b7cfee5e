//! DOM Observers
//!
//! MutationObserver and IntersectionObserver. The document owns the
//! observers, feeds them as the tree and geometry change, and hands the
//! queued records out in batches.

use std::collections::HashMap;

use crate::{DOMRect, DomTree, NodeId};

/// Handle to a registered mutation observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MutationObserverId(pub(crate) usize);

/// Handle to a registered intersection observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntersectionObserverId(pub(crate) usize);

/// Mutation observer
#[derive(Debug, Default)]
pub(crate) struct MutationObserver {
    observed: Vec<(NodeId, MutationObserverInit)>,
    records: Vec<MutationRecord>,
}

/// Mutation observer options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationObserverInit {
    pub child_list: bool,
    pub attributes: bool,
    pub subtree: bool,
}

impl MutationObserverInit {
    /// `{ childList: true, subtree: true }`
    pub fn child_list_subtree() -> Self {
        Self {
            child_list: true,
            subtree: true,
            ..Self::default()
        }
    }
}

/// Mutation record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub mutation_type: MutationType,
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
    pub previous_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    pub attribute_name: Option<String>,
}

impl MutationRecord {
    pub fn child_list(target: NodeId, added_nodes: Vec<NodeId>, removed_nodes: Vec<NodeId>) -> Self {
        Self {
            mutation_type: MutationType::ChildList,
            target,
            added_nodes,
            removed_nodes,
            previous_sibling: None,
            next_sibling: None,
            attribute_name: None,
        }
    }

    pub fn attribute(target: NodeId, name: &str) -> Self {
        Self {
            mutation_type: MutationType::Attributes,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            previous_sibling: None,
            next_sibling: None,
            attribute_name: Some(name.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationType {
    Attributes,
    ChildList,
}

impl MutationObserver {
    pub(crate) fn observe(&mut self, target: NodeId, options: MutationObserverInit) {
        match self.observed.iter_mut().find(|(t, _)| *t == target) {
            Some(slot) => slot.1 = options,
            None => self.observed.push((target, options)),
        }
    }

    pub(crate) fn disconnect(&mut self) {
        self.observed.clear();
        self.records.clear();
    }

    pub(crate) fn take_records(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.records)
    }

    pub(crate) fn has_records(&self) -> bool {
        !self.records.is_empty()
    }

    /// Queue `record` if any registration covers its target
    pub(crate) fn notify(&mut self, tree: &DomTree, record: &MutationRecord) {
        let wanted = self.observed.iter().any(|(observed, init)| {
            let kind = match record.mutation_type {
                MutationType::ChildList => init.child_list,
                MutationType::Attributes => init.attributes,
            };
            kind && (*observed == record.target
                || (init.subtree && tree.is_inclusive_ancestor(*observed, record.target)))
        });
        if wanted {
            self.records.push(record.clone());
        }
    }
}

/// Intersection observer rooted at the viewport
#[derive(Debug, Default)]
pub(crate) struct IntersectionObserver {
    observed: Vec<NodeId>,
    /// Last delivered state per target; absent until the first delivery
    last_state: HashMap<NodeId, bool>,
}

/// Intersection observer entry
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionObserverEntry {
    pub target: NodeId,
    pub bounding_client_rect: DOMRect,
    pub intersection_rect: DOMRect,
    pub root_bounds: DOMRect,
    pub is_intersecting: bool,
    pub intersection_ratio: f64,
}

impl IntersectionObserverEntry {
    /// Compute an entry for `rect` against `root`
    pub fn compute(target: NodeId, rect: DOMRect, root: DOMRect) -> Self {
        let intersection = rect.intersection(&root);
        let area = rect.area();
        let intersection_ratio = match intersection {
            Some(i) if area > 0.0 => i.area() / area,
            Some(_) => 1.0,
            None => 0.0,
        };
        Self {
            target,
            bounding_client_rect: rect,
            intersection_rect: intersection.unwrap_or_default(),
            root_bounds: root,
            is_intersecting: intersection.is_some(),
            intersection_ratio,
        }
    }
}

impl IntersectionObserver {
    pub(crate) fn observe(&mut self, target: NodeId) {
        if !self.observed.contains(&target) {
            self.observed.push(target);
        }
    }

    pub(crate) fn unobserve(&mut self, target: NodeId) {
        self.observed.retain(|&id| id != target);
        self.last_state.remove(&target);
    }

    pub(crate) fn disconnect(&mut self) {
        self.observed.clear();
        self.last_state.clear();
    }

    pub(crate) fn targets(&self) -> &[NodeId] {
        &self.observed
    }

    /// Entries for every target whose intersecting state changed since the
    /// last delivery. A newly observed target always gets one entry.
    pub(crate) fn update(
        &mut self,
        rects: &[(NodeId, DOMRect)],
        root: DOMRect,
    ) -> Vec<IntersectionObserverEntry> {
        let mut entries = Vec::new();
        for &(target, rect) in rects {
            let entry = IntersectionObserverEntry::compute(target, rect, root);
            let previous = self.last_state.insert(target, entry.is_intersecting);
            if previous != Some(entry.is_intersecting) {
                entries.push(entry);
            }
        }
        entries
    }
}
