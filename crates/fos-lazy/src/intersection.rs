//! Intersection coordinator
//!
//! Owns the watch set: the elements registered with the platform's
//! intersection observer and still waiting for viewport entry.
//!
//! Per element: Watching -> (entry) -> Revealing -> waiting for the load
//! result -> `loaded` | `failed`. The last two are only visible as classes;
//! the coordinator forgets the element once it is revealed.

use std::collections::HashSet;
use std::rc::Rc;

use fos_dom::{
    Document, DomEvent, DomResult, EventTarget, EventType, IntersectionObserverEntry,
    IntersectionObserverId, ListenerOptions, NodeId,
};

use crate::reveal::reveal;
use crate::viewport::is_in_viewport;
use crate::Options;

/// Result of a startup registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    /// Already visible; revealed without entering the watch set
    Revealed,
    /// Added to the watch set
    Watching,
    /// Was already in the watch set
    AlreadyWatching,
}

#[derive(Debug)]
pub struct IntersectionCoordinator {
    observer: IntersectionObserverId,
    watch_set: HashSet<NodeId>,
    options: Rc<Options>,
}

impl IntersectionCoordinator {
    pub fn new(observer: IntersectionObserverId, options: Rc<Options>) -> Self {
        Self {
            observer,
            watch_set: HashSet::new(),
            options,
        }
    }

    pub fn watch_set(&self) -> &HashSet<NodeId> {
        &self.watch_set
    }

    pub fn is_watching(&self, node: NodeId) -> bool {
        self.watch_set.contains(&node)
    }

    /// Startup registration: elements that already overlap the viewport go
    /// through the entry transition at once, the rest are watched.
    pub fn watch(&mut self, doc: &mut Document, node: NodeId) -> DomResult<WatchOutcome> {
        if self.watch_set.contains(&node) {
            return Ok(WatchOutcome::AlreadyWatching);
        }
        if is_in_viewport(doc, node) {
            enter(doc, node, &self.options)?;
            return Ok(WatchOutcome::Revealed);
        }
        self.register(doc, node)
    }

    /// Add `node` to the watch set without looking at its geometry
    pub fn register(&mut self, doc: &mut Document, node: NodeId) -> DomResult<WatchOutcome> {
        if !self.watch_set.insert(node) {
            return Ok(WatchOutcome::AlreadyWatching);
        }
        if let Err(err) = doc.observe_intersection(self.observer, node) {
            self.watch_set.remove(&node);
            return Err(err);
        }
        tracing::trace!("Watching {}", node);
        Ok(WatchOutcome::Watching)
    }

    /// Drop `node` from the watch set without revealing it
    pub fn unwatch(&mut self, doc: &mut Document, node: NodeId) -> bool {
        if !self.watch_set.remove(&node) {
            return false;
        }
        doc.unobserve_intersection(self.observer, node);
        tracing::trace!("Released {}", node);
        true
    }

    /// Stop observing everything; pending elements stay unrevealed
    pub fn disconnect(&mut self, doc: &mut Document) {
        doc.disconnect_intersection_observer(self.observer);
        self.watch_set.clear();
    }

    /// Pull the pending batch from the platform observer and handle it
    pub fn deliver(&mut self, doc: &mut Document) -> usize {
        let entries = doc.take_intersection_entries(self.observer);
        self.handle_entries(doc, &entries)
    }

    /// Handle one batch of entries; returns how many elements were revealed.
    /// Entries are independent, so batch order does not matter.
    pub fn handle_entries(&mut self, doc: &mut Document, entries: &[IntersectionObserverEntry]) -> usize {
        let marker = self.options.marker();
        let mut revealed = 0;
        for entry in entries {
            if !entry.is_intersecting || !self.watch_set.contains(&entry.target) {
                continue;
            }
            if !doc.has_attribute(entry.target, &marker) {
                // Revealed through another path since it was registered
                self.unwatch(doc, entry.target);
                continue;
            }
            if let Err(err) = enter(doc, entry.target, &self.options) {
                tracing::warn!("Reveal of {} failed: {}", entry.target, err);
            }
            // Leaving the watch set is terminal whatever the reveal did.
            self.unwatch(doc, entry.target);
            revealed += 1;
        }
        revealed
    }
}

/// Viewport entry transition for one element
fn enter(doc: &mut Document, node: NodeId, options: &Rc<Options>) -> DomResult<()> {
    doc.add_class(node, &options.on)?;

    let on_load = Rc::clone(options);
    doc.add_event_listener(
        EventTarget::Node(node),
        EventType::Load,
        ListenerOptions::once(),
        Box::new(move |doc: &mut Document, _: &DomEvent| {
            if let Err(err) = mark_loaded(doc, node, &on_load) {
                tracing::warn!("Could not mark {} loaded: {}", node, err);
            }
        }),
    );

    let on_error = Rc::clone(options);
    doc.add_event_listener(
        EventTarget::Node(node),
        EventType::Error,
        ListenerOptions::once(),
        Box::new(move |doc: &mut Document, _: &DomEvent| {
            tracing::debug!("Lazy resource for {} failed", node);
            if let Err(err) = doc.add_class(node, &on_error.failed) {
                tracing::warn!("Could not mark {} failed: {}", node, err);
            }
        }),
    );

    doc.add_class(node, &options.loading)?;
    reveal(doc, node, options)
}

fn mark_loaded(doc: &mut Document, node: NodeId, options: &Options) -> DomResult<()> {
    doc.add_class(node, &options.loaded)?;
    doc.remove_class(node, &options.loading)
}
