//! Mutation coordinator
//!
//! Watches the body subtree for inserted nodes and routes every new
//! deferrable element through the classifier.

use std::collections::HashSet;
use std::rc::Rc;

use fos_dom::{Document, DomResult, MutationObserverId, MutationObserverInit, MutationRecord, MutationType, NodeId};

use crate::classify::{classify, wants_priority_hint, Disposition};
use crate::intersection::IntersectionCoordinator;
use crate::reveal::reveal;
use crate::script::defer_script;
use crate::Options;

#[derive(Debug)]
pub struct MutationCoordinator {
    observer: MutationObserverId,
    options: Rc<Options>,
    release_detached: bool,
}

impl MutationCoordinator {
    /// Start observing `root` with `{ childList, subtree }`
    pub fn start(
        doc: &mut Document,
        observer: MutationObserverId,
        root: NodeId,
        options: Rc<Options>,
        release_detached: bool,
    ) -> DomResult<Self> {
        doc.observe_mutations(observer, root, MutationObserverInit::child_list_subtree())?;
        Ok(Self {
            observer,
            options,
            release_detached,
        })
    }

    /// Stop observing; records still queued are dropped
    pub fn disconnect(&self, doc: &mut Document) {
        doc.disconnect_mutation_observer(self.observer);
    }

    /// Drain and handle the queued records; returns how many elements were
    /// classified
    pub fn deliver(&self, doc: &mut Document, watcher: &mut IntersectionCoordinator) -> usize {
        if !doc.has_mutation_records(self.observer) {
            return 0;
        }
        let records = doc.take_mutation_records(self.observer);
        self.handle_records(doc, watcher, &records)
    }

    pub fn handle_records(
        &self,
        doc: &mut Document,
        watcher: &mut IntersectionCoordinator,
        records: &[MutationRecord],
    ) -> usize {
        let marker = self.options.marker();
        let mut seen = HashSet::new();

        for record in records.iter().filter(|r| r.mutation_type == MutationType::ChildList) {
            for &added in &record.added_nodes {
                for node in doc.elements_with_attribute(added, &marker) {
                    // A later record may have moved the node out again.
                    if !doc.is_connected(node) || !seen.insert(node) {
                        continue;
                    }
                    self.dispatch(doc, watcher, node);
                }
            }
            if self.release_detached {
                for &removed in &record.removed_nodes {
                    release(doc, watcher, removed);
                }
            }
        }
        seen.len()
    }

    fn dispatch(&self, doc: &mut Document, watcher: &mut IntersectionCoordinator, node: NodeId) {
        let result = match classify(doc, node) {
            Disposition::DeferScript => {
                defer_script(doc, node, &self.options);
                Ok(())
            }
            Disposition::RevealNow => {
                // A watched node moved into view is revealed here, not by its entry
                watcher.unwatch(doc, node);
                reveal_now(doc, node, &self.options)
            }
            Disposition::Watch => watcher.register(doc, node).map(|_| ()),
        };
        if let Err(err) = result {
            tracing::warn!("Could not handle inserted {}: {}", node, err);
        }
    }
}

fn reveal_now(doc: &mut Document, node: NodeId, options: &Options) -> DomResult<()> {
    let hint = wants_priority_hint(doc, node);
    reveal(doc, node, options)?;
    if hint {
        doc.set_attribute(node, "fetchpriority", "high")?;
    }
    Ok(())
}

/// Stop watching a removed node and everything under it, unless it has
/// already been put back
fn release(doc: &mut Document, watcher: &mut IntersectionCoordinator, removed: NodeId) {
    if doc.is_connected(removed) {
        return;
    }
    let mut nodes = vec![removed];
    nodes.extend(doc.tree().descendants(removed));
    for node in nodes {
        watcher.unwatch(doc, node);
    }
}
