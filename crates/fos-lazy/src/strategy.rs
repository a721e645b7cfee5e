//! Coordinator strategies
//!
//! The loader picks one implementation at activation from the host's
//! capabilities and never re-checks them.

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use fos_dom::{Document, IntersectionObserverEntry, MutationRecord, NodeId};

use crate::intersection::{IntersectionCoordinator, WatchOutcome};
use crate::mutation::MutationCoordinator;
use crate::script::defer_script;
use crate::{LazyError, Options};

/// Which coordinator implementation is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Intersection and mutation observers drive reveals
    Observer,
    /// Everything was revealed at activation
    Fallback,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Observer => write!(f, "observer"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// Work done by one delivery
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Inserted deferrable elements routed through the classifier
    pub classified: usize,
    /// Watched elements revealed on viewport entry
    pub revealed: usize,
}

/// Lazy loading coordinator
pub trait Strategy: fmt::Debug {
    fn kind(&self) -> StrategyKind;

    /// Deliver whatever the platform observers have queued
    fn pump(&mut self, doc: &mut Document) -> Delivery;

    /// Deliver an explicit batch of mutation records
    fn on_mutations(&mut self, doc: &mut Document, records: &[MutationRecord]) -> usize;

    /// Deliver an explicit batch of intersection entries
    fn on_intersections(&mut self, doc: &mut Document, entries: &[IntersectionObserverEntry]) -> usize;

    fn watch_set(&self) -> &HashSet<NodeId>;

    /// Stop reacting to the page; nothing already revealed is undone
    fn disconnect(&mut self, _doc: &mut Document) {}
}

/// Observer-driven strategy
#[derive(Debug)]
pub struct ObserverStrategy {
    watcher: IntersectionCoordinator,
    mutations: MutationCoordinator,
}

impl ObserverStrategy {
    /// Register the initial elements and start observing the body
    pub fn start(
        doc: &mut Document,
        initial: &[NodeId],
        options: Rc<Options>,
        release_detached: bool,
    ) -> Result<Self, LazyError> {
        let (Some(io), Some(mo)) = (doc.create_intersection_observer(), doc.create_mutation_observer()) else {
            return Err(LazyError::Unsupported);
        };
        let body = doc.body();
        let mutations = MutationCoordinator::start(doc, mo, body, Rc::clone(&options), release_detached)?;
        let mut watcher = IntersectionCoordinator::new(io, Rc::clone(&options));

        let mut revealed = 0;
        for &node in initial {
            if doc.tag_name(node) == Some("script") {
                defer_script(doc, node, &options);
                continue;
            }
            match watcher.watch(doc, node) {
                Ok(WatchOutcome::Revealed) => revealed += 1,
                Ok(_) => {}
                Err(err) => tracing::warn!("Could not watch {}: {}", node, err),
            }
        }

        tracing::debug!(
            "Observer strategy: {} revealed, {} watched",
            revealed,
            watcher.watch_set().len()
        );
        Ok(Self { watcher, mutations })
    }
}

impl Strategy for ObserverStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Observer
    }

    fn pump(&mut self, doc: &mut Document) -> Delivery {
        // Mutations first, so inserted elements registered this turn are
        // part of the intersection batch.
        let classified = self.mutations.deliver(doc, &mut self.watcher);
        let revealed = self.watcher.deliver(doc);
        Delivery { classified, revealed }
    }

    fn on_mutations(&mut self, doc: &mut Document, records: &[MutationRecord]) -> usize {
        self.mutations.handle_records(doc, &mut self.watcher, records)
    }

    fn on_intersections(&mut self, doc: &mut Document, entries: &[IntersectionObserverEntry]) -> usize {
        self.watcher.handle_entries(doc, entries)
    }

    fn watch_set(&self) -> &HashSet<NodeId> {
        self.watcher.watch_set()
    }

    fn disconnect(&mut self, doc: &mut Document) {
        self.mutations.disconnect(doc);
        self.watcher.disconnect(doc);
    }
}
