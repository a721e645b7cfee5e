//! Activation and the host-facing loader handle

use std::collections::HashSet;
use std::rc::Rc;

use fos_dom::{Document, IntersectionObserverEntry, MutationRecord, NodeId};

use crate::fallback::FallbackStrategy;
use crate::strategy::{Delivery, ObserverStrategy, Strategy, StrategyKind};
use crate::{Options, Settings};

/// Running lazy loader for one document
///
/// Created once by [`activate`]. The host feeds it observer deliveries;
/// resource and window load events reach it through the document's own
/// event dispatch.
#[derive(Debug)]
pub struct LazyLoader {
    options: Rc<Options>,
    strategy: Box<dyn Strategy>,
}

impl LazyLoader {
    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy.kind()
    }

    /// One event-loop turn: pending mutation records, then pending
    /// intersection entries
    pub fn pump(&mut self, doc: &mut Document) -> Delivery {
        self.strategy.pump(doc)
    }

    pub fn on_mutations(&mut self, doc: &mut Document, records: &[MutationRecord]) -> usize {
        self.strategy.on_mutations(doc, records)
    }

    pub fn on_intersections(&mut self, doc: &mut Document, entries: &[IntersectionObserverEntry]) -> usize {
        self.strategy.on_intersections(doc, entries)
    }

    pub fn watch_set(&self) -> &HashSet<NodeId> {
        self.strategy.watch_set()
    }

    pub fn is_watching(&self, node: NodeId) -> bool {
        self.strategy.watch_set().contains(&node)
    }

    /// Stop lazy loading. Watched elements keep their marker and are never
    /// revealed; later deliveries do nothing.
    pub fn disconnect(&mut self, doc: &mut Document) {
        let pending = self.strategy.watch_set().len();
        self.strategy.disconnect(doc);
        tracing::debug!("Lazy loading stopped with {} elements pending", pending);
    }
}

/// Start lazy loading on `doc`.
///
/// Options are resolved and the marked elements queried exactly once. The
/// observer strategy runs when the host has both observer primitives,
/// otherwise everything is revealed on the spot. Call once per document.
pub fn activate(doc: &mut Document, settings: Settings) -> LazyLoader {
    let options = Rc::new(Options::resolve(doc, settings.options));
    let initial = doc.elements_with_attribute(NodeId::ROOT, &options.marker());
    let features = doc.window().features;

    let strategy: Box<dyn Strategy> = if features.intersection_observer && features.mutation_observer {
        match ObserverStrategy::start(doc, &initial, Rc::clone(&options), settings.release_detached) {
            Ok(strategy) => Box::new(strategy),
            Err(err) => {
                tracing::warn!("Observer strategy unavailable: {}", err);
                Box::new(FallbackStrategy::run(doc, &initial, &options))
            }
        }
    } else {
        Box::new(FallbackStrategy::run(doc, &initial, &options))
    };

    tracing::info!(
        "Lazy loading active on {}: {} strategy, {} marked elements",
        doc.url(),
        strategy.kind(),
        initial.len()
    );
    LazyLoader { options, strategy }
}
