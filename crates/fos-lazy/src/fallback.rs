//! Fallback path for hosts without the observer primitives

use std::collections::HashSet;

use fos_dom::{Document, IntersectionObserverEntry, MutationRecord, NodeId};

use crate::reveal::reveal;
use crate::strategy::{Delivery, Strategy, StrategyKind};
use crate::Options;

/// Reveals everything once at activation and ignores later deliveries
#[derive(Debug, Default)]
pub struct FallbackStrategy {
    watch_set: HashSet<NodeId>,
}

impl FallbackStrategy {
    /// Reveal every initial element and mark it `loaded` right away
    pub fn run(doc: &mut Document, initial: &[NodeId], options: &Options) -> Self {
        for &node in initial {
            let result = reveal(doc, node, options).and_then(|()| doc.add_class(node, &options.loaded));
            if let Err(err) = result {
                tracing::warn!("Fallback reveal of {} failed: {}", node, err);
            }
        }
        tracing::debug!("Fallback strategy revealed {} elements", initial.len());
        Self::default()
    }
}

impl Strategy for FallbackStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Fallback
    }

    fn pump(&mut self, _doc: &mut Document) -> Delivery {
        Delivery::default()
    }

    fn on_mutations(&mut self, _doc: &mut Document, _records: &[MutationRecord]) -> usize {
        0
    }

    fn on_intersections(&mut self, _doc: &mut Document, _entries: &[IntersectionObserverEntry]) -> usize {
        0
    }

    fn watch_set(&self) -> &HashSet<NodeId> {
        &self.watch_set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fos_dom::DOMRect;

    #[test]
    fn test_reveals_everything_as_loaded() {
        let mut doc = Document::default();
        let body = doc.body();
        let mut nodes = Vec::new();
        for (tag, top) in [("img", 10.0), ("img", 9000.0), ("video", 20000.0)] {
            let node = doc.create_element(tag);
            doc.set_attribute(node, "data-lazy", "x.png").unwrap();
            doc.set_layout_rect(node, DOMRect::from_xywh(0.0, top, 10.0, 10.0));
            doc.append_child(body, node).unwrap();
            nodes.push(node);
        }

        let mut strategy = FallbackStrategy::run(&mut doc, &nodes, &Options::default());

        for &node in &nodes {
            assert_eq!(doc.get_attribute(node, "src"), Some("x.png"));
            assert!(doc.has_class(node, "lazy-loaded"));
            assert!(!doc.has_class(node, "lazy"));
            assert!(!doc.has_class(node, "lazy-loading"));
        }
        assert_eq!(strategy.pump(&mut doc), Delivery::default());
        assert!(strategy.watch_set().is_empty());
    }
}
