//! Edge case tests for fos-lazy
//!
//! Configuration overrides, detached and re-inserted elements, duplicate
//! deliveries and hosts with unusual viewports.

use fos_dom::{DOMRect, Document, IntersectionObserverEntry, MutationRecord, NodeId};
use fos_html::{parse, HtmlParser};
use fos_lazy::{activate, Options, Settings, StrategyKind, OPTIONS_GLOBAL};

fn place(doc: &mut Document, node: NodeId, top: f64) {
    doc.set_layout_rect(node, DOMRect::from_xywh(0.0, top, 100.0, 100.0));
}

fn first_marked(doc: &Document, marker: &str) -> NodeId {
    doc.elements_with_attribute(doc.body(), marker)[0]
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[test]
fn test_window_global_override() {
    let mut doc = parse(r#"<img data-src="a.png"><img data-lazy="ignored.png">"#).unwrap();
    doc.window_mut().set_global(
        OPTIONS_GLOBAL,
        r#"{"loading":"is-loading","failed":"is-broken","on":"is-visible","loaded":"is-ready","attribute":"src"}"#,
    );
    let img = first_marked(&doc, "data-src");
    place(&mut doc, img, 0.0);

    let loader = activate(&mut doc, Settings::default());

    assert_eq!(loader.options().attribute, "src");
    assert_eq!(doc.get_attribute(img, "src"), Some("a.png"));
    assert!(doc.has_class(img, "is-visible"));
    assert!(doc.has_class(img, "is-loading"));

    doc.finish_resource(img, true);
    assert!(doc.has_class(img, "is-ready"));
    assert!(!doc.has_class(img, "is-loading"));

    let untouched = first_marked(&doc, "data-lazy");
    assert!(!doc.has_attribute(untouched, "src"));
}

#[test]
fn test_partial_global_override_uses_defaults() {
    let mut doc = parse(r#"<img data-lazy="a.png">"#).unwrap();
    doc.window_mut().set_global(OPTIONS_GLOBAL, r#"{"loading":"only-this"}"#);
    let img = first_marked(&doc, "data-lazy");
    place(&mut doc, img, 0.0);

    let loader = activate(&mut doc, Settings::default());

    assert_eq!(loader.options(), &Options::default());
    assert!(doc.has_class(img, "lazy-loading"));
    assert!(!doc.has_class(img, "only-this"));
}

#[test]
fn test_settings_override_beats_global() {
    let mut doc = parse(r#"<img data-defer="a.png">"#).unwrap();
    doc.window_mut().set_global(OPTIONS_GLOBAL, "not json");
    let options = Options {
        attribute: "defer".to_string(),
        ..Options::default()
    };

    let loader = activate(&mut doc, Settings::with_options(options));

    let revealed = doc.elements_with_attribute(doc.body(), "src");
    assert!(revealed.is_empty(), "element has no layout box and must wait");
    assert_eq!(loader.watch_set().len(), 1);
}

// ============================================================================
// DETACHED ELEMENTS
// ============================================================================

#[test]
fn test_removed_element_stays_watched_by_default() {
    let mut doc = parse(r#"<img data-lazy="a.png">"#).unwrap();
    let img = first_marked(&doc, "data-lazy");
    place(&mut doc, img, 3000.0);
    let mut loader = activate(&mut doc, Settings::default());

    doc.remove(img).unwrap();
    loader.pump(&mut doc);

    assert!(loader.is_watching(img));
}

#[test]
fn test_release_detached_clears_subtree() {
    let mut doc = parse(r#"<section><img data-lazy="a.png"><img data-lazy="b.png"></section>"#).unwrap();
    let images = doc.elements_with_attribute(doc.body(), "data-lazy");
    for &img in &images {
        place(&mut doc, img, 3000.0);
    }
    let settings = Settings {
        release_detached: true,
        ..Settings::default()
    };
    let mut loader = activate(&mut doc, settings);
    assert_eq!(loader.watch_set().len(), 2);

    let section = doc.tree().parent(images[0]).unwrap();
    doc.remove(section).unwrap();
    loader.pump(&mut doc);

    assert!(loader.watch_set().is_empty());
}

#[test]
fn test_moved_element_is_not_released() {
    let mut doc = parse(r#"<div id="a"></div><div id="b"><img data-lazy="a.png"></div>"#).unwrap();
    let img = first_marked(&doc, "data-lazy");
    place(&mut doc, img, 3000.0);
    let settings = Settings {
        release_detached: true,
        ..Settings::default()
    };
    let mut loader = activate(&mut doc, settings);

    let target = doc.elements_with_attribute(doc.body(), "id")[0];
    doc.append_child(target, img).unwrap();
    loader.pump(&mut doc);

    assert!(loader.is_watching(img));
}

// ============================================================================
// REINSERTION
// ============================================================================

fn fetched_urls(doc: &mut Document) -> Vec<String> {
    doc.take_resource_requests().into_iter().map(|request| request.url).collect()
}

#[test]
fn test_watched_element_moved_on_screen_reveals_once() {
    let mut doc = parse(r#"<img data-lazy="a.png">"#).unwrap();
    let img = first_marked(&doc, "data-lazy");
    place(&mut doc, img, 5000.0);
    let mut loader = activate(&mut doc, Settings::default());
    assert!(loader.is_watching(img));

    let wrapper = doc.create_element("div");
    let body = doc.body();
    doc.append_child(body, wrapper).unwrap();
    doc.append_child(wrapper, img).unwrap();
    place(&mut doc, img, 10.0);

    let delivery = loader.pump(&mut doc);

    assert_eq!(delivery.classified, 1);
    assert_eq!(delivery.revealed, 0);
    assert_eq!(doc.get_attribute(img, "src"), Some("a.png"));
    assert_eq!(doc.get_attribute(img, "fetchpriority"), Some("high"));
    assert!(!loader.is_watching(img));
    assert_eq!(fetched_urls(&mut doc), vec!["a.png".to_string()]);

    assert_eq!(loader.pump(&mut doc).revealed, 0);
    assert_eq!(doc.get_attribute(img, "src"), Some("a.png"));
}

#[test]
fn test_watched_element_moved_off_screen_stays_watched() {
    let mut doc = parse(r#"<img data-lazy="a.png">"#).unwrap();
    let img = first_marked(&doc, "data-lazy");
    place(&mut doc, img, 5000.0);
    let mut loader = activate(&mut doc, Settings::default());

    let wrapper = doc.create_element("div");
    let body = doc.body();
    doc.append_child(body, wrapper).unwrap();
    doc.append_child(wrapper, img).unwrap();
    place(&mut doc, img, 6000.0);

    let delivery = loader.pump(&mut doc);
    assert_eq!(delivery.revealed, 0);
    assert!(loader.is_watching(img));
    assert_eq!(loader.watch_set().len(), 1);
    assert!(!doc.has_attribute(img, "src"));

    doc.window_mut().scroll_to(0.0, 5800.0);
    assert_eq!(loader.pump(&mut doc).revealed, 1);
    assert_eq!(doc.get_attribute(img, "src"), Some("a.png"));
    assert!(loader.watch_set().is_empty());
    assert_eq!(fetched_urls(&mut doc), vec!["a.png".to_string()]);
}

#[test]
fn test_entry_for_element_revealed_elsewhere_is_dropped() {
    let mut doc = parse(r#"<img data-lazy="a.png">"#).unwrap();
    let img = first_marked(&doc, "data-lazy");
    place(&mut doc, img, 5000.0);
    let mut loader = activate(&mut doc, Settings::default());

    // The page swapped the source in itself
    doc.remove_attribute(img, "data-lazy").unwrap();
    doc.set_attribute(img, "src", "manual.png").unwrap();

    let entry = IntersectionObserverEntry::compute(
        img,
        DOMRect::from_xywh(0.0, 100.0, 100.0, 100.0),
        DOMRect::from_xywh(0.0, 0.0, 800.0, 600.0),
    );
    assert_eq!(loader.on_intersections(&mut doc, &[entry]), 0);
    assert_eq!(doc.get_attribute(img, "src"), Some("manual.png"));
    assert!(!doc.has_class(img, "lazy"));
    assert!(!loader.is_watching(img));
}

// ============================================================================
// DELIVERY ORDERING
// ============================================================================

#[test]
fn test_duplicate_entries_reveal_once() {
    let mut doc = parse(r#"<img data-lazy="a.png">"#).unwrap();
    let img = first_marked(&doc, "data-lazy");
    place(&mut doc, img, 3000.0);
    let mut loader = activate(&mut doc, Settings::default());

    let entry = IntersectionObserverEntry::compute(
        img,
        DOMRect::from_xywh(0.0, 100.0, 100.0, 100.0),
        doc.viewport_rect(),
    );
    assert_eq!(loader.on_intersections(&mut doc, &[entry.clone(), entry.clone()]), 1);
    assert_eq!(loader.on_intersections(&mut doc, &[entry]), 0);

    let requests = doc.take_resource_requests();
    assert_eq!(requests.len(), 1);
}

#[test]
fn test_non_intersecting_entry_ignored() {
    let mut doc = parse(r#"<img data-lazy="a.png">"#).unwrap();
    let img = first_marked(&doc, "data-lazy");
    place(&mut doc, img, 3000.0);
    let mut loader = activate(&mut doc, Settings::default());

    let entry = IntersectionObserverEntry::compute(
        img,
        DOMRect::from_xywh(0.0, 3000.0, 100.0, 100.0),
        doc.viewport_rect(),
    );
    assert_eq!(loader.on_intersections(&mut doc, &[entry]), 0);
    assert!(loader.is_watching(img));
}

#[test]
fn test_explicit_mutation_batch() {
    let mut doc = parse("").unwrap();
    let mut loader = activate(&mut doc, Settings::default());

    let img = doc.create_element("img");
    doc.set_attribute(img, "data-lazy", "x.png").unwrap();
    let body = doc.body();
    doc.append_child(body, img).unwrap();
    place(&mut doc, img, 0.0);

    // Same record delivered twice
    let record = MutationRecord::child_list(body, vec![img], Vec::new());
    assert_eq!(loader.on_mutations(&mut doc, &[record.clone(), record]), 1);
    assert_eq!(doc.get_attribute(img, "src"), Some("x.png"));
}

#[test]
fn test_inserted_subtree_classifies_each_element() {
    let mut doc = parse("").unwrap();
    let mut loader = activate(&mut doc, Settings::default());
    let body = doc.body();

    let inserted = HtmlParser::new()
        .parse_fragment_into(
            &mut doc,
            body,
            r#"<article><img data-lazy="top.png"><p><img data-lazy="low.png"></p><script data-lazy="w.js"></script></article>"#,
        )
        .unwrap();
    let images = doc.elements_with_attribute(inserted[0], "data-lazy");
    place(&mut doc, images[0], 0.0);
    place(&mut doc, images[1], 4000.0);

    let delivery = loader.pump(&mut doc);

    assert_eq!(delivery.classified, 3);
    assert_eq!(doc.get_attribute(images[0], "src"), Some("top.png"));
    assert!(loader.is_watching(images[1]));
    assert!(!doc.has_attribute(images[2], "src"));
}

// ============================================================================
// VIEWPORT
// ============================================================================

#[test]
fn test_missing_inner_size_uses_client_size() {
    let mut doc = parse(r#"<img data-lazy="wide.png">"#).unwrap();
    let img = first_marked(&doc, "data-lazy");
    doc.set_layout_rect(img, DOMRect::from_xywh(1000.0, 0.0, 100.0, 100.0));
    doc.window_mut().inner_width = None;
    doc.window_mut().inner_height = None;
    doc.set_client_size(1280.0, 720.0);

    let loader = activate(&mut doc, Settings::default());

    assert_eq!(loader.strategy(), StrategyKind::Observer);
    assert_eq!(doc.get_attribute(img, "src"), Some("wide.png"));
}

#[test]
fn test_element_without_layout_is_watched() {
    let mut doc = parse(r#"<img data-lazy="hidden.png">"#).unwrap();
    let img = first_marked(&doc, "data-lazy");

    let loader = activate(&mut doc, Settings::default());

    assert!(loader.is_watching(img));
    assert!(!doc.has_attribute(img, "src"));
}
