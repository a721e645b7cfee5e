//! Edge case and stress tests for fos-html
//!
//! Tests rare HTML scenarios, malformed content, and stress conditions.

use fos_html::{parse, HtmlParser};

// ============================================================================
// EMPTY AND MINIMAL INPUT
// ============================================================================

#[test]
fn test_parse_null_bytes() {
    let doc = parse("Hello\0World").unwrap();
    assert!(doc.tree().len() > 1);
}

#[test]
fn test_parse_only_whitespace() {
    let doc = parse("   \t\n\r\n   ").unwrap();
    assert!(doc.body().is_valid());
    assert_eq!(doc.tree().children(doc.body()).count(), 0);
}

#[test]
fn test_parse_only_doctype() {
    let doc = parse("<!DOCTYPE html>").unwrap();
    assert!(doc.document_element().is_valid());
}

// ============================================================================
// MALFORMED HTML
// ============================================================================

#[test]
fn test_parse_mismatched_tags() {
    let doc = parse(r#"<div><p data-lazy="x.png"></div></p>"#).unwrap();
    assert_eq!(doc.elements_with_attribute(doc.body(), "data-lazy").len(), 1);
}

#[test]
fn test_parse_orphan_closing_tag() {
    let doc = parse("</div>").unwrap();
    assert!(doc.body().is_valid());
}

// ============================================================================
// ATTRIBUTES
// ============================================================================

#[test]
fn test_parse_attribute_empty_value() {
    let doc = parse(r#"<img data-lazy="">"#).unwrap();
    let marked = doc.elements_with_attribute(doc.body(), "data-lazy");
    assert_eq!(marked.len(), 1);
    assert_eq!(doc.get_attribute(marked[0], "data-lazy"), Some(""));
}

#[test]
fn test_parse_attribute_no_value() {
    let doc = parse("<video data-lazy controls></video>").unwrap();
    let video = doc.elements_with_attribute(doc.body(), "data-lazy")[0];
    assert!(doc.has_attribute(video, "controls"));
}

#[test]
fn test_parse_attribute_unquoted() {
    let doc = parse("<img data-lazy=photo.jpg>").unwrap();
    let img = doc.elements_with_attribute(doc.body(), "data-lazy")[0];
    assert_eq!(doc.get_attribute(img, "data-lazy"), Some("photo.jpg"));
}

#[test]
fn test_parse_attribute_entities() {
    let doc = parse(r#"<img data-lazy="a.png?w=1&amp;h=2">"#).unwrap();
    let img = doc.elements_with_attribute(doc.body(), "data-lazy")[0];
    assert_eq!(doc.get_attribute(img, "data-lazy"), Some("a.png?w=1&h=2"));
}

#[test]
fn test_parse_duplicate_attribute_first_wins() {
    let doc = parse(r#"<img data-lazy="first.png" data-lazy="second.png">"#).unwrap();
    let img = doc.elements_with_attribute(doc.body(), "data-lazy")[0];
    assert_eq!(doc.get_attribute(img, "data-lazy"), Some("first.png"));
}

#[test]
fn test_parse_style_with_quoted_url() {
    let doc = parse(r#"<div data-lazy="x.jpg" style="background-image: url('a;b.png'); color: red"></div>"#).unwrap();
    let div = doc.elements_with_attribute(doc.body(), "data-lazy")[0];
    let style = doc.style(div);
    assert_eq!(style.get_property_value("background-image"), "url('a;b.png')");
    assert_eq!(style.get_property_value("color"), "red");
}

// ============================================================================
// UNICODE
// ============================================================================

#[test]
fn test_parse_utf8_marker() {
    let doc = parse(r#"<img data-lazy="bilder/straße-日本.png">"#).unwrap();
    let img = doc.elements_with_attribute(doc.body(), "data-lazy")[0];
    assert_eq!(doc.get_attribute(img, "data-lazy"), Some("bilder/straße-日本.png"));
}

// ============================================================================
// FRAGMENTS
// ============================================================================

#[test]
fn test_empty_fragment_inserts_nothing() {
    let mut doc = parse("").unwrap();
    let body = doc.body();
    let inserted = HtmlParser::new().parse_fragment_into(&mut doc, body, "").unwrap();
    assert!(inserted.is_empty());
}

#[test]
fn test_fragment_text_and_comment() {
    let mut doc = parse("").unwrap();
    let body = doc.body();
    let inserted = HtmlParser::new()
        .parse_fragment_into(&mut doc, body, "text <!-- note --> <b>bold</b>")
        .unwrap();
    assert_eq!(inserted.len(), 3);
    assert_eq!(doc.tag_name(inserted[2]), Some("b"));
}

// ============================================================================
// STRESS TESTS
// ============================================================================

#[test]
fn test_parse_deeply_nested() {
    let mut html = String::new();
    for _ in 0..200 {
        html.push_str("<div>");
    }
    html.push_str(r#"<img data-lazy="deep.png">"#);
    for _ in 0..200 {
        html.push_str("</div>");
    }

    let doc = parse(&html).unwrap();
    assert_eq!(doc.elements_with_attribute(doc.body(), "data-lazy").len(), 1);
}

#[test]
fn test_parse_very_long_attribute() {
    let long = "a".repeat(100_000);
    let doc = parse(&format!(r#"<img data-lazy="{long}.png">"#)).unwrap();
    let img = doc.elements_with_attribute(doc.body(), "data-lazy")[0];
    assert_eq!(doc.get_attribute(img, "data-lazy").map(str::len), Some(100_004));
}
