//! Example: lazy loading a long page while scrolling
//!
//! Run with `RUST_LOG=fos_lazy=debug` to see every reveal.

use fos_dom::DOMRect;
use fos_html::HtmlParser;
use fos_lazy::{activate, Settings};
use tracing_subscriber::EnvFilter;

const PAGE: &str = r#"
<!DOCTYPE html>
<html>
  <head><title>Gallery</title></head>
  <body>
    <div class="hero" data-lazy="hero.jpg" style="background-image: url(hero-blur.jpg)"></div>
    <img data-lazy="photo-1.jpg" data-lazy-srcset="photo-1.jpg 1x, photo-1@2x.jpg 2x">
    <img data-lazy="photo-2.jpg">
    <img data-lazy="photo-3.jpg">
    <script data-lazy="analytics.js"></script>
  </body>
</html>
"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let parser = HtmlParser::new();
    let mut doc = parser.parse_with_url(PAGE, "https://example.com/gallery")?;

    // Stand-in for layout: one 600px row per marked element
    let marked = doc.elements_with_attribute(doc.body(), "data-lazy");
    for (row, &node) in marked.iter().enumerate() {
        doc.set_layout_rect(node, DOMRect::from_xywh(0.0, row as f64 * 600.0, 800.0, 500.0));
    }

    let mut loader = activate(&mut doc, Settings::default());
    println!("Strategy: {}, watching {}", loader.strategy(), loader.watch_set().len());

    for step in 1..=4 {
        doc.window_mut().scroll_by(0.0, 600.0);
        let delivery = loader.pump(&mut doc);
        println!("Scroll step {step}: {} revealed", delivery.revealed);

        for request in doc.take_resource_requests() {
            println!("  fetch {:?} {} ({})", request.kind, request.url, request.priority.as_str());
            doc.finish_resource(request.target, !request.url.contains('3'));
        }
    }

    let body = doc.body();
    for node in parser.parse_fragment_into(&mut doc, body, r#"<img data-lazy="appended.jpg">"#)? {
        doc.set_layout_rect(node, DOMRect::from_xywh(0.0, 2500.0, 800.0, 500.0));
    }
    let delivery = loader.pump(&mut doc);
    println!("Inserted content: {} classified, {} revealed", delivery.classified, delivery.revealed);

    doc.finish_loading();
    for request in doc.take_resource_requests() {
        println!("  fetch {:?} {} ({})", request.kind, request.url, request.priority.as_str());
    }

    println!("Still waiting: {}", loader.watch_set().len());
    Ok(())
}
