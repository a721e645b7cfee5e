//! Viewport predicate

use fos_dom::{Document, NodeId};

/// Viewport width and height. The window's inner size wins; when the host
/// reports none (or zero) the document element's client size is used.
pub fn viewport_size(doc: &Document) -> (f64, f64) {
    let window = doc.window();
    let width = window.inner_width.filter(|w| *w > 0.0).unwrap_or_else(|| doc.client_width());
    let height = window.inner_height.filter(|h| *h > 0.0).unwrap_or_else(|| doc.client_height());
    (width, height)
}

/// True if any part of the element's box overlaps the viewport
pub fn is_in_viewport(doc: &Document, node: NodeId) -> bool {
    let rect = doc.bounding_client_rect(node);
    let (width, height) = viewport_size(doc);
    rect.bottom() > 0.0 && rect.right() > 0.0 && rect.left() < width && rect.top() < height
}

#[cfg(test)]
mod tests {
    use super::*;
    use fos_dom::DOMRect;

    fn doc_with(rect: DOMRect) -> (Document, NodeId) {
        let mut doc = Document::default();
        let img = doc.create_element("img");
        let body = doc.body();
        doc.append_child(body, img).unwrap();
        doc.set_layout_rect(img, rect);
        (doc, img)
    }

    #[test]
    fn test_partial_overlap_counts() {
        let (doc, img) = doc_with(DOMRect::from_xywh(-50.0, 590.0, 100.0, 100.0));
        assert!(is_in_viewport(&doc, img));
    }

    #[test]
    fn test_edges_are_exclusive() {
        let (doc, below) = doc_with(DOMRect::from_xywh(0.0, 600.0, 100.0, 100.0));
        assert!(!is_in_viewport(&doc, below));

        let (doc, above) = doc_with(DOMRect::from_xywh(0.0, -100.0, 100.0, 100.0));
        assert!(!is_in_viewport(&doc, above));
    }

    #[test]
    fn test_no_layout_box_is_not_visible() {
        let mut doc = Document::default();
        let img = doc.create_element("img");
        assert!(!is_in_viewport(&doc, img));
    }

    #[test]
    fn test_scroll_moves_element_into_view() {
        let (mut doc, img) = doc_with(DOMRect::from_xywh(0.0, 5000.0, 100.0, 100.0));
        assert!(!is_in_viewport(&doc, img));
        doc.window_mut().scroll_to(0.0, 4500.0);
        assert!(is_in_viewport(&doc, img));
    }

    #[test]
    fn test_client_size_fallback() {
        let (mut doc, img) = doc_with(DOMRect::from_xywh(900.0, 10.0, 50.0, 50.0));
        assert!(!is_in_viewport(&doc, img));

        doc.window_mut().inner_width = Some(0.0);
        doc.window_mut().inner_height = None;
        doc.set_client_size(1200.0, 900.0);
        assert_eq!(viewport_size(&doc), (1200.0, 900.0));
        assert!(is_in_viewport(&doc, img));
    }
}
