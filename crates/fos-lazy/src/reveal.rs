//! Reveal operation
//!
//! Moves the pending reference from the marker into the attribute (or
//! inline background) the engine actually fetches, then drops the marker.

use fos_dom::{Document, DomResult, NodeId};

use crate::Options;

/// Reveal `node`. Callers guarantee this runs at most once per element.
pub fn reveal(doc: &mut Document, node: NodeId, options: &Options) -> DomResult<()> {
    let marker = options.marker();
    // A missing marker is not validated; the fetch of "" fails on its own.
    let pending = doc.get_attribute(node, &marker).unwrap_or_default().to_string();

    if has_background_image(doc, node) {
        doc.set_style_property(node, "background-image", &format!("url({pending})"))?;
    } else {
        doc.set_attribute(node, "src", &pending)?;
        let srcset = doc.get_attribute(node, &options.srcset_marker()).map(str::to_string);
        if let Some(srcset) = srcset {
            doc.set_attribute(node, "srcset", &srcset)?;
        }
    }

    doc.remove_attribute(node, &marker)?;
    tracing::debug!("Revealed {} -> {}", node, pending);
    Ok(())
}

fn has_background_image(doc: &Document, node: NodeId) -> bool {
    !doc.style(node).get_property_value("background-image").is_empty()
}
