//! Script deferral
//!
//! A script that arrives through markup with only a marker never runs.
//! After the window `load` event the placeholder is swapped for a fresh
//! script element whose insertion makes the engine fetch and execute it.

use std::rc::Rc;

use fos_dom::{Document, DomError, DomEvent, DomResult, EventTarget, EventType, ListenerOptions, NodeId};

use crate::Options;

/// Schedule the replacement of `placeholder` for after window load
pub fn defer_script(doc: &mut Document, placeholder: NodeId, options: &Rc<Options>) {
    let options = Rc::clone(options);
    doc.add_event_listener(
        EventTarget::Window,
        EventType::Load,
        ListenerOptions::once(),
        Box::new(move |doc: &mut Document, _: &DomEvent| {
            if let Err(err) = replace_placeholder(doc, placeholder, &options) {
                tracing::warn!("Skipped deferred script {}: {}", placeholder, err);
            }
        }),
    );
    tracing::trace!("Deferred script {} until window load", placeholder);
}

/// Insert the real script right before the placeholder, then drop the
/// placeholder. Only the marker attribute is carried over.
pub fn replace_placeholder(doc: &mut Document, placeholder: NodeId, options: &Options) -> DomResult<NodeId> {
    let parent = doc
        .tree()
        .parent(placeholder)
        .filter(|_| doc.is_connected(placeholder))
        .ok_or(DomError::Detached(placeholder))?;
    let marker = options.marker();
    let pending = doc.get_attribute(placeholder, &marker).unwrap_or_default().to_string();

    let script = doc.create_element("script");
    doc.set_attribute(script, &marker, &pending)?;
    doc.set_attribute(script, "src", &pending)?;
    doc.insert_before(parent, script, Some(placeholder))?;
    doc.remove_child(parent, placeholder)?;

    tracing::debug!("Replaced script {} with {} -> {}", placeholder, script, pending);
    Ok(script)
}
