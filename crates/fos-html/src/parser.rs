//! HTML5 Parser implementation
//!
//! Uses html5ever's build-in RcDom and converts to our DOM format.
//! This is simpler and more reliable than implementing TreeSink directly.

use fos_dom::{Document, DomTree, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::ParseError;

/// HTML5 parser
#[derive(Debug, Default)]
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, ParseError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, ParseError> {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_rcdom(html)?;
        let mut document = Document::empty(url);
        let tree = document.tree_mut();
        for child in dom.document.children.borrow().iter() {
            convert_node(child, tree, Some(NodeId::ROOT));
        }
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        Ok(document)
    }

    /// Parse `html` as body content and append it to `parent` through the
    /// observed document API, so mutation observers see the insertion.
    /// Returns the inserted top-level nodes.
    pub fn parse_fragment_into(
        &self,
        document: &mut Document,
        parent: NodeId,
        html: &str,
    ) -> Result<Vec<NodeId>, ParseError> {
        let dom = parse_rcdom(html)?;
        let body = find_body(&dom.document).ok_or(ParseError::MissingBody)?;

        let mut top_level = Vec::new();
        for child in body.children.borrow().iter() {
            // Subtrees are built detached; only the final link is observable.
            if let Some(id) = convert_node(child, document.tree_mut(), None) {
                top_level.push(id);
            }
        }
        for &id in &top_level {
            document.append_child(parent, id)?;
        }
        Ok(top_level)
    }
}

fn parse_rcdom(html: &str) -> Result<RcDom, ParseError> {
    let dom = parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())?;
    Ok(dom)
}

fn find_body(handle: &Handle) -> Option<Handle> {
    if let RcNodeData::Element { name, .. } = &handle.data {
        if &*name.local == "body" {
            return Some(handle.clone());
        }
    }
    handle.children.borrow().iter().find_map(find_body)
}

/// Convert an RcDom node (and its subtree) into `tree`, linking it under
/// `parent` when given. Returns the new node, if one was created.
fn convert_node(handle: &Handle, tree: &mut DomTree, parent: Option<NodeId>) -> Option<NodeId> {
    let id = match &handle.data {
        RcNodeData::Document => {
            for child in handle.children.borrow().iter() {
                convert_node(child, tree, parent);
            }
            return None;
        }
        RcNodeData::Doctype { name, .. } => tree.create_doctype(&**name),
        RcNodeData::Text { contents } => {
            let text = contents.borrow().to_string();
            if text.trim().is_empty() {
                return None;
            }
            tree.create_text(&text)
        }
        RcNodeData::Comment { contents } => tree.create_comment(&**contents),
        RcNodeData::Element { name, attrs, .. } => {
            let id = tree.create_element(&*name.local);
            if let Some(element) = tree.get_mut(id).and_then(|n| n.as_element_mut()) {
                for attr in attrs.borrow().iter() {
                    element.set_attr(&*attr.name.local, &*attr.value);
                }
            }
            id
        }
        RcNodeData::ProcessingInstruction { .. } => return None,
    };

    if let Some(parent) = parent {
        if let Err(err) = tree.append_child(parent, id) {
            tracing::warn!("Dropping unlinkable node {}: {}", id, err);
            return None;
        }
    }
    for child in handle.children.borrow().iter() {
        convert_node(child, tree, Some(id));
    }
    Some(id)
}
