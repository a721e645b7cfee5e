//! Document - High-level document API
//!
//! Every script-visible tree or attribute change goes through `Document`
//! so observers, listeners and the fetch queue see it. `tree_mut` is the
//! raw escape hatch used by the parser before any observer exists.

use std::collections::{HashMap, HashSet};

use crate::events::Listener;
use crate::observer::{IntersectionObserver, MutationObserver};
use crate::{
    CssStyleDeclaration, DOMRect, DOMTokenList, DomError, DomEvent, DomResult, DomTree,
    ElementData, EventCallback, EventTarget, EventType, FetchPriority, IntersectionObserverEntry,
    IntersectionObserverId, ListenerOptions, MutationObserverId, MutationObserverInit,
    MutationRecord, NodeId, ResourceKind, ResourceRequest, Window,
};

const DEFAULT_VIEWPORT: (f64, f64) = (800.0, 600.0);

/// Document loading state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadyState {
    #[default]
    Loading,
    Interactive,
    Complete,
}

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    tree: DomTree,
    /// Document URL
    url: String,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
    window: Window,
    ready_state: ReadyState,
    /// Layout boxes in page coordinates, written by layout
    layout: HashMap<NodeId, DOMRect>,
    /// `documentElement.clientWidth/clientHeight`
    client_size: (f64, f64),
    listeners: HashMap<(EventTarget, EventType), Vec<Listener>>,
    mutation_observers: Vec<MutationObserver>,
    intersection_observers: Vec<IntersectionObserver>,
    resources: Vec<ResourceRequest>,
    started_scripts: HashSet<NodeId>,
}

impl Document {
    /// Create a document with the html/head/body skeleton
    pub fn new(url: &str) -> Self {
        let mut doc = Self::empty(url);
        let html = doc.tree.create_element("html");
        let head = doc.tree.create_element("head");
        let body = doc.tree.create_element("body");
        // Fresh nodes under a fresh root cannot fail to link.
        let _ = doc.tree.append_child(NodeId::ROOT, html);
        let _ = doc.tree.append_child(html, head);
        let _ = doc.tree.append_child(html, body);
        doc.finalize();
        doc
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            window: Window::new(DEFAULT_VIEWPORT.0, DEFAULT_VIEWPORT.1),
            ready_state: ReadyState::Loading,
            layout: HashMap::new(),
            client_size: DEFAULT_VIEWPORT,
            listeners: HashMap::new(),
            mutation_observers: Vec::new(),
            intersection_observers: Vec::new(),
            resources: Vec::new(),
            started_scripts: HashSet::new(),
        }
    }

    /// Locate html/head/body after the tree was built through `tree_mut`
    pub fn finalize(&mut self) {
        self.html_element = self.child_element(NodeId::ROOT, "html").unwrap_or(NodeId::NONE);
        if self.html_element.is_valid() {
            self.head_element = self.child_element(self.html_element, "head").unwrap_or(NodeId::NONE);
            self.body_element = self.child_element(self.html_element, "body").unwrap_or(NodeId::NONE);
        }
    }

    fn child_element(&self, parent: NodeId, tag: &str) -> Option<NodeId> {
        self.tree
            .children(parent)
            .find(|(_, node)| node.as_element().is_some_and(|e| e.is(tag)))
            .map(|(id, _)| id)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Raw tree access; bypasses observers and the fetch queue
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut Window {
        &mut self.window
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    // ------------------------------------------------------------------
    // Tree mutation
    // ------------------------------------------------------------------

    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.tree.create_element(name)
    }

    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.tree.create_text(content)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<NodeId> {
        if self.tree.get(parent).is_none() {
            return Err(DomError::NotFound(parent));
        }
        if self.tree.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest);
        }
        let reference = if reference == Some(child) {
            self.tree.next_sibling(child)
        } else {
            reference
        };
        if let Some(reference) = reference {
            if self.tree.parent(reference) != Some(parent) {
                return Err(DomError::NotAChild(reference));
            }
        }
        if let Some(old_parent) = self.tree.parent(child) {
            self.remove_child(old_parent, child)?;
        }
        self.tree.insert_before(parent, child, reference)?;

        let mut record = MutationRecord::child_list(parent, vec![child], Vec::new());
        record.previous_sibling = self.tree.prev_sibling(child);
        record.next_sibling = self.tree.next_sibling(child);
        self.queue_mutation(record);

        if self.is_connected(child) {
            self.start_inserted_scripts(child);
        }
        Ok(child)
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        let previous_sibling = self.tree.prev_sibling(child);
        let next_sibling = self.tree.next_sibling(child);
        self.tree.remove_child(parent, child)?;

        let mut record = MutationRecord::child_list(parent, Vec::new(), vec![child]);
        record.previous_sibling = previous_sibling;
        record.next_sibling = next_sibling;
        self.queue_mutation(record);
        Ok(child)
    }

    /// `node.remove()`
    pub fn remove(&mut self, node: NodeId) -> DomResult<NodeId> {
        let parent = self.tree.parent(node).ok_or(DomError::Detached(node))?;
        self.remove_child(parent, node)
    }

    pub fn is_connected(&self, node: NodeId) -> bool {
        self.tree.is_inclusive_ancestor(NodeId::ROOT, node)
    }

    fn queue_mutation(&mut self, record: MutationRecord) {
        for observer in &mut self.mutation_observers {
            observer.notify(&self.tree, &record);
        }
    }

    /// Scripts fetch when they first become connected with a `src`
    fn start_inserted_scripts(&mut self, root: NodeId) {
        let mut candidates = vec![root];
        candidates.extend(self.tree.descendants(root));
        for node in candidates {
            let Some(src) = self
                .element(node)
                .filter(|e| e.is("script"))
                .and_then(|e| e.get_attr("src"))
                .map(str::to_string)
            else {
                continue;
            };
            if self.started_scripts.insert(node) {
                self.queue_fetch(node, src, ResourceKind::Script);
            }
        }
    }

    // ------------------------------------------------------------------
    // Elements and attributes
    // ------------------------------------------------------------------

    pub fn element(&self, node: NodeId) -> Option<&ElementData> {
        self.tree.get(node).and_then(|n| n.as_element())
    }

    fn element_mut(&mut self, node: NodeId) -> DomResult<&mut ElementData> {
        self.tree
            .get_mut(node)
            .ok_or(DomError::NotFound(node))?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(node))
    }

    /// Lowercased tag name
    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.name.as_str())
    }

    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).and_then(|e| e.get_attr(name))
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.get_attribute(node, name).is_some()
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> DomResult<()> {
        let element = self.element_mut(node)?;
        element.set_attr(name, value);
        let fetch = if name.eq_ignore_ascii_case("src") {
            ResourceKind::for_src(&element.name)
        } else {
            None
        };
        self.queue_mutation(MutationRecord::attribute(node, name));
        if let Some(kind) = fetch {
            self.queue_fetch(node, value.to_string(), kind);
        }
        Ok(())
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> DomResult<Option<String>> {
        let removed = self.element_mut(node)?.attrs.remove_named_item(name);
        if removed.is_some() {
            self.queue_mutation(MutationRecord::attribute(node, name));
        }
        Ok(removed.map(|a| a.value))
    }

    /// Elements under `root` (inclusive) carrying `name`, in document order
    pub fn elements_with_attribute(&self, root: NodeId, name: &str) -> Vec<NodeId> {
        let mut nodes = vec![root];
        nodes.extend(self.tree.descendants(root));
        nodes.retain(|&id| self.has_attribute(id, name));
        nodes
    }

    // ------------------------------------------------------------------
    // classList
    // ------------------------------------------------------------------

    pub fn class_list(&self, node: NodeId) -> DOMTokenList {
        DOMTokenList::from_string(self.get_attribute(node, "class").unwrap_or(""))
    }

    pub fn has_class(&self, node: NodeId, token: &str) -> bool {
        self.class_list(node).contains(token)
    }

    pub fn add_class(&mut self, node: NodeId, token: &str) -> DomResult<()> {
        let mut list = self.class_list(node);
        if list.add(token) {
            self.set_attribute(node, "class", &list.value())?;
        }
        Ok(())
    }

    pub fn remove_class(&mut self, node: NodeId, token: &str) -> DomResult<()> {
        let mut list = self.class_list(node);
        if list.remove(token) {
            self.set_attribute(node, "class", &list.value())?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Inline style
    // ------------------------------------------------------------------

    pub fn style(&self, node: NodeId) -> CssStyleDeclaration {
        CssStyleDeclaration::parse(self.get_attribute(node, "style").unwrap_or(""))
    }

    pub fn set_style_property(&mut self, node: NodeId, name: &str, value: &str) -> DomResult<()> {
        let mut style = self.style(node);
        style.set_property(name, value);
        self.set_attribute(node, "style", &style.css_text())?;
        if name.eq_ignore_ascii_case("background-image") {
            if let Some(url) = css_url(value) {
                self.queue_fetch(node, url.to_string(), ResourceKind::Background);
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    /// Record the layout box of `node` in page coordinates
    pub fn set_layout_rect(&mut self, node: NodeId, rect: DOMRect) {
        self.layout.insert(node, rect);
    }

    /// `getBoundingClientRect()`; all zeros for nodes without a box
    pub fn bounding_client_rect(&self, node: NodeId) -> DOMRect {
        self.layout
            .get(&node)
            .map(|rect| rect.translated(self.window.scroll_x, self.window.scroll_y))
            .unwrap_or_default()
    }

    pub fn set_client_size(&mut self, width: f64, height: f64) {
        self.client_size = (width, height);
    }

    /// `documentElement.clientWidth`
    pub fn client_width(&self) -> f64 {
        self.client_size.0
    }

    /// `documentElement.clientHeight`
    pub fn client_height(&self) -> f64 {
        self.client_size.1
    }

    /// Viewport rectangle in client coordinates
    pub fn viewport_rect(&self) -> DOMRect {
        let width = self.window.inner_width.filter(|w| *w > 0.0).unwrap_or(self.client_size.0);
        let height = self.window.inner_height.filter(|h| *h > 0.0).unwrap_or(self.client_size.1);
        DOMRect::from_xywh(0.0, 0.0, width, height)
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub fn add_event_listener(
        &mut self,
        target: EventTarget,
        event_type: EventType,
        options: ListenerOptions,
        callback: EventCallback,
    ) {
        self.listeners
            .entry((target, event_type))
            .or_default()
            .push(Listener { options, callback });
    }

    pub fn listener_count(&self, target: EventTarget, event_type: EventType) -> usize {
        self.listeners.get(&(target, event_type)).map_or(0, Vec::len)
    }

    /// Fire `event_type` at `target`; returns how many listeners ran
    pub fn dispatch_event(&mut self, target: EventTarget, event_type: EventType) -> usize {
        let key = (target, event_type);
        let Some(listeners) = self.listeners.remove(&key) else {
            return 0;
        };
        tracing::trace!("dispatch {} to {:?} ({} listeners)", event_type.name(), target, listeners.len());

        let event = DomEvent::new(event_type, target);
        let count = listeners.len();
        let mut kept = Vec::new();
        for mut listener in listeners {
            (listener.callback)(self, &event);
            if !listener.options.once {
                kept.push(listener);
            }
        }
        if !kept.is_empty() {
            // Listeners added while dispatching go after the survivors.
            kept.extend(self.listeners.remove(&key).unwrap_or_default());
            self.listeners.insert(key, kept);
        }
        count
    }

    /// Parsing finished: fire `DOMContentLoaded`
    pub fn content_loaded(&mut self) {
        if self.ready_state != ReadyState::Loading {
            return;
        }
        self.ready_state = ReadyState::Interactive;
        self.dispatch_event(EventTarget::Window, EventType::DOMContentLoaded);
    }

    /// All subresources settled: fire the window `load` event once
    pub fn finish_loading(&mut self) {
        if self.ready_state == ReadyState::Complete {
            return;
        }
        self.content_loaded();
        self.ready_state = ReadyState::Complete;
        tracing::debug!("Document loaded: {}", self.url);
        self.dispatch_event(EventTarget::Window, EventType::Load);
    }

    // ------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------

    /// `new MutationObserver(..)`; `None` when the host lacks the primitive
    pub fn create_mutation_observer(&mut self) -> Option<MutationObserverId> {
        if !self.window.features.mutation_observer {
            return None;
        }
        self.mutation_observers.push(MutationObserver::default());
        Some(MutationObserverId(self.mutation_observers.len() - 1))
    }

    pub fn observe_mutations(
        &mut self,
        id: MutationObserverId,
        target: NodeId,
        init: MutationObserverInit,
    ) -> DomResult<()> {
        if self.tree.get(target).is_none() {
            return Err(DomError::NotFound(target));
        }
        self.mutation_observers
            .get_mut(id.0)
            .ok_or(DomError::UnknownObserver)?
            .observe(target, init);
        Ok(())
    }

    pub fn has_mutation_records(&self, id: MutationObserverId) -> bool {
        self.mutation_observers.get(id.0).is_some_and(|o| o.has_records())
    }

    /// Drain the queued records (one delivery)
    pub fn take_mutation_records(&mut self, id: MutationObserverId) -> Vec<MutationRecord> {
        self.mutation_observers
            .get_mut(id.0)
            .map(|o| o.take_records())
            .unwrap_or_default()
    }

    pub fn disconnect_mutation_observer(&mut self, id: MutationObserverId) {
        if let Some(observer) = self.mutation_observers.get_mut(id.0) {
            observer.disconnect();
        }
    }

    /// `new IntersectionObserver(..)` rooted at the viewport
    pub fn create_intersection_observer(&mut self) -> Option<IntersectionObserverId> {
        if !self.window.features.intersection_observer {
            return None;
        }
        self.intersection_observers.push(IntersectionObserver::default());
        Some(IntersectionObserverId(self.intersection_observers.len() - 1))
    }

    pub fn observe_intersection(&mut self, id: IntersectionObserverId, target: NodeId) -> DomResult<()> {
        if self.tree.get(target).is_none() {
            return Err(DomError::NotFound(target));
        }
        self.intersection_observers
            .get_mut(id.0)
            .ok_or(DomError::UnknownObserver)?
            .observe(target);
        Ok(())
    }

    pub fn unobserve_intersection(&mut self, id: IntersectionObserverId, target: NodeId) {
        if let Some(observer) = self.intersection_observers.get_mut(id.0) {
            observer.unobserve(target);
        }
    }

    pub fn disconnect_intersection_observer(&mut self, id: IntersectionObserverId) {
        if let Some(observer) = self.intersection_observers.get_mut(id.0) {
            observer.disconnect();
        }
    }

    /// Targets currently observed by `id`
    pub fn intersection_targets(&self, id: IntersectionObserverId) -> &[NodeId] {
        self.intersection_observers.get(id.0).map(|o| o.targets()).unwrap_or(&[])
    }

    /// Compute the pending intersection batch from current geometry
    pub fn take_intersection_entries(&mut self, id: IntersectionObserverId) -> Vec<IntersectionObserverEntry> {
        let root = self.viewport_rect();
        let rects: Vec<(NodeId, DOMRect)> = self
            .intersection_targets(id)
            .iter()
            .map(|&target| (target, self.bounding_client_rect(target)))
            .collect();
        self.intersection_observers
            .get_mut(id.0)
            .map(|o| o.update(&rects, root))
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Resource fetches
    // ------------------------------------------------------------------

    fn queue_fetch(&mut self, target: NodeId, url: String, kind: ResourceKind) {
        tracing::trace!("queue {:?} fetch for {}: {}", kind, target, url);
        self.resources.push(ResourceRequest {
            target,
            url,
            kind,
            priority: FetchPriority::Auto,
        });
    }

    /// Hand queued fetches to the network layer
    pub fn take_resource_requests(&mut self) -> Vec<ResourceRequest> {
        let mut requests = std::mem::take(&mut self.resources);
        for request in &mut requests {
            request.priority = self
                .get_attribute(request.target, "fetchpriority")
                .map(FetchPriority::parse)
                .unwrap_or_default();
        }
        requests
    }

    /// Report a fetch outcome; fires `load` or `error` at the element
    pub fn finish_resource(&mut self, target: NodeId, success: bool) -> usize {
        let event_type = if success { EventType::Load } else { EventType::Error };
        self.dispatch_event(EventTarget::Node(target), event_type)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

/// The argument of a single `url(...)` value, quotes stripped
fn css_url(value: &str) -> Option<&str> {
    let inner = value.trim().strip_prefix("url(")?.strip_suffix(')')?.trim();
    let inner = inner
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| inner.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .unwrap_or(inner);
    Some(inner)
}
