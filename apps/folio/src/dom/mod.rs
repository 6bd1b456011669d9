//! Live document tree.
//!
//! Element and text nodes in an `indextree` arena hanging off a single `body`.
//! Removing a subtree frees its slots for reuse, and a stale `NodeId` (removed,
//! or pointing at a reused slot) resolves to nothing.
//!
//! The live view is shared as `SharedDocument`; its lock is only ever held for
//! synchronous tree edits or snapshots, never across an await point.

pub mod style;

use std::sync::{Arc, Mutex};

use indextree::{Arena, Node};

pub use indextree::NodeId;
pub use style::InlineStyle;

pub type SharedDocument = Arc<Mutex<Document>>;

#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    pub tag: String,
    pub id: Option<String>,
    pub style: InlineStyle,
    /// Image source for `img` elements.
    pub src: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Element(ElementData),
    Text(String),
}

impl NodeData {
    fn element(tag: &str) -> Self {
        NodeData::Element(ElementData {
            tag: tag.to_ascii_lowercase(),
            id: None,
            style: InlineStyle::default(),
            src: None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    arena: Arena<NodeData>,
    body: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let body = arena.new_node(NodeData::element("body"));
        Document { arena, body }
    }

    pub fn into_shared(self) -> SharedDocument {
        Arc::new(Mutex::new(self))
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    fn node(&self, id: NodeId) -> Option<&Node<NodeData>> {
        self.arena.get(id).filter(|_| !id.is_removed(&self.arena))
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<NodeData>> {
        if self.node(id).is_none() {
            return None;
        }
        self.arena.get_mut(id)
    }

    // ── creation ────────────────────────────────────────────────────────────

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.arena.new_node(NodeData::element(tag))
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.arena.new_node(NodeData::Text(text.to_string()))
    }

    /// Appends `child` as the last child of `parent`, detaching it from any previous
    /// parent first. Returns false if either node is gone or the move would create a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.node(parent).is_none() || self.node(child).is_none() {
            return false;
        }
        parent.checked_append(child, &mut self.arena).is_ok()
    }

    /// Unlinks `id` from its parent; the subtree stays alive.
    pub fn detach(&mut self, id: NodeId) {
        if self.node(id).is_some() {
            id.detach(&mut self.arena);
        }
    }

    /// Detaches `id` and frees its whole subtree. The body cannot be removed.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if id == self.body || self.node(id).is_none() {
            return false;
        }
        id.remove_subtree(&mut self.arena);
        true
    }

    /// Copies `id` and all its descendants into a new detached subtree.
    pub fn deep_clone(&mut self, id: NodeId) -> Option<NodeId> {
        let data = self.node(id)?.get().clone();
        let copy = self.arena.new_node(data);
        for child in self.children(id) {
            if let Some(child_copy) = self.deep_clone(child) {
                self.append_child(copy, child_copy);
            }
        }
        Some(copy)
    }

    // ── queries ─────────────────────────────────────────────────────────────

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.node(id).map(Node::get)
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.data(id)? {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match self.node_mut(id)?.get_mut() {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) => None,
        }
    }

    pub fn style(&self, id: NodeId) -> Option<&InlineStyle> {
        self.element(id).map(|el| &el.style)
    }

    pub fn style_mut(&mut self, id: NodeId) -> Option<&mut InlineStyle> {
        self.element_mut(id).map(|el| &mut el.style)
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        if self.node(id).is_none() {
            return Vec::new();
        }
        id.children(&self.arena).collect()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(Node::parent)
    }

    /// Parents of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        if self.node(id).is_none() {
            return Vec::new();
        }
        id.ancestors(&self.arena).skip(1).collect()
    }

    /// All nodes below `id` in document order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        if self.node(id).is_none() {
            return Vec::new();
        }
        id.descendants(&self.arena).skip(1).collect()
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        self.contains(id) && (id == self.body || self.ancestors(id).last() == Some(&self.body))
    }

    /// First attached element with the given id, in document order.
    pub fn get_element_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.body.descendants(&self.arena).skip(1).find(|n| {
            self.element(*n)
                .and_then(|el| el.id.as_deref())
                .is_some_and(|id| id == element_id)
        })
    }

    /// Concatenated text of the subtree, one space between text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        if let Some(NodeData::Text(t)) = self.data(id) {
            parts.push(t.as_str());
        }
        for n in self.descendants(id) {
            if let Some(NodeData::Text(t)) = self.data(n) {
                parts.push(t.as_str());
            }
        }
        parts.join(" ")
    }

    /// Number of live nodes, attached or not.
    pub fn live_node_count(&self) -> usize {
        self.arena.iter().filter(|n| !n.is_removed()).count()
    }

    /// Arena slots, live or free. Freed slots are reused by later nodes.
    pub fn slot_count(&self) -> usize {
        self.arena.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_tree() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let page = doc.create_element("div");
        if let Some(el) = doc.element_mut(page) {
            el.id = Some("resume-preview".to_string());
            el.style = InlineStyle::parse("width: 210mm; transform: scale(0.5)");
        }
        let heading = doc.create_element("h1");
        let text = doc.create_text("Jane Doe");
        doc.append_child(heading, text);
        doc.append_child(page, heading);
        let body = doc.body();
        doc.append_child(body, page);
        (doc, page, heading)
    }

    #[test]
    fn test_get_element_by_id_finds_attached_element() {
        let (doc, page, _) = make_tree();
        assert_eq!(doc.get_element_by_id("resume-preview"), Some(page));
        assert_eq!(doc.get_element_by_id("missing"), None);
    }

    #[test]
    fn test_detached_elements_are_not_found_by_id() {
        let (mut doc, page, _) = make_tree();
        doc.detach(page);
        assert_eq!(doc.get_element_by_id("resume-preview"), None);
        assert!(!doc.is_attached(page));
    }

    #[test]
    fn test_deep_clone_is_detached_and_independent() {
        let (mut doc, page, _) = make_tree();
        let copy = doc.deep_clone(page).unwrap();
        assert!(!doc.is_attached(copy));
        assert_eq!(doc.text_content(copy), "Jane Doe");

        doc.style_mut(copy).unwrap().set("transform", "none");
        assert_eq!(doc.style(page).unwrap().get("transform"), Some("scale(0.5)"));
        assert_eq!(doc.descendants(copy).len(), doc.descendants(page).len());
    }

    #[test]
    fn test_remove_frees_subtree() {
        let (mut doc, page, heading) = make_tree();
        let before = doc.live_node_count();
        assert!(doc.remove(page));
        assert!(!doc.contains(heading));
        assert_eq!(doc.live_node_count(), before - 3);
        assert!(doc.children(doc.body()).is_empty());
        assert!(!doc.remove(doc.body()));
    }

    #[test]
    fn test_removed_slots_are_reused() {
        let (mut doc, page, heading) = make_tree();
        let copy = doc.deep_clone(page).unwrap();
        assert!(doc.remove(copy));
        let slots = doc.slot_count();

        for _ in 0..5 {
            let copy = doc.deep_clone(page).unwrap();
            assert!(doc.remove(copy));
        }
        assert_eq!(doc.slot_count(), slots);
        // A stale id never resolves to the node now living in its slot.
        assert!(!doc.contains(copy));
        assert!(doc.contains(heading));
    }

    #[test]
    fn test_append_child_rejects_cycles() {
        let (mut doc, page, heading) = make_tree();
        assert!(!doc.append_child(heading, page));
        assert_eq!(doc.parent(heading), Some(page));
    }
}
