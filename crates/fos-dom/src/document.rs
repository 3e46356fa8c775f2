//! Document
//!
//! Owns the tree together with the state a browser keeps per document:
//! the current selection, text layout, and registered listeners.

use crate::{BoundaryPoint, DomTree, EventListenerRegistry, LayoutMap, NodeId, Selection};

/// DOM Document
#[derive(Debug)]
pub struct Document {
    tree: DomTree,
    body: NodeId,
    selection: Option<Selection>,
    layout: LayoutMap,
    listeners: EventListenerRegistry,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document with an empty `<body>`
    pub fn new() -> Self {
        let mut tree = DomTree::new();
        let body = tree.create_element("body");
        // Attaching a fresh element to the document node cannot fail
        let _ = tree.append_child(NodeId::ROOT, body);
        Self {
            tree,
            body,
            selection: None,
            layout: LayoutMap::new(),
            listeners: EventListenerRegistry::new(),
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    pub fn layout(&self) -> &LayoutMap {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut LayoutMap {
        &mut self.layout
    }

    pub fn listeners(&self) -> &EventListenerRegistry {
        &self.listeners
    }

    pub fn listeners_mut(&mut self) -> &mut EventListenerRegistry {
        &mut self.listeners
    }

    /// Current selection, if any
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn set_selection(&mut self, anchor: BoundaryPoint, focus: BoundaryPoint) {
        tracing::trace!("Selection set: {:?} -> {:?}", anchor, focus);
        self.selection = Some(Selection::new(anchor, focus));
    }

    /// Collapse the selection to a caret
    pub fn collapse(&mut self, point: BoundaryPoint) {
        self.set_selection(point, point);
    }

    /// Caret under a viewport point (`document.caretPositionFromPoint`)
    pub fn caret_from_point(&self, x: f64, y: f64) -> Option<BoundaryPoint> {
        self.layout.caret_at(&self.tree, x, y)
    }
}
