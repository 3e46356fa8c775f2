//! `fos-dom` host
//!
//! [`EditableRoot`] over an element of a shared [`Document`]. The
//! document is shared with the code that plays the browser (applying
//! edits, moving the selection), the same way the engine shares its
//! document between the page and the script runtime.

use std::cell::RefCell;
use std::rc::Rc;

use fos_dom::{
    BoundaryPoint, Document, ListenerId, MutationObserverInit, MutationRecord as DomMutationRecord,
    MutationType, NodeId,
};

use crate::action::DomPoint;
use crate::notification::{DomSelection, ListenTarget, MutationKind, MutationRecord, NotificationKind};
use crate::root::EditableRoot;

/// Editable root element inside a `fos-dom` document
#[derive(Debug)]
pub struct DomRoot {
    document: Rc<RefCell<Document>>,
    element: NodeId,
    listeners: Vec<(NodeId, &'static str, ListenerId)>,
}

impl DomRoot {
    pub fn new(document: Rc<RefCell<Document>>, element: NodeId) -> Self {
        Self {
            document,
            element,
            listeners: Vec::new(),
        }
    }

    pub fn document(&self) -> &Rc<RefCell<Document>> {
        &self.document
    }

    pub fn element(&self) -> NodeId {
        self.element
    }

    pub fn is_subscribed(&self) -> bool {
        !self.listeners.is_empty()
    }
}

fn to_point(point: BoundaryPoint) -> DomPoint<NodeId> {
    DomPoint::new(point.node, point.offset)
}

fn to_record(record: DomMutationRecord) -> MutationRecord<NodeId> {
    let kind = match record.mutation_type {
        MutationType::CharacterData => MutationKind::CharacterData,
        MutationType::ChildList => MutationKind::ChildList,
    };
    MutationRecord {
        kind,
        target: record.target,
        old_text: record.old_value,
        new_text: record.new_value,
        added_nodes: record.added_nodes,
        removed_nodes: record.removed_nodes,
        previous_sibling: record.previous_sibling,
        next_sibling: record.next_sibling,
    }
}

impl EditableRoot for DomRoot {
    type Node = NodeId;

    fn root_node(&self) -> NodeId {
        self.element
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.document.borrow().tree().parent(node)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.document.borrow().tree().child_ids(node)
    }

    fn text(&self, node: NodeId) -> Option<String> {
        let document = self.document.borrow();
        document.tree().get(node)?.as_text().map(str::to_string)
    }

    fn is_line_break(&self, node: NodeId) -> bool {
        self.document.borrow().tree().get(node).is_some_and(|n| n.is_line_break())
    }

    fn is_hidden(&self, node: NodeId) -> bool {
        self.document.borrow().tree().get(node).is_some_and(|n| n.is_hidden())
    }

    fn selection(&self) -> Option<DomSelection<NodeId>> {
        let selection = self.document.borrow().selection()?;
        Some(DomSelection::new(to_point(selection.anchor), to_point(selection.focus)))
    }

    fn caret_from_point(&self, x: f64, y: f64) -> Option<DomPoint<NodeId>> {
        self.document.borrow().caret_from_point(x, y).map(to_point)
    }

    fn subscribe(&mut self, kinds: &[NotificationKind]) {
        let mut document = self.document.borrow_mut();
        let mut init = MutationObserverInit::default();
        for kind in kinds {
            let name = kind.event_name();
            match kind.target() {
                ListenTarget::Root => {
                    let id = document.listeners_mut().add_listener(self.element, name);
                    self.listeners.push((self.element, name, id));
                }
                ListenTarget::Document => {
                    let id = document.listeners_mut().add_listener(NodeId::ROOT, name);
                    self.listeners.push((NodeId::ROOT, name, id));
                }
                ListenTarget::Observer => match kind {
                    NotificationKind::CharacterData => init.character_data = true,
                    _ => init.child_list = true,
                },
            }
        }
        if init.character_data || init.child_list {
            init.subtree = true;
            init.character_data_old_value = init.character_data;
            document.tree_mut().observer_mut().observe(self.element, init);
        }
        tracing::debug!("Subscribed {} listeners on {:?}", self.listeners.len(), self.element);
    }

    fn unsubscribe(&mut self) {
        let mut document = self.document.borrow_mut();
        for (node, name, id) in self.listeners.drain(..) {
            document.listeners_mut().remove_listener(node, name, id);
        }
        document.tree_mut().observer_mut().disconnect();
    }

    fn take_mutation_records(&mut self) -> Vec<MutationRecord<NodeId>> {
        self.document
            .borrow_mut()
            .tree_mut()
            .take_records()
            .into_iter()
            .map(to_record)
            .collect()
    }
}
