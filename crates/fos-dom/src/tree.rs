//! DOM Tree (arena-based allocation)
//!
//! All text offsets are counted in chars.

use crate::observer::{MutationObserver, MutationRecord};
use crate::{DomError, DomResult, Node, NodeId};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    observer: MutationObserver,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            observer: MutationObserver::new(),
        }
    }

    /// Document node
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the arena (attached or not)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.nodes.get_mut(id.index()).ok_or(DomError::NotFound(id))
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content))
    }

    // --- Navigation ---

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.next_sibling).filter(|s| s.is_valid())
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.prev_sibling).filter(|s| s.is_valid())
    }

    /// Iterate children as `(id, node)` pairs
    pub fn children(&self, id: NodeId) -> Children<'_> {
        let next = self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        Children { tree: self, next }
    }

    pub fn child_ids(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).map(|(child, _)| child).collect()
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).count()
    }

    /// The node followed by its ancestors, ending at the topmost one
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = Some(id).filter(|id| self.get(*id).is_some());
        while let Some(node) = current {
            chain.push(node);
            current = self.parent(node);
        }
        chain
    }

    /// Inclusive containment
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).contains(&ancestor)
    }

    /// Reachable from the document node
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.ancestors(id).last() == Some(&NodeId::ROOT)
    }

    /// Text length in chars (text nodes) or child count (elements)
    pub fn node_length(&self, id: NodeId) -> usize {
        match self.get(id) {
            Some(node) => match node.as_text() {
                Some(text) => text.chars().count(),
                None => self.child_count(id),
            },
            None => 0,
        }
    }

    /// Concatenated descendant text
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            out.push_str(text);
            return;
        }
        for (child, _) in self.children(id) {
            self.collect_text(child, out);
        }
    }

    // --- Mutation ---

    fn unlink(&mut self, child: NodeId) {
        let (parent, prev, next) = match self.get(child) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };
        if !parent.is_valid() {
            return;
        }
        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }
        let node = &mut self.nodes[child.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    fn link_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        let prev = if reference.is_valid() {
            self.nodes[reference.index()].prev_sibling
        } else {
            self.nodes[parent.index()].last_child
        };
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = reference;
        }
        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        if reference.is_valid() {
            self.nodes[reference.index()].prev_sibling = child;
        } else {
            self.nodes[parent.index()].last_child = child;
        }
    }

    fn check_insert(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let parent_node = self.node(parent)?;
        self.node(child)?;
        if parent_node.is_text() || child == NodeId::ROOT || self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        Ok(())
    }

    fn record(&mut self, record: MutationRecord) {
        if !self.observer.is_observing() {
            return;
        }
        let ancestors = self.ancestors(record.target);
        self.observer.notify(record, &ancestors);
    }

    /// Append a child node
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    /// Insert before a reference node (append when `reference` is `None`)
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) -> DomResult<NodeId> {
        self.check_insert(parent, child)?;
        if let Some(reference) = reference {
            if self.parent(reference) != Some(parent) {
                return Err(DomError::NotAChild { parent, child: reference });
            }
        }
        if let Some(old_parent) = self.parent(child) {
            self.remove_child(old_parent, child)?;
        }
        self.link_before(parent, child, reference.unwrap_or(NodeId::NONE));
        let prev = self.prev_sibling(child);
        let next = self.next_sibling(child);
        self.record(MutationRecord::child_list(parent, vec![child], Vec::new(), prev, next));
        Ok(child)
    }

    /// Remove a child node. The node stays in the arena, detached.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        let prev = self.prev_sibling(child);
        let next = self.next_sibling(child);
        self.unlink(child);
        self.record(MutationRecord::child_list(parent, Vec::new(), vec![child], prev, next));
        Ok(child)
    }

    /// Replace `old` with `new` in one childList record
    pub fn replace_child(&mut self, parent: NodeId, new: NodeId, old: NodeId) -> DomResult<NodeId> {
        if self.parent(old) != Some(parent) {
            return Err(DomError::NotAChild { parent, child: old });
        }
        self.check_insert(parent, new)?;
        if let Some(old_parent) = self.parent(new) {
            self.remove_child(old_parent, new)?;
        }
        let prev = self.prev_sibling(old);
        let next = self.next_sibling(old);
        self.unlink(old);
        self.link_before(parent, new, next.unwrap_or(NodeId::NONE));
        self.record(MutationRecord::child_list(parent, vec![new], vec![old], prev, next));
        Ok(old)
    }

    /// Replace the whole content of a text node
    pub fn set_text(&mut self, id: NodeId, content: &str) -> DomResult<()> {
        let node = self.node_mut(id)?;
        let crate::NodeData::Text(data) = &mut node.data else {
            return Err(DomError::InvalidNodeType(id));
        };
        let old = std::mem::replace(&mut data.content, content.to_string());
        self.record(MutationRecord::character_data(id, Some(old), content.to_string()));
        Ok(())
    }

    /// Insert text at a char offset
    pub fn insert_text(&mut self, id: NodeId, offset: usize, text: &str) -> DomResult<()> {
        let current = self.node(id)?.as_text().ok_or(DomError::InvalidNodeType(id))?;
        let at = byte_offset(current, offset).ok_or(DomError::IndexSize {
            node: id,
            offset,
            length: current.chars().count(),
        })?;
        let mut updated = current.to_string();
        updated.insert_str(at, text);
        self.set_text(id, &updated)
    }

    /// Delete the chars in `start..end`, returning them
    pub fn delete_text(&mut self, id: NodeId, start: usize, end: usize) -> DomResult<String> {
        let current = self.node(id)?.as_text().ok_or(DomError::InvalidNodeType(id))?;
        let length = current.chars().count();
        let (Some(from), Some(to)) = (byte_offset(current, start), byte_offset(current, end)) else {
            return Err(DomError::IndexSize { node: id, offset: end.max(start), length });
        };
        if from > to {
            return Err(DomError::IndexSize { node: id, offset: start, length });
        }
        let removed = current[from..to].to_string();
        let mut updated = current.to_string();
        updated.replace_range(from..to, "");
        self.set_text(id, &updated)?;
        Ok(removed)
    }

    /// Set an element attribute (not observed)
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let element = self.node_mut(id)?.as_element_mut().ok_or(DomError::InvalidNodeType(id))?;
        element.set_attr(name, value);
        Ok(())
    }

    // --- Observation ---

    pub fn observer(&self) -> &MutationObserver {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut MutationObserver {
        &mut self.observer
    }

    /// Drain queued mutation records
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        self.observer.take_records()
    }
}

/// Byte index of a char offset (offset == len is valid)
pub(crate) fn byte_offset(text: &str, offset: usize) -> Option<usize> {
    if offset == 0 {
        return Some(0);
    }
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .nth(offset)
}

/// Iterator over a node's children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let node = self.tree.get(id).filter(|_| id.is_valid())?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MutationObserverInit;

    fn paragraph(tree: &mut DomTree, text: &str) -> (NodeId, NodeId) {
        let p = tree.create_element("p");
        let t = tree.create_text(text);
        tree.append_child(tree.root(), p).unwrap();
        tree.append_child(p, t).unwrap();
        (p, t)
    }

    #[test]
    fn test_append_and_navigate() {
        let mut tree = DomTree::new();
        let (p, t) = paragraph(&mut tree, "hello");
        let b = tree.create_element("b");
        tree.append_child(p, b).unwrap();

        assert_eq!(tree.child_ids(p), vec![t, b]);
        assert_eq!(tree.next_sibling(t), Some(b));
        assert_eq!(tree.prev_sibling(b), Some(t));
        assert!(tree.is_connected(t));
        assert_eq!(tree.ancestors(t), vec![t, p, NodeId::ROOT]);
    }

    #[test]
    fn test_insert_before_and_remove() {
        let mut tree = DomTree::new();
        let (p, t) = paragraph(&mut tree, "b");
        let a = tree.create_text("a");
        tree.insert_before(p, a, Some(t)).unwrap();
        assert_eq!(tree.child_ids(p), vec![a, t]);

        tree.remove_child(p, a).unwrap();
        assert_eq!(tree.child_ids(p), vec![t]);
        assert!(!tree.is_connected(a));
        // Detached nodes keep their data
        assert_eq!(tree.get(a).unwrap().as_text(), Some("a"));
    }

    #[test]
    fn test_hierarchy_errors() {
        let mut tree = DomTree::new();
        let (p, t) = paragraph(&mut tree, "x");
        assert_eq!(
            tree.append_child(t, p),
            Err(DomError::HierarchyRequest { parent: t, child: p })
        );
        let stray = tree.create_text("y");
        assert_eq!(
            tree.remove_child(p, stray),
            Err(DomError::NotAChild { parent: p, child: stray })
        );
    }

    #[test]
    fn test_text_editing_in_chars() {
        let mut tree = DomTree::new();
        let (_, t) = paragraph(&mut tree, "héllo");
        tree.insert_text(t, 5, "!").unwrap();
        assert_eq!(tree.get(t).unwrap().as_text(), Some("héllo!"));

        let removed = tree.delete_text(t, 1, 3).unwrap();
        assert_eq!(removed, "él");
        assert_eq!(tree.get(t).unwrap().as_text(), Some("hlo!"));
        assert_eq!(tree.node_length(t), 4);

        assert!(matches!(tree.insert_text(t, 9, "x"), Err(DomError::IndexSize { .. })));
    }

    #[test]
    fn test_records_only_when_observed() {
        let mut tree = DomTree::new();
        let (p, t) = paragraph(&mut tree, "a");
        assert!(tree.take_records().is_empty());

        tree.observer_mut().observe(p, MutationObserverInit::editable());
        tree.insert_text(t, 1, "b").unwrap();
        let fresh = tree.create_text("c");
        tree.replace_child(p, fresh, t).unwrap();

        let records = tree.take_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].old_value.as_deref(), Some("a"));
        assert_eq!(records[0].new_value.as_deref(), Some("ab"));
        assert_eq!(records[1].added_nodes, vec![fresh]);
        assert_eq!(records[1].removed_nodes, vec![t]);
    }

    #[test]
    fn test_text_content() {
        let mut tree = DomTree::new();
        let (p, _) = paragraph(&mut tree, "one ");
        let b = tree.create_element("b");
        let t2 = tree.create_text("two");
        tree.append_child(p, b).unwrap();
        tree.append_child(b, t2).unwrap();
        assert_eq!(tree.text_content(p), "one two");
    }
}
