//! Node identity registry
//!
//! Stable integer identities for nodes. Browsers destroy and recreate text
//! nodes mid-gesture, so classifiers keep identities instead of comparing
//! node handles across notifications.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Stable node identity, never reused within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identity(u32);

impl Identity {
    pub fn value(self) -> u32 {
        self.0
    }
}

/// Identity <-> node mapping
#[derive(Debug)]
pub struct NodeRegistry<N> {
    by_node: HashMap<N, Identity>,
    /// Indexed by identity; `None` once swept
    nodes: Vec<Option<N>>,
    removed: HashSet<Identity>,
}

impl<N> Default for NodeRegistry<N> {
    fn default() -> Self {
        Self {
            by_node: HashMap::new(),
            nodes: Vec::new(),
            removed: HashSet::new(),
        }
    }
}

impl<N: Copy + Eq + Hash> NodeRegistry<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity of a node, allocated on first use
    pub fn identity_of(&mut self, node: N) -> Identity {
        if let Some(id) = self.by_node.get(&node) {
            return *id;
        }
        let id = Identity(self.nodes.len() as u32);
        self.nodes.push(Some(node));
        self.by_node.insert(node, id);
        id
    }

    /// Identity without allocating
    pub fn lookup(&self, node: N) -> Option<Identity> {
        self.by_node.get(&node).copied()
    }

    /// `None` for unknown or swept identities
    pub fn node_of(&self, id: Identity) -> Option<N> {
        self.nodes.get(id.0 as usize).copied().flatten()
    }

    /// Node left the root. It stays resolvable until the next sweep.
    pub fn mark_removed(&mut self, node: N) {
        let id = self.identity_of(node);
        self.removed.insert(id);
    }

    /// Node was re-inserted before the sweep
    pub fn mark_live(&mut self, node: N) {
        if let Some(id) = self.lookup(node) {
            self.removed.remove(&id);
        }
    }

    pub fn is_removed(&self, id: Identity) -> bool {
        self.removed.contains(&id)
    }

    /// Forget removed nodes. Their identities are retired, not recycled.
    pub fn sweep(&mut self) -> usize {
        let swept = self.removed.len();
        for id in self.removed.drain() {
            if let Some(node) = self.nodes.get_mut(id.0 as usize).and_then(Option::take) {
                self.by_node.remove(&node);
            }
        }
        if swept > 0 {
            tracing::trace!("Swept {} removed node identities", swept);
        }
        swept
    }

    /// Live (unswept) identities
    pub fn len(&self) -> usize {
        self.by_node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_node.is_empty()
    }

    /// Drop every mapping. Identities allocated afterwards keep counting up.
    pub fn clear(&mut self) {
        self.by_node.clear();
        self.removed.clear();
        for slot in self.nodes.iter_mut() {
            *slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identities_are_stable_and_monotonic() {
        let mut registry = NodeRegistry::new();
        let a = registry.identity_of("a");
        let b = registry.identity_of("b");
        assert_eq!(registry.identity_of("a"), a);
        assert!(b > a);
        assert_eq!(registry.node_of(b), Some("b"));
        assert_eq!(registry.lookup("c"), None);
    }

    #[test]
    fn test_removed_nodes_resolve_until_sweep() {
        let mut registry = NodeRegistry::new();
        let a = registry.identity_of("a");
        registry.mark_removed("a");
        assert!(registry.is_removed(a));
        assert_eq!(registry.node_of(a), Some("a"));

        assert_eq!(registry.sweep(), 1);
        assert_eq!(registry.node_of(a), None);

        // A recreated node gets a fresh identity
        let again = registry.identity_of("a");
        assert_ne!(again, a);
    }

    #[test]
    fn test_reinserted_node_survives_sweep() {
        let mut registry = NodeRegistry::new();
        let a = registry.identity_of("a");
        registry.mark_removed("a");
        registry.mark_live("a");
        registry.sweep();
        assert_eq!(registry.node_of(a), Some("a"));
    }

    #[test]
    fn test_clear_keeps_counting() {
        let mut registry = NodeRegistry::new();
        let a = registry.identity_of("a");
        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.node_of(a), None);
        assert!(registry.identity_of("a") > a);
    }
}
