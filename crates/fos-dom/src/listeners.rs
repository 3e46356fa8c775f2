//! Event listener registry
//!
//! Tracks which event types are listened for on which node. The DOM holds
//! no callbacks: a host that owns the listener dispatches the events itself.

use std::collections::HashMap;

use crate::NodeId;

/// Listener handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Event listener storage
#[derive(Debug, Default)]
pub struct EventListenerRegistry {
    /// Map of node -> event type -> listener IDs
    listeners: HashMap<NodeId, HashMap<String, Vec<ListenerId>>>,
    next_id: u64,
}

impl EventListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event listener
    pub fn add_listener(&mut self, node: NodeId, event_type: &str) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;

        self.listeners
            .entry(node)
            .or_default()
            .entry(event_type.to_string())
            .or_default()
            .push(id);

        id
    }

    /// Remove an event listener
    pub fn remove_listener(&mut self, node: NodeId, event_type: &str, listener: ListenerId) -> bool {
        let Some(type_listeners) = self
            .listeners
            .get_mut(&node)
            .and_then(|node_listeners| node_listeners.get_mut(event_type))
        else {
            return false;
        };
        match type_listeners.iter().position(|&id| id == listener) {
            Some(pos) => {
                type_listeners.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn has_listener(&self, node: NodeId, event_type: &str) -> bool {
        self.listeners
            .get(&node)
            .and_then(|node_listeners| node_listeners.get(event_type))
            .is_some_and(|ids| !ids.is_empty())
    }

    /// Total listeners on a node
    pub fn listener_count(&self, node: NodeId) -> usize {
        self.listeners
            .get(&node)
            .map(|node_listeners| node_listeners.values().map(Vec::len).sum())
            .unwrap_or(0)
    }
}
