//! Mutation Observer
//!
//! Queues `characterData` and `childList` records for observed subtrees.
//! Records are drained with `take_records`, the way a MutationObserver
//! callback receives them at the next microtask checkpoint.

use crate::NodeId;

/// Mutation observer
#[derive(Debug, Default)]
pub struct MutationObserver {
    options: MutationObserverInit,
    observed: Vec<NodeId>,
    records: Vec<MutationRecord>,
}

/// Mutation observer options
#[derive(Debug, Clone, Default)]
pub struct MutationObserverInit {
    pub child_list: bool,
    pub character_data: bool,
    pub subtree: bool,
    pub character_data_old_value: bool,
}

impl MutationObserverInit {
    /// Options used by editable roots: everything, with old values
    pub fn editable() -> Self {
        Self {
            child_list: true,
            character_data: true,
            subtree: true,
            character_data_old_value: true,
        }
    }
}

/// Mutation record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub mutation_type: MutationType,
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
    pub previous_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationType {
    CharacterData,
    ChildList,
}

impl MutationRecord {
    pub fn character_data(target: NodeId, old_value: Option<String>, new_value: String) -> Self {
        Self {
            mutation_type: MutationType::CharacterData,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            previous_sibling: None,
            next_sibling: None,
            old_value,
            new_value: Some(new_value),
        }
    }

    pub fn child_list(
        target: NodeId,
        added_nodes: Vec<NodeId>,
        removed_nodes: Vec<NodeId>,
        previous_sibling: Option<NodeId>,
        next_sibling: Option<NodeId>,
    ) -> Self {
        Self {
            mutation_type: MutationType::ChildList,
            target,
            added_nodes,
            removed_nodes,
            previous_sibling,
            next_sibling,
            old_value: None,
            new_value: None,
        }
    }
}

impl MutationObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, target: NodeId, options: MutationObserverInit) {
        self.options = options;
        if !self.observed.contains(&target) {
            self.observed.push(target);
        }
    }

    pub fn disconnect(&mut self) {
        self.observed.clear();
        self.records.clear();
    }

    pub fn is_observing(&self) -> bool {
        !self.observed.is_empty()
    }

    pub fn observed(&self) -> &[NodeId] {
        &self.observed
    }

    pub fn options(&self) -> &MutationObserverInit {
        &self.options
    }

    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.records)
    }

    pub fn pending(&self) -> usize {
        self.records.len()
    }

    /// Queue a record. `ancestors` is the target followed by its ancestor
    /// chain, used to match subtree observation.
    pub(crate) fn notify(&mut self, mut record: MutationRecord, ancestors: &[NodeId]) {
        let wanted = match record.mutation_type {
            MutationType::CharacterData => self.options.character_data,
            MutationType::ChildList => self.options.child_list,
        };
        if !wanted {
            return;
        }
        let matches = self.observed.iter().any(|observed| {
            match ancestors.iter().position(|a| a == observed) {
                Some(0) => true,
                Some(_) => self.options.subtree,
                None => false,
            }
        });
        if !matches {
            return;
        }
        if record.mutation_type == MutationType::CharacterData && !self.options.character_data_old_value {
            record.old_value = None;
        }
        tracing::trace!("Mutation record queued: {:?} on {:?}", record.mutation_type, record.target);
        self.records.push(record);
    }
}
