//! Mutation diff collector
//!
//! Coalesces mutation records per node and turns them into minimal text
//! changes. Browsers fire anywhere from one to five records for a single
//! keystroke, and some recreate the text node instead of editing it, so the
//! collector keeps only the first "before" per node and reads the "after"
//! from the live tree when asked.

use std::collections::{HashMap, HashSet};

use crate::notification::{MutationKind, MutationRecord};
use crate::registry::{Identity, NodeRegistry};
use crate::root::EditableRoot;

/// Minimal text change on one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange<N> {
    pub node: N,
    /// Char offset where `before` and `after` start to differ
    pub offset: usize,
    pub removed: String,
    pub inserted: String,
    pub before: String,
    pub after: String,
}

impl<N> TextChange<N> {
    pub fn is_insertion(&self) -> bool {
        self.removed.is_empty() && !self.inserted.is_empty()
    }

    pub fn is_removal(&self) -> bool {
        !self.removed.is_empty() && self.inserted.is_empty()
    }

    pub fn is_replacement(&self) -> bool {
        !self.removed.is_empty() && !self.inserted.is_empty()
    }
}

/// A text node that left its parent, kept until a replacement shows up
#[derive(Debug, Clone)]
struct RemovedSlot<N> {
    parent: N,
    previous: Option<N>,
    next: Option<N>,
    id: Identity,
}

/// Reusable char buffers for diffing
#[derive(Debug, Default)]
struct Scratch {
    before: Vec<char>,
    after: Vec<char>,
}

/// Per-transaction diff state
#[derive(Debug)]
pub struct DiffCollector<N> {
    /// Tracked text nodes in first-touch order
    tracked: Vec<Identity>,
    /// Text at the last checkpoint. `None` when the host gave no old value.
    baselines: HashMap<Identity, Option<String>>,
    /// Latest text reported by records
    latest: HashMap<Identity, String>,
    /// Removed text nodes with no replacement
    detached: HashSet<Identity>,
    slots: Vec<RemovedSlot<N>>,
    touched: Vec<Identity>,
    scratch: Option<Scratch>,
}

impl<N> Default for DiffCollector<N> {
    fn default() -> Self {
        Self {
            tracked: Vec::new(),
            baselines: HashMap::new(),
            latest: HashMap::new(),
            detached: HashSet::new(),
            slots: Vec::new(),
            touched: Vec::new(),
            scratch: None,
        }
    }
}

impl<N: Copy + Eq + std::hash::Hash + std::fmt::Debug> DiffCollector<N> {
    pub fn new() -> Self {
        Self::default()
    }

    fn track(&mut self, id: Identity) {
        if !self.tracked.contains(&id) {
            self.tracked.push(id);
        }
    }

    fn untrack(&mut self, id: Identity) {
        self.tracked.retain(|t| *t != id);
        self.baselines.remove(&id);
        self.latest.remove(&id);
        self.detached.remove(&id);
    }

    fn touch(&mut self, id: Identity) {
        if !self.touched.contains(&id) {
            self.touched.push(id);
        }
    }

    /// Seed the baseline of a text node from the live tree. An existing
    /// baseline wins: records already told us what the node held before.
    pub fn prime(&mut self, registry: &mut NodeRegistry<N>, node: N, live_text: String) {
        let id = registry.identity_of(node);
        self.track(id);
        self.baselines.entry(id).or_insert(Some(live_text));
    }

    /// Fold one mutation record into the per-node state
    pub fn record<R: EditableRoot<Node = N>>(
        &mut self,
        root: &R,
        registry: &mut NodeRegistry<N>,
        record: &MutationRecord<N>,
    ) {
        match record.kind {
            MutationKind::CharacterData => {
                let id = registry.identity_of(record.target);
                self.track(id);
                self.baselines.entry(id).or_insert_with(|| record.old_text.clone());
                if let Some(new_text) = &record.new_text {
                    self.latest.insert(id, new_text.clone());
                }
                self.touch(id);
            }
            MutationKind::ChildList => {
                for removed in &record.removed_nodes {
                    registry.mark_removed(*removed);
                    let id = registry.identity_of(*removed);
                    match root.text(*removed) {
                        Some(text) => {
                            self.track(id);
                            self.baselines.entry(id).or_insert(Some(text));
                            self.detached.insert(id);
                            self.slots.push(RemovedSlot {
                                parent: record.target,
                                previous: record.previous_sibling,
                                next: record.next_sibling,
                                id,
                            });
                        }
                        None => {
                            let parent = registry.identity_of(record.target);
                            self.touch(parent);
                        }
                    }
                }
                for added in &record.added_nodes {
                    registry.mark_live(*added);
                    let id = registry.identity_of(*added);
                    self.touch(id);
                    if root.text(*added).is_none() {
                        let parent = registry.identity_of(record.target);
                        self.touch(parent);
                        continue;
                    }
                    let slot = self.slots.iter().position(|slot| {
                        slot.parent == record.target
                            && slot.previous == record.previous_sibling
                            && slot.next == record.next_sibling
                    });
                    match slot {
                        Some(index) => {
                            // Same parent, same neighbours: the new node
                            // continues the old one's text.
                            let slot = self.slots.remove(index);
                            let baseline = self.baselines.get(&slot.id).cloned().flatten();
                            tracing::trace!("Text node {:?} continues {:?}", added, slot.id);
                            self.untrack(slot.id);
                            self.track(id);
                            self.baselines.insert(id, baseline);
                        }
                        None => {
                            self.track(id);
                            self.baselines.entry(id).or_insert_with(|| Some(String::new()));
                            let parent = registry.identity_of(record.target);
                            self.touch(parent);
                        }
                    }
                }
            }
        }
    }

    /// Compare every tracked node's baseline with its current text, then
    /// advance the baselines. `pending` holds records not yet folded in;
    /// their old values stand in for the live text, so changes they
    /// describe are left for the next checkpoint.
    pub fn checkpoint<R: EditableRoot<Node = N>>(
        &mut self,
        root: &R,
        registry: &NodeRegistry<N>,
        pending: &[MutationRecord<N>],
    ) -> Vec<TextChange<N>> {
        let mut changes = Vec::new();
        let mut gone = Vec::new();

        for id in self.tracked.clone() {
            let Some(node) = registry.node_of(id) else {
                tracing::debug!("Dropping stale identity {:?} from diff", id);
                gone.push(id);
                continue;
            };

            let after = if self.detached.contains(&id) || !root.contains(node) {
                gone.push(id);
                String::new()
            } else {
                let pending_old = pending
                    .iter()
                    .find(|r| r.kind == MutationKind::CharacterData && r.target == node)
                    .and_then(|r| r.old_text.clone());
                match pending_old.or_else(|| root.text(node)).or_else(|| self.latest.get(&id).cloned()) {
                    Some(text) => text,
                    None => continue,
                }
            };

            let Some(before) = self.baselines.get(&id).cloned().flatten() else {
                self.baselines.insert(id, Some(after));
                continue;
            };

            if let Some((offset, removed, inserted)) = self.diff_text(&before, &after) {
                changes.push(TextChange {
                    node,
                    offset,
                    removed,
                    inserted,
                    before,
                    after: after.clone(),
                });
            }
            self.baselines.insert(id, Some(after));
        }

        for id in gone {
            self.untrack(id);
        }
        changes
    }

    /// Common prefix/suffix diff over chars
    fn diff_text(&mut self, before: &str, after: &str) -> Option<(usize, String, String)> {
        if before == after {
            return None;
        }
        let scratch = self.scratch.get_or_insert_with(Scratch::default);
        scratch.before.clear();
        scratch.before.extend(before.chars());
        scratch.after.clear();
        scratch.after.extend(after.chars());
        let (b, a) = (&scratch.before, &scratch.after);

        let prefix = b.iter().zip(a.iter()).take_while(|(x, y)| x == y).count();
        let max_suffix = b.len().min(a.len()) - prefix;
        let suffix = b
            .iter()
            .rev()
            .zip(a.iter().rev())
            .take(max_suffix)
            .take_while(|(x, y)| x == y)
            .count();

        let removed = b[prefix..b.len() - suffix].iter().collect();
        let inserted = a[prefix..a.len() - suffix].iter().collect();
        Some((prefix, removed, inserted))
    }

    /// Touched identities so far, including parents of removed text nodes
    /// that never got a replacement
    pub fn take_touched(&mut self, registry: &mut NodeRegistry<N>) -> Vec<Identity> {
        for slot in std::mem::take(&mut self.slots) {
            let parent = registry.identity_of(slot.parent);
            self.touch(parent);
        }
        std::mem::take(&mut self.touched)
    }

    /// Forget all per-transaction state. The scratch buffers are kept.
    pub fn reset(&mut self) {
        self.tracked.clear();
        self.baselines.clear();
        self.latest.clear();
        self.detached.clear();
        self.slots.clear();
        self.touched.clear();
    }

    /// Release the scratch buffers
    pub fn release_scratch(&mut self) {
        self.scratch = None;
    }

    pub fn has_scratch(&self) -> bool {
        self.scratch.is_some()
    }

    pub fn is_tracking(&self) -> bool {
        !self.tracked.is_empty()
    }
}
