//! Batch scheduler
//!
//! Opens a transaction on the first notification of a gesture, counts
//! quiet ticks, and assembles the ordered batch once the gesture has
//! settled.

use std::collections::HashSet;

use crate::action::{EventBatch, NormalizedAction};
use crate::notification::DomSelection;
use crate::registry::{Identity, NodeRegistry};
use crate::root::EditableRoot;

/// Scheduler lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    /// No open transaction
    #[default]
    Idle,
    /// Collecting a gesture
    Collecting,
    /// Assembling the batch
    Draining,
}

/// Action tagged with the sequence number of the notification that caused it
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PendingAction<N> {
    pub seq: u64,
    pub action: NormalizedAction<N>,
}

/// One user gesture in progress
#[derive(Debug)]
pub(crate) struct Transaction<N> {
    pub actions: Vec<PendingAction<N>>,
    pub touched: Vec<Identity>,
    /// Selection the gesture started from
    pub pre_selection: Option<DomSelection<N>>,
    /// Holds at least one content edit
    pub has_edits: bool,
}

impl<N> Transaction<N> {
    fn new(pre_selection: Option<DomSelection<N>>) -> Self {
        Self {
            actions: Vec::new(),
            touched: Vec::new(),
            pre_selection,
            has_edits: false,
        }
    }

    pub fn push(&mut self, seq: u64, action: NormalizedAction<N>) {
        if !action.is_selection() {
            self.has_edits = true;
        }
        self.actions.push(PendingAction { seq, action });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickOutcome {
    /// Nothing open
    Idle,
    /// Still collecting
    Waiting,
    /// Quiet long enough to flush
    Quiescent,
}

#[derive(Debug)]
pub(crate) struct BatchScheduler<N> {
    state: SchedulerState,
    transaction: Option<Transaction<N>>,
    quiet_ticks: u32,
    seq: u64,
}

impl<N> Default for BatchScheduler<N> {
    fn default() -> Self {
        Self {
            state: SchedulerState::Idle,
            transaction: None,
            quiet_ticks: 0,
            seq: 0,
        }
    }
}

impl<N: Copy + Eq + std::hash::Hash + std::fmt::Debug> BatchScheduler<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == SchedulerState::Idle
    }

    pub fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    /// A relevant notification arrived: open a transaction if needed and
    /// restart the quiet count
    pub fn note_activity(&mut self, known_selection: Option<DomSelection<N>>) {
        if self.transaction.is_none() {
            tracing::trace!("Transaction opened");
            self.transaction = Some(Transaction::new(known_selection));
            self.state = SchedulerState::Collecting;
        }
        self.quiet_ticks = 0;
    }

    pub fn push(&mut self, seq: u64, action: NormalizedAction<N>) {
        match self.transaction.as_mut() {
            Some(tx) => tx.push(seq, action),
            None => tracing::debug!("Action {} outside a transaction dropped", action.name()),
        }
    }

    /// Count one quiet tick. `hold` keeps the transaction open whatever the
    /// count.
    pub fn tick(&mut self, threshold: u32, hold: bool) -> TickOutcome {
        if self.transaction.is_none() {
            return TickOutcome::Idle;
        }
        if hold {
            self.quiet_ticks = 0;
            return TickOutcome::Waiting;
        }
        self.quiet_ticks += 1;
        if self.quiet_ticks >= threshold {
            TickOutcome::Quiescent
        } else {
            TickOutcome::Waiting
        }
    }

    pub fn begin_drain(&mut self) -> Option<Transaction<N>> {
        let tx = self.transaction.take()?;
        self.state = SchedulerState::Draining;
        Some(tx)
    }

    pub fn finish_drain(&mut self) {
        self.state = SchedulerState::Idle;
        self.quiet_ticks = 0;
    }

    /// Drop the open transaction without emitting it
    pub fn discard(&mut self) {
        if let Some(tx) = self.transaction.take() {
            tracing::debug!("Discarding transaction with {} pending actions", tx.actions.len());
        }
        self.finish_drain();
    }

    /// Order actions by cause and resolve the touched nodes. `None` when
    /// the gesture produced nothing.
    pub fn assemble<R: EditableRoot<Node = N>>(
        &self,
        root: &R,
        registry: &NodeRegistry<N>,
        mut tx: Transaction<N>,
    ) -> Option<EventBatch<N>> {
        if tx.actions.is_empty() {
            return None;
        }
        tx.actions.sort_by_key(|pending| pending.seq);

        let mutated_elements: HashSet<N> = tx
            .touched
            .iter()
            .filter_map(|id| registry.node_of(*id))
            .filter(|node| root.contains(*node))
            .collect();

        Some(EventBatch {
            actions: tx.actions.into_iter().map(|pending| pending.action).collect(),
            mutated_elements,
        })
    }
}
