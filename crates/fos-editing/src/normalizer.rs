//! Normalizer
//!
//! Owns the classifiers for one editable root and routes every raw
//! notification through them. Mutation records are drained from the root
//! on each dispatch and tick, so a record is always folded into the
//! segment that caused it.

use fos_events::{ClipboardEvent, ClipboardEventType, DragEvent, DragEventType, Event, KeyboardEventType};
use fos_events::{MouseEventType, TouchEventType};

use crate::action::{EventBatch, NormalizedAction, SelectionDescription};
use crate::clipboard::ClipboardClassifier;
use crate::config::NormalizerConfig;
use crate::diff::DiffCollector;
use crate::error::{NormalizerError, NormalizerResult};
use crate::keyboard::{KeyboardClassifier, SegmentOwner, SegmentState, StartKind, is_select_all};
use crate::notification::{DomSelection, MutationKind, MutationRecord, Notification, SUBSCRIBED_KINDS};
use crate::pointer::PointerClassifier;
use crate::registry::NodeRegistry;
use crate::root::{EditableRoot, direction_of};
use crate::scheduler::{BatchScheduler, SchedulerState, TickOutcome};

/// Input normalizer for one editable root.
///
/// `on_batch` is called once per settled gesture with a non-empty batch.
pub struct Normalizer<R: EditableRoot, F> {
    root: R,
    on_batch: F,
    config: NormalizerConfig,
    registry: NodeRegistry<R::Node>,
    collector: DiffCollector<R::Node>,
    keyboard: KeyboardClassifier<R::Node>,
    pointer: PointerClassifier<R::Node>,
    clipboard: ClipboardClassifier<R::Node>,
    scheduler: BatchScheduler<R::Node>,
    /// Selection the consumer is known to have
    known_selection: Option<DomSelection<R::Node>>,
    destroyed: bool,
}

impl<R, F> Normalizer<R, F>
where
    R: EditableRoot,
    F: FnMut(EventBatch<R::Node>),
{
    /// Attach with the default configuration
    pub fn new(root: R, on_batch: F) -> Self {
        Self::with_config(root, on_batch, NormalizerConfig::default())
    }

    pub fn with_config(mut root: R, on_batch: F, config: NormalizerConfig) -> Self {
        root.subscribe(SUBSCRIBED_KINDS);
        let known_selection = root.selection();
        tracing::info!(
            "Normalizer attached to {:?} ({} notification kinds, {:?})",
            root.root_node(),
            SUBSCRIBED_KINDS.len(),
            config.platform
        );
        Self {
            root,
            on_batch,
            keyboard: KeyboardClassifier::new(config.platform),
            config,
            registry: NodeRegistry::new(),
            collector: DiffCollector::new(),
            pointer: PointerClassifier::new(),
            clipboard: ClipboardClassifier::new(),
            scheduler: BatchScheduler::new(),
            known_selection,
            destroyed: false,
        }
    }

    pub fn root(&self) -> &R {
        &self.root
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    pub fn registry(&self) -> &NodeRegistry<R::Node> {
        &self.registry
    }

    pub fn state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    pub fn segment_state(&self) -> SegmentState {
        self.keyboard.state()
    }

    pub fn known_selection(&self) -> Option<DomSelection<R::Node>> {
        self.known_selection
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn ensure_live(&self) -> NormalizerResult<()> {
        if self.destroyed {
            Err(NormalizerError::Destroyed)
        } else {
            Ok(())
        }
    }

    /// Feed one raw notification. Cancelable events may have their
    /// default prevented on the way through.
    pub fn dispatch(&mut self, notification: &mut Notification<R::Node>) -> NormalizerResult<()> {
        self.ensure_live()?;

        if let Notification::Mutation(record) = &*notification {
            if !self.root.contains(record.target) && self.registry.lookup(record.target).is_none() {
                return Err(NormalizerError::OutsideRoot(format!("{:?}", record.target)));
            }
        }

        let mut pending = self.root.take_mutation_records();
        if let Notification::Mutation(record) = &*notification {
            pending.push(record.clone());
        }

        if let Notification::Selection(selection) = &*notification {
            self.pointer.on_selection(*selection);
            if pending.is_empty() && self.scheduler.is_idle() && self.known_selection == Some(*selection) {
                tracing::trace!("Redundant selectionchange ignored");
                return Ok(());
            }
        }

        self.scheduler.note_activity(self.known_selection);

        match self.keyboard.start_kind(notification) {
            Some(StartKind::Cause) => {
                self.fold(&pending);
                self.resolve_segment(&[]);
                self.begin_segment(SegmentOwner::Keyboard, StartKind::Cause, &[]);
            }
            Some(StartKind::Effect) => {
                self.resolve_segment(&pending);
                self.begin_segment(SegmentOwner::Keyboard, StartKind::Effect, &pending);
                self.fold(&pending);
            }
            None => {
                if !pending.is_empty() && !self.keyboard.has_segment() {
                    self.begin_segment(SegmentOwner::Keyboard, StartKind::Effect, &pending);
                }
                self.fold(&pending);
            }
        }

        self.keyboard.handle(notification);
        self.route(notification);
        Ok(())
    }

    /// Advance the clock by one tick. Flushes the transaction once it has
    /// been quiet long enough.
    pub fn tick(&mut self) -> NormalizerResult<()> {
        self.ensure_live()?;

        let pending = self.root.take_mutation_records();
        if !pending.is_empty() {
            self.scheduler.note_activity(self.known_selection);
            if !self.keyboard.has_segment() {
                self.begin_segment(SegmentOwner::Keyboard, StartKind::Effect, &pending);
            }
            self.fold(&pending);
        }

        let hold = self.config.hold_open_compositions && self.keyboard.holds_transaction();
        if self.scheduler.tick(self.config.effective_quiescence_ticks(), hold) == TickOutcome::Quiescent {
            self.flush();
        }
        Ok(())
    }

    /// Tick until nothing is pending, up to `max_settle_ticks`
    pub fn settle(&mut self) -> NormalizerResult<()> {
        for _ in 0..self.config.max_settle_ticks {
            self.tick()?;
            if self.scheduler.is_idle() {
                return Ok(());
            }
        }
        tracing::debug!("Still collecting after {} ticks", self.config.max_settle_ticks);
        Ok(())
    }

    /// Detach from the root. Safe to call more than once.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.root.unsubscribe();
        self.scheduler.discard();
        self.collector.reset();
        self.collector.release_scratch();
        self.registry.clear();
        self.keyboard.reset();
        self.pointer.reset();
        self.clipboard.clear();
        self.known_selection = None;
        tracing::info!("Normalizer detached from {:?}", self.root.root_node());
    }

    // --- Segments ---

    fn fold(&mut self, records: &[MutationRecord<R::Node>]) {
        for record in records {
            self.collector.record(&self.root, &mut self.registry, record);
        }
    }

    fn begin_segment(&mut self, owner: SegmentOwner, kind: StartKind, pending: &[MutationRecord<R::Node>]) {
        let seq = self.scheduler.next_seq();
        let selection = match kind {
            StartKind::Cause => self.root.selection(),
            // The live selection already moved with the change
            StartKind::Effect => self.pointer.latest().or(self.known_selection),
        };

        let mut candidates = Vec::new();
        if let Some(selection) = selection {
            candidates.push(selection.anchor.node);
            candidates.push(selection.focus.node);
        }
        if let Some(node) = self.keyboard.placeholder_identity().and_then(|id| self.registry.node_of(id)) {
            candidates.push(node);
        }
        for node in candidates {
            if !self.root.contains(node) {
                continue;
            }
            let pending_old = pending
                .iter()
                .find(|r| r.kind == MutationKind::CharacterData && r.target == node)
                .and_then(|r| r.old_text.clone());
            if let Some(text) = pending_old.or_else(|| self.root.text(node)) {
                self.collector.prime(&mut self.registry, node, text);
            }
        }

        self.keyboard.begin(seq, owner, selection);
    }

    fn resolve_segment(&mut self, pending: &[MutationRecord<R::Node>]) {
        let Some(resolution) =
            self.keyboard
                .resolve(&self.root, &mut self.registry, &mut self.collector, pending)
        else {
            return;
        };
        if resolution.actions.is_empty() {
            return;
        }

        if let Some(start) = resolution.selection_at_start {
            if self.known_selection != Some(start) {
                let seq = self.pointer.last_gesture_seq().map_or(resolution.seq, |s| s.min(resolution.seq));
                if let Some(selection) = self.describe(start) {
                    self.scheduler.push(seq, NormalizedAction::SetSelection { selection });
                }
                self.known_selection = Some(start);
            }
        }
        for action in resolution.actions {
            self.scheduler.push(resolution.seq, action);
        }
    }

    fn describe(&self, selection: DomSelection<R::Node>) -> Option<SelectionDescription<R::Node>> {
        let direction = direction_of(&self.root, selection.anchor, selection.focus).ok()?;
        Some(SelectionDescription::new(selection.anchor, selection.focus, direction))
    }

    /// Report a selection the consumer has not seen before clipboard edits
    fn sync_selection(&mut self, seq: u64) {
        let Some(live) = self.root.selection() else {
            return;
        };
        if self.known_selection == Some(live) {
            return;
        }
        if let Some(selection) = self.describe(live) {
            self.scheduler.push(seq, NormalizedAction::SetSelection { selection });
            self.known_selection = Some(live);
        }
    }

    // --- Routing ---

    fn route(&mut self, notification: &mut Notification<R::Node>) {
        match notification {
            Notification::Key(ev) if ev.event_type == KeyboardEventType::KeyDown => {
                let seq = self.keyboard.segment_seq().unwrap_or_else(|| self.scheduler.next_seq());
                if is_select_all(ev, self.config.platform) {
                    let caret = self.known_selection.map(|s| s.focus);
                    self.pointer.on_select_all_key(seq, caret);
                } else if ev.key.is_navigation() {
                    self.pointer.on_navigation_key(seq);
                }
            }
            Notification::Pointer(ev) if ev.event_type == MouseEventType::PointerDown => {
                let seq = self.scheduler.next_seq();
                let caret = self.root.caret_from_point(ev.client_x, ev.client_y);
                self.pointer.on_press(seq, caret);
            }
            Notification::Touch(ev) if ev.event_type == TouchEventType::TouchStart => {
                let seq = self.scheduler.next_seq();
                let caret = ev.primary().and_then(|t| self.root.caret_from_point(t.client_x, t.client_y));
                self.pointer.on_press(seq, caret);
            }
            Notification::Clipboard(ev) => self.route_clipboard(ev),
            Notification::Drag(ev) => self.route_drag(ev),
            _ => {}
        }
    }

    /// Sequence number for a clipboard gesture: the keyboard segment that
    /// triggered it, or a segment of its own
    fn claim_segment(&mut self) -> u64 {
        if self.keyboard.claim_for_clipboard() {
            if let Some(seq) = self.keyboard.segment_seq() {
                return seq;
            }
        }
        self.resolve_segment(&[]);
        self.begin_segment(SegmentOwner::Clipboard, StartKind::Cause, &[]);
        self.keyboard.segment_seq().unwrap_or_else(|| self.scheduler.next_seq())
    }

    fn route_clipboard(&mut self, ev: &mut ClipboardEvent) {
        match ev.event_type {
            ClipboardEventType::BeforeCut => self.clipboard.before_cut(self.root.selection()),
            ClipboardEventType::Cut => {
                let seq = self.claim_segment();
                self.sync_selection(seq);
                for action in self.clipboard.cut() {
                    self.scheduler.push(seq, action);
                }
            }
            ClipboardEventType::Paste => {
                let seq = self.claim_segment();
                ev.prevent_default();
                self.sync_selection(seq);
                for action in self.clipboard.paste(&ev.data, &self.config) {
                    self.scheduler.push(seq, action);
                }
            }
        }
    }

    fn route_drag(&mut self, ev: &mut DragEvent) {
        match ev.event_type {
            DragEventType::DragStart => self.clipboard.drag_start(self.root.selection()),
            DragEventType::Drop => {
                let seq = self.claim_segment();
                ev.prevent_default();
                if self.clipboard.has_drag_source() {
                    self.sync_selection(seq);
                }
                let caret = self.root.caret_from_point(ev.client_x, ev.client_y);
                for action in self.clipboard.drop(&ev.data_transfer, caret, &self.config) {
                    self.scheduler.push(seq, action);
                }
            }
            DragEventType::DragEnd => self.clipboard.drag_end(),
        }
    }

    // --- Flush ---

    fn flush(&mut self) {
        self.resolve_segment(&[]);
        let Some(mut tx) = self.scheduler.begin_drain() else {
            return;
        };

        if !tx.has_edits {
            if let Some(action) = self.pointer.drain(&self.root, tx.pre_selection.as_ref()) {
                let seq = self.pointer.last_gesture_seq().unwrap_or_else(|| self.scheduler.next_seq());
                tx.push(seq, action);
            }
        }
        tx.touched.extend(self.collector.take_touched(&mut self.registry));

        let batch = self.scheduler.assemble(&self.root, &self.registry, tx);

        self.known_selection = self.root.selection();
        self.registry.sweep();
        self.collector.reset();
        self.pointer.reset();
        self.clipboard.reset();
        self.keyboard.end_transaction();
        self.scheduler.finish_drain();

        if let Some(batch) = batch {
            tracing::debug!(
                "Flushing batch: {:?} ({} mutated)",
                batch.action_names(),
                batch.mutated_elements.len()
            );
            (self.on_batch)(batch);
        }
    }
}
