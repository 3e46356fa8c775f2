//! Keyboard and composition classifier
//!
//! Splits the key, composition and input streams into segments (one per
//! user gesture) and resolves each segment, together with the text changes
//! it caused, into normalized actions.
//!
//! A segment is started either by a *cause* (keydown, beforeinput,
//! compositionstart: the DOM has not changed yet) or by an *effect* (an
//! input or mutation arriving with nothing to attach to: the DOM already
//! changed). The normalizer uses the distinction to decide which mutation
//! records belong to the segment being closed.

mod composition;
mod rules;

use fos_events::{
    CompositionEventType, Event, InputEvent, InputEventType, InputType, Key, KeyboardEvent,
    KeyboardEventType,
};

use crate::action::{Direction, DomPoint, NormalizedAction, SelectionDescription};
use crate::config::Platform;
use crate::diff::{DiffCollector, TextChange};
use crate::notification::{DomSelection, MutationRecord, Notification};
use crate::registry::{Identity, NodeRegistry};
use crate::root::{EditableRoot, direction_of};

use composition::Placeholder;
use rules::{Granularity, Intent};

pub(crate) use rules::is_select_all;

/// Classifier lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentState {
    /// No gesture in progress
    #[default]
    Idle,
    /// A segment is collecting notifications
    AwaitingResolution,
    /// The last segment was resolved; its transaction has not flushed yet
    Resolved,
}

/// How a notification relates to the current segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StartKind {
    /// Starts a segment before the DOM changes
    Cause,
    /// Starts a segment after the DOM already changed
    Effect,
}

/// Who classifies the segment's outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SegmentOwner {
    Keyboard,
    /// Cut, paste or drop: the clipboard classifier emits the actions
    Clipboard,
}

/// Composition state carried by a segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Composition {
    /// Started by a dead key rather than an IME
    pub dead_key: bool,
    /// First non-empty composition data
    pub first_data: Option<String>,
    pub data: String,
    pub ended: bool,
}

#[derive(Debug)]
struct Segment<N> {
    seq: u64,
    owner: SegmentOwner,
    keydown: Option<KeyboardEvent>,
    keypress_canceled: bool,
    before_input: Option<InputEvent>,
    input: Option<InputEvent>,
    composition: Option<Composition>,
    selection_at_start: Option<DomSelection<N>>,
}

impl<N> Segment<N> {
    fn composition_open(&self) -> bool {
        self.composition.as_ref().is_some_and(|c| !c.ended)
    }

    fn input_type(&self) -> Option<&InputType> {
        self.before_input
            .as_ref()
            .and_then(|ev| ev.input_type.as_ref())
            .or_else(|| self.input.as_ref().and_then(|ev| ev.input_type.as_ref()))
    }

    fn input_data(&self) -> Option<&str> {
        self.before_input
            .as_ref()
            .and_then(|ev| ev.data.as_deref())
            .or_else(|| self.input.as_ref().and_then(|ev| ev.data.as_deref()))
    }
}

/// Actions produced by one resolved segment
#[derive(Debug)]
pub(crate) struct Resolution<N> {
    pub seq: u64,
    pub selection_at_start: Option<DomSelection<N>>,
    pub actions: Vec<NormalizedAction<N>>,
}

/// Segments keyboard, composition and input notifications
#[derive(Debug)]
pub(crate) struct KeyboardClassifier<N> {
    platform: Platform,
    state: SegmentState,
    segment: Option<Segment<N>>,
    /// Open composition carried over a flush
    carried: Option<Composition>,
    /// Provisional composition text already emitted
    placeholder: Option<Placeholder>,
}

impl<N: Copy + Eq + std::hash::Hash + std::fmt::Debug> KeyboardClassifier<N> {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            state: SegmentState::Idle,
            segment: None,
            carried: None,
            placeholder: None,
        }
    }

    pub fn state(&self) -> SegmentState {
        self.state
    }

    pub fn has_segment(&self) -> bool {
        self.segment.is_some()
    }

    pub fn segment_seq(&self) -> Option<u64> {
        self.segment.as_ref().map(|s| s.seq)
    }

    /// An IME composition is in progress and the transaction should wait
    /// for it. Dead keys never hold: their placeholder is flushed.
    pub fn holds_transaction(&self) -> bool {
        self.segment
            .as_ref()
            .and_then(|s| s.composition.as_ref())
            .is_some_and(|c| !c.ended && !c.dead_key)
    }

    /// Node holding the provisional composition text, if still known
    pub fn placeholder_identity(&self) -> Option<Identity> {
        self.placeholder.as_ref().map(|p| p.node)
    }

    /// Whether `notification` starts a new segment, and how
    pub fn start_kind(&self, notification: &Notification<N>) -> Option<StartKind> {
        let segment = self.segment.as_ref();
        match notification {
            Notification::Key(ev) => match ev.event_type {
                KeyboardEventType::KeyDown => {
                    if segment.is_some_and(Segment::composition_open) {
                        None
                    } else {
                        Some(StartKind::Cause)
                    }
                }
                KeyboardEventType::KeyPress => segment.is_none().then_some(StartKind::Cause),
                KeyboardEventType::KeyUp => None,
            },
            Notification::Composition(ev) => match ev.event_type {
                CompositionEventType::CompositionStart => match segment {
                    Some(s)
                        if s.composition.is_none()
                            && s.input.is_none()
                            && s.owner == SegmentOwner::Keyboard =>
                    {
                        None
                    }
                    _ => Some(StartKind::Cause),
                },
                CompositionEventType::CompositionUpdate | CompositionEventType::CompositionEnd => {
                    (segment.is_none() && self.carried.is_none()).then_some(StartKind::Cause)
                }
            },
            Notification::Input(ev) => match ev.event_type {
                InputEventType::BeforeInput => self.before_input_start(segment, ev),
                InputEventType::Input => self.input_start(segment, ev),
            },
            Notification::Mutation(_) => segment.is_none().then_some(StartKind::Effect),
            _ => None,
        }
    }

    fn before_input_start(&self, segment: Option<&Segment<N>>, ev: &InputEvent) -> Option<StartKind> {
        let Some(segment) = segment else {
            return Some(StartKind::Cause);
        };
        let compositional = ev.is_composing || ev.input_type.as_ref().is_some_and(InputType::is_composition);
        match &segment.composition {
            Some(c) if !c.ended => None,
            // A trailing separator after the composition is its own gesture
            Some(_) => (!compositional).then_some(StartKind::Cause),
            None => (segment.before_input.is_some() || segment.input.is_some()).then_some(StartKind::Cause),
        }
    }

    fn input_start(&self, segment: Option<&Segment<N>>, ev: &InputEvent) -> Option<StartKind> {
        let Some(segment) = segment else {
            return Some(StartKind::Effect);
        };
        match &segment.composition {
            Some(c) => {
                let typed_outside = ev
                    .input_type
                    .as_ref()
                    .is_some_and(|t| !t.is_composition())
                    && !ev.is_composing;
                (c.ended && typed_outside).then_some(StartKind::Effect)
            }
            None => segment.input.is_some().then_some(StartKind::Effect),
        }
    }

    /// Open a segment. An open composition carried over a flush continues
    /// in it.
    pub fn begin(&mut self, seq: u64, owner: SegmentOwner, selection_at_start: Option<DomSelection<N>>) {
        if let Some(previous) = &self.segment {
            tracing::debug!("Segment {} replaced before resolution", previous.seq);
        }
        let composition = self.carried.take();
        tracing::trace!("Segment {} started ({:?})", seq, owner);
        self.segment = Some(Segment {
            seq,
            owner,
            keydown: None,
            keypress_canceled: false,
            before_input: None,
            input: None,
            composition,
            selection_at_start,
        });
        self.state = SegmentState::AwaitingResolution;
    }

    /// Record a notification into the current segment
    pub fn handle(&mut self, notification: &Notification<N>) {
        let Some(segment) = self.segment.as_mut() else {
            return;
        };
        match notification {
            Notification::Key(ev) => match ev.event_type {
                KeyboardEventType::KeyDown => {
                    if segment.keydown.is_none() && !segment.composition_open() {
                        segment.keydown = Some(ev.clone());
                    }
                }
                KeyboardEventType::KeyPress => {
                    if ev.default_prevented() {
                        segment.keypress_canceled = true;
                    }
                }
                KeyboardEventType::KeyUp => {}
            },
            Notification::Composition(ev) => match ev.event_type {
                CompositionEventType::CompositionStart => {
                    if segment.composition.is_none() {
                        let dead_key = segment.keydown.as_ref().is_some_and(|k| k.key == Key::Dead);
                        segment.composition = Some(Composition {
                            dead_key,
                            first_data: (!ev.data.is_empty()).then(|| ev.data.clone()),
                            data: ev.data.clone(),
                            ended: false,
                        });
                    }
                }
                CompositionEventType::CompositionUpdate => {
                    if let Some(c) = segment.composition.as_mut() {
                        if c.first_data.is_none() && !ev.data.is_empty() {
                            c.first_data = Some(ev.data.clone());
                        }
                        c.data = ev.data.clone();
                    }
                }
                CompositionEventType::CompositionEnd => {
                    if let Some(c) = segment.composition.as_mut() {
                        c.data = ev.data.clone();
                        c.ended = true;
                    }
                }
            },
            Notification::Input(ev) => match ev.event_type {
                InputEventType::BeforeInput => {
                    if segment.before_input.is_none() {
                        segment.before_input = Some(ev.clone());
                    }
                }
                InputEventType::Input => segment.input = Some(ev.clone()),
            },
            _ => {}
        }
    }

    /// Hand the current segment to the clipboard classifier when it has
    /// not produced any input of its own yet
    pub fn claim_for_clipboard(&mut self) -> bool {
        match self.segment.as_mut() {
            Some(segment)
                if segment.owner == SegmentOwner::Keyboard
                    && segment.composition.is_none()
                    && segment.before_input.is_none()
                    && segment.input.is_none() =>
            {
                segment.owner = SegmentOwner::Clipboard;
                true
            }
            _ => false,
        }
    }

    /// Close the current segment and classify it.
    ///
    /// Text changes are taken from `collector`; `pending` holds mutation
    /// records that belong to the next segment.
    pub fn resolve<R: EditableRoot<Node = N>>(
        &mut self,
        root: &R,
        registry: &mut NodeRegistry<N>,
        collector: &mut DiffCollector<N>,
        pending: &[MutationRecord<N>],
    ) -> Option<Resolution<N>> {
        let segment = self.segment.take()?;
        self.state = SegmentState::Resolved;
        let changes = collector.checkpoint(root, registry, pending);

        if segment.owner == SegmentOwner::Clipboard {
            tracing::trace!("Segment {} owned by clipboard, {} text changes absorbed", segment.seq, changes.len());
            return None;
        }

        let actions = match segment.composition.clone() {
            Some(c) if !c.ended => self.flush_open_composition(registry, c, &changes),
            Some(c) => self.resolve_composition(registry, &c, &changes),
            None => self.resolve_edit(root, &segment, &changes),
        };
        tracing::trace!("Segment {} resolved to {} actions", segment.seq, actions.len());

        Some(Resolution {
            seq: segment.seq,
            selection_at_start: segment.selection_at_start,
            actions,
        })
    }

    fn flush_open_composition(
        &mut self,
        registry: &mut NodeRegistry<N>,
        composition: Composition,
        changes: &[TextChange<N>],
    ) -> Vec<NormalizedAction<N>> {
        let (actions, placeholder) = composition::provisional(registry, self.placeholder.as_ref(), changes);
        tracing::debug!("Composition still open, flushing {:?} provisionally", composition.data);
        self.placeholder = placeholder;
        self.carried = Some(composition);
        actions
    }

    fn resolve_composition(
        &mut self,
        registry: &NodeRegistry<N>,
        composition: &Composition,
        changes: &[TextChange<N>],
    ) -> Vec<NormalizedAction<N>> {
        if let Some(placeholder) = self.placeholder.take() {
            if let Some(actions) = composition::replace_placeholder(registry, &placeholder, changes) {
                return actions;
            }
            tracing::debug!("Composition placeholder {:?} not found in changes", placeholder.text);
        }
        if composition.dead_key {
            if let Some(actions) = composition::dead_key_in_one_gesture(composition, changes) {
                return actions;
            }
        }
        composition::resolve_changes(changes)
    }

    fn resolve_edit<R: EditableRoot<Node = N>>(
        &self,
        root: &R,
        segment: &Segment<N>,
        changes: &[TextChange<N>],
    ) -> Vec<NormalizedAction<N>> {
        let evidence = !changes.is_empty() || segment.input.is_some();
        let key_intent = segment.keydown.as_ref().and_then(|k| rules::match_key(k, self.platform));

        let typed_intent = match segment.input_type() {
            Some(input_type) => match rules::match_input_type(input_type) {
                Some(intent) => Some(intent),
                None => {
                    if let Some(format) = input_type.format_name() {
                        return vec![NormalizedAction::ApplyFormat {
                            format: format.to_string(),
                            data: segment.input_data().map(str::to_string),
                        }];
                    }
                    tracing::debug!("Unrecognized inputType {:?}, no action", input_type.as_str());
                    return Vec::new();
                }
            },
            None => None,
        };

        let intent = match (key_intent, typed_intent) {
            (Some(key), typed) if key.is_modifier_delete() && typed.is_none_or(|t| t.is_delete()) => Some(key),
            (_, Some(typed)) => Some(typed),
            (key, None) => key,
        };

        match intent {
            None | Some(Intent::Composition) => self.infer_from_changes(segment, changes),
            Some(Intent::Clipboard) => Vec::new(),
            Some(Intent::Format(format)) if typed_intent.is_some() || evidence => {
                vec![NormalizedAction::ApplyFormat {
                    format: format.to_string(),
                    data: segment.input_data().map(str::to_string),
                }]
            }
            Some(Intent::Undo) if typed_intent.is_some() || evidence => vec![NormalizedAction::HistoryUndo],
            Some(Intent::Redo) if typed_intent.is_some() || evidence => vec![NormalizedAction::HistoryRedo],
            Some(_) if !evidence => {
                if segment.keypress_canceled {
                    tracing::trace!("Keypress canceled by host, segment {} has no effect", segment.seq);
                }
                Vec::new()
            }
            Some(Intent::InsertText) => {
                let inserted: String = changes.iter().map(|c| c.inserted.as_str()).collect();
                let text = if !inserted.is_empty() {
                    inserted
                } else if let Some(data) = segment.input_data() {
                    data.to_string()
                } else {
                    segment
                        .keydown
                        .as_ref()
                        .and_then(|k| k.key.as_char())
                        .map(String::from)
                        .unwrap_or_default()
                };
                if text.is_empty() {
                    Vec::new()
                } else {
                    vec![NormalizedAction::insert_text(text)]
                }
            }
            Some(Intent::Replace) => {
                if changes.is_empty() {
                    segment
                        .input_data()
                        .map(|data| vec![NormalizedAction::insert_text(data)])
                        .unwrap_or_default()
                } else {
                    composition::resolve_changes(changes)
                }
            }
            Some(Intent::InsertLineBreak) => vec![NormalizedAction::InsertText {
                text: "\n".into(),
                html: Some("<br>".into()),
            }],
            Some(Intent::InsertParagraph) => vec![NormalizedAction::InsertParagraphBreak],
            Some(Intent::Delete(Granularity::Character, direction)) => {
                vec![NormalizedAction::DeleteContent { direction }]
            }
            Some(Intent::Delete(Granularity::Word, direction)) => {
                let text: String = changes.iter().map(|c| c.removed.as_str()).collect();
                if text.is_empty() {
                    tracing::debug!("Word delete in segment {} removed nothing", segment.seq);
                    return Vec::new();
                }
                vec![NormalizedAction::DeleteWord { direction, text }]
            }
            Some(Intent::Delete(granularity, direction)) => {
                let Some(selection) = line_selection(root, segment, changes) else {
                    tracing::debug!("Line delete in segment {} without a range", segment.seq);
                    return Vec::new();
                };
                match granularity {
                    Granularity::HardLine => vec![NormalizedAction::DeleteHardLine { direction, selection }],
                    _ => vec![NormalizedAction::DeleteSoftLine { direction, selection }],
                }
            }
            // Guarded arms above fall through here without evidence
            Some(Intent::Format(_) | Intent::Undo | Intent::Redo) => Vec::new(),
        }
    }

    /// No explicit intent: classify from what changed
    fn infer_from_changes(&self, segment: &Segment<N>, changes: &[TextChange<N>]) -> Vec<NormalizedAction<N>> {
        let Some(change) = changes.first() else {
            let quiet_key = segment.keydown.as_ref().is_none_or(|k| {
                rules::is_selection_key(k, self.platform) || k.key.as_char().is_none()
            });
            if !quiet_key || segment.input_type().is_some() {
                tracing::debug!("Segment {} matched no rule and changed nothing", segment.seq);
            }
            return Vec::new();
        };

        if changes.iter().all(TextChange::is_insertion) {
            let text: String = changes.iter().map(|c| c.inserted.as_str()).collect();
            return vec![NormalizedAction::insert_text(text)];
        }
        if change.is_replacement() {
            return vec![NormalizedAction::insert_text(change.inserted.clone())];
        }
        if change.is_removal() {
            let direction = removal_direction(segment, change);
            let caret = segment.selection_at_start.as_ref().is_none_or(DomSelection::is_collapsed);
            if caret && change.removed.chars().count() > 1 {
                return vec![NormalizedAction::DeleteWord {
                    direction,
                    text: change.removed.clone(),
                }];
            }
            return vec![NormalizedAction::DeleteContent { direction }];
        }
        Vec::new()
    }

    /// Forget the current segment and any carried composition
    pub fn reset(&mut self) {
        self.segment = None;
        self.carried = None;
        self.placeholder = None;
        self.state = SegmentState::Idle;
    }

    /// The transaction flushed; a carried composition survives
    pub fn end_transaction(&mut self) {
        if self.segment.is_none() {
            self.state = SegmentState::Idle;
        }
    }
}

/// BACKWARD when the removed text ended at the caret
fn removal_direction<N: Copy + PartialEq>(segment: &Segment<N>, change: &TextChange<N>) -> Direction {
    let Some(selection) = &segment.selection_at_start else {
        return Direction::Backward;
    };
    let caret = selection.focus;
    let end = change.offset + change.removed.chars().count();
    if caret.node == change.node && caret.offset as usize == change.offset && end != change.offset {
        Direction::Forward
    } else {
        Direction::Backward
    }
}

/// Range removed by a line delete: the observed removal, else the
/// selection the gesture started from
fn line_selection<R: EditableRoot>(
    root: &R,
    segment: &Segment<R::Node>,
    changes: &[TextChange<R::Node>],
) -> Option<SelectionDescription<R::Node>> {
    if let Some(change) = changes.iter().find(|c| c.is_removal()) {
        let end = change.offset + change.removed.chars().count();
        return Some(SelectionDescription::new(
            DomPoint::new(change.node, change.offset as u32),
            DomPoint::new(change.node, end as u32),
            Direction::Forward,
        ));
    }
    let selection = segment.selection_at_start?;
    let direction = direction_of(root, selection.anchor, selection.focus).ok()?;
    Some(SelectionDescription::new(selection.anchor, selection.focus, direction))
}
