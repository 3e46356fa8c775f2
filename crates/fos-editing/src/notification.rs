//! Raw notifications
//!
//! Everything the normalizer observes on an editable root, as one tagged
//! union. Browser events come from `fos-events`; mutation records and
//! selection snapshots are expressed over the host's node type.

use fos_events::{
    ClipboardEvent, ClipboardEventType, CompositionEvent, CompositionEventType, DragEvent,
    DragEventType, InputEvent, InputEventType, KeyboardEvent, KeyboardEventType, MouseEvent,
    MouseEventType, TouchEvent, TouchEventType,
};
use serde::{Deserialize, Serialize};

use crate::action::DomPoint;

/// Raw notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Notification<N> {
    Key(KeyboardEvent),
    Composition(CompositionEvent),
    Input(InputEvent),
    Mutation(MutationRecord<N>),
    Selection(DomSelection<N>),
    Pointer(MouseEvent),
    Touch(TouchEvent),
    Clipboard(ClipboardEvent),
    Drag(DragEvent),
}

impl<N> Notification<N> {
    pub fn kind(&self) -> NotificationKind {
        use NotificationKind as K;
        match self {
            Self::Key(ev) => match ev.event_type {
                KeyboardEventType::KeyDown => K::KeyDown,
                KeyboardEventType::KeyPress => K::KeyPress,
                KeyboardEventType::KeyUp => K::KeyUp,
            },
            Self::Composition(ev) => match ev.event_type {
                CompositionEventType::CompositionStart => K::CompositionStart,
                CompositionEventType::CompositionUpdate => K::CompositionUpdate,
                CompositionEventType::CompositionEnd => K::CompositionEnd,
            },
            Self::Input(ev) => match ev.event_type {
                InputEventType::BeforeInput => K::BeforeInput,
                InputEventType::Input => K::Input,
            },
            Self::Mutation(record) => match record.kind {
                MutationKind::CharacterData => K::CharacterData,
                MutationKind::ChildList => K::ChildList,
            },
            Self::Selection(_) => K::SelectionChange,
            Self::Pointer(ev) => match ev.event_type {
                MouseEventType::PointerDown => K::PointerDown,
                MouseEventType::Click => K::Click,
                MouseEventType::ContextMenu => K::ContextMenu,
                MouseEventType::PointerUp => K::PointerUp,
            },
            Self::Touch(ev) => match ev.event_type {
                TouchEventType::TouchStart => K::TouchStart,
                TouchEventType::TouchEnd => K::TouchEnd,
            },
            Self::Clipboard(ev) => match ev.event_type {
                ClipboardEventType::BeforeCut => K::BeforeCut,
                ClipboardEventType::Cut => K::Cut,
                ClipboardEventType::Paste => K::Paste,
            },
            Self::Drag(ev) => match ev.event_type {
                DragEventType::DragStart => K::DragStart,
                DragEventType::Drop => K::Drop,
                DragEventType::DragEnd => K::DragEnd,
            },
        }
    }
}

/// Mutation record kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationKind {
    CharacterData,
    ChildList,
}

/// Mutation record over the host's node type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationRecord<N> {
    pub kind: MutationKind,
    pub target: N,
    /// Text before the change, when the host records it
    pub old_text: Option<String>,
    pub new_text: Option<String>,
    pub added_nodes: Vec<N>,
    pub removed_nodes: Vec<N>,
    pub previous_sibling: Option<N>,
    pub next_sibling: Option<N>,
}

impl<N> MutationRecord<N> {
    pub fn character_data(target: N, old_text: Option<String>, new_text: Option<String>) -> Self {
        Self {
            kind: MutationKind::CharacterData,
            target,
            old_text,
            new_text,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            previous_sibling: None,
            next_sibling: None,
        }
    }

    pub fn child_list(
        target: N,
        added_nodes: Vec<N>,
        removed_nodes: Vec<N>,
        previous_sibling: Option<N>,
        next_sibling: Option<N>,
    ) -> Self {
        Self {
            kind: MutationKind::ChildList,
            target,
            old_text: None,
            new_text: None,
            added_nodes,
            removed_nodes,
            previous_sibling,
            next_sibling,
        }
    }
}

/// Live selection as anchor/focus points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomSelection<N> {
    pub anchor: DomPoint<N>,
    pub focus: DomPoint<N>,
}

impl<N: PartialEq> DomSelection<N> {
    pub fn new(anchor: DomPoint<N>, focus: DomPoint<N>) -> Self {
        Self { anchor, focus }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

/// Where a notification kind is listened for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenTarget {
    /// Event listener on the editable root
    Root,
    /// Event listener on the owning document
    Document,
    /// Mutation observer on the root subtree
    Observer,
}

/// Every raw notification kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    KeyDown,
    KeyPress,
    KeyUp,
    CompositionStart,
    CompositionUpdate,
    CompositionEnd,
    BeforeInput,
    Input,
    ChildList,
    CharacterData,
    SelectionChange,
    PointerDown,
    Click,
    ContextMenu,
    PointerUp,
    TouchStart,
    TouchEnd,
    DragStart,
    DragEnd,
    Drop,
    BeforeCut,
    Cut,
    Paste,
}

/// The exact set of kinds a normalizer subscribes to
pub const SUBSCRIBED_KINDS: &[NotificationKind] = &[
    NotificationKind::KeyDown,
    NotificationKind::KeyPress,
    NotificationKind::KeyUp,
    NotificationKind::CompositionStart,
    NotificationKind::CompositionUpdate,
    NotificationKind::CompositionEnd,
    NotificationKind::BeforeInput,
    NotificationKind::Input,
    NotificationKind::ChildList,
    NotificationKind::CharacterData,
    NotificationKind::SelectionChange,
    NotificationKind::PointerDown,
    NotificationKind::Click,
    NotificationKind::ContextMenu,
    NotificationKind::PointerUp,
    NotificationKind::TouchStart,
    NotificationKind::TouchEnd,
    NotificationKind::DragStart,
    NotificationKind::DragEnd,
    NotificationKind::Drop,
    NotificationKind::BeforeCut,
    NotificationKind::Cut,
    NotificationKind::Paste,
];

impl NotificationKind {
    /// DOM event name, or the observer option for mutations
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::KeyDown => "keydown",
            Self::KeyPress => "keypress",
            Self::KeyUp => "keyup",
            Self::CompositionStart => "compositionstart",
            Self::CompositionUpdate => "compositionupdate",
            Self::CompositionEnd => "compositionend",
            Self::BeforeInput => "beforeinput",
            Self::Input => "input",
            Self::ChildList => "childList",
            Self::CharacterData => "characterData",
            Self::SelectionChange => "selectionchange",
            Self::PointerDown => "pointerdown",
            Self::Click => "click",
            Self::ContextMenu => "contextmenu",
            Self::PointerUp => "pointerup",
            Self::TouchStart => "touchstart",
            Self::TouchEnd => "touchend",
            Self::DragStart => "dragstart",
            Self::DragEnd => "dragend",
            Self::Drop => "drop",
            Self::BeforeCut => "beforecut",
            Self::Cut => "cut",
            Self::Paste => "paste",
        }
    }

    pub fn target(&self) -> ListenTarget {
        match self {
            Self::ChildList | Self::CharacterData => ListenTarget::Observer,
            Self::SelectionChange => ListenTarget::Document,
            _ => ListenTarget::Root,
        }
    }
}
