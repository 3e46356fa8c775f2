//! Normalized actions and batches
//!
//! The closed vocabulary handed to the consumer. Everything here is plain
//! data and serializes with serde, so batches can be recorded and replayed.

use std::collections::HashSet;
use std::hash::Hash;

use fos_events::FileInfo;
use serde::{Deserialize, Serialize};

/// Position inside a node: chars for text nodes, child index for elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DomPoint<N> {
    pub node: N,
    pub offset: u32,
}

impl<N> DomPoint<N> {
    pub fn new(node: N, offset: u32) -> Self {
        Self { node, offset }
    }
}

/// Selection direction in document order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Forward,
    Backward,
}

/// Anchor/focus pair with its document-order direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionDescription<N> {
    pub anchor_node: N,
    pub anchor_offset: u32,
    pub focus_node: N,
    pub focus_offset: u32,
    pub direction: Direction,
}

impl<N: Copy> SelectionDescription<N> {
    /// Build from points whose order has already been compared
    pub fn new(anchor: DomPoint<N>, focus: DomPoint<N>, direction: Direction) -> Self {
        Self {
            anchor_node: anchor.node,
            anchor_offset: anchor.offset,
            focus_node: focus.node,
            focus_offset: focus.offset,
            direction,
        }
    }

    /// Caret at one point
    pub fn caret(point: DomPoint<N>) -> Self {
        Self::new(point, point, Direction::Forward)
    }

    pub fn anchor(&self) -> DomPoint<N> {
        DomPoint::new(self.anchor_node, self.anchor_offset)
    }

    pub fn focus(&self) -> DomPoint<N> {
        DomPoint::new(self.focus_node, self.focus_offset)
    }
}

/// Semantic edit action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum NormalizedAction<N> {
    SetSelection {
        selection: SelectionDescription<N>,
    },
    SelectAll {
        /// Caret before the native selection expansion
        caret_position: Option<DomPoint<N>>,
        selection: SelectionDescription<N>,
    },
    InsertText {
        text: String,
        html: Option<String>,
    },
    InsertParagraphBreak,
    DeleteContent {
        direction: Direction,
    },
    DeleteWord {
        direction: Direction,
        text: String,
    },
    DeleteHardLine {
        direction: Direction,
        selection: SelectionDescription<N>,
    },
    DeleteSoftLine {
        direction: Direction,
        selection: SelectionDescription<N>,
    },
    ApplyFormat {
        format: String,
        data: Option<String>,
    },
    InsertHtml {
        html: String,
        text: String,
    },
    InsertFiles {
        files: Vec<FileInfo>,
    },
    HistoryUndo,
    HistoryRedo,
}

impl<N> NormalizedAction<N> {
    /// Plain text insertion
    pub fn insert_text(text: impl Into<String>) -> Self {
        Self::InsertText { text: text.into(), html: None }
    }

    /// Action name as reported to consumers (`"insertText"`, ...)
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetSelection { .. } => "setSelection",
            Self::SelectAll { .. } => "selectAll",
            Self::InsertText { .. } => "insertText",
            Self::InsertParagraphBreak => "insertParagraphBreak",
            Self::DeleteContent { .. } => "deleteContent",
            Self::DeleteWord { .. } => "deleteWord",
            Self::DeleteHardLine { .. } => "deleteHardLine",
            Self::DeleteSoftLine { .. } => "deleteSoftLine",
            Self::ApplyFormat { .. } => "applyFormat",
            Self::InsertHtml { .. } => "insertHtml",
            Self::InsertFiles { .. } => "insertFiles",
            Self::HistoryUndo => "historyUndo",
            Self::HistoryRedo => "historyRedo",
        }
    }

    /// Selection moves, as opposed to content edits
    pub fn is_selection(&self) -> bool {
        matches!(self, Self::SetSelection { .. } | Self::SelectAll { .. })
    }
}

/// One flushed gesture
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(
    serialize = "N: Serialize",
    deserialize = "N: Deserialize<'de> + Eq + Hash"
))]
pub struct EventBatch<N> {
    /// Never empty
    pub actions: Vec<NormalizedAction<N>>,
    /// Live nodes mutated while producing the actions
    pub mutated_elements: HashSet<N>,
}

impl<N: Eq + Hash> PartialEq for EventBatch<N> {
    fn eq(&self, other: &Self) -> bool {
        self.actions == other.actions && self.mutated_elements == other.mutated_elements
    }
}

impl<N> EventBatch<N> {
    pub fn action_names(&self) -> Vec<&'static str> {
        self.actions.iter().map(NormalizedAction::name).collect()
    }
}
