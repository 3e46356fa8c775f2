//! Pointer and selection classifier
//!
//! Selection changes are not reported as they happen. The classifier
//! remembers which gesture moved the selection and, when the transaction
//! drains without edits, compares the live selection with the one the
//! transaction started from.

use std::cmp::Ordering;

use crate::action::{Direction, DomPoint, NormalizedAction, SelectionDescription};
use crate::notification::DomSelection;
use crate::root::{EditableRoot, compare_points, content_boundary, direction_of};

#[derive(Debug)]
pub(crate) struct PointerClassifier<N> {
    /// Sequence number of the last pointer, touch or navigation gesture
    last_gesture_seq: Option<u64>,
    /// Caret under the last pointerdown/touchstart
    gesture_caret: Option<DomPoint<N>>,
    /// Caret before a keyboard select-all. Only one of the two carets is
    /// set: the most recent gesture wins.
    select_all_caret: Option<DomPoint<N>>,
    /// Latest selectionchange snapshot
    latest: Option<DomSelection<N>>,
}

impl<N> Default for PointerClassifier<N> {
    fn default() -> Self {
        Self {
            last_gesture_seq: None,
            gesture_caret: None,
            select_all_caret: None,
            latest: None,
        }
    }
}

impl<N: Copy + Eq + std::hash::Hash + std::fmt::Debug> PointerClassifier<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_gesture_seq(&self) -> Option<u64> {
        self.last_gesture_seq
    }

    pub fn latest(&self) -> Option<DomSelection<N>> {
        self.latest
    }

    /// pointerdown or touchstart
    pub fn on_press(&mut self, seq: u64, caret: Option<DomPoint<N>>) {
        self.last_gesture_seq = Some(seq);
        self.gesture_caret = caret;
        self.select_all_caret = None;
    }

    /// Arrow keys, Home/End and friends
    pub fn on_navigation_key(&mut self, seq: u64) {
        self.last_gesture_seq = Some(seq);
    }

    pub fn on_select_all_key(&mut self, seq: u64, caret: Option<DomPoint<N>>) {
        self.last_gesture_seq = Some(seq);
        self.select_all_caret = caret;
        self.gesture_caret = None;
    }

    pub fn on_selection(&mut self, selection: DomSelection<N>) {
        self.latest = Some(selection);
    }

    /// Selection action for a transaction that made no edits
    pub fn drain<R: EditableRoot<Node = N>>(
        &self,
        root: &R,
        pre_selection: Option<&DomSelection<N>>,
    ) -> Option<NormalizedAction<N>> {
        let live = root
            .selection()
            .or(self.latest)
            .or_else(|| self.gesture_caret.map(|caret| DomSelection::new(caret, caret)))?;
        if pre_selection == Some(&live) {
            return None;
        }
        if !root.contains(live.anchor.node) || !root.contains(live.focus.node) {
            tracing::trace!("Selection left the editable root, not reported");
            return None;
        }
        let direction = direction_of(root, live.anchor, live.focus).ok()?;

        if !live.is_collapsed() && covers_content(root, &live, direction) {
            if let Some((start, end)) = content_boundary(root) {
                let selection = match direction {
                    Direction::Forward => SelectionDescription::new(start, end, Direction::Forward),
                    Direction::Backward => SelectionDescription::new(end, start, Direction::Backward),
                };
                let caret_position = self
                    .gesture_caret
                    .or(self.select_all_caret)
                    .or_else(|| pre_selection.map(|s| s.focus));
                return Some(NormalizedAction::SelectAll { caret_position, selection });
            }
        }

        Some(NormalizedAction::SetSelection {
            selection: SelectionDescription::new(live.anchor, live.focus, direction),
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// The selection reaches from the first visible leaf to the last
/// meaningful one
fn covers_content<R: EditableRoot>(root: &R, selection: &DomSelection<R::Node>, direction: Direction) -> bool {
    let Some((start, end)) = content_boundary(root) else {
        return false;
    };
    let (low, high) = match direction {
        Direction::Forward => (selection.anchor, selection.focus),
        Direction::Backward => (selection.focus, selection.anchor),
    };
    let starts = compare_points(root, low, start).is_ok_and(|o| o != Ordering::Greater);
    let ends = compare_points(root, high, end).is_ok_and(|o| o != Ordering::Less);
    starts && ends
}
