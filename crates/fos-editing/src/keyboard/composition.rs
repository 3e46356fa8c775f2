//! Composition resolution
//!
//! Turns the text changes observed over a composition (or a spellcheck
//! replacement) into actions a consumer can replay: a selection over what
//! was replaced followed by the replacement text.

use crate::action::{Direction, DomPoint, NormalizedAction, SelectionDescription};
use crate::diff::TextChange;
use crate::registry::{Identity, NodeRegistry};

use super::Composition;

/// Provisional composition text already reported as `insertText`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Placeholder {
    pub node: Identity,
    pub offset: usize,
    pub text: String,
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Forward selection over `len` chars starting at `offset`
fn span<N: Copy>(node: N, offset: usize, len: usize) -> SelectionDescription<N> {
    SelectionDescription::new(
        DomPoint::new(node, offset as u32),
        DomPoint::new(node, (offset + len) as u32),
        Direction::Forward,
    )
}

/// Composition still open when the gesture went quiet: report what is on
/// screen now and remember it, so the final text can replace it later.
pub(crate) fn provisional<N: Copy + Eq + std::hash::Hash>(
    registry: &mut NodeRegistry<N>,
    previous: Option<&Placeholder>,
    changes: &[TextChange<N>],
) -> (Vec<NormalizedAction<N>>, Option<Placeholder>) {
    if let Some(previous) = previous {
        if let Some(actions) = replace_placeholder(registry, previous, changes) {
            let placeholder = changes
                .iter()
                .find(|c| c.offset == previous.offset && c.removed == previous.text)
                .map(|c| Placeholder {
                    node: registry.identity_of(c.node),
                    offset: c.offset,
                    text: c.inserted.clone(),
                });
            return (actions, placeholder);
        }
        if changes.is_empty() {
            return (Vec::new(), Some(previous.clone()));
        }
    }
    let Some(change) = changes.iter().find(|c| c.is_insertion()) else {
        return (Vec::new(), None);
    };
    let placeholder = Placeholder {
        node: registry.identity_of(change.node),
        offset: change.offset,
        text: change.inserted.clone(),
    };
    (vec![NormalizedAction::insert_text(change.inserted.clone())], Some(placeholder))
}

/// Final text replacing a reported placeholder at the same offset
pub(crate) fn replace_placeholder<N: Copy + Eq + std::hash::Hash>(
    registry: &NodeRegistry<N>,
    placeholder: &Placeholder,
    changes: &[TextChange<N>],
) -> Option<Vec<NormalizedAction<N>>> {
    let expected = registry.node_of(placeholder.node);
    let change = changes.iter().find(|c| {
        c.offset == placeholder.offset
            && c.removed == placeholder.text
            && expected.is_none_or(|node| node == c.node)
    })?;

    let selection = span(change.node, change.offset, char_len(&placeholder.text));
    let replacement = if change.inserted.is_empty() {
        NormalizedAction::DeleteContent { direction: Direction::Backward }
    } else {
        NormalizedAction::insert_text(change.inserted.clone())
    };
    Some(vec![NormalizedAction::SetSelection { selection }, replacement])
}

/// Dead key composed and committed inside one gesture: replay it as the
/// accent placeholder followed by its replacement.
pub(crate) fn dead_key_in_one_gesture<N: Copy>(
    composition: &Composition,
    changes: &[TextChange<N>],
) -> Option<Vec<NormalizedAction<N>>> {
    let change = changes.first().filter(|c| c.is_insertion())?;
    let accent = composition.first_data.as_ref().filter(|accent| **accent != change.inserted)?;
    Some(vec![
        NormalizedAction::insert_text(accent.clone()),
        NormalizedAction::SetSelection { selection: span(change.node, change.offset, char_len(accent)) },
        NormalizedAction::insert_text(change.inserted.clone()),
    ])
}

/// Generic resolution of composed or replaced text
pub(crate) fn resolve_changes<N: Copy>(changes: &[TextChange<N>]) -> Vec<NormalizedAction<N>> {
    let mut actions = Vec::new();
    for change in changes {
        if change.is_replacement() {
            actions.extend(word_replacement(change));
        } else if change.is_insertion() {
            actions.push(NormalizedAction::insert_text(change.inserted.clone()));
        } else if change.is_removal() {
            actions.push(NormalizedAction::SetSelection {
                selection: span(change.node, change.offset, char_len(&change.removed)),
            });
            actions.push(NormalizedAction::DeleteContent { direction: Direction::Backward });
        }
    }
    actions
}

/// Widen a replacement to whole words: select the original word, insert the
/// corrected one, and split off a trailing separator the IME appended.
pub(crate) fn word_replacement<N: Copy>(change: &TextChange<N>) -> Vec<NormalizedAction<N>> {
    let before: Vec<char> = change.before.chars().collect();
    let after: Vec<char> = change.after.chars().collect();
    let removed_len = char_len(&change.removed);
    let inserted_len = char_len(&change.inserted);

    let mut start = change.offset;
    while start > 0 && before[start - 1].is_alphanumeric() {
        start -= 1;
    }
    let mut end = change.offset + removed_len;
    while end < before.len() && before[end].is_alphanumeric() {
        end += 1;
    }
    let after_end = (end + inserted_len).saturating_sub(removed_len).min(after.len());

    let original: String = before[start..end].iter().collect();
    let corrected: String = after[start.min(after_end)..after_end].iter().collect();

    let word = corrected.trim_end();
    let separator = &corrected[word.len()..];
    let (word, separator) = if !separator.is_empty() && !original.ends_with(separator) {
        (word, Some(separator))
    } else {
        (corrected.as_str(), None)
    };

    let mut actions = vec![
        NormalizedAction::SetSelection { selection: span(change.node, start, end - start) },
        NormalizedAction::insert_text(word),
    ];
    if let Some(separator) = separator {
        actions.push(NormalizedAction::insert_text(separator));
    }
    actions
}
