//! Editable root capability
//!
//! The normalizer never touches a DOM directly. Hosts implement
//! [`EditableRoot`] for their tree; `fos-dom` does so through `DomRoot`.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::hash::Hash;

use crate::action::{Direction, DomPoint};
use crate::error::{NormalizerError, NormalizerResult};
use crate::notification::{DomSelection, MutationRecord, NotificationKind};

/// Host capability over one editable root element
pub trait EditableRoot {
    /// Node handle. Must stay valid (and distinct) after the node is
    /// detached.
    type Node: Copy + Eq + Hash + Debug;

    /// The editable root element itself
    fn root_node(&self) -> Self::Node;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    /// Text content for text nodes, `None` for everything else
    fn text(&self, node: Self::Node) -> Option<String>;

    /// `<br>` and equivalents
    fn is_line_break(&self, node: Self::Node) -> bool;

    /// Rendered with `display: none`
    fn is_hidden(&self, node: Self::Node) -> bool;

    /// Live document selection
    fn selection(&self) -> Option<DomSelection<Self::Node>>;

    /// Caret position under a viewport point
    fn caret_from_point(&self, x: f64, y: f64) -> Option<DomPoint<Self::Node>>;

    /// Start delivering the given notification kinds
    fn subscribe(&mut self, kinds: &[NotificationKind]);

    /// Stop delivering all notifications
    fn unsubscribe(&mut self);

    /// Drain mutation records queued since the last call
    fn take_mutation_records(&mut self) -> Vec<MutationRecord<Self::Node>>;

    /// Inclusive: the root contains itself
    fn contains(&self, node: Self::Node) -> bool {
        let root = self.root_node();
        let mut current = Some(node);
        while let Some(n) = current {
            if n == root {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// Length in DOM offset units: chars for text, children otherwise
    fn node_length(&self, node: Self::Node) -> u32 {
        match self.text(node) {
            Some(text) => text.chars().count() as u32,
            None => self.children(node).len() as u32,
        }
    }
}

/// Child indices leading from the root to `node`
fn path_from_root<R: EditableRoot>(root: &R, node: R::Node) -> NormalizerResult<Vec<usize>> {
    let top = root.root_node();
    let mut path = Vec::new();
    let mut current = node;
    while current != top {
        let parent = root
            .parent(current)
            .ok_or_else(|| NormalizerError::OutsideRoot(format!("{node:?}")))?;
        let index = root
            .children(parent)
            .iter()
            .position(|child| *child == current)
            .ok_or_else(|| NormalizerError::OutsideRoot(format!("{node:?}")))?;
        path.push(index);
        current = parent;
    }
    path.reverse();
    Ok(path)
}

/// Compare two boundary points in document order.
///
/// When one container is an ancestor of the other, the ancestor's offset is
/// compared against the index of the branch that leads to the descendant.
pub fn compare_points<R: EditableRoot>(
    root: &R,
    a: DomPoint<R::Node>,
    b: DomPoint<R::Node>,
) -> NormalizerResult<Ordering> {
    if a.node == b.node {
        root.contains(a.node)
            .then(|| a.offset.cmp(&b.offset))
            .ok_or_else(|| NormalizerError::OutsideRoot(format!("{:?}", a.node)))
    } else {
        let path_a = path_from_root(root, a.node)?;
        let path_b = path_from_root(root, b.node)?;
        Ok(compare_paths(&path_a, a.offset, &path_b, b.offset))
    }
}

fn compare_paths(path_a: &[usize], offset_a: u32, path_b: &[usize], offset_b: u32) -> Ordering {
    if let Some(branch) = path_b.strip_prefix(path_a).and_then(|rest| rest.first()) {
        // a's container is an ancestor of b's
        return if (offset_a as usize) <= *branch { Ordering::Less } else { Ordering::Greater };
    }
    if let Some(branch) = path_a.strip_prefix(path_b).and_then(|rest| rest.first()) {
        return if (offset_b as usize) <= *branch { Ordering::Greater } else { Ordering::Less };
    }
    path_a.cmp(path_b)
}

/// FORWARD iff the anchor is at or before the focus
pub fn direction_of<R: EditableRoot>(
    root: &R,
    anchor: DomPoint<R::Node>,
    focus: DomPoint<R::Node>,
) -> NormalizerResult<Direction> {
    Ok(match compare_points(root, anchor, focus)? {
        Ordering::Greater => Direction::Backward,
        Ordering::Less | Ordering::Equal => Direction::Forward,
    })
}

/// Visible content range of the root: (first leaf, 0) to (last meaningful
/// leaf, end). Hidden subtrees are skipped, and so are trailing line breaks
/// and empty text nodes.
pub fn content_boundary<R: EditableRoot>(root: &R) -> Option<(DomPoint<R::Node>, DomPoint<R::Node>)> {
    let mut leaves = Vec::new();
    collect_visible_leaves(root, root.root_node(), &mut leaves);

    let first = *leaves.first()?;
    let last = leaves
        .iter()
        .rev()
        .find(|leaf| !root.is_line_break(**leaf) && root.text(**leaf).is_none_or(|t| !t.is_empty()))
        .copied()
        .unwrap_or(first);

    Some((DomPoint::new(first, 0), DomPoint::new(last, root.node_length(last))))
}

fn collect_visible_leaves<R: EditableRoot>(root: &R, node: R::Node, out: &mut Vec<R::Node>) {
    if root.is_hidden(node) {
        return;
    }
    let children = root.children(node);
    if children.is_empty() {
        if node != root.root_node() {
            out.push(node);
        }
        return;
    }
    for child in children {
        collect_visible_leaves(root, child, out);
    }
}
