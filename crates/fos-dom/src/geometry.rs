//! Geometry
//!
//! DOMRect plus a minimal layout map. There is no layout engine here: the
//! host assigns one rect per text node and caret hit-testing spreads the
//! characters evenly across it.

use std::collections::HashMap;

use crate::{BoundaryPoint, DomTree, NodeId};

/// DOMRect - rectangle geometry
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DOMRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DOMRect {
    /// Create with dimensions
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Right edge
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if point is inside
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}

/// Rects for text nodes, keyed by node
#[derive(Debug, Clone, Default)]
pub struct LayoutMap {
    rects: HashMap<NodeId, DOMRect>,
}

impl LayoutMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_rect(&mut self, node: NodeId, rect: DOMRect) {
        self.rects.insert(node, rect);
    }

    pub fn rect(&self, node: NodeId) -> Option<DOMRect> {
        self.rects.get(&node).copied()
    }

    pub fn remove(&mut self, node: NodeId) {
        self.rects.remove(&node);
    }

    /// Caret position under a viewport point.
    ///
    /// Only connected text nodes are hit. When rects overlap the lowest
    /// node id wins, so results do not depend on map iteration order.
    pub fn caret_at(&self, tree: &DomTree, x: f64, y: f64) -> Option<BoundaryPoint> {
        let (node, rect) = self
            .rects
            .iter()
            .filter(|(node, rect)| rect.contains_point(x, y) && tree.is_connected(**node))
            .min_by_key(|(node, _)| **node)?;
        let length = tree.get(*node)?.as_text()?.chars().count();
        let offset = if rect.width <= 0.0 {
            0
        } else {
            let fraction = ((x - rect.x) / rect.width).clamp(0.0, 1.0);
            (fraction * length as f64).round() as u32
        };
        Some(BoundaryPoint::new(*node, offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let rect = DOMRect::from_xywh(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 70.0);
        assert!(rect.contains_point(50.0, 40.0));
        assert!(!rect.contains_point(5.0, 40.0));
    }

    #[test]
    fn test_caret_at_spreads_chars() {
        let mut tree = DomTree::new();
        let text = tree.create_text("abcd");
        tree.append_child(NodeId::ROOT, text).unwrap();

        let mut layout = LayoutMap::new();
        layout.set_rect(text, DOMRect::from_xywh(0.0, 0.0, 40.0, 10.0));

        assert_eq!(layout.caret_at(&tree, 0.0, 5.0), Some(BoundaryPoint::new(text, 0)));
        assert_eq!(layout.caret_at(&tree, 21.0, 5.0), Some(BoundaryPoint::new(text, 2)));
        assert_eq!(layout.caret_at(&tree, 40.0, 5.0), Some(BoundaryPoint::new(text, 4)));
        assert_eq!(layout.caret_at(&tree, 80.0, 5.0), None);
    }
}
