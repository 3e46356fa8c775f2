//! Range and Selection
//!
//! A selection is an anchor/focus pair of boundary points. The anchor is
//! where the gesture started, so the focus may come before it in document
//! order.

use crate::NodeId;
use serde::{Deserialize, Serialize};

/// Range boundary point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundaryPoint {
    /// The container node
    pub node: NodeId,
    /// Offset within the container (chars for text, child index for elements)
    pub offset: u32,
}

impl BoundaryPoint {
    pub fn new(node: NodeId, offset: u32) -> Self {
        Self { node, offset }
    }
}

/// User selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: BoundaryPoint,
    pub focus: BoundaryPoint,
}

impl Selection {
    pub fn new(anchor: BoundaryPoint, focus: BoundaryPoint) -> Self {
        Self { anchor, focus }
    }

    /// Caret at a single point
    pub fn collapsed(point: BoundaryPoint) -> Self {
        Self { anchor: point, focus: point }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}
