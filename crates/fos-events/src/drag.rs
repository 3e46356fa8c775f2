//! Drag and Drop Events
//!
//! The three drag events an editable root needs: dragstart, drop, dragend.

use serde::{Deserialize, Serialize};

use crate::{DataTransfer, Event};

/// Drag event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragEvent {
    pub event_type: DragEventType,
    pub data_transfer: DataTransfer,

    // Coordinates
    pub client_x: f64,
    pub client_y: f64,

    pub timestamp: f64,
    #[serde(default)]
    default_prevented: bool,
}

/// Drag event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragEventType {
    DragStart,
    Drop,
    DragEnd,
}

impl DragEvent {
    pub fn new(event_type: DragEventType, x: f64, y: f64, data_transfer: DataTransfer) -> Self {
        Self {
            event_type,
            data_transfer,
            client_x: x,
            client_y: y,
            timestamp: 0.0,
            default_prevented: false,
        }
    }

    /// Create a drag start event
    pub fn drag_start(x: f64, y: f64) -> Self {
        Self::new(DragEventType::DragStart, x, y, DataTransfer::new())
    }

    /// Create a drop event
    pub fn drop(x: f64, y: f64, data: DataTransfer) -> Self {
        Self::new(DragEventType::Drop, x, y, data)
    }

    pub fn drag_end(x: f64, y: f64) -> Self {
        Self::new(DragEventType::DragEnd, x, y, DataTransfer::new())
    }
}

impl Event for DragEvent {
    fn event_type(&self) -> &'static str {
        match self.event_type {
            DragEventType::DragStart => "dragstart",
            DragEventType::Drop => "drop",
            DragEventType::DragEnd => "dragend",
        }
    }

    fn cancelable(&self) -> bool {
        true
    }

    fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    fn timestamp(&self) -> f64 {
        self.timestamp
    }
}
