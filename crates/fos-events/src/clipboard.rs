//! Clipboard Events
//!
//! beforecut, cut and paste.

use serde::{Deserialize, Serialize};

use crate::{DataTransfer, Event};

/// Clipboard event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipboardEvent {
    pub event_type: ClipboardEventType,
    pub data: DataTransfer,
    pub timestamp: f64,
    #[serde(default)]
    default_prevented: bool,
}

/// Clipboard event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClipboardEventType {
    BeforeCut,
    Cut,
    Paste,
}

impl ClipboardEvent {
    pub fn new(event_type: ClipboardEventType, data: DataTransfer) -> Self {
        Self {
            event_type,
            data,
            timestamp: 0.0,
            default_prevented: false,
        }
    }

    pub fn before_cut() -> Self {
        Self::new(ClipboardEventType::BeforeCut, DataTransfer::new())
    }

    pub fn cut() -> Self {
        Self::new(ClipboardEventType::Cut, DataTransfer::new())
    }

    /// Create a paste event with data
    pub fn paste(data: DataTransfer) -> Self {
        Self::new(ClipboardEventType::Paste, data)
    }
}

impl Event for ClipboardEvent {
    fn event_type(&self) -> &'static str {
        match self.event_type {
            ClipboardEventType::BeforeCut => "beforecut",
            ClipboardEventType::Cut => "cut",
            ClipboardEventType::Paste => "paste",
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
