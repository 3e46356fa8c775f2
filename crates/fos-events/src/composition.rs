//! Composition Events
//!
//! IME and dead-key composition lifecycle.

use serde::{Deserialize, Serialize};

use crate::Event;

/// Composition event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionEvent {
    pub event_type: CompositionEventType,
    /// Text being composed (final text on `compositionend`)
    pub data: String,
    pub timestamp: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompositionEventType {
    CompositionStart,
    CompositionUpdate,
    CompositionEnd,
}

impl CompositionEvent {
    pub fn new(event_type: CompositionEventType, data: &str) -> Self {
        Self {
            event_type,
            data: data.to_string(),
            timestamp: 0.0,
        }
    }

    pub fn start(data: &str) -> Self {
        Self::new(CompositionEventType::CompositionStart, data)
    }

    pub fn update(data: &str) -> Self {
        Self::new(CompositionEventType::CompositionUpdate, data)
    }

    pub fn end(data: &str) -> Self {
        Self::new(CompositionEventType::CompositionEnd, data)
    }
}

impl Event for CompositionEvent {
    fn event_type(&self) -> &'static str {
        match self.event_type {
            CompositionEventType::CompositionStart => "compositionstart",
            CompositionEventType::CompositionUpdate => "compositionupdate",
            CompositionEventType::CompositionEnd => "compositionend",
        }
    }

    fn cancelable(&self) -> bool {
        false
    }

    fn default_prevented(&self) -> bool {
        false
    }

    fn prevent_default(&mut self) {}

    fn timestamp(&self) -> f64 {
        self.timestamp
    }
}
