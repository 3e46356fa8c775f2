//! Touch Events
//!
//! Touch start/end for tap-to-place-caret on mobile.

use serde::{Deserialize, Serialize};

use crate::Event;

/// Touch event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    pub event_type: TouchEventType,
    /// Touches that changed
    pub changed_touches: Vec<Touch>,
    pub timestamp: f64,
    #[serde(default)]
    default_prevented: bool,
}

/// Touch event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchEventType {
    TouchStart,
    TouchEnd,
}

/// Single touch point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Touch {
    /// Unique identifier for this touch
    pub identifier: u32,
    /// X relative to viewport
    pub client_x: f64,
    /// Y relative to viewport
    pub client_y: f64,
}

impl Touch {
    pub fn new(identifier: u32, x: f64, y: f64) -> Self {
        Self { identifier, client_x: x, client_y: y }
    }
}

impl TouchEvent {
    pub fn new(event_type: TouchEventType, changed_touches: Vec<Touch>) -> Self {
        Self {
            event_type,
            changed_touches,
            timestamp: 0.0,
            default_prevented: false,
        }
    }

    /// Single-finger touch start
    pub fn start(x: f64, y: f64) -> Self {
        Self::new(TouchEventType::TouchStart, vec![Touch::new(0, x, y)])
    }

    /// Single-finger touch end
    pub fn end(x: f64, y: f64) -> Self {
        Self::new(TouchEventType::TouchEnd, vec![Touch::new(0, x, y)])
    }

    /// First changed touch
    pub fn primary(&self) -> Option<&Touch> {
        self.changed_touches.first()
    }
}

impl Event for TouchEvent {
    fn event_type(&self) -> &'static str {
        match self.event_type {
            TouchEventType::TouchStart => "touchstart",
            TouchEventType::TouchEnd => "touchend",
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
