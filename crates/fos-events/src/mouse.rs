//! Mouse Events
//!
//! Pointer presses as seen by an editable root: down, click, contextmenu, up.

use serde::{Deserialize, Serialize};

use crate::Event;

/// Mouse event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MouseEvent {
    pub event_type: MouseEventType,
    pub button: MouseButton,

    // Coordinates
    pub client_x: f64,
    pub client_y: f64,

    // Modifiers
    pub shift_key: bool,
    pub ctrl_key: bool,
    pub alt_key: bool,
    pub meta_key: bool,

    pub timestamp: f64,
    #[serde(default)]
    default_prevented: bool,
}

/// Mouse event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseEventType {
    PointerDown,
    Click,
    ContextMenu,
    PointerUp,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    /// Primary button (usually left)
    Primary,
    /// Auxiliary button (usually middle/wheel)
    Auxiliary,
    /// Secondary button (usually right)
    Secondary,
}

impl MouseEvent {
    pub fn new(event_type: MouseEventType, button: MouseButton, x: f64, y: f64) -> Self {
        Self {
            event_type,
            button,
            client_x: x,
            client_y: y,
            shift_key: false,
            ctrl_key: false,
            alt_key: false,
            meta_key: false,
            timestamp: 0.0,
            default_prevented: false,
        }
    }

    pub fn pointer_down(x: f64, y: f64) -> Self {
        Self::new(MouseEventType::PointerDown, MouseButton::Primary, x, y)
    }

    pub fn click(x: f64, y: f64) -> Self {
        Self::new(MouseEventType::Click, MouseButton::Primary, x, y)
    }

    pub fn context_menu(x: f64, y: f64) -> Self {
        Self::new(MouseEventType::ContextMenu, MouseButton::Secondary, x, y)
    }
}

impl Event for MouseEvent {
    fn event_type(&self) -> &'static str {
        match self.event_type {
            MouseEventType::PointerDown => "pointerdown",
            MouseEventType::Click => "click",
            MouseEventType::ContextMenu => "contextmenu",
            MouseEventType::PointerUp => "pointerup",
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
