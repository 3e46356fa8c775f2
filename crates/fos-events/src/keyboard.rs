//! Keyboard Events
//!
//! KeyboardEvent with key values and modifiers.

use serde::{Deserialize, Serialize};

use crate::Event;

/// Keyboard event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyboardEvent {
    pub event_type: KeyboardEventType,
    pub key: Key,
    pub code: String,
    pub modifiers: KeyModifiers,
    pub repeat: bool,
    pub is_composing: bool,
    pub timestamp: f64,
    #[serde(default)]
    default_prevented: bool,
}

/// Keyboard event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyboardEventType {
    KeyDown,
    KeyPress, // Deprecated but still fired for printable keys
    KeyUp,
}

/// Key value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Character(char),

    // Navigation
    ArrowUp, ArrowDown, ArrowLeft, ArrowRight,
    Home, End, PageUp, PageDown,

    // Editing
    Backspace, Delete, Insert,
    Enter, Tab, Escape,

    // Modifiers
    Shift, Control, Alt, Meta,
    CapsLock,

    Space,

    /// Dead key starting an accent composition
    Dead,
    /// Key swallowed by an IME (Chrome reports these as "Process")
    Process,

    Unidentified(String),
}

impl Key {
    /// Parse from key string
    pub fn parse(s: &str) -> Self {
        match s {
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "Home" => Self::Home,
            "End" => Self::End,
            "PageUp" => Self::PageUp,
            "PageDown" => Self::PageDown,
            "Backspace" => Self::Backspace,
            "Delete" => Self::Delete,
            "Insert" => Self::Insert,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            "Escape" => Self::Escape,
            "Shift" => Self::Shift,
            "Control" => Self::Control,
            "Alt" => Self::Alt,
            "Meta" => Self::Meta,
            "CapsLock" => Self::CapsLock,
            "Dead" => Self::Dead,
            "Process" => Self::Process,
            " " => Self::Space,
            s => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Character(c),
                    _ => Self::Unidentified(s.to_string()),
                }
            }
        }
    }

    /// Convert to key value string
    pub fn to_key_string(&self) -> String {
        let name = match self {
            Self::Character(c) => return c.to_string(),
            Self::Unidentified(s) => return s.clone(),
            Self::ArrowUp => "ArrowUp",
            Self::ArrowDown => "ArrowDown",
            Self::ArrowLeft => "ArrowLeft",
            Self::ArrowRight => "ArrowRight",
            Self::Home => "Home",
            Self::End => "End",
            Self::PageUp => "PageUp",
            Self::PageDown => "PageDown",
            Self::Backspace => "Backspace",
            Self::Delete => "Delete",
            Self::Insert => "Insert",
            Self::Enter => "Enter",
            Self::Tab => "Tab",
            Self::Escape => "Escape",
            Self::Shift => "Shift",
            Self::Control => "Control",
            Self::Alt => "Alt",
            Self::Meta => "Meta",
            Self::CapsLock => "CapsLock",
            Self::Space => " ",
            Self::Dead => "Dead",
            Self::Process => "Process",
        };
        name.to_string()
    }

    /// Printable character produced by the key, if any
    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::Character(c) => Some(*c),
            Self::Space => Some(' '),
            _ => None,
        }
    }

    /// Caret movement keys
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Self::ArrowUp | Self::ArrowDown | Self::ArrowLeft | Self::ArrowRight
                | Self::Home | Self::End | Self::PageUp | Self::PageDown
        )
    }
}

/// Key modifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool, // Cmd on Mac, Win on Windows
}

impl KeyModifiers {
    /// Check if any modifier is pressed
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }

    /// Create from booleans
    pub fn from_flags(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Self {
        Self { shift, ctrl, alt, meta }
    }

    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }

    pub fn alt() -> Self {
        Self { alt: true, ..Self::default() }
    }

    pub fn meta() -> Self {
        Self { meta: true, ..Self::default() }
    }
}

impl KeyboardEvent {
    /// Create a new keyboard event
    pub fn new(event_type: KeyboardEventType, key: Key) -> Self {
        Self {
            event_type,
            key,
            code: String::new(),
            modifiers: KeyModifiers::default(),
            repeat: false,
            is_composing: false,
            timestamp: 0.0,
            default_prevented: false,
        }
    }

    pub fn key_down(key: Key) -> Self {
        Self::new(KeyboardEventType::KeyDown, key)
    }

    pub fn key_press(key: Key) -> Self {
        Self::new(KeyboardEventType::KeyPress, key)
    }

    pub fn key_up(key: Key) -> Self {
        Self::new(KeyboardEventType::KeyUp, key)
    }

    /// Add modifiers
    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Mark as fired inside an IME composition
    pub fn composing(mut self, is_composing: bool) -> Self {
        self.is_composing = is_composing;
        self
    }
}

impl Event for KeyboardEvent {
    fn event_type(&self) -> &'static str {
        match self.event_type {
            KeyboardEventType::KeyDown => "keydown",
            KeyboardEventType::KeyPress => "keypress",
            KeyboardEventType::KeyUp => "keyup",
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
