//! fOS Events - raw input events
//!
//! Keyboard, composition, input, pointer, touch, clipboard and drag events
//! as a browser delivers them to an editable root. The types carry data
//! only; dispatch belongs to whoever owns the listeners.

mod keyboard;
mod composition;
mod input;
mod mouse;
mod touch;
mod data_transfer;
mod clipboard;
mod drag;

pub use keyboard::{KeyboardEvent, KeyboardEventType, Key, KeyModifiers};
pub use composition::{CompositionEvent, CompositionEventType};
pub use input::{InputEvent, InputEventType, InputType};
pub use mouse::{MouseEvent, MouseEventType, MouseButton};
pub use touch::{TouchEvent, TouchEventType, Touch};
pub use data_transfer::{DataTransfer, DataTransferItem, FileInfo, MIME_HTML, MIME_TEXT};
pub use clipboard::{ClipboardEvent, ClipboardEventType};
pub use drag::{DragEvent, DragEventType};

/// Base event trait
pub trait Event {
    /// DOM event type name (`"keydown"`, `"beforeinput"`, ...)
    fn event_type(&self) -> &'static str;

    /// Check if event is cancelable
    fn cancelable(&self) -> bool;

    /// Check if default was prevented
    fn default_prevented(&self) -> bool;

    /// Prevent default action. Ignored for non-cancelable events.
    fn prevent_default(&mut self);

    /// Get event timestamp
    fn timestamp(&self) -> f64;
}
