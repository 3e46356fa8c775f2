//! fOS Editing - input normalizer for editable roots
//!
//! Browsers report the same edit as different, inconsistently ordered
//! streams of key, composition, input, mutation, selection, clipboard and
//! drag notifications. The [`Normalizer`] watches one editable root,
//! classifies those streams per user gesture and hands a single ordered
//! [`EventBatch`] of [`NormalizedAction`]s to its consumer once the gesture
//! has settled.
//!
//! # Example
//!
//! ```rust,ignore
//! use fos_editing::{DomRoot, Normalizer, Notification};
//!
//! let root = DomRoot::new(document.clone(), editor);
//! let mut normalizer = Normalizer::new(root, |batch| apply(batch));
//! normalizer.dispatch(&mut Notification::Key(keydown))?;
//! normalizer.tick()?;
//! ```

mod action;
mod clipboard;
mod config;
mod diff;
mod dom_root;
mod error;
mod keyboard;
mod normalizer;
mod notification;
mod pointer;
mod registry;
mod root;
mod scheduler;

pub use action::{Direction, DomPoint, EventBatch, NormalizedAction, SelectionDescription};
pub use config::{NormalizerConfig, Platform};
pub use diff::{DiffCollector, TextChange};
pub use dom_root::DomRoot;
pub use error::{NormalizerError, NormalizerResult};
pub use keyboard::SegmentState;
pub use normalizer::Normalizer;
pub use notification::{
    DomSelection, ListenTarget, MutationKind, MutationRecord, Notification, NotificationKind,
    SUBSCRIBED_KINDS,
};
pub use registry::{Identity, NodeRegistry};
pub use root::{EditableRoot, compare_points, content_boundary, direction_of};
pub use scheduler::SchedulerState;
