//! Shared harness: a `fos-dom` document playing the browser, and a replay
//! applier that re-applies batches to a plain text model.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use fos_dom::{BoundaryPoint, DOMRect, Document, NodeId};
use fos_editing::{
    Direction, DomPoint, DomRoot, DomSelection, EventBatch, NormalizedAction, Normalizer, NormalizerConfig,
    Notification,
};
use fos_events::{
    ClipboardEvent, CompositionEvent, DataTransfer, DragEvent, InputEvent, InputType, Key,
    KeyModifiers, KeyboardEvent, MouseEvent,
};

pub type Batches = Rc<RefCell<Vec<EventBatch<NodeId>>>>;
pub type Callback = Box<dyn FnMut(EventBatch<NodeId>)>;

/// Width of one char in the fake layout
pub const CHAR_WIDTH: f64 = 10.0;
pub const LINE_HEIGHT: f64 = 20.0;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// `<body><div editor><p>text</p></div></body>` with a caret at the end
pub struct Editor {
    pub document: Rc<RefCell<Document>>,
    pub root: NodeId,
    pub paragraph: NodeId,
    pub text: NodeId,
    pub batches: Batches,
    pub normalizer: Normalizer<DomRoot, Callback>,
}

impl Editor {
    pub fn new(content: &str) -> Self {
        Self::with_config(content, NormalizerConfig::default())
    }

    pub fn with_config(content: &str, config: NormalizerConfig) -> Self {
        Self::with_setup(content, config, |_, _| {})
    }

    /// Extra content is added by `setup` before the normalizer attaches
    pub fn with_setup(content: &str, config: NormalizerConfig, setup: impl FnOnce(&mut Document, NodeId)) -> Self {
        init_tracing();
        let document = Rc::new(RefCell::new(Document::new()));
        let (root, paragraph, text) = {
            let mut doc = document.borrow_mut();
            let body = doc.body();
            let tree = doc.tree_mut();
            let root = tree.create_element("div");
            let paragraph = tree.create_element("p");
            let text = tree.create_text(content);
            tree.append_child(body, root).unwrap();
            tree.append_child(root, paragraph).unwrap();
            tree.append_child(paragraph, text).unwrap();
            (root, paragraph, text)
        };
        let end = content.chars().count() as u32;
        {
            let mut doc = document.borrow_mut();
            doc.layout_mut()
                .set_rect(text, DOMRect::from_xywh(0.0, 0.0, CHAR_WIDTH * end as f64, LINE_HEIGHT));
            doc.collapse(BoundaryPoint::new(text, end));
            setup(&mut *doc, root);
        }

        let batches: Batches = Rc::new(RefCell::new(Vec::new()));
        let sink = batches.clone();
        let callback: Callback = Box::new(move |batch| sink.borrow_mut().push(batch));
        let normalizer = Normalizer::with_config(DomRoot::new(document.clone(), root), callback, config);

        Self { document, root, paragraph, text, batches, normalizer }
    }

    // --- Notifications ---

    /// Dispatch and hand the notification back, so tests can check
    /// `default_prevented`
    pub fn dispatch(&mut self, notification: Notification<NodeId>) -> Notification<NodeId> {
        let mut notification = notification;
        self.normalizer.dispatch(&mut notification).unwrap();
        notification
    }

    pub fn key_down(&mut self, key: Key) {
        self.dispatch(Notification::Key(KeyboardEvent::key_down(key)));
    }

    pub fn key_down_with(&mut self, key: Key, modifiers: KeyModifiers) {
        self.dispatch(Notification::Key(KeyboardEvent::key_down(key).with_modifiers(modifiers)));
    }

    pub fn key_press(&mut self, key: Key) {
        self.dispatch(Notification::Key(KeyboardEvent::key_press(key)));
    }

    pub fn key_up(&mut self, key: Key) {
        self.dispatch(Notification::Key(KeyboardEvent::key_up(key)));
    }

    pub fn before_input(&mut self, input_type: InputType, data: Option<&str>) {
        self.dispatch(Notification::Input(InputEvent::before(input_type, data)));
    }

    pub fn input(&mut self, input_type: InputType, data: Option<&str>) {
        self.dispatch(Notification::Input(InputEvent::after(input_type, data)));
    }

    pub fn composition_start(&mut self, data: &str) {
        self.dispatch(Notification::Composition(CompositionEvent::start(data)));
    }

    pub fn composition_update(&mut self, data: &str) {
        self.dispatch(Notification::Composition(CompositionEvent::update(data)));
    }

    pub fn composition_end(&mut self, data: &str) {
        self.dispatch(Notification::Composition(CompositionEvent::end(data)));
    }

    /// selectionchange with the live selection
    pub fn selection_change(&mut self) {
        let selection = self.document.borrow().selection();
        if let Some(selection) = selection {
            let snapshot = DomSelection::new(
                DomPoint::new(selection.anchor.node, selection.anchor.offset),
                DomPoint::new(selection.focus.node, selection.focus.offset),
            );
            self.dispatch(Notification::Selection(snapshot));
        }
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.dispatch(Notification::Pointer(MouseEvent::pointer_down(x, y)));
    }

    pub fn paste(&mut self, data: DataTransfer) -> Notification<NodeId> {
        self.dispatch(Notification::Clipboard(ClipboardEvent::paste(data)))
    }

    pub fn drop_data(&mut self, x: f64, y: f64, data: DataTransfer) -> Notification<NodeId> {
        self.dispatch(Notification::Drag(DragEvent::drop(x, y, data)))
    }

    // --- Browser side effects ---

    pub fn insert(&mut self, node: NodeId, offset: usize, text: &str) {
        let mut doc = self.document.borrow_mut();
        doc.tree_mut().insert_text(node, offset, text).unwrap();
        let caret = (offset + text.chars().count()) as u32;
        doc.collapse(BoundaryPoint::new(node, caret));
    }

    pub fn delete(&mut self, node: NodeId, start: usize, end: usize) -> String {
        let mut doc = self.document.borrow_mut();
        let removed = doc.tree_mut().delete_text(node, start, end).unwrap();
        doc.collapse(BoundaryPoint::new(node, start as u32));
        removed
    }

    pub fn set_text(&mut self, node: NodeId, content: &str, caret: u32) {
        let mut doc = self.document.borrow_mut();
        doc.tree_mut().set_text(node, content).unwrap();
        doc.collapse(BoundaryPoint::new(node, caret));
    }

    /// Swap the paragraph's text node for a new one, the way some engines
    /// commit an edit. Returns the new node.
    pub fn recreate_text(&mut self, content: &str) -> NodeId {
        let mut doc = self.document.borrow_mut();
        let tree = doc.tree_mut();
        let fresh = tree.create_text(content);
        tree.replace_child(self.paragraph, fresh, self.text).unwrap();
        let width = CHAR_WIDTH * content.chars().count() as f64;
        doc.layout_mut().remove(self.text);
        doc.layout_mut().set_rect(fresh, DOMRect::from_xywh(0.0, 0.0, width, LINE_HEIGHT));
        doc.collapse(BoundaryPoint::new(fresh, content.chars().count() as u32));
        fresh
    }

    pub fn select(&mut self, anchor: (NodeId, u32), focus: (NodeId, u32)) {
        self.document.borrow_mut().set_selection(
            BoundaryPoint::new(anchor.0, anchor.1),
            BoundaryPoint::new(focus.0, focus.1),
        );
    }

    pub fn caret(&mut self, node: NodeId, offset: u32) {
        self.document.borrow_mut().collapse(BoundaryPoint::new(node, offset));
    }

    // --- Inspection ---

    pub fn text_of(&self, node: NodeId) -> String {
        self.document.borrow().tree().text_content(node)
    }

    pub fn content(&self) -> String {
        self.text_of(self.root)
    }

    pub fn settle(&mut self) {
        self.normalizer.settle().unwrap();
    }

    pub fn tick(&mut self) {
        self.normalizer.tick().unwrap();
    }

    pub fn batches(&self) -> Vec<EventBatch<NodeId>> {
        self.batches.borrow().clone()
    }

    pub fn take_batches(&self) -> Vec<EventBatch<NodeId>> {
        std::mem::take(&mut *self.batches.borrow_mut())
    }
}

// ============================================================================
// BROWSER ORDERINGS FOR ONE TYPED CHARACTER
// ============================================================================

/// Event orderings observed for typing `o` at the end of the text node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    /// keydown, keypress, beforeinput, mutation, input, keyup
    Standard,
    /// No `beforeinput`, untyped `input`
    Legacy,
    /// Duplicate mutation record and a trailing selectionchange after input
    TrailingRecords,
    /// Whole-word composition instead of key events
    ImeComposition,
    /// Text node destroyed and recreated instead of edited
    NodeRecreation,
}

pub const ORDERINGS: [Ordering; 5] = [
    Ordering::Standard,
    Ordering::Legacy,
    Ordering::TrailingRecords,
    Ordering::ImeComposition,
    Ordering::NodeRecreation,
];

/// Type `o` at the end of "hello world". Returns the live text node.
pub fn type_o(editor: &mut Editor, ordering: Ordering) -> NodeId {
    let text = editor.text;
    let end = editor.text_of(text).chars().count();
    let o = Key::Character('o');
    match ordering {
        Ordering::Standard => {
            editor.key_down(o.clone());
            editor.key_press(o.clone());
            editor.before_input(InputType::InsertText, Some("o"));
            editor.insert(text, end, "o");
            editor.input(InputType::InsertText, Some("o"));
            editor.key_up(o);
            text
        }
        Ordering::Legacy => {
            editor.key_down(o.clone());
            editor.key_press(o.clone());
            editor.insert(text, end, "o");
            editor.dispatch(Notification::Input(InputEvent::untyped(None)));
            editor.key_up(o);
            text
        }
        Ordering::TrailingRecords => {
            editor.key_down(o.clone());
            editor.key_press(o.clone());
            editor.before_input(InputType::InsertText, Some("o"));
            editor.insert(text, end, "o");
            editor.input(InputType::InsertText, Some("o"));
            let current = editor.text_of(text);
            editor.set_text(text, &current, (end + 1) as u32);
            editor.tick();
            editor.selection_change();
            editor.key_up(o);
            text
        }
        Ordering::ImeComposition => {
            editor.key_down(Key::Process);
            editor.composition_start("");
            editor.composition_update("worldo");
            editor.dispatch(Notification::Input(
                InputEvent::before(InputType::InsertCompositionText, Some("worldo")).composing(true),
            ));
            editor.set_text(text, "hello worldo", (end + 1) as u32);
            editor.dispatch(Notification::Input(
                InputEvent::after(InputType::InsertCompositionText, Some("worldo")).composing(true),
            ));
            editor.composition_end("worldo");
            editor.key_up(Key::Process);
            text
        }
        Ordering::NodeRecreation => {
            editor.key_down(o.clone());
            editor.key_press(o.clone());
            editor.before_input(InputType::InsertText, Some("o"));
            let current = editor.text_of(text);
            let fresh = editor.recreate_text(&format!("{current}o"));
            editor.input(InputType::InsertText, Some("o"));
            editor.key_up(o);
            fresh
        }
    }
}

// ============================================================================
// REPLAY
// ============================================================================

/// Single-node text model the consumer side keeps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextModel {
    pub chars: Vec<char>,
    pub anchor: usize,
    pub focus: usize,
}

impl TextModel {
    pub fn new(text: &str, caret: usize) -> Self {
        Self { chars: text.chars().collect(), anchor: caret, focus: caret }
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    fn range(&self) -> (usize, usize) {
        (self.anchor.min(self.focus), self.anchor.max(self.focus))
    }

    fn replace_selection(&mut self, text: &str) {
        let (start, end) = self.range();
        let inserted: Vec<char> = text.chars().collect();
        let caret = start + inserted.len();
        self.chars.splice(start..end, inserted);
        self.anchor = caret;
        self.focus = caret;
    }

    fn delete(&mut self, direction: Direction, count: usize) {
        let (start, end) = self.range();
        let (start, end) = if start != end {
            (start, end)
        } else {
            match direction {
                Direction::Backward => (start.saturating_sub(count), start),
                Direction::Forward => (start, (start + count).min(self.chars.len())),
            }
        };
        self.chars.drain(start..end);
        self.anchor = start;
        self.focus = start;
    }

    /// Apply a batch. Node handles are ignored: the model is one text node.
    pub fn apply(&mut self, batch: &EventBatch<NodeId>) {
        for action in &batch.actions {
            match action {
                NormalizedAction::SetSelection { selection } => {
                    self.anchor = selection.anchor_offset as usize;
                    self.focus = selection.focus_offset as usize;
                }
                NormalizedAction::InsertText { text, .. } => self.replace_selection(text),
                NormalizedAction::DeleteContent { direction } => self.delete(*direction, 1),
                NormalizedAction::DeleteWord { direction, text } => {
                    self.delete(*direction, text.chars().count())
                }
                other => panic!("replay model does not handle {}", other.name()),
            }
        }
    }
}
