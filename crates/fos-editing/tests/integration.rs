//! Integration tests - gestures from raw notifications to batches
//!
//! Deletion, selection, clipboard, drag and drop, lifecycle, and replay of
//! recorded batches against a text model.

mod common;

use std::collections::HashSet;

use common::{Editor, Ordering, TextModel, type_o};
use fos_dom::NodeId;
use fos_editing::{
    Direction, DomPoint, MutationRecord, NormalizedAction, NormalizerConfig, NormalizerError,
    Notification, SelectionDescription,
};
use fos_events::{
    ClipboardEvent, DataTransfer, DragEvent, Event, FileInfo, InputType, Key, KeyModifiers,
    TouchEvent,
};

fn forward(node: NodeId, from: u32, to: u32) -> SelectionDescription<NodeId> {
    SelectionDescription::new(DomPoint::new(node, from), DomPoint::new(node, to), Direction::Forward)
}

// ============================================================================
// DELETION
// ============================================================================

fn delete_word(editor: &mut Editor, modifiers: KeyModifiers, input_type: InputType) {
    let text = editor.text;
    editor.key_down_with(Key::Backspace, modifiers);
    editor.before_input(input_type.clone(), None);
    editor.delete(text, 6, 11);
    editor.input(input_type, None);
    editor.key_up(Key::Backspace);
    editor.settle();
}

#[test]
fn test_ctrl_backspace_deletes_word() {
    let mut editor = Editor::new("hello world");
    delete_word(&mut editor, KeyModifiers::ctrl(), InputType::DeleteWordBackward);

    let batches = editor.take_batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(
        batches[0].actions,
        vec![NormalizedAction::DeleteWord { direction: Direction::Backward, text: "world".into() }]
    );
    assert_eq!(batches[0].mutated_elements, HashSet::from([editor.text]));
}

#[test]
fn test_option_backspace_deletes_word_on_mac() {
    let mut editor = Editor::with_config("hello world", NormalizerConfig::mac());
    delete_word(&mut editor, KeyModifiers::alt(), InputType::DeleteWordBackward);

    let batches = editor.take_batches();
    assert_eq!(
        batches[0].actions,
        vec![NormalizedAction::DeleteWord { direction: Direction::Backward, text: "world".into() }]
    );
}

#[test]
fn test_modifiers_beat_character_input_type() {
    // Some engines report a word delete as deleteContentBackward
    let mut editor = Editor::with_config("hello world", NormalizerConfig::mac());
    delete_word(&mut editor, KeyModifiers::alt(), InputType::DeleteContentBackward);

    assert_eq!(editor.take_batches()[0].action_names(), vec!["deleteWord"]);
}

#[test]
fn test_plain_backspace_deletes_one_char() {
    let mut editor = Editor::new("hello world");
    let text = editor.text;
    editor.key_down(Key::Backspace);
    editor.before_input(InputType::DeleteContentBackward, None);
    editor.delete(text, 10, 11);
    editor.input(InputType::DeleteContentBackward, None);
    editor.key_up(Key::Backspace);
    editor.settle();

    assert_eq!(
        editor.take_batches()[0].actions,
        vec![NormalizedAction::DeleteContent { direction: Direction::Backward }]
    );
}

#[test]
fn test_untyped_input_infers_forward_delete() {
    let mut editor = Editor::new("hello world");
    let text = editor.text;
    editor.caret(text, 0);
    editor.selection_change();
    editor.settle();
    editor.take_batches();

    editor.dispatch(Notification::Input(fos_events::InputEvent::untyped(None)));
    editor.delete(text, 0, 1);
    editor.settle();

    assert_eq!(
        editor.take_batches()[0].actions,
        vec![NormalizedAction::DeleteContent { direction: Direction::Forward }]
    );
}

#[test]
fn test_word_delete_without_input_type() {
    let mut editor = Editor::new("hello world");
    let text = editor.text;
    editor.key_down_with(Key::Backspace, KeyModifiers::ctrl());
    editor.delete(text, 6, 11);
    editor.dispatch(Notification::Input(fos_events::InputEvent::untyped(None)));
    editor.key_up(Key::Backspace);
    editor.settle();

    assert_eq!(
        editor.take_batches()[0].actions,
        vec![NormalizedAction::DeleteWord { direction: Direction::Backward, text: "world".into() }]
    );
}

#[test]
fn test_ctrl_delete_deletes_word_forward() {
    let mut editor = Editor::new("hello world");
    let text = editor.text;
    editor.caret(text, 6);
    editor.selection_change();
    editor.settle();
    editor.take_batches();

    editor.key_down_with(Key::Delete, KeyModifiers::ctrl());
    editor.before_input(InputType::DeleteWordForward, None);
    editor.delete(text, 6, 11);
    editor.input(InputType::DeleteWordForward, None);
    editor.settle();

    assert_eq!(
        editor.take_batches()[0].actions,
        vec![NormalizedAction::DeleteWord { direction: Direction::Forward, text: "world".into() }]
    );
}

#[test]
fn test_word_delete_that_removed_nothing() {
    let mut editor = Editor::new("hello");
    let text = editor.text;
    editor.caret(text, 0);
    editor.selection_change();
    editor.settle();
    editor.take_batches();

    editor.key_down_with(Key::Backspace, KeyModifiers::ctrl());
    editor.before_input(InputType::DeleteWordBackward, None);
    editor.input(InputType::DeleteWordBackward, None);
    editor.settle();

    assert!(editor.batches().is_empty());
}

#[test]
fn test_hard_line_delete_from_input_type() {
    let mut editor = Editor::new("hello world");
    let text = editor.text;
    editor.before_input(InputType::DeleteHardLineBackward, None);
    editor.delete(text, 0, 11);
    editor.input(InputType::DeleteHardLineBackward, None);
    editor.settle();

    assert_eq!(
        editor.take_batches()[0].actions,
        vec![NormalizedAction::DeleteHardLine { direction: Direction::Backward, selection: forward(text, 0, 11) }]
    );
}

#[test]
fn test_ctrl_shift_backspace_deletes_line() {
    let mut editor = Editor::new("hello world");
    let text = editor.text;
    editor.key_down_with(Key::Backspace, KeyModifiers::from_flags(true, true, false, false));
    editor.before_input(InputType::DeleteSoftLineBackward, None);
    editor.delete(text, 0, 11);
    editor.input(InputType::DeleteSoftLineBackward, None);
    editor.settle();

    assert_eq!(
        editor.take_batches()[0].actions,
        vec![NormalizedAction::DeleteSoftLine { direction: Direction::Backward, selection: forward(text, 0, 11) }]
    );
}

#[test]
fn test_cmd_backspace_deletes_soft_line_on_mac() {
    let mut editor = Editor::with_config("hello world", NormalizerConfig::mac());
    let text = editor.text;
    editor.key_down_with(Key::Backspace, KeyModifiers::meta());
    editor.before_input(InputType::DeleteSoftLineBackward, None);
    editor.delete(text, 0, 11);
    editor.input(InputType::DeleteSoftLineBackward, None);
    editor.settle();

    assert_eq!(
        editor.take_batches()[0].actions,
        vec![NormalizedAction::DeleteSoftLine { direction: Direction::Backward, selection: forward(text, 0, 11) }]
    );
}

// ============================================================================
// STRUCTURE AND FORMATTING
// ============================================================================

#[test]
fn test_enter_and_shift_enter() {
    let mut editor = Editor::new("hello");
    editor.key_down(Key::Enter);
    editor.before_input(InputType::InsertParagraph, None);
    editor.input(InputType::InsertParagraph, None);
    editor.settle();
    assert_eq!(editor.take_batches()[0].actions, vec![NormalizedAction::InsertParagraphBreak]);

    editor.key_down_with(Key::Enter, KeyModifiers::from_flags(true, false, false, false));
    editor.before_input(InputType::InsertLineBreak, None);
    editor.input(InputType::InsertLineBreak, None);
    editor.settle();
    assert_eq!(
        editor.take_batches()[0].actions,
        vec![NormalizedAction::InsertText { text: "\n".into(), html: Some("<br>".into()) }]
    );
}

#[test]
fn test_format_and_history_from_input_type() {
    let mut editor = Editor::new("hello");
    editor.key_down_with(Key::Character('b'), KeyModifiers::ctrl());
    editor.before_input(InputType::FormatBold, None);
    editor.settle();
    assert_eq!(
        editor.take_batches()[0].actions,
        vec![NormalizedAction::ApplyFormat { format: "bold".into(), data: None }]
    );

    editor.key_down_with(Key::Character('z'), KeyModifiers::ctrl());
    editor.before_input(InputType::HistoryUndo, None);
    editor.settle();
    assert_eq!(editor.take_batches()[0].actions, vec![NormalizedAction::HistoryUndo]);
}

#[test]
fn test_unknown_input_type_is_dropped() {
    let mut editor = Editor::new("hello");
    editor.before_input(InputType::Other("insertOrderedList".into()), None);
    editor.input(InputType::Other("insertOrderedList".into()), None);
    editor.settle();
    assert!(editor.batches().is_empty());
}

// ============================================================================
// SELECTION
// ============================================================================

#[test]
fn test_click_moves_caret() {
    let mut editor = Editor::new("hello world");
    let text = editor.text;
    editor.pointer_down(12.0, 10.0);
    editor.caret(text, 1);
    editor.selection_change();
    editor.settle();

    let batches = editor.take_batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].actions, vec![NormalizedAction::SetSelection { selection: forward(text, 1, 1) }]);
    assert!(batches[0].mutated_elements.is_empty());
}

#[test]
fn test_tap_moves_caret() {
    let mut editor = Editor::new("hello world");
    let text = editor.text;
    editor.dispatch(Notification::Touch(TouchEvent::start(52.0, 10.0)));
    editor.caret(text, 5);
    editor.selection_change();
    editor.dispatch(Notification::Touch(TouchEvent::end(52.0, 10.0)));
    editor.settle();

    assert_eq!(
        editor.take_batches()[0].actions,
        vec![NormalizedAction::SetSelection { selection: forward(text, 5, 5) }]
    );
}

#[test]
fn test_click_then_type_reports_selection_first() {
    let mut editor = Editor::new("hello world");
    let mut model = TextModel::new("hello world", 11);
    let text = editor.text;
    editor.pointer_down(52.0, 10.0);
    editor.caret(text, 5);
    editor.selection_change();

    let x = Key::Character('x');
    editor.key_down(x.clone());
    editor.before_input(InputType::InsertText, Some("x"));
    editor.insert(text, 5, "x");
    editor.input(InputType::InsertText, Some("x"));
    editor.key_up(x);
    editor.settle();

    let batches = editor.take_batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(
        batches[0].actions,
        vec![
            NormalizedAction::SetSelection { selection: forward(text, 5, 5) },
            NormalizedAction::insert_text("x"),
        ]
    );
    model.apply(&batches[0]);
    assert_eq!(model.text(), editor.content());
}

#[test]
fn test_direction_follows_document_order() {
    let mut editor = Editor::new("hello world");
    let text = editor.text;
    editor.select((text, 8), (text, 2));
    editor.selection_change();
    editor.settle();

    let batch = &editor.take_batches()[0];
    assert_eq!(
        batch.actions,
        vec![NormalizedAction::SetSelection {
            selection: SelectionDescription::new(
                DomPoint::new(text, 8),
                DomPoint::new(text, 2),
                Direction::Backward
            ),
        }]
    );
}

#[test]
fn test_navigation_without_movement_emits_nothing() {
    let mut editor = Editor::new("hello world");
    editor.key_down(Key::ArrowRight);
    editor.key_up(Key::ArrowRight);
    editor.settle();
    assert!(editor.batches().is_empty());
}

#[test]
fn test_select_all_skips_hidden_and_trailing_break() {
    let mut hidden_text = None;
    let mut two = None;
    let mut editor = Editor::with_setup("One", NormalizerConfig::default(), |doc, root| {
        let tree = doc.tree_mut();
        let hidden = tree.create_element("p");
        tree.set_attr(hidden, "style", "display: none").unwrap();
        let secret = tree.create_text("secret");
        tree.append_child(hidden, secret).unwrap();
        tree.append_child(root, hidden).unwrap();

        let p = tree.create_element("p");
        let text = tree.create_text("Two");
        tree.append_child(p, text).unwrap();
        tree.append_child(root, p).unwrap();

        let last = tree.create_element("p");
        let br = tree.create_element("br");
        tree.append_child(last, br).unwrap();
        tree.append_child(root, last).unwrap();

        hidden_text = Some(secret);
        two = Some(text);
    });
    let one = editor.text;
    let two = two.unwrap();
    assert!(hidden_text.is_some());
    let root = editor.root;

    editor.key_down_with(Key::Character('a'), KeyModifiers::ctrl());
    editor.select((root, 0), (root, 4));
    editor.selection_change();
    editor.key_up(Key::Character('a'));
    editor.settle();

    let batches = editor.take_batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(
        batches[0].actions,
        vec![NormalizedAction::SelectAll {
            caret_position: Some(DomPoint::new(one, 3)),
            selection: SelectionDescription::new(DomPoint::new(one, 0), DomPoint::new(two, 3), Direction::Forward),
        }]
    );
}

#[test]
fn test_click_then_select_all_keeps_click_caret() {
    let mut editor = Editor::new("hello world");
    let text = editor.text;
    editor.pointer_down(32.0, 10.0);
    editor.select((text, 0), (text, 11));
    editor.selection_change();
    editor.settle();

    assert_eq!(
        editor.take_batches()[0].actions,
        vec![NormalizedAction::SelectAll {
            caret_position: Some(DomPoint::new(text, 3)),
            selection: forward(text, 0, 11),
        }]
    );
}

#[test]
fn test_touch_select_all_keeps_touch_caret() {
    let mut editor = Editor::new("hello world");
    let text = editor.text;
    editor.dispatch(Notification::Touch(TouchEvent::start(72.0, 10.0)));
    editor.select((text, 0), (text, 11));
    editor.selection_change();
    editor.settle();

    let batch = &editor.take_batches()[0];
    let NormalizedAction::SelectAll { caret_position, .. } = &batch.actions[0] else {
        panic!("expected selectAll, got {:?}", batch.action_names());
    };
    assert_eq!(*caret_position, Some(DomPoint::new(text, 7)));
}

// ============================================================================
// CLIPBOARD
// ============================================================================

fn default_prevented(notification: &Notification<NodeId>) -> bool {
    match notification {
        Notification::Clipboard(ev) => ev.default_prevented(),
        Notification::Drag(ev) => ev.default_prevented(),
        _ => false,
    }
}

#[test]
fn test_paste_text_is_prevented() {
    let mut editor = Editor::new("hello ");
    editor.key_down_with(Key::Character('v'), KeyModifiers::ctrl());
    let paste = editor.paste(DataTransfer::text("world"));
    editor.key_up(Key::Character('v'));
    editor.settle();

    assert!(default_prevented(&paste));
    let batches = editor.take_batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].actions, vec![NormalizedAction::insert_text("world")]);
    assert_eq!(editor.content(), "hello ");
}

#[test]
fn test_paste_bare_url_inserts_link() {
    let mut editor = Editor::new("");
    editor.paste(DataTransfer::text("https://example.com/"));
    editor.settle();

    assert_eq!(
        editor.take_batches()[0].actions,
        vec![NormalizedAction::InsertHtml {
            html: "<a href=\"https://example.com/\">https://example.com/</a>".into(),
            text: "https://example.com/".into(),
        }]
    );
}

#[test]
fn test_paste_files() {
    let mut editor = Editor::new("");
    let mut data = DataTransfer::new();
    data.add_file(FileInfo::new("report.pdf", "application/pdf", 2048));
    editor.paste(data);
    editor.settle();

    let batch = &editor.take_batches()[0];
    let NormalizedAction::InsertFiles { files } = &batch.actions[0] else {
        panic!("expected insertFiles, got {:?}", batch.action_names());
    };
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].mime_type, "application/pdf");
}

#[test]
fn test_paste_html() {
    let mut editor = Editor::new("hello ");
    let paste = editor.paste(DataTransfer::html("<i>there</i>", "there"));
    editor.settle();

    assert!(default_prevented(&paste));
    assert_eq!(
        editor.take_batches()[0].actions,
        vec![NormalizedAction::InsertHtml { html: "<i>there</i>".into(), text: "there".into() }]
    );
}

#[test]
fn test_cut_deletes_selection_forward() {
    let mut editor = Editor::new("hello world");
    let text = editor.text;
    editor.select((text, 6), (text, 11));
    editor.selection_change();
    editor.settle();
    assert_eq!(
        editor.take_batches()[0].actions,
        vec![NormalizedAction::SetSelection { selection: forward(text, 6, 11) }]
    );

    editor.key_down_with(Key::Character('x'), KeyModifiers::ctrl());
    editor.dispatch(Notification::Clipboard(ClipboardEvent::before_cut()));
    editor.dispatch(Notification::Clipboard(ClipboardEvent::cut()));
    editor.delete(text, 6, 11);
    editor.before_input(InputType::DeleteByCut, None);
    editor.input(InputType::DeleteByCut, None);
    editor.key_up(Key::Character('x'));
    editor.settle();

    let batches = editor.take_batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].actions, vec![NormalizedAction::DeleteContent { direction: Direction::Forward }]);
    assert_eq!(batches[0].mutated_elements, HashSet::from([text]));
}

#[test]
fn test_cut_with_collapsed_selection_is_empty() {
    let mut editor = Editor::new("hello");
    editor.dispatch(Notification::Clipboard(ClipboardEvent::before_cut()));
    editor.dispatch(Notification::Clipboard(ClipboardEvent::cut()));
    editor.settle();
    assert!(editor.batches().is_empty());
}

// ============================================================================
// DRAG AND DROP
// ============================================================================

#[test]
fn test_external_html_drop() {
    let mut editor = Editor::new("hello world");
    let text = editor.text;
    let dropped = editor.drop_data(50.0, 10.0, DataTransfer::html("<b>hi</b>", "hi"));
    editor.settle();

    assert!(default_prevented(&dropped));
    let batches = editor.take_batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(
        batches[0].actions,
        vec![
            NormalizedAction::SetSelection { selection: forward(text, 5, 5) },
            NormalizedAction::InsertHtml { html: "<b>hi</b>".into(), text: "hi".into() },
        ]
    );
}

#[test]
fn test_internal_drag_moves_text() {
    let mut editor = Editor::new("hello world");
    let mut model = TextModel::new("hello world", 11);
    let text = editor.text;
    editor.select((text, 0), (text, 5));
    editor.selection_change();
    editor.settle();

    editor.dispatch(Notification::Drag(DragEvent::drag_start(20.0, 10.0)));
    editor.drop_data(110.0, 10.0, DataTransfer::text("hello"));
    editor.dispatch(Notification::Drag(DragEvent::drag_end(110.0, 10.0)));
    editor.settle();

    let batches = editor.take_batches();
    assert_eq!(batches.len(), 2);
    // The drop point is measured before the source is removed
    assert_eq!(
        batches[1].actions,
        vec![
            NormalizedAction::DeleteContent { direction: Direction::Forward },
            NormalizedAction::SetSelection { selection: forward(text, 6, 6) },
            NormalizedAction::insert_text("hello"),
        ]
    );
    for batch in &batches {
        model.apply(batch);
    }
    assert_eq!(model.text(), " worldhello");
}

#[test]
fn test_drop_files() {
    let mut editor = Editor::new("hello world");
    let text = editor.text;
    let mut data = DataTransfer::new();
    data.add_file(FileInfo::new("cat.png", "image/png", 512));
    let dropped = editor.drop_data(50.0, 10.0, data);
    editor.settle();

    assert!(default_prevented(&dropped));
    let batch = &editor.take_batches()[0];
    assert_eq!(batch.actions[0], NormalizedAction::SetSelection { selection: forward(text, 5, 5) });
    let NormalizedAction::InsertFiles { files } = &batch.actions[1] else {
        panic!("expected insertFiles, got {:?}", batch.action_names());
    };
    assert_eq!(files[0].name, "cat.png");
}

// ============================================================================
// LIFECYCLE
// ============================================================================

#[test]
fn test_destroy_detaches_and_rejects_use() {
    let mut editor = Editor::new("hello world");
    let (root, text) = (editor.root, editor.text);
    editor.key_down(Key::Character('o'));
    editor.insert(text, 11, "o");
    editor.normalizer.destroy();

    {
        let doc = editor.document.borrow();
        assert_eq!(doc.listeners().listener_count(root), 0);
        assert!(!doc.listeners().has_listener(NodeId::ROOT, "selectionchange"));
        assert!(!doc.tree().observer().is_observing());
    }

    let mut keyup = Notification::Key(fos_events::KeyboardEvent::key_up(Key::Character('o')));
    assert_eq!(editor.normalizer.dispatch(&mut keyup), Err(NormalizerError::Destroyed));
    assert_eq!(editor.normalizer.tick(), Err(NormalizerError::Destroyed));
    assert_eq!(editor.normalizer.settle(), Err(NormalizerError::Destroyed));

    // Idempotent, and the open gesture never flushes
    editor.normalizer.destroy();
    assert!(editor.normalizer.is_destroyed());
    assert!(editor.normalizer.registry().is_empty());
    assert!(editor.batches().is_empty());
}

#[test]
fn test_mutation_outside_root_is_rejected() {
    let mut editor = Editor::new("hello");
    let body = editor.document.borrow().body();
    let mut record = Notification::Mutation(MutationRecord::character_data(body, None, Some("x".into())));
    let result = editor.normalizer.dispatch(&mut record);
    assert!(matches!(result, Err(NormalizerError::OutsideRoot(_))), "{result:?}");
}

// ============================================================================
// REPLAY AND SERIALIZATION
// ============================================================================

#[test]
fn test_replay_reproduces_the_dom() {
    let mut editor = Editor::new("hello world");
    let mut model = TextModel::new("hello world", 11);
    let text = editor.text;

    type_o(&mut editor, Ordering::Standard);
    editor.settle();

    editor.key_down(Key::Backspace);
    editor.before_input(InputType::DeleteContentBackward, None);
    editor.delete(text, 11, 12);
    editor.input(InputType::DeleteContentBackward, None);
    editor.settle();

    editor.key_down_with(Key::Backspace, KeyModifiers::ctrl());
    editor.before_input(InputType::DeleteWordBackward, None);
    editor.delete(text, 6, 11);
    editor.input(InputType::DeleteWordBackward, None);
    editor.settle();

    type_o(&mut editor, Ordering::Legacy);
    editor.settle();

    let batches = editor.take_batches();
    assert_eq!(batches.len(), 4);
    assert!(batches.iter().all(|b| !b.actions.is_empty()));
    for batch in &batches {
        model.apply(batch);
    }
    assert_eq!(model.text(), editor.content());
    assert_eq!(model.text(), "hello o");
}

#[test]
fn test_batch_serializes_to_json() {
    let mut editor = Editor::new("hello world");
    type_o(&mut editor, Ordering::Standard);
    editor.settle();

    let batch = &editor.take_batches()[0];
    let json = serde_json::to_value(batch).unwrap();
    assert_eq!(json["actions"][0]["type"], "insertText");
    assert_eq!(json["actions"][0]["text"], "o");
    assert_eq!(json["mutatedElements"].as_array().map(Vec::len), Some(1));

    let back: fos_editing::EventBatch<NodeId> = serde_json::from_value(json).unwrap();
    assert_eq!(&back, batch);
}
