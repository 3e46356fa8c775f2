//! Browser ordering tests
//!
//! The same gesture, reported the way different engines report it, must
//! come out as the same batch.

mod common;

use std::collections::HashSet;

use common::{Editor, ORDERINGS, TextModel, type_o};
use fos_editing::{
    Direction, DomPoint, NormalizedAction, NormalizerConfig, Notification, SchedulerState,
    SegmentState, SelectionDescription,
};
use fos_events::{InputEvent, InputType, Key, KeyboardEvent};

// ============================================================================
// TYPING
// ============================================================================

#[test]
fn test_typing_orderings_produce_one_insert() {
    for ordering in ORDERINGS {
        let mut editor = Editor::new("hello world");
        let live = type_o(&mut editor, ordering);
        editor.settle();

        let batches = editor.take_batches();
        assert_eq!(batches.len(), 1, "{ordering:?}");
        assert_eq!(batches[0].actions, vec![NormalizedAction::insert_text("o")], "{ordering:?}");
        assert_eq!(batches[0].mutated_elements, HashSet::from([live]), "{ordering:?}");
        assert_eq!(editor.text_of(live), "hello worldo", "{ordering:?}");
    }
}

#[test]
fn test_typing_orderings_on_mac() {
    for ordering in ORDERINGS {
        let mut editor = Editor::with_config("hello world", NormalizerConfig::mac());
        type_o(&mut editor, ordering);
        editor.settle();
        let names: Vec<_> = editor.take_batches().iter().flat_map(|b| b.action_names()).collect();
        assert_eq!(names, vec!["insertText"], "{ordering:?}");
    }
}

#[test]
fn test_flush_waits_for_two_quiet_ticks() {
    let mut editor = Editor::new("hello world");
    type_o(&mut editor, common::Ordering::Standard);

    editor.tick();
    assert!(editor.batches().is_empty());
    assert_eq!(editor.normalizer.state(), SchedulerState::Collecting);

    editor.tick();
    assert_eq!(editor.batches().len(), 1);
    assert_eq!(editor.normalizer.state(), SchedulerState::Idle);
}

#[test]
fn test_consecutive_keystrokes_share_a_quiet_window() {
    let mut editor = Editor::new("hello world");
    type_o(&mut editor, common::Ordering::Standard);
    type_o(&mut editor, common::Ordering::Standard);
    editor.settle();

    let batches = editor.take_batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(
        batches[0].actions,
        vec![NormalizedAction::insert_text("o"), NormalizedAction::insert_text("o")]
    );
    assert_eq!(editor.content(), "hello worldoo");
}

#[test]
fn test_canceled_keypress_produces_nothing() {
    let mut editor = Editor::new("hello world");
    let o = Key::Character('o');
    editor.key_down(o.clone());
    let mut keypress = KeyboardEvent::key_press(o.clone());
    fos_events::Event::prevent_default(&mut keypress);
    editor.dispatch(Notification::Key(keypress));
    editor.key_up(o);
    editor.settle();

    assert!(editor.batches().is_empty());
    assert_eq!(editor.content(), "hello world");
}

#[test]
fn test_redundant_selectionchange_is_a_no_op() {
    let mut editor = Editor::new("hello world");
    editor.selection_change();
    assert_eq!(editor.normalizer.state(), SchedulerState::Idle);
    editor.settle();
    assert!(editor.batches().is_empty());
}

// ============================================================================
// COMPOSITION
// ============================================================================

fn composing(input: InputEvent) -> Notification<fos_dom::NodeId> {
    Notification::Input(input.composing(true))
}

#[test]
fn test_dead_key_flushes_placeholder_then_replaces_it() {
    let mut editor = Editor::with_config("hello world", NormalizerConfig::mac());
    let text = editor.text;
    let mut model = TextModel::new("hello world", 11);

    editor.key_down(Key::Dead);
    editor.composition_start("");
    editor.composition_update("^");
    editor.dispatch(composing(InputEvent::before(InputType::InsertCompositionText, Some("^"))));
    editor.insert(text, 11, "^");
    editor.dispatch(composing(InputEvent::after(InputType::InsertCompositionText, Some("^"))));
    editor.key_up(Key::Dead);
    editor.settle();

    let first = editor.take_batches();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].actions, vec![NormalizedAction::insert_text("^")]);
    model.apply(&first[0]);
    assert_eq!(model.text(), "hello world^");

    let o = Key::Character('o');
    editor.dispatch(Notification::Key(KeyboardEvent::key_down(o.clone()).composing(true)));
    editor.composition_update("ô");
    editor.dispatch(composing(InputEvent::before(InputType::InsertCompositionText, Some("ô"))));
    editor.set_text(text, "hello worldô", 12);
    editor.dispatch(composing(InputEvent::after(InputType::InsertCompositionText, Some("ô"))));
    editor.composition_end("ô");
    editor.key_up(o);
    editor.settle();

    let second = editor.take_batches();
    assert_eq!(second.len(), 1);
    assert_eq!(
        second[0].actions,
        vec![
            NormalizedAction::SetSelection {
                selection: SelectionDescription::new(
                    DomPoint::new(text, 11),
                    DomPoint::new(text, 12),
                    Direction::Forward
                ),
            },
            NormalizedAction::insert_text("ô"),
        ]
    );
    model.apply(&second[0]);
    assert_eq!(model.text(), editor.content());
}

#[test]
fn test_ime_composition_holds_the_transaction() {
    let mut editor = Editor::new("hello ");
    let text = editor.text;

    editor.key_down(Key::Process);
    editor.composition_start("");
    editor.composition_update("wor");
    editor.set_text(text, "hello wor", 9);
    editor.dispatch(composing(InputEvent::after(InputType::InsertCompositionText, Some("wor"))));
    editor.settle();

    assert!(editor.batches().is_empty());
    assert_eq!(editor.normalizer.state(), SchedulerState::Collecting);
    assert_eq!(editor.normalizer.segment_state(), SegmentState::AwaitingResolution);

    editor.composition_update("world");
    editor.set_text(text, "hello world", 11);
    editor.dispatch(composing(InputEvent::after(InputType::InsertCompositionText, Some("world"))));
    editor.composition_end("world");
    editor.settle();

    let batches = editor.take_batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].actions, vec![NormalizedAction::insert_text("world")]);
}

#[test]
fn test_ime_autocorrect_then_separator() {
    let mut editor = Editor::new("teh");
    let text = editor.text;
    let mut model = TextModel::new("teh", 3);

    editor.key_down(Key::Process);
    editor.composition_start("");
    editor.composition_update("the");
    editor.dispatch(composing(InputEvent::before(InputType::InsertCompositionText, Some("the"))));
    editor.set_text(text, "the", 3);
    editor.dispatch(composing(InputEvent::after(InputType::InsertCompositionText, Some("the"))));
    editor.composition_end("the");
    editor.before_input(InputType::InsertText, Some(" "));
    editor.insert(text, 3, " ");
    editor.input(InputType::InsertText, Some(" "));
    editor.key_up(Key::Process);
    editor.settle();

    let batches = editor.take_batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(
        batches[0].actions,
        vec![
            NormalizedAction::SetSelection {
                selection: SelectionDescription::new(
                    DomPoint::new(text, 0),
                    DomPoint::new(text, 3),
                    Direction::Forward
                ),
            },
            NormalizedAction::insert_text("the"),
            NormalizedAction::insert_text(" "),
        ]
    );
    assert_eq!(batches[0].mutated_elements, HashSet::from([text]));

    model.apply(&batches[0]);
    assert_eq!(model.text(), "the ");
    assert_eq!(model.text(), editor.content());
}
