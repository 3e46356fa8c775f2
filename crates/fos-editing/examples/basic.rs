//! Example: type a character into an editable root and print the batch

use std::cell::RefCell;
use std::rc::Rc;

use fos_dom::{BoundaryPoint, Document};
use fos_editing::{DomRoot, Normalizer, Notification};
use fos_events::{InputEvent, InputType, Key, KeyboardEvent};

fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let document = Rc::new(RefCell::new(Document::new()));
    let (editor, text) = {
        let mut doc = document.borrow_mut();
        let body = doc.body();
        let tree = doc.tree_mut();
        let editor = tree.create_element("div");
        let text = tree.create_text("hello world");
        tree.append_child(body, editor).expect("body accepts children");
        tree.append_child(editor, text).expect("editor accepts children");
        doc.collapse(BoundaryPoint::new(text, 11));
        (editor, text)
    };

    let root = DomRoot::new(document.clone(), editor);
    let mut normalizer = Normalizer::new(root, |batch| {
        println!("{}", serde_json::to_string_pretty(&batch).unwrap_or_default());
    });

    let mut notifications = vec![
        Notification::Key(KeyboardEvent::key_down(Key::Character('!'))),
        Notification::Input(InputEvent::before(InputType::InsertText, Some("!"))),
    ];
    for notification in &mut notifications {
        normalizer.dispatch(notification).expect("normalizer is live");
    }

    // The browser edits the DOM
    {
        let mut doc = document.borrow_mut();
        doc.tree_mut().insert_text(text, 11, "!").expect("offset in range");
        doc.collapse(BoundaryPoint::new(text, 12));
    }

    let mut input = Notification::Input(InputEvent::after(InputType::InsertText, Some("!")));
    normalizer.dispatch(&mut input).expect("normalizer is live");
    normalizer.settle().expect("normalizer is live");
    normalizer.destroy();
}
