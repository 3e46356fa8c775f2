//! Classification rule tables
//!
//! Browser quirks live here as rows, not as branches. Rows are matched top
//! to bottom and the first match wins, so more specific modifier patterns
//! come before the general ones.

use fos_events::{InputType, Key, KeyModifiers, KeyboardEvent};

use crate::action::Direction;
use crate::config::Platform;

/// Deletion unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Granularity {
    Character,
    Word,
    SoftLine,
    HardLine,
}

/// What a segment asked for, before looking at the diff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Intent {
    InsertText,
    InsertLineBreak,
    InsertParagraph,
    /// Spellcheck or autocorrect replacing a word
    Replace,
    Delete(Granularity, Direction),
    Format(&'static str),
    Undo,
    Redo,
    /// Cut, paste and drop are classified from the clipboard events
    Clipboard,
    /// Composition-scoped input outside the composition that owns it
    Composition,
}

impl Intent {
    /// Word and line deletes take their granularity from the keydown
    /// modifiers, whatever `inputType` says
    pub(crate) fn is_modifier_delete(&self) -> bool {
        matches!(self, Self::Delete(Granularity::Word | Granularity::SoftLine | Granularity::HardLine, _))
    }

    pub(crate) fn is_delete(&self) -> bool {
        matches!(self, Self::Delete(..))
    }
}

pub(crate) struct InputTypeRule {
    pub input_type: InputType,
    pub intent: Intent,
}

pub(crate) const INPUT_TYPE_RULES: &[InputTypeRule] = &[
    InputTypeRule { input_type: InputType::InsertText, intent: Intent::InsertText },
    InputTypeRule { input_type: InputType::InsertReplacementText, intent: Intent::Replace },
    InputTypeRule { input_type: InputType::InsertLineBreak, intent: Intent::InsertLineBreak },
    InputTypeRule { input_type: InputType::InsertParagraph, intent: Intent::InsertParagraph },
    InputTypeRule { input_type: InputType::InsertCompositionText, intent: Intent::Composition },
    InputTypeRule { input_type: InputType::InsertFromComposition, intent: Intent::Composition },
    InputTypeRule { input_type: InputType::DeleteByComposition, intent: Intent::Composition },
    InputTypeRule { input_type: InputType::DeleteCompositionText, intent: Intent::Composition },
    InputTypeRule { input_type: InputType::InsertFromPaste, intent: Intent::Clipboard },
    InputTypeRule { input_type: InputType::InsertFromDrop, intent: Intent::Clipboard },
    InputTypeRule { input_type: InputType::DeleteByCut, intent: Intent::Clipboard },
    InputTypeRule { input_type: InputType::DeleteByDrag, intent: Intent::Clipboard },
    InputTypeRule {
        input_type: InputType::DeleteContentBackward,
        intent: Intent::Delete(Granularity::Character, Direction::Backward),
    },
    InputTypeRule {
        input_type: InputType::DeleteContentForward,
        intent: Intent::Delete(Granularity::Character, Direction::Forward),
    },
    InputTypeRule {
        input_type: InputType::DeleteWordBackward,
        intent: Intent::Delete(Granularity::Word, Direction::Backward),
    },
    InputTypeRule {
        input_type: InputType::DeleteWordForward,
        intent: Intent::Delete(Granularity::Word, Direction::Forward),
    },
    InputTypeRule {
        input_type: InputType::DeleteSoftLineBackward,
        intent: Intent::Delete(Granularity::SoftLine, Direction::Backward),
    },
    InputTypeRule {
        input_type: InputType::DeleteSoftLineForward,
        intent: Intent::Delete(Granularity::SoftLine, Direction::Forward),
    },
    InputTypeRule {
        input_type: InputType::DeleteHardLineBackward,
        intent: Intent::Delete(Granularity::HardLine, Direction::Backward),
    },
    InputTypeRule {
        input_type: InputType::DeleteHardLineForward,
        intent: Intent::Delete(Granularity::HardLine, Direction::Forward),
    },
    InputTypeRule { input_type: InputType::HistoryUndo, intent: Intent::Undo },
    InputTypeRule { input_type: InputType::HistoryRedo, intent: Intent::Redo },
    InputTypeRule { input_type: InputType::FormatBold, intent: Intent::Format("bold") },
    InputTypeRule { input_type: InputType::FormatItalic, intent: Intent::Format("italic") },
    InputTypeRule { input_type: InputType::FormatUnderline, intent: Intent::Format("underline") },
    InputTypeRule { input_type: InputType::FormatStrikeThrough, intent: Intent::Format("strikeThrough") },
    InputTypeRule { input_type: InputType::FormatSuperscript, intent: Intent::Format("superscript") },
    InputTypeRule { input_type: InputType::FormatSubscript, intent: Intent::Format("subscript") },
    InputTypeRule { input_type: InputType::FormatFontColor, intent: Intent::Format("fontColor") },
    InputTypeRule { input_type: InputType::FormatBackColor, intent: Intent::Format("backColor") },
    InputTypeRule { input_type: InputType::FormatRemove, intent: Intent::Format("remove") },
];

/// Which key a row matches
#[derive(Debug, Clone)]
pub(crate) enum KeyPattern {
    Named(Key),
    /// Letter, case-insensitive
    Letter(char),
    /// Any printable character
    Printable,
}

/// `None` means "don't care"
#[derive(Debug, Clone, Copy)]
pub(crate) struct ModifierPattern {
    pub shift: Option<bool>,
    pub ctrl: Option<bool>,
    pub alt: Option<bool>,
    pub meta: Option<bool>,
}

const ANY: ModifierPattern = ModifierPattern { shift: None, ctrl: None, alt: None, meta: None };
const BARE: ModifierPattern = ModifierPattern { shift: None, ctrl: Some(false), alt: None, meta: Some(false) };

impl ModifierPattern {
    fn matches(&self, modifiers: &KeyModifiers) -> bool {
        let check = |pattern: Option<bool>, actual: bool| pattern.is_none_or(|p| p == actual);
        check(self.shift, modifiers.shift)
            && check(self.ctrl, modifiers.ctrl)
            && check(self.alt, modifiers.alt)
            && check(self.meta, modifiers.meta)
    }
}

pub(crate) struct KeyRule {
    pub key: KeyPattern,
    /// `None` matches every platform
    pub platform: Option<Platform>,
    pub modifiers: ModifierPattern,
    pub intent: Intent,
}

const fn row(key: KeyPattern, platform: Option<Platform>, modifiers: ModifierPattern, intent: Intent) -> KeyRule {
    KeyRule { key, platform, modifiers, intent }
}

const MAC: Option<Platform> = Some(Platform::Mac);
const OTHER: Option<Platform> = Some(Platform::Other);
const BACKSPACE: KeyPattern = KeyPattern::Named(Key::Backspace);
const DELETE: KeyPattern = KeyPattern::Named(Key::Delete);
const ENTER: KeyPattern = KeyPattern::Named(Key::Enter);

const fn with(shift: bool, ctrl: bool, alt: bool, meta: bool) -> ModifierPattern {
    ModifierPattern { shift: Some(shift), ctrl: Some(ctrl), alt: Some(alt), meta: Some(meta) }
}

pub(crate) const KEY_RULES: &[KeyRule] = &[
    // Line deletion: Cmd on Mac, Ctrl+Shift elsewhere
    row(BACKSPACE, MAC, ModifierPattern { meta: Some(true), ..ANY }, Intent::Delete(Granularity::SoftLine, Direction::Backward)),
    row(DELETE, MAC, ModifierPattern { meta: Some(true), ..ANY }, Intent::Delete(Granularity::SoftLine, Direction::Forward)),
    row(BACKSPACE, OTHER, ModifierPattern { ctrl: Some(true), shift: Some(true), ..ANY }, Intent::Delete(Granularity::SoftLine, Direction::Backward)),
    row(DELETE, OTHER, ModifierPattern { ctrl: Some(true), shift: Some(true), ..ANY }, Intent::Delete(Granularity::SoftLine, Direction::Forward)),
    // Word deletion: Option on Mac, Ctrl elsewhere
    row(BACKSPACE, MAC, ModifierPattern { alt: Some(true), ..ANY }, Intent::Delete(Granularity::Word, Direction::Backward)),
    row(DELETE, MAC, ModifierPattern { alt: Some(true), ..ANY }, Intent::Delete(Granularity::Word, Direction::Forward)),
    row(BACKSPACE, OTHER, ModifierPattern { ctrl: Some(true), ..ANY }, Intent::Delete(Granularity::Word, Direction::Backward)),
    row(DELETE, OTHER, ModifierPattern { ctrl: Some(true), ..ANY }, Intent::Delete(Granularity::Word, Direction::Forward)),
    row(BACKSPACE, None, ANY, Intent::Delete(Granularity::Character, Direction::Backward)),
    row(DELETE, None, ANY, Intent::Delete(Granularity::Character, Direction::Forward)),
    row(ENTER, None, ModifierPattern { shift: Some(true), ..ANY }, Intent::InsertLineBreak),
    row(ENTER, None, ANY, Intent::InsertParagraph),
    // History
    row(KeyPattern::Letter('z'), MAC, with(true, false, false, true), Intent::Redo),
    row(KeyPattern::Letter('z'), MAC, with(false, false, false, true), Intent::Undo),
    row(KeyPattern::Letter('z'), OTHER, with(true, true, false, false), Intent::Redo),
    row(KeyPattern::Letter('y'), OTHER, with(false, true, false, false), Intent::Redo),
    row(KeyPattern::Letter('z'), OTHER, with(false, true, false, false), Intent::Undo),
    // Formatting shortcuts
    row(KeyPattern::Letter('b'), MAC, with(false, false, false, true), Intent::Format("bold")),
    row(KeyPattern::Letter('i'), MAC, with(false, false, false, true), Intent::Format("italic")),
    row(KeyPattern::Letter('u'), MAC, with(false, false, false, true), Intent::Format("underline")),
    row(KeyPattern::Letter('b'), OTHER, with(false, true, false, false), Intent::Format("bold")),
    row(KeyPattern::Letter('i'), OTHER, with(false, true, false, false), Intent::Format("italic")),
    row(KeyPattern::Letter('u'), OTHER, with(false, true, false, false), Intent::Format("underline")),
    row(KeyPattern::Printable, None, BARE, Intent::InsertText),
];

/// Intent for an explicit `inputType`
pub(crate) fn match_input_type(input_type: &InputType) -> Option<Intent> {
    INPUT_TYPE_RULES
        .iter()
        .find(|rule| rule.input_type == *input_type)
        .map(|rule| rule.intent)
}

/// Intent for a keydown
pub(crate) fn match_key(event: &KeyboardEvent, platform: Platform) -> Option<Intent> {
    KEY_RULES
        .iter()
        .find(|rule| {
            rule.platform.is_none_or(|p| p == platform)
                && rule.modifiers.matches(&event.modifiers)
                && key_matches(&rule.key, &event.key)
        })
        .map(|rule| rule.intent)
}

fn key_matches(pattern: &KeyPattern, key: &Key) -> bool {
    match pattern {
        KeyPattern::Named(named) => named == key,
        KeyPattern::Letter(letter) => matches!(key, Key::Character(c) if c.eq_ignore_ascii_case(letter)),
        KeyPattern::Printable => key.as_char().is_some(),
    }
}

/// Ctrl+A, or Cmd+A on Mac
pub(crate) fn is_select_all(event: &KeyboardEvent, platform: Platform) -> bool {
    let command = match platform {
        Platform::Mac => event.modifiers.meta && !event.modifiers.ctrl,
        Platform::Other => event.modifiers.ctrl && !event.modifiers.meta,
    };
    command && key_matches(&KeyPattern::Letter('a'), &event.key)
}

/// Keys that only move the caret or change the selection
pub(crate) fn is_selection_key(event: &KeyboardEvent, platform: Platform) -> bool {
    event.key.is_navigation() || is_select_all(event, platform)
}
