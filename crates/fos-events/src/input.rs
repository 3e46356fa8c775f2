//! Input Events
//!
//! `beforeinput` and `input`, with the W3C Input Events `inputType` values.

use serde::{Deserialize, Serialize};

use crate::Event;

/// Input event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    pub event_type: InputEventType,
    /// Absent in browsers without Input Events Level 2
    pub input_type: Option<InputType>,
    pub data: Option<String>,
    pub is_composing: bool,
    pub timestamp: f64,
    #[serde(default)]
    default_prevented: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEventType {
    BeforeInput,
    Input,
}

/// `inputType` values
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InputType {
    InsertText,
    InsertReplacementText,
    InsertLineBreak,
    InsertParagraph,
    InsertCompositionText,
    InsertFromComposition,
    InsertFromPaste,
    InsertFromDrop,
    DeleteContentBackward,
    DeleteContentForward,
    DeleteWordBackward,
    DeleteWordForward,
    DeleteSoftLineBackward,
    DeleteSoftLineForward,
    DeleteHardLineBackward,
    DeleteHardLineForward,
    DeleteByCut,
    DeleteByDrag,
    DeleteByComposition,
    DeleteCompositionText,
    HistoryUndo,
    HistoryRedo,
    FormatBold,
    FormatItalic,
    FormatUnderline,
    FormatStrikeThrough,
    FormatSuperscript,
    FormatSubscript,
    FormatFontColor,
    FormatBackColor,
    FormatRemove,
    /// Anything else a browser reports
    Other(String),
}

const NAMES: &[(InputType, &str)] = &[
    (InputType::InsertText, "insertText"),
    (InputType::InsertReplacementText, "insertReplacementText"),
    (InputType::InsertLineBreak, "insertLineBreak"),
    (InputType::InsertParagraph, "insertParagraph"),
    (InputType::InsertCompositionText, "insertCompositionText"),
    (InputType::InsertFromComposition, "insertFromComposition"),
    (InputType::InsertFromPaste, "insertFromPaste"),
    (InputType::InsertFromDrop, "insertFromDrop"),
    (InputType::DeleteContentBackward, "deleteContentBackward"),
    (InputType::DeleteContentForward, "deleteContentForward"),
    (InputType::DeleteWordBackward, "deleteWordBackward"),
    (InputType::DeleteWordForward, "deleteWordForward"),
    (InputType::DeleteSoftLineBackward, "deleteSoftLineBackward"),
    (InputType::DeleteSoftLineForward, "deleteSoftLineForward"),
    (InputType::DeleteHardLineBackward, "deleteHardLineBackward"),
    (InputType::DeleteHardLineForward, "deleteHardLineForward"),
    (InputType::DeleteByCut, "deleteByCut"),
    (InputType::DeleteByDrag, "deleteByDrag"),
    (InputType::DeleteByComposition, "deleteByComposition"),
    (InputType::DeleteCompositionText, "deleteCompositionText"),
    (InputType::HistoryUndo, "historyUndo"),
    (InputType::HistoryRedo, "historyRedo"),
    (InputType::FormatBold, "formatBold"),
    (InputType::FormatItalic, "formatItalic"),
    (InputType::FormatUnderline, "formatUnderline"),
    (InputType::FormatStrikeThrough, "formatStrikeThrough"),
    (InputType::FormatSuperscript, "formatSuperscript"),
    (InputType::FormatSubscript, "formatSubscript"),
    (InputType::FormatFontColor, "formatFontColor"),
    (InputType::FormatBackColor, "formatBackColor"),
    (InputType::FormatRemove, "formatRemove"),
];

impl InputType {
    /// Parse an `inputType` string
    pub fn parse(s: &str) -> Self {
        NAMES
            .iter()
            .find(|(_, name)| *name == s)
            .map(|(input_type, _)| input_type.clone())
            .unwrap_or_else(|| Self::Other(s.to_string()))
    }

    /// The `inputType` string
    pub fn as_str(&self) -> &str {
        if let Self::Other(s) = self {
            return s;
        }
        NAMES
            .iter()
            .find(|(input_type, _)| input_type == self)
            .map(|(_, name)| *name)
            .unwrap_or("")
    }

    /// Format name for `format*` types (`formatBold` -> `bold`)
    pub fn format_name(&self) -> Option<String> {
        let rest = self.as_str().strip_prefix("format")?;
        let mut chars = rest.chars();
        let first = chars.next()?;
        Some(first.to_lowercase().chain(chars).collect())
    }

    /// Composition-scoped types, only meaningful inside a composition
    pub fn is_composition(&self) -> bool {
        matches!(
            self,
            Self::InsertCompositionText
                | Self::InsertFromComposition
                | Self::DeleteByComposition
                | Self::DeleteCompositionText
        )
    }
}

impl From<String> for InputType {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<InputType> for String {
    fn from(input_type: InputType) -> Self {
        input_type.as_str().to_string()
    }
}

impl InputEvent {
    pub fn new(event_type: InputEventType, input_type: Option<InputType>, data: Option<&str>) -> Self {
        Self {
            event_type,
            input_type,
            data: data.map(str::to_string),
            is_composing: false,
            timestamp: 0.0,
            default_prevented: false,
        }
    }

    /// `beforeinput` with an `inputType`
    pub fn before(input_type: InputType, data: Option<&str>) -> Self {
        Self::new(InputEventType::BeforeInput, Some(input_type), data)
    }

    /// `input` with an `inputType`
    pub fn after(input_type: InputType, data: Option<&str>) -> Self {
        Self::new(InputEventType::Input, Some(input_type), data)
    }

    /// `input` without an `inputType`, as fired by older engines
    pub fn untyped(data: Option<&str>) -> Self {
        Self::new(InputEventType::Input, None, data)
    }

    /// Mark as fired inside an IME composition
    pub fn composing(mut self, is_composing: bool) -> Self {
        self.is_composing = is_composing;
        self
    }
}

impl Event for InputEvent {
    fn event_type(&self) -> &'static str {
        match self.event_type {
            InputEventType::BeforeInput => "beforeinput",
            InputEventType::Input => "input",
        }
    }

    /// Only `beforeinput` can be canceled
    fn cancelable(&self) -> bool {
        self.event_type == InputEventType::BeforeInput
    }

    fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    fn prevent_default(&mut self) {
        if self.cancelable() {
            self.default_prevented = true;
        }
    }

    fn timestamp(&self) -> f64 {
        self.timestamp
    }
}
