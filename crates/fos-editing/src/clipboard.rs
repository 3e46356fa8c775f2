//! Clipboard and drag classifier
//!
//! Cut, paste and drop are classified from their events alone. Paste and
//! drop are prevented: the consumer inserts the payload itself, so the
//! browser never mutates the root for them.

use fos_events::{DataTransfer, MIME_HTML, MIME_TEXT};
use url::Url;

use crate::action::{Direction, DomPoint, NormalizedAction, SelectionDescription};
use crate::config::NormalizerConfig;
use crate::notification::DomSelection;

#[derive(Debug)]
pub(crate) struct ClipboardClassifier<N> {
    /// Selection when `beforecut` fired
    cut_selection: Option<DomSelection<N>>,
    /// Selection being dragged from inside the root
    drag_source: Option<DomSelection<N>>,
}

impl<N> Default for ClipboardClassifier<N> {
    fn default() -> Self {
        Self {
            cut_selection: None,
            drag_source: None,
        }
    }
}

impl<N: Copy + PartialEq> ClipboardClassifier<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn before_cut(&mut self, selection: Option<DomSelection<N>>) {
        self.cut_selection = selection;
    }

    /// Cut always deletes forward over the selection it started from
    pub fn cut(&mut self) -> Vec<NormalizedAction<N>> {
        match self.cut_selection.take() {
            Some(selection) if !selection.is_collapsed() => {
                vec![NormalizedAction::DeleteContent { direction: Direction::Forward }]
            }
            _ => {
                tracing::trace!("Cut without a selection, nothing to delete");
                Vec::new()
            }
        }
    }

    pub fn paste(&self, data: &DataTransfer, config: &NormalizerConfig) -> Vec<NormalizedAction<N>> {
        classify_payload(data, config).into_iter().collect()
    }

    pub fn drag_start(&mut self, selection: Option<DomSelection<N>>) {
        self.drag_source = selection.filter(|s| !s.is_collapsed());
    }

    pub fn has_drag_source(&self) -> bool {
        self.drag_source.is_some()
    }

    /// Move out of the drag source (when internal), place the caret at the
    /// drop point, insert the payload
    pub fn drop(
        &mut self,
        data: &DataTransfer,
        caret: Option<DomPoint<N>>,
        config: &NormalizerConfig,
    ) -> Vec<NormalizedAction<N>> {
        let Some(insert) = classify_payload(data, config) else {
            tracing::debug!("Drop without a usable payload");
            return Vec::new();
        };
        let mut actions = Vec::new();
        let mut caret = caret;
        if let Some(source) = self.drag_source.take() {
            actions.push(NormalizedAction::DeleteContent { direction: Direction::Forward });
            caret = caret.map(|point| after_removal(point, source));
        }
        if let Some(caret) = caret {
            actions.push(NormalizedAction::SetSelection { selection: SelectionDescription::caret(caret) });
        }
        actions.push(insert);
        actions
    }

    pub fn drag_end(&mut self) {
        self.drag_source = None;
    }

    /// Per-transaction state. A drag in progress survives.
    pub fn reset(&mut self) {
        self.cut_selection = None;
    }

    pub fn clear(&mut self) {
        self.cut_selection = None;
        self.drag_source = None;
    }
}

/// Files, then HTML, then a bare link, then plain text
pub(crate) fn classify_payload<N>(data: &DataTransfer, config: &NormalizerConfig) -> Option<NormalizedAction<N>> {
    if !data.files.is_empty() {
        return Some(NormalizedAction::InsertFiles { files: data.files.clone() });
    }
    let text = data.get_data(MIME_TEXT).unwrap_or_default();
    if let Some(html) = data.get_data(MIME_HTML).filter(|html| !html.is_empty()) {
        return Some(NormalizedAction::InsertHtml {
            html: html.to_string(),
            text: text.to_string(),
        });
    }
    if text.is_empty() {
        return None;
    }
    if let Some(url) = bare_url(text, config) {
        let html = format!("<a href=\"{}\">{}</a>", escape_html(url.as_str()), escape_html(text.trim()));
        return Some(NormalizedAction::InsertHtml { html, text: text.to_string() });
    }
    Some(NormalizedAction::insert_text(text))
}

/// Text that is nothing but one absolute URL with an allowed scheme
fn bare_url(text: &str, config: &NormalizerConfig) -> Option<Url> {
    let candidate = text.trim();
    if candidate.is_empty() || candidate.contains(char::is_whitespace) {
        return None;
    }
    Url::parse(candidate).ok().filter(|url| config.is_link_scheme(url.scheme()))
}

/// Where `point` ends up once `removed` is deleted. Only a removal inside a
/// single node shifts offsets; a drop inside the removed range lands at its
/// start.
fn after_removal<N: Copy + PartialEq>(point: DomPoint<N>, removed: DomSelection<N>) -> DomPoint<N> {
    if removed.anchor.node != removed.focus.node || point.node != removed.anchor.node {
        return point;
    }
    let start = removed.anchor.offset.min(removed.focus.offset);
    let end = removed.anchor.offset.max(removed.focus.offset);
    if point.offset >= end {
        DomPoint::new(point.node, point.offset - (end - start))
    } else if point.offset > start {
        DomPoint::new(point.node, start)
    } else {
        point
    }
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
