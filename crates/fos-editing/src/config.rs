//! Normalizer Configuration

use serde::{Deserialize, Serialize};

/// Platform whose modifier conventions apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Platform {
    /// Option deletes words, Cmd deletes lines
    Mac,
    /// Ctrl deletes words, Ctrl+Shift deletes lines
    #[default]
    Other,
}

/// Normalizer configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Modifier conventions for word/line deletion and shortcuts
    pub platform: Platform,

    /// Consecutive quiet ticks before a gesture is flushed (minimum 2)
    pub quiescence_ticks: u32,

    /// Keep the transaction open while an IME composition is in progress
    pub hold_open_compositions: bool,

    /// URL schemes turned into links when pasted or dropped as bare text
    pub link_schemes: Vec<String>,

    /// Upper bound for `Normalizer::settle`
    pub max_settle_ticks: u32,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            platform: Platform::Other,
            quiescence_ticks: 2,
            hold_open_compositions: true,
            link_schemes: vec!["http".into(), "https".into(), "mailto".into()],
            max_settle_ticks: 64,
        }
    }
}

impl NormalizerConfig {
    /// Defaults with Mac modifier conventions
    pub fn mac() -> Self {
        Self {
            platform: Platform::Mac,
            ..Self::default()
        }
    }

    /// A single quiet tick is never enough: trailing selection changes and
    /// duplicate mutation records arrive one tick after `input`.
    pub fn effective_quiescence_ticks(&self) -> u32 {
        self.quiescence_ticks.max(2)
    }

    pub fn is_link_scheme(&self, scheme: &str) -> bool {
        self.link_schemes.iter().any(|s| s.eq_ignore_ascii_case(scheme))
    }
}
