//! Data Transfer
//!
//! MIME-keyed payload shared by clipboard and drag events.

use serde::{Deserialize, Serialize};

pub const MIME_TEXT: &str = "text/plain";
pub const MIME_HTML: &str = "text/html";

/// Transferred data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataTransfer {
    items: Vec<DataTransferItem>,
    /// Files being transferred
    pub files: Vec<FileInfo>,
}

/// Single string item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTransferItem {
    pub mime_type: String,
    pub data: String,
}

/// File metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub last_modified: u64,
}

impl FileInfo {
    pub fn new(name: &str, mime_type: &str, size: u64) -> Self {
        Self {
            name: name.to_string(),
            size,
            mime_type: mime_type.to_string(),
            last_modified: 0,
        }
    }
}

impl DataTransfer {
    /// Create empty data transfer
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain text only
    pub fn text(text: &str) -> Self {
        let mut data = Self::new();
        data.set_data(MIME_TEXT, text);
        data
    }

    /// HTML with its plain-text rendition
    pub fn html(html: &str, text: &str) -> Self {
        let mut data = Self::new();
        data.set_data(MIME_HTML, html);
        data.set_data(MIME_TEXT, text);
        data
    }

    /// Set data for a type
    pub fn set_data(&mut self, mime_type: &str, data: &str) {
        self.items.retain(|i| i.mime_type != mime_type);
        self.items.push(DataTransferItem {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        });
    }

    /// Get data for a type
    pub fn get_data(&self, mime_type: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|i| i.mime_type == mime_type)
            .map(|i| i.data.as_str())
    }

    pub fn add_file(&mut self, file: FileInfo) {
        self.files.push(file);
    }

    /// Get types, with `"Files"` when files are present
    pub fn types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.items.iter().map(|i| i.mime_type.as_str()).collect();
        if !self.files.is_empty() {
            types.push("Files");
        }
        types
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.files.is_empty()
    }
}
