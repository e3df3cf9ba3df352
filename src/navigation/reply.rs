//! Transport-neutral replies produced by the navigation controller

use crate::storage::ImageRef;

/// A labeled button that reports `callback` back when pressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub callback: String,
}

impl Button {
    pub fn new(label: impl Into<String>, callback: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            callback: callback.into(),
        }
    }
}

/// The two reply shapes the bot ever emits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Text with optional rows of buttons (empty `keyboard` means none)
    Text { text: String, keyboard: Vec<Vec<Button>> },
    /// A batch of previously uploaded images
    MediaBatch(Vec<ImageRef>),
}

impl Reply {
    /// Plain text without buttons
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            keyboard: Vec::new(),
        }
    }

    /// Text with one button per row
    pub fn menu(text: impl Into<String>, buttons: impl IntoIterator<Item = Button>) -> Self {
        Self::Text {
            text: text.into(),
            keyboard: buttons.into_iter().map(|b| vec![b]).collect(),
        }
    }

    /// Message text, if this is a text reply
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            Self::MediaBatch(_) => None,
        }
    }

    /// Button labels in display order (rows flattened)
    pub fn button_labels(&self) -> Vec<&str> {
        match self {
            Self::Text { keyboard, .. } => keyboard.iter().flatten().map(|b| b.label.as_str()).collect(),
            Self::MediaBatch(_) => Vec::new(),
        }
    }

    /// Callback payloads in display order (rows flattened)
    pub fn button_callbacks(&self) -> Vec<&str> {
        match self {
            Self::Text { keyboard, .. } => keyboard.iter().flatten().map(|b| b.callback.as_str()).collect(),
            Self::MediaBatch(_) => Vec::new(),
        }
    }
}
