use serde::{Deserialize, Serialize};

/// Selector of the page region flash messages are rendered into.
pub const DEFAULT_MESSAGE_AREA_SELECTOR: &str = "#messages";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Dom,
    Act,
}

impl CommandKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CommandKind::Dom => "dom",
            CommandKind::Act => "act",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashKind {
    /// Wipes the message area instead of adding to it.
    Clear,
    Success,
    Info,
    Warning,
    Error,
}

impl FlashKind {
    /// Bootstrap alert class for the severity; `None` for [`FlashKind::Clear`].
    pub fn css_class(self) -> Option<&'static str> {
        match self {
            FlashKind::Clear => None,
            FlashKind::Success => Some("alert-success"),
            FlashKind::Info => Some("alert-info"),
            FlashKind::Warning => Some("alert-warning"),
            FlashKind::Error => Some("alert-danger"),
        }
    }
}

/// One-shot notification carried across a request boundary by the session
/// message store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub kind: FlashKind,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub dismissable: bool,
    #[serde(default)]
    pub fadeout: bool,
}

impl FlashMessage {
    pub fn new(kind: FlashKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            dismissable: false,
            fadeout: false,
        }
    }

    pub fn clear() -> Self {
        Self::new(FlashKind::Clear, "")
    }

    pub fn dismissable(mut self) -> Self {
        self.dismissable = true;
        self
    }

    pub fn fadeout(mut self) -> Self {
        self.fadeout = true;
        self
    }

    pub fn is_clear(&self) -> bool {
        self.kind == FlashKind::Clear
    }
}
