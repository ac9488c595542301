//! Inline status notification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WidgetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    Add,
    #[default]
    Error,
    Info,
    Search,
    Success,
    SuccessBlue,
    Warning,
}

impl NotificationKind {
    pub const ALL: [NotificationKind; 7] = [
        NotificationKind::Add,
        NotificationKind::Error,
        NotificationKind::Info,
        NotificationKind::Search,
        NotificationKind::Success,
        NotificationKind::SuccessBlue,
        NotificationKind::Warning,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Add => "add",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
            NotificationKind::Search => "search",
            NotificationKind::Success => "success",
            NotificationKind::SuccessBlue => "success-blue",
            NotificationKind::Warning => "warning",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            NotificationKind::Add => "+",
            NotificationKind::Error => "✗",
            NotificationKind::Info => "i",
            NotificationKind::Search => "?",
            NotificationKind::Success | NotificationKind::SuccessBlue => "✓",
            NotificationKind::Warning => "!",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = WidgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| WidgetError::InvalidNotificationKind(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineNotification {
    pub content: String,
    pub kind: NotificationKind,
    pub icon: bool,
}

impl InlineNotification {
    pub fn new(kind: NotificationKind, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind,
            icon: true,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, content)
    }

    pub fn info(content: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, content)
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, content)
    }

    /// Set the kind from its name; unknown names keep the current kind.
    pub fn set_kind_str(&mut self, kind: &str) -> Result<(), WidgetError> {
        self.kind = kind.parse()?;
        Ok(())
    }

    pub fn label(&self) -> String {
        if self.icon {
            format!("{} {}", self.kind.icon(), self.content)
        } else {
            self.content.clone()
        }
    }
}
