//! Error types shared by the widgets and the config layer.
//!
//! Widget operations recover from bad input locally (see each widget), so
//! these errors mostly surface from parsing helpers and config I/O.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    /// Text that none of the accepted date formats could parse.
    #[error("unrecognised date: {0:?}")]
    InvalidDate(String),

    /// Color strings must be `#RRGGBB` or `#RGB`.
    #[error("invalid color {0:?} (expected #RRGGBB or #RGB)")]
    InvalidColor(String),

    #[error("unknown notification type: {0:?}")]
    InvalidNotificationKind(String),

    #[error("could not find config directory")]
    NoConfigDir,

    #[error("failed to access {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = WidgetError::InvalidColor("#12".to_string());
        assert_eq!(
            err.to_string(),
            "invalid color \"#12\" (expected #RRGGBB or #RGB)"
        );

        let err = WidgetError::InvalidDate("tomorrow-ish".to_string());
        assert!(err.to_string().contains("tomorrow-ish"));
    }
}
