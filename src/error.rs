//! Unified error handling for the trading dashboard
//!
//! Every failure the synchronizer can meet is caught at the component boundary
//! and turned into a status message, so this type carries both a log-friendly
//! `Display` and the short code the view layer keys on.

use std::fmt;
use std::io;

/// Main error type for the dashboard client
#[derive(Debug)]
pub enum DashboardError {
    // Backend errors
    Transport(String),
    ServerRejection(String),
    Format(String),

    // Local precondition errors
    NotPermitted(String),
    InvalidStrategy(String),

    // Configuration errors
    ConfigNotFound(String),
    ConfigParse(String),
    ConfigValidation(String),

    // IO errors
    FileRead(String),
    FileWrite(String),

    // General errors
    Internal(String),
}

impl DashboardError {
    /// Short code surfaced to the view alongside the status banner
    pub fn view_code(&self) -> &'static str {
        match self {
            DashboardError::Transport(_) => "network_error",
            DashboardError::ServerRejection(_) => "rejected",
            DashboardError::NotPermitted(_) | DashboardError::InvalidStrategy(_) => "not_permitted",
            DashboardError::Format(_) => "format_error",
            _ => "internal_error",
        }
    }

    /// Get a user-friendly message for the status banner
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::Transport(_) => "Network error, please retry".to_string(),
            DashboardError::ServerRejection(msg) if msg.is_empty() => "Operation failed".to_string(),
            DashboardError::ServerRejection(msg) => msg.clone(),
            DashboardError::NotPermitted(msg) => format!("Action not permitted: {}", msg),
            DashboardError::InvalidStrategy(name) => {
                format!(
                    "Unknown strategy '{}'\n\
                    💡 Valid strategies: simple, ma, rsi, combined",
                    name
                )
            }
            DashboardError::Format(_) => "Unexpected response from backend".to_string(),
            DashboardError::ConfigNotFound(path) => {
                format!(
                    "Configuration file not found: {}\n\n\
                    💡 Quick fix:\n\
                    1. Run: dashboard init\n\
                    2. Edit dashboard.toml with your backend URL\n\
                    3. Try again",
                    path
                )
            }
            _ => self.to_string(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            DashboardError::Transport(_)
            | DashboardError::ServerRejection(_)
            | DashboardError::Format(_) => "backend",

            DashboardError::NotPermitted(_) | DashboardError::InvalidStrategy(_) => "precondition",

            DashboardError::ConfigNotFound(_)
            | DashboardError::ConfigParse(_)
            | DashboardError::ConfigValidation(_) => "config",

            DashboardError::FileRead(_) | DashboardError::FileWrite(_) => "io",

            DashboardError::Internal(_) => "internal",
        }
    }
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardError::Transport(msg) => {
                write!(f, "Request could not complete: {}", msg)
            }
            DashboardError::ServerRejection(msg) => {
                write!(f, "Backend rejected request: {}", msg)
            }
            DashboardError::Format(msg) => {
                write!(f, "Malformed backend response: {}", msg)
            }

            DashboardError::NotPermitted(msg) => {
                write!(f, "Action not permitted: {}", msg)
            }
            DashboardError::InvalidStrategy(name) => {
                write!(f, "Invalid strategy: {}", name)
            }

            DashboardError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path)
            }
            DashboardError::ConfigParse(msg) => {
                write!(f, "Configuration parse error: {}", msg)
            }
            DashboardError::ConfigValidation(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }

            DashboardError::FileRead(msg) => {
                write!(f, "File read error: {}", msg)
            }
            DashboardError::FileWrite(msg) => {
                write!(f, "File write error: {}", msg)
            }

            DashboardError::Internal(msg) => {
                write!(f, "Internal error: {}", msg)
            }
        }
    }
}

impl std::error::Error for DashboardError {}

// Conversion implementations for common error types

impl From<io::Error> for DashboardError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => DashboardError::FileRead(err.to_string()),
            io::ErrorKind::PermissionDenied => DashboardError::FileWrite(err.to_string()),
            _ => DashboardError::Internal(format!("IO error: {}", err)),
        }
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DashboardError::Format(err.to_string())
        } else {
            DashboardError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::Format(format!("JSON parse error: {}", err))
    }
}

impl From<toml::de::Error> for DashboardError {
    fn from(err: toml::de::Error) -> Self {
        DashboardError::ConfigParse(format!("TOML parse error: {}", err))
    }
}

impl From<crate::config::ConfigError> for DashboardError {
    fn from(err: crate::config::ConfigError) -> Self {
        use crate::config::ConfigError;
        match err {
            ConfigError::FileNotFound(path) => DashboardError::ConfigNotFound(path),
            ConfigError::FileRead(msg) => DashboardError::FileRead(msg),
            ConfigError::FileWrite(msg) => DashboardError::FileWrite(msg),
            ConfigError::Parse(msg) => DashboardError::ConfigParse(msg),
            ConfigError::Serialize(msg) => DashboardError::Internal(msg),
            ConfigError::Validation(msg) => DashboardError::ConfigValidation(msg),
        }
    }
}

/// Result type alias using DashboardError
pub type DashboardResult<T> = Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_codes() {
        assert_eq!(DashboardError::Transport("x".into()).view_code(), "network_error");
        assert_eq!(DashboardError::ServerRejection("x".into()).view_code(), "rejected");
        assert_eq!(DashboardError::NotPermitted("x".into()).view_code(), "not_permitted");
        assert_eq!(DashboardError::Format("x".into()).view_code(), "format_error");
    }

    #[test]
    fn test_error_category() {
        assert_eq!(DashboardError::Transport("x".into()).category(), "backend");
        assert_eq!(DashboardError::NotPermitted("x".into()).category(), "precondition");
        assert_eq!(DashboardError::ConfigValidation("x".into()).category(), "config");
    }

    #[test]
    fn test_rejection_message_passthrough() {
        let err = DashboardError::ServerRejection("Position already open".to_string());
        assert_eq!(err.user_message(), "Position already open");

        let err = DashboardError::ServerRejection(String::new());
        assert_eq!(err.user_message(), "Operation failed");
    }

    #[test]
    fn test_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "test");
        let err: DashboardError = io_err.into();
        assert!(matches!(err, DashboardError::FileRead(_)));
    }

    #[test]
    fn test_config_serialize_failure_is_internal() {
        let err: DashboardError = crate::config::ConfigError::Serialize("bad value".into()).into();
        assert!(matches!(err, DashboardError::Internal(_)));
        assert_eq!(err.category(), "internal");
    }

    #[test]
    fn test_json_conversion_is_format_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: DashboardError = json_err.into();
        assert_eq!(err.view_code(), "format_error");
    }
}
