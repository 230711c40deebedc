//! Configuration error types.

use owo_colors::OwoColorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Invalid(InvalidField),
}

/// A single rejected config field.
#[derive(Debug, Clone)]
pub struct InvalidField {
    /// Dotted field path (e.g., "revision.cdn")
    pub field: &'static str,
    pub message: String,
}

impl ConfigError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid(InvalidField {
            field,
            message: message.into(),
        })
    }
}

impl fmt::Display for InvalidField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{} {} {}",
            "[".dimmed(),
            self.field.cyan(),
            "]".dimmed(),
            "→".red(),
            self.message
        )
    }
}
