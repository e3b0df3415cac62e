//! Configuration errors, tagged with the layer the bad input came from.

use std::fmt;

use super::error_code::{self, FieldsenseErrorCode};

/// Source of a configuration value, lowest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayer {
    User,
    Project,
    Inline,
    Env,
    Cli,
}

impl fmt::Display for ConfigLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::User => "user config",
            Self::Project => "project config",
            Self::Inline => "inline config",
            Self::Env => "environment",
            Self::Cli => "command line",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read {layer} {path}: {message}")]
    Unreadable {
        layer: ConfigLayer,
        path: String,
        message: String,
    },

    #[error("Malformed TOML in {layer} {path}: {message}")]
    ParseError {
        layer: ConfigLayer,
        path: String,
        message: String,
    },

    /// `key` is the `FIELDSENSE_*` variable for values from the environment,
    /// the dotted TOML key otherwise.
    #[error("Invalid {key} from {layer}: {message}")]
    ValidationFailed {
        layer: ConfigLayer,
        key: &'static str,
        message: String,
    },

    #[error("Cannot serialize config: {message}")]
    Serialization { message: String },
}

impl ConfigError {
    /// The layer that produced the error, if any.
    pub fn layer(&self) -> Option<ConfigLayer> {
        match self {
            Self::Unreadable { layer, .. }
            | Self::ParseError { layer, .. }
            | Self::ValidationFailed { layer, .. } => Some(*layer),
            Self::Serialization { .. } => None,
        }
    }
}

impl FieldsenseErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ValidationFailed { .. } => error_code::CONFIG_INVALID,
            _ => error_code::CONFIG_ERROR,
        }
    }
}
