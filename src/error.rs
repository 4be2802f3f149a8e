//! Error types for declaration validation and configuration loading.

use std::fmt;
use std::io;

use thiserror::Error;

/// A single structural problem in a declaration, with the dotted field path
/// that locates it (e.g. `"users[0].appliances[2].windows[1]"`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path.
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every configuration error found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigErrors(pub Vec<ConfigError>);

impl ConfigErrors {
    /// Returns `true` if any error refers to `field`.
    pub fn contains_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ConfigErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} configuration error(s)", self.0.len())?;
        for e in &self.0 {
            write!(f, "\n  {e}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum SimError {
    /// Structurally invalid declarations, reported once at initialization.
    #[error("{0}")]
    Configuration(ConfigErrors),
    #[error("invalid scenario TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("cannot read scenario \"{path}\": {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("unknown preset \"{name}\", available: {available}")]
    UnknownPreset { name: String, available: String },
}

impl SimError {
    /// Returns the configuration errors carried by this error, if any.
    pub fn config_errors(&self) -> Option<&[ConfigError]> {
        match self {
            Self::Configuration(errors) => Some(&errors.0),
            _ => None,
        }
    }
}

impl From<Vec<ConfigError>> for SimError {
    fn from(errors: Vec<ConfigError>) -> Self {
        Self::Configuration(ConfigErrors(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display_includes_field() {
        let e = ConfigError::new("users[0].num_users", "must be >= 1");
        assert_eq!(e.to_string(), "config error: users[0].num_users: must be >= 1");
    }

    #[test]
    fn configuration_error_lists_every_entry() {
        let err = SimError::from(vec![
            ConfigError::new("a", "bad"),
            ConfigError::new("b", "worse"),
        ]);
        let text = err.to_string();
        assert!(text.starts_with("2 configuration error(s)"));
        assert!(text.contains("a: bad"));
        assert!(text.contains("b: worse"));
        assert_eq!(err.config_errors().map(<[ConfigError]>::len), Some(2));
    }
}
