//! Error type shared by the fallible corners of the crate.
//!
//! The sequence combinators themselves never fail: callbacks are total and a
//! closed channel is the only end-of-sequence signal. Errors only come from
//! loading configuration, from reading dynamically typed [`Value`]s with the
//! wrong type, and from cancelled pulls.
//!
//! [`Value`]: crate::value::Value

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid value for config field '{field}': {reason}")]
    Config { field: &'static str, reason: String },

    #[error("failed to parse config: {0}")]
    ConfigParse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sequence was cancelled")]
    Cancelled,
}

impl Error {
    pub fn type_mismatch<T: ?Sized>(found: &'static str) -> Self {
        Self::TypeMismatch {
            expected: std::any::type_name::<T>(),
            found,
        }
    }

    pub fn config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Config {
            field,
            reason: reason.into(),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigParse(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigParse(format!(
            "line {}, column {}: {err}",
            err.line(),
            err.column()
        ))
    }
}
