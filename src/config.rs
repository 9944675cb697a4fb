//! Runtime configuration for stage threads and handoff channels.
//!
//! A [`Config`] is attached to every sequence. Sources built through a config
//! carry it; every combinator inherits the config of its upstream, so one
//! config governs a whole pipeline.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use crate::error::{Error, Result};
use crate::iter::Iter;

/// Smallest stack a stage thread may be given.
pub const MIN_STACK_SIZE: usize = 16 * 1024;

/// Largest handoff channel a config may ask for. Bounded channels allocate
/// every slot up front.
pub const MAX_CAPACITY: usize = 1 << 20;

//==============================================================================
// Config
//==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Slots in each handoff channel. `0` is a rendezvous channel: a push
    /// blocks until the consumer pulls.
    pub capacity: usize,
    /// Stage threads are named `"{thread_prefix}-{stage}"`.
    pub thread_prefix: String,
    pub stack_size: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 0,
            thread_prefix: "chanseq".to_string(),
            stack_size: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values above [`MAX_CAPACITY`] are rejected by [`validate`](Config::validate).
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_thread_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_prefix = prefix.into();
        self
    }

    pub fn with_stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = Some(stack_size);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity > MAX_CAPACITY {
            return Err(Error::config(
                "capacity",
                format!("{} exceeds the maximum of {MAX_CAPACITY} slots", self.capacity),
            ));
        }
        if self.thread_prefix.is_empty() {
            return Err(Error::config("thread_prefix", "must not be empty"));
        }
        if self.thread_prefix.contains('\0') {
            return Err(Error::config("thread_prefix", "must not contain NUL"));
        }
        if let Some(size) = self.stack_size {
            if size < MIN_STACK_SIZE {
                return Err(Error::config(
                    "stack_size",
                    format!("{size} is below the minimum of {MIN_STACK_SIZE} bytes"),
                ));
            }
        }
        Ok(())
    }

    pub(crate) fn thread_builder(&self, stage: &str) -> thread::Builder {
        let builder = thread::Builder::new().name(format!("{}-{stage}", self.thread_prefix));
        match self.stack_size {
            Some(size) => builder.stack_size(size),
            None => builder,
        }
    }

    //==========================================================================
    // Loading
    //==========================================================================

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file. The format follows the extension (`.toml` or
    /// `.json`); anything else is sniffed from the first non-blank character.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match format.as_deref() {
            Some("json") => Self::from_json_str(&content),
            Some("toml") => Self::from_toml_str(&content),
            _ => {
                if content.trim_start().starts_with('{') {
                    Self::from_json_str(&content)
                } else {
                    Self::from_toml_str(&content)
                }
            }
        }
    }

    //==========================================================================
    // Sources bound to this config
    //==========================================================================

    /// Freeze the config so several sources can share it.
    pub fn shared(self) -> Arc<Config> {
        Arc::new(self)
    }

    pub fn source<I>(self, values: I) -> Iter<I::Item>
    where
        I: IntoIterator,
        I::IntoIter: Send + 'static,
        I::Item: Send + 'static,
    {
        crate::source::from_source_with(self.shared(), values)
    }

    pub fn values<T, I>(self, values: I) -> Iter<T>
    where
        I: IntoIterator<Item = T>,
        T: Send + 'static,
    {
        let values: Vec<T> = values.into_iter().collect();
        self.source(values)
    }

    pub fn count<T>(self, start: T) -> Iter<T>
    where
        T: crate::source::Countable,
    {
        crate::source::count_with(self.shared(), start)
    }

    pub fn repeat<T>(self, value: T) -> Iter<T>
    where
        T: Clone + Send + 'static,
    {
        self.source(std::iter::repeat(value))
    }

    pub fn repeat_n<T>(self, value: T, n: usize) -> Iter<T>
    where
        T: Clone + Send + 'static,
    {
        self.source(std::iter::repeat(value).take(n))
    }
}
