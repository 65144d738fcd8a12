//! Configuration for traced readers
//!
//! Controls the attribute keys a traced reader writes onto its span when the
//! session ends.
//!
//! # Example: Using defaults
//!
//! ```rust
//! use traced_read::TracedReadConfig;
//!
//! // Records "reads" and "bytes_read"
//! let config = TracedReadConfig::default();
//! assert_eq!(config.reads_key(), "reads");
//! ```
//!
//! # Example: Custom keys
//!
//! ```rust
//! use traced_read::TracedReadConfigBuilder;
//!
//! let config = TracedReadConfigBuilder::new()
//!     .reads_key("http.body.reads")
//!     .bytes_read_key("http.body.size")
//!     .build()
//!     .expect("keys are valid");
//! assert_eq!(config.bytes_read_key(), "http.body.size");
//! ```

use std::borrow::Cow;

use crate::errors::ConfigError;

pub mod constants;

use constants::{DEFAULT_BYTES_READ_KEY, DEFAULT_READS_KEY};

/// Configuration for a traced reader
///
/// Use [`TracedReadConfigBuilder`] to construct a validated instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracedReadConfig {
    /// Attribute key for the read count
    /// Default: `reads`
    reads_key: Cow<'static, str>,

    /// Attribute key for the byte count
    /// Default: `bytes_read`
    bytes_read_key: Cow<'static, str>,
}

impl Default for TracedReadConfig {
    fn default() -> Self {
        Self {
            reads_key: Cow::Borrowed(DEFAULT_READS_KEY),
            bytes_read_key: Cow::Borrowed(DEFAULT_BYTES_READ_KEY),
        }
    }
}

impl TracedReadConfig {
    /// Attribute key the read count is recorded under.
    pub fn reads_key(&self) -> &str {
        &self.reads_key
    }

    /// Attribute key the byte count is recorded under.
    pub fn bytes_read_key(&self) -> &str {
        &self.bytes_read_key
    }

    pub(crate) fn keys(&self) -> (Cow<'static, str>, Cow<'static, str>) {
        (self.reads_key.clone(), self.bytes_read_key.clone())
    }
}

/// Builder for [`TracedReadConfig`]
///
/// # Example
///
/// ```rust
/// use traced_read::{ConfigError, TracedReadConfigBuilder};
///
/// let err = TracedReadConfigBuilder::new()
///     .reads_key("count")
///     .bytes_read_key("count")
///     .build()
///     .unwrap_err();
/// assert!(matches!(err, ConfigError::DuplicateAttributeKey { .. }));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TracedReadConfigBuilder {
    config: TracedReadConfig,
}

impl TracedReadConfigBuilder {
    /// Create a builder starting from the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder starting from an existing configuration
    pub fn from_config(config: TracedReadConfig) -> Self {
        Self { config }
    }

    /// Set the attribute key for the read count
    pub fn reads_key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.config.reads_key = key.into();
        self
    }

    /// Set the attribute key for the byte count
    pub fn bytes_read_key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.config.bytes_read_key = key.into();
        self
    }

    /// Validate and build the configuration
    ///
    /// Fails if a key is blank or both keys are equal.
    pub fn build(self) -> Result<TracedReadConfig, ConfigError> {
        let config = self.config;

        if config.reads_key.trim().is_empty() {
            return Err(ConfigError::EmptyAttributeKey { attribute: "reads" });
        }
        if config.bytes_read_key.trim().is_empty() {
            return Err(ConfigError::EmptyAttributeKey {
                attribute: "bytes_read",
            });
        }
        if config.reads_key == config.bytes_read_key {
            return Err(ConfigError::DuplicateAttributeKey {
                key: config.reads_key.into_owned(),
            });
        }

        Ok(config)
    }
}
