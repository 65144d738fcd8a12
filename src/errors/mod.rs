//! Error types for the traced-read library.
//!
//! Traced readers pass every I/O error from the wrapped reader through
//! unchanged, so the only errors this crate originates are configuration
//! errors.
//!
//! # Examples
//!
//! ```rust
//! use traced_read::{ConfigError, TracedReadConfigBuilder};
//!
//! match TracedReadConfigBuilder::new().reads_key("").build() {
//!     Ok(_) => unreachable!(),
//!     Err(ConfigError::EmptyAttributeKey { attribute }) => {
//!         assert_eq!(attribute, "reads");
//!     }
//!     Err(e) => panic!("unexpected error: {e}"),
//! }
//! ```

/// Errors that can occur while building a [`TracedReadConfig`](crate::TracedReadConfig).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A configured attribute key is empty or whitespace.
    #[error("Empty attribute key for {attribute}")]
    EmptyAttributeKey {
        /// Which attribute the key was configured for (`reads` or `bytes_read`)
        attribute: &'static str,
    },

    /// The read-count and byte-count keys are identical.
    ///
    /// One attribute would overwrite the other on the span.
    #[error("Duplicate attribute key: {key}")]
    DuplicateAttributeKey {
        /// The key used for both attributes
        key: String,
    },
}
