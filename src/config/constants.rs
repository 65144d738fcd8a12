//! Default attribute keys and span naming constants
//!
//! Centralizes the names traced readers write onto their spans so that
//! backends, exporters and tests agree on them.

/// Default attribute key for the number of read calls observed.
pub const DEFAULT_READS_KEY: &str = "reads";

/// Default attribute key for the total bytes returned by the wrapped reader.
pub const DEFAULT_BYTES_READ_KEY: &str = "bytes_read";

/// Static name of spans created by the `tracing` backend.
///
/// `tracing` span names are compile-time constants, so the per-stream name
/// is carried in the `otel.name` field instead.
pub const TRACING_SPAN_NAME: &str = "traced_read.stream";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keys_are_distinct() {
        assert_ne!(DEFAULT_READS_KEY, DEFAULT_BYTES_READ_KEY);
    }
}
