// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! [`Tracer`] backed by the `tracing` crate.
//!
//! Spans are created under an explicit parent [`tracing::Span`] and follow the
//! field conventions `tracing-opentelemetry` understands: the per-stream name
//! goes in `otel.name`, the final status in `otel.status_code` and
//! `otel.status_message`.
//!
//! Only the default attribute keys (`reads`, `bytes_read`) are declared on the
//! span. Attributes under any other key are emitted as `debug!` events inside
//! the span instead.
//!
//! # Example
//!
//! ```rust
//! use std::io::Read;
//! use traced_read::{backend::TracingTracer, TracedReader};
//!
//! let parent = tracing::info_span!("download");
//! let mut reader = TracedReader::new(parent, TracingTracer, &b"payload"[..], "response_body");
//!
//! let mut body = String::new();
//! reader.read_to_string(&mut body).unwrap();
//! ```

use tracing::{debug, Span};

use crate::{
    spans,
    tracer::{KeyValue, Status, TraceSpan, Tracer, Value},
};

/// Tracer producing [`tracing::Span`]s.
///
/// The context is the parent span; pass `Span::current()` to nest under
/// whatever is active, or `Span::none()` for a root span.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTracer;

impl Tracer for TracingTracer {
    type Context = Span;
    type Span = Span;

    fn start(&self, parent: &Span, name: &str) -> (Span, Span) {
        let span = spans::traced_read(parent, name);
        (span.clone(), span)
    }
}

impl TraceSpan for Span {
    fn set_attributes(&mut self, attributes: &[KeyValue]) {
        for kv in attributes {
            let key: &str = &kv.key;
            if !self.has_field(key) {
                debug!(parent: &*self, key, value = %kv.value, "span attribute");
                continue;
            }
            match &kv.value {
                Value::I64(v) => self.record(key, *v),
                Value::Bool(v) => self.record(key, *v),
                Value::Str(v) => self.record(key, &**v),
            };
        }
    }

    fn set_status(&mut self, status: Status) {
        self.record("otel.status_code", status.code());
        if let Status::Error { description } = &status {
            self.record("otel.status_message", &**description);
        }
    }

    /// Dropping the last handle closes the span.
    fn end(self) {
        drop(self);
    }
}
