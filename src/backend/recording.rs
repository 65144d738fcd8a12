// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory tracer that records every span call.
//!
//! [`RecordingTracer`] keeps each span it creates in a shared store, together
//! with the ordered list of calls made on it. It is meant for tests and for
//! dumping a snapshot of what a run observed; it never exports anything.
//!
//! # Example
//!
//! ```rust
//! use std::io::Read;
//! use traced_read::{backend::RecordingTracer, Status, TracedReader};
//!
//! let tracer = RecordingTracer::new();
//! let mut reader =
//!     TracedReader::new(tracer.root_context(), tracer.clone(), &b"hello"[..], "body");
//!
//! let mut out = Vec::new();
//! reader.read_to_end(&mut out).unwrap();
//!
//! let span = &tracer.spans()[0];
//! assert_eq!(span.status, Status::Ok);
//! assert_eq!(span.attribute("bytes_read"), Some(5));
//! ```

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tracer::{KeyValue, Status, TraceSpan, Tracer};

/// Context for [`RecordingTracer`] spans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordingContext {
    /// Trace the span belongs to
    pub trace_id: u64,
    /// Span that is the parent of spans started under this context
    pub parent_span_id: Option<u64>,
}

/// One call made on a recorded span, in call order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SpanEvent {
    /// `set_attributes` was called
    SetAttributes {
        /// Attributes passed to the call
        attributes: Vec<KeyValue>,
    },
    /// `set_status` was called
    SetStatus {
        /// Status passed to the call
        status: Status,
    },
    /// `end` was called
    End,
}

/// Snapshot of one span created by a [`RecordingTracer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedSpan {
    /// Name passed to `start`
    pub name: String,
    /// Trace the span belongs to
    pub trace_id: u64,
    /// Unique (per tracer) span id, starting at 1
    pub span_id: u64,
    /// Parent span id from the start context
    pub parent_span_id: Option<u64>,
    /// Attributes in the order they were set; later keys override earlier ones
    pub attributes: Vec<KeyValue>,
    /// Last status set
    pub status: Status,
    /// Every call made on the span
    pub events: Vec<SpanEvent>,
    /// When `start` was called
    pub started_at: DateTime<Utc>,
    /// When `end` was first called
    pub ended_at: Option<DateTime<Utc>>,
}

impl RecordedSpan {
    /// Whether `end` has been called.
    pub fn is_ended(&self) -> bool {
        self.ended_at.is_some()
    }

    /// Latest integer value recorded under `key`.
    pub fn attribute(&self, key: &str) -> Option<i64> {
        self.attributes
            .iter()
            .rev()
            .find(|kv| kv.key == key)
            .and_then(|kv| kv.value.as_i64())
    }

    /// Number of times `end` was called.
    pub fn end_calls(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SpanEvent::End))
            .count()
    }
}

#[derive(Debug, Default)]
struct Store {
    spans: Mutex<Vec<RecordedSpan>>,
    next_span_id: AtomicU64,
}

impl Store {
    fn lock(&self) -> MutexGuard<'_, Vec<RecordedSpan>> {
        self.spans.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Tracer that keeps every span in memory.
///
/// Clones share the same store, so hand a clone to each reader and inspect
/// the original.
#[derive(Debug, Clone, Default)]
pub struct RecordingTracer {
    store: Arc<Store>,
}

impl RecordingTracer {
    /// Creates a tracer with an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A root context on trace 1.
    pub fn root_context(&self) -> RecordingContext {
        RecordingContext {
            trace_id: 1,
            parent_span_id: None,
        }
    }

    /// Snapshot of all spans, in creation order.
    pub fn spans(&self) -> Vec<RecordedSpan> {
        self.store.lock().clone()
    }

    /// Snapshot of the spans named `name`.
    pub fn spans_named(&self, name: &str) -> Vec<RecordedSpan> {
        self.store
            .lock()
            .iter()
            .filter(|s| s.name == name)
            .cloned()
            .collect()
    }

    /// Serializes the snapshot as a JSON array.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&*self.store.lock())
    }

    /// Drops every recorded span. Handles to spans that are still open stop
    /// recording.
    pub fn clear(&self) {
        self.store.lock().clear();
    }
}

impl Tracer for RecordingTracer {
    type Context = RecordingContext;
    type Span = RecordingSpan;

    fn start(&self, cx: &RecordingContext, name: &str) -> (RecordingContext, RecordingSpan) {
        let span_id = self.store.next_span_id.fetch_add(1, Ordering::Relaxed) + 1;

        self.store.lock().push(RecordedSpan {
            name: name.to_owned(),
            trace_id: cx.trace_id,
            span_id,
            parent_span_id: cx.parent_span_id,
            attributes: Vec::new(),
            status: Status::Unset,
            events: Vec::new(),
            started_at: Utc::now(),
            ended_at: None,
        });

        let child = RecordingContext {
            trace_id: cx.trace_id,
            parent_span_id: Some(span_id),
        };
        let span = RecordingSpan {
            store: Arc::clone(&self.store),
            span_id,
        };
        (child, span)
    }
}

/// Span handle produced by [`RecordingTracer`].
///
/// Calls on a handle whose span was removed by [`RecordingTracer::clear`]
/// are dropped.
#[derive(Debug)]
pub struct RecordingSpan {
    store: Arc<Store>,
    span_id: u64,
}

impl RecordingSpan {
    fn with_span(&self, f: impl FnOnce(&mut RecordedSpan)) {
        let mut spans = self.store.lock();
        if let Some(span) = spans.iter_mut().find(|s| s.span_id == self.span_id) {
            f(span);
        }
    }
}

impl TraceSpan for RecordingSpan {
    fn set_attributes(&mut self, attributes: &[KeyValue]) {
        self.with_span(|span| {
            span.attributes.extend_from_slice(attributes);
            span.events.push(SpanEvent::SetAttributes {
                attributes: attributes.to_vec(),
            });
        });
    }

    fn set_status(&mut self, status: Status) {
        self.with_span(|span| {
            span.status = status.clone();
            span.events.push(SpanEvent::SetStatus { status });
        });
    }

    fn end(self) {
        self.with_span(|span| {
            span.ended_at.get_or_insert_with(Utc::now);
            span.events.push(SpanEvent::End);
        });
    }
}
