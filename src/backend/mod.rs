//! Tracer backends.
//!
//! - [`TracingTracer`]: spans in the `tracing` ecosystem
//! - [`RecordingTracer`]: in-memory spans for tests and snapshots

mod recording;
mod tracing;

pub use self::recording::{
    RecordedSpan, RecordingContext, RecordingSpan, RecordingTracer, SpanEvent,
};
pub use self::tracing::TracingTracer;
