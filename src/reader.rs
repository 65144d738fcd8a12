// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Blocking traced reader.
//!
//! [`TracedReader`] wraps any [`Read`] and emits one span covering the
//! stream's active lifetime: started by the first `read`, finished by the
//! first terminal read (end of stream or an error). It is a drop-in
//! substitute for the reader it wraps; every byte count and error is passed
//! through unchanged.
//!
//! # Example
//!
//! ```rust
//! use std::io::{self, Read};
//! use traced_read::{backend::RecordingTracer, Phase, TracedReader};
//!
//! let tracer = RecordingTracer::new();
//! let mut reader =
//!     TracedReader::new(tracer.root_context(), tracer.clone(), &b"abc"[..], "upload");
//!
//! let mut out = Vec::new();
//! io::copy(&mut reader, &mut out).unwrap();
//!
//! assert_eq!(reader.phase(), Phase::Ended);
//! assert_eq!(reader.stats().bytes_read, 3);
//! ```

use std::{
    borrow::Cow,
    fmt,
    io::{self, Read},
};

use crate::{
    backend::TracingTracer,
    close::Close,
    config::TracedReadConfig,
    session::{Phase, ReadOutcome, ReadSession, ReadStats},
    tracer::Tracer,
};

/// A [`Read`] decorator that traces the stream's lifetime as one span.
///
/// Reads past the terminal event keep delegating to the wrapped reader but no
/// longer touch the span or the counters.
///
/// Dropping the reader (or calling [`into_inner`](Self::into_inner)) before a
/// terminal read drops the span handle without ending it, so drive reads to
/// completion to get a finished span.
pub struct TracedReader<R, T: Tracer> {
    inner: R,
    session: ReadSession<T>,
}

impl<R, T: Tracer> TracedReader<R, T> {
    /// Wraps `reader` with the default [`TracedReadConfig`].
    pub fn new(
        context: T::Context,
        tracer: T,
        reader: R,
        name: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::with_config(context, tracer, reader, name, &TracedReadConfig::default())
    }

    /// Wraps `reader` using the attribute keys from `config`.
    pub fn with_config(
        context: T::Context,
        tracer: T,
        reader: R,
        name: impl Into<Cow<'static, str>>,
        config: &TracedReadConfig,
    ) -> Self {
        Self {
            inner: reader,
            session: ReadSession::new(context, tracer, name.into(), config),
        }
    }

    /// Span name.
    pub fn name(&self) -> &str {
        self.session.name()
    }

    /// Context the span is (or will be) started under.
    pub fn context(&self) -> &T::Context {
        self.session.context()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    /// Counters so far; frozen once the phase is [`Phase::Ended`].
    pub fn stats(&self) -> ReadStats {
        self.session.stats()
    }

    /// Gets a reference to the wrapped reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Gets a mutable reference to the wrapped reader.
    ///
    /// Reading through this reference bypasses tracing.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Unwraps the reader, dropping the session.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R> TracedReader<R, TracingTracer> {
    /// Wraps `reader` in a `tracing` span nested under [`tracing::Span::current`].
    pub fn in_current_span(reader: R, name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(tracing::Span::current(), TracingTracer, reader, name)
    }
}

impl<R: Read, T: Tracer> Read for TracedReader<R, T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.session.begin();
        let result = self.inner.read(buf);
        self.session.observe(ReadOutcome::from_read(&result, buf.len()));
        result
    }
}

impl<R: Close, T: Tracer> Close for TracedReader<R, T> {
    /// Closes the wrapped reader. Span state is left untouched.
    fn close(&mut self) -> io::Result<()> {
        self.inner.close()
    }
}

impl<R: fmt::Debug, T: Tracer> fmt::Debug for TracedReader<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracedReader")
            .field("inner", &self.inner)
            .field("session", &self.session)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{backend::RecordingTracer, tracer::Status};

    fn traced<R>(tracer: &RecordingTracer, reader: R) -> TracedReader<R, RecordingTracer> {
        TracedReader::new(tracer.root_context(), tracer.clone(), reader, "test")
    }

    #[test]
    fn test_no_span_before_first_read() {
        let tracer = RecordingTracer::new();
        let reader = traced(&tracer, &b"data"[..]);

        assert_eq!(reader.phase(), Phase::NotStarted);
        assert_eq!(reader.name(), "test");
        assert!(tracer.spans().is_empty());
    }

    #[test]
    fn test_read_to_end_finishes_span() {
        let tracer = RecordingTracer::new();
        let mut reader = traced(&tracer, &b"hello world"[..]);

        let mut out = Vec::new();
        let n = reader.read_to_end(&mut out).unwrap();

        assert_eq!(n, 11);
        assert_eq!(out, b"hello world");
        assert_eq!(reader.phase(), Phase::Ended);

        let spans = tracer.spans();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].name, "test");
        assert_eq!(spans[0].status, Status::Ok);
        assert_eq!(spans[0].attribute("bytes_read"), Some(11));
        assert_eq!(spans[0].attribute("reads"), Some(reader.stats().reads as i64));
    }

    #[test]
    fn test_empty_buffer_read_is_not_end_of_stream() {
        let tracer = RecordingTracer::new();
        let mut reader = traced(&tracer, &b"abc"[..]);

        assert_eq!(reader.read(&mut []).unwrap(), 0);

        assert_eq!(reader.phase(), Phase::Active);
        assert_eq!(reader.stats().reads, 1);
    }

    #[test]
    fn test_custom_attribute_keys() {
        let tracer = RecordingTracer::new();
        let config = crate::TracedReadConfigBuilder::new()
            .reads_key("chunks")
            .bytes_read_key("size")
            .build()
            .unwrap();
        let mut reader = TracedReader::with_config(
            tracer.root_context(),
            tracer.clone(),
            &b"xy"[..],
            "k",
            &config,
        );

        reader.read_to_end(&mut Vec::new()).unwrap();

        let span = &tracer.spans()[0];
        assert_eq!(span.attribute("size"), Some(2));
        assert_eq!(span.attribute("chunks"), Some(reader.stats().reads as i64));
        assert_eq!(span.attribute("reads"), None);
    }

    #[test]
    fn test_into_inner_returns_wrapped_reader() {
        let tracer = RecordingTracer::new();
        let mut reader = traced(&tracer, io::Cursor::new(vec![1u8, 2, 3]));

        let mut first = [0u8; 1];
        reader.read_exact(&mut first).unwrap();

        let cursor = reader.into_inner();
        assert_eq!(cursor.position(), 1);
        assert!(!tracer.spans()[0].is_ended());
    }
}
