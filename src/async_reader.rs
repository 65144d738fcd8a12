// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Async traced reader for `tokio` streams.
//!
//! [`TracedAsyncReader`] is the [`AsyncRead`] twin of
//! [`TracedReader`](crate::TracedReader) and drives the same session state
//! machine. A span starts on the first `poll_read`, even one that returns
//! `Pending`. Only `Ready` results count as reads.

use std::{
    borrow::Cow,
    fmt, io,
    pin::Pin,
    task::{Context, Poll},
};

use tokio::io::{AsyncRead, ReadBuf};

use crate::{
    close::Close,
    config::TracedReadConfig,
    session::{Phase, ReadOutcome, ReadSession, ReadStats},
    tracer::Tracer,
};

/// An [`AsyncRead`] decorator that traces the stream's lifetime as one span.
///
/// # Example
///
/// ```rust
/// use tokio::io::AsyncReadExt;
/// use traced_read::{backend::RecordingTracer, TracedAsyncReader};
///
/// # #[tokio::main]
/// # async fn main() -> std::io::Result<()> {
/// let tracer = RecordingTracer::new();
/// let mut reader =
///     TracedAsyncReader::new(tracer.root_context(), tracer.clone(), &b"chunk"[..], "socket");
///
/// let mut buf = Vec::new();
/// reader.read_to_end(&mut buf).await?;
/// assert_eq!(tracer.spans()[0].attribute("bytes_read"), Some(5));
/// # Ok(())
/// # }
/// ```
pub struct TracedAsyncReader<R, T: Tracer> {
    inner: R,
    // Boxed so the reader is `Unpin` whenever `R` is, whatever the span type.
    session: Box<ReadSession<T>>,
}

impl<R, T: Tracer> TracedAsyncReader<R, T> {
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
            session: Box::new(ReadSession::new(context, tracer, name.into(), config)),
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

    /// Counters so far.
    pub fn stats(&self) -> ReadStats {
        self.session.stats()
    }

    /// Gets a reference to the wrapped reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Gets a mutable reference to the wrapped reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Unwraps the reader, dropping the session.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: AsyncRead + Unpin, T: Tracer> AsyncRead for TracedAsyncReader<R, T> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        this.session.begin();

        let capacity = buf.remaining();
        let before = buf.filled().len();

        let poll = Pin::new(&mut this.inner).poll_read(cx, buf);
        if let Poll::Ready(result) = &poll {
            let filled = buf.filled().len().saturating_sub(before);
            this.session.observe(ReadOutcome::from_poll(result, filled, capacity));
        }
        poll
    }
}

impl<R: Close, T: Tracer> Close for TracedAsyncReader<R, T> {
    fn close(&mut self) -> io::Result<()> {
        self.inner.close()
    }
}

impl<R: fmt::Debug, T: Tracer> fmt::Debug for TracedAsyncReader<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracedAsyncReader")
            .field("inner", &self.inner)
            .field("session", &self.session)
            .finish()
    }
}
