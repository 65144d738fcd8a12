// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Span lifecycle for one observed stream.
//!
//! A [`ReadSession`] owns everything a traced reader needs to emit its span:
//! the tracer, the context, the name, the counters and the span handle
//! itself. Both [`TracedReader`](crate::TracedReader) and
//! [`TracedAsyncReader`](crate::TracedAsyncReader) drive one, so the state
//! machine below exists exactly once:
//!
//! ```text
//! NotStarted --begin()--> Active(span) --observe(terminal)--> Ended
//! ```
//!
//! `Ended` is absorbing; `observe` becomes a no-op there.

use std::{borrow::Cow, fmt, io, mem};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::{
    config::TracedReadConfig,
    tracer::{KeyValue, Status, TraceSpan, Tracer},
};

/// Counters accumulated while a session is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReadStats {
    /// Delegated read calls, including the terminal one
    pub reads: u64,
    /// Bytes returned by the wrapped reader
    pub bytes_read: u64,
}

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No read has been attempted; no span exists
    NotStarted,
    /// A span is open and reads are being tallied
    Active,
    /// The span has been finished; counters are frozen
    Ended,
}

/// Session state, with the span handle living only in `Active`.
enum SessionState<S> {
    NotStarted,
    Active(S),
    Ended,
}

impl<S> SessionState<S> {
    fn phase(&self) -> Phase {
        match self {
            SessionState::NotStarted => Phase::NotStarted,
            SessionState::Active(_) => Phase::Active,
            SessionState::Ended => Phase::Ended,
        }
    }
}

/// Classified result of one delegated read.
#[derive(Debug)]
pub(crate) enum ReadOutcome<'a> {
    /// Returned `n` bytes (possibly zero for an empty buffer); not terminal
    Data(usize),
    /// The read was interrupted and may be retried; not terminal
    Interrupted,
    /// End of stream; terminal, successful
    EndOfStream,
    /// Any other error; terminal, failed
    Failed(&'a io::Error),
}

impl<'a> ReadOutcome<'a> {
    /// Classifies a blocking read into a buffer of `requested` bytes.
    pub(crate) fn from_read(result: &'a io::Result<usize>, requested: usize) -> Self {
        match result {
            Ok(0) if requested > 0 => ReadOutcome::EndOfStream,
            Ok(n) => ReadOutcome::Data(*n),
            Err(e) => Self::from_error(e),
        }
    }

    /// Classifies a completed async read that filled `filled` bytes into a
    /// buffer that had room for `capacity`.
    pub(crate) fn from_poll(result: &'a io::Result<()>, filled: usize, capacity: usize) -> Self {
        match result {
            Ok(()) if filled == 0 && capacity > 0 => ReadOutcome::EndOfStream,
            Ok(()) => ReadOutcome::Data(filled),
            Err(e) => Self::from_error(e),
        }
    }

    fn from_error(e: &'a io::Error) -> Self {
        // Interrupted is retried by std read loops, so it counts but never ends the span.
        if e.kind() == io::ErrorKind::Interrupted {
            ReadOutcome::Interrupted
        } else {
            ReadOutcome::Failed(e)
        }
    }

    fn bytes(&self) -> usize {
        match self {
            ReadOutcome::Data(n) => *n,
            _ => 0,
        }
    }

    fn terminal_status(&self) -> Option<Status> {
        match self {
            ReadOutcome::Data(_) | ReadOutcome::Interrupted => None,
            ReadOutcome::EndOfStream => Some(Status::Ok),
            ReadOutcome::Failed(e) => Some(Status::error(e.to_string())),
        }
    }
}

/// One observed stream's span and counters.
pub(crate) struct ReadSession<T: Tracer> {
    tracer: T,
    context: T::Context,
    name: Cow<'static, str>,
    reads_key: Cow<'static, str>,
    bytes_read_key: Cow<'static, str>,
    state: SessionState<T::Span>,
    stats: ReadStats,
}

impl<T: Tracer> ReadSession<T> {
    pub(crate) fn new(
        context: T::Context,
        tracer: T,
        name: Cow<'static, str>,
        config: &TracedReadConfig,
    ) -> Self {
        let (reads_key, bytes_read_key) = config.keys();
        Self {
            tracer,
            context,
            name,
            reads_key,
            bytes_read_key,
            state: SessionState::NotStarted,
            stats: ReadStats::default(),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn context(&self) -> &T::Context {
        &self.context
    }

    pub(crate) fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub(crate) fn stats(&self) -> ReadStats {
        self.stats
    }

    /// Starts the span if no read has been attempted yet.
    pub(crate) fn begin(&mut self) {
        if let SessionState::NotStarted = self.state {
            let (_, span) = self.tracer.start(&self.context, &self.name);
            trace!(name = %self.name, "traced read session started");
            self.state = SessionState::Active(span);
        }
    }

    /// Tallies one delegated read and finishes the span on a terminal outcome.
    pub(crate) fn observe(&mut self, outcome: ReadOutcome<'_>) {
        if !matches!(self.state, SessionState::Active(_)) {
            return;
        }

        self.stats.reads += 1;
        self.stats.bytes_read += outcome.bytes() as u64;

        if let Some(status) = outcome.terminal_status() {
            self.finish(status, &outcome);
        }
    }

    fn finish(&mut self, status: Status, outcome: &ReadOutcome<'_>) {
        let SessionState::Active(mut span) = mem::replace(&mut self.state, SessionState::Ended)
        else {
            return;
        };

        span.set_attributes(&[
            KeyValue::new(self.reads_key.clone(), self.stats.reads),
            KeyValue::new(self.bytes_read_key.clone(), self.stats.bytes_read),
        ]);
        span.set_status(status);
        span.end();

        match outcome {
            ReadOutcome::Failed(e) => warn!(
                name = %self.name,
                reads = self.stats.reads,
                bytes_read = self.stats.bytes_read,
                error = %e,
                "traced read session failed"
            ),
            _ => debug!(
                name = %self.name,
                reads = self.stats.reads,
                bytes_read = self.stats.bytes_read,
                "traced read session reached end of stream"
            ),
        }
    }
}

impl<T: Tracer> Drop for ReadSession<T> {
    fn drop(&mut self) {
        if let SessionState::Active(_) = self.state {
            debug!(
                name = %self.name,
                reads = self.stats.reads,
                bytes_read = self.stats.bytes_read,
                "traced read session dropped before a terminal read"
            );
        }
    }
}

impl<T: Tracer> fmt::Debug for ReadSession<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadSession")
            .field("name", &self.name)
            .field("phase", &self.phase())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
