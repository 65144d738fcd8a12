// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for traced-read integration tests
//!
//! Provides scripted readers whose every call result is fixed up front, so
//! tests can assert exact read counts and terminal outcomes without real I/O.

#![allow(dead_code)]

use std::{
    collections::VecDeque,
    io::{self, Read},
    pin::Pin,
    task::{Context, Poll},
};

use tokio::io::{AsyncRead, ReadBuf};
use traced_read::Close;

/// One scripted result of a read call
#[derive(Debug, Clone)]
pub enum Step {
    /// Return these bytes
    Data(Vec<u8>),
    /// Return end of stream
    Eof,
    /// Fail with this kind and message
    Fail(io::ErrorKind, &'static str),
    /// Fail with `ErrorKind::Interrupted`
    Interrupt,
    /// Async only: return `Pending` once (waking immediately)
    Pending,
}

impl Step {
    pub fn data(bytes: &[u8]) -> Self {
        Step::Data(bytes.to_vec())
    }

    pub fn fail(message: &'static str) -> Self {
        Step::Fail(io::ErrorKind::ConnectionReset, message)
    }
}

/// Reader that replays a fixed script, then reports end of stream forever.
///
/// # Example
///
/// ```rust,ignore
/// let reader = ScriptedReader::new([Step::data(b"hello"), Step::Eof])
///     .with_close_error("already closed");
/// ```
#[derive(Debug, Default)]
pub struct ScriptedReader {
    steps: VecDeque<Step>,
    /// Number of read calls received
    pub calls: usize,
    /// Number of close calls received
    pub closes: usize,
    close_error: Option<&'static str>,
}

impl ScriptedReader {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Make `close` fail with this message
    pub fn with_close_error(mut self, message: &'static str) -> Self {
        self.close_error = Some(message);
        self
    }

    fn next_step(&mut self) -> Step {
        self.calls += 1;
        self.steps.pop_front().unwrap_or(Step::Eof)
    }
}

fn copy_into(bytes: &[u8], buf: &mut [u8]) -> usize {
    let n = bytes.len().min(buf.len());
    buf[..n].copy_from_slice(&bytes[..n]);
    n
}

impl Read for ScriptedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.next_step() {
            Step::Data(bytes) => Ok(copy_into(&bytes, buf)),
            Step::Eof => Ok(0),
            Step::Fail(kind, message) => Err(io::Error::new(kind, message)),
            Step::Interrupt => Err(io::ErrorKind::Interrupted.into()),
            Step::Pending => Err(io::ErrorKind::WouldBlock.into()),
        }
    }
}

impl AsyncRead for ScriptedReader {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        match this.next_step() {
            Step::Data(bytes) => {
                let n = bytes.len().min(buf.remaining());
                buf.put_slice(&bytes[..n]);
                Poll::Ready(Ok(()))
            }
            Step::Eof => Poll::Ready(Ok(())),
            Step::Fail(kind, message) => Poll::Ready(Err(io::Error::new(kind, message))),
            Step::Interrupt => Poll::Ready(Err(io::ErrorKind::Interrupted.into())),
            Step::Pending => {
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }
}

impl Close for ScriptedReader {
    fn close(&mut self) -> io::Result<()> {
        self.closes += 1;
        match self.close_error {
            Some(message) => Err(io::Error::other(message)),
            None => Ok(()),
        }
    }
}
