// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tracing decorators for byte streams.
//!
//! Wrap any reader in a [`TracedReader`] (blocking) or [`TracedAsyncReader`]
//! (tokio) and it emits exactly one span per stream:
//!
//! - the span starts on the first read attempt
//! - it ends on the first terminal read: end of stream (`Status::Ok`) or an
//!   error (`Status::Error` with the error's message)
//! - at termination it records the number of reads and the total bytes read
//!
//! The decorators never change what the wrapped reader returns; reads after
//! the terminal event still pass through but no longer touch the span.
//!
//! Spans come from a [`Tracer`] injected at construction. The crate ships a
//! `tracing` backend ([`backend::TracingTracer`]) and an in-memory one
//! ([`backend::RecordingTracer`]); anything else can implement [`Tracer`] and
//! [`TraceSpan`].
//!
//! ```rust
//! use std::io::Read;
//! use traced_read::TracedReader;
//!
//! let _guard = tracing::info_span!("request").entered();
//! let mut body = TracedReader::in_current_span(&b"{\"ok\":true}"[..], "request_body");
//! let mut json = String::new();
//! body.read_to_string(&mut json).unwrap();
//! ```

mod async_reader;
pub mod backend;
mod close;
pub mod config;
mod errors;
mod layer;
mod reader;
mod session;
mod spans;
mod tracer;

pub use async_reader::TracedAsyncReader;
pub use close::Close;
pub use config::{TracedReadConfig, TracedReadConfigBuilder};
pub use errors::ConfigError;
pub use layer::TracedReadLayer;
pub use reader::TracedReader;
pub use session::{Phase, ReadStats};
pub use tracer::{KeyValue, Status, TraceSpan, Tracer, Value};
