// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Capability traits for span creation and mutation.
//!
//! The readers in this crate never talk to a tracing backend directly. They
//! take a [`Tracer`] at construction and drive the [`TraceSpan`] it returns,
//! which keeps them testable against in-memory fakes and lets any backend be
//! plugged in.
//!
//! Two backends ship with the crate:
//! - [`TracingTracer`](crate::backend::TracingTracer) for the `tracing` ecosystem
//! - [`RecordingTracer`](crate::backend::RecordingTracer) for tests and snapshots

use std::{borrow::Cow, fmt};

use serde::{Deserialize, Serialize};

/// Factory for spans within a trace context.
///
/// A traced reader calls [`Tracer::start`] exactly once, on its first read.
pub trait Tracer {
    /// Context a span is started under (a parent span, a trace id, ...).
    type Context;

    /// Span handle produced by this tracer.
    type Span: TraceSpan;

    /// Starts a span named `name` under `cx`.
    ///
    /// Returns the derived context (the new span as a parent) alongside the
    /// span handle.
    fn start(&self, cx: &Self::Context, name: &str) -> (Self::Context, Self::Span);
}

/// A live span handle.
///
/// Traced readers call these exactly once each, in the order
/// `set_attributes`, `set_status`, `end`, when the session reaches its
/// terminal read.
pub trait TraceSpan {
    /// Attaches attributes to the span.
    fn set_attributes(&mut self, attributes: &[KeyValue]);

    /// Sets the span's final status.
    fn set_status(&mut self, status: Status);

    /// Ends the span. Consumes the handle so it cannot be ended twice.
    fn end(self);
}

impl<T: Tracer + ?Sized> Tracer for &T {
    type Context = T::Context;
    type Span = T::Span;

    fn start(&self, cx: &Self::Context, name: &str) -> (Self::Context, Self::Span) {
        (**self).start(cx, name)
    }
}

/// A span attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    /// Attribute key
    pub key: Cow<'static, str>,
    /// Attribute value
    pub value: Value,
}

impl KeyValue {
    /// Creates an attribute from anything convertible into a [`Value`].
    pub fn new(key: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Signed integer
    I64(i64),
    /// Boolean
    Bool(bool),
    /// String
    Str(Cow<'static, str>),
}

impl Value {
    /// Returns the integer payload, if this is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

/// Counters saturate at `i64::MAX`, which no real stream reaches.
impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::I64(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&'static str> for Value {
    fn from(v: &'static str) -> Self {
        Value::Str(Cow::Borrowed(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(Cow::Owned(v))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::I64(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Str(v) => f.write_str(v),
        }
    }
}

/// Final status of a span.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Status {
    /// No status recorded
    #[default]
    Unset,
    /// The operation completed successfully
    Ok,
    /// The operation failed
    Error {
        /// Human-readable failure description
        description: Cow<'static, str>,
    },
}

impl Status {
    /// Creates an error status.
    pub fn error(description: impl Into<Cow<'static, str>>) -> Self {
        Status::Error {
            description: description.into(),
        }
    }

    /// Returns `true` for [`Status::Ok`].
    pub fn is_ok(&self) -> bool {
        matches!(self, Status::Ok)
    }

    /// Returns `true` for [`Status::Error`].
    pub fn is_error(&self) -> bool {
        matches!(self, Status::Error { .. })
    }

    /// Status code as rendered by OpenTelemetry-style exporters.
    pub fn code(&self) -> &'static str {
        match self {
            Status::Unset => "UNSET",
            Status::Ok => "OK",
            Status::Error { .. } => "ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_from_u64_saturates() {
        assert_eq!(Value::from(42u64), Value::I64(42));
        assert_eq!(Value::from(u64::MAX), Value::I64(i64::MAX));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(Status::Unset.code(), "UNSET");
        assert_eq!(Status::Ok.code(), "OK");
        assert_eq!(Status::error("boom").code(), "ERROR");
        assert!(Status::error("boom").is_error());
        assert!(!Status::Ok.is_error());
    }

    #[test]
    fn test_status_serializes_with_code_tag() {
        let json = serde_json::to_value(Status::error("disk gone")).unwrap();
        assert_eq!(json["code"], "error");
        assert_eq!(json["description"], "disk gone");
    }

    #[test]
    fn test_key_value_display() {
        let kv = KeyValue::new("reads", 3i64);
        assert_eq!(kv.key, "reads");
        assert_eq!(kv.value.to_string(), "3");
    }
}
