// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Span creation helpers for the `tracing` backend.
//!
//! Span shapes live here rather than inline in the backend so every field a
//! traced read span carries is declared in one place. Fields that are filled
//! in at termination are declared `Empty`; `tracing` silently drops records
//! for undeclared fields.

use tracing::{field::Empty, Span};

use crate::config::constants::TRACING_SPAN_NAME;

/// Create span covering one traced stream, from first read to terminal read.
///
/// Parent: the context span handed to the traced reader (or none)
/// Children: none; read counts are recorded as fields when the stream ends
#[inline]
pub(crate) fn traced_read(parent: &Span, name: &str) -> Span {
    tracing::info_span!(
        parent: parent,
        TRACING_SPAN_NAME,
        otel.name = %name,
        reads = Empty,
        bytes_read = Empty,
        otel.status_code = Empty,
        otel.status_message = Empty,
    )
}
