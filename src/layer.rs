// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tower layer that wraps readers in [`TracedReader`]s.
//!
//! A [`TracedReadLayer`] holds the tracer, context, span name and config, and
//! stamps out one traced reader per stream it is applied to. Each produced
//! reader owns its own session, so every stream gets its own span.

use std::borrow::Cow;

use tower::Layer;

use crate::{
    async_reader::TracedAsyncReader, config::TracedReadConfig, reader::TracedReader,
    tracer::Tracer,
};

/// A Tower layer producing [`TracedReader`]s.
///
/// # Example
///
/// ```rust
/// use std::io::Read;
/// use tower::Layer;
/// use traced_read::{backend::RecordingTracer, TracedReadLayer};
///
/// let tracer = RecordingTracer::new();
/// let layer = TracedReadLayer::new(tracer.root_context(), tracer.clone(), "part");
///
/// for part in [&b"one"[..], &b"two"[..]] {
///     let mut reader = layer.layer(part);
///     reader.read_to_end(&mut Vec::new()).unwrap();
/// }
///
/// assert_eq!(tracer.spans_named("part").len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct TracedReadLayer<T, C> {
    tracer: T,
    context: C,
    name: Cow<'static, str>,
    config: TracedReadConfig,
}

impl<T, C> TracedReadLayer<T, C>
where
    T: Tracer<Context = C> + Clone,
    C: Clone,
{
    /// Creates a layer with the default [`TracedReadConfig`].
    pub fn new(context: C, tracer: T, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            tracer,
            context,
            name: name.into(),
            config: TracedReadConfig::default(),
        }
    }

    /// Replaces the config used for readers produced by this layer.
    pub fn with_config(mut self, config: TracedReadConfig) -> Self {
        self.config = config;
        self
    }

    /// Wraps an async reader. This is the [`AsyncRead`](tokio::io::AsyncRead)
    /// counterpart of [`Layer::layer`].
    pub fn layer_async<R>(&self, reader: R) -> TracedAsyncReader<R, T> {
        TracedAsyncReader::with_config(
            self.context.clone(),
            self.tracer.clone(),
            reader,
            self.name.clone(),
            &self.config,
        )
    }
}

impl<R, T, C> Layer<R> for TracedReadLayer<T, C>
where
    T: Tracer<Context = C> + Clone,
    C: Clone,
{
    type Service = TracedReader<R, T>;

    fn layer(&self, reader: R) -> Self::Service {
        TracedReader::with_config(
            self.context.clone(),
            self.tracer.clone(),
            reader,
            self.name.clone(),
            &self.config,
        )
    }
}
