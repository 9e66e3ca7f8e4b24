// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Buffered result streams
//!
//! One generic paging engine serves all three query modes; the modes differ
//! only in how an encoded page item decodes ([`ResultDecoder`]). Each `pull`
//! is a direct page fetch against the engine-side cursor - nothing is
//! re-buffered on this side.
//!
//! Exhaustion is detected through the short-page rule: a page with fewer
//! items than `buffer_size` is the final page. A stream holds its operation
//! slot as an RAII guard and releases it exactly once - on the final page,
//! on [`dispose`](QueryStream::dispose), or when the stream is dropped - so
//! an abandoned stream can never block a pending close.

use super::lifecycle::OperationGuard;
use crate::codec::{
    self, CodecError, EncodedQuad, EncodedQuadDelta, EncodedQuadVersion,
};
use crate::engine::QueryProcessor;
use crate::error::StoreResult;
use crate::model::{Quad, QuadDelta, QuadVersion};

/// Decodes one encoded page item into its result shape.
pub trait ResultDecoder: Sized + Send {
    type Encoded: Send + 'static;

    fn decode(encoded: Self::Encoded) -> Result<Self, CodecError>;
}

impl ResultDecoder for Quad {
    type Encoded = EncodedQuad;

    fn decode(encoded: EncodedQuad) -> Result<Self, CodecError> {
        codec::decode_quad(encoded)
    }
}

impl ResultDecoder for QuadDelta {
    type Encoded = EncodedQuadDelta;

    fn decode(encoded: EncodedQuadDelta) -> Result<Self, CodecError> {
        codec::decode_quad_delta(encoded)
    }
}

impl ResultDecoder for QuadVersion {
    type Encoded = EncodedQuadVersion;

    fn decode(encoded: EncodedQuadVersion) -> Result<Self, CodecError> {
        codec::decode_quad_version(encoded)
    }
}

/// A buffered stream over one query's results.
///
/// `pull` returns `(is_final_page, items)`. After the final page every
/// further `pull` returns `(true, [])` without touching the engine.
pub struct QueryStream<T: ResultDecoder> {
    processor: Box<dyn QueryProcessor<T::Encoded>>,
    buffer_size: usize,
    exhausted: bool,
    slot: Option<OperationGuard>,
}

/// Stream of plain quads from a version-materialized query.
pub type VersionMaterializedStream = QueryStream<Quad>;
/// Stream of addition/deletion-decorated quads from a delta-materialized
/// query.
pub type DeltaMaterializedStream = QueryStream<QuadDelta>;
/// Stream of version-set-decorated quads from a version query.
pub type VersionQueryStream = QueryStream<QuadVersion>;

impl<T: ResultDecoder> QueryStream<T> {
    pub(crate) fn new(
        processor: Box<dyn QueryProcessor<T::Encoded>>,
        buffer_size: usize,
        slot: OperationGuard,
    ) -> Self {
        QueryStream {
            processor,
            buffer_size,
            exhausted: false,
            slot: Some(slot),
        }
    }

    /// The page size this stream requests from the engine.
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Whether the final page has been delivered.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Fetch the next page.
    ///
    /// Engine errors propagate without marking the stream exhausted and
    /// without releasing the operation slot; the caller may retry the pull or
    /// drop the stream.
    pub async fn pull(&mut self) -> StoreResult<(bool, Vec<T>)> {
        if self.exhausted {
            return Ok((true, Vec::new()));
        }
        let page = self.processor.pull(self.buffer_size).await?;
        let done = page.len() < self.buffer_size;
        let mut items = Vec::with_capacity(page.len());
        for encoded in page {
            items.push(T::decode(encoded)?);
        }
        if done {
            self.release();
        }
        Ok((done, items))
    }

    /// Abandon the stream, releasing its operation slot immediately. Further
    /// pulls return `(true, [])`.
    pub fn dispose(&mut self) {
        self.release();
    }

    fn release(&mut self) {
        self.exhausted = true;
        // Dropping the guard discharges the operation exactly once.
        self.slot.take();
    }
}
