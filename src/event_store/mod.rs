// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event Store Abstraction
//!
//! Durable, append-only, per-stream event logs.
//!
//! # Architecture
//!
//! ```text
//! Command → Dispatcher → Decider → Events → EventStore → JetStream
//!               ↑                                │
//!               └──────── read_stream ───────────┘
//! ```
//!
//! # Event Store Requirements
//!
//! 1. **Append-Only**: events are never updated or deleted
//! 2. **Ordered**: events of one stream are totally ordered by sequence number
//! 3. **Guarded**: appends carry an [`ExpectedRevision`] checked atomically
//!    against the stream's last sequence
//! 4. **Replay**: a stream can be read back from its first event
//!
//! No ordering is guaranteed across streams.
//!
//! # Implementations
//!
//! - [`NatsEventStore`] - NATS JetStream, one subject per stream
//! - [`InMemoryEventStore`] - same semantics in process, for tests and embedding

use async_trait::async_trait;

use crate::errors::{EventStoreError, EventStoreResult};
use crate::event::{ExpectedRevision, ProposedEvent, RecordedEvent, WriteResult};
use crate::subjects::validate_stream_id;

pub mod envelope;
pub mod memory;
pub mod nats;

pub use memory::InMemoryEventStore;
pub use nats::NatsEventStore;

/// Event Store trait for appending to and replaying event streams
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Append events to a stream
    ///
    /// Only the first event is checked against `expected_revision`; the rest
    /// of the batch follows unconditionally. A guard violation therefore
    /// aborts before anything is written, but a transport failure part way
    /// through leaves the events already written in place.
    ///
    /// # Returns
    ///
    /// The sequence number of the last event written
    ///
    /// # Errors
    ///
    /// - `SequenceConflict` if the guard does not hold
    /// - `NothingToAppend` if `events` is empty
    /// - `InvalidStreamId` if `stream_id` is not a literal subject
    /// - `Transport` for any other storage failure
    async fn append_to_stream(
        &self,
        stream_id: &str,
        events: Vec<ProposedEvent>,
        expected_revision: ExpectedRevision,
    ) -> EventStoreResult<WriteResult>;

    /// Read every event of a stream, oldest first
    ///
    /// A stream that was never written reads as empty. Decoding is strict:
    /// one malformed message fails the whole read. Wildcard stream ids are
    /// rejected with `InvalidStreamId`.
    async fn read_stream(&self, stream_id: &str) -> EventStoreResult<Vec<RecordedEvent>>;
}

/// Reject stream ids that are not a literal subject
pub(crate) fn check_stream_id(stream_id: &str) -> EventStoreResult<()> {
    validate_stream_id(stream_id)
        .map_err(|_| EventStoreError::InvalidStreamId(stream_id.to_string()))
}

#[async_trait]
impl<S> EventStore for std::sync::Arc<S>
where
    S: EventStore + ?Sized,
{
    async fn append_to_stream(
        &self,
        stream_id: &str,
        events: Vec<ProposedEvent>,
        expected_revision: ExpectedRevision,
    ) -> EventStoreResult<WriteResult> {
        (**self)
            .append_to_stream(stream_id, events, expected_revision)
            .await
    }

    async fn read_stream(&self, stream_id: &str) -> EventStoreResult<Vec<RecordedEvent>> {
        (**self).read_stream(stream_id).await
    }
}
