// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-memory event store
//!
//! Mirrors the JetStream semantics of [`NatsEventStore`](super::NatsEventStore):
//!
//! - one store-wide sequence, starting at 1, shared by every stream
//! - a stream's revision is the store sequence of its last event
//! - `0` stands for "no stream" in revision guards
//!
//! Events go through the same envelope encoding as the JetStream store, so
//! reads exercise the same decoding rules. A whole batch is written under one
//! lock, which makes multi-event appends atomic here.

use async_nats::HeaderMap;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use crate::errors::{EventStoreError, EventStoreResult};
use crate::event::{ExpectedRevision, ProposedEvent, RecordedEvent, WriteResult};
use crate::event_store::{check_stream_id, envelope, EventStore};

#[derive(Debug, Clone)]
struct StoredMessage {
    sequence: u64,
    headers: HeaderMap,
    payload: Vec<u8>,
}

#[derive(Debug, Default)]
struct Log {
    last_sequence: u64,
    streams: HashMap<String, Vec<StoredMessage>>,
}

impl Log {
    fn stream_revision(&self, stream_id: &str) -> Option<u64> {
        self.streams
            .get(stream_id)
            .and_then(|messages| messages.last())
            .map(|message| message.sequence)
    }
}

/// Process-local event store with the same revision semantics as JetStream
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    log: RwLock<Log>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last sequence assigned across all streams
    pub async fn last_sequence(&self) -> u64 {
        self.log.read().await.last_sequence
    }

    /// Revision of a stream, `None` if it has no events
    pub async fn stream_revision(&self, stream_id: &str) -> Option<u64> {
        self.log.read().await.stream_revision(stream_id)
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    #[instrument(skip(self, events), fields(count = events.len()))]
    async fn append_to_stream(
        &self,
        stream_id: &str,
        events: Vec<ProposedEvent>,
        expected_revision: ExpectedRevision,
    ) -> EventStoreResult<WriteResult> {
        check_stream_id(stream_id)?;
        if events.is_empty() {
            return Err(EventStoreError::NothingToAppend {
                stream_id: stream_id.to_string(),
            });
        }

        let mut log = self.log.write().await;

        let current = log.stream_revision(stream_id);
        if !expected_revision.is_satisfied_by(current) {
            warn!(
                stream_id = %stream_id,
                expected = %expected_revision,
                current = ?current,
                "Append rejected by revision guard"
            );
            return Err(EventStoreError::SequenceConflict {
                stream_id: stream_id.to_string(),
            });
        }

        let created = Utc::now();
        let mut encoded = Vec::with_capacity(events.len());
        for event in &events {
            encoded.push(envelope::encode(event, created)?);
        }

        let mut sequence = log.last_sequence;
        let mut written = Vec::with_capacity(encoded.len());
        for (headers, payload) in encoded {
            sequence += 1;
            written.push(StoredMessage {
                sequence,
                headers,
                payload,
            });
        }

        log.streams
            .entry(stream_id.to_string())
            .or_default()
            .extend(written);
        log.last_sequence = sequence;

        debug!(stream_id = %stream_id, sequence = sequence, "Events appended");

        Ok(WriteResult {
            next_expected_version: sequence,
        })
    }

    #[instrument(skip(self))]
    async fn read_stream(&self, stream_id: &str) -> EventStoreResult<Vec<RecordedEvent>> {
        check_stream_id(stream_id)?;
        let log = self.log.read().await;

        log.streams
            .get(stream_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|message| {
                envelope::decode(
                    stream_id,
                    Some(&message.headers),
                    &message.payload,
                    message.sequence,
                )
            })
            .collect()
    }
}
