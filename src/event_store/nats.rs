// Copyright (c) 2025 - Cowboy AI, Inc.
//! NATS JetStream Event Store Implementation
//!
//! One JetStream stream holds every event stream of the store; each event
//! stream is a subject `<store>.<stream_id>` inside it.
//!
//! # Concurrency
//!
//! Appends are guarded by JetStream's conditional publish headers:
//!
//! ```text
//! Nats-Expected-Stream:                 <store>
//! Nats-Expected-Last-Subject-Sequence:  <n>      (0 = subject has no messages)
//! ```
//!
//! Every message of a batch must land in the store's stream, but only the
//! first one carries the sequence guard. The rest of the batch is published
//! right after it, so a batch is not a transaction: a transport failure part
//! way leaves a written prefix behind.
//!
//! # Reads
//!
//! A read opens an ephemeral pull consumer filtered to the stream subject and
//! fetches in batches until the pending count reported at creation has been
//! consumed. Events appended to the stream while a read is in progress may or
//! may not be included. The consumer is deleted once the read completes.

use async_nats::header::{NATS_EXPECTED_LAST_SUBJECT_SEQUENCE, NATS_EXPECTED_STREAM};
use async_nats::jetstream::context::{PublishError, PublishErrorKind};
use async_nats::jetstream::{self, consumer, stream::Stream};
use async_nats::HeaderMap;
use async_trait::async_trait;
use chrono::Utc;
use futures::StreamExt;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::errors::{EventStoreError, EventStoreResult};
use crate::event::{ExpectedRevision, ProposedEvent, RecordedEvent, WriteResult};
use crate::event_store::{envelope, EventStore};
use crate::jetstream::EventStoreConfig;
use crate::subjects::SubjectBuilder;

const READ_BATCH_SIZE: usize = 500;
const READ_FETCH_EXPIRY: Duration = Duration::from_secs(5);
const READ_CONSUMER_INACTIVITY: Duration = Duration::from_secs(30);

/// NATS JetStream-backed event store
///
/// # Example
///
/// ```rust,no_run
/// use cim_eventsourcing::event_store::{EventStore, NatsEventStore};
/// use cim_eventsourcing::jetstream::EventStoreConfig;
/// use cim_eventsourcing::nats::NatsConfig;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let jetstream = NatsConfig::from_env().jetstream().await?;
///     let store = NatsEventStore::create(jetstream, EventStoreConfig::new("eventstore")).await?;
///     let events = store.read_stream("plan.42").await?;
///     println!("{} events", events.len());
///     Ok(())
/// }
/// ```
pub struct NatsEventStore {
    jetstream: jetstream::Context,
    stream: Stream,
    subjects: SubjectBuilder,
}

impl NatsEventStore {
    /// Provision the backing stream, or attach to it if it already exists
    pub async fn create(
        jetstream: jetstream::Context,
        config: EventStoreConfig,
    ) -> EventStoreResult<Self> {
        config.validate()?;

        let stream = jetstream
            .get_or_create_stream(config.to_stream_config())
            .await
            .map_err(|e| EventStoreError::Transport(e.to_string()))?;

        info!(store = %config.name, subjects = ?config.subjects, "Event store ready");

        Ok(Self {
            jetstream,
            stream,
            subjects: SubjectBuilder::new(config.name),
        })
    }

    /// Attach to an existing backing stream without changing it
    pub async fn open(jetstream: jetstream::Context, name: &str) -> EventStoreResult<Self> {
        let stream = jetstream
            .get_stream(name)
            .await
            .map_err(|e| EventStoreError::Transport(e.to_string()))?;

        debug!(store = %name, "Event store opened");

        Ok(Self {
            jetstream,
            stream,
            subjects: SubjectBuilder::new(name),
        })
    }

    /// Store name, also the subject prefix of every stream
    pub fn name(&self) -> &str {
        self.subjects.store_name()
    }

    /// Change retention, limits or subjects of the backing stream
    ///
    /// The configured name is ignored; a store cannot be renamed.
    pub async fn update(&mut self, mut config: EventStoreConfig) -> EventStoreResult<()> {
        config.name = self.name().to_string();
        config.validate()?;

        self.jetstream
            .update_stream(&config.to_stream_config())
            .await
            .map_err(|e| EventStoreError::Transport(e.to_string()))?;

        self.stream = self
            .jetstream
            .get_stream(self.name())
            .await
            .map_err(|e| EventStoreError::Transport(e.to_string()))?;

        info!(store = %self.name(), "Event store updated");
        Ok(())
    }

    /// Delete the backing stream and every event in it
    pub async fn delete(self) -> EventStoreResult<()> {
        self.jetstream
            .delete_stream(self.name())
            .await
            .map_err(|e| EventStoreError::Transport(e.to_string()))?;

        info!(store = %self.name(), "Event store deleted");
        Ok(())
    }

    fn subject(&self, stream_id: &str) -> EventStoreResult<String> {
        self.subjects
            .stream(stream_id)
            .map_err(|_| EventStoreError::InvalidStreamId(stream_id.to_string()))
    }

    async fn publish(&self, subject: &str, headers: HeaderMap, payload: Vec<u8>) -> Result<u64, PublishError> {
        let ack = self
            .jetstream
            .publish_with_headers(subject.to_string(), headers, payload.into())
            .await?
            .await?;

        Ok(ack.sequence)
    }
}

fn guard_headers(headers: &mut HeaderMap, store: &str, expected_revision: Option<ExpectedRevision>) {
    headers.insert(NATS_EXPECTED_STREAM, store);
    if let Some(sequence) = expected_revision.and_then(|e| e.expected_last_sequence()) {
        headers.insert(
            NATS_EXPECTED_LAST_SUBJECT_SEQUENCE,
            sequence.to_string().as_str(),
        );
    }
}

/// Map a failed publish to a store error
///
/// Only a guarded publish can lose the revision race.
fn publish_failure(stream_id: &str, guarded: bool, error: PublishError) -> EventStoreError {
    if guarded && error.kind() == PublishErrorKind::WrongLastSequence {
        EventStoreError::SequenceConflict {
            stream_id: stream_id.to_string(),
        }
    } else {
        EventStoreError::Transport(error.to_string())
    }
}

#[async_trait]
impl EventStore for NatsEventStore {
    #[instrument(skip(self, events), fields(store = %self.name(), count = events.len()))]
    async fn append_to_stream(
        &self,
        stream_id: &str,
        events: Vec<ProposedEvent>,
        expected_revision: ExpectedRevision,
    ) -> EventStoreResult<WriteResult> {
        let subject = self.subject(stream_id)?;
        if events.is_empty() {
            return Err(EventStoreError::NothingToAppend {
                stream_id: stream_id.to_string(),
            });
        }

        let created = Utc::now();
        let mut encoded = Vec::with_capacity(events.len());
        for event in &events {
            encoded.push(envelope::encode(event, created)?);
        }

        let mut last_sequence = None;

        for (index, (event, (mut headers, payload))) in events.iter().zip(encoded).enumerate() {
            let guarded = index == 0;
            guard_headers(&mut headers, self.name(), guarded.then_some(expected_revision));

            match self.publish(&subject, headers, payload).await {
                Ok(sequence) => {
                    debug!(
                        subject = %subject,
                        event_id = %event.id,
                        event_type = %event.event_type,
                        sequence = sequence,
                        "Event published"
                    );
                    last_sequence = Some(sequence);
                }
                Err(e) => {
                    let err = publish_failure(stream_id, guarded, e);
                    if err.is_sequence_conflict() {
                        warn!(
                            subject = %subject,
                            expected = %expected_revision,
                            "Append rejected by revision guard"
                        );
                    } else if index > 0 {
                        warn!(
                            subject = %subject,
                            written = index,
                            total = events.len(),
                            error = %err,
                            "Append failed part way through batch"
                        );
                    }
                    return Err(err);
                }
            }
        }

        let next_expected_version = last_sequence.ok_or_else(|| EventStoreError::NothingToAppend {
            stream_id: stream_id.to_string(),
        })?;

        Ok(WriteResult {
            next_expected_version,
        })
    }

    #[instrument(skip(self), fields(store = %self.name()))]
    async fn read_stream(&self, stream_id: &str) -> EventStoreResult<Vec<RecordedEvent>> {
        let subject = self.subject(stream_id)?;

        let consumer = self
            .stream
            .create_consumer(consumer::pull::Config {
                filter_subject: subject.clone(),
                deliver_policy: consumer::DeliverPolicy::All,
                ack_policy: consumer::AckPolicy::Explicit,
                inactive_threshold: READ_CONSUMER_INACTIVITY,
                ..Default::default()
            })
            .await
            .map_err(|e| EventStoreError::Transport(e.to_string()))?;

        let pending = consumer.cached_info().num_pending as usize;
        let mut events = Vec::with_capacity(pending);

        while events.len() < pending {
            let mut messages = consumer
                .fetch()
                .max_messages(READ_BATCH_SIZE.min(pending - events.len()))
                .expires(READ_FETCH_EXPIRY)
                .messages()
                .await
                .map_err(|e| EventStoreError::Transport(e.to_string()))?;

            let before = events.len();

            while let Some(message) = messages.next().await {
                let message = message.map_err(|e| EventStoreError::Transport(e.to_string()))?;

                let sequence = message
                    .info()
                    .map_err(|e| EventStoreError::Decode(e.to_string()))?
                    .stream_sequence;

                let recorded_stream_id = self
                    .subjects
                    .stream_id_of(message.subject.as_str())
                    .ok_or_else(|| {
                        EventStoreError::Decode(format!(
                            "message {} on {} is outside store {}",
                            sequence,
                            message.subject,
                            self.name()
                        ))
                    })?;

                events.push(envelope::decode(
                    recorded_stream_id,
                    message.headers.as_ref(),
                    &message.payload,
                    sequence,
                )?);

                message
                    .ack()
                    .await
                    .map_err(|e| EventStoreError::Transport(e.to_string()))?;
            }

            if events.len() == before {
                return Err(EventStoreError::Decode(format!(
                    "stream {} ended after {} of {} events",
                    stream_id,
                    events.len(),
                    pending
                )));
            }
        }

        let consumer_name = &consumer.cached_info().name;
        if let Err(e) = self.stream.delete_consumer(consumer_name).await {
            warn!(consumer = %consumer_name, error = %e, "Failed to delete read consumer");
        }

        debug!(subject = %subject, count = events.len(), "Stream read");
        Ok(events)
    }
}
