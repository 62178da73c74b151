// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event envelopes exchanged with the event store
//!
//! - [`ProposedEvent`] - a marshaled event waiting to be appended
//! - [`RecordedEvent`] - the durable, read-back form with its sequence number
//! - [`ExpectedRevision`] - the optimistic concurrency precondition of an append

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use crate::message_type::MessageType;

/// Free-form string metadata carried in message headers
pub type SystemMetadata = BTreeMap<String, String>;

/// Encoding of an event payload
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContentType {
    Json,
    Protobuf,
    /// Any other media type, kept verbatim
    Other(String),
}

impl ContentType {
    pub const JSON: &'static str = "application/json";
    pub const PROTOBUF: &'static str = "application/protobuf";

    pub fn as_str(&self) -> &str {
        match self {
            ContentType::Json => Self::JSON,
            ContentType::Protobuf => Self::PROTOBUF,
            ContentType::Other(other) => other,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ContentType {
    fn from(value: &str) -> Self {
        match value {
            Self::JSON => ContentType::Json,
            Self::PROTOBUF => ContentType::Protobuf,
            other => ContentType::Other(other.to_string()),
        }
    }
}

impl From<String> for ContentType {
    fn from(value: String) -> Self {
        ContentType::from(value.as_str())
    }
}

impl From<ContentType> for String {
    fn from(value: ContentType) -> Self {
        value.as_str().to_string()
    }
}

/// Precondition on a stream's last sequence number, checked at append time
///
/// | stream state   | `Any` | `StreamExists` | `NoStream` | `StreamRevision(n)` |
/// |----------------|-------|----------------|------------|---------------------|
/// | empty          | ok    | ok (unchecked) | ok         | ok iff `n == 0`     |
/// | last seq = `k` | ok    | ok (unchecked) | conflict   | ok iff `k == n`     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExpectedRevision {
    /// No conflict check
    #[default]
    Any,
    /// Stream must have no events yet
    NoStream,
    /// Advisory only: the store does not verify it
    StreamExists,
    /// Stream's last sequence number must equal exactly this value
    StreamRevision(u64),
}

impl ExpectedRevision {
    /// Sequence number the store uses to mean "stream has no events"
    pub const NO_STREAM_SEQUENCE: u64 = 0;

    /// The last-sequence value the store must verify, if any
    pub fn expected_last_sequence(&self) -> Option<u64> {
        match self {
            ExpectedRevision::NoStream => Some(Self::NO_STREAM_SEQUENCE),
            ExpectedRevision::StreamRevision(revision) => Some(*revision),
            ExpectedRevision::Any | ExpectedRevision::StreamExists => None,
        }
    }

    /// Derive the guard from the last sequence seen while replaying a stream
    pub fn from_last_revision(last_revision: Option<u64>) -> Self {
        match last_revision {
            Some(revision) => ExpectedRevision::StreamRevision(revision),
            None => ExpectedRevision::NoStream,
        }
    }

    /// Evaluate the guard against a stream's current last sequence
    ///
    /// `current` is `None` for a stream without events.
    pub fn is_satisfied_by(&self, current: Option<u64>) -> bool {
        match self.expected_last_sequence() {
            None => true,
            Some(expected) => current.unwrap_or(Self::NO_STREAM_SEQUENCE) == expected,
        }
    }
}

impl fmt::Display for ExpectedRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedRevision::Any => write!(f, "any"),
            ExpectedRevision::NoStream => write!(f, "no-stream"),
            ExpectedRevision::StreamExists => write!(f, "stream-exists"),
            ExpectedRevision::StreamRevision(revision) => write!(f, "revision({})", revision),
        }
    }
}

/// A marshaled event ready to be appended
///
/// The creation timestamp is not part of the proposal: the store assigns it
/// when the event is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposedEvent {
    /// Unique event id, also used for broker-side deduplication
    pub id: Uuid,
    pub event_type: MessageType,
    pub content_type: ContentType,
    /// Marshaled payload
    pub data: Vec<u8>,
    /// Opaque user metadata stored next to the payload
    pub metadata: Vec<u8>,
    /// String key/value pairs carried as headers
    pub system_metadata: SystemMetadata,
}

impl ProposedEvent {
    /// Create a proposal with a fresh id
    pub fn new(event_type: MessageType, content_type: ContentType, data: Vec<u8>) -> Self {
        Self {
            id: Uuid::now_v7(),
            event_type,
            content_type,
            data,
            metadata: Vec::new(),
            system_metadata: SystemMetadata::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Vec<u8>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_system_metadata(mut self, system_metadata: SystemMetadata) -> Self {
        self.system_metadata = system_metadata;
        self
    }
}

/// An event as read back from the store
///
/// Only produced by [`EventStore::read_stream`](crate::event_store::EventStore::read_stream).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEvent {
    pub id: Uuid,
    /// Event type as stored; not re-validated so that old types stay readable
    pub event_type: String,
    pub content_type: ContentType,
    pub stream_id: String,
    /// Store-assigned sequence number, strictly increasing within a stream
    pub event_number: u64,
    pub created: DateTime<Utc>,
    pub system_metadata: SystemMetadata,
    pub data: Vec<u8>,
    pub metadata: Vec<u8>,
}

/// Outcome of a successful append
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteResult {
    /// Sequence number of the last event written
    pub next_expected_version: u64,
}
