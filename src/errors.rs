// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for event sourcing operations
//!
//! Errors are layered the same way a dispatch cycle is:
//!
//! - [`EventStoreError`] - storage and transport failures, including the
//!   optimistic concurrency conflict
//! - [`CodecError`] - failures of the collaborator functions a domain supplies
//!   (stream routing, event typing, marshaling)
//! - [`DispatchError`] - everything a dispatch can fail with, generic over the
//!   domain error returned by `decide`

use thiserror::Error;

use crate::message_type::MessageTypeInvalid;

/// Errors that can occur while appending to or reading from an event store
#[derive(Debug, Error)]
pub enum EventStoreError {
    /// The expected revision guard did not hold at append time
    ///
    /// Recoverable: the caller may re-run the whole read-decide-append cycle.
    #[error("sequence conflict on stream {stream_id}")]
    SequenceConflict {
        /// Stream the conflicting append targeted
        stream_id: String,
    },

    /// An append was requested with no events
    #[error("nothing to append to stream {stream_id}")]
    NothingToAppend {
        /// Stream the empty append targeted
        stream_id: String,
    },

    /// The stream id is not a literal subject
    #[error("invalid stream id: {0}")]
    InvalidStreamId(String),

    /// NATS / JetStream transport error, propagated unchanged
    #[error("transport error: {0}")]
    Transport(String),

    /// Envelope serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A stored message could not be decoded into a recorded event
    #[error("decode error: {0}")]
    Decode(String),

    /// Stream provisioning or configuration error
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl EventStoreError {
    /// Whether this error is the optimistic concurrency conflict
    pub fn is_sequence_conflict(&self) -> bool {
        matches!(self, EventStoreError::SequenceConflict { .. })
    }
}

/// Result type for event store operations
pub type EventStoreResult<T> = Result<T, EventStoreError>;

impl From<async_nats::Error> for EventStoreError {
    fn from(err: async_nats::Error) -> Self {
        EventStoreError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for EventStoreError {
    fn from(err: serde_json::Error) -> Self {
        EventStoreError::Serialization(err.to_string())
    }
}

/// Errors raised by the routing and marshaling collaborators of a dispatcher
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The command cannot be routed to a stream
    #[error("unknown command")]
    UnknownCommand,

    /// The event type is not known to this domain
    #[error("unknown event: {0}")]
    UnknownEvent(String),

    /// A stream id segment is empty or contains subject-reserved characters
    #[error("invalid stream id: {0}")]
    InvalidStreamId(String),

    /// Event type failed MessageType validation
    #[error(transparent)]
    MessageType(#[from] MessageTypeInvalid),

    /// Payload (de)serialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        CodecError::Serialization(err.to_string())
    }
}

/// Errors returned by a dispatch cycle
///
/// `E` is the domain error type of the decider. Domain errors are surfaced
/// verbatim through [`DispatchError::Domain`].
#[derive(Debug, Error)]
pub enum DispatchError<E>
where
    E: std::error::Error + 'static,
{
    /// Command rejected by the decider
    #[error(transparent)]
    Domain(E),

    /// The replayed state is terminal, no further commands are accepted
    #[error("state is terminal")]
    StateIsTerminal,

    /// Routing, typing or marshaling failure
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Event store failure, including sequence conflicts
    #[error(transparent)]
    Store(#[from] EventStoreError),
}

impl<E> DispatchError<E>
where
    E: std::error::Error + 'static,
{
    /// Whether the dispatch lost an optimistic concurrency race
    pub fn is_sequence_conflict(&self) -> bool {
        matches!(self, DispatchError::Store(err) if err.is_sequence_conflict())
    }

    /// The domain error, if the decider rejected the command
    pub fn domain(&self) -> Option<&E> {
        match self {
            DispatchError::Domain(err) => Some(err),
            _ => None,
        }
    }
}
