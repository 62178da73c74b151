// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event sourcing for the Composable Information Machine
//!
//! Turns commands into durably persisted events on NATS JetStream, with
//! optimistic concurrency per stream and state rebuilt by replay.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────────────────────┐   ┌─────────────┐
//! │   Command    │──►│  EventSourcingDispatcher  │──►│ EventStore  │
//! └──────────────┘   │  read → fold → decide →   │   │ (JetStream) │
//!                    │  append (revision guard)  │◄──│             │
//!                    └─────────────┬─────────────┘   └─────────────┘
//!                                  │
//!                           ┌──────▼──────┐
//!                           │   Decider   │  pure decide / evolve
//!                           └─────────────┘
//! ```
//!
//! - [`decider`] - the pure functional core of an aggregate
//! - [`dispatcher`] - one read-fold-decide-append cycle per command
//! - [`event_store`] - append-only stream storage, JetStream and in-memory
//! - [`message_type`] - canonical `namespace.domain.stream.version.name` names
//! - [`plan`] - a complete example aggregate

pub mod decider;
pub mod dispatcher;
pub mod errors;
pub mod event;
pub mod event_store;
pub mod jetstream;
pub mod message_type;
pub mod nats;
pub mod plan;
pub mod subjects;

// Re-export commonly used types
pub use decider::Decider;
pub use dispatcher::{
    CausationId, CorrelationId, DecisionResult, DispatchOptions, EventSourcingDispatcher,
};
pub use errors::{CodecError, DispatchError, EventStoreError, EventStoreResult};
pub use event::{ContentType, ExpectedRevision, ProposedEvent, RecordedEvent, WriteResult};
pub use event_store::{EventStore, InMemoryEventStore, NatsEventStore};
pub use jetstream::EventStoreConfig;
pub use message_type::{MessageType, MessageTypeInvalid};
pub use nats::NatsConfig;
