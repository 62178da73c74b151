// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event-sourcing dispatcher
//!
//! Wires a [`Decider`] to an [`EventStore`]. Every dispatch is one cycle:
//!
//! ```text
//! command ─► stream_id_of ─► read_stream ─► unmarshal + evolve ─► state
//!                                                                  │
//!   WriteResult ◄─ append_to_stream ◄─ marshal + event_type_of ◄─ decide
//! ```
//!
//! The append is guarded by the revision seen during replay, so two cycles
//! racing on the same stream cannot both win. The loser gets a sequence
//! conflict and may re-run the whole cycle; nothing is retried here.
//!
//! The dispatcher holds only function pointers and is shared freely between
//! tasks. The store is passed per call.

use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, instrument, Span};
use uuid::Uuid;

use crate::decider::Decider;
use crate::errors::{CodecError, DispatchError};
use crate::event::{ContentType, ExpectedRevision, ProposedEvent, SystemMetadata};
use crate::event_store::EventStore;
use crate::message_type::MessageType;

/// System metadata key of the correlation id
pub const CORRELATION_ID_KEY: &str = "correlation-id";
/// System metadata key of the causation id
pub const CAUSATION_ID_KEY: &str = "causation-id";

/// Resolve the stream a command targets
pub type StreamIdOf<Command> = fn(&Command) -> Result<String, CodecError>;

/// Encode an event payload
pub type Marshal<Event> = fn(&Event) -> Result<(ContentType, Vec<u8>), CodecError>;

/// Decode an event payload given its stored type
pub type Unmarshal<Event> = fn(&str, &[u8]) -> Result<Event, CodecError>;

/// Canonical type of an event
pub type EventTypeOf<Event> = fn(&Event) -> Result<MessageType, CodecError>;

/// Identifier shared by every message of one logical flow
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId(String);

impl CorrelationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self(Uuid::now_v7().to_string())
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the message that caused this one
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CausationId(String);

impl CausationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CausationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-call dispatch options, all optional
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Override of the revision derived from replay
    pub expected_revision: Option<ExpectedRevision>,
    /// Defaults to a fresh id per dispatch
    pub correlation_id: Option<CorrelationId>,
    pub causation_id: Option<CausationId>,
    /// Extra string metadata written as headers of every event
    pub metadata: BTreeMap<String, String>,
    /// Opaque bytes stored with every event
    pub user_metadata: Vec<u8>,
}

impl DispatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expected_revision(mut self, expected_revision: ExpectedRevision) -> Self {
        self.expected_revision = Some(expected_revision);
        self
    }

    pub fn with_correlation_id(mut self, correlation_id: CorrelationId) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    pub fn with_causation_id(mut self, causation_id: CausationId) -> Self {
        self.causation_id = Some(causation_id);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_user_metadata(mut self, user_metadata: Vec<u8>) -> Self {
        self.user_metadata = user_metadata;
        self
    }

    /// System metadata for the events of one dispatch
    ///
    /// Correlation and causation ids take precedence over same-named keys in
    /// `metadata`.
    fn system_metadata(&self) -> SystemMetadata {
        let mut system_metadata = self.metadata.clone();
        let correlation_id = self.correlation_id.clone().unwrap_or_default();
        system_metadata.insert(CORRELATION_ID_KEY.to_string(), correlation_id.0);
        if let Some(causation_id) = &self.causation_id {
            system_metadata.insert(CAUSATION_ID_KEY.to_string(), causation_id.0.clone());
        }
        system_metadata
    }
}

/// Outcome of a successful dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionResult<Event> {
    /// Stream revision after the append, the revision to expect next
    pub next_expected_version: u64,
    /// Events produced by the decision
    pub events: Vec<Event>,
}

/// Runs the read, fold, decide and append cycle for one decider
pub struct EventSourcingDispatcher<State, Command, Event, Error> {
    decider: Decider<State, Command, Event, Error>,
    stream_id_of: StreamIdOf<Command>,
    marshal: Marshal<Event>,
    unmarshal: Unmarshal<Event>,
    event_type_of: EventTypeOf<Event>,
}

impl<State, Command, Event, Error> EventSourcingDispatcher<State, Command, Event, Error>
where
    Error: std::error::Error + 'static,
{
    pub fn new(
        decider: Decider<State, Command, Event, Error>,
        stream_id_of: StreamIdOf<Command>,
        marshal: Marshal<Event>,
        unmarshal: Unmarshal<Event>,
        event_type_of: EventTypeOf<Event>,
    ) -> Self {
        Self {
            decider,
            stream_id_of,
            marshal,
            unmarshal,
            event_type_of,
        }
    }

    pub fn decider(&self) -> &Decider<State, Command, Event, Error> {
        &self.decider
    }

    pub fn stream_id_of(&self, command: &Command) -> Result<String, CodecError> {
        (self.stream_id_of)(command)
    }

    /// Rebuild the current state of a stream
    ///
    /// Returns the state together with the last revision read, `None` for a
    /// stream without events.
    pub async fn load<S>(
        &self,
        store: &S,
        stream_id: &str,
    ) -> Result<(State, Option<u64>), DispatchError<Error>>
    where
        S: EventStore + ?Sized,
    {
        let recorded = store.read_stream(stream_id).await?;

        let mut state = self.decider.initial_state();
        let mut last_revision = None;
        for event in &recorded {
            let decoded = (self.unmarshal)(&event.event_type, &event.data)?;
            state = self.decider.evolve(state, &decoded);
            last_revision = Some(event.event_number);
        }

        debug!(stream_id = %stream_id, replayed = recorded.len(), "State rebuilt");
        Ok((state, last_revision))
    }

    /// Handle one command
    ///
    /// # Errors
    ///
    /// - `Codec` if the command cannot be routed or an event cannot be
    ///   encoded or decoded
    /// - `StateIsTerminal` if the replayed state accepts no more commands
    /// - `Domain` with the decider's error, verbatim
    /// - `Store` for storage failures, including sequence conflicts
    ///
    /// Nothing is appended unless every step before the append succeeded.
    #[instrument(skip_all, fields(stream_id = tracing::field::Empty))]
    pub async fn dispatch<S>(
        &self,
        store: &S,
        command: &Command,
        options: DispatchOptions,
    ) -> Result<DecisionResult<Event>, DispatchError<Error>>
    where
        S: EventStore + ?Sized,
    {
        let stream_id = (self.stream_id_of)(command)?;
        Span::current().record("stream_id", stream_id.as_str());

        let (state, last_revision) = self.load(store, &stream_id).await?;

        if self.decider.is_terminal(&state) {
            return Err(DispatchError::StateIsTerminal);
        }

        let events = self
            .decider
            .decide(&state, command)
            .map_err(DispatchError::Domain)?;

        if events.is_empty() {
            debug!(stream_id = %stream_id, "Decision produced no events");
            return Ok(DecisionResult {
                next_expected_version: last_revision.unwrap_or(ExpectedRevision::NO_STREAM_SEQUENCE),
                events,
            });
        }

        let system_metadata = options.system_metadata();
        let mut proposed = Vec::with_capacity(events.len());
        for event in &events {
            let event_type = (self.event_type_of)(event)?;
            let (content_type, data) = (self.marshal)(event)?;
            proposed.push(
                ProposedEvent::new(event_type, content_type, data)
                    .with_metadata(options.user_metadata.clone())
                    .with_system_metadata(system_metadata.clone()),
            );
        }

        let expected_revision = options
            .expected_revision
            .unwrap_or_else(|| ExpectedRevision::from_last_revision(last_revision));

        let written = store
            .append_to_stream(&stream_id, proposed, expected_revision)
            .await?;

        debug!(
            stream_id = %stream_id,
            count = events.len(),
            revision = written.next_expected_version,
            "Decision appended"
        );

        Ok(DecisionResult {
            next_expected_version: written.next_expected_version,
            events,
        })
    }
}

impl<State, Command, Event, Error> Clone for EventSourcingDispatcher<State, Command, Event, Error> {
    fn clone(&self) -> Self {
        Self {
            decider: self.decider,
            stream_id_of: self.stream_id_of,
            marshal: self.marshal,
            unmarshal: self.unmarshal,
            event_type_of: self.event_type_of,
        }
    }
}

impl<State, Command, Event, Error> fmt::Debug for EventSourcingDispatcher<State, Command, Event, Error> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSourcingDispatcher")
            .field("decider", &self.decider)
            .finish_non_exhaustive()
    }
}
