// Copyright (c) 2025 - Cowboy AI, Inc.
//! Routing and wire encoding of plan messages
//!
//! - stream id: `plan.<plan_id>`
//! - event type: `cim.plan.plan.v1.<EventName>`
//! - payload: the event struct as JSON

use serde::de::DeserializeOwned;

use super::commands::PlanCommand;
use super::decider::{plan_decider, PlanError, PlanState};
use super::events::PlanEvent;
use super::{DOMAIN, NAMESPACE, STREAM, VERSION};
use crate::dispatcher::EventSourcingDispatcher;
use crate::errors::CodecError;
use crate::event::ContentType;
use crate::message_type::MessageType;
use crate::subjects;

pub type PlanDispatcher = EventSourcingDispatcher<PlanState, PlanCommand, PlanEvent, PlanError>;

pub fn stream_id_of(command: &PlanCommand) -> Result<String, CodecError> {
    subjects::stream_id(DOMAIN, command.plan_id())
}

pub fn event_type_of(event: &PlanEvent) -> Result<MessageType, CodecError> {
    Ok(MessageType::from_parts(NAMESPACE, DOMAIN, STREAM, VERSION, event.name())?)
}

pub fn marshal(event: &PlanEvent) -> Result<(ContentType, Vec<u8>), CodecError> {
    let data = match event {
        PlanEvent::PlanCreated(e) => serde_json::to_vec(e)?,
        PlanEvent::PlanArchived(e) => serde_json::to_vec(e)?,
        PlanEvent::PlanUpdated(e) => serde_json::to_vec(e)?,
        PlanEvent::PlanDrained(e) => serde_json::to_vec(e)?,
        PlanEvent::PlanDrainFailed(e) => serde_json::to_vec(e)?,
    };
    Ok((ContentType::Json, data))
}

fn payload<T: DeserializeOwned>(data: &[u8]) -> Result<T, CodecError> {
    Ok(serde_json::from_slice(data)?)
}

pub fn unmarshal(event_type: &str, data: &[u8]) -> Result<PlanEvent, CodecError> {
    let unknown = || CodecError::UnknownEvent(event_type.to_string());

    let message_type = MessageType::new(event_type).map_err(|_| unknown())?;
    if message_type.namespace() != NAMESPACE
        || message_type.domain() != DOMAIN
        || message_type.stream() != STREAM
        || message_type.version() != VERSION
    {
        return Err(unknown());
    }

    match message_type.name() {
        "PlanCreated" => payload(data).map(PlanEvent::PlanCreated),
        "PlanArchived" => payload(data).map(PlanEvent::PlanArchived),
        "PlanUpdated" => payload(data).map(PlanEvent::PlanUpdated),
        "PlanDrained" => payload(data).map(PlanEvent::PlanDrained),
        "PlanDrainFailed" => payload(data).map(PlanEvent::PlanDrainFailed),
        _ => Err(unknown()),
    }
}

/// Dispatcher for plan commands
pub fn dispatcher() -> PlanDispatcher {
    EventSourcingDispatcher::new(plan_decider(), stream_id_of, marshal, unmarshal, event_type_of)
}
