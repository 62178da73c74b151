// Copyright (c) 2025 - Cowboy AI, Inc.
//! Wire envelope for stored events
//!
//! Each event is one message. Delivery metadata travels in headers, the
//! payload is a small JSON document:
//!
//! ```text
//! Nats-Msg-Id:        <event id>
//! cim-event-type:     <namespace>.<domain>.<stream>.<version>.<name>
//! cim-event-created:  <RFC3339, nanoseconds>
//! cim-content-type:   application/json
//! cim-meta-<key>:     <value>                      (per system metadata entry)
//!
//! {"data": "<base64>", "metadata": "<base64>"}
//! ```
//!
//! Header names and values are parsed the way the client parses a received
//! message. `Nats-Msg-Id` is one of the client's standard headers, so it only
//! matches a parsed name, never a raw `&str` key. Metadata that cannot travel
//! as a header (a `:` or whitespace in a key, a line break in a value) is
//! rejected at encode time.

use async_nats::header::{HeaderName, HeaderValue, NATS_MESSAGE_ID};
use async_nats::HeaderMap;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::{EventStoreError, EventStoreResult};
use crate::event::{ContentType, ProposedEvent, RecordedEvent, SystemMetadata};

/// Broker message id header, also used for deduplication
pub const MESSAGE_ID_HEADER: HeaderName = NATS_MESSAGE_ID;
pub const EVENT_TYPE_HEADER: &str = "cim-event-type";
pub const EVENT_CREATED_HEADER: &str = "cim-event-created";
pub const CONTENT_TYPE_HEADER: &str = "cim-content-type";
pub const METADATA_HEADER_PREFIX: &str = "cim-meta-";

/// Message body: payload and user metadata as base64 strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    #[serde(with = "base64_bytes", default)]
    pub metadata: Vec<u8>,
}

mod base64_bytes {
    use super::*;
    use serde::{de, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        STANDARD.decode(encoded).map_err(de::Error::custom)
    }
}

pub fn format_created(created: DateTime<Utc>) -> String {
    created.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn parse_created(raw: &str) -> EventStoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|created| created.with_timezone(&Utc))
        .map_err(|e| EventStoreError::Decode(format!("failed to parse event time {raw:?}: {e}")))
}

/// Encode a proposed event into headers and body
pub fn encode(event: &ProposedEvent, created: DateTime<Utc>) -> EventStoreResult<(HeaderMap, Vec<u8>)> {
    let payload = serde_json::to_vec(&MessagePayload {
        data: event.data.clone(),
        metadata: event.metadata.clone(),
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(MESSAGE_ID_HEADER, header_value(&event.id.to_string())?);
    insert(&mut headers, EVENT_TYPE_HEADER, event.event_type.as_str())?;
    insert(&mut headers, EVENT_CREATED_HEADER, &format_created(created))?;
    insert(&mut headers, CONTENT_TYPE_HEADER, event.content_type.as_str())?;

    for (key, value) in &event.system_metadata {
        insert(&mut headers, &format!("{METADATA_HEADER_PREFIX}{key}"), value)?;
    }

    Ok((headers, payload))
}

fn header_value(value: &str) -> EventStoreResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| EventStoreError::Serialization(format!("invalid header value {value:?}: {e}")))
}

fn insert(headers: &mut HeaderMap, name: &str, value: &str) -> EventStoreResult<()> {
    let header_name = HeaderName::from_str(name)
        .map_err(|e| EventStoreError::Serialization(format!("invalid header name {name:?}: {e}")))?;
    headers.insert(header_name, header_value(value)?);
    Ok(())
}

fn required(headers: &HeaderMap, name: HeaderName) -> EventStoreResult<&str> {
    headers
        .get(name.clone())
        .map(|value| value.as_str())
        .ok_or_else(|| EventStoreError::Decode(format!("missing header {name}")))
}

fn required_custom<'a>(headers: &'a HeaderMap, name: &str) -> EventStoreResult<&'a str> {
    let header_name = HeaderName::from_str(name)
        .map_err(|e| EventStoreError::Decode(format!("invalid header name {name:?}: {e}")))?;
    required(headers, header_name)
}

/// Decode a stored message into a recorded event
///
/// Any missing header, unparsable timestamp or id, or malformed body is an
/// error; nothing is decoded on a best-effort basis.
pub fn decode(
    stream_id: &str,
    headers: Option<&HeaderMap>,
    payload: &[u8],
    event_number: u64,
) -> EventStoreResult<RecordedEvent> {
    let headers =
        headers.ok_or_else(|| EventStoreError::Decode(format!("message {event_number} has no headers")))?;

    let raw_id = required(headers, MESSAGE_ID_HEADER)?;
    let id = Uuid::parse_str(raw_id)
        .map_err(|e| EventStoreError::Decode(format!("invalid event id {raw_id:?}: {e}")))?;
    let created = parse_created(required_custom(headers, EVENT_CREATED_HEADER)?)?;

    let mut system_metadata = SystemMetadata::new();
    for (name, values) in headers.iter() {
        let name = name.to_string();
        if let Some(key) = name.strip_prefix(METADATA_HEADER_PREFIX) {
            if let Some(value) = values.first() {
                system_metadata.insert(key.to_string(), value.as_str().to_string());
            }
        }
    }

    let body: MessagePayload = serde_json::from_slice(payload)
        .map_err(|e| EventStoreError::Decode(format!("invalid envelope for message {event_number}: {e}")))?;

    Ok(RecordedEvent {
        id,
        event_type: required_custom(headers, EVENT_TYPE_HEADER)?.to_string(),
        content_type: ContentType::from(required_custom(headers, CONTENT_TYPE_HEADER)?),
        stream_id: stream_id.to_string(),
        event_number,
        created,
        system_metadata,
        data: body.data,
        metadata: body.metadata,
    })
}
