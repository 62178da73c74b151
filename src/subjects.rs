// Copyright (c) 2025 - Cowboy AI, Inc.

//! NATS subject conventions for event streams
//!
//! # Subject Pattern
//!
//! Every stream lives under the store-wide prefix:
//!
//! ```text
//! <store_name>.<domain>.<entity_id>
//! ```
//!
//! where `<domain>.<entity_id>` is the stream id. This allows for:
//! - Per-stream filtered consumers (`eventstore.plan.42`)
//! - The store-wide capture subject (`eventstore.>`)
//!
//! A stream id is always a literal subject: wildcard tokens would turn a
//! single-stream read into a read of several streams.
//!
//! # Examples
//!
//! ```rust
//! use cim_eventsourcing::subjects::{stream_id, SubjectBuilder};
//!
//! let id = stream_id("plan", "42").unwrap();
//! assert_eq!(id, "plan.42");
//!
//! let subjects = SubjectBuilder::new("eventstore");
//! assert_eq!(subjects.stream(&id).unwrap(), "eventstore.plan.42");
//! assert!(subjects.stream("plan.*").is_err());
//! assert_eq!(subjects.all(), "eventstore.>");
//! ```

use crate::errors::CodecError;

/// Characters NATS reserves inside a subject token
const RESERVED: [char; 3] = ['.', '*', '>'];

fn validate_token(token: &str) -> Result<(), CodecError> {
    if token.is_empty() || token.chars().any(|c| RESERVED.contains(&c) || c.is_whitespace()) {
        return Err(CodecError::InvalidStreamId(token.to_string()));
    }
    Ok(())
}

/// Check that a stream id is a literal subject
///
/// Every `.`-separated token must be non-empty and free of wildcards and
/// whitespace.
pub fn validate_stream_id(stream_id: &str) -> Result<(), CodecError> {
    stream_id
        .split('.')
        .try_for_each(validate_token)
        .map_err(|_| CodecError::InvalidStreamId(stream_id.to_string()))
}

/// Build a stream id `<domain>.<entity_id>`
///
/// Both parts must be single, non-empty subject tokens.
pub fn stream_id(domain: &str, entity_id: &str) -> Result<String, CodecError> {
    validate_token(domain)?;
    validate_token(entity_id)?;
    Ok(format!("{}.{}", domain, entity_id))
}

/// Builder for the subjects of one event store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectBuilder {
    store_name: String,
}

impl SubjectBuilder {
    /// Create a builder rooted at the store name
    pub fn new(store_name: impl Into<String>) -> Self {
        Self {
            store_name: store_name.into(),
        }
    }

    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    /// Subject of a single stream: `<store>.<stream_id>`
    pub fn stream(&self, stream_id: &str) -> Result<String, CodecError> {
        validate_stream_id(stream_id)?;
        Ok(format!("{}.{}", self.store_name, stream_id))
    }

    /// Every stream in the store: `<store>.>`
    pub fn all(&self) -> String {
        format!("{}.>", self.store_name)
    }

    /// Recover the stream id from a full subject
    ///
    /// Returns `None` when the subject is outside this store.
    pub fn stream_id_of<'a>(&self, subject: &'a str) -> Option<&'a str> {
        subject
            .strip_prefix(self.store_name.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
            .filter(|rest| !rest.is_empty())
    }
}
