// Copyright (c) 2025 - Cowboy AI, Inc.
//! MessageType Value Object
//!
//! Canonical identifier for commands and events:
//!
//! ```text
//! <namespace>.<domain>.<stream>.<version>.<name>
//! ```
//!
//! Used both to tag stored events and to route streams.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

/// Number of dot-delimited segments in a canonical message type
pub const SEGMENT_COUNT: usize = 5;

fn allowed_chars() -> &'static Regex {
    static ALLOWED: OnceLock<Regex> = OnceLock::new();
    ALLOWED.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9]+(?:[._][a-zA-Z0-9]+)*$").expect("static message type pattern")
    })
}

/// MessageType validation error
///
/// Both the character check and the segment count fail with this one error
/// kind; `reason` tells them apart.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid message type: {reason}: {value}")]
pub struct MessageTypeInvalid {
    /// The rejected input
    pub value: String,
    /// Which rule was violated
    pub reason: &'static str,
}

/// Validated `<namespace>.<domain>.<stream>.<version>.<name>` identifier
///
/// No normalization is applied; input must already be canonical.
///
/// # Examples
///
/// ```rust
/// use cim_eventsourcing::message_type::MessageType;
///
/// let ty = MessageType::new("acmecorp.banking.bankaccount.v1.AccountOpened").unwrap();
/// assert_eq!(ty.name(), "AccountOpened");
///
/// assert!(MessageType::new("bankaccount.v1.AccountOpened").is_err());
/// assert!(MessageType::new("bankaccount.v1.Account-Opened").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageType(String);

impl MessageType {
    /// Create a new message type with validation
    pub fn new(raw: impl Into<String>) -> Result<Self, MessageTypeInvalid> {
        let raw = raw.into();

        if !allowed_chars().is_match(&raw) {
            return Err(MessageTypeInvalid {
                value: raw,
                reason: "contains invalid characters",
            });
        }

        if raw.split('.').count() != SEGMENT_COUNT {
            return Err(MessageTypeInvalid {
                value: raw,
                reason: "must be exactly <namespace>.<domain>.<stream>.<version>.<name>",
            });
        }

        Ok(Self(raw))
    }

    /// Build from the five segments, validating the joined result
    pub fn from_parts(
        namespace: &str,
        domain: &str,
        stream: &str,
        version: &str,
        name: &str,
    ) -> Result<Self, MessageTypeInvalid> {
        Self::new(format!("{namespace}.{domain}.{stream}.{version}.{name}"))
    }

    /// Get the message type as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn segment(&self, index: usize) -> &str {
        // validated at construction: always SEGMENT_COUNT segments
        self.0.split('.').nth(index).unwrap_or_default()
    }

    /// Owning organization or system, e.g. `cim`
    pub fn namespace(&self) -> &str {
        self.segment(0)
    }

    /// Bounded context, e.g. `plan`
    pub fn domain(&self) -> &str {
        self.segment(1)
    }

    /// Aggregate or stream kind inside the domain
    pub fn stream(&self) -> &str {
        self.segment(2)
    }

    /// Schema version of the event, e.g. `v1`
    pub fn version(&self) -> &str {
        self.segment(3)
    }

    /// Event name, e.g. `PlanCreated`
    pub fn name(&self) -> &str {
        self.segment(4)
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MessageType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for MessageType {
    type Err = MessageTypeInvalid;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for MessageType {
    type Error = MessageTypeInvalid;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for MessageType {
    type Error = MessageTypeInvalid;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MessageType> for String {
    fn from(value: MessageType) -> Self {
        value.0
    }
}
