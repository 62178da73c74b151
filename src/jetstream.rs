// Copyright (c) 2025 - Cowboy AI, Inc.

//! JetStream stream provisioning for event stores
//!
//! One event store is one JetStream stream. The stream name doubles as the
//! subject prefix, so a store named `eventstore` captures `eventstore.>` and
//! keeps each event stream on its own subject beneath it.
//!
//! # Example
//!
//! ```rust,no_run
//! use cim_eventsourcing::jetstream::{EventStoreConfig, StorageType};
//!
//! let config = EventStoreConfig::new("eventstore").with_storage(StorageType::Memory);
//! assert_eq!(config.subjects, vec!["eventstore.>"]);
//! ```

use async_nats::jetstream;
use std::time::Duration;

use crate::errors::{EventStoreError, EventStoreResult};
use crate::subjects::SubjectBuilder;

/// Configuration of the JetStream stream backing an event store
///
/// Limits use JetStream's conventions: a zero `max_age` and negative
/// `max_bytes` / `max_messages` mean unlimited.
#[derive(Debug, Clone, PartialEq)]
pub struct EventStoreConfig {
    /// Stream name, also the subject prefix of every event stream
    pub name: String,

    /// Subjects captured by the stream (defaults to `<name>.>`)
    pub subjects: Vec<String>,

    /// Maximum age of events (default: keep forever)
    pub max_age: Duration,

    /// Maximum bytes stored (default: unlimited)
    pub max_bytes: i64,

    /// Maximum number of events stored (default: unlimited)
    pub max_messages: i64,

    pub storage: StorageType,

    /// Number of replicas (for clustered NATS)
    pub replicas: usize,

    pub retention: RetentionPolicy,

    /// Window in which a repeated event id is dropped as a duplicate
    pub duplicate_window: Duration,
}

impl EventStoreConfig {
    /// Default configuration for a store of the given name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            subjects: vec![SubjectBuilder::new(name.as_str()).all()],
            name,
            max_age: Duration::ZERO,
            max_bytes: -1,
            max_messages: -1,
            storage: StorageType::File,
            replicas: 1,
            retention: RetentionPolicy::Limits,
            duplicate_window: Duration::from_secs(2 * 60),
        }
    }

    pub fn with_storage(mut self, storage: StorageType) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn with_replicas(mut self, replicas: usize) -> Self {
        self.replicas = replicas;
        self
    }

    /// Check the stream name is usable as both stream name and subject token
    pub fn validate(&self) -> EventStoreResult<()> {
        if self.name.is_empty()
            || self
                .name
                .chars()
                .any(|c| matches!(c, '.' | '*' | '>' | '/' | '\\') || c.is_whitespace())
        {
            return Err(EventStoreError::Configuration(format!(
                "invalid event store name {:?}",
                self.name
            )));
        }
        if self.subjects.is_empty() {
            return Err(EventStoreError::Configuration(format!(
                "event store {} captures no subjects",
                self.name
            )));
        }
        if self.replicas == 0 {
            return Err(EventStoreError::Configuration(
                "replicas must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Translate into the JetStream stream configuration
    pub fn to_stream_config(&self) -> jetstream::stream::Config {
        jetstream::stream::Config {
            name: self.name.clone(),
            subjects: self.subjects.clone(),
            max_age: self.max_age,
            max_bytes: self.max_bytes,
            max_messages: self.max_messages,
            storage: self.storage.into(),
            num_replicas: self.replicas,
            retention: self.retention.into(),
            duplicate_window: self.duplicate_window,
            ..Default::default()
        }
    }
}

impl Default for EventStoreConfig {
    fn default() -> Self {
        Self::new("eventstore")
    }
}

/// Storage type for JetStream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// File-based storage (persistent across restarts)
    File,
    /// Memory-based storage (faster, but lost on restart)
    Memory,
}

impl From<StorageType> for jetstream::stream::StorageType {
    fn from(storage: StorageType) -> Self {
        match storage {
            StorageType::File => jetstream::stream::StorageType::File,
            StorageType::Memory => jetstream::stream::StorageType::Memory,
        }
    }
}

/// Retention policy for stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionPolicy {
    /// Limits-based retention (based on max_age, max_bytes and max_messages)
    Limits,
    /// Interest-based retention (messages kept while there are consumers)
    Interest,
    /// Work queue retention (messages deleted after acknowledgment)
    WorkQueue,
}

impl From<RetentionPolicy> for jetstream::stream::RetentionPolicy {
    fn from(retention: RetentionPolicy) -> Self {
        match retention {
            RetentionPolicy::Limits => jetstream::stream::RetentionPolicy::Limits,
            RetentionPolicy::Interest => jetstream::stream::RetentionPolicy::Interest,
            RetentionPolicy::WorkQueue => jetstream::stream::RetentionPolicy::WorkQueue,
        }
    }
}
