// Copyright (c) 2025 - Cowboy AI, Inc.
//! NATS connection bootstrap
//!
//! Connections are built once from a [`NatsConfig`] and handed to the event
//! store explicitly; nothing here is process-global.

use async_nats::{Client, ConnectOptions};
use std::time::Duration;
use tracing::info;

use crate::errors::{EventStoreError, EventStoreResult};

/// Environment variable holding the server list
pub const NATS_URL_ENV: &str = "NATS_URL";

/// Configuration for NATS connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NatsConfig {
    /// NATS server URLs
    pub servers: Vec<String>,
    /// Client name
    pub name: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Request timeout
    pub request_timeout: Duration,
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            servers: vec!["nats://localhost:4222".to_string()],
            name: "cim-eventsourcing".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(5),
        }
    }
}

impl NatsConfig {
    /// Read the server list from `NATS_URL`, falling back to the defaults
    pub fn from_env() -> Self {
        Self::default().with_servers_from(std::env::var(NATS_URL_ENV).ok().as_deref())
    }

    /// Replace the server list with a comma separated one, ignoring blanks
    pub fn with_servers_from(mut self, raw: Option<&str>) -> Self {
        let servers: Vec<String> = raw
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|server| !server.is_empty())
            .map(str::to_string)
            .collect();

        if !servers.is_empty() {
            self.servers = servers;
        }
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Connect to NATS
    pub async fn connect(&self) -> EventStoreResult<Client> {
        let connect_options = ConnectOptions::new()
            .name(&self.name)
            .connection_timeout(self.connect_timeout)
            .request_timeout(Some(self.request_timeout));

        let client = async_nats::connect_with_options(self.servers.join(","), connect_options)
            .await
            .map_err(|e| EventStoreError::Transport(e.to_string()))?;

        info!(servers = ?self.servers, "Connected to NATS");

        Ok(client)
    }

    /// Connect and open a JetStream context
    pub async fn jetstream(&self) -> EventStoreResult<async_nats::jetstream::Context> {
        Ok(async_nats::jetstream::new(self.connect().await?))
    }
}
