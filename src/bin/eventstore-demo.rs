// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event Store Demo
//!
//! Provisions a JetStream-backed event store, runs a plan through
//! `CreatePlan` and `ArchivePlan`, then replays the plan stream.
//!
//! Run with: cargo run --bin eventstore-demo
//!
//! Environment:
//! - `NATS_URL` - comma separated server list (default: nats://localhost:4222)
//! - `EVENT_STORE_NAME` - stream name and subject prefix (default: eventstore)
//! - `PLAN_ID` - plan to create (default: a fresh UUID v7)

use anyhow::{Context, Result};
use chrono::Utc;
use cim_eventsourcing::{
    dispatcher::{CorrelationId, DispatchOptions},
    event_store::{EventStore, NatsEventStore},
    jetstream::EventStoreConfig,
    nats::NatsConfig,
    plan::{self, ArchivePlan, CreatePlan, PlanCommand},
};
use tracing::{info, warn};
use uuid::Uuid;

/// Configuration for the demo
#[derive(Debug, Clone)]
struct DemoConfig {
    nats: NatsConfig,
    store: EventStoreConfig,
    plan_id: String,
}

impl DemoConfig {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        let store_name =
            std::env::var("EVENT_STORE_NAME").unwrap_or_else(|_| "eventstore".to_string());
        let plan_id = std::env::var("PLAN_ID").unwrap_or_else(|_| Uuid::now_v7().to_string());

        Self {
            nats: NatsConfig::from_env().with_name("eventstore-demo"),
            store: EventStoreConfig::new(store_name),
            plan_id,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("🚀 Starting event store demo");

    let config = DemoConfig::from_env();
    info!("📋 Configuration loaded:");
    info!("  - NATS servers: {:?}", config.nats.servers);
    info!("  - Event store: {}", config.store.name);
    info!("  - Plan: {}", config.plan_id);

    let jetstream = config
        .nats
        .jetstream()
        .await
        .context("Failed to connect to NATS")?;
    info!("✅ Connected to NATS");

    let store = NatsEventStore::create(jetstream, config.store.clone())
        .await
        .context("Failed to provision event store")?;

    let dispatcher = plan::dispatcher();
    let correlation_id = CorrelationId::default();

    let commands = [
        PlanCommand::from(CreatePlan {
            plan_id: config.plan_id.clone(),
            title: "Vacation".to_string(),
            color: "blue".to_string(),
            goal_amount: 250_000,
            description: "Two weeks by the sea".to_string(),
            icon: "sun".to_string(),
            created_at: Utc::now(),
            deposit_account_id: "demo-account".to_string(),
        }),
        PlanCommand::from(ArchivePlan {
            plan_id: config.plan_id.clone(),
            archived_by: "eventstore-demo".to_string(),
            archived_at: Utc::now(),
        }),
    ];

    for command in &commands {
        let options = DispatchOptions::new().with_correlation_id(correlation_id.clone());

        match dispatcher.dispatch(&store, command, options).await {
            Ok(result) => {
                for event in &result.events {
                    info!(
                        plan_id = %event.plan_id(),
                        event = event.name(),
                        revision = result.next_expected_version,
                        "📝 Event appended"
                    );
                }
            }
            Err(e) if e.domain().is_some() => {
                warn!(plan_id = %command.plan_id(), error = %e, "Command rejected");
            }
            Err(e) => return Err(e).context("Dispatch failed"),
        }
    }

    let stream_id = dispatcher.stream_id_of(&commands[0])?;
    let recorded = store
        .read_stream(&stream_id)
        .await
        .context("Failed to read plan stream")?;

    info!("📖 Stream {} holds {} events:", stream_id, recorded.len());
    for event in &recorded {
        info!(
            "  #{} {} at {} ({})",
            event.event_number,
            event.event_type,
            event.created.to_rfc3339(),
            event
                .system_metadata
                .get("correlation-id")
                .map(String::as_str)
                .unwrap_or("-"),
        );
    }

    let (state, revision) = dispatcher.load(&store, &stream_id).await?;
    info!(
        ?state,
        ?revision,
        terminal = dispatcher.decider().is_terminal(&state),
        "✅ Plan state rebuilt"
    );

    Ok(())
}
