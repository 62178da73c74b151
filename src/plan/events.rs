// Copyright (c) 2025 - Cowboy AI, Inc.
//! Plan events
//!
//! Each variant is stored with its own payload struct as the event body; the
//! variant itself travels as the event type name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanCreated {
    pub plan_id: String,
    pub title: String,
    pub color: String,
    pub goal_amount: u64,
    pub description: String,
    pub icon: String,
    pub created_at: DateTime<Utc>,
    pub deposit_account_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanArchived {
    pub plan_id: String,
    pub archived_by: String,
    pub archived_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanUpdated {
    pub plan_id: String,
    pub title: String,
    pub color: String,
    pub goal_amount: u64,
    pub description: String,
    pub icon: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDrained {
    pub plan_id: String,
    pub transfer_id: String,
    pub drained_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDrainFailed {
    pub plan_id: String,
    pub transfer_id: String,
    pub failed_at: DateTime<Utc>,
}

/// Every event the plan aggregate emits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanEvent {
    PlanCreated(PlanCreated),
    PlanArchived(PlanArchived),
    PlanUpdated(PlanUpdated),
    PlanDrained(PlanDrained),
    PlanDrainFailed(PlanDrainFailed),
}

impl PlanEvent {
    /// Event name, the last segment of its message type
    pub fn name(&self) -> &'static str {
        match self {
            PlanEvent::PlanCreated(_) => "PlanCreated",
            PlanEvent::PlanArchived(_) => "PlanArchived",
            PlanEvent::PlanUpdated(_) => "PlanUpdated",
            PlanEvent::PlanDrained(_) => "PlanDrained",
            PlanEvent::PlanDrainFailed(_) => "PlanDrainFailed",
        }
    }

    pub fn plan_id(&self) -> &str {
        match self {
            PlanEvent::PlanCreated(e) => &e.plan_id,
            PlanEvent::PlanArchived(e) => &e.plan_id,
            PlanEvent::PlanUpdated(e) => &e.plan_id,
            PlanEvent::PlanDrained(e) => &e.plan_id,
            PlanEvent::PlanDrainFailed(e) => &e.plan_id,
        }
    }
}
