// Copyright (c) 2025 - Cowboy AI, Inc.
//! Plan commands

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlan {
    pub plan_id: String,
    pub title: String,
    pub color: String,
    /// Goal in minor currency units
    pub goal_amount: u64,
    pub description: String,
    pub icon: String,
    pub created_at: DateTime<Utc>,
    pub deposit_account_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivePlan {
    pub plan_id: String,
    pub archived_by: String,
    pub archived_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlan {
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
pub struct DrainPlan {
    pub plan_id: String,
    pub transfer_id: String,
    pub drained_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailDrainPlan {
    pub plan_id: String,
    pub transfer_id: String,
    pub failed_at: DateTime<Utc>,
}

/// Every command the plan aggregate accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "command")]
pub enum PlanCommand {
    CreatePlan(CreatePlan),
    ArchivePlan(ArchivePlan),
    UpdatePlan(UpdatePlan),
    DrainPlan(DrainPlan),
    FailDrainPlan(FailDrainPlan),
}

impl PlanCommand {
    /// Plan the command targets
    pub fn plan_id(&self) -> &str {
        match self {
            PlanCommand::CreatePlan(c) => &c.plan_id,
            PlanCommand::ArchivePlan(c) => &c.plan_id,
            PlanCommand::UpdatePlan(c) => &c.plan_id,
            PlanCommand::DrainPlan(c) => &c.plan_id,
            PlanCommand::FailDrainPlan(c) => &c.plan_id,
        }
    }
}

impl From<CreatePlan> for PlanCommand {
    fn from(command: CreatePlan) -> Self {
        PlanCommand::CreatePlan(command)
    }
}

impl From<ArchivePlan> for PlanCommand {
    fn from(command: ArchivePlan) -> Self {
        PlanCommand::ArchivePlan(command)
    }
}

impl From<UpdatePlan> for PlanCommand {
    fn from(command: UpdatePlan) -> Self {
        PlanCommand::UpdatePlan(command)
    }
}

impl From<DrainPlan> for PlanCommand {
    fn from(command: DrainPlan) -> Self {
        PlanCommand::DrainPlan(command)
    }
}

impl From<FailDrainPlan> for PlanCommand {
    fn from(command: FailDrainPlan) -> Self {
        PlanCommand::FailDrainPlan(command)
    }
}
