// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cim-eventsourcing
//!
//! Deterministic plan commands for dispatcher and store tests. All ids and
//! timestamps are fixed constants so that runs are reproducible.
#![allow(dead_code)]

use chrono::{DateTime, Utc};

use cim_eventsourcing::plan::{
    ArchivePlan, CreatePlan, DrainPlan, FailDrainPlan, PlanCommand, UpdatePlan,
};

// Fixed plan ids (UUID v7 format, but deterministic for testing)
pub const PLAN_ID_1: &str = "01934f4a-1000-7000-8000-000000001000";
pub const PLAN_ID_2: &str = "01934f4a-2000-7000-8000-000000002000";

pub const TRANSFER_ID_1: &str = "01934f4a-7001-7000-8000-000000007001";

pub const CORRELATION_ID_1: &str = "01934f4a-c001-7000-8000-00000000c001";

// Fixed test timestamp (2026-01-19T12:00:00Z)
pub const FIXED_TIMESTAMP: &str = "2026-01-19T12:00:00Z";

/// Parse the fixed timestamp
pub fn fixed_timestamp() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(FIXED_TIMESTAMP)
        .expect("Invalid timestamp in test fixture")
        .with_timezone(&Utc)
}

/// Stream id of a plan
pub fn plan_stream(plan_id: &str) -> String {
    format!("plan.{}", plan_id)
}

pub fn create_plan(plan_id: &str) -> PlanCommand {
    CreatePlan {
        plan_id: plan_id.to_string(),
        title: "Emergency fund".to_string(),
        color: "teal".to_string(),
        goal_amount: 500_000,
        description: "Six months of expenses".to_string(),
        icon: "umbrella".to_string(),
        created_at: fixed_timestamp(),
        deposit_account_id: "acc-0001".to_string(),
    }
    .into()
}

pub fn update_plan(plan_id: &str) -> PlanCommand {
    UpdatePlan {
        plan_id: plan_id.to_string(),
        title: "Rainy day fund".to_string(),
        color: "grey".to_string(),
        goal_amount: 300_000,
        description: "Three months of expenses".to_string(),
        icon: "cloud".to_string(),
        updated_at: fixed_timestamp(),
    }
    .into()
}

pub fn archive_plan(plan_id: &str) -> PlanCommand {
    ArchivePlan {
        plan_id: plan_id.to_string(),
        archived_by: "alice".to_string(),
        archived_at: fixed_timestamp(),
    }
    .into()
}

pub fn drain_plan(plan_id: &str) -> PlanCommand {
    DrainPlan {
        plan_id: plan_id.to_string(),
        transfer_id: TRANSFER_ID_1.to_string(),
        drained_at: fixed_timestamp(),
    }
    .into()
}

pub fn fail_drain_plan(plan_id: &str) -> PlanCommand {
    FailDrainPlan {
        plan_id: plan_id.to_string(),
        transfer_id: TRANSFER_ID_1.to_string(),
        failed_at: fixed_timestamp(),
    }
    .into()
}
