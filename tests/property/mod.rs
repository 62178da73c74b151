// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! Shared strategies for the property suites below.

mod codec;
mod message_type;
mod replay;
mod revision;

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;

use cim_eventsourcing::plan::{
    PlanArchived, PlanCreated, PlanDrainFailed, PlanDrained, PlanEvent, PlanUpdated,
};

/// Timestamps between 1970 and 2096 with nanosecond precision
pub fn timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_000_000_000, 0u32..1_000_000_000)
        .prop_map(|(secs, nanos)| Utc.timestamp_opt(secs, nanos).unwrap())
}

pub fn plan_id() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,12}"
}

/// Arbitrary plan events, free text included
pub fn plan_event() -> impl Strategy<Value = PlanEvent> {
    prop_oneof![
        (
            plan_id(),
            any::<String>(),
            any::<String>(),
            any::<u64>(),
            any::<String>(),
            any::<String>(),
            timestamp(),
            any::<String>(),
        )
            .prop_map(
                |(plan_id, title, color, goal_amount, description, icon, created_at, account)| {
                    PlanEvent::PlanCreated(PlanCreated {
                        plan_id,
                        title,
                        color,
                        goal_amount,
                        description,
                        icon,
                        created_at,
                        deposit_account_id: account,
                    })
                }
            ),
        (plan_id(), any::<String>(), timestamp()).prop_map(|(plan_id, archived_by, archived_at)| {
            PlanEvent::PlanArchived(PlanArchived {
                plan_id,
                archived_by,
                archived_at,
            })
        }),
        (
            plan_id(),
            any::<String>(),
            any::<String>(),
            any::<u64>(),
            any::<String>(),
            any::<String>(),
            timestamp(),
        )
            .prop_map(
                |(plan_id, title, color, goal_amount, description, icon, updated_at)| {
                    PlanEvent::PlanUpdated(PlanUpdated {
                        plan_id,
                        title,
                        color,
                        goal_amount,
                        description,
                        icon,
                        updated_at,
                    })
                }
            ),
        (plan_id(), any::<String>(), timestamp()).prop_map(|(plan_id, transfer_id, drained_at)| {
            PlanEvent::PlanDrained(PlanDrained {
                plan_id,
                transfer_id,
                drained_at,
            })
        }),
        (plan_id(), any::<String>(), timestamp()).prop_map(|(plan_id, transfer_id, failed_at)| {
            PlanEvent::PlanDrainFailed(PlanDrainFailed {
                plan_id,
                transfer_id,
                failed_at,
            })
        }),
    ]
}
