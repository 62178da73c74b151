// Copyright (c) 2025 - Cowboy AI, Inc.
//! Plan aggregate
//!
//! A savings plan that is created, optionally updated, archived and finally
//! drained into a deposit account. It exercises the whole dispatch cycle and
//! serves as the reference domain for tests and the demo binary.
//!
//! ```rust
//! use cim_eventsourcing::dispatcher::DispatchOptions;
//! use cim_eventsourcing::event_store::InMemoryEventStore;
//! use cim_eventsourcing::plan::{self, CreatePlan, PlanCommand};
//!
//! # tokio_test::block_on(async {
//! let store = InMemoryEventStore::new();
//! let command = PlanCommand::from(CreatePlan {
//!     plan_id: "42".to_string(),
//!     title: "Vacation".to_string(),
//!     color: "blue".to_string(),
//!     goal_amount: 100_000,
//!     description: String::new(),
//!     icon: "sun".to_string(),
//!     created_at: chrono::Utc::now(),
//!     deposit_account_id: "acc-1".to_string(),
//! });
//!
//! let result = plan::dispatcher()
//!     .dispatch(&store, &command, DispatchOptions::default())
//!     .await
//!     .unwrap();
//! assert_eq!(result.next_expected_version, 1);
//! # });
//! ```

pub mod codec;
pub mod commands;
pub mod decider;
pub mod events;

pub use codec::{dispatcher, PlanDispatcher};
pub use commands::{ArchivePlan, CreatePlan, DrainPlan, FailDrainPlan, PlanCommand, UpdatePlan};
pub use decider::{plan_decider, PlanDecider, PlanError, PlanState};
pub use events::{PlanArchived, PlanCreated, PlanDrainFailed, PlanDrained, PlanEvent, PlanUpdated};

pub const NAMESPACE: &str = "cim";
pub const DOMAIN: &str = "plan";
pub const STREAM: &str = "plan";
pub const VERSION: &str = "v1";
