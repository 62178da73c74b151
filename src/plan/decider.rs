// Copyright (c) 2025 - Cowboy AI, Inc.
//! Plan decider
//!
//! One decider serves every plan command. Lifecycle:
//!
//! ```text
//! (none) ──CreatePlan──► open ──ArchivePlan──► archived ──DrainPlan──► drained
//!                         │ ▲                     │ ▲
//!                         └─┘ UpdatePlan          └─┘ FailDrainPlan
//! ```

use thiserror::Error;

use super::commands::PlanCommand;
use super::events::{PlanArchived, PlanCreated, PlanDrainFailed, PlanDrained, PlanEvent, PlanUpdated};
use crate::decider::Decider;

/// Business rule violations of the plan aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("plan already exists")]
    AlreadyExists,

    #[error("plan not found")]
    NotFound,

    #[error("plan already archived")]
    AlreadyArchived,

    #[error("plan must be archived")]
    NotArchived,

    #[error("plan already drained")]
    AlreadyDrained,
}

/// State rebuilt from a plan stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanState {
    pub plan_id: Option<String>,
    pub is_archived: bool,
    pub is_drained: bool,
}

impl PlanState {
    fn require_existing(&self) -> Result<(), PlanError> {
        match self.plan_id {
            Some(_) => Ok(()),
            None => Err(PlanError::NotFound),
        }
    }

    fn require_drainable(&self) -> Result<(), PlanError> {
        self.require_existing()?;
        if !self.is_archived {
            return Err(PlanError::NotArchived);
        }
        if self.is_drained {
            return Err(PlanError::AlreadyDrained);
        }
        Ok(())
    }
}

pub type PlanDecider = Decider<PlanState, PlanCommand, PlanEvent, PlanError>;

pub fn decide(state: &PlanState, command: &PlanCommand) -> Result<Vec<PlanEvent>, PlanError> {
    let event = match command {
        PlanCommand::CreatePlan(c) => {
            if state.plan_id.is_some() {
                return Err(PlanError::AlreadyExists);
            }
            PlanEvent::PlanCreated(PlanCreated {
                plan_id: c.plan_id.clone(),
                title: c.title.clone(),
                color: c.color.clone(),
                goal_amount: c.goal_amount,
                description: c.description.clone(),
                icon: c.icon.clone(),
                created_at: c.created_at,
                deposit_account_id: c.deposit_account_id.clone(),
            })
        }
        PlanCommand::ArchivePlan(c) => {
            state.require_existing()?;
            if state.is_archived {
                return Err(PlanError::AlreadyArchived);
            }
            PlanEvent::PlanArchived(PlanArchived {
                plan_id: c.plan_id.clone(),
                archived_by: c.archived_by.clone(),
                archived_at: c.archived_at,
            })
        }
        PlanCommand::UpdatePlan(c) => {
            state.require_existing()?;
            if state.is_archived {
                return Err(PlanError::AlreadyArchived);
            }
            PlanEvent::PlanUpdated(PlanUpdated {
                plan_id: c.plan_id.clone(),
                title: c.title.clone(),
                color: c.color.clone(),
                goal_amount: c.goal_amount,
                description: c.description.clone(),
                icon: c.icon.clone(),
                updated_at: c.updated_at,
            })
        }
        PlanCommand::DrainPlan(c) => {
            state.require_drainable()?;
            PlanEvent::PlanDrained(PlanDrained {
                plan_id: c.plan_id.clone(),
                transfer_id: c.transfer_id.clone(),
                drained_at: c.drained_at,
            })
        }
        PlanCommand::FailDrainPlan(c) => {
            state.require_drainable()?;
            PlanEvent::PlanDrainFailed(PlanDrainFailed {
                plan_id: c.plan_id.clone(),
                transfer_id: c.transfer_id.clone(),
                failed_at: c.failed_at,
            })
        }
    };

    Ok(vec![event])
}

/// Updates and failed drains leave the lifecycle state unchanged
pub fn evolve(mut state: PlanState, event: &PlanEvent) -> PlanState {
    match event {
        PlanEvent::PlanCreated(e) => state.plan_id = Some(e.plan_id.clone()),
        PlanEvent::PlanArchived(_) => state.is_archived = true,
        PlanEvent::PlanDrained(_) => state.is_drained = true,
        PlanEvent::PlanUpdated(_) | PlanEvent::PlanDrainFailed(_) => {}
    }
    state
}

pub fn initial_state() -> PlanState {
    PlanState::default()
}

pub fn plan_decider() -> PlanDecider {
    Decider::new(decide, evolve, initial_state)
}
