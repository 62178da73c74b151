// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Replay
//!
//! State is never stored, only rebuilt by folding `evolve`. These properties
//! make that rebuild trustworthy.

use proptest::prelude::*;

use cim_eventsourcing::plan::{plan_decider, PlanEvent, PlanState};

use super::plan_event;

proptest! {
    /// Evolving the same state with the same event twice gives the same state
    #[test]
    fn prop_evolve_is_deterministic(
        history in prop::collection::vec(plan_event(), 0..20),
        event in plan_event(),
    ) {
        let decider = plan_decider();
        let state = decider.fold(&history);

        let once = decider.evolve(state.clone(), &event);
        let twice = decider.evolve(state, &event);
        prop_assert_eq!(once, twice);
    }

    /// Folding a history twice gives the same state
    #[test]
    fn prop_replay_is_deterministic(history in prop::collection::vec(plan_event(), 0..50)) {
        let decider = plan_decider();
        prop_assert_eq!(decider.fold(&history), decider.fold(&history));
    }

    /// Folding in two halves equals folding the whole history
    #[test]
    fn prop_fold_is_compositional(
        history in prop::collection::vec(plan_event(), 0..50),
        split in any::<prop::sample::Index>(),
    ) {
        let decider = plan_decider();
        let at = split.index(history.len() + 1);
        let (head, tail) = history.split_at(at);

        let stepwise = decider.fold_from(decider.fold(head), tail);
        prop_assert_eq!(stepwise, decider.fold(&history));
    }

    /// Events that do not move the lifecycle leave the state unchanged
    #[test]
    fn prop_updates_and_failed_drains_are_identity(
        history in prop::collection::vec(plan_event(), 0..20),
        event in plan_event(),
    ) {
        prop_assume!(matches!(event, PlanEvent::PlanUpdated(_) | PlanEvent::PlanDrainFailed(_)));

        let decider = plan_decider();
        let state: PlanState = decider.fold(&history);
        prop_assert_eq!(decider.evolve(state.clone(), &event), state);
    }

    /// Lifecycle flags only ever switch on
    #[test]
    fn prop_lifecycle_flags_are_monotonic(history in prop::collection::vec(plan_event(), 0..50)) {
        let decider = plan_decider();
        let mut state = decider.initial_state();

        for event in &history {
            let next = decider.evolve(state.clone(), event);
            prop_assert!(next.is_archived || !state.is_archived);
            prop_assert!(next.is_drained || !state.is_drained);
            prop_assert!(next.plan_id.is_some() || state.plan_id.is_none());
            state = next;
        }
    }
}
