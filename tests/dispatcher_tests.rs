// Copyright (c) 2025 - Cowboy AI, Inc.
//! Dispatcher Tests
//!
//! Full read-fold-decide-append cycles of the plan aggregate against the
//! in-memory event store.

mod fixtures;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tokio::sync::Barrier;

use cim_eventsourcing::dispatcher::{CorrelationId, DispatchOptions};
use cim_eventsourcing::errors::{DispatchError, EventStoreResult};
use cim_eventsourcing::event::{ExpectedRevision, ProposedEvent, RecordedEvent, WriteResult};
use cim_eventsourcing::event_store::{EventStore, InMemoryEventStore};
use cim_eventsourcing::plan::{self, PlanError, PlanEvent, PlanState};

use fixtures::*;

#[tokio::test]
async fn test_create_then_duplicate() {
    let store = InMemoryEventStore::new();
    let dispatcher = plan::dispatcher();

    let created = dispatcher
        .dispatch(&store, &create_plan(PLAN_ID_1), DispatchOptions::default())
        .await
        .unwrap();
    assert_eq!(created.events.len(), 1);
    assert!(matches!(created.events[0], PlanEvent::PlanCreated(_)));
    assert_eq!(created.next_expected_version, 1);

    let err = dispatcher
        .dispatch(&store, &create_plan(PLAN_ID_1), DispatchOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.domain(), Some(&PlanError::AlreadyExists));
    assert_eq!(err.to_string(), "plan already exists");

    let recorded = store.read_stream(&plan_stream(PLAN_ID_1)).await.unwrap();
    assert_eq!(recorded.len(), 1);
}

#[tokio::test]
async fn test_guarded_transition() {
    let store = InMemoryEventStore::new();
    let dispatcher = plan::dispatcher();

    dispatcher
        .dispatch(&store, &create_plan(PLAN_ID_1), DispatchOptions::default())
        .await
        .unwrap();

    let archived = dispatcher
        .dispatch(&store, &archive_plan(PLAN_ID_1), DispatchOptions::default())
        .await
        .unwrap();
    assert!(matches!(archived.events.as_slice(), [PlanEvent::PlanArchived(_)]));
    assert_eq!(archived.next_expected_version, 2);

    let err = dispatcher
        .dispatch(&store, &archive_plan(PLAN_ID_1), DispatchOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.domain(), Some(&PlanError::AlreadyArchived));

    assert_eq!(store.read_stream(&plan_stream(PLAN_ID_1)).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_full_plan_lifecycle() {
    let store = InMemoryEventStore::new();
    let dispatcher = plan::dispatcher();

    for command in [
        create_plan(PLAN_ID_1),
        update_plan(PLAN_ID_1),
        archive_plan(PLAN_ID_1),
        fail_drain_plan(PLAN_ID_1),
        drain_plan(PLAN_ID_1),
    ] {
        dispatcher
            .dispatch(&store, &command, DispatchOptions::default())
            .await
            .unwrap();
    }

    let (state, revision) = dispatcher.load(&store, &plan_stream(PLAN_ID_1)).await.unwrap();
    assert_eq!(
        state,
        PlanState {
            plan_id: Some(PLAN_ID_1.to_string()),
            is_archived: true,
            is_drained: true,
        }
    );
    assert_eq!(revision, Some(5));

    let err = dispatcher
        .dispatch(&store, &drain_plan(PLAN_ID_1), DispatchOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.domain(), Some(&PlanError::AlreadyDrained));
}

#[tokio::test]
async fn test_commands_on_missing_plan_append_nothing() {
    let store = InMemoryEventStore::new();
    let dispatcher = plan::dispatcher();

    for command in [update_plan(PLAN_ID_1), archive_plan(PLAN_ID_1), drain_plan(PLAN_ID_1)] {
        let err = dispatcher
            .dispatch(&store, &command, DispatchOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.domain(), Some(&PlanError::NotFound));
    }

    assert_eq!(store.last_sequence().await, 0);
}

#[tokio::test]
async fn test_streams_are_independent() {
    let store = InMemoryEventStore::new();
    let dispatcher = plan::dispatcher();

    dispatcher
        .dispatch(&store, &create_plan(PLAN_ID_1), DispatchOptions::default())
        .await
        .unwrap();
    let second = dispatcher
        .dispatch(&store, &create_plan(PLAN_ID_2), DispatchOptions::default())
        .await
        .unwrap();

    // Sequences are store-wide, revisions per stream
    assert_eq!(second.next_expected_version, 2);

    let archived = dispatcher
        .dispatch(&store, &archive_plan(PLAN_ID_1), DispatchOptions::default())
        .await
        .unwrap();
    assert_eq!(archived.next_expected_version, 3);

    let numbers: Vec<u64> = store
        .read_stream(&plan_stream(PLAN_ID_1))
        .await
        .unwrap()
        .iter()
        .map(|e| e.event_number)
        .collect();
    assert_eq!(numbers, vec![1, 3]);
}

/// Store whose reads wait until every racer has read
struct RacingStore {
    inner: InMemoryEventStore,
    barrier: Barrier,
}

#[async_trait]
impl EventStore for RacingStore {
    async fn append_to_stream(
        &self,
        stream_id: &str,
        events: Vec<ProposedEvent>,
        expected_revision: ExpectedRevision,
    ) -> EventStoreResult<WriteResult> {
        self.inner
            .append_to_stream(stream_id, events, expected_revision)
            .await
    }

    async fn read_stream(&self, stream_id: &str) -> EventStoreResult<Vec<RecordedEvent>> {
        let events = self.inner.read_stream(stream_id).await?;
        self.barrier.wait().await;
        Ok(events)
    }
}

#[tokio::test]
async fn test_concurrent_creates_conflict() {
    let store = RacingStore {
        inner: InMemoryEventStore::new(),
        barrier: Barrier::new(2),
    };
    let dispatcher = plan::dispatcher();
    let command = create_plan(PLAN_ID_1);

    let (first, second) = tokio::join!(
        dispatcher.dispatch(&store, &command, DispatchOptions::default()),
        dispatcher.dispatch(&store, &command, DispatchOptions::default()),
    );

    let results = [first, second];
    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    let conflicted = results
        .iter()
        .filter(|r| matches!(r, Err(e) if e.is_sequence_conflict()))
        .count();

    assert_eq!(succeeded, 1);
    assert_eq!(conflicted, 1);
    assert_eq!(store.inner.read_stream(&plan_stream(PLAN_ID_1)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_conflict_loser_can_retry_the_cycle() {
    let store = InMemoryEventStore::new();
    let dispatcher = plan::dispatcher();

    dispatcher
        .dispatch(&store, &create_plan(PLAN_ID_1), DispatchOptions::default())
        .await
        .unwrap();

    // A stale caller-supplied revision loses the race
    let stale = DispatchOptions::new().with_expected_revision(ExpectedRevision::NoStream);
    let err = dispatcher
        .dispatch(&store, &update_plan(PLAN_ID_1), stale)
        .await
        .unwrap_err();
    assert!(err.is_sequence_conflict());
    assert!(matches!(err, DispatchError::Store(_)));

    // Re-running the whole cycle derives the current revision
    let retried = dispatcher
        .dispatch(&store, &update_plan(PLAN_ID_1), DispatchOptions::default())
        .await
        .unwrap();
    assert_eq!(retried.next_expected_version, 2);
}

#[tokio::test]
async fn test_explicit_revision_override() {
    let store = InMemoryEventStore::new();
    let dispatcher = plan::dispatcher();

    dispatcher
        .dispatch(&store, &create_plan(PLAN_ID_1), DispatchOptions::default())
        .await
        .unwrap();

    let exact = DispatchOptions::new().with_expected_revision(ExpectedRevision::StreamRevision(1));
    let result = dispatcher
        .dispatch(&store, &update_plan(PLAN_ID_1), exact)
        .await
        .unwrap();
    assert_eq!(result.next_expected_version, 2);

    let unguarded = DispatchOptions::new().with_expected_revision(ExpectedRevision::Any);
    let result = dispatcher
        .dispatch(&store, &update_plan(PLAN_ID_1), unguarded)
        .await
        .unwrap();
    assert_eq!(result.next_expected_version, 3);
}

#[tokio::test]
async fn test_replay_is_idempotent() {
    let store = InMemoryEventStore::new();
    let dispatcher = plan::dispatcher();

    for command in [create_plan(PLAN_ID_1), update_plan(PLAN_ID_1), archive_plan(PLAN_ID_1)] {
        dispatcher
            .dispatch(&store, &command, DispatchOptions::default())
            .await
            .unwrap();
    }

    let first = store.read_stream(&plan_stream(PLAN_ID_1)).await.unwrap();
    let second = store.read_stream(&plan_stream(PLAN_ID_1)).await.unwrap();
    assert_eq!(first, second);

    let first_state = dispatcher.load(&store, &plan_stream(PLAN_ID_1)).await.unwrap();
    let second_state = dispatcher.load(&store, &plan_stream(PLAN_ID_1)).await.unwrap();
    assert_eq!(first_state, second_state);
}

#[tokio::test]
async fn test_correlation_id_is_recorded() {
    let store = InMemoryEventStore::new();
    let options = DispatchOptions::new().with_correlation_id(CorrelationId::new(CORRELATION_ID_1));

    plan::dispatcher()
        .dispatch(&store, &create_plan(PLAN_ID_1), options)
        .await
        .unwrap();

    let recorded = store.read_stream(&plan_stream(PLAN_ID_1)).await.unwrap();
    assert_eq!(
        recorded[0].system_metadata.get("correlation-id").map(String::as_str),
        Some(CORRELATION_ID_1)
    );
    assert_eq!(recorded[0].event_type, "cim.plan.plan.v1.PlanCreated");
}
