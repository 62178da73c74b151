// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for the revision guard
//!
//! Random interleavings of appends across a few streams, checked against a
//! model of what each stream's revision must be.

use proptest::prelude::*;
use std::collections::HashMap;

use cim_eventsourcing::event::{ContentType, ExpectedRevision, ProposedEvent};
use cim_eventsourcing::event_store::{EventStore, InMemoryEventStore};
use cim_eventsourcing::message_type::MessageType;

#[derive(Debug, Clone)]
struct Append {
    stream: usize,
    count: usize,
    guard: Guard,
}

#[derive(Debug, Clone, Copy)]
enum Guard {
    Any,
    NoStream,
    Current,
    Stale,
}

fn append() -> impl Strategy<Value = Append> {
    (
        0usize..3,
        1usize..4,
        prop_oneof![
            Just(Guard::Any),
            Just(Guard::NoStream),
            Just(Guard::Current),
            Just(Guard::Stale),
        ],
    )
        .prop_map(|(stream, count, guard)| Append {
            stream,
            count,
            guard,
        })
}

fn events(count: usize) -> Vec<ProposedEvent> {
    (0..count)
        .map(|_| {
            ProposedEvent::new(
                MessageType::new("cim.test.thing.v1.Happened").unwrap(),
                ContentType::Json,
                b"{}".to_vec(),
            )
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_store_matches_revision_model(appends in prop::collection::vec(append(), 1..30)) {
        let store = InMemoryEventStore::new();
        let mut revisions: HashMap<usize, u64> = HashMap::new();
        let mut last_sequence = 0u64;

        for step in appends {
            let stream_id = format!("thing.{}", step.stream);
            let current = revisions.get(&step.stream).copied();

            let expected = match step.guard {
                Guard::Any => ExpectedRevision::Any,
                Guard::NoStream => ExpectedRevision::NoStream,
                Guard::Current => ExpectedRevision::from_last_revision(current),
                Guard::Stale => ExpectedRevision::StreamRevision(current.unwrap_or(0) + 1_000),
            };
            let should_succeed = expected.is_satisfied_by(current);

            let result = tokio_test::block_on(
                store.append_to_stream(&stream_id, events(step.count), expected),
            );

            match result {
                Ok(written) => {
                    prop_assert!(should_succeed);
                    last_sequence += step.count as u64;
                    prop_assert_eq!(written.next_expected_version, last_sequence);
                    revisions.insert(step.stream, last_sequence);
                }
                Err(err) => {
                    prop_assert!(!should_succeed);
                    prop_assert!(err.is_sequence_conflict());
                }
            }
        }

        for (stream, revision) in revisions {
            let recorded = tokio_test::block_on(store.read_stream(&format!("thing.{}", stream))).unwrap();
            prop_assert_eq!(recorded.last().map(|e| e.event_number), Some(revision));
            prop_assert!(recorded.windows(2).all(|pair| pair[0].event_number < pair[1].event_number));
        }
    }
}
