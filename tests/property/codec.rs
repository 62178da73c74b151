// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Event Encoding
//!
//! What the dispatcher writes must decode back to the same event, both at
//! the payload level and through a store.

use proptest::prelude::*;

use cim_eventsourcing::event::{ExpectedRevision, ProposedEvent};
use cim_eventsourcing::event_store::{EventStore, InMemoryEventStore};
use cim_eventsourcing::plan::codec::{event_type_of, marshal, unmarshal};

use super::plan_event;

proptest! {
    #[test]
    fn prop_unmarshal_inverts_marshal(event in plan_event()) {
        let event_type = event_type_of(&event).unwrap();
        let (_, data) = marshal(&event).unwrap();

        prop_assert_eq!(unmarshal(event_type.as_str(), &data).unwrap(), event);
    }

    #[test]
    fn prop_events_survive_the_store(events in prop::collection::vec(plan_event(), 1..10)) {
        let store = InMemoryEventStore::new();

        let proposed: Vec<ProposedEvent> = events
            .iter()
            .map(|event| {
                let (content_type, data) = marshal(event).unwrap();
                ProposedEvent::new(event_type_of(event).unwrap(), content_type, data)
            })
            .collect();

        let recorded = tokio_test::block_on(async {
            store
                .append_to_stream("plan.any", proposed, ExpectedRevision::NoStream)
                .await
                .unwrap();
            store.read_stream("plan.any").await.unwrap()
        });

        let decoded: Vec<_> = recorded
            .iter()
            .map(|r| unmarshal(&r.event_type, &r.data).unwrap())
            .collect();
        prop_assert_eq!(decoded, events);
    }
}
