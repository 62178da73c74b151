// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for MessageType validation

use proptest::prelude::*;

use cim_eventsourcing::message_type::MessageType;

fn segment() -> impl Strategy<Value = String> {
    "[A-Za-z0-9]{1,8}(_[A-Za-z0-9]{1,8}){0,2}"
}

proptest! {
    /// Any five well-formed segments make a message type
    #[test]
    fn prop_five_segments_are_accepted(parts in prop::collection::vec(segment(), 5)) {
        let raw = parts.join(".");
        let message_type = MessageType::new(raw.clone()).unwrap();

        prop_assert_eq!(message_type.as_str(), raw.as_str());
        prop_assert_eq!(message_type.namespace(), parts[0].as_str());
        prop_assert_eq!(message_type.name(), parts[4].as_str());
    }

    /// Any other segment count is rejected
    #[test]
    fn prop_other_segment_counts_are_rejected(
        parts in prop::collection::vec(segment(), 1..10),
    ) {
        prop_assume!(parts.len() != 5);
        prop_assert!(MessageType::new(parts.join(".")).is_err());
    }

    /// A character outside the alphabet anywhere is rejected
    #[test]
    fn prop_illegal_characters_are_rejected(
        parts in prop::collection::vec(segment(), 5),
        bad in prop::sample::select(vec!['-', ' ', '*', '>', '/', '#', 'é']),
        at in any::<prop::sample::Index>(),
    ) {
        let mut raw: Vec<char> = parts.join(".").chars().collect();
        let position = at.index(raw.len() + 1);
        raw.insert(position, bad);

        let raw: String = raw.into_iter().collect();
        prop_assert!(MessageType::new(raw).is_err());
    }
}
