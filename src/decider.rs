// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Functional Decider
//!
//! A decider is the functional core of an aggregate:
//!
//! ```text
//! decide(State, Command) → Result<[Event], Error>
//! evolve(State, Event)   → State
//! initial_state()        → State
//! ```
//!
//! # Pure Functions
//!
//! 1. **Referential Transparency**: same input, same output
//! 2. **No Side Effects**: no I/O, no clock, no randomness
//! 3. **Total Evolution**: `evolve` handles every event it can ever see;
//!    events the aggregate does not care about leave the state unchanged
//!
//! # Fold Pattern
//!
//! State is never stored. It is rebuilt for each decision:
//!
//! ```rust
//! use cim_eventsourcing::decider::Decider;
//!
//! #[derive(Debug, PartialEq)]
//! struct Add(u32);
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("overflow")]
//! struct Overflow;
//!
//! fn decide(state: &u32, command: &Add) -> Result<Vec<u32>, Overflow> {
//!     state.checked_add(command.0).ok_or(Overflow)?;
//!     Ok(vec![command.0])
//! }
//!
//! fn evolve(state: u32, event: &u32) -> u32 {
//!     state + event
//! }
//!
//! let counter = Decider::new(decide, evolve, || 0);
//! let state = counter.fold(&[1, 2, 3]);
//! assert_eq!(state, 6);
//! assert_eq!(counter.decide(&state, &Add(4)).unwrap(), vec![4]);
//! ```
//!
//! One decider may serve several command kinds by taking a sum type as its
//! command; `decide` then stays one exhaustive `match`.

use std::fmt;

/// `decide(state, command)` function pointer
pub type Decide<State, Command, Event, Error> = fn(&State, &Command) -> Result<Vec<Event>, Error>;

/// `evolve(state, event)` function pointer
pub type Evolve<State, Event> = fn(State, &Event) -> State;

/// Initial state constructor
pub type InitialState<State> = fn() -> State;

/// Terminal state predicate
pub type IsTerminal<State> = fn(&State) -> bool;

/// A pure state machine over a `(Command, Event, State)` triple
///
/// Deciders are plain values: they hold only function pointers, carry no
/// state between calls, and are `Copy`.
pub struct Decider<State, Command, Event, Error> {
    decide: Decide<State, Command, Event, Error>,
    evolve: Evolve<State, Event>,
    initial_state: InitialState<State>,
    is_terminal: Option<IsTerminal<State>>,
}

impl<State, Command, Event, Error> Decider<State, Command, Event, Error> {
    /// Create a decider from its pure functions
    pub fn new(
        decide: Decide<State, Command, Event, Error>,
        evolve: Evolve<State, Event>,
        initial_state: InitialState<State>,
    ) -> Self {
        Self {
            decide,
            evolve,
            initial_state,
            is_terminal: None,
        }
    }

    /// Mark states for which no further command may be decided
    pub fn with_terminal(mut self, is_terminal: IsTerminal<State>) -> Self {
        self.is_terminal = Some(is_terminal);
        self
    }

    pub fn initial_state(&self) -> State {
        (self.initial_state)()
    }

    /// Decide which events a command produces against the current state
    pub fn decide(&self, state: &State, command: &Command) -> Result<Vec<Event>, Error> {
        (self.decide)(state, command)
    }

    /// Apply a single event to produce the next state
    pub fn evolve(&self, state: State, event: &Event) -> State {
        (self.evolve)(state, event)
    }

    /// Whether the state accepts no further commands
    ///
    /// Deciders without a terminal predicate never terminate.
    pub fn is_terminal(&self, state: &State) -> bool {
        self.is_terminal.is_some_and(|is_terminal| is_terminal(state))
    }

    /// Fold events over the initial state
    pub fn fold<'a, I>(&self, events: I) -> State
    where
        I: IntoIterator<Item = &'a Event>,
        Event: 'a,
    {
        self.fold_from(self.initial_state(), events)
    }

    /// Fold events over an explicit starting state
    pub fn fold_from<'a, I>(&self, state: State, events: I) -> State
    where
        I: IntoIterator<Item = &'a Event>,
        Event: 'a,
    {
        events
            .into_iter()
            .fold(state, |state, event| self.evolve(state, event))
    }
}

impl<State, Command, Event, Error> Clone for Decider<State, Command, Event, Error> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<State, Command, Event, Error> Copy for Decider<State, Command, Event, Error> {}

impl<State, Command, Event, Error> fmt::Debug for Decider<State, Command, Event, Error> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decider")
            .field("terminal", &self.is_terminal.is_some())
            .finish()
    }
}
