//! Virtual clock and time-ordered event queue.
//!
//! Time is a plain `f64` in simulation units (the clinic scenario uses minutes).
//! Events fire in timestamp order; events with equal timestamps fire in the
//! order they were scheduled, which keeps runs deterministic for a fixed seed.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy_ecs::prelude::{Entity, Resource};

/// Simulation time in model units.
pub type SimTime = f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    /// Starts the arrival generator at time zero.
    SimulationStarted,
    /// Arrival generator wakes up after an inter-arrival timeout.
    PatientArrival,
    /// A freshly spawned patient process takes its first step.
    PatientStarted,
    /// A queued patient has been handed a staff unit by a release.
    StaffGranted,
    /// A patient's service timeout has elapsed.
    ServiceCompleted,
}

/// The process an event resumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSubject {
    Patient(Entity),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub timestamp: SimTime,
    /// Insertion order, used to break timestamp ties.
    pub seq: u64,
    pub kind: EventKind,
    pub subject: Option<EventSubject>,
}

impl Eq for Event {}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap a min-heap by (timestamp, seq).
        other
            .timestamp
            .total_cmp(&self.timestamp)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The event currently being processed by the schedule.
#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

#[derive(Debug, Default, Resource)]
pub struct SimulationClock {
    now: SimTime,
    next_seq: u64,
    events: BinaryHeap<Event>,
}

impl SimulationClock {
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Schedule an event at an absolute timestamp.
    pub fn schedule_at(
        &mut self,
        timestamp: SimTime,
        kind: EventKind,
        subject: Option<EventSubject>,
    ) {
        debug_assert!(
            timestamp >= self.now,
            "event timestamp must be >= current time"
        );
        let event = Event {
            timestamp: timestamp.max(self.now),
            seq: self.next_seq,
            kind,
            subject,
        };
        self.next_seq += 1;
        self.events.push(event);
    }

    /// Schedule an event `delay` time units from now.
    pub fn schedule_in(&mut self, delay: SimTime, kind: EventKind, subject: Option<EventSubject>) {
        debug_assert!(delay >= 0.0, "delay must be non-negative");
        self.schedule_at(self.now + delay.max(0.0), kind, subject);
    }

    /// Pops the earliest event and advances the clock to its timestamp.
    pub fn pop_next(&mut self) -> Option<Event> {
        let event = self.events.pop()?;
        self.now = event.timestamp;
        Some(event)
    }

    pub fn next_event_time(&self) -> Option<SimTime> {
        self.events.peek().map(|e| e.timestamp)
    }

    pub fn pending(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drops every pending event without executing it. Returns how many were dropped.
    pub fn discard_pending(&mut self) -> usize {
        let dropped = self.events.len();
        self.events.clear();
        dropped
    }

    /// Moves the clock forward to `time` without firing anything. Never moves backwards.
    pub fn advance_to(&mut self, time: SimTime) {
        if time > self.now {
            self.now = time;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_pops_events_in_time_order() {
        let mut clock = SimulationClock::default();
        clock.schedule_at(10.0, EventKind::PatientArrival, None);
        clock.schedule_at(5.0, EventKind::PatientArrival, None);
        clock.schedule_at(20.0, EventKind::PatientArrival, None);

        let first = clock.pop_next().expect("first event");
        assert_eq!(first.timestamp, 5.0);
        assert_eq!(clock.now(), 5.0);

        let second = clock.pop_next().expect("second event");
        assert_eq!(second.timestamp, 10.0);
        assert_eq!(clock.now(), 10.0);

        let third = clock.pop_next().expect("third event");
        assert_eq!(third.timestamp, 20.0);
        assert_eq!(clock.now(), 20.0);

        assert!(clock.pop_next().is_none());
        assert!(clock.is_empty());
    }

    #[test]
    fn equal_timestamps_pop_in_scheduling_order() {
        let mut clock = SimulationClock::default();
        clock.schedule_at(3.0, EventKind::ServiceCompleted, None);
        clock.schedule_at(3.0, EventKind::PatientArrival, None);
        clock.schedule_at(3.0, EventKind::StaffGranted, None);

        let kinds: Vec<_> = std::iter::from_fn(|| clock.pop_next())
            .map(|e| e.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::ServiceCompleted,
                EventKind::PatientArrival,
                EventKind::StaffGranted,
            ]
        );
    }

    #[test]
    fn schedule_in_is_relative_to_now() {
        let mut clock = SimulationClock::default();
        clock.schedule_at(4.0, EventKind::PatientArrival, None);
        clock.pop_next();
        clock.schedule_in(2.5, EventKind::ServiceCompleted, None);
        assert_eq!(clock.next_event_time(), Some(6.5));
    }

    #[test]
    fn zero_delay_event_fires_after_earlier_same_time_events() {
        let mut clock = SimulationClock::default();
        clock.schedule_at(1.0, EventKind::PatientArrival, None);
        clock.schedule_at(1.0, EventKind::ServiceCompleted, None);
        clock.pop_next();
        clock.schedule_in(0.0, EventKind::StaffGranted, None);

        assert_eq!(clock.pop_next().map(|e| e.kind), Some(EventKind::ServiceCompleted));
        assert_eq!(clock.pop_next().map(|e| e.kind), Some(EventKind::StaffGranted));
    }

    #[test]
    fn discard_and_advance() {
        let mut clock = SimulationClock::default();
        clock.schedule_at(1.0, EventKind::PatientArrival, None);
        clock.schedule_at(2.0, EventKind::PatientArrival, None);
        assert_eq!(clock.pending(), 2);
        assert_eq!(clock.discard_pending(), 2);
        assert!(clock.is_empty());

        clock.advance_to(7.0);
        assert_eq!(clock.now(), 7.0);
        clock.advance_to(3.0);
        assert_eq!(clock.now(), 7.0);
    }
}
