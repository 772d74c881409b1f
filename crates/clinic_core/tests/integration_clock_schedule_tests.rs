use bevy_ecs::prelude::Entity;
use clinic_core::clock::{EventKind, EventSubject, SimulationClock};

#[test]
fn clock_pops_events_in_time_order() {
    let mut clock = SimulationClock::default();
    clock.schedule_at(20.0, EventKind::PatientArrival, None);
    clock.schedule_at(5.0, EventKind::PatientArrival, None);
    clock.schedule_at(20.0, EventKind::ServiceCompleted, None);
    clock.schedule_at(10.0, EventKind::PatientArrival, None);

    let first = clock.pop_next().expect("first event");
    assert_eq!(first.timestamp, 5.0);
    assert_eq!(clock.now(), 5.0);

    let second = clock.pop_next().expect("second event");
    assert_eq!(second.timestamp, 10.0);
    assert_eq!(clock.now(), 10.0);

    // Equal timestamps pop in scheduling order.
    let third = clock.pop_next().expect("third event");
    assert_eq!(third.timestamp, 20.0);
    assert_eq!(third.kind, EventKind::PatientArrival);
    let fourth = clock.pop_next().expect("fourth event");
    assert_eq!(fourth.timestamp, 20.0);
    assert_eq!(fourth.kind, EventKind::ServiceCompleted);

    assert!(clock.pop_next().is_none());
    assert!(clock.is_empty());
}

#[test]
fn schedule_in_is_relative_to_now() {
    let mut clock = SimulationClock::default();
    clock.schedule_at(4.0, EventKind::PatientArrival, None);
    clock.pop_next().expect("event");

    let subject = EventSubject::Patient(Entity::from_raw(3));
    clock.schedule_in(2.5, EventKind::ServiceCompleted, Some(subject));
    assert_eq!(clock.next_event_time(), Some(6.5));
    let e = clock.pop_next().expect("event");
    assert_eq!(e.subject, Some(subject));
    assert_eq!(clock.now(), 6.5);
}

#[test]
fn zero_delay_events_run_after_same_instant_events_already_queued() {
    let mut clock = SimulationClock::default();
    clock.schedule_at(1.0, EventKind::PatientArrival, None);
    clock.schedule_at(1.0, EventKind::ServiceCompleted, None);
    clock.pop_next().expect("arrival");
    clock.schedule_in(0.0, EventKind::StaffGranted, None);

    assert_eq!(clock.pop_next().expect("e").kind, EventKind::ServiceCompleted);
    assert_eq!(clock.pop_next().expect("e").kind, EventKind::StaffGranted);
    assert_eq!(clock.now(), 1.0);
}

#[test]
fn discard_and_advance_leave_clock_at_horizon() {
    let mut clock = SimulationClock::default();
    clock.schedule_at(250.0, EventKind::PatientArrival, None);
    clock.schedule_at(300.0, EventKind::ServiceCompleted, None);
    assert_eq!(clock.pending(), 2);

    assert_eq!(clock.discard_pending(), 2);
    clock.advance_to(200.0);
    assert!(clock.is_empty());
    assert_eq!(clock.now(), 200.0);

    clock.advance_to(150.0);
    assert_eq!(clock.now(), 200.0);
}
