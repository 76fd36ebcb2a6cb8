use assert_matches::assert_matches;

use appointment_cell::models::{AppointmentError, AppointmentStatus};
use appointment_cell::services::lifecycle::transition;

#[test]
fn test_scheduled_can_complete() {
    let next = transition(AppointmentStatus::Scheduled, AppointmentStatus::Completed).unwrap();
    assert_eq!(next, AppointmentStatus::Completed);
}

#[test]
fn test_scheduled_can_cancel() {
    let next = transition(AppointmentStatus::Scheduled, AppointmentStatus::Cancelled).unwrap();
    assert_eq!(next, AppointmentStatus::Cancelled);
}

#[test]
fn test_cancel_is_not_idempotent() {
    let result = transition(AppointmentStatus::Cancelled, AppointmentStatus::Cancelled);
    assert_matches!(result, Err(AppointmentError::ConflictingState(_)));
}

#[test]
fn test_completed_cannot_be_cancelled() {
    let result = transition(AppointmentStatus::Completed, AppointmentStatus::Cancelled);
    assert_matches!(result, Err(AppointmentError::ConflictingState(_)));
}

#[test]
fn test_cancelled_cannot_be_completed() {
    let result = transition(AppointmentStatus::Cancelled, AppointmentStatus::Completed);
    assert_matches!(result, Err(AppointmentError::ConflictingState(_)));
}

#[test]
fn test_terminal_states_accept_nothing() {
    for terminal in [AppointmentStatus::Completed, AppointmentStatus::Cancelled] {
        assert!(terminal.is_terminal());
        for target in [
            AppointmentStatus::Scheduled,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
        ] {
            assert_matches!(
                transition(terminal, target),
                Err(AppointmentError::ConflictingState(_))
            );
        }
    }
}
