use crate::models::{AppointmentError, AppointmentStatus};

/// Validate a status transition. The only legal moves are
/// `scheduled -> completed` and `scheduled -> cancelled`; terminal states
/// accept nothing, so cancelling twice fails rather than succeeding silently.
pub fn transition(
    current: AppointmentStatus,
    target: AppointmentStatus,
) -> Result<AppointmentStatus, AppointmentError> {
    match (current, target) {
        (AppointmentStatus::Scheduled, AppointmentStatus::Completed)
        | (AppointmentStatus::Scheduled, AppointmentStatus::Cancelled) => Ok(target),
        _ => Err(AppointmentError::ConflictingState(format!(
            "Cannot move appointment from {} to {}",
            current.as_str(),
            target.as_str()
        ))),
    }
}
