use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use tracing::warn;

use notification_cell::models::AppointmentNotice;
use notification_cell::services::calendar::CalendarService;
use notification_cell::services::email::EmailService;
use shared_models::error::AppError;

use crate::models::{
    Appointment, AppointmentQuery, AppointmentWithDetails, CompleteAppointmentRequest,
    CreateAppointmentRequest,
};
use crate::services::booking::BookingService;

pub struct AppointmentCellState {
    pub booking: BookingService,
    pub calendar: CalendarService,
    pub email: EmailService,
}

pub async fn create_appointment(
    State(state): State<Arc<AppointmentCellState>>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let mut appointment = state.booking.create_appointment(request).await?;

    // Calendar event and confirmation email are best effort; the booking
    // stands even when both collaborators are down.
    match state
        .booking
        .booking_contacts(appointment.doctor_id, appointment.patient_id)
        .await
    {
        Ok(contacts) => {
            let notice = AppointmentNotice {
                appointment_id: appointment.id,
                patient_name: contacts.patient_name.clone(),
                patient_email: contacts.patient_email.clone(),
                doctor_name: contacts.doctor_name.clone(),
                start_time: appointment.start_time,
                end_time: appointment.end_time,
                reason: appointment.reason.clone(),
            };

            let event_id = state
                .calendar
                .create_event(
                    contacts.doctor_calendar_id.as_deref(),
                    &format!("Appointment with {}", contacts.patient_name),
                    notice.reason.as_deref().unwrap_or(""),
                    appointment.start_time,
                    appointment.end_time,
                )
                .await;

            if let Some(event_id) = event_id {
                match state.booking.set_calendar_event(appointment.id, &event_id).await {
                    Ok(()) => appointment.calendar_event_id = Some(event_id),
                    Err(e) => warn!(
                        "Failed to record calendar event for appointment {}: {}",
                        appointment.id, e
                    ),
                }
            }

            state.email.send_appointment_confirmation(&notice).await;
        }
        Err(e) => warn!(
            "Skipping notifications for appointment {}: {}",
            appointment.id, e
        ),
    }

    Ok((StatusCode::CREATED, Json(appointment)))
}

pub async fn list_appointments(
    State(state): State<Arc<AppointmentCellState>>,
    Query(query): Query<AppointmentQuery>,
) -> Result<Json<Vec<AppointmentWithDetails>>, AppError> {
    let appointments = state.booking.list_appointments(query).await?;
    Ok(Json(appointments))
}

pub async fn get_appointment(
    State(state): State<Arc<AppointmentCellState>>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<AppointmentWithDetails>, AppError> {
    let appointment = state.booking.get_appointment(appointment_id).await?;
    Ok(Json(appointment))
}

pub async fn cancel_appointment(
    State(state): State<Arc<AppointmentCellState>>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = state.booking.cancel_appointment(appointment_id).await?;
    Ok(Json(appointment))
}

pub async fn complete_appointment(
    State(state): State<Arc<AppointmentCellState>>,
    Path(appointment_id): Path<i64>,
    request: Option<Json<CompleteAppointmentRequest>>,
) -> Result<Json<Appointment>, AppError> {
    let diagnosis = request.and_then(|Json(body)| body.diagnosis);
    let appointment = state
        .booking
        .complete_appointment(appointment_id, diagnosis)
        .await?;
    Ok(Json(appointment))
}
