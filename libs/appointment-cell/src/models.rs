use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::DbError;
use shared_models::error::AppError;

/// Appointment lifecycle. `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub doctor_id: i64,
    pub patient_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub reason: Option<String>,
    pub symptoms: Option<String>,
    pub diagnosis: Option<String>,
    pub calendar_event_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Appointment with doctor and patient display names for list/detail views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentWithDetails {
    pub id: i64,
    pub doctor_id: i64,
    pub patient_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub reason: Option<String>,
    pub symptoms: Option<String>,
    pub diagnosis: Option<String>,
    pub calendar_event_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub doctor_name: String,
    pub patient_name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateAppointmentRequest {
    pub doctor_id: i64,
    pub patient_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub reason: Option<String>,
    pub symptoms: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CompleteAppointmentRequest {
    pub diagnosis: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AppointmentQuery {
    pub doctor_id: Option<i64>,
    pub patient_id: Option<i64>,
    pub status: Option<AppointmentStatus>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

/// Contact details the post-booking notifications need.
#[derive(Debug, Clone)]
pub struct BookingContacts {
    pub doctor_name: String,
    pub doctor_calendar_id: Option<String>,
    pub patient_name: String,
    pub patient_email: String,
}

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    #[error("The requested slot is no longer available")]
    SlotUnavailable,

    #[error("Invalid state transition: {0}")]
    ConflictingState(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<DbError> for AppointmentError {
    fn from(err: DbError) -> Self {
        match err {
            // The store rejects racing inserts that violate its exclusion
            // constraint with 409; surface that as a lost slot.
            DbError::Conflict(_) => AppointmentError::SlotUnavailable,
            other => AppointmentError::Database(other.to_string()),
        }
    }
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound
            | AppointmentError::DoctorNotFound
            | AppointmentError::PatientNotFound => AppError::NotFound(err.to_string()),
            AppointmentError::InvalidInterval(msg) => AppError::BadRequest(msg),
            AppointmentError::SlotUnavailable => AppError::Conflict(err.to_string()),
            AppointmentError::ConflictingState(msg) => AppError::Conflict(msg),
            AppointmentError::Database(msg) => AppError::Database(msg),
        }
    }
}
