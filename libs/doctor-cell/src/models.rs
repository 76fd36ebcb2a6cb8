use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::DbError;
use shared_models::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub user_id: i64,
    pub specialization: String,
    pub calendar_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Doctor joined with its owning user row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorWithUser {
    pub id: i64,
    pub user_id: i64,
    pub specialization: String,
    pub calendar_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateDoctorRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub specialization: String,
    pub calendar_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDoctorRequest {
    pub specialization: Option<String>,
    pub calendar_id: Option<String>,
    pub is_active: Option<bool>,
}

/// One recurring weekly open-hours window. `day_of_week` is 0 = Monday
/// through 6 = Sunday. Multiple rows per doctor/day are permitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Availability {
    pub id: i64,
    pub doctor_id: i64,
    pub day_of_week: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateAvailabilityRequest {
    pub day_of_week: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    pub date: NaiveDate,
}

/// A bookable fixed-length window within a doctor's working hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeSlot {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<DbError> for DoctorError {
    fn from(err: DbError) -> Self {
        DoctorError::Database(err.to_string())
    }
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound => AppError::NotFound(err.to_string()),
            DoctorError::EmailTaken => AppError::BadRequest(err.to_string()),
            DoctorError::InvalidSchedule(msg) => AppError::BadRequest(msg),
            DoctorError::Database(msg) => AppError::Database(msg),
        }
    }
}
