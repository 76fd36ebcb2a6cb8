use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::DbError;
use shared_models::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub user_id: i64,
    pub date_of_birth: Option<NaiveDate>,
    pub medical_history: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Patient joined with its owning user row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientWithUser {
    pub id: i64,
    pub user_id: i64,
    pub date_of_birth: Option<NaiveDate>,
    pub medical_history: Option<String>,
    pub created_at: DateTime<Utc>,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreatePatientRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub medical_history: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePatientRequest {
    pub date_of_birth: Option<NaiveDate>,
    pub medical_history: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Error, Debug)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<DbError> for PatientError {
    fn from(err: DbError) -> Self {
        PatientError::Database(err.to_string())
    }
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound => AppError::NotFound(err.to_string()),
            PatientError::EmailTaken => AppError::BadRequest(err.to_string()),
            PatientError::Database(msg) => AppError::Database(msg),
        }
    }
}
