use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::DbError;
use shared_models::error::AppError;

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub doctor_id: i64,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Optional substring filter applied to condition texts.
    pub condition: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentStats {
    pub total: i64,
    pub completed: i64,
    pub scheduled: i64,
    pub cancelled: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAppointmentCount {
    pub date: NaiveDate,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientCondition {
    pub condition: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorReport {
    pub doctor_id: i64,
    pub doctor_name: String,
    pub report_date: DateTime<Utc>,
    pub appointment_stats: AppointmentStats,
    pub daily_breakdown: Vec<DailyAppointmentCount>,
    pub common_conditions: Vec<PatientCondition>,
    pub summary: String,
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<DbError> for ReportError {
    fn from(err: DbError) -> Self {
        ReportError::Database(err.to_string())
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::DoctorNotFound => AppError::NotFound(err.to_string()),
            ReportError::Database(msg) => AppError::Database(msg),
        }
    }
}
