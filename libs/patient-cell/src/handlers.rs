use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};

use shared_models::error::AppError;

use crate::models::{CreatePatientRequest, Patient, PatientWithUser, UpdatePatientRequest};
use crate::services::patient::PatientService;

pub struct PatientCellState {
    pub patients: PatientService,
}

pub async fn create_patient(
    State(state): State<Arc<PatientCellState>>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<Patient>), AppError> {
    let patient = state.patients.create_patient(request).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

pub async fn list_patients(
    State(state): State<Arc<PatientCellState>>,
) -> Result<Json<Vec<PatientWithUser>>, AppError> {
    let patients = state.patients.list_patients().await?;
    Ok(Json(patients))
}

pub async fn get_patient(
    State(state): State<Arc<PatientCellState>>,
    Path(patient_id): Path<i64>,
) -> Result<Json<PatientWithUser>, AppError> {
    let patient = state.patients.get_patient(patient_id).await?;
    Ok(Json(patient))
}

pub async fn update_patient(
    State(state): State<Arc<PatientCellState>>,
    Path(patient_id): Path<i64>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<PatientWithUser>, AppError> {
    let patient = state.patients.update_patient(patient_id, request).await?;
    Ok(Json(patient))
}
