use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use tracing::debug;

use shared_models::error::AppError;

use crate::models::{
    Availability, CreateAvailabilityRequest, CreateDoctorRequest, Doctor, DoctorWithUser,
    FreeSlot, SlotQuery, UpdateDoctorRequest,
};
use crate::services::availability::AvailabilityService;
use crate::services::doctor::DoctorService;

pub struct DoctorCellState {
    pub doctors: DoctorService,
    pub availability: AvailabilityService,
}

pub async fn create_doctor(
    State(state): State<Arc<DoctorCellState>>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<(StatusCode, Json<Doctor>), AppError> {
    let doctor = state.doctors.create_doctor(request).await?;
    Ok((StatusCode::CREATED, Json(doctor)))
}

pub async fn list_doctors(
    State(state): State<Arc<DoctorCellState>>,
) -> Result<Json<Vec<DoctorWithUser>>, AppError> {
    let doctors = state.doctors.list_doctors().await?;
    Ok(Json(doctors))
}

pub async fn get_doctor(
    State(state): State<Arc<DoctorCellState>>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<DoctorWithUser>, AppError> {
    let doctor = state.doctors.get_doctor(doctor_id).await?;
    Ok(Json(doctor))
}

pub async fn update_doctor(
    State(state): State<Arc<DoctorCellState>>,
    Path(doctor_id): Path<i64>,
    Json(request): Json<UpdateDoctorRequest>,
) -> Result<Json<DoctorWithUser>, AppError> {
    let doctor = state.doctors.update_doctor(doctor_id, request).await?;
    Ok(Json(doctor))
}

pub async fn get_availability(
    State(state): State<Arc<DoctorCellState>>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Vec<Availability>>, AppError> {
    // 404 for a doctor that does not exist rather than an empty schedule
    state.doctors.get_doctor(doctor_id).await?;

    let availability = state.availability.get_doctor_availability(doctor_id).await?;
    Ok(Json(availability))
}

pub async fn create_availability(
    State(state): State<Arc<DoctorCellState>>,
    Path(doctor_id): Path<i64>,
    Json(request): Json<CreateAvailabilityRequest>,
) -> Result<(StatusCode, Json<Availability>), AppError> {
    state.doctors.get_doctor(doctor_id).await?;

    let availability = state
        .availability
        .create_availability(doctor_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(availability)))
}

pub async fn delete_availability(
    State(state): State<Arc<DoctorCellState>>,
    Path((doctor_id, availability_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    state.doctors.get_doctor(doctor_id).await?;

    state.availability.delete_availability(availability_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_free_slots(
    State(state): State<Arc<DoctorCellState>>,
    Path(doctor_id): Path<i64>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<Vec<FreeSlot>>, AppError> {
    debug!("Free slot query for doctor {} on {}", doctor_id, query.date);
    state.doctors.get_doctor(doctor_id).await?;

    let slots = state
        .availability
        .free_slots_for_date(doctor_id, query.date)
        .await?;
    Ok(Json(slots))
}
