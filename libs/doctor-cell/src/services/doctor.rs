use std::sync::Arc;

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use auth_cell::services::password::PasswordService;
use shared_database::SupabaseClient;

use crate::models::{CreateDoctorRequest, Doctor, DoctorError, DoctorWithUser, UpdateDoctorRequest};

/// A doctor row with its user embedded via PostgREST resource embedding.
#[derive(Debug, Deserialize)]
struct DoctorUserRow {
    id: i64,
    user_id: i64,
    specialization: String,
    calendar_id: Option<String>,
    created_at: DateTime<Utc>,
    users: EmbeddedUser,
}

#[derive(Debug, Deserialize)]
struct EmbeddedUser {
    email: String,
    full_name: String,
    is_active: bool,
}

impl From<DoctorUserRow> for DoctorWithUser {
    fn from(row: DoctorUserRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            specialization: row.specialization,
            calendar_id: row.calendar_id,
            created_at: row.created_at,
            email: row.users.email,
            full_name: row.users.full_name,
            is_active: row.users.is_active,
        }
    }
}

pub struct DoctorService {
    db: Arc<SupabaseClient>,
}

impl DoctorService {
    pub fn new(db: Arc<SupabaseClient>) -> Self {
        Self { db }
    }

    /// Register a doctor: a user account with role `doctor` plus the doctor
    /// profile row pointing at it.
    pub async fn create_doctor(
        &self,
        request: CreateDoctorRequest,
    ) -> Result<Doctor, DoctorError> {
        debug!("Creating doctor account for {}", request.email);

        if self.email_exists(&request.email).await? {
            return Err(DoctorError::EmailTaken);
        }

        let hashed_password = PasswordService::hash_password(&request.password)
            .map_err(|e| DoctorError::Database(e.to_string()))?;

        let user_rows: Vec<Value> = self
            .db
            .insert(
                "users",
                json!({
                    "email": request.email,
                    "hashed_password": hashed_password,
                    "full_name": request.full_name,
                    "role": "doctor",
                    "is_active": true,
                }),
            )
            .await?;

        let user_id = user_rows
            .first()
            .and_then(|row| row.get("id"))
            .and_then(Value::as_i64)
            .ok_or_else(|| DoctorError::Database("Failed to create user".to_string()))?;

        let doctor_rows: Vec<Doctor> = self
            .db
            .insert(
                "doctors",
                json!({
                    "user_id": user_id,
                    "specialization": request.specialization,
                    "calendar_id": request.calendar_id,
                }),
            )
            .await?;

        let doctor = doctor_rows
            .into_iter()
            .next()
            .ok_or_else(|| DoctorError::Database("Failed to create doctor".to_string()))?;

        info!("Created doctor {} for user {}", doctor.id, user_id);

        Ok(doctor)
    }

    pub async fn get_doctor(&self, doctor_id: i64) -> Result<DoctorWithUser, DoctorError> {
        let path = format!(
            "/rest/v1/doctors?id=eq.{}&select=*,users(email,full_name,is_active)",
            doctor_id
        );
        let result: Vec<DoctorUserRow> = self.db.request(Method::GET, &path, None).await?;

        result
            .into_iter()
            .next()
            .map(DoctorWithUser::from)
            .ok_or(DoctorError::NotFound)
    }

    /// All doctors with an active user account, ordered by id.
    pub async fn list_doctors(&self) -> Result<Vec<DoctorWithUser>, DoctorError> {
        let path = "/rest/v1/doctors?select=*,users!inner(email,full_name,is_active)&users.is_active=eq.true&order=id.asc";
        let result: Vec<DoctorUserRow> = self.db.request(Method::GET, path, None).await?;

        Ok(result.into_iter().map(DoctorWithUser::from).collect())
    }

    pub async fn update_doctor(
        &self,
        doctor_id: i64,
        request: UpdateDoctorRequest,
    ) -> Result<DoctorWithUser, DoctorError> {
        let current = self.get_doctor(doctor_id).await?;

        let mut doctor_patch = serde_json::Map::new();
        if let Some(specialization) = request.specialization {
            doctor_patch.insert("specialization".to_string(), json!(specialization));
        }
        if let Some(calendar_id) = request.calendar_id {
            doctor_patch.insert("calendar_id".to_string(), json!(calendar_id));
        }
        if !doctor_patch.is_empty() {
            let _: Vec<Doctor> = self
                .db
                .update_by_id("doctors", doctor_id, Value::Object(doctor_patch))
                .await?;
        }

        // Activation lives on the user row.
        if let Some(is_active) = request.is_active {
            let _: Vec<Value> = self
                .db
                .update_by_id("users", current.user_id, json!({ "is_active": is_active }))
                .await?;
        }

        self.get_doctor(doctor_id).await
    }

    async fn email_exists(&self, email: &str) -> Result<bool, DoctorError> {
        let path = format!(
            "/rest/v1/users?email=eq.{}&select=id",
            urlencoding::encode(email)
        );
        let result: Vec<Value> = self.db.request(Method::GET, &path, None).await?;
        Ok(!result.is_empty())
    }
}
