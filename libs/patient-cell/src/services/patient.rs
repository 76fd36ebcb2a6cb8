use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use auth_cell::services::password::PasswordService;
use shared_database::SupabaseClient;

use crate::models::{
    CreatePatientRequest, Patient, PatientError, PatientWithUser, UpdatePatientRequest,
};

#[derive(Debug, Deserialize)]
struct PatientUserRow {
    id: i64,
    user_id: i64,
    date_of_birth: Option<NaiveDate>,
    medical_history: Option<String>,
    created_at: DateTime<Utc>,
    users: EmbeddedUser,
}

#[derive(Debug, Deserialize)]
struct EmbeddedUser {
    email: String,
    full_name: String,
    is_active: bool,
}

impl From<PatientUserRow> for PatientWithUser {
    fn from(row: PatientUserRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            date_of_birth: row.date_of_birth,
            medical_history: row.medical_history,
            created_at: row.created_at,
            email: row.users.email,
            full_name: row.users.full_name,
            is_active: row.users.is_active,
        }
    }
}

pub struct PatientService {
    db: Arc<SupabaseClient>,
}

impl PatientService {
    pub fn new(db: Arc<SupabaseClient>) -> Self {
        Self { db }
    }

    /// Register a patient: a user account with role `patient` plus the
    /// patient profile row pointing at it.
    pub async fn create_patient(
        &self,
        request: CreatePatientRequest,
    ) -> Result<Patient, PatientError> {
        debug!("Creating patient account for {}", request.email);

        if self.email_exists(&request.email).await? {
            return Err(PatientError::EmailTaken);
        }

        let hashed_password = PasswordService::hash_password(&request.password)
            .map_err(|e| PatientError::Database(e.to_string()))?;

        let user_rows: Vec<Value> = self
            .db
            .insert(
                "users",
                json!({
                    "email": request.email,
                    "hashed_password": hashed_password,
                    "full_name": request.full_name,
                    "role": "patient",
                    "is_active": true,
                }),
            )
            .await?;

        let user_id = user_rows
            .first()
            .and_then(|row| row.get("id"))
            .and_then(Value::as_i64)
            .ok_or_else(|| PatientError::Database("Failed to create user".to_string()))?;

        let patient_rows: Vec<Patient> = self
            .db
            .insert(
                "patients",
                json!({
                    "user_id": user_id,
                    "date_of_birth": request.date_of_birth,
                    "medical_history": request.medical_history,
                }),
            )
            .await?;

        let patient = patient_rows
            .into_iter()
            .next()
            .ok_or_else(|| PatientError::Database("Failed to create patient".to_string()))?;

        info!("Created patient {} for user {}", patient.id, user_id);

        Ok(patient)
    }

    pub async fn get_patient(&self, patient_id: i64) -> Result<PatientWithUser, PatientError> {
        let path = format!(
            "/rest/v1/patients?id=eq.{}&select=*,users(email,full_name,is_active)",
            patient_id
        );
        let result: Vec<PatientUserRow> = self.db.request(Method::GET, &path, None).await?;

        result
            .into_iter()
            .next()
            .map(PatientWithUser::from)
            .ok_or(PatientError::NotFound)
    }

    pub async fn list_patients(&self) -> Result<Vec<PatientWithUser>, PatientError> {
        let path =
            "/rest/v1/patients?select=*,users!inner(email,full_name,is_active)&order=id.asc";
        let result: Vec<PatientUserRow> = self.db.request(Method::GET, path, None).await?;

        Ok(result.into_iter().map(PatientWithUser::from).collect())
    }

    pub async fn update_patient(
        &self,
        patient_id: i64,
        request: UpdatePatientRequest,
    ) -> Result<PatientWithUser, PatientError> {
        let current = self.get_patient(patient_id).await?;

        let mut patient_patch = serde_json::Map::new();
        if let Some(date_of_birth) = request.date_of_birth {
            patient_patch.insert("date_of_birth".to_string(), json!(date_of_birth));
        }
        if let Some(medical_history) = request.medical_history {
            patient_patch.insert("medical_history".to_string(), json!(medical_history));
        }
        if !patient_patch.is_empty() {
            let _: Vec<Patient> = self
                .db
                .update_by_id("patients", patient_id, Value::Object(patient_patch))
                .await?;
        }

        if let Some(is_active) = request.is_active {
            let _: Vec<Value> = self
                .db
                .update_by_id("users", current.user_id, json!({ "is_active": is_active }))
                .await?;
        }

        self.get_patient(patient_id).await
    }

    async fn email_exists(&self, email: &str) -> Result<bool, PatientError> {
        let path = format!(
            "/rest/v1/users?email=eq.{}&select=id",
            urlencoding::encode(email)
        );
        let result: Vec<Value> = self.db.request(Method::GET, &path, None).await?;
        Ok(!result.is_empty())
    }
}
