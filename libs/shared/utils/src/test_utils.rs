use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};

use shared_config::{AppConfig, DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES};
use shared_models::auth::TokenKind;

use crate::jwt::sign_token;

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            supabase_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
            access_token_expire_minutes: DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES,
            slack_webhook_url: String::new(),
            mail_api_url: String::new(),
            mail_api_key: String::new(),
            mail_sender: String::new(),
            calendar_api_url: String::new(),
            calendar_api_token: String::new(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub role: String,
}

impl TestUser {
    pub fn doctor(id: i64, email: &str) -> Self {
        Self {
            id,
            email: email.to_string(),
            role: "doctor".to_string(),
        }
    }

    pub fn patient(id: i64, email: &str) -> Self {
        Self {
            id,
            email: email.to_string(),
            role: "patient".to_string(),
        }
    }
}

impl Default for TestUser {
    fn default() -> Self {
        Self::patient(1, "test@example.com")
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        sign_token(
            user.id,
            Some(user.role.as_str()),
            TokenKind::Access,
            Duration::hours(exp_hours.unwrap_or(24)),
            secret,
        )
        .expect("failed to sign test token")
    }
}

/// Canned store rows for wiremock-backed tests. Field names match the
/// serde layouts of the cell models.
pub struct MockRows;

impl MockRows {
    pub fn user(id: i64, email: &str, role: &str, hashed_password: &str) -> Value {
        json!({
            "id": id,
            "email": email,
            "hashed_password": hashed_password,
            "full_name": "Test User",
            "role": role,
            "is_active": true,
            "created_at": Utc::now().to_rfc3339()
        })
    }

    pub fn doctor(id: i64, user_id: i64, specialization: &str) -> Value {
        json!({
            "id": id,
            "user_id": user_id,
            "specialization": specialization,
            "calendar_id": null,
            "created_at": Utc::now().to_rfc3339()
        })
    }

    pub fn patient(id: i64, user_id: i64) -> Value {
        json!({
            "id": id,
            "user_id": user_id,
            "date_of_birth": "1990-01-01",
            "medical_history": null,
            "created_at": Utc::now().to_rfc3339()
        })
    }

    pub fn availability(id: i64, doctor_id: i64, day_of_week: i32, start: &str, end: &str) -> Value {
        json!({
            "id": id,
            "doctor_id": doctor_id,
            "day_of_week": day_of_week,
            "start_time": start,
            "end_time": end,
            "is_available": true
        })
    }

    pub fn appointment(
        id: i64,
        doctor_id: i64,
        patient_id: i64,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        status: &str,
    ) -> Value {
        json!({
            "id": id,
            "doctor_id": doctor_id,
            "patient_id": patient_id,
            "start_time": start_time.to_rfc3339(),
            "end_time": end_time.to_rfc3339(),
            "status": status,
            "reason": null,
            "symptoms": null,
            "diagnosis": null,
            "calendar_event_id": null,
            "created_at": Utc::now().to_rfc3339()
        })
    }
}
