use std::sync::Arc;

use chrono::Duration;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_models::auth::TokenKind;
use shared_utils::jwt::{sign_token, validate_token};

use crate::models::{AuthError, LoginResponse, RefreshResponse, UserRecord};
use crate::services::password::PasswordService;

/// Refresh tokens always live for 7 days.
const REFRESH_TOKEN_EXPIRE_DAYS: i64 = 7;

pub struct AuthService {
    db: Arc<SupabaseClient>,
    jwt_secret: String,
    access_ttl: Duration,
}

impl AuthService {
    pub fn new(config: &AppConfig, db: Arc<SupabaseClient>) -> Self {
        Self {
            db,
            jwt_secret: config.jwt_secret.clone(),
            access_ttl: Duration::minutes(config.access_token_expire_minutes),
        }
    }

    /// Authenticate with email and password, issuing an access/refresh token
    /// pair. Unknown email, wrong password and deactivated accounts all fail
    /// the same way so the response does not leak which one it was.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        debug!("Login attempt for {}", email);

        let user = match self.find_user_by_email(email).await? {
            Some(user) => user,
            None => return Err(AuthError::InvalidCredentials),
        };

        if !user.is_active {
            return Err(AuthError::InvalidCredentials);
        }

        let verified = PasswordService::verify_password(password, &user.hashed_password)
            .map_err(|e| AuthError::Database(e.to_string()))?;
        if !verified {
            debug!("Password verification failed for {}", email);
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = sign_token(
            user.id,
            Some(user.role.as_str()),
            TokenKind::Access,
            self.access_ttl,
            &self.jwt_secret,
        )
        .map_err(AuthError::Database)?;

        let refresh_token = sign_token(
            user.id,
            None,
            TokenKind::Refresh,
            Duration::days(REFRESH_TOKEN_EXPIRE_DAYS),
            &self.jwt_secret,
        )
        .map_err(AuthError::Database)?;

        info!("Successful login for user {}", user.id);

        Ok(LoginResponse {
            access_token,
            refresh_token,
            token_type: "bearer".to_string(),
            user: user.into(),
        })
    }

    /// Exchange a valid refresh token for a fresh access token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, AuthError> {
        let identity = validate_token(refresh_token, &self.jwt_secret, TokenKind::Refresh)
            .map_err(AuthError::InvalidToken)?;

        // The role is not embedded in refresh tokens; re-read it so a role
        // change or deactivation takes effect on the next refresh.
        let user = self.get_user(identity.id).await?;
        if !user.is_active {
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = sign_token(
            user.id,
            Some(user.role.as_str()),
            TokenKind::Access,
            self.access_ttl,
            &self.jwt_secret,
        )
        .map_err(AuthError::Database)?;

        Ok(RefreshResponse {
            access_token,
            token_type: "bearer".to_string(),
        })
    }

    /// Resolve a user id (from a validated access token) to the stored user.
    pub async fn get_user(&self, user_id: i64) -> Result<UserRecord, AuthError> {
        let path = format!("/rest/v1/users?id=eq.{}", user_id);
        let result: Vec<Value> = self.db.request(Method::GET, &path, None).await?;

        let row = result
            .into_iter()
            .next()
            .ok_or(AuthError::InvalidCredentials)?;

        serde_json::from_value(row).map_err(|e| AuthError::Database(e.to_string()))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError> {
        let path = format!("/rest/v1/users?email=eq.{}", urlencoding::encode(email));
        let result: Vec<Value> = self.db.request(Method::GET, &path, None).await?;

        match result.into_iter().next() {
            Some(row) => {
                let user = serde_json::from_value(row)
                    .map_err(|e| AuthError::Database(e.to_string()))?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }
}
