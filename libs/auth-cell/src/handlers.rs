use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Json, State},
    http::Request,
};
use tracing::debug;

use shared_models::error::AppError;
use shared_utils::extractor::extract_user;

use crate::models::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, UserResponse};
use crate::services::auth::AuthService;

pub struct AuthCellState {
    pub service: AuthService,
}

pub async fn login(
    State(state): State<Arc<AuthCellState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = state.service.login(&request.email, &request.password).await?;
    Ok(Json(response))
}

pub async fn refresh_token(
    State(state): State<Arc<AuthCellState>>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    let response = state.service.refresh(&request.refresh_token).await?;
    Ok(Json(response))
}

pub async fn me(
    State(state): State<Arc<AuthCellState>>,
    req: Request<Body>,
) -> Result<Json<UserResponse>, AppError> {
    // Identity was placed in extensions by the auth middleware
    let identity = extract_user(&req)?;
    debug!("Resolving current user {}", identity.id);

    let user = state.service.get_user(identity.id).await?;
    Ok(Json(user.into()))
}
