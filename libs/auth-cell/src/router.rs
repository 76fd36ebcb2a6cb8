use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_utils::extractor::auth_middleware;

use crate::handlers::{self, AuthCellState};
use crate::services::auth::AuthService;

pub fn auth_routes(config: Arc<AppConfig>, db: Arc<SupabaseClient>) -> Router {
    let state = Arc::new(AuthCellState {
        service: AuthService::new(&config, db),
    });

    let public_routes = Router::new()
        .route("/token", post(handlers::login))
        .route("/refresh", post(handlers::refresh_token));

    let protected_routes = Router::new()
        .route("/me", get(handlers::me))
        .layer(middleware::from_fn_with_state(config, auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
