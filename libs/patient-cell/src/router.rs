use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_utils::extractor::auth_middleware;

use crate::handlers::{self, PatientCellState};
use crate::services::patient::PatientService;

pub fn patient_routes(config: Arc<AppConfig>, db: Arc<SupabaseClient>) -> Router {
    let state = Arc::new(PatientCellState {
        patients: PatientService::new(db),
    });

    Router::new()
        .route("/", get(handlers::list_patients))
        .route("/", post(handlers::create_patient))
        .route("/{id}", get(handlers::get_patient))
        .route("/{id}", put(handlers::update_patient))
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(state)
}
