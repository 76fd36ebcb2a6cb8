use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_utils::extractor::auth_middleware;

use crate::handlers::{self, DoctorCellState};
use crate::services::availability::AvailabilityService;
use crate::services::doctor::DoctorService;

pub fn doctor_routes(config: Arc<AppConfig>, db: Arc<SupabaseClient>) -> Router {
    let state = Arc::new(DoctorCellState {
        doctors: DoctorService::new(db.clone()),
        availability: AvailabilityService::new(db),
    });

    Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/", post(handlers::create_doctor))
        .route("/{id}", get(handlers::get_doctor))
        .route("/{id}", put(handlers::update_doctor))
        .route("/{id}/availability", get(handlers::get_availability))
        .route("/{id}/availability", post(handlers::create_availability))
        .route(
            "/{id}/availability/{availability_id}",
            delete(handlers::delete_availability),
        )
        .route("/{id}/slots", get(handlers::get_free_slots))
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(state)
}
