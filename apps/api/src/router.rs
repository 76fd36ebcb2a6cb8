use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use doctor_cell::router::doctor_routes;
use patient_cell::router::patient_routes;
use report_cell::router::report_routes;
use shared_config::AppConfig;
use shared_database::SupabaseClient;

pub fn create_router(config: Arc<AppConfig>, db: Arc<SupabaseClient>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic scheduling API is running!" }))
        .nest("/auth", auth_routes(config.clone(), db.clone()))
        .nest("/doctors", doctor_routes(config.clone(), db.clone()))
        .nest("/patients", patient_routes(config.clone(), db.clone()))
        .nest(
            "/appointments",
            appointment_routes(config.clone(), db.clone()),
        )
        .nest("/reports", report_routes(config, db))
}
