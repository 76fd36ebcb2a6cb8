use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use notification_cell::services::chat::ChatService;
use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_utils::extractor::auth_middleware;

use crate::handlers::{self, ReportCellState};
use crate::services::report::ReportService;

pub fn report_routes(config: Arc<AppConfig>, db: Arc<SupabaseClient>) -> Router {
    let state = Arc::new(ReportCellState {
        reports: ReportService::new(db),
        chat: ChatService::new(&config),
    });

    Router::new()
        .route("/doctor", post(handlers::generate_doctor_report))
        .route("/stats/doctor/{id}", get(handlers::get_doctor_stats))
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(state)
}
