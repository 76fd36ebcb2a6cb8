use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use notification_cell::services::calendar::CalendarService;
use notification_cell::services::email::EmailService;
use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_utils::extractor::auth_middleware;

use crate::handlers::{self, AppointmentCellState};
use crate::services::booking::BookingService;

pub fn appointment_routes(config: Arc<AppConfig>, db: Arc<SupabaseClient>) -> Router {
    let state = Arc::new(AppointmentCellState {
        booking: BookingService::new(db),
        calendar: CalendarService::new(&config),
        email: EmailService::new(&config),
    });

    Router::new()
        .route("/", get(handlers::list_appointments))
        .route("/", post(handlers::create_appointment))
        .route("/{id}", get(handlers::get_appointment))
        .route("/{id}", delete(handlers::cancel_appointment))
        .route("/{id}/complete", post(handlers::complete_appointment))
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(state)
}
