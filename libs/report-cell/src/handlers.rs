use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};

use notification_cell::models::ReportNotice;
use notification_cell::services::chat::ChatService;
use shared_models::error::AppError;

use crate::models::{AppointmentStats, DoctorReport, ReportRequest, StatsQuery};
use crate::services::report::ReportService;

pub struct ReportCellState {
    pub reports: ReportService,
    pub chat: ChatService,
}

pub async fn generate_doctor_report(
    State(state): State<Arc<ReportCellState>>,
    Json(request): Json<ReportRequest>,
) -> Result<Json<DoctorReport>, AppError> {
    let report = state.reports.generate(request).await?;

    // Channel notification is best effort; the report is returned either way
    state.chat.send_report_notification(&notice_for(&report)).await;

    Ok(Json(report))
}

pub async fn get_doctor_stats(
    State(state): State<Arc<ReportCellState>>,
    Path(doctor_id): Path<i64>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<AppointmentStats>, AppError> {
    let report = state
        .reports
        .generate(ReportRequest {
            doctor_id,
            date_from: query.from_date,
            date_to: query.to_date,
            condition: None,
        })
        .await?;

    Ok(Json(report.appointment_stats))
}

fn notice_for(report: &DoctorReport) -> ReportNotice {
    let period = match (
        report.daily_breakdown.first(),
        report.daily_breakdown.last(),
    ) {
        (Some(first), Some(last)) => Some(format!(
            "{} to {}",
            first.date.format("%b %d"),
            last.date.format("%b %d, %Y")
        )),
        _ => None,
    };

    ReportNotice {
        doctor_name: report.doctor_name.clone(),
        total: report.appointment_stats.total,
        completed: report.appointment_stats.completed,
        scheduled: report.appointment_stats.scheduled,
        cancelled: report.appointment_stats.cancelled,
        period,
        top_conditions: report
            .common_conditions
            .iter()
            .map(|c| (c.condition.clone(), c.count))
            .collect(),
        summary: report.summary.clone(),
    }
}
