use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use reqwest::Method;
use serde::Deserialize;
use tracing::debug;

use shared_database::SupabaseClient;

use crate::models::{
    AppointmentStats, DailyAppointmentCount, DoctorReport, PatientCondition, ReportError,
    ReportRequest,
};

/// The slice of an appointment row the aggregation needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportAppointment {
    pub start_time: DateTime<Utc>,
    pub status: String,
    pub reason: Option<String>,
    pub diagnosis: Option<String>,
}

/// Status tallies over a set of appointments. Unknown status strings still
/// count toward the total.
pub fn count_statuses(appointments: &[ReportAppointment]) -> AppointmentStats {
    let mut stats = AppointmentStats {
        total: appointments.len() as i64,
        completed: 0,
        scheduled: 0,
        cancelled: 0,
    };

    for apt in appointments {
        match apt.status.as_str() {
            "completed" => stats.completed += 1,
            "scheduled" => stats.scheduled += 1,
            "cancelled" => stats.cancelled += 1,
            _ => {}
        }
    }

    stats
}

/// Appointments per calendar day, ascending by date.
pub fn daily_breakdown(appointments: &[ReportAppointment]) -> Vec<DailyAppointmentCount> {
    let mut per_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for apt in appointments {
        *per_day.entry(apt.start_time.date_naive()).or_insert(0) += 1;
    }

    per_day
        .into_iter()
        .map(|(date, count)| DailyAppointmentCount { date, count })
        .collect()
}

/// Condition texts (reason and diagnosis) ranked by occurrence. Texts are
/// lowercased and trimmed; blanks are skipped. Ties keep first-seen order
/// and the list is not truncated.
pub fn top_conditions(
    appointments: &[ReportAppointment],
    filter: Option<&str>,
) -> Vec<PatientCondition> {
    let filter = filter.map(str::to_lowercase);
    let mut counts: Vec<(String, i64)> = Vec::new();

    let texts = appointments
        .iter()
        .flat_map(|apt| [apt.reason.as_deref(), apt.diagnosis.as_deref()])
        .flatten();

    for text in texts {
        let condition = text.trim().to_lowercase();
        if condition.is_empty() {
            continue;
        }
        if let Some(ref needle) = filter {
            if !condition.contains(needle.as_str()) {
                continue;
            }
        }

        match counts.iter_mut().find(|(c, _)| *c == condition) {
            Some((_, count)) => *count += 1,
            None => counts.push((condition, 1)),
        }
    }

    // Stable sort keeps first-seen order within equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    counts
        .into_iter()
        .map(|(condition, count)| PatientCondition { condition, count })
        .collect()
}

fn build_summary(doctor_name: &str, stats: &AppointmentStats) -> String {
    if stats.total == 0 {
        return format!("Dr. {} had no appointments in this period.", doctor_name);
    }

    format!(
        "Dr. {} had {} appointments in this period: {} completed, {} scheduled and {} cancelled.",
        doctor_name, stats.total, stats.completed, stats.scheduled, stats.cancelled
    )
}

pub struct ReportService {
    db: Arc<SupabaseClient>,
}

impl ReportService {
    pub fn new(db: Arc<SupabaseClient>) -> Self {
        Self { db }
    }

    /// Aggregate a doctor's appointments into a report. Date bounds are
    /// inclusive whole days; no appointments is a valid, all-zero report.
    pub async fn generate(&self, request: ReportRequest) -> Result<DoctorReport, ReportError> {
        debug!("Generating report for doctor {}", request.doctor_id);

        let doctor_name = self.get_doctor_name(request.doctor_id).await?;
        let appointments = self
            .get_appointments(request.doctor_id, request.date_from, request.date_to)
            .await?;

        let stats = count_statuses(&appointments);
        let summary = build_summary(&doctor_name, &stats);

        Ok(DoctorReport {
            doctor_id: request.doctor_id,
            doctor_name,
            report_date: Utc::now(),
            appointment_stats: stats,
            daily_breakdown: daily_breakdown(&appointments),
            common_conditions: top_conditions(&appointments, request.condition.as_deref()),
            summary,
        })
    }

    async fn get_doctor_name(&self, doctor_id: i64) -> Result<String, ReportError> {
        #[derive(Deserialize)]
        struct DoctorRow {
            users: UserRef,
        }
        #[derive(Deserialize)]
        struct UserRef {
            full_name: String,
        }

        let path = format!(
            "/rest/v1/doctors?id=eq.{}&select=users!inner(full_name)",
            doctor_id
        );
        let rows: Vec<DoctorRow> = self.db.request(Method::GET, &path, None).await?;

        rows.into_iter()
            .next()
            .map(|row| row.users.full_name)
            .ok_or(ReportError::DoctorNotFound)
    }

    async fn get_appointments(
        &self,
        doctor_id: i64,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<Vec<ReportAppointment>, ReportError> {
        let mut path = format!(
            "/rest/v1/appointments?doctor_id=eq.{}&select=start_time,status,reason,diagnosis&order=start_time.asc",
            doctor_id
        );

        if let Some(from) = date_from {
            let from = from.and_time(chrono::NaiveTime::MIN).and_utc();
            path.push_str(&format!(
                "&start_time=gte.{}",
                urlencoding::encode(&from.to_rfc3339())
            ));
        }
        if let Some(to) = date_to {
            let to = to.and_time(chrono::NaiveTime::MIN).and_utc() + Duration::days(1);
            path.push_str(&format!(
                "&start_time=lt.{}",
                urlencoding::encode(&to.to_rfc3339())
            ));
        }

        let rows: Vec<ReportAppointment> = self.db.request(Method::GET, &path, None).await?;
        Ok(rows)
    }
}
