use chrono::{DateTime, Utc};

/// Everything the confirmation email and calendar event need about a
/// freshly booked appointment.
#[derive(Debug, Clone)]
pub struct AppointmentNotice {
    pub appointment_id: i64,
    pub patient_name: String,
    pub patient_email: String,
    pub doctor_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub reason: Option<String>,
}

/// Summary a finished doctor report pushes to the team channel.
#[derive(Debug, Clone)]
pub struct ReportNotice {
    pub doctor_name: String,
    pub total: i64,
    pub completed: i64,
    pub scheduled: i64,
    pub cancelled: i64,
    /// Human-readable date range, e.g. "Mar 02 to Mar 08, 2026".
    pub period: Option<String>,
    /// Condition text with occurrence count, most frequent first.
    pub top_conditions: Vec<(String, i64)>,
    pub summary: String,
}
