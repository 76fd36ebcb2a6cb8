use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use shared_database::SupabaseClient;

use crate::models::{
    Appointment, AppointmentError, AppointmentQuery, AppointmentStatus, AppointmentWithDetails,
    BookingContacts, CreateAppointmentRequest,
};
use crate::services::lifecycle;

/// Appointment row with doctor and patient rows embedded.
#[derive(Debug, Deserialize)]
struct DetailRow {
    #[serde(flatten)]
    appointment: Appointment,
    doctors: DoctorRef,
    patients: PatientRef,
}

#[derive(Debug, Deserialize)]
struct DoctorRef {
    users: UserRef,
}

#[derive(Debug, Deserialize)]
struct PatientRef {
    users: UserRef,
}

#[derive(Debug, Deserialize)]
struct UserRef {
    full_name: String,
}

impl From<DetailRow> for AppointmentWithDetails {
    fn from(row: DetailRow) -> Self {
        let apt = row.appointment;
        Self {
            id: apt.id,
            doctor_id: apt.doctor_id,
            patient_id: apt.patient_id,
            start_time: apt.start_time,
            end_time: apt.end_time,
            status: apt.status,
            reason: apt.reason,
            symptoms: apt.symptoms,
            diagnosis: apt.diagnosis,
            calendar_event_id: apt.calendar_event_id,
            created_at: apt.created_at,
            doctor_name: row.doctors.users.full_name,
            patient_name: row.patients.users.full_name,
        }
    }
}

const DETAIL_SELECT: &str = "*,doctors!inner(users!inner(full_name)),patients!inner(users!inner(full_name))";

pub struct BookingService {
    db: Arc<SupabaseClient>,
}

impl BookingService {
    pub fn new(db: Arc<SupabaseClient>) -> Self {
        Self { db }
    }

    /// Book an appointment. The overlap check here is advisory; the store's
    /// exclusion constraint decides races, and its 409 arrives as
    /// `SlotUnavailable` through the `DbError` conversion.
    pub async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        if request.start_time >= request.end_time {
            return Err(AppointmentError::InvalidInterval(
                "Appointment start must be before its end".to_string(),
            ));
        }

        self.ensure_doctor_exists(request.doctor_id).await?;
        self.ensure_patient_exists(request.patient_id).await?;

        if self
            .has_overlap(request.doctor_id, request.start_time, request.end_time)
            .await?
        {
            debug!(
                "Rejecting booking for doctor {}: overlap at {}",
                request.doctor_id, request.start_time
            );
            return Err(AppointmentError::SlotUnavailable);
        }

        let rows: Vec<Appointment> = self
            .db
            .insert(
                "appointments",
                json!({
                    "doctor_id": request.doctor_id,
                    "patient_id": request.patient_id,
                    "start_time": request.start_time.to_rfc3339(),
                    "end_time": request.end_time.to_rfc3339(),
                    "status": AppointmentStatus::Scheduled.as_str(),
                    "reason": request.reason,
                    "symptoms": request.symptoms,
                }),
            )
            .await?;

        let appointment = rows
            .into_iter()
            .next()
            .ok_or_else(|| AppointmentError::Database("Failed to create appointment".to_string()))?;

        info!(
            "Booked appointment {} for doctor {} at {}",
            appointment.id, appointment.doctor_id, appointment.start_time
        );

        Ok(appointment)
    }

    pub async fn get_appointment(
        &self,
        appointment_id: i64,
    ) -> Result<AppointmentWithDetails, AppointmentError> {
        let path = format!(
            "/rest/v1/appointments?id=eq.{}&select={}",
            appointment_id, DETAIL_SELECT
        );
        let rows: Vec<DetailRow> = self.db.request(Method::GET, &path, None).await?;

        rows.into_iter()
            .next()
            .map(AppointmentWithDetails::from)
            .ok_or(AppointmentError::NotFound)
    }

    /// Filtered listing, ordered by start time. Date bounds are inclusive
    /// whole days.
    pub async fn list_appointments(
        &self,
        query: AppointmentQuery,
    ) -> Result<Vec<AppointmentWithDetails>, AppointmentError> {
        let mut path = format!(
            "/rest/v1/appointments?select={}&order=start_time.asc",
            DETAIL_SELECT
        );

        if let Some(doctor_id) = query.doctor_id {
            path.push_str(&format!("&doctor_id=eq.{}", doctor_id));
        }
        if let Some(patient_id) = query.patient_id {
            path.push_str(&format!("&patient_id=eq.{}", patient_id));
        }
        if let Some(status) = query.status {
            path.push_str(&format!("&status=eq.{}", status.as_str()));
        }
        if let Some(from_date) = query.from_date {
            let from = from_date.and_time(chrono::NaiveTime::MIN).and_utc();
            path.push_str(&format!(
                "&start_time=gte.{}",
                urlencoding::encode(&from.to_rfc3339())
            ));
        }
        if let Some(to_date) = query.to_date {
            let to = to_date.and_time(chrono::NaiveTime::MIN).and_utc() + Duration::days(1);
            path.push_str(&format!(
                "&start_time=lt.{}",
                urlencoding::encode(&to.to_rfc3339())
            ));
        }

        let rows: Vec<DetailRow> = self.db.request(Method::GET, &path, None).await?;
        Ok(rows.into_iter().map(AppointmentWithDetails::from).collect())
    }

    /// Cancel a scheduled appointment. Cancelling a completed or already
    /// cancelled one fails with `ConflictingState`.
    pub async fn cancel_appointment(
        &self,
        appointment_id: i64,
    ) -> Result<Appointment, AppointmentError> {
        self.transition_appointment(appointment_id, AppointmentStatus::Cancelled, None)
            .await
    }

    /// Mark a scheduled appointment completed, optionally recording the
    /// diagnosis in the same write.
    pub async fn complete_appointment(
        &self,
        appointment_id: i64,
        diagnosis: Option<String>,
    ) -> Result<Appointment, AppointmentError> {
        self.transition_appointment(appointment_id, AppointmentStatus::Completed, diagnosis)
            .await
    }

    /// Attach the external calendar event id to a booked appointment.
    pub async fn set_calendar_event(
        &self,
        appointment_id: i64,
        event_id: &str,
    ) -> Result<(), AppointmentError> {
        let _: Vec<Appointment> = self
            .db
            .update_by_id(
                "appointments",
                appointment_id,
                json!({ "calendar_event_id": event_id }),
            )
            .await?;
        Ok(())
    }

    /// Names and addresses for the confirmation email and calendar event.
    pub async fn booking_contacts(
        &self,
        doctor_id: i64,
        patient_id: i64,
    ) -> Result<BookingContacts, AppointmentError> {
        #[derive(Deserialize)]
        struct DoctorRow {
            calendar_id: Option<String>,
            users: ContactUser,
        }
        #[derive(Deserialize)]
        struct PatientRow {
            users: ContactUser,
        }
        #[derive(Deserialize)]
        struct ContactUser {
            full_name: String,
            email: String,
        }

        let doctor_path = format!(
            "/rest/v1/doctors?id=eq.{}&select=calendar_id,users!inner(full_name,email)",
            doctor_id
        );
        let doctors: Vec<DoctorRow> = self.db.request(Method::GET, &doctor_path, None).await?;
        let doctor = doctors
            .into_iter()
            .next()
            .ok_or(AppointmentError::DoctorNotFound)?;

        let patient_path = format!(
            "/rest/v1/patients?id=eq.{}&select=users!inner(full_name,email)",
            patient_id
        );
        let patients: Vec<PatientRow> = self.db.request(Method::GET, &patient_path, None).await?;
        let patient = patients
            .into_iter()
            .next()
            .ok_or(AppointmentError::PatientNotFound)?;

        Ok(BookingContacts {
            doctor_name: doctor.users.full_name,
            doctor_calendar_id: doctor.calendar_id,
            patient_name: patient.users.full_name,
            patient_email: patient.users.email,
        })
    }

    async fn transition_appointment(
        &self,
        appointment_id: i64,
        target: AppointmentStatus,
        diagnosis: Option<String>,
    ) -> Result<Appointment, AppointmentError> {
        let current = self.get_raw_appointment(appointment_id).await?;
        let next = lifecycle::transition(current.status, target)?;

        let mut patch = serde_json::Map::new();
        patch.insert("status".to_string(), json!(next.as_str()));
        if let Some(diagnosis) = diagnosis {
            patch.insert("diagnosis".to_string(), json!(diagnosis));
        }

        let rows: Vec<Appointment> = self
            .db
            .update_by_id("appointments", appointment_id, Value::Object(patch))
            .await?;

        let updated = rows.into_iter().next().ok_or_else(|| {
            warn!("Status update for appointment {} returned no row", appointment_id);
            AppointmentError::NotFound
        })?;

        info!(
            "Appointment {} moved to {}",
            appointment_id,
            updated.status.as_str()
        );

        Ok(updated)
    }

    async fn get_raw_appointment(
        &self,
        appointment_id: i64,
    ) -> Result<Appointment, AppointmentError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let rows: Vec<Appointment> = self.db.request(Method::GET, &path, None).await?;
        rows.into_iter().next().ok_or(AppointmentError::NotFound)
    }

    async fn has_overlap(
        &self,
        doctor_id: i64,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<bool, AppointmentError> {
        // Half-open overlap: a booking that merely touches at a boundary
        // does not conflict
        let path = format!(
            "/rest/v1/appointments?doctor_id=eq.{}&status=neq.cancelled&start_time=lt.{}&end_time=gt.{}&select=id",
            doctor_id,
            urlencoding::encode(&end_time.to_rfc3339()),
            urlencoding::encode(&start_time.to_rfc3339()),
        );
        let rows: Vec<Value> = self.db.request(Method::GET, &path, None).await?;
        Ok(!rows.is_empty())
    }

    async fn ensure_doctor_exists(&self, doctor_id: i64) -> Result<(), AppointmentError> {
        let path = format!("/rest/v1/doctors?id=eq.{}&select=id", doctor_id);
        let rows: Vec<Value> = self.db.request(Method::GET, &path, None).await?;
        if rows.is_empty() {
            return Err(AppointmentError::DoctorNotFound);
        }
        Ok(())
    }

    async fn ensure_patient_exists(&self, patient_id: i64) -> Result<(), AppointmentError> {
        let path = format!("/rest/v1/patients?id=eq.{}&select=id", patient_id);
        let rows: Vec<Value> = self.db.request(Method::GET, &path, None).await?;
        if rows.is_empty() {
            return Err(AppointmentError::PatientNotFound);
        }
        Ok(())
    }
}
