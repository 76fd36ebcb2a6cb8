use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use shared_database::SupabaseClient;

use crate::models::{Availability, CreateAvailabilityRequest, DoctorError, FreeSlot};

/// Default appointment slot length.
pub const SLOT_LENGTH_MINUTES: i64 = 30;

/// Compute the free fixed-length slots inside `[schedule_start, schedule_end)`.
///
/// The window is partitioned into consecutive slots of exactly `slot_length`;
/// a trailing partial slot is discarded. A slot is free iff it overlaps no
/// busy interval under half-open semantics: overlap when
/// `slot_start < busy_end && slot_end > busy_start`, so a slot touching a
/// busy interval only at a boundary stays free. Busy intervals need not be
/// sorted or disjoint; intervals outside the window simply never match.
pub fn free_slots(
    schedule_start: DateTime<Utc>,
    schedule_end: DateTime<Utc>,
    busy: &[(DateTime<Utc>, DateTime<Utc>)],
    slot_length: Duration,
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let mut slots = Vec::new();
    let mut current = schedule_start;

    while current + slot_length <= schedule_end {
        let slot_end = current + slot_length;

        let is_busy = busy
            .iter()
            .any(|&(busy_start, busy_end)| current < busy_end && slot_end > busy_start);

        if !is_busy {
            slots.push((current, slot_end));
        }

        current = slot_end;
    }

    slots
}

/// Start/end of a booked appointment, the only fields the slot scan needs.
#[derive(Debug, Deserialize)]
struct BookedInterval {
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
}

pub struct AvailabilityService {
    db: Arc<SupabaseClient>,
}

impl AvailabilityService {
    pub fn new(db: Arc<SupabaseClient>) -> Self {
        Self { db }
    }

    /// Create a weekly availability window for a doctor.
    pub async fn create_availability(
        &self,
        doctor_id: i64,
        request: CreateAvailabilityRequest,
    ) -> Result<Availability, DoctorError> {
        debug!("Creating availability for doctor {}", doctor_id);

        if request.start_time >= request.end_time {
            return Err(DoctorError::InvalidSchedule(
                "Start time must be before end time".to_string(),
            ));
        }

        if !(0..=6).contains(&request.day_of_week) {
            return Err(DoctorError::InvalidSchedule(
                "Day of week must be between 0 (Monday) and 6 (Sunday)".to_string(),
            ));
        }

        // Reject windows that overlap an existing row for the same day;
        // the read side still collapses duplicates in pre-existing data.
        let existing = self
            .get_availability_for_day(doctor_id, request.day_of_week)
            .await?;
        for row in &existing {
            if request.start_time < row.end_time && request.end_time > row.start_time {
                return Err(DoctorError::InvalidSchedule(format!(
                    "Availability conflicts with existing window {} - {}",
                    row.start_time, row.end_time
                )));
            }
        }

        let availability_data = json!({
            "doctor_id": doctor_id,
            "day_of_week": request.day_of_week,
            "start_time": request.start_time.format("%H:%M:%S").to_string(),
            "end_time": request.end_time.format("%H:%M:%S").to_string(),
            "is_available": request.is_available.unwrap_or(true),
        });

        let result: Vec<Availability> = self.db.insert("availabilities", availability_data).await?;

        result
            .into_iter()
            .next()
            .ok_or_else(|| DoctorError::Database("Failed to create availability".to_string()))
    }

    /// All availability windows for a doctor, ordered by day then start time.
    pub async fn get_doctor_availability(
        &self,
        doctor_id: i64,
    ) -> Result<Vec<Availability>, DoctorError> {
        let path = format!(
            "/rest/v1/availabilities?doctor_id=eq.{}&order=day_of_week.asc,start_time.asc",
            doctor_id
        );
        let result: Vec<Availability> = self.db.request(Method::GET, &path, None).await?;
        Ok(result)
    }

    pub async fn delete_availability(&self, availability_id: i64) -> Result<(), DoctorError> {
        let path = format!("/rest/v1/availabilities?id=eq.{}", availability_id);
        let _: Vec<Value> = self.db.request(Method::DELETE, &path, None).await?;
        Ok(())
    }

    /// Free slots for a doctor on a calendar date: each enabled availability
    /// window for that weekday is scanned against the day's non-cancelled
    /// appointments. A day with no schedule yields an empty list, not an
    /// error. Slots from overlapping windows are collapsed, first kept wins.
    pub async fn free_slots_for_date(
        &self,
        doctor_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<FreeSlot>, DoctorError> {
        debug!("Calculating free slots for doctor {} on {}", doctor_id, date);

        let day_of_week = date.weekday().num_days_from_monday() as i32;

        let schedules = self.get_availability_for_day(doctor_id, day_of_week).await?;
        if schedules.is_empty() {
            return Ok(vec![]);
        }

        let busy = self.get_booked_intervals(doctor_id, date).await?;

        let mut slots = Vec::new();
        for schedule in schedules {
            if !schedule.is_available {
                continue;
            }

            let schedule_start = date.and_time(schedule.start_time).and_utc();
            let schedule_end = date.and_time(schedule.end_time).and_utc();

            for (start_time, end_time) in free_slots(
                schedule_start,
                schedule_end,
                &busy,
                Duration::minutes(SLOT_LENGTH_MINUTES),
            ) {
                slots.push(FreeSlot { start_time, end_time });
            }
        }

        slots.sort_by(|a, b| a.start_time.cmp(&b.start_time));

        Ok(remove_overlapping_slots(slots))
    }

    async fn get_availability_for_day(
        &self,
        doctor_id: i64,
        day_of_week: i32,
    ) -> Result<Vec<Availability>, DoctorError> {
        let path = format!(
            "/rest/v1/availabilities?doctor_id=eq.{}&day_of_week=eq.{}&order=start_time.asc",
            doctor_id, day_of_week
        );
        let result: Vec<Availability> = self.db.request(Method::GET, &path, None).await?;
        Ok(result)
    }

    async fn get_booked_intervals(
        &self,
        doctor_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<(DateTime<Utc>, DateTime<Utc>)>, DoctorError> {
        let start_of_day = date.and_time(chrono::NaiveTime::MIN).and_utc();
        let end_of_day = start_of_day + Duration::days(1);

        let path = format!(
            "/rest/v1/appointments?doctor_id=eq.{}&status=neq.cancelled&start_time=gte.{}&start_time=lt.{}&order=start_time.asc",
            doctor_id,
            urlencoding::encode(&start_of_day.to_rfc3339()),
            urlencoding::encode(&end_of_day.to_rfc3339()),
        );

        let result: Vec<BookedInterval> = self.db.request(Method::GET, &path, None).await?;

        Ok(result
            .into_iter()
            .map(|apt| (apt.start_time, apt.end_time))
            .collect())
    }
}

/// Drop slots that overlap an earlier-kept slot. Input must be sorted by
/// start time; duplicates come from overlapping availability windows.
fn remove_overlapping_slots(slots: Vec<FreeSlot>) -> Vec<FreeSlot> {
    let mut result: Vec<FreeSlot> = Vec::new();
    let mut last_end_time: Option<DateTime<Utc>> = None;

    for slot in slots {
        match last_end_time {
            Some(last_end) if slot.start_time < last_end => {}
            _ => {
                last_end_time = Some(slot.end_time);
                result.push(slot);
            }
        }
    }

    result
}
