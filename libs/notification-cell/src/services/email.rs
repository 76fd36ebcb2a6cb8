use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};

use shared_config::AppConfig;

use crate::models::AppointmentNotice;

/// Client for the transactional mail API. Sending is best effort and
/// reports success as a bool; booking proceeds either way.
pub struct EmailService {
    client: Client,
    api_url: String,
    api_key: String,
    sender: String,
    configured: bool,
}

impl EmailService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            api_url: config.mail_api_url.clone(),
            api_key: config.mail_api_key.clone(),
            sender: config.mail_sender.clone(),
            configured: config.is_mail_configured(),
        }
    }

    pub async fn send_appointment_confirmation(&self, notice: &AppointmentNotice) -> bool {
        let subject = format!("Appointment Confirmation with Dr. {}", notice.doctor_name);
        let body = format_appointment_email(notice);

        if !self.configured {
            debug!(
                "Mail API not configured, skipping confirmation for appointment {}",
                notice.appointment_id
            );
            return false;
        }

        let payload = json!({
            "from": self.sender,
            "to": notice.patient_email,
            "subject": subject,
            "html": body,
        });

        let response = self
            .client
            .post(format!("{}/send", self.api_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                warn!("Mail API rejected confirmation email: {}", resp.status());
                false
            }
            Err(e) => {
                warn!("Failed to send confirmation email: {}", e);
                false
            }
        }
    }
}

/// Render the HTML confirmation body for a booked appointment.
pub fn format_appointment_email(notice: &AppointmentNotice) -> String {
    let formatted_date = notice.start_time.format("%A, %B %d, %Y");
    let formatted_start = notice.start_time.format("%I:%M %p");
    let formatted_end = notice.end_time.format("%I:%M %p");
    let reason = notice.reason.as_deref().unwrap_or("Not specified");

    format!(
        r#"<html>
<body style="font-family: Arial, sans-serif; line-height: 1.6;">
    <h2>Appointment Confirmation</h2>
    <p>Dear {patient},</p>

    <p>Your appointment with <b>Dr. {doctor}</b> has been confirmed for:</p>

    <div style="margin: 20px 0; padding: 15px; background-color: #f8f9fa; border-left: 4px solid #4285f4; border-radius: 4px;">
        <p><b>Date:</b> {date}<br>
        <b>Time:</b> {start} - {end}</p>
    </div>

    <p><b>Reason for visit:</b> {reason}</p>

    <h3>Important Information:</h3>
    <ul>
        <li>Please arrive 15 minutes before your appointment time.</li>
        <li>Bring your insurance card and ID.</li>
        <li>If you need to cancel or reschedule, please contact us at least 24 hours in advance.</li>
    </ul>

    <p>If you have any questions, please don't hesitate to contact us.</p>

    <p>Best regards,<br>
    Medical Staff</p>
</body>
</html>"#,
        patient = notice.patient_name,
        doctor = notice.doctor_name,
        date = formatted_date,
        start = formatted_start,
        end = formatted_end,
        reason = reason,
    )
}
