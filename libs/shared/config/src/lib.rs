use std::env;
use tracing::warn;

/// Default access-token lifetime: 7 days, expressed in minutes.
/// Matches the refresh-token lifetime; kept until product decides otherwise.
pub const DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 60 * 24 * 7;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub jwt_secret: String,
    pub access_token_expire_minutes: i64,
    pub slack_webhook_url: String,
    pub mail_api_url: String,
    pub mail_api_key: String,
    pub mail_sender: String,
    pub calendar_api_url: String,
    pub calendar_api_token: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_KEY not set, using empty value");
                    String::new()
                }),
            jwt_secret: env::var("SECRET_KEY")
                .unwrap_or_else(|_| {
                    warn!("SECRET_KEY not set, using empty value");
                    String::new()
                }),
            access_token_expire_minutes: env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES),
            slack_webhook_url: env::var("SLACK_WEBHOOK_URL").unwrap_or_default(),
            mail_api_url: env::var("MAIL_API_URL").unwrap_or_default(),
            mail_api_key: env::var("MAIL_API_KEY").unwrap_or_default(),
            mail_sender: env::var("MAIL_SENDER").unwrap_or_default(),
            calendar_api_url: env::var("CALENDAR_API_URL").unwrap_or_default(),
            calendar_api_token: env::var("CALENDAR_API_TOKEN").unwrap_or_default(),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_anon_key.is_empty()
            && !self.jwt_secret.is_empty()
    }

    pub fn is_mail_configured(&self) -> bool {
        !self.mail_api_url.is_empty()
            && !self.mail_api_key.is_empty()
            && !self.mail_sender.is_empty()
    }

    pub fn is_calendar_configured(&self) -> bool {
        !self.calendar_api_url.is_empty() && !self.calendar_api_token.is_empty()
    }

    pub fn is_slack_configured(&self) -> bool {
        !self.slack_webhook_url.is_empty()
    }
}
