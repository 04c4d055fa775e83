use chrono_tz::Tz;
use sprig_core::date::{parse_zone, REFERENCE_TIMEZONE};
use sprig_reminder::scheduler::DEFAULT_REMINDER_HOUR;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the GCP project have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT validation configuration (secret).
    pub jwt: JwtConfig,
    /// Reference timezone for watering-freshness comparisons.
    pub reminder_timezone: Tz,
    /// Local hour (0-23) at which the daily reminder run fires.
    pub reminder_hour: u32,
    /// GCP project hosting the document store and push messaging.
    pub gcp_project_id: String,
    /// Override for the Firestore endpoint (emulator / tests).
    pub firestore_base_url: Option<String>,
    /// Override for the FCM endpoint (tests).
    pub fcm_base_url: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `HOST`                   | `0.0.0.0`               |
    /// | `PORT`                   | `3000`                  |
    /// | `CORS_ORIGINS`           | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                    |
    /// | `REMINDER_TIMEZONE`      | `Asia/Bangkok`          |
    /// | `REMINDER_HOUR`          | `20`                    |
    /// | `GCP_PROJECT_ID`         | **required**            |
    /// | `FIRESTORE_BASE_URL`     | (production endpoint)   |
    /// | `FCM_BASE_URL`           | (production endpoint)   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let reminder_timezone = parse_zone(
            &std::env::var("REMINDER_TIMEZONE").unwrap_or_else(|_| REFERENCE_TIMEZONE.into()),
        )
        .expect("REMINDER_TIMEZONE must be a valid IANA zone");

        let reminder_hour: u32 = std::env::var("REMINDER_HOUR")
            .unwrap_or_else(|_| DEFAULT_REMINDER_HOUR.to_string())
            .parse()
            .expect("REMINDER_HOUR must be a valid hour");
        assert!(reminder_hour < 24, "REMINDER_HOUR must be 0-23");

        let gcp_project_id =
            std::env::var("GCP_PROJECT_ID").expect("GCP_PROJECT_ID must be set");

        let firestore_base_url = std::env::var("FIRESTORE_BASE_URL").ok();
        let fcm_base_url = std::env::var("FCM_BASE_URL").ok();

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            reminder_timezone,
            reminder_hour,
            gcp_project_id,
            firestore_base_url,
            fcm_base_url,
        }
    }
}
