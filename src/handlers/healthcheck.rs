use axum::Json;
use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::Value;

use crate::config;
use crate::handlers::Message;

// Captured once at process start; read-only afterwards.
static STARTED: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);
static VERSION: Lazy<String> =
    Lazy::new(|| read_side_file(&config::config().status.version_file, "version"));
static BUILD: Lazy<String> =
    Lazy::new(|| read_side_file(&config::config().status.build_file, "build_number"));

/// Force the statics during startup so the start timestamp reflects boot
/// time rather than the first health-check request.
pub fn init() {
    Lazy::force(&STARTED);
    Lazy::force(&VERSION);
    Lazy::force(&BUILD);
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub version: String,
    pub started: DateTime<Utc>,
    pub uptime: String,
    pub build: String,
}

/// GET /status/healthcheck
pub async fn report() -> Json<HealthReport> {
    Json(HealthReport {
        version: VERSION.clone(),
        started: *STARTED,
        uptime: humanize(Utc::now() - *STARTED),
        build: BUILD.clone(),
    })
}

/// GET /status/healthcheck/ping
pub async fn ping() -> Json<Message> {
    Json(Message {
        message: "pong".to_string(),
    })
}

/// Read a single string/number field from an optional JSON side file.
/// Unreadable or malformed files are non-fatal and report as "n/a".
fn read_side_file(path: &str, key: &str) -> String {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|contents| serde_json::from_str::<Value>(&contents).ok())
        .and_then(|value| match value.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| "n/a".to_string())
}

/// Coarse human wording for an uptime duration
fn humanize(duration: Duration) -> String {
    let secs = duration.num_seconds().max(0);
    let minutes = (secs + 30) / 60;
    let hours = (secs + 1800) / 3600;
    let days = secs / 86_400;

    if secs < 45 {
        "a few seconds".to_string()
    } else if secs < 90 {
        "a minute".to_string()
    } else if secs < 45 * 60 {
        format!("{} minutes", minutes)
    } else if secs < 90 * 60 {
        "an hour".to_string()
    } else if secs < 22 * 3600 {
        format!("{} hours", hours)
    } else if secs < 36 * 3600 {
        "a day".to_string()
    } else if days < 26 {
        format!("{} days", (secs + 43_200) / 86_400)
    } else if days < 46 {
        "a month".to_string()
    } else if days < 320 {
        format!("{} months", (days + 15) / 30)
    } else if days < 548 {
        "a year".to_string()
    } else {
        format!("{} years", (days + 182) / 365)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humanize_tiers() {
        assert_eq!(humanize(Duration::seconds(5)), "a few seconds");
        assert_eq!(humanize(Duration::seconds(60)), "a minute");
        assert_eq!(humanize(Duration::minutes(10)), "10 minutes");
        assert_eq!(humanize(Duration::minutes(70)), "an hour");
        assert_eq!(humanize(Duration::hours(5)), "5 hours");
        assert_eq!(humanize(Duration::hours(25)), "a day");
        assert_eq!(humanize(Duration::days(10)), "10 days");
        assert_eq!(humanize(Duration::days(30)), "a month");
        assert_eq!(humanize(Duration::days(90)), "3 months");
        assert_eq!(humanize(Duration::days(400)), "a year");
        assert_eq!(humanize(Duration::days(800)), "2 years");
    }

    #[test]
    fn humanize_never_goes_negative() {
        assert_eq!(humanize(Duration::seconds(-5)), "a few seconds");
    }

    #[test]
    fn missing_side_file_reports_not_available() {
        assert_eq!(read_side_file("/definitely/not/here.json", "version"), "n/a");
    }

    #[test]
    fn malformed_side_file_reports_not_available() {
        let path = std::env::temp_dir().join("beacon-api-malformed.json");
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(read_side_file(path.to_str().unwrap(), "version"), "n/a");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn side_file_field_is_read() {
        let path = std::env::temp_dir().join("beacon-api-build.json");
        std::fs::write(&path, r#"{"build_number": 421}"#).unwrap();
        assert_eq!(read_side_file(path.to_str().unwrap(), "build_number"), "421");
        let _ = std::fs::remove_file(&path);
    }
}
