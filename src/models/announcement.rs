use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Stored announcement. The store identifier is exposed as a plain string
/// field `_id` in every response.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Announcement {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub message: String,
    /// ISO-8601; `None` means active immediately (no lower bound).
    pub start_date: Option<String>,
    /// ISO-8601 upper bound of the display window.
    pub end_date: String,
    /// Manual on/off switch. `None` on records predating the flag; read as
    /// on when toggling, but excluded from the active query.
    pub active: Option<bool>,
    pub created_by: String,
    pub created_at: String,
}

/// Query parameters for the authenticated calls that carry nothing else.
#[derive(Debug, Deserialize)]
pub struct TeacherAuth {
    pub teacher_username: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateAnnouncementRequest {
    pub teacher_username: String,
    pub message: String,
    pub end_date: String,
    pub start_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAnnouncementRequest {
    pub teacher_username: String,
    pub message: String,
    pub end_date: String,
    pub start_date: Option<String>,
    /// Defaults to `true` when omitted: an update that does not send this
    /// field reactivates a deactivated announcement.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Validate a timestamp the way the API accepts them: a trailing `Z` is
/// shorthand for `+00:00`, and naive or date-only ISO-8601 forms are allowed.
pub fn is_valid_iso8601(raw: &str) -> bool {
    let normalized = match raw.strip_suffix('Z') {
        Some(prefix) => format!("{prefix}+00:00"),
        None => raw.to_string(),
    };
    DateTime::parse_from_rfc3339(&normalized).is_ok()
        || normalized.parse::<NaiveDateTime>().is_ok()
        || normalized.parse::<NaiveDate>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_common_iso8601_forms() {
        assert!(is_valid_iso8601("2099-01-01T00:00:00"));
        assert!(is_valid_iso8601("2099-01-01T00:00:00.123456"));
        assert!(is_valid_iso8601("2099-01-01T00:00:00Z"));
        assert!(is_valid_iso8601("2099-01-01T00:00:00+02:00"));
        assert!(is_valid_iso8601("2099-01-01"));
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(!is_valid_iso8601("not-a-date"));
        assert!(!is_valid_iso8601(""));
        assert!(!is_valid_iso8601("2099-13-45T00:00:00"));
        assert!(!is_valid_iso8601("2099-01-01 midnight"));
        assert!(!is_valid_iso8601("Z"));
    }

    #[test]
    fn serializes_id_as_string_underscore_id() {
        let announcement = Announcement {
            id: Uuid::nil(),
            message: "Exam Friday".into(),
            start_date: None,
            end_date: "2099-01-01T00:00:00".into(),
            active: Some(true),
            created_by: "t1".into(),
            created_at: "2026-08-06T10:00:00.000000".into(),
        };
        let value = serde_json::to_value(&announcement).unwrap();
        assert_eq!(
            value["_id"],
            json!("00000000-0000-0000-0000-000000000000")
        );
        assert!(value.get("id").is_none());
        assert_eq!(value["active"], json!(true));
        assert_eq!(value["start_date"], json!(null));
    }

    #[test]
    fn update_request_active_defaults_to_true() {
        let req: UpdateAnnouncementRequest = serde_json::from_value(json!({
            "teacher_username": "t1",
            "message": "Updated",
            "end_date": "2099-01-01T00:00:00",
        }))
        .unwrap();
        assert!(req.active);
        assert!(req.start_date.is_none());

        let req: UpdateAnnouncementRequest = serde_json::from_value(json!({
            "teacher_username": "t1",
            "message": "Updated",
            "end_date": "2099-01-01T00:00:00",
            "active": false,
        }))
        .unwrap();
        assert!(!req.active);
    }
}
