use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::announcement::{
    Announcement, CreateAnnouncementRequest, UpdateAnnouncementRequest,
};

/// Current instant as a naive UTC ISO-8601 string with microsecond
/// precision. Stored timestamps use the same shape, so string comparison in
/// the store orders chronologically.
pub fn now_iso8601() -> String {
    Utc::now()
        .naive_utc()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// Next value of the manual switch; a record predating the flag counts as on.
pub fn next_active_state(current: Option<bool>) -> bool {
    !current.unwrap_or(true)
}

pub struct AnnouncementService;

impl AnnouncementService {
    /// Announcements that should be displayed right now: switched on, past
    /// an absent-or-elapsed start, before the end. `now` is computed once
    /// per call.
    pub async fn list_active(pool: &PgPool) -> anyhow::Result<Vec<Announcement>> {
        let now = now_iso8601();
        let announcements = sqlx::query_as::<_, Announcement>(
            "SELECT * FROM announcements
             WHERE active = TRUE
               AND (start_date IS NULL OR start_date <= $1)
               AND end_date >= $1
             ORDER BY created_at DESC",
        )
        .bind(&now)
        .fetch_all(pool)
        .await?;
        Ok(announcements)
    }

    /// Every announcement, newest first, regardless of window or switch.
    pub async fn list_all(pool: &PgPool) -> anyhow::Result<Vec<Announcement>> {
        let announcements = sqlx::query_as::<_, Announcement>(
            "SELECT * FROM announcements ORDER BY created_at DESC",
        )
        .fetch_all(pool)
        .await?;
        Ok(announcements)
    }

    pub async fn create(
        pool: &PgPool,
        req: &CreateAnnouncementRequest,
    ) -> anyhow::Result<Announcement> {
        let announcement = sqlx::query_as::<_, Announcement>(
            "INSERT INTO announcements
                 (message, start_date, end_date, active, created_by, created_at)
             VALUES ($1, $2, $3, TRUE, $4, $5)
             RETURNING *",
        )
        .bind(req.message.trim())
        .bind(&req.start_date)
        .bind(&req.end_date)
        .bind(&req.teacher_username)
        .bind(now_iso8601())
        .fetch_one(pool)
        .await?;
        Ok(announcement)
    }

    /// Replace the mutable fields; `id`, `created_by` and `created_at` are
    /// never touched. Returns whether a record matched.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        req: &UpdateAnnouncementRequest,
    ) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "UPDATE announcements
             SET message = $1, start_date = $2, end_date = $3, active = $4
             WHERE id = $5",
        )
        .bind(req.message.trim())
        .bind(&req.start_date)
        .bind(&req.end_date)
        .bind(req.active)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Physical removal. Returns whether a record matched.
    pub async fn delete(pool: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM announcements WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<Announcement>> {
        let announcement =
            sqlx::query_as::<_, Announcement>("SELECT * FROM announcements WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(announcement)
    }

    pub async fn set_active(pool: &PgPool, id: Uuid, active: bool) -> anyhow::Result<bool> {
        let result = sqlx::query("UPDATE announcements SET active = $1 WHERE id = $2")
            .bind(active)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    #[test]
    fn now_is_naive_iso8601_with_microseconds() {
        let now = now_iso8601();
        // shape: 2026-08-06T12:34:56.789012 (no timezone suffix)
        assert!(now.parse::<NaiveDateTime>().is_ok());
        assert!(!now.ends_with('Z'));
        assert_eq!(now.len(), "2026-08-06T12:34:56.789012".len());
    }

    #[test]
    fn now_compares_lexicographically_with_stored_dates() {
        let now = now_iso8601();
        assert!(now.as_str() > "2000-01-01T00:00:00");
        assert!(now.as_str() < "2099-01-01T00:00:00");
    }

    #[test]
    fn toggle_flips_and_treats_missing_flag_as_on() {
        assert!(!next_active_state(Some(true)));
        assert!(next_active_state(Some(false)));
        // legacy record without the flag: first toggle switches it off
        assert!(!next_active_state(None));
        // round-trip lands back on the original value
        let first = next_active_state(Some(false));
        assert!(!next_active_state(Some(first)));
    }
}
