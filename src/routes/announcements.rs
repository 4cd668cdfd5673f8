use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::announcement::{
        is_valid_iso8601, Announcement, CreateAnnouncementRequest, TeacherAuth,
        UpdateAnnouncementRequest,
    },
    services::{
        announcements::{next_active_state, AnnouncementService},
        teachers::TeacherDirectory,
    },
    AppState,
};

/// Every mutation and the management listing require the caller to name an
/// existing teacher account.
async fn require_teacher(state: &AppState, username: &str) -> Result<(), ApiError> {
    let known = TeacherDirectory::exists(&state.db, username)
        .await
        .map_err(ApiError::internal("Failed to verify teacher"))?;
    if known {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}

fn parse_announcement_id(raw: &str) -> Result<Uuid, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::InvalidInput("Invalid announcement ID"))
}

/// `end_date` is mandatory and must parse; `start_date` only when present.
/// No ordering between the two is enforced.
fn validate_dates(end_date: &str, start_date: Option<&str>) -> Result<(), ApiError> {
    if !is_valid_iso8601(end_date) {
        return Err(ApiError::InvalidInput("Invalid date format"));
    }
    if let Some(start) = start_date {
        if !is_valid_iso8601(start) {
            return Err(ApiError::InvalidInput("Invalid date format"));
        }
    }
    Ok(())
}

/// GET /announcements/active (public display feed).
///
/// Never fails toward the client: any internal problem is logged and an
/// empty list is returned.
pub async fn get_active(State(state): State<AppState>) -> Json<Vec<Announcement>> {
    match AnnouncementService::list_active(&state.db).await {
        Ok(announcements) => Json(announcements),
        Err(e) => {
            error!("Error fetching active announcements: {e:#}");
            Json(Vec::new())
        }
    }
}

/// GET /announcements/all (management listing, newest first).
pub async fn get_all(
    State(state): State<AppState>,
    Query(auth): Query<TeacherAuth>,
) -> Result<Json<Vec<Announcement>>, ApiError> {
    require_teacher(&state, &auth.teacher_username).await?;

    let announcements = AnnouncementService::list_all(&state.db)
        .await
        .map_err(ApiError::internal("Failed to fetch announcements"))?;
    Ok(Json(announcements))
}

/// POST /announcements/create
pub async fn create(
    State(state): State<AppState>,
    Query(req): Query<CreateAnnouncementRequest>,
) -> Result<Json<Value>, ApiError> {
    require_teacher(&state, &req.teacher_username).await?;
    validate_dates(&req.end_date, req.start_date.as_deref())?;

    let announcement = AnnouncementService::create(&state.db, &req)
        .await
        .map_err(ApiError::internal("Failed to create announcement"))?;

    info!("Announcement created by {}", req.teacher_username);
    Ok(Json(json!({
        "message": "Announcement created successfully",
        "announcement": announcement,
    })))
}

/// PUT /announcements/update/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(req): Query<UpdateAnnouncementRequest>,
) -> Result<Json<Value>, ApiError> {
    require_teacher(&state, &req.teacher_username).await?;
    let id = parse_announcement_id(&id)?;
    validate_dates(&req.end_date, req.start_date.as_deref())?;

    let matched = AnnouncementService::update(&state.db, id, &req)
        .await
        .map_err(ApiError::internal("Failed to update announcement"))?;
    if !matched {
        return Err(ApiError::NotFound("Announcement not found"));
    }

    info!("Announcement {id} updated by {}", req.teacher_username);
    Ok(Json(json!({ "message": "Announcement updated successfully" })))
}

/// DELETE /announcements/delete/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(auth): Query<TeacherAuth>,
) -> Result<Json<Value>, ApiError> {
    require_teacher(&state, &auth.teacher_username).await?;
    let id = parse_announcement_id(&id)?;

    let matched = AnnouncementService::delete(&state.db, id)
        .await
        .map_err(ApiError::internal("Failed to delete announcement"))?;
    if !matched {
        return Err(ApiError::NotFound("Announcement not found"));
    }

    info!("Announcement {id} deleted by {}", auth.teacher_username);
    Ok(Json(json!({ "message": "Announcement deleted successfully" })))
}

/// PUT /announcements/toggle/{id}: flip the manual switch.
pub async fn toggle_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(auth): Query<TeacherAuth>,
) -> Result<Json<Value>, ApiError> {
    require_teacher(&state, &auth.teacher_username).await?;
    let id = parse_announcement_id(&id)?;

    let announcement = AnnouncementService::find(&state.db, id)
        .await
        .map_err(ApiError::internal("Failed to toggle announcement status"))?
        .ok_or(ApiError::NotFound("Announcement not found"))?;

    let new_state = next_active_state(announcement.active);
    let matched = AnnouncementService::set_active(&state.db, id, new_state)
        .await
        .map_err(ApiError::internal("Failed to toggle announcement status"))?;
    if !matched {
        return Err(ApiError::NotFound("Announcement not found"));
    }

    let status_text = if new_state { "activated" } else { "deactivated" };
    info!("Announcement {id} {status_text} by {}", auth.teacher_username);
    Ok(Json(json!({
        "message": format!("Announcement {status_text} successfully"),
        "active": new_state,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_id_is_invalid_input() {
        let err = parse_announcement_id("not-a-uuid").unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput("Invalid announcement ID")));
        assert!(parse_announcement_id("3f2c1c5e-8a3e-4f0a-9b1d-2a6c0d9e7f11").is_ok());
    }

    #[test]
    fn date_validation_covers_both_fields() {
        assert!(validate_dates("2099-01-01T00:00:00", None).is_ok());
        assert!(validate_dates("2099-01-01T00:00:00Z", Some("2098-01-01T00:00:00")).is_ok());

        let err = validate_dates("not-a-date", None).unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput("Invalid date format")));
        let err = validate_dates("2099-01-01T00:00:00", Some("nope")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput("Invalid date format")));
    }

    #[test]
    fn start_after_end_is_not_rejected() {
        // No ordering check between the two dates.
        assert!(validate_dates("2000-01-01T00:00:00", Some("2099-01-01T00:00:00")).is_ok());
    }
}
