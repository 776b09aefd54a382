//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::{InboxId, NotificationId, StoreError, UserId},
    infrastructure::dto::{
        conversion::profile_from_request,
        http::{
            ConnectedUserDto, ErrorResponse, MessageDto, NotificationDto, UpsertProfileRequest,
            UserProfileDto,
        },
    },
    ui::state::AppState,
    usecase::{MarkNotificationReadError, ProfileError},
};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn store_error(error: StoreError) -> ApiError {
    tracing::error!("Store error: {}", error);
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal store error")
}

fn parse_user_id(user_id: i64) -> Result<UserId, ApiError> {
    UserId::new(user_id).map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Current presence snapshot
pub async fn get_online_users(State(state): State<Arc<AppState>>) -> Json<Vec<ConnectedUserDto>> {
    let users = state.presence_usecase.online_users().await;
    Json(users.into_iter().map(Into::into).collect())
}

/// Insert or replace a user profile
pub async fn upsert_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Json(request): Json<UpsertProfileRequest>,
) -> Result<Json<UserProfileDto>, ApiError> {
    let profile = profile_from_request(user_id, request)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;

    match state.upsert_profile_usecase.execute(profile).await {
        Ok(saved) => Ok(Json(saved.into())),
        Err(ProfileError::Store(e)) => Err(store_error(e)),
        Err(e @ ProfileError::NotFound(_)) => Err(api_error(StatusCode::NOT_FOUND, e.to_string())),
    }
}

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserProfileDto>, ApiError> {
    let user_id = parse_user_id(user_id)?;

    match state.get_profile_usecase.execute(user_id).await {
        Ok(profile) => Ok(Json(profile.into())),
        Err(e @ ProfileError::NotFound(_)) => Err(api_error(StatusCode::NOT_FOUND, e.to_string())),
        Err(ProfileError::Store(e)) => Err(store_error(e)),
    }
}

/// Messages of an inbox, oldest first
pub async fn get_inbox_messages(
    State(state): State<Arc<AppState>>,
    Path(inbox_id): Path<i64>,
) -> Result<Json<Vec<MessageDto>>, ApiError> {
    let inbox_id =
        InboxId::new(inbox_id).map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;

    let messages = state
        .get_inbox_messages_usecase
        .execute(inbox_id)
        .await
        .map_err(store_error)?;

    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

/// Notifications of a user, newest first
pub async fn get_notifications(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<NotificationDto>>, ApiError> {
    let user_id = parse_user_id(user_id)?;

    let notifications = state
        .get_notifications_usecase
        .execute(user_id)
        .await
        .map_err(store_error)?;

    Ok(Json(notifications.into_iter().map(Into::into).collect()))
}

pub async fn mark_notification_read(
    State(state): State<Arc<AppState>>,
    Path(notification_id): Path<i64>,
) -> Result<Json<NotificationDto>, ApiError> {
    match state
        .mark_notification_read_usecase
        .execute(NotificationId::new(notification_id))
        .await
    {
        Ok(notification) => Ok(Json(notification.into())),
        Err(e @ MarkNotificationReadError::NotFound(_)) => {
            Err(api_error(StatusCode::NOT_FOUND, e.to_string()))
        }
        Err(MarkNotificationReadError::Store(e)) => Err(store_error(e)),
    }
}
