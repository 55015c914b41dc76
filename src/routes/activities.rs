//! # 활동 라벨 라우트 핸들러
//!
//! - `GET    /api/v1/activities` → `{ "activities": [...] }`
//! - `POST   /api/v1/activities` + `{ "name": "독서" }` → 생성된 활동 (201)
//! - `DELETE /api/v1/activities/{activity_id}` → `{ "status": "deleted" }`
//!
//! 세션 종료 시 라벨은 여기서 등록한 이름과 정확히 일치해야 합니다.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use super::AppState;
use crate::{
    db,
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    services::void_lifecycle,
};

pub async fn list_activities(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Value>, AppError> {
    let activities = state
        .store
        .run(
            "list activities",
            db::activities::list_by_user(state.store.pool(), &user.user_id),
        )
        .await?;
    Ok(Json(json!({ "activities": activities })))
}

/// 이름은 앞뒤 공백을 제거한 뒤 1~10자여야 하고, 사용자별로 중복될 수 없습니다.
///
/// 중복 검사는 미리 조회해서 한 번, 동시에 들어온 요청은 UNIQUE 제약으로 한 번 더 걸러집니다.
pub async fn create_activity(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateActivityRequest>,
) -> Result<(StatusCode, Json<Activity>), AppError> {
    let name = req.name.trim();
    let len = name.chars().count();
    if len == 0 || len > MAX_ACTIVITY_NAME_CHARS {
        return Err(AppError::InvalidActivityName);
    }

    void_lifecycle::caller(&state.store, &user.user_id).await?;

    let pool = state.store.pool();
    let existing = state
        .store
        .run(
            "find activity",
            db::activities::find_by_user_and_name(pool, &user.user_id, name),
        )
        .await?;
    if existing.is_some() {
        return Err(AppError::ActivityAlreadyExists(name.to_string()));
    }

    let activity = state
        .store
        .run(
            "create activity",
            db::activities::create_activity(pool, &user.user_id, name, Utc::now()),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(activity)))
}

/// 다른 사용자의 활동이거나 없는 ID면 404 `ACTIVITY_NOT_FOUND`
pub async fn delete_activity(
    State(state): State<AppState>,
    user: AuthUser,
    Path(activity_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let deleted = state
        .store
        .run(
            "delete activity",
            db::activities::delete_activity(state.store.pool(), &user.user_id, &activity_id),
        )
        .await?;
    if !deleted {
        return Err(AppError::ActivityNotFound(activity_id));
    }

    tracing::debug!(user_id = %user.user_id, %activity_id, "activity deleted");
    Ok(Json(json!({ "status": "deleted" })))
}
