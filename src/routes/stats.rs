//! # 통계 API 라우트 핸들러
//!
//! - `GET /api/v1/stats/live` → 지금 공백 중인 인원, 오늘 완료한 인원
//! - `GET /api/v1/stats/daily?target_day=YYYY-MM-DD` → 10분 버킷별 인원, 내 순위

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;

use super::AppState;
use crate::{error::AppError, middleware::auth::AuthUser, models::*, services::stats};

pub async fn live_stat(State(state): State<AppState>) -> Result<Json<LiveStatResponse>, AppError> {
    let resp = stats::live_stat(&state.store, &state.clock, Utc::now()).await?;
    Ok(Json(resp))
}

/// `target_day`가 없으면 현재 추적일, 형식이 틀리면 400 `BAD_REQUEST`
pub async fn daily_stat(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<TargetDayQuery>,
) -> Result<Json<DailyStatResponse>, AppError> {
    let resp = stats::daily_stat(
        &state.store,
        &state.clock,
        &user.user_id,
        query.target_day.as_deref(),
        Utc::now(),
    )
    .await?;
    Ok(Json(resp))
}
