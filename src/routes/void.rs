//! # 공백(void) API 라우트 핸들러
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | POST | /api/v1/void/start | `start_void` | 공백 시작 |
//! | POST | /api/v1/void/end | `end_void` | 공백 종료, 세션 생성 |
//! | POST | /api/v1/void/cancel | `cancel_void` | 공백 취소 (기록 없음) |
//! | GET | /api/v1/void/history | `void_history` | 추적일 세션 목록 |
//! | POST | /api/v1/void/test | `seed_void` | 테스트 세션 생성 (설정으로 켤 때만) |
//!
//! 시각은 모두 요청을 받은 순간의 서버 시각(`Utc::now()`)을 씁니다.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use super::AppState;
use crate::{error::AppError, middleware::auth::AuthUser, models::*, services::void_lifecycle};

/// `POST /void/start`
pub async fn start_void(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<VoidStartResponse>, AppError> {
    let resp = void_lifecycle::start(&state.store, &state.clock, &user.user_id, Utc::now()).await?;
    Ok(Json(resp))
}

/// `POST /void/end` + `{ "activities": ["독서", "산책"] }`
pub async fn end_void(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<VoidEndRequest>,
) -> Result<Json<VoidEndResponse>, AppError> {
    let resp = void_lifecycle::end(
        &state.store,
        &state.clock,
        &user.user_id,
        req.activities,
        Utc::now(),
    )
    .await?;
    Ok(Json(resp))
}

/// `POST /void/cancel`
pub async fn cancel_void(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Value>, AppError> {
    void_lifecycle::cancel(&state.store, &user.user_id).await?;
    Ok(Json(json!({ "status": "cancelled" })))
}

/// `GET /void/history?target_day=2026-02-16`
pub async fn void_history(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<TargetDayQuery>,
) -> Result<Json<VoidHistoryResponse>, AppError> {
    let resp = void_lifecycle::history(
        &state.store,
        &state.clock,
        &user.user_id,
        query.target_day.as_deref(),
        Utc::now(),
    )
    .await?;
    Ok(Json(resp))
}

/// `POST /void/test` + `{ "started_at": "...", "ended_at": "...", "activities": [] }`
pub async fn seed_void(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<TestVoidRequest>,
) -> Result<(StatusCode, Json<VoidEndResponse>), AppError> {
    let resp = void_lifecycle::seed(&state.store, &state.clock, &user.user_id, req, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testing::state_with_user;
    use axum::response::IntoResponse;

    fn alice() -> AuthUser {
        AuthUser {
            user_id: "alice".to_string(),
        }
    }

    #[tokio::test]
    async fn start_then_cancel_round_trip() {
        let state = state_with_user("alice").await;

        let Json(started) = start_void(State(state.clone()), alice()).await.unwrap();
        assert_eq!(started.target_day, state.clock.target_day(started.started_at));

        let Json(body) = cancel_void(State(state.clone()), alice()).await.unwrap();
        assert_eq!(body["status"], "cancelled");

        let Json(history) = void_history(
            State(state),
            alice(),
            Query(TargetDayQuery {
                target_day: Some(started.target_day.clone()),
            }),
        )
        .await
        .unwrap();
        assert!(history.sessions.is_empty());
        assert_eq!(history.total_duration_sec, 0);
    }

    #[tokio::test]
    async fn token_for_unseen_subject_can_start() {
        use crate::middleware::auth::testing::issue_token;
        use axum::{extract::FromRequestParts, http::Request};

        let state = state_with_user("alice").await;
        let token = issue_token("first-timer", &state.jwt_secret, chrono::Duration::minutes(5));
        let (mut parts, ()) = Request::builder()
            .header("Authorization", format!("Bearer {token}"))
            .body(())
            .unwrap()
            .into_parts();

        let user = AuthUser::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(user.user_id, "first-timer");

        let Json(started) = start_void(State(state.clone()), user.clone()).await.unwrap();
        assert_eq!(started.target_day, state.clock.target_day(started.started_at));

        let Json(body) = cancel_void(State(state), user).await.unwrap();
        assert_eq!(body["status"], "cancelled");
    }

    #[tokio::test]
    async fn end_without_start_maps_to_stable_code() {
        let state = state_with_user("alice").await;

        let err = end_void(State(state), alice(), Json(VoidEndRequest::default()))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "NOT_IN_VOID");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn seed_returns_created() {
        let state = state_with_user("alice").await;
        let now = Utc::now();
        let req = TestVoidRequest {
            started_at: now - chrono::TimeDelta::minutes(30),
            ended_at: now,
            activities: vec![],
        };

        let (status, Json(resp)) = seed_void(State(state), alice(), Json(req)).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(resp.duration_sec, 30 * 60);
    }
}
