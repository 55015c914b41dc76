//! # 공백(void) 상태 전이
//!
//! ```text
//!                 start
//!  NOT_IN_VOID ───────────▶ IN_VOID
//!       ▲                      │
//!       ├──── end (세션 생성) ──┤
//!       └──── cancel (기록 없음)┘
//! ```
//!
//! - `start`: 세션은 만들지 않고 사용자 상태만 바꿉니다.
//! - `end`: 시작 시각 기준으로 `target_day`를 정하고 세션을 저장합니다.
//!   상태 전이, 활동 사용 횟수 증가, 세션 저장이 한 트랜잭션입니다.
//! - `cancel`: 경과 시간은 버려지고 통계에 나타나지 않습니다.
//! - `seed`: 상태 전이 없이 지정한 구간의 세션을 바로 저장합니다 (통계 테스트용).
//!
//! 모든 전이는 `db::users`의 조건부 UPDATE로 이뤄지므로 같은 사용자의
//! 동시 요청이 있어도 한쪽만 성공합니다.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::day_boundary::DayClock;
use super::{resolve_target_day, Store};
use crate::db;
use crate::error::AppError;
use crate::models::*;

/// 인증된 사용자 ID의 행을 가져옵니다. 처음 보는 ID면 여기서 등록됩니다.
pub(crate) async fn caller(store: &Store, user_id: &str) -> Result<User, AppError> {
    store
        .run("provision user", db::users::ensure_user(store.pool(), user_id))
        .await
}

fn check_activity_count(activities: &[String]) -> Result<(), AppError> {
    if activities.len() > MAX_ACTIVITIES {
        return Err(AppError::TooManyActivities);
    }
    Ok(())
}

/// 시작/종료 시각으로 세션을 만듭니다. `duration_sec`과 `target_day`는 여기서만 계산됩니다.
fn build_session(
    clock: &DayClock,
    user_id: &str,
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
    activities: Vec<String>,
    created_at: DateTime<Utc>,
) -> VoidSession {
    VoidSession {
        id: uuid::Uuid::now_v7().to_string(),
        user_id: user_id.to_string(),
        started_at,
        ended_at,
        duration_sec: (ended_at - started_at).num_seconds(),
        target_day: clock.target_day(started_at),
        activities,
        created_at,
    }
}

pub async fn start(
    store: &Store,
    clock: &DayClock,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<VoidStartResponse, AppError> {
    caller(store, user_id).await?;

    let started = store
        .run("begin void", db::users::begin_void(store.pool(), user_id, now))
        .await?;
    if !started {
        return Err(AppError::AlreadyInVoid);
    }

    let target_day = clock.target_day(now);
    tracing::info!(user_id, %target_day, "void started");

    Ok(VoidStartResponse {
        started_at: now,
        target_day,
    })
}

pub async fn end(
    store: &Store,
    clock: &DayClock,
    user_id: &str,
    activities: Vec<String>,
    now: DateTime<Utc>,
) -> Result<VoidEndResponse, AppError> {
    let user = caller(store, user_id).await?;
    let started_at = user.void_started_at().ok_or(AppError::NotInVoid)?;
    check_activity_count(&activities)?;

    if now <= started_at {
        return Err(AppError::BadRequest(
            "void must end after it started".to_string(),
        ));
    }

    let session = build_session(clock, user_id, started_at, now, activities, now);
    store
        .run("complete void session", complete_session(store.pool(), &session))
        .await?;

    tracing::info!(
        user_id,
        session_id = %session.id,
        target_day = %session.target_day,
        duration_sec = session.duration_sec,
        "void ended"
    );

    Ok(session.into())
}

/// 활동 확인 → 상태 전이 → 사용 횟수 증가 → 세션 저장을 한 트랜잭션으로 처리합니다.
///
/// 중간에 실패하면 트랜잭션이 drop되면서 롤백되고, 사용자는 계속 공백 중입니다.
async fn complete_session(pool: &SqlitePool, session: &VoidSession) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let mut activity_ids = Vec::with_capacity(session.activities.len());
    for name in &session.activities {
        let activity = db::activities::find_by_user_and_name(&mut *tx, &session.user_id, name)
            .await?
            .ok_or_else(|| AppError::ActivityNotFound(name.clone()))?;
        activity_ids.push(activity.id);
    }

    // 읽은 뒤 다른 요청이 먼저 끝냈거나 취소했다면 여기서 걸러집니다.
    if !db::users::finish_void(&mut *tx, &session.user_id, session.started_at).await? {
        return Err(AppError::NotInVoid);
    }

    for id in &activity_ids {
        db::activities::increment_usage(&mut *tx, id, session.ended_at).await?;
    }

    db::void_sessions::create_void_session(&mut *tx, session).await?;

    tx.commit().await?;
    Ok(())
}

pub async fn cancel(store: &Store, user_id: &str) -> Result<(), AppError> {
    caller(store, user_id).await?;

    let cancelled = store
        .run("cancel void", db::users::cancel_void(store.pool(), user_id))
        .await?;
    if !cancelled {
        return Err(AppError::NotInVoid);
    }

    tracing::info!(user_id, "void cancelled");
    Ok(())
}

/// 사용자의 추적일 세션 목록과 총 공백 시간
pub async fn history(
    store: &Store,
    clock: &DayClock,
    user_id: &str,
    target_day: Option<&str>,
    now: DateTime<Utc>,
) -> Result<VoidHistoryResponse, AppError> {
    let target_day = resolve_target_day(clock, target_day, now)?;

    let sessions = store
        .run(
            "find user sessions",
            db::void_sessions::find_by_user_and_day(store.pool(), user_id, &target_day),
        )
        .await?;

    let total_duration_sec = sessions.iter().map(|s| s.duration_sec).sum();

    Ok(VoidHistoryResponse {
        target_day,
        sessions: sessions.into_iter().map(VoidSessionItem::from).collect(),
        total_duration_sec,
    })
}

/// 상태 머신을 거치지 않고 세션을 바로 저장합니다.
///
/// 파생 규칙(`duration_sec`, `target_day`)은 `end`와 같습니다.
/// 라벨은 그대로 저장만 하고 활동 사용 횟수는 건드리지 않습니다.
pub async fn seed(
    store: &Store,
    clock: &DayClock,
    user_id: &str,
    req: TestVoidRequest,
    now: DateTime<Utc>,
) -> Result<VoidEndResponse, AppError> {
    caller(store, user_id).await?;
    check_activity_count(&req.activities)?;

    if req.ended_at <= req.started_at {
        return Err(AppError::BadRequest(
            "ended_at must be after started_at".to_string(),
        ));
    }

    let session = build_session(clock, user_id, req.started_at, req.ended_at, req.activities, now);
    store
        .run(
            "create seeded session",
            db::void_sessions::create_void_session(store.pool(), &session),
        )
        .await?;

    tracing::debug!(user_id, session_id = %session.id, "seeded void session");
    Ok(session.into())
}
