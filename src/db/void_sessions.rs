//! # 공백 세션 쿼리 모듈
//!
//! 세션은 종료 시점에 한 번 INSERT되고 이후 수정/삭제되지 않습니다.
//! 통계 쪽에서는 추적일 단위(`target_day`)로만 읽습니다.

use sqlx::types::Json;
use sqlx::{SqliteExecutor, SqlitePool};

use crate::error::AppError;
use crate::models::{UserDuration, VoidSession};

/// 완료된 세션을 저장합니다. 트랜잭션 안에서도 쓸 수 있도록 executor를 받습니다.
pub async fn create_void_session<'c, E>(executor: E, session: &VoidSession) -> Result<(), AppError>
where
    E: SqliteExecutor<'c>,
{
    sqlx::query(
        r#"
        INSERT INTO void_sessions
            (id, user_id, started_at, ended_at, duration_sec, target_day, activities, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&session.id)
    .bind(&session.user_id)
    .bind(session.started_at)
    .bind(session.ended_at)
    .bind(session.duration_sec)
    .bind(&session.target_day)
    .bind(Json(&session.activities))
    .bind(session.created_at)
    .execute(executor)
    .await?;

    Ok(())
}

/// 추적일의 모든 세션 (시작 시각 순). 버킷 캐시를 채울 때 한 번만 호출됩니다.
pub async fn find_by_day(pool: &SqlitePool, target_day: &str) -> Result<Vec<VoidSession>, AppError> {
    let sessions = sqlx::query_as::<_, VoidSession>(
        r#"
        SELECT id, user_id, started_at, ended_at, duration_sec, target_day, activities, created_at
        FROM void_sessions
        WHERE target_day = ?
        ORDER BY started_at ASC
        "#,
    )
    .bind(target_day)
    .fetch_all(pool)
    .await?;

    Ok(sessions)
}

/// 한 사용자의 추적일 세션 (시작 시각 순)
pub async fn find_by_user_and_day(
    pool: &SqlitePool,
    user_id: &str,
    target_day: &str,
) -> Result<Vec<VoidSession>, AppError> {
    let sessions = sqlx::query_as::<_, VoidSession>(
        r#"
        SELECT id, user_id, started_at, ended_at, duration_sec, target_day, activities, created_at
        FROM void_sessions
        WHERE user_id = ? AND target_day = ?
        ORDER BY started_at ASC
        "#,
    )
    .bind(user_id)
    .bind(target_day)
    .fetch_all(pool)
    .await?;

    Ok(sessions)
}

/// 추적일에 세션이 하나라도 있는 서로 다른 사용자 수
pub async fn count_distinct_users_for_day(pool: &SqlitePool, target_day: &str) -> Result<i64, AppError> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(DISTINCT user_id) FROM void_sessions WHERE target_day = ?")
            .bind(target_day)
            .fetch_one(pool)
            .await?;

    Ok(count)
}

/// 사용자별 총 공백 시간. 총 시간 내림차순, 같으면 사용자 ID 오름차순.
pub async fn user_durations(pool: &SqlitePool, target_day: &str) -> Result<Vec<UserDuration>, AppError> {
    let durations = sqlx::query_as::<_, UserDuration>(
        r#"
        SELECT user_id, SUM(duration_sec) AS total_duration_sec
        FROM void_sessions
        WHERE target_day = ?
        GROUP BY user_id
        ORDER BY total_duration_sec DESC, user_id ASC
        "#,
    )
    .bind(target_day)
    .fetch_all(pool)
    .await?;

    Ok(durations)
}
