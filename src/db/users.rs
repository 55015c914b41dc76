//! # 사용자 공백 상태 쿼리 모듈
//!
//! `users` 테이블의 `is_in_void` / `current_void_started_at`은 이 모듈의
//! 조건부 UPDATE로만 바뀝니다. 각 전이는 "기대하는 이전 상태"를 WHERE에 넣은
//! 단일 문장(compare-and-set)이며, 영향받은 행이 0이면 전제조건이 깨진 것입니다.
//!
//! ```text
//! NOT_IN_VOID ──begin_void──▶ IN_VOID
//!      ▲                         │
//!      └──finish_void / cancel_void
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteExecutor, SqlitePool};

use crate::error::AppError;
use crate::models::User;

/// 인증된 사용자 ID에 대응하는 행을 돌려줍니다. 없으면 새로 만듭니다.
///
/// 토큰 발급은 외부 인증 시스템의 일이므로, 검증된 `sub`가 처음 들어온 순간이
/// 곧 가입 시점입니다. 동시에 들어와도 `ON CONFLICT DO NOTHING`으로 한 행만 생깁니다.
pub async fn ensure_user(pool: &SqlitePool, id: &str) -> Result<User, AppError> {
    let inserted = sqlx::query("INSERT INTO users (id) VALUES (?) ON CONFLICT (id) DO NOTHING")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    if inserted == 1 {
        tracing::info!(user_id = id, "user provisioned");
    }

    find_by_id(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve provisioned user".to_string()))
}

pub async fn find_by_id<'c, E>(executor: E, id: &str) -> Result<Option<User>, AppError>
where
    E: SqliteExecutor<'c>,
{
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, nickname, is_in_void, current_void_started_at, created_at, updated_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(user)
}

/// NOT_IN_VOID → IN_VOID. 이미 공백 중이면 `false`.
pub async fn begin_void<'c, E>(
    executor: E,
    id: &str,
    started_at: DateTime<Utc>,
) -> Result<bool, AppError>
where
    E: SqliteExecutor<'c>,
{
    let result = sqlx::query(
        r#"
        UPDATE users
        SET is_in_void = 1,
            current_void_started_at = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND is_in_void = 0
        "#,
    )
    .bind(started_at)
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// IN_VOID → NOT_IN_VOID (세션 완료).
///
/// 읽어 둔 시작 시각까지 WHERE에 넣어, 그 사이 다른 요청이 공백을 끝내고
/// 새로 시작한 경우에도 엉뚱한 공백을 닫지 않습니다.
pub async fn finish_void<'c, E>(
    executor: E,
    id: &str,
    expected_started_at: DateTime<Utc>,
) -> Result<bool, AppError>
where
    E: SqliteExecutor<'c>,
{
    let result = sqlx::query(
        r#"
        UPDATE users
        SET is_in_void = 0,
            current_void_started_at = NULL,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND is_in_void = 1 AND current_void_started_at = ?
        "#,
    )
    .bind(id)
    .bind(expected_started_at)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// IN_VOID → NOT_IN_VOID (세션 없이 취소). 공백 중이 아니면 `false`.
pub async fn cancel_void<'c, E>(executor: E, id: &str) -> Result<bool, AppError>
where
    E: SqliteExecutor<'c>,
{
    let result = sqlx::query(
        r#"
        UPDATE users
        SET is_in_void = 0,
            current_void_started_at = NULL,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND is_in_void = 1
        "#,
    )
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// 지금 공백 중인 사용자 수
pub async fn count_in_void(pool: &SqlitePool) -> Result<i64, AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE is_in_void = 1")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::memory_pool;
    use chrono::TimeZone;

    #[tokio::test]
    async fn ensure_user_is_idempotent_and_keeps_state() {
        let pool = memory_pool().await;

        let fresh = ensure_user(&pool, "alice").await.unwrap();
        assert_eq!(fresh.id, "alice");
        assert!(!fresh.is_in_void);

        let started_at = Utc.with_ymd_and_hms(2026, 2, 16, 13, 0, 0).unwrap();
        assert!(begin_void(&pool, "alice", started_at).await.unwrap());

        // 두 번째 호출은 행을 새로 만들지도, 상태를 덮어쓰지도 않음
        let again = ensure_user(&pool, "alice").await.unwrap();
        assert!(again.is_in_void);
        assert_eq!(again.current_void_started_at, Some(started_at));

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
