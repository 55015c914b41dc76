//! # 활동 라벨 쿼리 모듈
//!
//! 세션 종료 시 라벨 이름으로 활동을 찾고 사용 횟수를 올립니다.

use chrono::{DateTime, Utc};
use sqlx::{SqliteExecutor, SqlitePool};

use crate::error::AppError;
use crate::models::Activity;

/// 사용자의 활동 목록. 최근 사용 순, 같으면 사용 횟수 순.
pub async fn list_by_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<Activity>, AppError> {
    let activities = sqlx::query_as::<_, Activity>(
        r#"
        SELECT id, user_id, name, usage_count, last_used_at, created_at
        FROM activities
        WHERE user_id = ?
        ORDER BY last_used_at IS NULL, last_used_at DESC, usage_count DESC, name ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(activities)
}

pub async fn find_by_user_and_name<'c, E>(
    executor: E,
    user_id: &str,
    name: &str,
) -> Result<Option<Activity>, AppError>
where
    E: SqliteExecutor<'c>,
{
    let activity = sqlx::query_as::<_, Activity>(
        r#"
        SELECT id, user_id, name, usage_count, last_used_at, created_at
        FROM activities
        WHERE user_id = ? AND name = ?
        "#,
    )
    .bind(user_id)
    .bind(name)
    .fetch_optional(executor)
    .await?;

    Ok(activity)
}

pub async fn create_activity(
    pool: &SqlitePool,
    user_id: &str,
    name: &str,
    now: DateTime<Utc>,
) -> Result<Activity, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO activities (id, user_id, name, usage_count, created_at)
        VALUES (?, ?, ?, 0, ?)
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(name)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| match e {
        // UNIQUE(user_id, name): 동시에 같은 이름을 만들면 늦은 쪽이 여기로 옵니다.
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::ActivityAlreadyExists(name.to_string())
        }
        other => AppError::Database(other),
    })?;

    find_by_user_and_name(pool, user_id, name)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created activity".to_string()))
}

/// 사용 횟수 +1, 마지막 사용 시각 갱신
pub async fn increment_usage<'c, E>(executor: E, id: &str, used_at: DateTime<Utc>) -> Result<(), AppError>
where
    E: SqliteExecutor<'c>,
{
    sqlx::query(
        r#"
        UPDATE activities
        SET usage_count = usage_count + 1,
            last_used_at = ?
        WHERE id = ?
        "#,
    )
    .bind(used_at)
    .bind(id)
    .execute(executor)
    .await?;

    Ok(())
}

/// 사용자의 활동을 삭제합니다. 지운 행이 없으면 `false`.
///
/// 이미 저장된 세션의 라벨 목록은 이름 문자열이므로 그대로 남습니다.
pub async fn delete_activity(pool: &SqlitePool, user_id: &str, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM activities WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() == 1)
}
