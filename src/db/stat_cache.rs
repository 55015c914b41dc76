//! # 버킷 통계 캐시 쿼리 모듈
//!
//! `(target_day, bucket)` → `count`. 완전히 지난 버킷만 기록되므로
//! 한 번 기록된 값은 다시 계산해도 같습니다. 그래서 쓰기는 멱등 upsert입니다.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::AppError;
use crate::models::StatCacheRow;

/// 추적일의 캐시된 버킷들 (버킷 키 순)
pub async fn get_rows(pool: &SqlitePool, target_day: &str) -> Result<Vec<StatCacheRow>, AppError> {
    let rows = sqlx::query_as::<_, StatCacheRow>(
        r#"
        SELECT target_day, bucket, count, updated_at
        FROM void_stat_cache
        WHERE target_day = ?
        ORDER BY bucket ASC
        "#,
    )
    .bind(target_day)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// 여러 행을 한 문장으로 upsert합니다.
///
/// 같은 버킷을 동시에 채우는 요청이 있어도 같은 값으로 수렴합니다.
pub async fn upsert_rows(pool: &SqlitePool, rows: &[StatCacheRow]) -> Result<(), AppError> {
    if rows.is_empty() {
        return Ok(());
    }

    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("INSERT INTO void_stat_cache (target_day, bucket, count, updated_at) ");
    builder.push_values(rows, |mut b, row| {
        b.push_bind(row.target_day.clone())
            .push_bind(row.bucket.clone())
            .push_bind(row.count)
            .push_bind(row.updated_at);
    });
    builder.push(
        " ON CONFLICT (target_day, bucket) DO UPDATE SET \
         count = excluded.count, updated_at = excluded.updated_at",
    );

    builder.build().execute(pool).await?;

    Ok(())
}
