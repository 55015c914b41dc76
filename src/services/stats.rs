//! # 공백 통계 (실시간 / 일간)
//!
//! ## 버킷 캐시 지연 채움
//! ```text
//! 1. expected  = target_day에서 now 기준으로 완전히 지난 버킷 목록
//! 2. cached    = void_stat_cache에서 target_day 행 조회
//! 3. missing   = expected - cached
//! 4. missing이 있으면: 그날 세션 전체를 한 번 읽고 → missing만 집계 → upsert
//! 5. expected 순서대로 (HH:MM, count, is_mine) 반환
//! ```
//!
//! 캐시에는 완전히 지난 버킷만 들어가므로 캐시 적중은 재검증 없이 그대로 씁니다.
//! 같은 버킷을 동시에 채워도 같은 값으로 덮어쓰므로 잠금이 필요 없습니다.
//!
//! `is_mine`은 캐시(집계값만 저장)에서 읽지 않고, 호출자 본인 세션으로 매번 계산합니다.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

use super::bucket::{compute_bucket_counts, display_time, expected_buckets, is_user_in_bucket};
use super::day_boundary::DayClock;
use super::ranking::rank_of;
use super::{resolve_target_day, Store};
use crate::db;
use crate::error::AppError;
use crate::models::*;

/// 일간 버킷 조회 결과
#[derive(Debug)]
pub struct DailyBuckets {
    pub items: Vec<BucketItem>,
    /// 이번 호출에서 새로 집계해 캐시에 쓴 버킷 수 (모두 캐시 적중이면 0)
    pub computed: usize,
}

/// 추적일의 버킷별 인원수를 캐시 우선으로 가져옵니다.
pub async fn get_daily_buckets(
    store: &Store,
    clock: &DayClock,
    user_id: &str,
    target_day: &str,
    now: DateTime<Utc>,
) -> Result<DailyBuckets, AppError> {
    let expected = expected_buckets(clock, target_day, now);

    let cached = store
        .run("read stat cache", db::stat_cache::get_rows(store.pool(), target_day))
        .await?;
    let mut counts: HashMap<String, i64> = cached
        .into_iter()
        .map(|row| (row.bucket, row.count))
        .collect();

    let missing: Vec<String> = expected
        .iter()
        .filter(|b| !counts.contains_key(*b))
        .cloned()
        .collect();

    let mut computed = 0;
    if !missing.is_empty() {
        let filled = fill_missing(store, clock, target_day, &missing, now).await?;
        computed = filled.len();
        counts.extend(filled);
    }

    let mine = store
        .run(
            "find user sessions",
            db::void_sessions::find_by_user_and_day(store.pool(), user_id, target_day),
        )
        .await?;

    let items = expected
        .iter()
        .map(|b| BucketItem {
            time: display_time(b),
            count: counts.get(b).copied().unwrap_or(0),
            is_mine: is_user_in_bucket(clock, b, &mine),
        })
        .collect();

    Ok(DailyBuckets { items, computed })
}

/// 빠진 버킷만 집계해서 캐시에 씁니다.
///
/// 쓰기가 실패하면 집계 결과를 버리고 에러를 돌려줍니다.
/// 다음 호출이 같은 버킷을 다시 계산하므로 안전합니다.
async fn fill_missing(
    store: &Store,
    clock: &DayClock,
    target_day: &str,
    missing: &[String],
    now: DateTime<Utc>,
) -> Result<BTreeMap<String, i64>, AppError> {
    let sessions = store
        .run(
            "find day sessions",
            db::void_sessions::find_by_day(store.pool(), target_day),
        )
        .await?;

    let computed = compute_bucket_counts(clock, missing, &sessions);

    let rows: Vec<StatCacheRow> = computed
        .iter()
        .map(|(bucket, count)| StatCacheRow {
            target_day: target_day.to_string(),
            bucket: bucket.clone(),
            count: *count,
            updated_at: now,
        })
        .collect();

    store
        .run("write stat cache", db::stat_cache::upsert_rows(store.pool(), &rows))
        .await?;

    tracing::debug!(
        target_day,
        missing = missing.len(),
        sessions = sessions.len(),
        "filled stat cache"
    );

    Ok(computed)
}

/// 추적일 통계: 버킷별 인원수 + 호출자 순위
pub async fn daily_stat(
    store: &Store,
    clock: &DayClock,
    user_id: &str,
    target_day: Option<&str>,
    now: DateTime<Utc>,
) -> Result<DailyStatResponse, AppError> {
    let target_day = resolve_target_day(clock, target_day, now)?;

    let buckets = get_daily_buckets(store, clock, user_id, &target_day, now).await?;

    let durations = store
        .run(
            "sum user durations",
            db::void_sessions::user_durations(store.pool(), &target_day),
        )
        .await?;
    let ranking = rank_of(&durations, user_id);

    tracing::debug!(
        %target_day,
        computed = buckets.computed,
        cached = buckets.items.len().saturating_sub(buckets.computed),
        "daily stat served"
    );

    Ok(DailyStatResponse {
        target_day,
        buckets: buckets.items,
        my_rank: ranking.my_rank,
        total_users: ranking.total_users,
    })
}

/// 지금 공백 중인 인원과 오늘 세션을 완료한 인원
pub async fn live_stat(
    store: &Store,
    clock: &DayClock,
    now: DateTime<Utc>,
) -> Result<LiveStatResponse, AppError> {
    let current_void_count = store
        .run("count in void", db::users::count_in_void(store.pool()))
        .await?;

    let today = clock.target_day(now);
    let today_slept_count = store
        .run(
            "count today users",
            db::void_sessions::count_distinct_users_for_day(store.pool(), &today),
        )
        .await?;

    Ok(LiveStatResponse {
        current_void_count,
        today_slept_count,
    })
}
