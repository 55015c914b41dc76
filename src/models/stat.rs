//! # 통계 모델 정의
//!
//! - `StatCacheRow`: `void_stat_cache` 테이블 한 행 (하루 + 10분 버킷 → 인원수)
//! - `UserDuration`: 랭킹 계산용 사용자별 총 공백 시간
//! - 응답 DTO: `LiveStatResponse`, `DailyStatResponse`, `BucketItem`

use chrono::{DateTime, Utc};
use serde::Serialize;

/// 버킷 캐시 행. 버킷이 완전히 지난 뒤에만 기록되므로 값은 최종값입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct StatCacheRow {
    pub target_day: String,
    /// 버킷 키 (`YYYY-MM-DDTHH:MM`, 기준 시간대)
    pub bucket: String,
    /// 이 버킷에 공백 중이었던 서로 다른 사용자 수
    pub count: i64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserDuration {
    pub user_id: String,
    pub total_duration_sec: i64,
}

/// `GET /stats/live` 응답
#[derive(Debug, Serialize)]
pub struct LiveStatResponse {
    /// 지금 공백 중인 사용자 수
    pub current_void_count: i64,
    /// 오늘(추적일 기준) 세션을 하나 이상 완료한 사용자 수
    pub today_slept_count: i64,
}

/// `GET /stats/daily` 응답
#[derive(Debug, Serialize)]
pub struct DailyStatResponse {
    pub target_day: String,
    pub buckets: Vec<BucketItem>,
    /// 호출자의 순위 (1부터). 그날 세션이 없으면 null
    pub my_rank: Option<usize>,
    /// 그날 세션이 있는 사용자 수. 0이면 null
    pub total_users: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketItem {
    /// `HH:MM`
    pub time: String,
    pub count: i64,
    /// 호출자 본인이 이 버킷에 공백 중이었는지
    pub is_mine: bool,
}
