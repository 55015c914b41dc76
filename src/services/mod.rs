//! # 비즈니스 로직 모듈
//!
//! 라우트 핸들러와 DB 계층 사이에서 도메인 규칙을 담당합니다.
//! - `day_boundary`: 시각 → 추적일 (하루 경계 16시 규칙)
//! - `bucket`: 10분 버킷 키, 겹침 판정, 버킷별 인원 집계 (순수 함수)
//! - `ranking`: 하루 총 공백 시간 랭킹 (순수 함수)
//! - `stats`: 버킷 캐시 지연 채움, 실시간/일간 통계
//! - `void_lifecycle`: 공백 시작/종료/취소 상태 전이, 기록 조회, 테스트 데이터 생성

pub mod bucket;
pub mod day_boundary;
pub mod ranking;
pub mod stats;
pub mod void_lifecycle;

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::AppError;
use day_boundary::DayClock;

/// 저장소 핸들. 모든 저장소 호출은 `run`을 거쳐 제한 시간 안에서 실행됩니다.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
    timeout: Duration,
}

impl Store {
    pub fn new(pool: SqlitePool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// 저장소 작업을 제한 시간 안에 실행합니다. 시간이 지나면 내부 에러입니다.
    /// 재시도는 하지 않습니다.
    pub async fn run<T, F>(&self, what: &str, fut: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Internal(format!(
                "{what} timed out after {:?}",
                self.timeout
            ))),
        }
    }
}

/// 쿼리의 `target_day`를 확정합니다.
///
/// 없거나 비어 있으면 `now`가 속한 추적일, 형식이 틀리면 BadRequest.
pub fn resolve_target_day(
    clock: &DayClock,
    target_day: Option<&str>,
    now: DateTime<Utc>,
) -> Result<String, AppError> {
    match target_day.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(clock.target_day(now)),
        Some(day) => DayClock::parse_target_day(day)
            .map(|date| date.format(day_boundary::TARGET_DAY_FORMAT).to_string())
            .ok_or_else(|| {
                AppError::BadRequest(format!("target_day must be YYYY-MM-DD, got {day:?}"))
            }),
    }
}
