//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `JWT_SECRET`: Bearer 토큰 검증 비밀키 (필수)
//! - `HOST` / `PORT`: 서버 바인딩 주소
//! - `DAY_START_HOUR`: 추적일이 시작되는 시각 (기본 16시)
//! - `UTC_OFFSET_HOURS`: 기준 시간대의 UTC 오프셋 (기본 +9, KST)
//! - `STORE_TIMEOUT_SECS`: 저장소 호출 한 번의 제한 시간 (기본 5초)
//! - `ENABLE_TEST_SEED`: `POST /void/test` 라우트 등록 여부 (기본 false)

use anyhow::{bail, Context, Result};
use chrono::FixedOffset;
use std::env;
use std::time::Duration;

use crate::services::day_boundary::DayClock;

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 파일 경로 (예: "sqlite:data/dangbamgong.db")
    pub database_url: String,
    /// JWT 검증에 사용하는 비밀키
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    /// 하루 경계 시각 (0~23)
    pub day_start_hour: u32,
    /// 기준 시간대 오프셋 (시간 단위)
    pub utc_offset_hours: i32,
    pub store_timeout: Duration,
    pub enable_test_seed: bool,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`과 `JWT_SECRET`이 없거나, 하루 경계/오프셋 값이
    /// 범위를 벗어나면 에러를 반환합니다.
    pub fn from_env() -> Result<Self> {
        let day_start_hour: u32 = parse_or("DAY_START_HOUR", 16)?;
        if day_start_hour > 23 {
            bail!("DAY_START_HOUR must be between 0 and 23, got {day_start_hour}");
        }

        let utc_offset_hours: i32 = parse_or("UTC_OFFSET_HOURS", 9)?;
        if !(-23..=23).contains(&utc_offset_hours) {
            bail!("UTC_OFFSET_HOURS must be between -23 and 23, got {utc_offset_hours}");
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL is required")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET is required")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("PORT", 3000)?,
            day_start_hour,
            utc_offset_hours,
            store_timeout: Duration::from_secs(parse_or("STORE_TIMEOUT_SECS", 5)?),
            enable_test_seed: parse_or("ENABLE_TEST_SEED", false)?,
        })
    }

    /// 설정값으로 하루 경계 계산기를 만듭니다.
    pub fn day_clock(&self) -> Result<DayClock> {
        let offset = FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .context("invalid UTC offset")?;
        Ok(DayClock::new(self.day_start_hour, offset))
    }
}

/// 환경변수가 없으면 기본값, 있으면 파싱합니다. 파싱 실패는 에러입니다.
fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {key} value {raw:?}: {e}")),
        Err(_) => Ok(default),
    }
}
